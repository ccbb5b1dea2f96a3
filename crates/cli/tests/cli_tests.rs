// End-to-end tests: the real `asheet` binary against a mocked research service.
//
// Run with: cargo test -p autosheet-cli --test cli_tests -- --nocapture

use std::process::{Command, Output};

use httpmock::prelude::*;
use serde_json::{json, Value};

/// Command with an isolated settings file and a clean environment.
fn asheet_at(api_base: &str, config_dir: &tempfile::TempDir) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_asheet"));
    cmd.env_remove("AUTOSHEET_API_BASE")
        .env_remove("RUST_LOG")
        .arg("--config")
        .arg(config_dir.path().join("settings.json"))
        .arg("--api-base")
        .arg(api_base);
    cmd
}

fn asheet(server: &MockServer, config_dir: &tempfile::TempDir) -> Command {
    asheet_at(&server.base_url(), config_dir)
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn stdout_json(output: &Output) -> Value {
    let stdout = String::from_utf8_lossy(&output.stdout);
    serde_json::from_str(stdout.trim())
        .unwrap_or_else(|e| panic!("stdout must be one JSON value: {}\n{}", e, stdout))
}

fn ev_sheet() -> Value {
    json!({
        "id": "ev",
        "title": "EV makers",
        "description": "Electric vehicle manufacturers",
        "indexColumn": "company",
        "columns": ["company", "country", "ceo"],
        "data": [["Tesla", "", ""], ["", "", ""], ["BYD", "", ""]],
        "sources": [["", "", ""], ["", "", ""], ["", "", ""]]
    })
}

fn mock_load(server: &MockServer) {
    server.mock(|when, then| {
        when.method(GET).path("/load-sheets");
        then.status(200).json_body(json!({
            "sheets": [
                { "id": "ev", "sheet": ev_sheet() },
                { "id": "labs", "sheet": {
                    "id": "labs", "title": "Labs", "description": "Protein labs",
                    "columns": ["lab"], "data": [["MRC"]]
                }}
            ]
        }));
    });
}

#[test]
fn list_json_summarizes_sheets() {
    let server = MockServer::start();
    mock_load(&server);
    let dir = tempfile::tempdir().unwrap();

    let output = asheet(&server, &dir).args(["list", "--json"]).output().unwrap();
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let val = stdout_json(&output);
    let sheets = val.as_array().unwrap();
    assert_eq!(sheets.len(), 2);
    assert_eq!(sheets[0]["title"], "EV makers");
    assert_eq!(sheets[0]["indexColumn"], "company");
    assert_eq!(sheets[0]["rows"], 3);
    assert_eq!(sheets[1]["indexColumn"], "");
}

#[test]
fn set_saves_sheet_without_widths() {
    let server = MockServer::start();
    mock_load(&server);
    let mut expected = ev_sheet();
    expected["data"][0][1] = json!("USA");
    expected["sources"][0][1] = json!("https://example.com/tesla");
    let save = server.mock(|when, then| {
        when.method(POST)
            .path("/save-sheet")
            .json_body(json!({ "id": "ev", "sheet": expected }));
        then.status(200);
    });
    let dir = tempfile::tempdir().unwrap();

    let output = asheet(&server, &dir)
        .args(["set", "EV makers", "0", "country", "USA", "--source", "https://example.com/tesla"])
        .output()
        .unwrap();
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    save.assert();
}

#[test]
fn fill_requests_every_row_including_blank_index() {
    let server = MockServer::start();
    mock_load(&server);
    let tesla = server.mock(|when, then| {
        when.method(POST).path("/autofill-cells").json_body(json!({
            "description": "Electric vehicle manufacturers",
            "columns": ["country", "ceo"],
            "index_value": "Tesla"
        }));
        then.status(200).json_body(json!({ "values": ["USA", "Elon"], "sources": ["a", "b"] }));
    });
    let blank = server.mock(|when, then| {
        when.method(POST).path("/autofill-cells").json_body(json!({
            "description": "Electric vehicle manufacturers",
            "columns": ["country", "ceo"],
            "index_value": ""
        }));
        then.status(200).json_body(json!({ "values": ["", ""], "sources": [] }));
    });
    let byd = server.mock(|when, then| {
        when.method(POST).path("/autofill-cells").json_body(json!({
            "description": "Electric vehicle manufacturers",
            "columns": ["country", "ceo"],
            "index_value": "BYD"
        }));
        then.status(200).json_body(json!({ "values": ["China", "Wang"], "sources": ["c", "d"] }));
    });
    let save = server.mock(|when, then| {
        when.method(POST).path("/save-sheet");
        then.status(200);
    });
    let dir = tempfile::tempdir().unwrap();

    let output = asheet(&server, &dir)
        .args(["--json", "fill", "ev", "0:2", "country:ceo"])
        .output()
        .unwrap();
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let val = stdout_json(&output);
    assert_eq!(val["applied"], 3);
    assert_eq!(val["total"], 3);
    assert_eq!(val["cancelled"], false);
    assert!(val.get("skipped").is_none());
    tesla.assert();
    blank.assert();
    byd.assert();
    save.assert();
}

#[test]
fn fill_failure_reports_progress_and_service_exit_code() {
    let server = MockServer::start();
    mock_load(&server);
    server.mock(|when, then| {
        when.method(POST).path("/autofill-cells");
        then.status(500).body("model overloaded");
    });
    let dir = tempfile::tempdir().unwrap();

    let output = asheet(&server, &dir).args(["fill", "ev", "0", "1"]).output().unwrap();
    assert_eq!(output.status.code(), Some(3));
    assert!(stderr(&output).contains("0 of 1 rows applied"), "stderr: {}", stderr(&output));
}

#[test]
fn unknown_sheet_exits_not_found() {
    let server = MockServer::start();
    mock_load(&server);
    let dir = tempfile::tempdir().unwrap();

    let output = asheet(&server, &dir).args(["show", "nope"]).output().unwrap();
    assert_eq!(output.status.code(), Some(4));
    assert!(stderr(&output).contains("hint:"));
}

#[test]
fn bad_row_span_is_usage_error() {
    let server = MockServer::start();
    mock_load(&server);
    let dir = tempfile::tempdir().unwrap();

    let output = asheet(&server, &dir).args(["fill", "ev", "x:2", "1"]).output().unwrap();
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn unreachable_service_exits_with_service_code() {
    let dir = tempfile::tempdir().unwrap();

    let output = asheet_at("http://127.0.0.1:9", &dir).arg("list").output().unwrap();
    assert_eq!(output.status.code(), Some(3));
}

#[test]
fn suggest_json_prints_columns() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST)
            .path("/suggested-columns")
            .json_body(json!({ "description": "EV makers" }));
        then.status(200).json_body(json!({ "results": ["company", "country"] }));
    });
    let dir = tempfile::tempdir().unwrap();

    let output = asheet(&server, &dir)
        .args(["suggest", "EV makers", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout_json(&output), json!(["company", "country"]));
}

#[test]
fn new_with_explicit_columns_skips_suggestions() {
    let server = MockServer::start();
    let suggest = server.mock(|when, then| {
        when.method(POST).path("/suggested-columns");
        then.status(200).json_body(json!({ "results": ["unused"] }));
    });
    let save = server.mock(|when, then| {
        when.method(POST).path("/save-sheet");
        then.status(200);
    });
    let dir = tempfile::tempdir().unwrap();

    let output = asheet(&server, &dir)
        .args([
            "new", "--title", "Labs", "--description", "Protein labs",
            "--column", "city", "--column", "lab", "--index", "lab", "--json",
        ])
        .output()
        .unwrap();
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let val = stdout_json(&output);
    assert_eq!(val["columns"], json!(["lab", "city"]));
    assert_eq!(val["rows"], 10);
    save.assert();
    suggest.assert_calls(0);
}

#[test]
fn load_tolerates_null_rows_and_description() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/load-sheets");
        then.status(200).json_body(json!({
            "sheets": [
                { "id": "gappy", "sheet": {
                    "id": "gappy", "title": "Gappy", "description": null,
                    "indexColumn": "name", "columns": ["name", "city"],
                    "data": [["a", "x"], null, ["b"]], "sources": null
                }},
                { "id": "ev", "sheet": ev_sheet() }
            ]
        }));
    });
    let dir = tempfile::tempdir().unwrap();

    let output = asheet(&server, &dir).args(["list", "--json"]).output().unwrap();
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let val = stdout_json(&output);
    let sheets = val.as_array().unwrap();
    assert_eq!(sheets.len(), 2);
    assert_eq!(sheets[0]["description"], "");
    assert_eq!(sheets[0]["rows"], 3);
    assert_eq!(sheets[1]["title"], "EV makers");
}

#[test]
fn moving_the_index_column_is_a_usage_error() {
    let server = MockServer::start();
    mock_load(&server);
    let save = server.mock(|when, then| {
        when.method(POST).path("/save-sheet");
        then.status(200);
    });
    let dir = tempfile::tempdir().unwrap();

    let output = asheet(&server, &dir)
        .args(["move-column", "ev", "country", "0"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("must stay first"), "stderr: {}", stderr(&output));
    save.assert_calls(0);
}

#[test]
fn new_from_suggestions_defaults_index_to_first_column() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST)
            .path("/suggested-columns")
            .json_body(json!({ "description": "Electric vehicle manufacturers" }));
        then.status(200).json_body(json!({ "results": ["company", "country"] }));
    });
    let save = server.mock(|when, then| {
        when.method(POST).path("/save-sheet");
        then.status(200);
    });
    let dir = tempfile::tempdir().unwrap();

    let output = asheet(&server, &dir)
        .args([
            "new", "--title", "EV makers", "--description", "Electric vehicle manufacturers", "--json",
        ])
        .output()
        .unwrap();
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let val = stdout_json(&output);
    assert_eq!(val["columns"], json!(["company", "country"]));
    assert_eq!(val["indexColumn"], "company");
    save.assert();
}
