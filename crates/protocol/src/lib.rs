//! Autosheet service wire format.
//!
//! Request and response bodies for the research service's HTTP/JSON API.
//! Field names are part of the contract; the golden tests in
//! `crates/client/tests` pin them.
//!
//! # Endpoints
//!
//! | Path                 | Method | Request                  | Response                  |
//! |----------------------|--------|--------------------------|---------------------------|
//! | `/load-sheets`       | GET    | —                        | [`LoadSheetsResponse`]    |
//! | `/suggested-columns` | POST   | [`SuggestColumnsRequest`]| [`ResultsResponse`]       |
//! | `/autofill-index`    | POST   | [`AutofillIndexRequest`] | [`ResultsResponse`]       |
//! | `/autofill-cells`    | POST   | [`AutofillCellsRequest`] | [`AutofillCellsResponse`] |
//! | `/save-sheet`        | POST   | [`SheetRecord`]          | ignored                   |

use serde::{Deserialize, Deserializer, Serialize};

pub const PATH_LOAD_SHEETS: &str = "/load-sheets";
pub const PATH_SUGGESTED_COLUMNS: &str = "/suggested-columns";
pub const PATH_AUTOFILL_INDEX: &str = "/autofill-index";
pub const PATH_AUTOFILL_CELLS: &str = "/autofill-cells";
pub const PATH_SAVE_SHEET: &str = "/save-sheet";

/// Persisted sheet snapshot.
///
/// Has no `columnWidths` field. Widths are presentation state and never
/// leave the client.
///
/// Every field tolerates `null`. Rows written past the end of `data` are
/// stored as `null` gaps, and the service keeps `description` nullable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetPayload {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub index_column: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub columns: Vec<String>,
    #[serde(default, deserialize_with = "rows_with_gaps")]
    pub data: Vec<Vec<String>>,
    #[serde(default, deserialize_with = "rows_with_gaps")]
    pub sources: Vec<Vec<String>>,
}

/// `{ id, sheet }` envelope used by both load and save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetRecord {
    pub id: String,
    #[serde(deserialize_with = "sheet_object_or_string")]
    pub sheet: SheetPayload,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadSheetsResponse {
    #[serde(default)]
    pub sheets: Vec<SheetRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestColumnsRequest {
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutofillIndexRequest {
    pub description: String,
    pub col_name: String,
    pub max_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutofillCellsRequest {
    pub description: String,
    pub columns: Vec<String>,
    pub index_value: String,
}

/// `{ results: [...] }`, shared by column suggestion and index autofill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultsResponse {
    pub results: Vec<String>,
}

/// Values and their provenance, positionally aligned with the requested
/// columns. `sources` may be shorter than `values`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutofillCellsResponse {
    pub values: Vec<String>,
    #[serde(default)]
    pub sources: Vec<String>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Grid rows where a `null` row reads as an empty row and a `null` cell as
/// an empty string.
fn rows_with_gaps<'de, D>(deserializer: D) -> Result<Vec<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let rows = Option::<Vec<Option<Vec<Option<String>>>>>::deserialize(deserializer)?;
    Ok(rows
        .unwrap_or_default()
        .into_iter()
        .map(|row| row.unwrap_or_default().into_iter().map(Option::unwrap_or_default).collect())
        .collect())
}

/// The service may send `sheet` either as an object or as a JSON-encoded
/// string of that object.
fn sheet_object_or_string<'de, D>(deserializer: D) -> Result<SheetPayload, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Object(SheetPayload),
        Encoded(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Object(sheet) => Ok(sheet),
        Raw::Encoded(s) => serde_json::from_str(&s).map_err(serde::de::Error::custom),
    }
}
