// Human and --json rendering
//
// --json prints exactly one JSON value on stdout. Human output is a plain
// text table; notes go to stderr.

use autosheet_client::sheet_to_record;
use autosheet_engine::Sheet;
use serde::Serialize;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::CliError;

/// Widest a rendered cell may be before it is truncated.
const MAX_CELL_WIDTH: usize = 32;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SheetSummary<'a> {
    id: &'a str,
    title: &'a str,
    description: &'a str,
    index_column: &'a str,
    columns: &'a [String],
    rows: usize,
}

impl<'a> From<&'a Sheet> for SheetSummary<'a> {
    fn from(sheet: &'a Sheet) -> Self {
        Self {
            id: sheet.id().as_str(),
            title: sheet.title(),
            description: sheet.description(),
            index_column: sheet.index_column(),
            columns: sheet.columns(),
            rows: sheet.row_count(),
        }
    }
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| CliError::internal(format!("failed to serialize output: {}", e)))?;
    println!("{}", text);
    Ok(())
}

pub fn print_list(sheets: &[Sheet], json: bool) -> Result<(), CliError> {
    if json {
        let summaries: Vec<SheetSummary> = sheets.iter().map(SheetSummary::from).collect();
        return print_json(&summaries);
    }
    if sheets.is_empty() {
        eprintln!("no sheets");
        return Ok(());
    }

    let header = vec!["id".to_string(), "title".into(), "rows".into(), "cols".into(), "index".into()];
    let rows: Vec<Vec<String>> = sheets
        .iter()
        .map(|s| {
            vec![
                s.id().to_string(),
                s.title().to_string(),
                s.row_count().to_string(),
                s.col_count().to_string(),
                s.index_column().to_string(),
            ]
        })
        .collect();
    print!("{}", render_table(&header, &rows));
    Ok(())
}

/// Full sheet: the wire payload in --json mode, otherwise the grid with
/// zero-based row numbers in the gutter.
pub fn print_sheet(sheet: &Sheet, json: bool) -> Result<(), CliError> {
    if json {
        return print_json(&sheet_to_record(sheet).sheet);
    }

    println!("{}", sheet.title());
    if !sheet.description().is_empty() {
        println!("{}", sheet.description());
    }
    println!();

    let mut header = vec!["#".to_string()];
    header.extend(sheet.columns().iter().map(|name| {
        if name == sheet.index_column() {
            format!("{}*", name)
        } else {
            name.clone()
        }
    }));
    let rows: Vec<Vec<String>> = sheet
        .data()
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let mut line = vec![i.to_string()];
            line.extend(row.iter().cloned());
            line
        })
        .collect();
    print!("{}", render_table(&header, &rows));
    Ok(())
}

pub fn print_created(sheet: &Sheet, json: bool) -> Result<(), CliError> {
    if json {
        return print_json(&SheetSummary::from(sheet));
    }
    println!("created sheet {} '{}'", sheet.id(), sheet.title());
    println!("columns: {}", sheet.columns().join(", "));
    println!("index column: {}", sheet.index_column());
    Ok(())
}

/// Left-aligned table, columns separated by two spaces.
fn render_table(header: &[String], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = header.iter().map(|h| display_width(h)).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if i < widths.len() {
                widths[i] = widths[i].max(display_width(cell));
            }
        }
    }

    let mut out = String::new();
    push_line(&mut out, header, &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_line(&mut out, &rule, &widths);
    for row in rows {
        push_line(&mut out, row, &widths);
    }
    out
}

fn push_line(out: &mut String, cells: &[String], widths: &[usize]) {
    let mut line = String::new();
    for (i, width) in widths.iter().enumerate() {
        let cell = truncate(cells.get(i).map(String::as_str).unwrap_or(""), *width);
        if i > 0 {
            line.push_str("  ");
        }
        line.push_str(&cell);
        line.push_str(&" ".repeat(width.saturating_sub(cell.width())));
    }
    out.push_str(line.trim_end());
    out.push('\n');
}

fn display_width(s: &str) -> usize {
    s.width().min(MAX_CELL_WIDTH)
}

/// Cut `s` to `max` display columns, ending in an ellipsis if shortened.
fn truncate(s: &str, max: usize) -> String {
    // Newlines would break the grid
    let s = s.replace('\n', " ");
    if s.width() <= max {
        return s;
    }
    let mut out = String::new();
    let mut used = 0;
    for ch in s.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w + 1 > max {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    out
}
