// Row/column argument parsing
//
// Rows and columns are zero-based, matching the store and the --json output.
// A column may be given by position or by name; a span is `a:b` or a single
// `a`, and reversed spans are normalized.

use autosheet_core::Range;
use autosheet_engine::{Sheet, StoreError};

use crate::CliError;

/// Split `a:b` into its ends. A single token is a span of one.
pub fn split_span(arg: &str) -> Result<(&str, &str), String> {
    let (a, b) = match arg.split_once(':') {
        Some((a, b)) => (a.trim(), b.trim()),
        None => (arg.trim(), arg.trim()),
    };
    if a.is_empty() || b.is_empty() {
        return Err(format!("invalid span '{}': expected N or N:M", arg));
    }
    Ok((a, b))
}

pub fn parse_index(token: &str) -> Result<usize, String> {
    token
        .parse::<usize>()
        .map_err(|_| format!("invalid row '{}': expected a non-negative integer", token))
}

/// Inclusive row span, normalized.
pub fn parse_rows(arg: &str) -> Result<(usize, usize), String> {
    let (a, b) = split_span(arg)?;
    let (a, b) = (parse_index(a)?, parse_index(b)?);
    Ok((a.min(b), a.max(b)))
}

/// Column position from a number or a column name.
///
/// Digits are always read as a position.
pub fn resolve_column(sheet: &Sheet, token: &str) -> Result<usize, StoreError> {
    if let Ok(col) = token.parse::<usize>() {
        if col >= sheet.col_count() {
            return Err(StoreError::ColumnOutOfRange { col, len: sheet.col_count() });
        }
        return Ok(col);
    }
    sheet
        .column_index(token)
        .ok_or_else(|| StoreError::UnknownColumn(token.to_string()))
}

/// Inclusive column span from numbers or names, normalized.
pub fn resolve_columns(sheet: &Sheet, arg: &str) -> Result<(usize, usize), CliError> {
    let (a, b) = split_span(arg).map_err(CliError::args)?;
    let a = resolve_column(sheet, a)?;
    let b = resolve_column(sheet, b)?;
    Ok((a.min(b), a.max(b)))
}

/// Selection range from `<rows> <cols>` arguments.
pub fn parse_range(sheet: &Sheet, rows: &str, cols: &str) -> Result<Range, CliError> {
    let (r1, r2) = parse_rows(rows).map_err(CliError::args)?;
    let (c1, c2) = resolve_columns(sheet, cols)?;
    Ok(Range::new(r1, c1, r2, c2))
}
