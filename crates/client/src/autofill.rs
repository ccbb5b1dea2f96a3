//! Autofill flows.
//!
//! Index autofill is one request for the whole index column. Selection
//! autofill is one request per selected row, issued sequentially so each
//! row's result lands in the store before the next request starts and the
//! service never sees more than one call at a time from us.

use autosheet_core::Range;
use autosheet_engine::{SheetId, Store, StoreError};

use crate::cancel::CancelToken;
use crate::error::{BatchError, FlowError};
use crate::gateway::Gateway;

/// Index values requested when the caller does not choose.
pub const DEFAULT_INDEX_AUTOFILL: usize = 10;

/// Upper bound on index values per request.
pub const MAX_INDEX_AUTOFILL: usize = 100;

/// Outcome of a selection autofill that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchReport {
    /// Rows whose values were written.
    pub applied: usize,
    /// Rows in the selection.
    pub total: usize,
    /// True if the token stopped the batch before every row ran.
    pub cancelled: bool,
}

/// Generate `count` index values and write them top-down into the index
/// column, starting at row 0. Rows are created as needed.
///
/// Returns the number of values written.
pub fn autofill_index_column<G: Gateway + ?Sized>(
    store: &mut Store,
    gateway: &G,
    sheet_id: &SheetId,
    count: usize,
) -> Result<usize, FlowError> {
    if count == 0 || count > MAX_INDEX_AUTOFILL {
        return Err(FlowError::InvalidInput(format!(
            "Row count must be between 1 and {}", MAX_INDEX_AUTOFILL
        )));
    }

    let sheet = store
        .sheet(sheet_id)
        .ok_or_else(|| StoreError::SheetNotFound(sheet_id.clone()))?;
    let col = sheet.index_column_position().ok_or(StoreError::NoIndexColumn)?;
    let description = sheet.description().to_string();
    let index_column = sheet.index_column().to_string();

    let values = gateway.autofill_index(&description, &index_column, count)?;
    if values.len() > count {
        log::debug!("service returned {} index values, keeping {}", values.len(), count);
    }

    let mut written = 0;
    for (row, value) in values.into_iter().take(count).enumerate() {
        store.update_cell(sheet_id, row, col, value, None)?;
        written += 1;
    }
    Ok(written)
}

/// Fill every cell of `range` row by row from the service.
///
/// For each row the index column's value keys a request for the range's
/// columns; returned values (and their sources) are written back in column
/// order, except at the index column's own position. Extra values past the
/// range are ignored. Every row gets its request, including rows whose index
/// value is still blank.
///
/// The token is checked before each row. The batch stops at the first
/// failure: rows already written stay written and [`BatchError::applied`]
/// says how many.
pub fn autofill_selection<G: Gateway + ?Sized>(
    store: &mut Store,
    gateway: &G,
    sheet_id: &SheetId,
    range: Range,
    cancel: &CancelToken,
) -> Result<BatchReport, BatchError> {
    let total = range.row_count();
    let fail = |applied: usize, error: FlowError| BatchError { applied, total, error };

    let sheet = store
        .sheet(sheet_id)
        .ok_or_else(|| fail(0, StoreError::SheetNotFound(sheet_id.clone()).into()))?;
    let index_col = sheet
        .index_column_position()
        .ok_or_else(|| fail(0, StoreError::NoIndexColumn.into()))?;
    if range.end_col >= sheet.col_count() {
        let err = StoreError::ColumnOutOfRange { col: range.end_col, len: sheet.col_count() };
        return Err(fail(0, err.into()));
    }
    if range.end_row >= sheet.row_count() {
        let err = StoreError::RowOutOfRange { row: range.end_row, len: sheet.row_count() };
        return Err(fail(0, err.into()));
    }

    let description = sheet.description().to_string();
    let columns = sheet.columns()[range.start_col..=range.end_col].to_vec();

    let mut report = BatchReport { applied: 0, total, cancelled: false };

    for row in range.rows() {
        if cancel.is_cancelled() {
            log::info!("autofill cancelled after {} of {} rows", report.applied, total);
            report.cancelled = true;
            return Ok(report);
        }

        let index_value = store
            .sheet(sheet_id)
            .and_then(|s| s.cell(row, index_col))
            .unwrap_or_default()
            .to_string();
        if index_value.trim().is_empty() {
            log::debug!("autofilling row {} with a blank index value", row);
        } else {
            log::debug!("autofilling row {} ({})", row, index_value);
        }

        let fill = gateway
            .autofill_cells(&description, &columns, &index_value)
            .map_err(|e| fail(report.applied, e.into()))?;

        for (offset, value) in fill.values.into_iter().take(columns.len()).enumerate() {
            let col = range.start_col + offset;
            if col == index_col {
                continue;
            }
            let source = fill.sources.get(offset).map(String::as_str);
            store
                .update_cell(sheet_id, row, col, value, source)
                .map_err(|e| fail(report.applied, e.into()))?;
        }
        report.applied += 1;
    }

    Ok(report)
}
