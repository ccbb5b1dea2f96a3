use autosheet_engine::Sheet;

use crate::client::ClientError;

/// Generated values with their provenance, aligned with the requested
/// columns.
pub use autosheet_protocol::AutofillCellsResponse as CellFill;

/// The research service, as the flows see it.
///
/// [`ResearchClient`](crate::ResearchClient) talks HTTP; tests substitute
/// in-memory fakes. Each call is one blocking request.
pub trait Gateway {
    /// Every persisted sheet, shaped into store sheets.
    fn load_sheets(&self) -> Result<Vec<Sheet>, ClientError>;

    /// Column names the service proposes for a research description.
    fn suggest_columns(&self, description: &str) -> Result<Vec<String>, ClientError>;

    /// Up to `max_count` values for the index column.
    fn autofill_index(
        &self,
        description: &str,
        col_name: &str,
        max_count: usize,
    ) -> Result<Vec<String>, ClientError>;

    /// Values (and sources) for `columns` of the row keyed by `index_value`.
    fn autofill_cells(
        &self,
        description: &str,
        columns: &[String],
        index_value: &str,
    ) -> Result<CellFill, ClientError>;

    /// Persist a snapshot. Presentation state (column widths) is never sent.
    fn save_sheet(&self, sheet: &Sheet) -> Result<(), ClientError>;
}
