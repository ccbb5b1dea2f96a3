use crate::sheet::SheetId;

/// Rejected store mutation. The store is left unchanged.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreError {
    /// No sheet with this id
    SheetNotFound(SheetId),
    /// Column index past the end of the sheet's columns
    ColumnOutOfRange { col: usize, len: usize },
    /// Row index past the end of the sheet's data (reads only; writes extend)
    RowOutOfRange { row: usize, len: usize },
    /// A sheet needs at least one column
    NoColumns,
    /// Column name already used in this sheet
    DuplicateColumn(String),
    /// Column names must be non-blank
    InvalidColumnName,
    /// Named column does not exist in this sheet
    UnknownColumn(String),
    /// Operation needs an index column and the sheet has none
    NoIndexColumn,
    /// The index column stays at position 0 and cannot be moved
    IndexColumnPinned(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::SheetNotFound(id) => write!(f, "Sheet not found: {}", id),
            StoreError::ColumnOutOfRange { col, len } => {
                write!(f, "Column {} out of range (sheet has {} columns)", col, len)
            }
            StoreError::RowOutOfRange { row, len } => {
                write!(f, "Row {} out of range (sheet has {} rows)", row, len)
            }
            StoreError::NoColumns => write!(f, "A sheet needs at least one column"),
            StoreError::DuplicateColumn(name) => write!(f, "Column '{}' already exists", name),
            StoreError::InvalidColumnName => write!(f, "Column name cannot be empty"),
            StoreError::UnknownColumn(name) => write!(f, "No column named '{}'", name),
            StoreError::NoIndexColumn => write!(f, "Sheet has no index column"),
            StoreError::IndexColumnPinned(name) => {
                write!(f, "Index column '{}' must stay first", name)
            }
        }
    }
}

impl std::error::Error for StoreError {}
