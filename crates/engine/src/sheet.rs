use std::fmt;

use serde::{Deserialize, Serialize};

/// Rows created for a new sheet.
pub const DEFAULT_ROW_COUNT: usize = 10;

/// Width assigned to a column that has none yet.
pub const DEFAULT_COLUMN_WIDTH: f32 = 200.0;

/// Narrowest a column can be resized to.
pub const MIN_COLUMN_WIDTH: f32 = 50.0;

/// Opaque, immutable sheet identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SheetId(String);

impl SheetId {
    /// Fresh random id (UUID v4).
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SheetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SheetId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for SheetId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// One spreadsheet tab.
///
/// Fields are read-only outside this crate. Every structural change goes
/// through [`crate::Store`], which keeps `data`, `sources` and
/// `column_widths` shaped like `columns`.
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    id: SheetId,
    title: String,
    description: String,
    index_column: String,
    columns: Vec<String>,
    data: Vec<Vec<String>>,
    sources: Vec<Vec<String>>,
    /// Presentation state only. Never sent to the service.
    column_widths: Vec<f32>,
}

impl Sheet {
    /// Rebuild a sheet from persisted parts, as given.
    ///
    /// No shape validation happens here: bulk loads trust the producer, and
    /// ragged grids are squared up by the first store mutation
    /// (see [`Sheet::normalize_shape`]). Column widths start at the default.
    pub fn restore(
        id: SheetId,
        title: impl Into<String>,
        description: impl Into<String>,
        index_column: impl Into<String>,
        columns: Vec<String>,
        data: Vec<Vec<String>>,
        sources: Vec<Vec<String>>,
    ) -> Self {
        let column_widths = vec![DEFAULT_COLUMN_WIDTH; columns.len()];
        Self {
            id,
            title: title.into(),
            description: description.into(),
            index_column: index_column.into(),
            columns,
            data,
            sources,
            column_widths,
        }
    }

    /// Blank sheet with `rows` empty rows sized to `columns`.
    pub(crate) fn blank(
        title: &str,
        description: &str,
        columns: Vec<String>,
        index_column: &str,
        rows: usize,
        width: f32,
    ) -> Self {
        let cols = columns.len();
        Self {
            id: SheetId::generate(),
            title: title.to_string(),
            description: description.to_string(),
            index_column: index_column.to_string(),
            data: vec![vec![String::new(); cols]; rows],
            sources: vec![vec![String::new(); cols]; rows],
            column_widths: vec![width; cols],
            columns,
        }
    }

    pub fn id(&self) -> &SheetId {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Name of the index column, empty if unset.
    pub fn index_column(&self) -> &str {
        &self.index_column
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn data(&self) -> &[Vec<String>] {
        &self.data
    }

    pub fn sources(&self) -> &[Vec<String>] {
        &self.sources
    }

    pub fn column_widths(&self) -> &[f32] {
        &self.column_widths
    }

    pub fn row_count(&self) -> usize {
        self.data.len()
    }

    pub fn col_count(&self) -> usize {
        self.columns.len()
    }

    /// Position of a column by name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Position of the index column, if one is set.
    pub fn index_column_position(&self) -> Option<usize> {
        if self.index_column.is_empty() {
            return None;
        }
        self.column_index(&self.index_column)
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.data.get(row)?.get(col).map(String::as_str)
    }

    /// Source text for a cell. Empty sources read as `None`.
    pub fn source(&self, row: usize, col: usize) -> Option<&str> {
        self.sources
            .get(row)?
            .get(col)
            .map(String::as_str)
            .filter(|s| !s.is_empty())
    }

    // ── Mutation (crate-private; the Store is the write surface) ────

    /// Square up both grids: every row gets exactly `col_count()` cells and
    /// `sources` gets exactly as many rows as `data`. Cells past the last
    /// column have no header and are dropped.
    pub(crate) fn normalize_shape(&mut self) {
        let cols = self.columns.len();
        let rows = self.data.len();
        self.sources.resize_with(rows, Vec::new);
        for row in self.data.iter_mut().chain(self.sources.iter_mut()) {
            if row.len() != cols {
                row.resize(cols, String::new());
            }
        }
        if self.column_widths.len() != cols {
            self.column_widths.resize(cols, DEFAULT_COLUMN_WIDTH);
        }
    }

    /// Append empty rows until `row` exists in both grids.
    pub(crate) fn ensure_row(&mut self, row: usize) {
        let cols = self.columns.len();
        while self.data.len() <= row {
            self.data.push(vec![String::new(); cols]);
        }
        while self.sources.len() <= row {
            self.sources.push(vec![String::new(); cols]);
        }
    }

    /// Caller guarantees `row` exists and `col < col_count()`.
    pub(crate) fn set_cell(&mut self, row: usize, col: usize, value: String) {
        let cols = self.columns.len();
        let cells = &mut self.data[row];
        if cells.len() < cols {
            cells.resize(cols, String::new());
        }
        cells[col] = value;
    }

    /// Caller guarantees `row` exists and `col < col_count()`.
    pub(crate) fn set_source(&mut self, row: usize, col: usize, source: String) {
        let cols = self.columns.len();
        let cells = &mut self.sources[row];
        if cells.len() < cols {
            cells.resize(cols, String::new());
        }
        cells[col] = source;
    }

    pub(crate) fn push_row(&mut self) -> usize {
        let row = self.data.len();
        self.ensure_row(row);
        row
    }

    pub(crate) fn push_column(&mut self, name: String, width: f32) -> usize {
        self.columns.push(name);
        for row in self.data.iter_mut().chain(self.sources.iter_mut()) {
            row.push(String::new());
        }
        self.column_widths.push(width);
        self.columns.len() - 1
    }

    /// Returns the removed column name.
    pub(crate) fn remove_column(&mut self, col: usize) -> String {
        let name = self.columns.remove(col);
        for row in self.data.iter_mut().chain(self.sources.iter_mut()) {
            if col < row.len() {
                row.remove(col);
            }
        }
        if col < self.column_widths.len() {
            self.column_widths.remove(col);
        }
        if self.index_column == name {
            self.index_column.clear();
        }
        name
    }

    /// Apply one permutation (take `from`, insert at `to`) to columns,
    /// every data row, every source row and the widths.
    pub(crate) fn move_column(&mut self, from: usize, to: usize) {
        move_item(&mut self.columns, from, to);
        for row in self.data.iter_mut().chain(self.sources.iter_mut()) {
            move_item(row, from, to);
        }
        move_item(&mut self.column_widths, from, to);
    }

    pub(crate) fn set_index_column(&mut self, name: &str) {
        self.index_column = name.to_string();
    }

    /// Move the index column to position 0. No-op if it is unset or
    /// already first.
    pub(crate) fn normalize_index_column(&mut self) -> Option<usize> {
        match self.index_column_position() {
            Some(pos) if pos > 0 => {
                self.move_column(pos, 0);
                Some(pos)
            }
            _ => None,
        }
    }

    pub(crate) fn set_width(&mut self, col: usize, width: f32) {
        if let Some(w) = self.column_widths.get_mut(col) {
            *w = width;
        }
    }

    pub(crate) fn reset_widths(&mut self, width: f32) {
        self.column_widths = vec![width; self.columns.len()];
    }
}

/// Remove the item at `from` and reinsert it at `to`.
fn move_item<T>(items: &mut Vec<T>, from: usize, to: usize) {
    if from >= items.len() || from == to {
        return;
    }
    let item = items.remove(from);
    let to = to.min(items.len());
    items.insert(to, item);
}
