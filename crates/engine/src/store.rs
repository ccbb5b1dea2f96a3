use std::collections::HashSet;

use autosheet_core::CellPosition;

use crate::error::StoreError;
use crate::events::{EventCallback, StoreEvent, StructureChange};
use crate::sheet::{Sheet, SheetId, DEFAULT_COLUMN_WIDTH, DEFAULT_ROW_COUNT, MIN_COLUMN_WIDTH};

/// Defaults applied to sheets the store creates or loads.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StoreOptions {
    /// Empty rows in a freshly created sheet
    pub default_row_count: usize,
    /// Width given to new or loaded columns
    pub default_column_width: f32,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            default_row_count: DEFAULT_ROW_COUNT,
            default_column_width: DEFAULT_COLUMN_WIDTH,
        }
    }
}

/// Single source of truth for every sheet in a session.
///
/// The store owns its sheets; callers get shared references for reading and
/// go through the mutation methods below for everything else. Each
/// successful mutation bumps [`Store::revision`] and emits one
/// [`StoreEvent`]. Failed mutations change nothing.
pub struct Store {
    sheets: Vec<Sheet>,
    active_sheet: Option<SheetId>,
    loading: bool,
    revision: u64,
    options: StoreOptions,
    listener: Option<EventCallback>,
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("sheets", &self.sheets.len())
            .field("active_sheet", &self.active_sheet)
            .field("loading", &self.loading)
            .field("revision", &self.revision)
            .finish()
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl Store {
    /// Empty store, loading until the first [`Store::replace_all`].
    pub fn new() -> Self {
        Self::with_options(StoreOptions::default())
    }

    pub fn with_options(options: StoreOptions) -> Self {
        Self {
            sheets: Vec::new(),
            active_sheet: None,
            loading: true,
            revision: 0,
            options,
            listener: None,
        }
    }

    /// Register the callback that receives every store event.
    /// Replaces any previous subscriber.
    pub fn subscribe(&mut self, callback: EventCallback) {
        self.listener = Some(callback);
    }

    // ── Reads ───────────────────────────────────────────────────────

    pub fn sheets(&self) -> &[Sheet] {
        &self.sheets
    }

    pub fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    pub fn sheet(&self, id: &SheetId) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.id() == id)
    }

    /// Look a sheet up by id, falling back to an exact title match.
    pub fn find_sheet(&self, key: &str) -> Option<&Sheet> {
        self.sheets
            .iter()
            .find(|s| s.id().as_str() == key)
            .or_else(|| self.sheets.iter().find(|s| s.title() == key))
    }

    pub fn active_sheet_id(&self) -> Option<&SheetId> {
        self.active_sheet.as_ref()
    }

    pub fn active_sheet(&self) -> Option<&Sheet> {
        self.active_sheet.as_ref().and_then(|id| self.sheet(id))
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Monotonic counter bumped by every successful mutation.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    // ── Session-level mutations ─────────────────────────────────────

    /// Replace the whole collection (initial load) and clear the loading flag.
    ///
    /// Sheet contents are taken as given. Duplicate ids keep their first
    /// occurrence; column widths are reset to the default; an active id that
    /// no longer exists is cleared.
    pub fn replace_all(&mut self, sheets: Vec<Sheet>) {
        let mut seen = HashSet::new();
        let width = self.options.default_column_width;
        self.sheets = sheets
            .into_iter()
            .filter(|s| {
                let fresh = seen.insert(s.id().clone());
                if !fresh {
                    log::warn!("dropping duplicate sheet id {}", s.id());
                }
                fresh
            })
            .map(|mut s| {
                s.reset_widths(width);
                s
            })
            .collect();

        if let Some(id) = &self.active_sheet {
            if !self.sheets.iter().any(|s| s.id() == id) {
                self.active_sheet = None;
            }
        }
        self.loading = false;

        let count = self.sheets.len();
        self.commit(|revision| StoreEvent::SheetsReplaced { revision, count });
    }

    /// Create a sheet with an empty grid and make it active.
    ///
    /// The index column, if given, must be one of `columns` and is moved
    /// to position 0.
    pub fn add_sheet(
        &mut self,
        title: &str,
        description: &str,
        columns: Vec<String>,
        index_column: &str,
    ) -> Result<SheetId, StoreError> {
        if columns.is_empty() {
            return Err(StoreError::NoColumns);
        }
        let mut seen = HashSet::new();
        for name in &columns {
            validate_column_name(name)?;
            if !seen.insert(name.as_str()) {
                return Err(StoreError::DuplicateColumn(name.clone()));
            }
        }
        if !index_column.is_empty() && !seen.contains(index_column) {
            return Err(StoreError::UnknownColumn(index_column.to_string()));
        }

        let mut sheet = Sheet::blank(
            title,
            description,
            columns,
            index_column,
            self.options.default_row_count,
            self.options.default_column_width,
        );
        sheet.normalize_index_column();

        let id = sheet.id().clone();
        log::debug!("adding sheet {} ({})", id, title);
        self.sheets.push(sheet);
        self.active_sheet = Some(id.clone());

        let sheet = id.clone();
        self.commit(|revision| StoreEvent::SheetAdded { revision, sheet });
        Ok(id)
    }

    /// Point the active sheet at `id`. Unknown ids are rejected.
    pub fn set_active(&mut self, id: &SheetId) -> Result<(), StoreError> {
        if self.sheet(id).is_none() {
            return Err(StoreError::SheetNotFound(id.clone()));
        }
        self.active_sheet = Some(id.clone());
        let sheet = Some(id.clone());
        self.commit(|revision| StoreEvent::ActiveSheetChanged { revision, sheet });
        Ok(())
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
        self.commit(|revision| StoreEvent::LoadingChanged { revision, loading });
    }

    // ── Cell mutations ──────────────────────────────────────────────

    /// Write one cell value, and its source when `source` is non-empty.
    ///
    /// Rows past the end are created, backfilling every missing row in
    /// between with empty cells. A `None` or empty source leaves any
    /// existing source untouched: sources cannot be cleared here.
    pub fn update_cell(
        &mut self,
        sheet_id: &SheetId,
        row: usize,
        col: usize,
        value: impl Into<String>,
        source: Option<&str>,
    ) -> Result<(), StoreError> {
        let sheet = self.sheet_mut(sheet_id)?;
        let len = sheet.col_count();
        if col >= len {
            return Err(StoreError::ColumnOutOfRange { col, len });
        }

        sheet.normalize_shape();
        sheet.ensure_row(row);
        sheet.set_cell(row, col, value.into());
        if let Some(source) = source.filter(|s| !s.is_empty()) {
            sheet.set_source(row, col, source.to_string());
        }

        let sheet = sheet_id.clone();
        self.commit(|revision| StoreEvent::CellsChanged {
            revision,
            sheet,
            cells: vec![CellPosition::new(row, col)],
        });
        Ok(())
    }

    // ── Structural mutations ────────────────────────────────────────

    /// Append one empty row. Returns its index.
    pub fn add_row(&mut self, sheet_id: &SheetId) -> Result<usize, StoreError> {
        let sheet = self.sheet_mut(sheet_id)?;
        sheet.normalize_shape();
        let row = sheet.push_row();
        self.structure_changed(sheet_id, StructureChange::RowsAdded { first: row, count: 1 });
        Ok(row)
    }

    /// Append a column with empty cells and the default width.
    pub fn add_column(&mut self, sheet_id: &SheetId, name: &str) -> Result<usize, StoreError> {
        validate_column_name(name)?;
        let width = self.options.default_column_width;
        let sheet = self.sheet_mut(sheet_id)?;
        if sheet.column_index(name).is_some() {
            return Err(StoreError::DuplicateColumn(name.to_string()));
        }
        sheet.normalize_shape();
        let col = sheet.push_column(name.to_string(), width);
        self.structure_changed(sheet_id, StructureChange::ColumnAdded { col });
        Ok(col)
    }

    /// Remove a column and its cells. Clears the index column if it was
    /// the one removed. Returns the removed name.
    pub fn remove_column(&mut self, sheet_id: &SheetId, col: usize) -> Result<String, StoreError> {
        let sheet = self.sheet_mut(sheet_id)?;
        let len = sheet.col_count();
        if col >= len {
            return Err(StoreError::ColumnOutOfRange { col, len });
        }
        sheet.normalize_shape();
        let name = sheet.remove_column(col);
        self.structure_changed(sheet_id, StructureChange::ColumnRemoved { col });
        Ok(name)
    }

    /// Move a column from `from` to `to`, permuting data, sources and widths
    /// identically.
    ///
    /// While an index column is set, it owns position 0: moving it, or moving
    /// another column into position 0, is rejected.
    pub fn move_column(&mut self, sheet_id: &SheetId, from: usize, to: usize) -> Result<(), StoreError> {
        let sheet = self.sheet_mut(sheet_id)?;
        let len = sheet.col_count();
        for col in [from, to] {
            if col >= len {
                return Err(StoreError::ColumnOutOfRange { col, len });
            }
        }
        if let Some(pos) = sheet.index_column_position() {
            if [from, to].iter().any(|&col| col == 0 || col == pos) {
                return Err(StoreError::IndexColumnPinned(sheet.index_column().to_string()));
            }
        }
        sheet.normalize_shape();
        sheet.move_column(from, to);
        self.structure_changed(sheet_id, StructureChange::ColumnMoved { from, to });
        Ok(())
    }

    /// Designate the index column and move it to position 0.
    /// An empty name clears the index column.
    pub fn set_index_column(&mut self, sheet_id: &SheetId, name: &str) -> Result<(), StoreError> {
        let sheet = self.sheet_mut(sheet_id)?;
        if !name.is_empty() && sheet.column_index(name).is_none() {
            return Err(StoreError::UnknownColumn(name.to_string()));
        }
        sheet.normalize_shape();
        sheet.set_index_column(name);
        if let Some(from) = sheet.normalize_index_column() {
            log::debug!("moved index column '{}' from {} to 0", name, from);
        }
        self.structure_changed(sheet_id, StructureChange::IndexColumnSet { name: name.to_string() });
        Ok(())
    }

    /// Set a column's display width, clamped to the minimum.
    pub fn resize_column(&mut self, sheet_id: &SheetId, col: usize, width: f32) -> Result<(), StoreError> {
        let sheet = self.sheet_mut(sheet_id)?;
        let len = sheet.col_count();
        if col >= len {
            return Err(StoreError::ColumnOutOfRange { col, len });
        }
        sheet.set_width(col, width.max(MIN_COLUMN_WIDTH));
        self.structure_changed(sheet_id, StructureChange::ColumnResized { col });
        Ok(())
    }

    // ── Internal helpers ────────────────────────────────────────────

    fn sheet_mut(&mut self, id: &SheetId) -> Result<&mut Sheet, StoreError> {
        self.sheets
            .iter_mut()
            .find(|s| s.id() == id)
            .ok_or_else(|| StoreError::SheetNotFound(id.clone()))
    }

    fn structure_changed(&mut self, sheet_id: &SheetId, change: StructureChange) {
        let sheet = sheet_id.clone();
        self.commit(|revision| StoreEvent::StructureChanged { revision, sheet, change });
    }

    fn commit(&mut self, make_event: impl FnOnce(u64) -> StoreEvent) {
        self.revision += 1;
        let event = make_event(self.revision);
        log::trace!("store event: {:?}", event);
        if let Some(listener) = self.listener.as_mut() {
            listener(&event);
        }
    }
}

fn validate_column_name(name: &str) -> Result<(), StoreError> {
    if name.trim().is_empty() {
        return Err(StoreError::InvalidColumnName);
    }
    Ok(())
}
