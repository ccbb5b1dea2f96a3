//! Change notifications emitted by the [`Store`](crate::Store).
//!
//! Every successful mutation bumps the store revision and emits exactly one
//! event tagged with that revision. Presentation layers re-render from
//! these; tests use [`EventCollector`] to check ordering.

use autosheet_core::CellPosition;

use crate::sheet::SheetId;

#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
    /// The whole collection was replaced (initial load).
    SheetsReplaced { revision: u64, count: usize },

    /// A new sheet was created and made active.
    SheetAdded { revision: u64, sheet: SheetId },

    /// The active sheet pointer moved.
    ActiveSheetChanged { revision: u64, sheet: Option<SheetId> },

    /// Cell values or sources changed.
    CellsChanged { revision: u64, sheet: SheetId, cells: Vec<CellPosition> },

    /// Rows or columns changed shape or order.
    StructureChanged { revision: u64, sheet: SheetId, change: StructureChange },

    /// Loading flag toggled.
    LoadingChanged { revision: u64, loading: bool },
}

impl StoreEvent {
    pub fn revision(&self) -> u64 {
        match self {
            StoreEvent::SheetsReplaced { revision, .. }
            | StoreEvent::SheetAdded { revision, .. }
            | StoreEvent::ActiveSheetChanged { revision, .. }
            | StoreEvent::CellsChanged { revision, .. }
            | StoreEvent::StructureChanged { revision, .. }
            | StoreEvent::LoadingChanged { revision, .. } => *revision,
        }
    }
}

/// Structural edits reported by [`StoreEvent::StructureChanged`].
#[derive(Debug, Clone, PartialEq)]
pub enum StructureChange {
    RowsAdded { first: usize, count: usize },
    ColumnAdded { col: usize },
    ColumnRemoved { col: usize },
    ColumnMoved { from: usize, to: usize },
    IndexColumnSet { name: String },
    ColumnResized { col: usize },
}

/// Callback type for receiving store events.
pub type EventCallback = Box<dyn FnMut(&StoreEvent) + Send>;

/// Simple event collector for testing.
#[derive(Debug, Default)]
pub struct EventCollector {
    events: Vec<StoreEvent>,
}

impl EventCollector {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn push(&mut self, event: StoreEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[StoreEvent] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Filter to only CellsChanged events.
    pub fn cells_changed(&self) -> Vec<&StoreEvent> {
        self.events
            .iter()
            .filter(|e| matches!(e, StoreEvent::CellsChanged { .. }))
            .collect()
    }

    /// Filter to only StructureChanged events.
    pub fn structure_changed(&self) -> Vec<&StructureChange> {
        self.events
            .iter()
            .filter_map(|e| match e {
                StoreEvent::StructureChanged { change, .. } => Some(change),
                _ => None,
            })
            .collect()
    }
}
