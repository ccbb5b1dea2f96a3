pub mod error;
pub mod events;
pub mod sheet;
pub mod store;

pub use error::StoreError;
pub use events::{EventCallback, EventCollector, StoreEvent, StructureChange};
pub use sheet::{Sheet, SheetId, DEFAULT_COLUMN_WIDTH, DEFAULT_ROW_COUNT, MIN_COLUMN_WIDTH};
pub use store::{Store, StoreOptions};
