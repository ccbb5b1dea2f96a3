//! Research service client, shared by the CLI and any frontend.
//!
//! Two layers:
//! - the [`Gateway`] contract and its blocking HTTP implementation
//!   ([`ResearchClient`]), one request per call;
//! - flows that join gateway calls to [`Store`](autosheet_engine::Store)
//!   mutations: initial load, the new-sheet wizard, index and selection
//!   autofill, save.
//!
//! No retries. No background work. Failures come back as errors and leave
//! the store as it was, except where a batch documents partial progress.

mod autofill;
mod cancel;
mod client;
mod error;
#[cfg(test)]
mod fake;
mod gateway;
mod session;
mod snapshot;
mod wizard;

pub use autofill::{
    autofill_index_column, autofill_selection, BatchReport,
    DEFAULT_INDEX_AUTOFILL, MAX_INDEX_AUTOFILL,
};
pub use cancel::CancelToken;
pub use client::{ClientError, ResearchClient, DEFAULT_TIMEOUT};
pub use error::{BatchError, FlowError};
pub use gateway::{CellFill, Gateway};
pub use session::{load_sheets, save_sheet};
pub use snapshot::{sheet_from_record, sheet_to_record};
pub use wizard::{NewSheetWizard, WizardStep};
