// Load and save flows

use autosheet_engine::{SheetId, Store, StoreError};

use crate::client::ClientError;
use crate::error::FlowError;
use crate::gateway::Gateway;

/// Fetch every sheet into the store.
///
/// The loading flag is set for the duration of the call and always cleared:
/// on failure the store is reset to an empty collection and the error is
/// returned for the caller to report.
pub fn load_sheets<G: Gateway + ?Sized>(store: &mut Store, gateway: &G) -> Result<usize, ClientError> {
    store.set_loading(true);
    match gateway.load_sheets() {
        Ok(sheets) => {
            let count = sheets.len();
            store.replace_all(sheets);
            log::info!("loaded {} sheets", count);
            Ok(count)
        }
        Err(e) => {
            log::warn!("failed to load sheets: {}", e);
            store.replace_all(Vec::new());
            Err(e)
        }
    }
}

/// Persist one sheet's current state.
pub fn save_sheet<G: Gateway + ?Sized>(store: &Store, gateway: &G, sheet_id: &SheetId) -> Result<(), FlowError> {
    let sheet = store
        .sheet(sheet_id)
        .ok_or_else(|| StoreError::SheetNotFound(sheet_id.clone()))?;
    gateway.save_sheet(sheet)?;
    log::info!("saved sheet {} ({})", sheet.id(), sheet.title());
    Ok(())
}
