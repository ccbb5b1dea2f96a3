// Conversion between store sheets and the wire payload

use autosheet_engine::{Sheet, SheetId};
use autosheet_protocol::{SheetPayload, SheetRecord};

/// Wire envelope for saving. Column widths have no wire field and are
/// dropped here.
pub fn sheet_to_record(sheet: &Sheet) -> SheetRecord {
    let id = sheet.id().to_string();
    SheetRecord {
        id: id.clone(),
        sheet: SheetPayload {
            id,
            title: sheet.title().to_string(),
            description: sheet.description().to_string(),
            index_column: sheet.index_column().to_string(),
            columns: sheet.columns().to_vec(),
            data: sheet.data().to_vec(),
            sources: sheet.sources().to_vec(),
        },
    }
}

/// Store sheet from a loaded record. The payload's own id wins; the
/// envelope id is the fallback for payloads that omit it.
pub fn sheet_from_record(record: SheetRecord) -> Sheet {
    let SheetRecord { id: envelope_id, sheet } = record;
    let id = if sheet.id.is_empty() { envelope_id } else { sheet.id };
    Sheet::restore(
        SheetId::from(id),
        sheet.title,
        sheet.description,
        sheet.index_column,
        sheet.columns,
        sheet.data,
        sheet.sources,
    )
}
