// Command implementations

use std::path::PathBuf;
use std::time::Duration;

use autosheet_client::{
    autofill_index_column, autofill_selection, load_sheets, save_sheet, CancelToken, Gateway,
    NewSheetWizard, ResearchClient, MAX_INDEX_AUTOFILL,
};
use autosheet_config::Settings;
use autosheet_engine::{SheetId, Store, StoreError, StoreOptions};
use serde_json::json;

use crate::args::{parse_range, resolve_column};
use crate::output;
use crate::CliError;

/// Settings, service client and output mode shared by every command.
pub struct Context {
    pub settings: Settings,
    pub client: ResearchClient,
    pub json: bool,
}

impl Context {
    pub fn new(api_base: Option<String>, config: Option<PathBuf>, json: bool) -> Result<Self, CliError> {
        let mut settings = match config {
            Some(path) => Settings::load_from(&path),
            None => Settings::load(),
        };
        if let Some(base) = api_base {
            settings.api_base = base;
        }
        log::debug!("using research service at {}", settings.api_base);

        let client = ResearchClient::with_timeout(
            settings.api_base.clone(),
            Duration::from_secs(settings.timeout_secs),
        )?;
        Ok(Self { settings, client, json })
    }

    fn empty_store(&self) -> Store {
        Store::with_options(StoreOptions {
            default_row_count: self.settings.default_row_count,
            default_column_width: self.settings.default_column_width,
        })
    }

    /// Fresh store holding every sheet on the service.
    pub fn load(&self) -> Result<Store, CliError> {
        let mut store = self.empty_store();
        load_sheets(&mut store, &self.client)?;
        Ok(store)
    }

    /// Load, then resolve `key` (id or title) to a sheet id.
    fn load_sheet(&self, key: &str) -> Result<(Store, SheetId), CliError> {
        let store = self.load()?;
        let id = match store.find_sheet(key) {
            Some(sheet) => sheet.id().clone(),
            None => {
                return Err(CliError::not_found(format!("no sheet with id or title '{}'", key))
                    .with_hint("run `asheet list` to see available sheets"))
            }
        };
        Ok((store, id))
    }

    fn save(&self, store: &Store, id: &SheetId) -> Result<(), CliError> {
        save_sheet(store, &self.client, id)?;
        Ok(())
    }
}

pub fn cmd_list(ctx: &Context) -> Result<(), CliError> {
    let store = ctx.load()?;
    output::print_list(store.sheets(), ctx.json)?;
    Ok(())
}

pub fn cmd_show(ctx: &Context, key: &str) -> Result<(), CliError> {
    let (store, id) = ctx.load_sheet(key)?;
    if let Some(sheet) = store.sheet(&id) {
        output::print_sheet(sheet, ctx.json)?;
    }
    Ok(())
}

pub fn cmd_new(
    ctx: &Context,
    title: &str,
    description: &str,
    columns: Vec<String>,
    index: Option<String>,
) -> Result<(), CliError> {
    let mut store = ctx.empty_store();

    // Without --index the first column becomes the index column.
    let id = if columns.is_empty() {
        let mut wizard = NewSheetWizard::new();
        wizard.set_title(title);
        wizard.set_description(description);
        wizard.continue_with(&ctx.client)?;
        log::info!("suggested columns: {}", wizard.columns().join(", "));
        let index = index.or_else(|| wizard.columns().first().cloned());
        wizard.set_index_column(index.as_deref())?;
        wizard.finish(&mut store)?
    } else {
        if title.trim().is_empty() || description.trim().is_empty() {
            return Err(CliError::args("title and description are required"));
        }
        let index = index.or_else(|| columns.first().cloned()).unwrap_or_default();
        store.add_sheet(title.trim(), description.trim(), columns, &index)?
    };

    ctx.save(&store, &id)?;
    if let Some(sheet) = store.sheet(&id) {
        output::print_created(sheet, ctx.json)?;
    }
    Ok(())
}

pub fn cmd_set(
    ctx: &Context,
    key: &str,
    row: usize,
    column: &str,
    value: String,
    source: Option<String>,
) -> Result<(), CliError> {
    let (mut store, id) = ctx.load_sheet(key)?;
    let col = resolve_in(&store, &id, column)?;
    store.update_cell(&id, row, col, value, source.as_deref())?;
    ctx.save(&store, &id)?;

    if ctx.json {
        output::print_json(&json!({ "sheet": id, "row": row, "col": col }))?;
    }
    Ok(())
}

pub fn cmd_add_row(ctx: &Context, key: &str) -> Result<(), CliError> {
    let (mut store, id) = ctx.load_sheet(key)?;
    let row = store.add_row(&id)?;
    ctx.save(&store, &id)?;

    if ctx.json {
        output::print_json(&json!({ "sheet": id, "row": row }))?;
    } else {
        println!("added row {}", row);
    }
    Ok(())
}

pub fn cmd_add_column(ctx: &Context, key: &str, name: &str) -> Result<(), CliError> {
    let (mut store, id) = ctx.load_sheet(key)?;
    let col = store.add_column(&id, name)?;
    ctx.save(&store, &id)?;

    if ctx.json {
        output::print_json(&json!({ "sheet": id, "col": col, "name": name }))?;
    } else {
        println!("added column {} '{}'", col, name);
    }
    Ok(())
}

pub fn cmd_remove_column(ctx: &Context, key: &str, column: &str) -> Result<(), CliError> {
    let (mut store, id) = ctx.load_sheet(key)?;
    let col = resolve_in(&store, &id, column)?;
    let name = store.remove_column(&id, col)?;
    ctx.save(&store, &id)?;

    if ctx.json {
        output::print_json(&json!({ "sheet": id, "col": col, "name": name }))?;
    } else {
        println!("removed column {} '{}'", col, name);
    }
    Ok(())
}

pub fn cmd_move_column(ctx: &Context, key: &str, column: &str, to: usize) -> Result<(), CliError> {
    let (mut store, id) = ctx.load_sheet(key)?;
    let from = resolve_in(&store, &id, column)?;
    store.move_column(&id, from, to)?;
    ctx.save(&store, &id)?;

    if ctx.json {
        output::print_json(&json!({ "sheet": id, "from": from, "to": to }))?;
    }
    Ok(())
}

pub fn cmd_set_index(ctx: &Context, key: &str, column: Option<&str>) -> Result<(), CliError> {
    let (mut store, id) = ctx.load_sheet(key)?;
    let name = match column {
        Some(column) => {
            let col = resolve_in(&store, &id, column)?;
            store.sheet(&id).map(|s| s.columns()[col].clone()).unwrap_or_default()
        }
        None => String::new(),
    };
    store.set_index_column(&id, &name)?;
    ctx.save(&store, &id)?;

    if ctx.json {
        output::print_json(&json!({ "sheet": id, "indexColumn": name }))?;
    } else if name.is_empty() {
        println!("cleared index column");
    } else {
        println!("index column is '{}'", name);
    }
    Ok(())
}

pub fn cmd_fill_index(ctx: &Context, key: &str, count: Option<usize>) -> Result<(), CliError> {
    let count = count.unwrap_or(ctx.settings.index_autofill_count);
    if count == 0 || count > MAX_INDEX_AUTOFILL {
        return Err(CliError::args(format!("--count must be between 1 and {}", MAX_INDEX_AUTOFILL)));
    }

    let (mut store, id) = ctx.load_sheet(key)?;
    let written = autofill_index_column(&mut store, &ctx.client, &id, count)?;
    ctx.save(&store, &id)?;

    if ctx.json {
        output::print_json(&json!({ "sheet": id, "written": written }))?;
    } else {
        println!("wrote {} index values", written);
    }
    Ok(())
}

pub fn cmd_fill(ctx: &Context, key: &str, rows: &str, columns: &str) -> Result<(), CliError> {
    let (mut store, id) = ctx.load_sheet(key)?;
    let sheet = store.sheet(&id).ok_or_else(|| StoreError::SheetNotFound(id.clone()))?;
    let range = parse_range(sheet, rows, columns)?;

    let token = CancelToken::new();
    match autofill_selection(&mut store, &ctx.client, &id, range, &token) {
        Ok(report) => {
            ctx.save(&store, &id)?;
            if ctx.json {
                output::print_json(&json!({
                    "sheet": id,
                    "applied": report.applied,
                    "total": report.total,
                    "cancelled": report.cancelled,
                }))?;
            } else {
                println!("filled {} of {} rows", report.applied, report.total);
            }
            Ok(())
        }
        Err(err) => {
            // Rows written before the failure are kept.
            if err.applied > 0 {
                if let Err(save_err) = ctx.save(&store, &id) {
                    log::warn!("could not save partial fill: {}", save_err.message);
                }
            }
            Err(err.into())
        }
    }
}

pub fn cmd_suggest(ctx: &Context, description: &str) -> Result<(), CliError> {
    if description.trim().is_empty() {
        return Err(CliError::args("description is required"));
    }
    let columns = ctx.client.suggest_columns(description.trim())?;
    if ctx.json {
        output::print_json(&json!(columns))?;
    } else {
        for name in columns {
            println!("{}", name);
        }
    }
    Ok(())
}

fn resolve_in(store: &Store, id: &SheetId, column: &str) -> Result<usize, CliError> {
    let sheet = store.sheet(id).ok_or_else(|| StoreError::SheetNotFound(id.clone()))?;
    Ok(resolve_column(sheet, column)?)
}
