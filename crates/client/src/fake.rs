// Scripted gateway for flow tests

use std::cell::RefCell;
use std::collections::VecDeque;

use autosheet_engine::Sheet;

use crate::client::ClientError;
use crate::gateway::{CellFill, Gateway};

/// Recorded call to the fake gateway.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Load,
    Suggest(String),
    Index { col_name: String, max_count: usize },
    Cells { columns: Vec<String>, index_value: String },
    Save(String),
}

/// In-memory gateway with scripted responses, recording every call.
#[derive(Default)]
pub struct FakeGateway {
    pub calls: RefCell<Vec<Call>>,
    pub sheets: RefCell<Option<Result<Vec<Sheet>, ClientError>>>,
    pub suggestions: RefCell<Option<Result<Vec<String>, ClientError>>>,
    pub index_values: RefCell<Option<Result<Vec<String>, ClientError>>>,
    pub cell_fills: RefCell<VecDeque<Result<CellFill, ClientError>>>,
    pub saved: RefCell<Vec<Sheet>>,
}

impl FakeGateway {
    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn push_fill(&self, values: &[&str], sources: &[&str]) {
        self.cell_fills.borrow_mut().push_back(Ok(CellFill {
            values: values.iter().map(|s| s.to_string()).collect(),
            sources: sources.iter().map(|s| s.to_string()).collect(),
        }));
    }

    pub fn push_fill_error(&self, error: ClientError) {
        self.cell_fills.borrow_mut().push_back(Err(error));
    }
}

fn unscripted<T>() -> Result<T, ClientError> {
    Err(ClientError::Http(501, "no scripted response".into()))
}

impl Gateway for FakeGateway {
    fn load_sheets(&self) -> Result<Vec<Sheet>, ClientError> {
        self.calls.borrow_mut().push(Call::Load);
        self.sheets.borrow_mut().take().unwrap_or_else(unscripted)
    }

    fn suggest_columns(&self, description: &str) -> Result<Vec<String>, ClientError> {
        self.calls.borrow_mut().push(Call::Suggest(description.to_string()));
        self.suggestions.borrow_mut().take().unwrap_or_else(unscripted)
    }

    fn autofill_index(&self, _description: &str, col_name: &str, max_count: usize) -> Result<Vec<String>, ClientError> {
        self.calls.borrow_mut().push(Call::Index { col_name: col_name.to_string(), max_count });
        self.index_values.borrow_mut().take().unwrap_or_else(unscripted)
    }

    fn autofill_cells(&self, _description: &str, columns: &[String], index_value: &str) -> Result<CellFill, ClientError> {
        self.calls.borrow_mut().push(Call::Cells {
            columns: columns.to_vec(),
            index_value: index_value.to_string(),
        });
        self.cell_fills.borrow_mut().pop_front().unwrap_or_else(unscripted)
    }

    fn save_sheet(&self, sheet: &Sheet) -> Result<(), ClientError> {
        self.calls.borrow_mut().push(Call::Save(sheet.id().to_string()));
        self.saved.borrow_mut().push(sheet.clone());
        Ok(())
    }
}
