//! Research service HTTP client.
//!
//! Blocking reqwest client (no Tokio runtime required).
//! One request per call, no retries.

use std::time::Duration;

use autosheet_engine::Sheet;
use autosheet_protocol::{
    AutofillCellsRequest, AutofillIndexRequest, LoadSheetsResponse, ResultsResponse,
    SuggestColumnsRequest, PATH_AUTOFILL_CELLS, PATH_AUTOFILL_INDEX, PATH_LOAD_SHEETS,
    PATH_SAVE_SHEET, PATH_SUGGESTED_COLUMNS,
};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::gateway::{CellFill, Gateway};
use crate::snapshot::{sheet_from_record, sheet_to_record};

/// Request timeout when none is configured. Model-backed endpoints are slow.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Research service client (blocking).
#[derive(Clone)]
pub struct ResearchClient {
    http: reqwest::blocking::Client,
    api_base: String,
}

/// Error type for service calls.
#[derive(Debug)]
pub enum ClientError {
    /// Client could not be constructed
    Config(String),
    /// Network error
    Network(String),
    /// HTTP error with status code
    Http(u16, String),
    /// JSON parsing error
    Parse(String),
}

impl std::fmt::Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClientError::Config(msg) => write!(f, "Client setup failed: {}", msg),
            ClientError::Network(msg) => write!(f, "Network error: {}", msg),
            ClientError::Http(code, msg) => write!(f, "HTTP {}: {}", code, msg),
            ClientError::Parse(msg) => write!(f, "Parse error: {}", msg),
        }
    }
}

impl std::error::Error for ClientError {}

impl ResearchClient {
    /// Client for the service at `api_base` with the default timeout.
    pub fn new(api_base: impl Into<String>) -> Result<Self, ClientError> {
        Self::with_timeout(api_base, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(api_base: impl Into<String>, timeout: Duration) -> Result<Self, ClientError> {
        let http = reqwest::blocking::Client::builder()
            .user_agent(format!("autosheet/{}", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Config(e.to_string()))?;

        let api_base = api_base.into().trim_end_matches('/').to_string();
        Ok(Self { http, api_base })
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    // ── Internal helpers ────────────────────────────────────────────

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_base, path)
    }

    fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let url = self.url(path);
        log::debug!("GET {}", url);
        let response = self.http.get(&url)
            .send()
            .map_err(|e| ClientError::Network(e.to_string()))?;

        let response = check_status(response)?;
        response.json::<T>().map_err(|e| ClientError::Parse(e.to_string()))
    }

    fn post_json<B: Serialize>(&self, path: &str, body: &B) -> Result<reqwest::blocking::Response, ClientError> {
        let url = self.url(path);
        log::debug!("POST {}", url);
        let response = self.http.post(&url)
            .json(body)
            .send()
            .map_err(|e| ClientError::Network(e.to_string()))?;

        check_status(response)
    }

    fn post_for<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T, ClientError> {
        self.post_json(path, body)?
            .json::<T>()
            .map_err(|e| ClientError::Parse(e.to_string()))
    }
}

impl Gateway for ResearchClient {
    fn load_sheets(&self) -> Result<Vec<Sheet>, ClientError> {
        let resp: LoadSheetsResponse = self.get(PATH_LOAD_SHEETS)?;
        log::debug!("loaded {} sheets", resp.sheets.len());
        Ok(resp.sheets.into_iter().map(sheet_from_record).collect())
    }

    fn suggest_columns(&self, description: &str) -> Result<Vec<String>, ClientError> {
        let body = SuggestColumnsRequest { description: description.to_string() };
        let resp: ResultsResponse = self.post_for(PATH_SUGGESTED_COLUMNS, &body)?;
        Ok(resp.results)
    }

    fn autofill_index(
        &self,
        description: &str,
        col_name: &str,
        max_count: usize,
    ) -> Result<Vec<String>, ClientError> {
        let body = AutofillIndexRequest {
            description: description.to_string(),
            col_name: col_name.to_string(),
            max_count,
        };
        let resp: ResultsResponse = self.post_for(PATH_AUTOFILL_INDEX, &body)?;
        Ok(resp.results)
    }

    fn autofill_cells(
        &self,
        description: &str,
        columns: &[String],
        index_value: &str,
    ) -> Result<CellFill, ClientError> {
        let body = AutofillCellsRequest {
            description: description.to_string(),
            columns: columns.to_vec(),
            index_value: index_value.to_string(),
        };
        self.post_for(PATH_AUTOFILL_CELLS, &body)
    }

    fn save_sheet(&self, sheet: &Sheet) -> Result<(), ClientError> {
        log::debug!("saving sheet {}", sheet.id());
        self.post_json(PATH_SAVE_SHEET, &sheet_to_record(sheet))?;
        Ok(())
    }
}

fn check_status(response: reqwest::blocking::Response) -> Result<reqwest::blocking::Response, ClientError> {
    let status = response.status().as_u16();
    if !response.status().is_success() {
        let body = response.text().unwrap_or_default();
        return Err(ClientError::Http(status, body));
    }
    Ok(response)
}
