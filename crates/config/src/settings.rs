// Application settings
// Loaded from ~/.config/autosheet/settings.json

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Service address used when nothing else is configured.
pub const DEFAULT_API_BASE: &str = "http://localhost:8000";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // Service
    #[serde(rename = "service.baseUrl")]
    pub api_base: String,

    #[serde(rename = "service.timeoutSecs")]
    pub timeout_secs: u64,

    // Sheets
    #[serde(rename = "sheet.defaultRowCount")]
    pub default_row_count: usize,

    #[serde(rename = "grid.defaultColumnWidth")]
    pub default_column_width: f32,

    // Autofill
    #[serde(rename = "autofill.indexCount")]
    pub index_autofill_count: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            timeout_secs: 120, // model calls are slow
            default_row_count: 10,
            default_column_width: 200.0,
            index_autofill_count: 10,
        }
    }
}

impl Settings {
    /// Get the settings file path
    pub fn config_path() -> PathBuf {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("autosheet");
        config_dir.join("settings.json")
    }

    /// Load settings from the default location, falling back to defaults
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    /// Load settings from `path`. A missing file gets a commented default
    /// written in its place; an unreadable or invalid file yields defaults.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            let settings = Self::default();
            settings.create_default_file(path);
            return settings;
        }

        match fs::read_to_string(path) {
            Ok(contents) => match Self::parse(&contents) {
                Ok(settings) => settings,
                Err(e) => {
                    log::warn!("Error parsing {}: {}; using default settings", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Error reading {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Parse settings JSON, skipping `//` comment lines.
    pub fn parse(contents: &str) -> Result<Self, serde_json::Error> {
        let cleaned: String = contents
            .lines()
            .filter(|line| !line.trim().starts_with("//"))
            .collect::<Vec<_>>()
            .join("\n");
        serde_json::from_str(&cleaned)
    }

    /// Create default settings file with comments
    fn create_default_file(&self, path: &Path) {
        if let Some(parent) = path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                log::warn!("Error creating config directory: {}", e);
                return;
            }
        }

        let default_config = r#"{
    // Research service
    "service.baseUrl": "http://localhost:8000",
    "service.timeoutSecs": 120,

    // New sheets
    "sheet.defaultRowCount": 10,
    "grid.defaultColumnWidth": 200,

    // Rows requested when autofilling the index column (1-100)
    "autofill.indexCount": 10
}
"#;

        if let Err(e) = fs::write(path, default_config) {
            log::warn!("Error writing default settings.json: {}", e);
        }
    }
}
