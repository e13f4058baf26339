// Editor settings

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sheetgrid_core::GrowPolicy;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    // History
    #[serde(rename = "history.limit")]
    pub history_limit: usize,

    // Autosave
    #[serde(rename = "autosave.debounceMs")]
    pub autosave_debounce_ms: u64,

    // Grid
    #[serde(rename = "grid.defaultRows")]
    pub default_rows: usize,

    #[serde(rename = "grid.defaultCols")]
    pub default_cols: usize,

    #[serde(rename = "grid.defaultColumnWidth")]
    pub default_column_width: u32,

    #[serde(rename = "grid.defaultRowHeight")]
    pub default_row_height: u32,

    // Clipboard
    #[serde(rename = "paste.growPolicy")]
    pub paste_grow_policy: GrowPolicy,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            history_limit: 50,
            autosave_debounce_ms: 2000,
            default_rows: 50,
            default_cols: 26,
            default_column_width: 100,
            default_row_height: 24,
            paste_grow_policy: GrowPolicy::Grow,
        }
    }
}

/// Drop lines that start with `//` so the file can carry comments.
fn strip_comments(contents: &str) -> String {
    contents
        .lines()
        .filter(|line| !line.trim().starts_with("//"))
        .collect::<Vec<_>>()
        .join("\n")
}

const DEFAULT_FILE: &str = r#"{
    // Undo steps kept per document
    "history.limit": 50,

    // Quiet time after the last edit before the document is saved
    "autosave.debounceMs": 2000,

    // Size of a new sheet
    "grid.defaultRows": 50,
    "grid.defaultCols": 26,
    "grid.defaultColumnWidth": 100,
    "grid.defaultRowHeight": 24,

    // Pasting past the sheet edge: "grow" or "clamp"
    "paste.growPolicy": "grow"
}
"#;

impl EditorSettings {
    /// Get the settings file path
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("sheetgrid")
            .join("settings.json")
    }

    /// Load settings from the default location, writing a commented default
    /// file the first time.
    pub fn load() -> Self {
        let path = Self::config_path();
        if !path.exists() {
            if let Err(e) = Self::create_default_file(&path) {
                log::warn!("could not write default settings.json: {e}");
            }
            return Self::default();
        }
        Self::load_from(&path)
    }

    /// Load settings from `path`, falling back to defaults on any error.
    pub fn load_from(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match Self::parse(&contents) {
                Ok(settings) => settings,
                Err(e) => {
                    log::warn!("error parsing {}: {e}; using default settings", path.display());
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("error reading {}: {e}; using default settings", path.display());
                Self::default()
            }
        }
    }

    /// Parse settings JSON (with `//` comment lines). Missing keys take
    /// their defaults.
    pub fn parse(contents: &str) -> Result<Self, String> {
        let settings: Self = serde_json::from_str(&strip_comments(contents)).map_err(|e| e.to_string())?;
        Ok(settings.sanitized())
    }

    /// Save current settings to the default location
    pub fn save(&self) -> Result<(), String> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        // Ensure directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| e.to_string())?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|e| e.to_string())?;
        fs::write(path, json).map_err(|e| e.to_string())
    }

    fn create_default_file(path: &Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, DEFAULT_FILE)
    }

    /// Zero sizes and limits make no sense; bump them to 1.
    fn sanitized(mut self) -> Self {
        self.history_limit = self.history_limit.max(1);
        self.default_rows = self.default_rows.max(1);
        self.default_cols = self.default_cols.max(1);
        self.default_column_width = self.default_column_width.max(1);
        self.default_row_height = self.default_row_height.max(1);
        self
    }
}
