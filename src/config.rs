//! Configuration for the icon-sheet CLI
//!
//! Reads configuration from:
//! - `--config <file>` (`.yaml`, `.yml` or `.json`)
//! - `icon-sheet.yaml` / `icon-sheet.yml` / `icon-sheet.json` in the current directory

use crate::export::ExportOptions;
use crate::import::ImportOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Import settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    /// Report skipped symbols
    pub debug: bool,

    /// Passed through to the sheet loader
    pub headless: bool,

    /// Passed through to the sheet loader
    pub minify: bool,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            debug: false,
            headless: true,
            minify: true,
        }
    }
}

/// Export settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Hoist common width/height
    pub optimize: bool,

    /// Icon set prefix (detected from keys when unset)
    pub prefix: Option<String>,

    /// Pretty-print JSON output
    pub pretty: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            optimize: false,
            prefix: None,
            pretty: true,
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub import: ImportConfig,
    pub export: ExportConfig,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

        let config = match ext {
            "yaml" | "yml" => serde_yaml::from_str(&content)?,
            "json" => serde_json::from_str(&content)?,
            _ => {
                return Err(ConfigError::Invalid(format!(
                    "Unknown config file format: {}",
                    ext
                )))
            }
        };

        Ok(config)
    }

    /// Load configuration from the current directory, or defaults
    pub fn load_default() -> Result<Self, ConfigError> {
        Self::load_from_dir(Path::new("."))
    }

    /// Load the first config file found in `dir`, or defaults
    pub fn load_from_dir(dir: &Path) -> Result<Self, ConfigError> {
        let config_names = ["icon-sheet.yaml", "icon-sheet.yml", "icon-sheet.json"];

        for name in &config_names {
            let path: PathBuf = dir.join(name);
            if path.exists() {
                return Self::load(&path);
            }
        }

        Ok(Self::default())
    }

    /// Merge CLI arguments into configuration
    pub fn merge_cli(&mut self, optimize: bool, prefix: Option<String>, debug: bool) {
        if optimize {
            self.export.optimize = true;
        }
        if prefix.is_some() {
            self.export.prefix = prefix;
        }
        if debug {
            self.import.debug = true;
        }
    }

    /// Importer options for these settings
    pub fn import_options(&self) -> ImportOptions {
        ImportOptions {
            debug: self.import.debug,
            headless: self.import.headless,
            minify: self.import.minify,
            ..ImportOptions::default()
        }
    }

    pub fn export_options(&self) -> ExportOptions {
        ExportOptions {
            optimize: self.export.optimize,
        }
    }
}
