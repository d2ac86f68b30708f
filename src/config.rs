use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ProcessingError, Result};

/// Default moving-average window.
pub const DEFAULT_WINDOW_SIZE: usize = 5;

/// Settings that can be kept in a JSON file and overridden on the command line.
///
/// ```json
/// { "window_size": 7, "output_dir": "exports", "export_delimiter": "\t" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub window_size: usize,
    pub output_dir: Option<PathBuf>,
    pub export_delimiter: char,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_WINDOW_SIZE,
            output_dir: None,
            export_delimiter: ',',
        }
    }
}

impl AnalysisConfig {
    /// Read a configuration file. Missing keys keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let config_err = |message: String| ProcessingError::Config {
            path: path.to_path_buf(),
            message,
        };
        let text = std::fs::read_to_string(path).map_err(|e| config_err(e.to_string()))?;
        let config: AnalysisConfig =
            serde_json::from_str(&text).map_err(|e| config_err(e.to_string()))?;
        if !config.export_delimiter.is_ascii() {
            return Err(config_err(format!(
                "export_delimiter '{}' must be a single ASCII character",
                config.export_delimiter
            )));
        }
        Ok(config)
    }

    /// The export delimiter as the byte the CSV writer expects.
    pub fn delimiter_byte(&self) -> u8 {
        if self.export_delimiter.is_ascii() {
            self.export_delimiter as u8
        } else {
            b','
        }
    }

    /// File extension matching the export delimiter.
    pub fn export_extension(&self) -> &'static str {
        if self.export_delimiter == ',' {
            "csv"
        } else {
            "txt"
        }
    }
}
