//! JSON configuration file for comparison runs

use crate::accumulator::ReportDensity;
use crate::cell::EqualityMode;
use crate::csv_cursor::CsvOptions;
use crate::engine::{DiffOptions, KeyColumn};
use crate::error::{ReconError, Result};
use crate::sink::CellFormat;
use crate::value::DataType;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Current format version of the configuration file
pub const CONFIG_VERSION: &str = "1.0.0";

/// Settings read from a configuration file; command line flags override them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconConfig {
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,
    /// Key tuple; each entry a column name or 1-based position.
    /// `key_column` with a single entry is accepted too.
    #[serde(alias = "key_column", deserialize_with = "one_or_many")]
    pub key_columns: Vec<KeyColumn>,
    pub equality: EqualityMode,
    pub density: ReportDensity,
    pub max_changes: Option<u64>,
    /// Field content read as null
    pub null_token: Option<String>,
    pub delimiter: char,
    /// Declared column types by name
    pub types: IndexMap<String, DataType>,
    pub format: CellFormat,
}

impl Default for ReconConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION.to_string(),
            created: None,
            key_columns: Vec::new(),
            equality: EqualityMode::default(),
            density: ReportDensity::default(),
            max_changes: None,
            null_token: None,
            delimiter: ',',
            types: IndexMap::new(),
            format: CellFormat::default(),
        }
    }
}

impl ReconConfig {
    /// Load a configuration file
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(ReconError::config(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }
        let content = fs::read_to_string(path)?;
        let config: ReconConfig = serde_json::from_str(&content).map_err(|e| {
            ReconError::config(format!("Invalid configuration {}: {}", path.display(), e))
        })?;
        config.delimiter_byte()?;
        log::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Write a configuration template; an existing file is kept unless forced
    pub fn write_default(path: &Path, force: bool) -> Result<()> {
        if path.exists() && !force {
            return Err(ReconError::config(format!(
                "Configuration file already exists: {} (use --force to overwrite)",
                path.display()
            )));
        }

        let config = ReconConfig {
            created: Some(Utc::now()),
            ..ReconConfig::default()
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(&config)?)?;
        Ok(())
    }

    /// The delimiter as a single byte; the csv reader only takes ASCII
    pub fn delimiter_byte(&self) -> Result<u8> {
        if self.delimiter.is_ascii() {
            Ok(self.delimiter as u8)
        } else {
            Err(ReconError::config(format!(
                "The delimiter must be an ASCII character, got '{}'",
                self.delimiter
            )))
        }
    }

    pub fn to_diff_options(&self) -> DiffOptions {
        DiffOptions {
            key_columns: self.key_columns.clone(),
            equality: self.equality,
            density: self.density,
            max_changes: self.max_changes,
        }
    }

    /// Reader options for both sides; `types` are positional declarations
    pub fn to_csv_options(&self, types: Vec<DataType>) -> Result<CsvOptions> {
        Ok(CsvOptions {
            delimiter: self.delimiter_byte()?,
            null_token: self.null_token.clone(),
            types,
            named_types: self.types.clone(),
        })
    }
}

fn one_or_many<'de, D>(deserializer: D) -> std::result::Result<Vec<KeyColumn>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        Many(Vec<KeyColumn>),
        One(KeyColumn),
        None(()),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::Many(keys) => keys,
        OneOrMany::One(key) => vec![key],
        OneOrMany::None(()) => Vec::new(),
    })
}
