//! Table statistics supplied by the catalog.
//!
//! Statistics files come in two shapes:
//!
//! ```toml
//! [tables]
//! orders = 1000
//! customers = 250
//! ```
//!
//! ```json
//! {"orders": 1000, "customers": 250}
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Error type for loading statistics.
#[derive(Debug, thiserror::Error)]
pub enum StatsError {
    #[error("Failed to read statistics file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse TOML statistics: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Failed to parse JSON statistics: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Unsupported statistics file type: {0} (expected .toml or .json)")]
    UnsupportedFormat(PathBuf),
}

/// Row-count estimates keyed by table name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TableStats {
    rows: HashMap<String, u64>,
}

#[derive(Deserialize)]
struct StatsFile {
    #[serde(default)]
    tables: TableStats,
}

impl TableStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the row count for a table, returning the previous estimate.
    pub fn insert(&mut self, table: impl Into<String>, rows: u64) -> Option<u64> {
        self.rows.insert(table.into(), rows)
    }

    pub fn get(&self, table: &str) -> Option<u64> {
        self.rows.get(table).copied()
    }

    /// Row count for `table`, or `fallback` when the catalog has no entry.
    pub fn row_count_or(&self, table: &str, fallback: u64) -> u64 {
        self.get(table).unwrap_or(fallback)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.rows.iter().map(|(name, rows)| (name.as_str(), *rows))
    }

    /// Parse a TOML document with a `[tables]` section.
    pub fn from_toml_str(content: &str) -> Result<Self, StatsError> {
        let file: StatsFile = toml::from_str(content)?;
        Ok(file.tables)
    }

    /// Parse a flat JSON object of table name to row count.
    pub fn from_json_str(content: &str) -> Result<Self, StatsError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Load statistics from a `.toml` or `.json` file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, StatsError> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("toml") => Self::from_toml_str(&fs::read_to_string(path)?),
            Some("json") => Self::from_json_str(&fs::read_to_string(path)?),
            _ => Err(StatsError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

impl<S: Into<String>> FromIterator<(S, u64)> for TableStats {
    fn from_iter<I: IntoIterator<Item = (S, u64)>>(iter: I) -> Self {
        Self {
            rows: iter
                .into_iter()
                .map(|(name, rows)| (name.into(), rows))
                .collect(),
        }
    }
}
