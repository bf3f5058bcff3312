//! TOML-based configuration for racost.
//!
//! Example configuration:
//! ```toml
//! [cost]
//! default_row_count = 100000
//! selectivity = 0.1
//! min_selection_cost = 1.0
//! join_factor = 0.01
//! min_join_cost = 50.0
//! max_depth = 1024
//!
//! [stats]
//! path = "${CATALOG_DIR}/stats.toml"
//! ```

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::planner::cost::{
    CostModel, DEFAULT_JOIN_FACTOR, DEFAULT_MAX_DEPTH, DEFAULT_MIN_JOIN_COST,
    DEFAULT_MIN_SELECTION_COST, DEFAULT_ROW_COUNT, DEFAULT_SELECTIVITY,
};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "RACOST_CONFIG";

/// Error type for settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Cost model constants.
    pub cost: CostSettings,

    /// Where table statistics come from.
    pub stats: StatsSettings,
}

/// Cost model constants, see [`CostModel`].
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CostSettings {
    /// Rows assumed for tables without statistics.
    pub default_row_count: u64,

    /// Fraction of rows kept by a selection.
    pub selectivity: f64,

    /// Lower bound on a selection's cost.
    pub min_selection_cost: f64,

    /// Factor applied to the product of the join inputs.
    pub join_factor: f64,

    /// Lower bound on a join's cost.
    pub min_join_cost: f64,

    /// Deepest plan the estimator accepts.
    pub max_depth: usize,
}

impl Default for CostSettings {
    fn default() -> Self {
        Self {
            default_row_count: DEFAULT_ROW_COUNT,
            selectivity: DEFAULT_SELECTIVITY,
            min_selection_cost: DEFAULT_MIN_SELECTION_COST,
            join_factor: DEFAULT_JOIN_FACTOR,
            min_join_cost: DEFAULT_MIN_JOIN_COST,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Table statistics source.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct StatsSettings {
    /// Path to a `.toml` or `.json` statistics file (supports ${ENV_VAR} expansion).
    pub path: Option<String>,
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SettingsError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, SettingsError> {
        Ok(toml::from_str(content)?)
    }

    /// Load settings from the default config file locations.
    ///
    /// Searches in order:
    /// 1. Environment variable `RACOST_CONFIG`
    /// 2. `./racost.toml`
    /// 3. `~/.config/racost/config.toml`
    pub fn load() -> Result<Self, SettingsError> {
        if let Ok(path) = env::var(CONFIG_ENV_VAR) {
            return Self::from_file(&path);
        }

        let local_config = PathBuf::from("racost.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("racost").join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        Ok(Settings::default())
    }

    /// Validated cost model built from the `[cost]` section.
    pub fn cost_model(&self) -> Result<CostModel, SettingsError> {
        let model = CostModel {
            default_row_count: self.cost.default_row_count,
            selectivity: self.cost.selectivity,
            min_selection_cost: self.cost.min_selection_cost,
            join_factor: self.cost.join_factor,
            min_join_cost: self.cost.min_join_cost,
            max_depth: self.cost.max_depth,
        };
        model
            .validate()
            .map_err(|e| SettingsError::InvalidConfig(e.to_string()))
    }

    /// Statistics file path with environment variables expanded.
    pub fn stats_path(&self) -> Result<Option<PathBuf>, SettingsError> {
        self.stats
            .path
            .as_deref()
            .map(|path| expand_env_vars(path).map(PathBuf::from))
            .transpose()
    }
}

/// Expand environment variables in a string.
///
/// Supports `${VAR}` and `$VAR` syntax. A `$` not followed by a name is kept.
pub fn expand_env_vars(s: &str) -> Result<String, SettingsError> {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;

    while let Some(pos) = rest.find('$') {
        result.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];

        let (name, remainder) = if let Some(braced) = after.strip_prefix('{') {
            match braced.find('}') {
                Some(end) => (&braced[..end], &braced[end + 1..]),
                None => (braced, ""),
            }
        } else {
            let end = after
                .find(|c: char| !(c.is_alphanumeric() || c == '_'))
                .unwrap_or(after.len());
            (&after[..end], &after[end..])
        };

        if name.is_empty() && !after.starts_with('{') {
            result.push('$');
        } else {
            let value =
                env::var(name).map_err(|_| SettingsError::MissingEnvVar(name.to_string()))?;
            result.push_str(&value);
        }
        rest = remainder;
    }

    result.push_str(rest);
    Ok(result)
}
