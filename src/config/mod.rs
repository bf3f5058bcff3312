//! Configuration module for racost.
//!
//! Handles the TOML settings file and environment variable expansion.

mod settings;

pub use settings::{
    expand_env_vars, CostSettings, Settings, SettingsError, StatsSettings, CONFIG_ENV_VAR,
};
