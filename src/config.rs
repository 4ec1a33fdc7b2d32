//! Runtime configuration.
//!
//! Values resolve in this order (highest first):
//! 1. Environment variables (`KANBAN_DATABASE_URL`, `KANBAN_LOG`)
//! 2. TOML config file
//! 3. Compiled defaults

use crate::board::domain::BoardPolicy;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable overriding [`KanbanConfig::database_url`].
pub const DATABASE_URL_ENV: &str = "KANBAN_DATABASE_URL";

/// Environment variable overriding [`KanbanConfig::log_filter`].
pub const LOG_FILTER_ENV: &str = "KANBAN_LOG";

/// Log filter used when nothing else is configured.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to parse the TOML configuration.
    #[error("failed to parse config file: {0}")]
    ParseToml(#[from] toml::de::Error),

    /// The board policy is unusable.
    #[error("invalid board policy: {0}")]
    InvalidPolicy(String),
}

/// Fully resolved configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct KanbanConfig {
    /// `PostgreSQL` connection URL; in-memory storage is used when unset.
    pub database_url: Option<String>,
    /// `tracing-subscriber` filter directive.
    pub log_filter: String,
    /// Limits and default columns for new boards.
    pub policy: BoardPolicy,
}

impl Default for KanbanConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            log_filter: DEFAULT_LOG_FILTER.to_owned(),
            policy: BoardPolicy::default(),
        }
    }
}

impl KanbanConfig {
    /// Loads configuration from an optional file and the process
    /// environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file cannot be read or parsed, or
    /// the resulting policy is invalid.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(file) => Self::from_file(file)?,
            None => Self::default(),
        };
        config.apply_env(|name| std::env::var(name).ok());
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ReadFile`] or [`ConfigError::ParseToml`].
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Parses TOML text. Missing keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ParseToml`] on malformed or unknown keys.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Applies environment overrides read through `lookup`.
    ///
    /// Empty values are ignored.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_empty = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        if let Some(url) = non_empty(DATABASE_URL_ENV) {
            self.database_url = Some(url);
        }
        if let Some(filter) = non_empty(LOG_FILTER_ENV) {
            self.log_filter = filter;
        }
    }

    /// Checks the board policy.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPolicy`] when a limit is zero or a
    /// default column name is empty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let policy = &self.policy;
        if policy.max_title_chars == 0 {
            return Err(ConfigError::InvalidPolicy(
                "max_title_chars must be positive".to_owned(),
            ));
        }
        if policy
            .default_columns()
            .iter()
            .any(|name| name.is_empty())
        {
            return Err(ConfigError::InvalidPolicy(
                "default column names must not be empty".to_owned(),
            ));
        }
        Ok(())
    }
}
