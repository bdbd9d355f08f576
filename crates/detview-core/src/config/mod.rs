//! Hierarchical configuration store and its on-disk persistence.

mod file;
mod table;

pub use file::{CONFIG_ENV, CONFIG_VERSION, VERSION_KEY, default_path, load, load_or_discard, save};
pub use table::{ConfigTable, ConfigValue};

use std::path::PathBuf;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("No table named {0}")]
    NoTable(String),
    #[error("No attribute named {0}")]
    NoAttribute(String),
    #[error("Attribute {name} is not {expected}")]
    WrongType { name: String, expected: &'static str },
    #[error("Configuration file not found: {}", .0.display())]
    NoFile(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Configuration version {found:?} does not match {expected}")]
    VersionMismatch { found: Option<i64>, expected: i64 },
}

impl ConfigError {
    /// Check if this is the recoverable "not found" class of error.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ConfigError::NoTable(_) | ConfigError::NoAttribute(_) | ConfigError::NoFile(_)
        )
    }
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;
