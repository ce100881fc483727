//! Startup configuration and repository selection
//!
//! The storage mode and data-file path arrive from the environment (or
//! CLI); this module validates them and builds the matching repository.
//! An unrecognized storage mode is fatal: the server refuses to start
//! rather than guess.

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

use crate::storage::{FileHabitRepository, HabitRepository, InMemoryHabitRepository, StorageError};

/// Errors in startup configuration. None of these are recoverable.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid storage mode '{0}': expected 'memory' or 'file'")]
    InvalidStorageMode(String),

    #[error("Invalid frontend origin '{0}'")]
    InvalidFrontendOrigin(String),
}

/// Which repository backend to run against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageMode {
    Memory,
    File,
}

impl StorageMode {
    /// Parse the external selector, case-insensitively.
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        match s.to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "file" => Ok(Self::File),
            other => Err(ConfigError::InvalidStorageMode(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::File => "file",
        }
    }
}

/// Validated runtime configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub storage_mode: StorageMode,
    /// Used only by the file backend.
    pub data_file: PathBuf,
    pub frontend_origin: String,
}

/// Build the configured repository backend.
///
/// The file backend is initialized eagerly so a broken data file fails
/// startup instead of the first request.
pub async fn build_repository(
    config: &AppConfig,
) -> Result<Arc<dyn HabitRepository>, StorageError> {
    match config.storage_mode {
        StorageMode::Memory => {
            tracing::info!("using in-memory habit repository");
            Ok(Arc::new(InMemoryHabitRepository::new()))
        }
        StorageMode::File => {
            tracing::info!(path = %config.data_file.display(), "using file habit repository");
            let repository = FileHabitRepository::new(&config.data_file);
            repository.initialize().await?;
            Ok(Arc::new(repository))
        }
    }
}
