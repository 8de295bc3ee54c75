//! Error types for the CLI.

use std::path::PathBuf;

use certus_core::CatalogError;

use crate::config::ConfigError;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error("Invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to encode output: {0}")]
    Output(#[from] serde_json::Error),
    #[error("Failed to initialize logging: {0}")]
    Telemetry(String),
    #[error("{count} condition item(s) failed validation")]
    ValidationFailed { count: usize },
}

impl CliError {
    /// Process exit code: 1 for failed validation, 2 for everything else.
    pub fn exit_code(&self) -> u8 {
        match self {
            CliError::ValidationFailed { .. } => 1,
            _ => 2,
        }
    }
}
