//! CERTUS CLI library: configuration, logging setup and subcommands.

pub mod commands;
pub mod config;
pub mod error;
pub mod sources;
pub mod telemetry;

pub use commands::{parse_groups, run_fields, run_render, run_validate, Session};
pub use config::{AuthConfig, CliConfig, ConfigError, DisplayConfig, LoggingConfig, CONFIG_ENV};
pub use error::CliError;
pub use sources::{FileCatalogFetcher, FileEnumFetcher};
