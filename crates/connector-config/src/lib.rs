//! Configuration for the injected wallet connector.
//!
//! Configuration is read from TOML, JSON or YAML (chosen by file extension),
//! then overridden from environment variables carrying a prefix
//! (`CONNECTOR_` by default):
//!
//! - `LOG_LEVEL`: `logging.level`
//! - `LOG_JSON`: `logging.json`
//! - `REQUEST_TIMEOUT_MS`: `connector.request_timeout_ms`

use thiserror::Error;

pub mod loader;
pub mod types;

pub use loader::{validate_config, ConfigFormat, ConfigLoader};
pub use types::{ConnectorConfig, LoggingConfig};

#[derive(Error, Debug)]
pub enum ConfigError {
	#[error("File not found: {0}")]
	FileNotFound(String),

	#[error("Unsupported config format: {0}")]
	UnsupportedFormat(String),

	#[error("Parse error: {0}")]
	Parse(String),

	#[error("Validation error: {0}")]
	Validation(String),

	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
}
