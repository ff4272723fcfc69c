//! Configuration types for the connector.

use connector_types::ConnectorOptions;
use serde::{Deserialize, Serialize};

/// Log levels accepted by `logging.level`.
pub const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Complete connector configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ConnectorConfig {
	/// Options forwarded to the connector
	#[serde(default)]
	pub connector: ConnectorOptions,
	/// Diagnostics output
	#[serde(default)]
	pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LoggingConfig {
	/// Minimum level: trace, debug, info, warn or error
	#[serde(default = "default_log_level")]
	pub level: String,
	/// Emit JSON lines instead of human readable output
	#[serde(default)]
	pub json: bool,
	/// Include the event target (module path)
	#[serde(default = "default_true")]
	pub with_target: bool,
}

impl Default for LoggingConfig {
	fn default() -> Self {
		Self {
			level: default_log_level(),
			json: false,
			with_target: true,
		}
	}
}

fn default_log_level() -> String {
	"info".to_string()
}

fn default_true() -> bool {
	true
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_default_config() {
		let config = ConnectorConfig::default();
		assert_eq!(config.logging.level, "info");
		assert!(!config.logging.json);
		assert!(config.logging.with_target);
		assert_eq!(config.connector.supported_chain_ids, None);
		assert_eq!(config.connector.request_timeout_ms, None);
	}

	#[test]
	fn test_missing_sections_use_defaults() {
		let config: ConnectorConfig = serde_json::from_str("{}").unwrap();
		assert_eq!(config, ConnectorConfig::default());

		let config: ConnectorConfig =
			serde_json::from_str(r#"{ "logging": { "json": true } }"#).unwrap();
		assert_eq!(config.logging.level, "info");
		assert!(config.logging.json);
	}
}
