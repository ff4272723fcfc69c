//! Configuration loading from files and environment.

use crate::types::{ConnectorConfig, LOG_LEVELS};
use crate::ConfigError;
use std::env;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Serialization format of a configuration file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
	Toml,
	Json,
	Yaml,
}

impl ConfigFormat {
	/// Picks the format from the file extension.
	pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
		match path.extension().and_then(|s| s.to_str()) {
			Some("toml") => Ok(Self::Toml),
			Some("json") => Ok(Self::Json),
			Some("yaml") | Some("yml") => Ok(Self::Yaml),
			_ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
		}
	}
}

/// Configuration loader with environment variable overrides
pub struct ConfigLoader {
	file_path: Option<PathBuf>,
	env_prefix: String,
}

impl Default for ConfigLoader {
	fn default() -> Self {
		Self::new()
	}
}

impl ConfigLoader {
	pub fn new() -> Self {
		Self {
			file_path: None,
			env_prefix: "CONNECTOR_".to_string(),
		}
	}

	pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
		self.file_path = Some(path.as_ref().to_path_buf());
		self
	}

	pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
		self.env_prefix = prefix.into();
		self
	}

	/// Loads the file (or defaults when none is set), applies environment
	/// overrides and validates the result.
	pub async fn load(&self) -> Result<ConnectorConfig, ConfigError> {
		let mut config = match &self.file_path {
			Some(path) => {
				info!("Loading configuration from {:?}", path);
				let contents = tokio::fs::read_to_string(path).await.map_err(|e| {
					if e.kind() == std::io::ErrorKind::NotFound {
						ConfigError::FileNotFound(path.display().to_string())
					} else {
						ConfigError::Io(e)
					}
				})?;
				Self::parse(&contents, ConfigFormat::from_path(path)?)?
			}
			None => {
				debug!("No configuration file given, using defaults");
				ConnectorConfig::default()
			}
		};

		self.apply_env_overrides(&mut config)?;
		validate_config(&config)?;
		Ok(config)
	}

	/// Parses configuration text in the given format.
	pub fn parse(contents: &str, format: ConfigFormat) -> Result<ConnectorConfig, ConfigError> {
		match format {
			ConfigFormat::Toml => {
				toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
			}
			ConfigFormat::Json => {
				serde_json::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
			}
			ConfigFormat::Yaml => {
				serde_yaml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
			}
		}
	}

	fn apply_env_overrides(&self, config: &mut ConnectorConfig) -> Result<(), ConfigError> {
		if let Ok(level) = env::var(format!("{}LOG_LEVEL", self.env_prefix)) {
			debug!("Overriding log level from environment");
			config.logging.level = level;
		}

		if let Ok(json) = env::var(format!("{}LOG_JSON", self.env_prefix)) {
			config.logging.json = json.parse().map_err(|e| {
				ConfigError::Validation(format!("Invalid {}LOG_JSON: {}", self.env_prefix, e))
			})?;
		}

		if let Ok(timeout) = env::var(format!("{}REQUEST_TIMEOUT_MS", self.env_prefix)) {
			debug!("Overriding request timeout from environment");
			config.connector.request_timeout_ms = Some(timeout.parse().map_err(|e| {
				ConfigError::Validation(format!(
					"Invalid {}REQUEST_TIMEOUT_MS: {}",
					self.env_prefix, e
				))
			})?);
		}

		Ok(())
	}
}

/// Validate configuration
pub fn validate_config(config: &ConnectorConfig) -> Result<(), ConfigError> {
	if let Some(chain_ids) = &config.connector.supported_chain_ids {
		if chain_ids.is_empty() {
			return Err(ConfigError::Validation(
				"supported_chain_ids must not be empty; omit it to accept every chain".to_string(),
			));
		}
		if chain_ids.contains(&0) {
			return Err(ConfigError::Validation(
				"supported_chain_ids must not contain 0".to_string(),
			));
		}
	}

	if config.connector.request_timeout_ms == Some(0) {
		return Err(ConfigError::Validation(
			"request_timeout_ms must be greater than 0".to_string(),
		));
	}

	let level = config.logging.level.to_ascii_lowercase();
	if !LOG_LEVELS.contains(&level.as_str()) {
		return Err(ConfigError::Validation(format!(
			"Unknown log level '{}'",
			config.logging.level
		)));
	}

	Ok(())
}
