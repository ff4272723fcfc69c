use anyhow::{anyhow, Context, Result};
use connector_config::LoggingConfig;
use std::str::FromStr;
use tracing::{info, Level};
use tracing_subscriber::{
	filter::LevelFilter, fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt,
};

/// Tracing configuration
#[derive(Debug, Clone)]
pub struct TracingConfig {
	pub level: Level,
	pub with_target: bool,
	pub with_file_and_line: bool,
	pub with_span_events: FmtSpan,
	pub json_format: bool,
}

impl Default for TracingConfig {
	fn default() -> Self {
		Self {
			level: Level::INFO,
			with_target: true,
			with_file_and_line: false,
			with_span_events: FmtSpan::NONE,
			json_format: false,
		}
	}
}

impl TracingConfig {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_level(mut self, level: Level) -> Self {
		self.level = level;
		self
	}

	pub fn with_json_format(mut self, json: bool) -> Self {
		self.json_format = json;
		self
	}

	pub fn debug() -> Self {
		Self {
			level: Level::DEBUG,
			with_file_and_line: true,
			with_span_events: FmtSpan::ENTER | FmtSpan::CLOSE,
			..Self::default()
		}
	}

	/// Builds the subscriber settings from the `logging` config section.
	pub fn from_logging(logging: &LoggingConfig) -> Result<Self> {
		let level = Level::from_str(&logging.level)
			.map_err(|_| anyhow!("Unknown log level '{}'", logging.level))?;

		Ok(Self {
			level,
			with_target: logging.with_target,
			json_format: logging.json,
			..Self::default()
		})
	}
}

/// Initialize tracing with the given configuration
///
/// Fails if a global subscriber is already installed.
pub fn init_tracing(config: TracingConfig) -> Result<()> {
	let subscriber = tracing_subscriber::registry().with(LevelFilter::from_level(config.level));

	if config.json_format {
		let json_layer = tracing_subscriber::fmt::layer()
			.json()
			.with_span_events(config.with_span_events)
			.with_file(config.with_file_and_line)
			.with_line_number(config.with_file_and_line)
			.with_target(config.with_target);

		subscriber
			.with(json_layer)
			.try_init()
			.context("Failed to initialize tracing")?;
	} else {
		let fmt_layer = tracing_subscriber::fmt::layer()
			.with_span_events(config.with_span_events)
			.with_file(config.with_file_and_line)
			.with_line_number(config.with_file_and_line)
			.with_target(config.with_target);

		subscriber
			.with(fmt_layer)
			.try_init()
			.context("Failed to initialize tracing")?;
	}

	info!("Tracing initialized with level: {:?}", config.level);
	Ok(())
}
