//! Construction options shared by all connectors.

use crate::chain::ChainId;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Options forwarded to a connector at construction time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ConnectorOptions {
	/// Chains the application accepts. `None` accepts every chain.
	#[serde(default)]
	pub supported_chain_ids: Option<Vec<u64>>,
	/// Upper bound for a single provider request. `None` waits indefinitely.
	#[serde(default)]
	pub request_timeout_ms: Option<u64>,
}

impl ConnectorOptions {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_supported_chain_ids(mut self, chain_ids: Vec<u64>) -> Self {
		self.supported_chain_ids = Some(chain_ids);
		self
	}

	pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
		self.request_timeout_ms = Some(u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX));
		self
	}

	pub fn request_timeout(&self) -> Option<Duration> {
		self.request_timeout_ms.map(Duration::from_millis)
	}

	/// Whether `chain_id` is accepted. Ids that cannot be read as a number are
	/// only accepted when no restriction is configured.
	pub fn is_supported(&self, chain_id: &ChainId) -> bool {
		match &self.supported_chain_ids {
			None => true,
			Some(ids) => chain_id.to_u64().is_some_and(|id| ids.contains(&id)),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_unrestricted_by_default() {
		let options = ConnectorOptions::new();
		assert!(options.is_supported(&ChainId::from("0x1")));
		assert!(options.is_supported(&ChainId::from("unknown")));
		assert_eq!(options.request_timeout(), None);
	}

	#[test]
	fn test_supported_chain_ids() {
		let options = ConnectorOptions::new().with_supported_chain_ids(vec![1, 56]);
		assert!(options.is_supported(&ChainId::from("0x38")));
		assert!(options.is_supported(&ChainId::Number(1)));
		assert!(!options.is_supported(&ChainId::from("137")));
		assert!(!options.is_supported(&ChainId::from("unknown")));
	}

	#[test]
	fn test_request_timeout_round_trip() {
		let options = ConnectorOptions::new().with_request_timeout(Duration::from_secs(3));
		assert_eq!(options.request_timeout_ms, Some(3000));
		assert_eq!(options.request_timeout(), Some(Duration::from_secs(3)));
	}

	#[test]
	fn test_request_timeout_saturates() {
		let options = ConnectorOptions::new().with_request_timeout(Duration::MAX);
		assert_eq!(options.request_timeout_ms, Some(u64::MAX));
	}
}
