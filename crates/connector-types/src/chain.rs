//! Chain identifier as reported by wallet providers.

use alloy::primitives::U64;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Chain identifier
///
/// Providers report the selected chain either as a number or as a string
/// (decimal from `net_version`, `0x`-prefixed hex from `eth_chainId`). The
/// value is kept as reported; `to_u64` gives the numeric form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChainId {
	Number(u64),
	Text(String),
}

impl ChainId {
	/// Reads a chain id out of a raw provider value.
	///
	/// Empty strings, zero, `null`, booleans and containers count as "no
	/// value", matching how providers signal an unknown chain.
	pub fn from_value(value: &Value) -> Option<Self> {
		match value {
			Value::String(s) if !s.is_empty() => Some(Self::Text(s.clone())),
			Value::Number(n) => n.as_u64().filter(|id| *id != 0).map(Self::Number),
			_ => None,
		}
	}

	/// Numeric chain id, parsing decimal or `0x` hex text.
	pub fn to_u64(&self) -> Option<u64> {
		match self {
			Self::Number(id) => Some(*id),
			Self::Text(text) => U64::from_str(text.trim()).ok().map(|id| id.to::<u64>()),
		}
	}
}

impl fmt::Display for ChainId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Number(id) => write!(f, "{}", id),
			Self::Text(text) => write!(f, "{}", text),
		}
	}
}

impl From<u64> for ChainId {
	fn from(id: u64) -> Self {
		Self::Number(id)
	}
}

impl From<&str> for ChainId {
	fn from(text: &str) -> Self {
		Self::Text(text.to_string())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn test_from_value_keeps_reported_form() {
		assert_eq!(
			ChainId::from_value(&json!("56")),
			Some(ChainId::Text("56".into()))
		);
		assert_eq!(
			ChainId::from_value(&json!("0x1")),
			Some(ChainId::Text("0x1".into()))
		);
		assert_eq!(ChainId::from_value(&json!(137)), Some(ChainId::Number(137)));
	}

	#[test]
	fn test_from_value_rejects_empty_values() {
		assert_eq!(ChainId::from_value(&json!("")), None);
		assert_eq!(ChainId::from_value(&json!(0)), None);
		assert_eq!(ChainId::from_value(&Value::Null), None);
		assert_eq!(ChainId::from_value(&json!(false)), None);
		assert_eq!(ChainId::from_value(&json!(["0x1"])), None);
	}

	#[test]
	fn test_to_u64_parses_hex_and_decimal() {
		assert_eq!(ChainId::from("0x38").to_u64(), Some(56));
		assert_eq!(ChainId::from("56").to_u64(), Some(56));
		assert_eq!(ChainId::from(42161).to_u64(), Some(42161));
		assert_eq!(ChainId::from("mainnet").to_u64(), None);
	}

	#[test]
	fn test_serde_untagged() {
		let id: ChainId = serde_json::from_value(json!("0x1")).unwrap();
		assert_eq!(id, ChainId::Text("0x1".into()));
		let id: ChainId = serde_json::from_value(json!(10)).unwrap();
		assert_eq!(id, ChainId::Number(10));
		assert_eq!(ChainId::Number(10).to_string(), "10");
	}
}
