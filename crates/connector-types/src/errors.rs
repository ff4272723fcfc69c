//! Error types for the connector system.

use std::fmt;
use thiserror::Error;

/// Provider error code signalling that the user declined the request.
pub const USER_REJECTED_REQUEST: i64 = 4001;

pub type Result<T> = std::result::Result<T, ConnectorError>;

/// Errors surfaced to callers of a connector.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConnectorError {
	#[error("No injected provider found")]
	NoProvider,

	#[error("The user rejected the request")]
	UserRejected,

	#[error("Provider error: {0}")]
	Provider(ProviderError),
}

impl ConnectorError {
	/// Classifies a provider failure, recognizing the user-rejection code.
	pub fn from_provider(error: ProviderError) -> Self {
		if error.is_user_rejection() {
			Self::UserRejected
		} else {
			Self::Provider(error)
		}
	}
}

/// Failure reported by an injected provider.
///
/// Providers reject with loosely shaped error objects; only the numeric
/// `code` carries meaning the connector acts on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderError {
	pub code: Option<i64>,
	pub message: String,
}

impl ProviderError {
	pub fn new(message: impl Into<String>) -> Self {
		Self {
			code: None,
			message: message.into(),
		}
	}

	pub fn with_code(code: i64, message: impl Into<String>) -> Self {
		Self {
			code: Some(code),
			message: message.into(),
		}
	}

	/// The provider does not expose the capability needed for a request style.
	pub fn unsupported(capability: &str) -> Self {
		Self::new(format!("provider does not support {}", capability))
	}

	pub fn timed_out(method: &str) -> Self {
		Self::new(format!("request {} timed out", method))
	}

	pub fn is_user_rejection(&self) -> bool {
		self.code == Some(USER_REJECTED_REQUEST)
	}
}

impl fmt::Display for ProviderError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self.code {
			Some(code) => write!(f, "{} (code {})", self.message, code),
			None => write!(f, "{}", self.message),
		}
	}
}

impl std::error::Error for ProviderError {}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_user_rejection_is_classified() {
		let error = ProviderError::with_code(4001, "User denied account authorization");
		assert_eq!(
			ConnectorError::from_provider(error),
			ConnectorError::UserRejected
		);
	}

	#[test]
	fn test_other_codes_stay_unclassified() {
		let error = ProviderError::with_code(4100, "Unauthorized");
		assert_eq!(
			ConnectorError::from_provider(error.clone()),
			ConnectorError::Provider(error)
		);

		let error = ProviderError::new("enable is not a function");
		assert!(!error.is_user_rejection());
	}

	#[test]
	fn test_display_includes_code() {
		let error = ProviderError::with_code(4001, "rejected");
		assert_eq!(error.to_string(), "rejected (code 4001)");
		assert_eq!(ProviderError::new("boom").to_string(), "boom");
	}
}
