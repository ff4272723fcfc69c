//! Response envelope handling.
//!
//! Older providers resolve requests with a JSON-RPC style wrapper carrying
//! the payload under `result`; newer ones resolve with the bare payload.

use serde_json::Value;

/// Unwraps a `{"result": ..}` envelope, returning any other value untouched.
///
/// The presence of the `result` key decides, not its value: `{"result": null}`
/// unwraps to `null`.
pub fn normalize_response(raw: Value) -> Value {
	match raw {
		Value::Object(mut map) => match map.remove("result") {
			Some(result) => result,
			None => Value::Object(map),
		},
		other => other,
	}
}

/// Number of entries in an account-list payload, `None` when the payload is
/// not a list.
pub fn account_count(value: &Value) -> Option<usize> {
	value.as_array().map(Vec::len)
}

/// The active account: the first entry of an account-list payload.
pub fn first_account(value: &Value) -> Option<String> {
	value
		.as_array()?
		.first()?
		.as_str()
		.filter(|account| !account.is_empty())
		.map(str::to_string)
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn test_unwraps_result_envelope() {
		assert_eq!(normalize_response(json!({ "result": "56" })), json!("56"));
		assert_eq!(
			normalize_response(json!({ "id": 1, "jsonrpc": "2.0", "result": ["0xA"] })),
			json!(["0xA"])
		);
	}

	#[test]
	fn test_null_result_is_still_unwrapped() {
		assert_eq!(normalize_response(json!({ "result": null })), Value::Null);
	}

	#[test]
	fn test_bare_values_pass_through() {
		for value in [
			json!(["0xA", "0xB"]),
			json!([]),
			json!("0x1"),
			json!(56),
			json!(true),
			Value::Null,
			json!({ "accounts": ["0xA"] }),
		] {
			assert_eq!(normalize_response(value.clone()), value);
		}
	}

	#[test]
	fn test_only_one_level_is_unwrapped() {
		let nested = json!({ "result": { "result": "1" } });
		assert_eq!(normalize_response(nested), json!({ "result": "1" }));
	}

	#[test]
	fn test_account_extraction() {
		assert_eq!(
			first_account(&json!(["0xA", "0xB"])),
			Some("0xA".to_string())
		);
		assert_eq!(first_account(&json!([])), None);
		assert_eq!(first_account(&json!(true)), None);
		assert_eq!(first_account(&json!(["", "0xB"])), None);
		assert_eq!(first_account(&json!([7])), None);

		assert_eq!(account_count(&json!(["0xA", "0xB"])), Some(2));
		assert_eq!(account_count(&json!([])), Some(0));
		assert_eq!(account_count(&json!({ "accounts": [] })), None);
	}
}
