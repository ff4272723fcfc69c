//! Request style negotiation.
//!
//! Providers in the wild implement several generations of the request API.
//! Each logical operation is a fixed, ordered list of request styles; the
//! executor tries them in order and the first style yielding a usable value
//! wins. A style fails softly when the provider lacks the capability, the
//! request errors or times out, or the response carries no usable value.
//! Soft failures are logged and absorbed; only a user rejection on the
//! authorization path is escalated immediately.

use crate::normalize::normalize_response;
use crate::provider::{InjectedProvider, RpcRequest, Vendor};
use connector_types::{ChainId, ConnectorError, ProviderError};
use serde_json::Value;
use std::fmt;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// One way of issuing a request to a provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestStyle {
	/// `send(method)`, resolving asynchronously.
	Send(&'static str),
	/// Legacy `enable()`.
	Enable,
	/// `send({method})`, returning synchronously.
	SendObject(&'static str),
}

impl fmt::Display for RequestStyle {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Send(method) => write!(f, "send({})", method),
			Self::Enable => f.write_str("enable()"),
			Self::SendObject(method) => write!(f, "send({{method: {}}})", method),
		}
	}
}

pub const REQUEST_AUTHORIZATION: &[RequestStyle] = &[
	RequestStyle::Send("eth_requestAccounts"),
	RequestStyle::Enable,
];

pub const GET_ACCOUNTS: &[RequestStyle] = &[
	RequestStyle::Send("eth_accounts"),
	RequestStyle::Enable,
	RequestStyle::SendObject("eth_accounts"),
];

pub const GET_CHAIN_ID: &[RequestStyle] = &[
	RequestStyle::Send("eth_chainId"),
	RequestStyle::Send("net_version"),
	RequestStyle::SendObject("net_version"),
];

pub const IS_AUTHORIZED: &[RequestStyle] = &[RequestStyle::Send("eth_accounts")];

/// Static properties scanned for a chain id, in priority order.
pub const STATIC_CHAIN_ID_PROPERTIES: [&str; 4] =
	["chainId", "netVersion", "networkVersion", "_chainId"];

/// Property holding Dapper's cached RPC results.
pub const DAPPER_CACHE_PROPERTY: &str = "cachedResults";

/// What to do with a user rejection seen inside a chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectionPolicy {
	/// Treat it like any other soft failure.
	Absorb,
	/// Abort the chain with [`ConnectorError::UserRejected`].
	Escalate,
}

/// Result of running a chain to completion without escalation.
#[derive(Debug, Clone, PartialEq)]
pub enum ChainOutcome<T> {
	Resolved(T),
	/// No style produced a usable value. `last_failure` holds the error of
	/// the final style if that style failed outright.
	Exhausted { last_failure: Option<ProviderError> },
}

/// Runs request-style chains against a provider.
#[derive(Debug, Clone, Default)]
pub struct FallbackExecutor {
	timeout: Option<Duration>,
}

impl FallbackExecutor {
	pub fn new(timeout: Option<Duration>) -> Self {
		Self { timeout }
	}

	/// Issues a single request in the given style and normalizes the response.
	pub async fn attempt(
		&self,
		provider: &dyn InjectedProvider,
		style: RequestStyle,
	) -> Result<Value, ProviderError> {
		let raw = match style {
			RequestStyle::Send(method) => {
				let sender = provider
					.sender()
					.ok_or_else(|| ProviderError::unsupported("send"))?;
				self.bounded(method, sender.send(method)).await?
			}
			RequestStyle::Enable => {
				let enabler = provider
					.legacy_enabler()
					.ok_or_else(|| ProviderError::unsupported("enable"))?;
				self.bounded("enable", enabler.enable()).await?
			}
			RequestStyle::SendObject(method) => {
				let sender = provider
					.sender()
					.ok_or_else(|| ProviderError::unsupported("send"))?;
				sender.send_object(&RpcRequest::new(method))?
			}
		};

		Ok(normalize_response(raw))
	}

	/// Tries `styles` in order until `extract` accepts a response.
	pub async fn run<T, F>(
		&self,
		provider: &dyn InjectedProvider,
		styles: &[RequestStyle],
		extract: F,
		policy: RejectionPolicy,
	) -> Result<ChainOutcome<T>, ConnectorError>
	where
		F: Fn(&Value) -> Option<T>,
	{
		let mut last_failure = None;

		for (index, style) in styles.iter().enumerate() {
			match self.attempt(provider, *style).await {
				Ok(value) => {
					if let Some(extracted) = extract(&value) {
						debug!(%style, "request style succeeded");
						return Ok(ChainOutcome::Resolved(extracted));
					}
					debug!(%style, "request style returned no usable value");
					last_failure = None;
				}
				Err(error) => {
					if policy == RejectionPolicy::Escalate && error.is_user_rejection() {
						warn!(%style, %error, "user rejected the request");
						return Err(ConnectorError::from_provider(error));
					}
					if let Some(next) = styles.get(index + 1) {
						warn!(%style, %error, fallback = %next, "request style failed, falling back");
					} else {
						warn!(%style, %error, "last request style failed");
					}
					last_failure = Some(error);
				}
			}
		}

		Ok(ChainOutcome::Exhausted { last_failure })
	}

	async fn bounded<F>(&self, label: &str, request: F) -> Result<Value, ProviderError>
	where
		F: Future<Output = Result<Value, ProviderError>>,
	{
		match self.timeout {
			Some(limit) => tokio::time::timeout(limit, request)
				.await
				.map_err(|_| ProviderError::timed_out(label))?,
			None => request.await,
		}
	}
}

/// Chain id from cached and static provider properties.
///
/// Dapper's result cache takes priority; otherwise the first static property
/// holding a chain id wins.
pub fn static_chain_id(provider: &dyn InjectedProvider) -> Option<ChainId> {
	if Vendor::Dapper.matches(provider) {
		let cached = provider
			.property(DAPPER_CACHE_PROPERTY)
			.and_then(|cache| cache.get("net_version").cloned())
			.map(normalize_response)
			.and_then(|value| ChainId::from_value(&value));
		if cached.is_some() {
			return cached;
		}
		debug!("Dapper result cache holds no chain id");
	}

	STATIC_CHAIN_ID_PROPERTIES.iter().find_map(|name| {
		provider
			.property(name)
			.and_then(|value| ChainId::from_value(&value))
	})
}
