//! Capability model for injected wallet providers.
//!
//! An injected provider is an untrusted object whose method set depends on
//! the wallet vendor and its release. Each capability the connector may use
//! is a narrow trait, and [`InjectedProvider`] exposes them as optional
//! probes so callers check presence before every use.

use arc_swap::ArcSwapOption;
use async_trait::async_trait;
use connector_types::{ConnectorError, ProviderError};
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Shared handle to an injected provider.
pub type SharedProvider = Arc<dyn InjectedProvider>;

/// Lifecycle events a provider may emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderEventKind {
	ChainChanged,
	AccountsChanged,
	Close,
	NetworkChanged,
}

impl ProviderEventKind {
	pub const ALL: [Self; 4] = [
		Self::ChainChanged,
		Self::AccountsChanged,
		Self::Close,
		Self::NetworkChanged,
	];

	/// Event name as used by providers.
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::ChainChanged => "chainChanged",
			Self::AccountsChanged => "accountsChanged",
			Self::Close => "close",
			Self::NetworkChanged => "networkChanged",
		}
	}
}

impl fmt::Display for ProviderEventKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Callback registered with a provider.
///
/// Equality is identity: two handlers are equal only when they share the
/// same underlying callback, so a clone of a registered handler removes it.
#[derive(Clone)]
pub struct EventHandler {
	callback: Arc<dyn Fn(&Value) + Send + Sync>,
}

impl EventHandler {
	pub fn new(callback: impl Fn(&Value) + Send + Sync + 'static) -> Self {
		Self {
			callback: Arc::new(callback),
		}
	}

	pub fn call(&self, payload: &Value) {
		(self.callback)(payload)
	}

	pub fn same_as(&self, other: &EventHandler) -> bool {
		Arc::as_ptr(&self.callback) as *const () == Arc::as_ptr(&other.callback) as *const ()
	}
}

impl PartialEq for EventHandler {
	fn eq(&self, other: &Self) -> bool {
		self.same_as(other)
	}
}

impl Eq for EventHandler {}

impl fmt::Debug for EventHandler {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "EventHandler({:p})", Arc::as_ptr(&self.callback) as *const ())
	}
}

/// Object-style request, `{method, params}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RpcRequest {
	pub method: String,
	#[serde(skip_serializing_if = "Vec::is_empty")]
	pub params: Vec<Value>,
}

impl RpcRequest {
	pub fn new(method: impl Into<String>) -> Self {
		Self {
			method: method.into(),
			params: Vec::new(),
		}
	}
}

/// Event subscription (`on`).
pub trait EventSource: Send + Sync {
	fn on(&self, event: ProviderEventKind, handler: EventHandler);
}

/// Listener removal (`removeListener`).
pub trait ListenerRemoval: Send + Sync {
	fn remove_listener(&self, event: ProviderEventKind, handler: &EventHandler);
}

/// Generic request sending (`send`).
#[async_trait]
pub trait RequestSender: Send + Sync {
	/// Single-argument style: `send("eth_accounts")`.
	async fn send(&self, method: &str) -> Result<Value, ProviderError>;

	/// Synchronous object style: `send({method: "eth_accounts"})`.
	fn send_object(&self, _request: &RpcRequest) -> Result<Value, ProviderError> {
		Err(ProviderError::unsupported("object-style send"))
	}
}

/// Legacy authorization (`enable()`).
#[async_trait]
pub trait LegacyEnabler: Send + Sync {
	async fn enable(&self) -> Result<Value, ProviderError>;
}

/// An injected wallet provider.
///
/// Every capability defaults to absent; implementations opt in to what the
/// underlying object actually exposes.
pub trait InjectedProvider: Send + Sync {
	fn events(&self) -> Option<&dyn EventSource> {
		None
	}

	fn listener_removal(&self) -> Option<&dyn ListenerRemoval> {
		None
	}

	fn sender(&self) -> Option<&dyn RequestSender> {
		None
	}

	fn legacy_enabler(&self) -> Option<&dyn LegacyEnabler> {
		None
	}

	/// Reads a static or cached property such as `chainId` or `isMetaMask`.
	fn property(&self, _name: &str) -> Option<Value> {
		None
	}

	/// Toggles the vendor behavior of reloading the page on network change.
	fn set_auto_refresh_on_network_change(&self, _enabled: bool) {}
}

/// Wallet vendors recognized by their self-identification flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vendor {
	MetaMask,
	Dapper,
}

impl Vendor {
	pub fn flag(&self) -> &'static str {
		match self {
			Self::MetaMask => "isMetaMask",
			Self::Dapper => "isDapper",
		}
	}

	pub fn matches(&self, provider: &dyn InjectedProvider) -> bool {
		matches!(provider.property(self.flag()), Some(Value::Bool(true)))
	}
}

/// The well-known location an injected provider is published to.
///
/// The wallet may install or withdraw its provider at any time, so the slot
/// is read on every call and never cached by the connector.
#[derive(Clone, Default)]
pub struct ProviderSlot {
	inner: Arc<ArcSwapOption<SharedProvider>>,
}

impl ProviderSlot {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_provider(provider: SharedProvider) -> Self {
		let slot = Self::new();
		slot.install(provider);
		slot
	}

	pub fn install(&self, provider: SharedProvider) {
		self.inner.store(Some(Arc::new(provider)));
	}

	pub fn clear(&self) {
		self.inner.store(None);
	}

	pub fn current(&self) -> Option<SharedProvider> {
		self.inner.load_full().map(|provider| SharedProvider::clone(&provider))
	}

	/// Returns the installed provider or fails with [`ConnectorError::NoProvider`].
	pub fn locate(&self) -> Result<SharedProvider, ConnectorError> {
		self.current().ok_or(ConnectorError::NoProvider)
	}
}

impl fmt::Debug for ProviderSlot {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ProviderSlot")
			.field("installed", &self.inner.load().is_some())
			.finish()
	}
}
