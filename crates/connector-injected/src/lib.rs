//! Connector for browser-injected wallet providers.
//!
//! Wallet extensions publish a provider object whose API differs between
//! vendors and releases. [`InjectedConnector`] adapts such a provider to the
//! [`connector_types::Connector`] contract:
//!
//! - the [`ProviderSlot`] is checked before every operation,
//! - logical requests run through fixed fallback chains of request styles
//!   ([`fallback`]), with responses unwrapped by [`normalize_response`],
//! - provider events are republished as connector notifications by the
//!   [`EventBridge`].

pub mod bridge;
pub mod connector;
pub mod fallback;
pub mod normalize;
pub mod provider;

#[cfg(any(test, feature = "testing"))]
pub mod mock;

pub use bridge::EventBridge;
pub use connector::InjectedConnector;
pub use fallback::{ChainOutcome, FallbackExecutor, RejectionPolicy, RequestStyle};
pub use normalize::normalize_response;
pub use provider::{
	EventHandler, EventSource, InjectedProvider, LegacyEnabler, ListenerRemoval, ProviderEventKind,
	ProviderSlot, RequestSender, RpcRequest, SharedProvider, Vendor,
};
