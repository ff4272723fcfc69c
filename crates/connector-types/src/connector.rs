//! The connector contract consumed by the dApp-connection framework.

use crate::chain::ChainId;
use crate::errors::Result;
use async_trait::async_trait;
use std::fmt;
use tokio::sync::mpsc;

/// Partial wallet state reported to the framework.
///
/// Every field is optional; only populated fields changed.
#[derive(Clone, PartialEq)]
pub struct ConnectorUpdate<P> {
	pub provider: Option<P>,
	pub chain_id: Option<ChainId>,
	pub account: Option<String>,
}

impl<P> ConnectorUpdate<P> {
	pub fn new() -> Self {
		Self {
			provider: None,
			chain_id: None,
			account: None,
		}
	}

	pub fn with_provider(mut self, provider: P) -> Self {
		self.provider = Some(provider);
		self
	}

	pub fn with_chain_id(mut self, chain_id: ChainId) -> Self {
		self.chain_id = Some(chain_id);
		self
	}

	pub fn with_account(mut self, account: impl Into<String>) -> Self {
		self.account = Some(account.into());
		self
	}
}

impl<P> Default for ConnectorUpdate<P> {
	fn default() -> Self {
		Self::new()
	}
}

// Providers are opaque handles, so only their presence is printed.
impl<P> fmt::Debug for ConnectorUpdate<P> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ConnectorUpdate")
			.field("provider", &self.provider.as_ref().map(|_| ".."))
			.field("chain_id", &self.chain_id)
			.field("account", &self.account)
			.finish()
	}
}

/// Notification delivered from a connector to the framework.
#[derive(Clone, PartialEq)]
pub enum ConnectorEvent<P> {
	Update(ConnectorUpdate<P>),
	Deactivate,
}

impl<P> fmt::Debug for ConnectorEvent<P> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Update(update) => f.debug_tuple("Update").field(update).finish(),
			Self::Deactivate => f.write_str("Deactivate"),
		}
	}
}

/// Sink the framework hands to a connector for state notifications.
pub trait ConnectorEventSink<P>: Send + Sync {
	fn emit_update(&self, update: ConnectorUpdate<P>);
	fn emit_deactivate(&self);
}

/// Sink that forwards notifications into an unbounded channel.
pub struct EventChannel<P> {
	sender: mpsc::UnboundedSender<ConnectorEvent<P>>,
}

impl<P> EventChannel<P> {
	/// Creates the sink together with the receiving end of the stream.
	pub fn unbounded() -> (Self, mpsc::UnboundedReceiver<ConnectorEvent<P>>) {
		let (sender, receiver) = mpsc::unbounded_channel();
		(Self { sender }, receiver)
	}
}

impl<P: Send> ConnectorEventSink<P> for EventChannel<P> {
	fn emit_update(&self, update: ConnectorUpdate<P>) {
		// A dropped receiver means nobody is listening anymore.
		let _ = self.sender.send(ConnectorEvent::Update(update));
	}

	fn emit_deactivate(&self) {
		let _ = self.sender.send(ConnectorEvent::Deactivate);
	}
}

/// Lifecycle contract every connector satisfies.
#[async_trait]
pub trait Connector: Send + Sync {
	/// Handle to the underlying wallet provider.
	type Provider: Clone + Send + Sync;

	/// Connects to the provider and requests authorization.
	async fn activate(&self) -> Result<ConnectorUpdate<Self::Provider>>;

	/// Currently installed provider, if any.
	async fn get_provider(&self) -> Option<Self::Provider>;

	async fn get_chain_id(&self) -> Result<Option<ChainId>>;

	async fn get_account(&self) -> Result<Option<String>>;

	/// Detaches from the provider. Safe to call repeatedly.
	fn deactivate(&self);

	/// Whether the provider already exposes an account without prompting.
	async fn is_authorized(&self) -> bool;

	/// Chains the application accepts, as configured at construction.
	fn supported_chain_ids(&self) -> Option<&[u64]>;
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_update_builder() {
		let update: ConnectorUpdate<u8> = ConnectorUpdate::new()
			.with_provider(7)
			.with_chain_id(ChainId::from("0x1"))
			.with_account("0xA");

		assert_eq!(update.provider, Some(7));
		assert_eq!(update.chain_id, Some(ChainId::from("0x1")));
		assert_eq!(update.account.as_deref(), Some("0xA"));
	}

	#[test]
	fn test_debug_hides_provider() {
		let update: ConnectorUpdate<u8> = ConnectorUpdate::new().with_provider(7);
		let printed = format!("{:?}", update);
		assert!(printed.contains("provider: Some(\"..\")"));
	}

	#[tokio::test]
	async fn test_event_channel_delivers_in_order() {
		let (sink, mut receiver) = EventChannel::<u8>::unbounded();
		sink.emit_update(ConnectorUpdate::new().with_account("0xA"));
		sink.emit_deactivate();

		assert_eq!(
			receiver.recv().await,
			Some(ConnectorEvent::Update(ConnectorUpdate::new().with_account("0xA")))
		);
		assert_eq!(receiver.recv().await, Some(ConnectorEvent::Deactivate));
	}

	#[test]
	fn test_event_channel_tolerates_dropped_receiver() {
		let (sink, receiver) = EventChannel::<u8>::unbounded();
		drop(receiver);
		sink.emit_deactivate();
	}
}
