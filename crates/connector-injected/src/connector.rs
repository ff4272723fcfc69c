//! Connector for wallet providers injected into the page.

use crate::bridge::EventBridge;
use crate::fallback::{
	static_chain_id, ChainOutcome, FallbackExecutor, RejectionPolicy, GET_ACCOUNTS, GET_CHAIN_ID,
	IS_AUTHORIZED, REQUEST_AUTHORIZATION,
};
use crate::normalize::{account_count, first_account};
use crate::provider::{InjectedProvider, ProviderSlot, SharedProvider, Vendor};
use async_trait::async_trait;
use connector_types::{
	ChainId, Connector, ConnectorError, ConnectorEvent, ConnectorEventSink, ConnectorOptions,
	ConnectorUpdate, EventChannel, Result,
};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, info, instrument, warn};

/// Connects a dApp to the provider published in a [`ProviderSlot`].
///
/// The slot is consulted on every call, so a provider installed or withdrawn
/// after construction is picked up immediately.
///
/// Provider calls carry no deadline unless `request_timeout_ms` is set; a
/// hung provider otherwise hangs the calling operation. Requests in flight
/// when `deactivate` runs still complete and return to their caller.
pub struct InjectedConnector {
	slot: ProviderSlot,
	options: ConnectorOptions,
	executor: FallbackExecutor,
	bridge: EventBridge,
}

impl InjectedConnector {
	pub fn new(
		slot: ProviderSlot,
		options: ConnectorOptions,
		sink: Arc<dyn ConnectorEventSink<SharedProvider>>,
	) -> Self {
		let executor = FallbackExecutor::new(options.request_timeout());
		let bridge = EventBridge::new(sink);

		Self {
			slot,
			options,
			executor,
			bridge,
		}
	}

	/// Builds a connector whose notifications are delivered on a channel.
	pub fn with_event_channel(
		slot: ProviderSlot,
		options: ConnectorOptions,
	) -> (Self, UnboundedReceiver<ConnectorEvent<SharedProvider>>) {
		let (sink, receiver) = EventChannel::unbounded();
		(Self::new(slot, options, Arc::new(sink)), receiver)
	}

	pub fn slot(&self) -> &ProviderSlot {
		&self.slot
	}

	pub fn options(&self) -> &ConnectorOptions {
		&self.options
	}

	/// Whether provider events are currently being republished.
	pub fn is_listening(&self) -> bool {
		self.bridge.is_subscribed()
	}

	/// Asks the provider for account access and returns the first account.
	async fn request_authorization(&self, provider: &dyn InjectedProvider) -> Result<Option<String>> {
		let outcome = self
			.executor
			.run(
				provider,
				REQUEST_AUTHORIZATION,
				first_account,
				RejectionPolicy::Escalate,
			)
			.await?;

		match outcome {
			ChainOutcome::Resolved(account) => Ok(Some(account)),
			ChainOutcome::Exhausted {
				last_failure: Some(error),
			} => Err(ConnectorError::from_provider(error)),
			ChainOutcome::Exhausted { last_failure: None } => {
				warn!("provider granted access without reporting an account");
				Ok(None)
			}
		}
	}
}

#[async_trait]
impl Connector for InjectedConnector {
	type Provider = SharedProvider;

	#[instrument(skip(self))]
	async fn activate(&self) -> Result<ConnectorUpdate<SharedProvider>> {
		let provider = self.slot.locate()?;
		info!("Activating injected connector");

		self.bridge.subscribe(&provider);

		// The bridge reports network changes; the vendor reload would race it.
		if Vendor::MetaMask.matches(provider.as_ref()) {
			debug!("disabling MetaMask auto refresh on network change");
			provider.set_auto_refresh_on_network_change(false);
		}

		let account = self.request_authorization(provider.as_ref()).await?;

		let mut update = ConnectorUpdate::new().with_provider(provider);
		update.account = account;
		info!(account = ?update.account, "Injected connector activated");
		Ok(update)
	}

	async fn get_provider(&self) -> Option<SharedProvider> {
		self.slot.current()
	}

	#[instrument(skip(self))]
	async fn get_chain_id(&self) -> Result<Option<ChainId>> {
		let provider = self.slot.locate()?;

		let outcome = self
			.executor
			.run(
				provider.as_ref(),
				GET_CHAIN_ID,
				ChainId::from_value,
				RejectionPolicy::Absorb,
			)
			.await?;

		match outcome {
			ChainOutcome::Resolved(chain_id) => Ok(Some(chain_id)),
			ChainOutcome::Exhausted { .. } => {
				debug!("falling back to static provider properties for chain id");
				let chain_id = static_chain_id(provider.as_ref());
				if chain_id.is_none() {
					warn!("provider reported no chain id");
				}
				Ok(chain_id)
			}
		}
	}

	#[instrument(skip(self))]
	async fn get_account(&self) -> Result<Option<String>> {
		let provider = self.slot.locate()?;

		let outcome = self
			.executor
			.run(
				provider.as_ref(),
				GET_ACCOUNTS,
				first_account,
				RejectionPolicy::Absorb,
			)
			.await?;

		match outcome {
			ChainOutcome::Resolved(account) => Ok(Some(account)),
			ChainOutcome::Exhausted { .. } => {
				warn!("provider reported no account");
				Ok(None)
			}
		}
	}

	fn deactivate(&self) {
		self.bridge.unsubscribe();
		debug!("Injected connector deactivated");
	}

	async fn is_authorized(&self) -> bool {
		let Some(provider) = self.slot.current() else {
			return false;
		};

		let outcome = self
			.executor
			.run(
				provider.as_ref(),
				IS_AUTHORIZED,
				|value| account_count(value).map(|count| count > 0),
				RejectionPolicy::Absorb,
			)
			.await;

		matches!(outcome, Ok(ChainOutcome::Resolved(true)))
	}

	fn supported_chain_ids(&self) -> Option<&[u64]> {
		self.options.supported_chain_ids.as_deref()
	}
}
