//! Translation of provider events into connector notifications.

use crate::normalize::{account_count, first_account};
use crate::provider::{EventHandler, InjectedProvider, ProviderEventKind, SharedProvider};
use connector_types::{ChainId, ConnectorEventSink, ConnectorUpdate};
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use tracing::{debug, warn};

type Sink = Arc<dyn ConnectorEventSink<SharedProvider>>;

/// Handlers registered on one provider.
///
/// The handler set is built when the bridge first attaches to a provider and
/// is the set removed from that provider on detach. `live` gates delivery,
/// so handlers a provider cannot remove stay muted once detached.
struct Attachment {
	provider: Weak<dyn InjectedProvider>,
	handlers: Vec<(ProviderEventKind, EventHandler)>,
	live: Arc<AtomicBool>,
}

impl Attachment {
	fn new(provider: &SharedProvider, sink: &Sink) -> Self {
		let weak = Arc::downgrade(provider);
		let live = Arc::new(AtomicBool::new(false));
		let handlers = ProviderEventKind::ALL
			.iter()
			.map(|kind| {
				let handler = build_handler(*kind, weak.clone(), sink.clone(), live.clone());
				(*kind, handler)
			})
			.collect();

		Self {
			provider: weak,
			handlers,
			live,
		}
	}

	fn is_on(&self, provider: &SharedProvider) -> bool {
		Weak::as_ptr(&self.provider) as *const () == Arc::as_ptr(provider) as *const ()
	}

	fn is_live(&self) -> bool {
		self.live.load(Ordering::SeqCst)
	}

	/// Mutes the handlers and removes them from the provider when possible.
	///
	/// Returns whether the handlers are no longer registered anywhere.
	fn detach(&self) -> bool {
		self.live.store(false, Ordering::SeqCst);

		let Some(provider) = self.provider.upgrade() else {
			debug!("provider gone, nothing to unsubscribe from");
			return true;
		};

		match provider.listener_removal() {
			Some(removal) => {
				for (kind, handler) in &self.handlers {
					removal.remove_listener(*kind, handler);
				}
				debug!("unsubscribed from provider events");
				true
			}
			None => {
				debug!("provider does not support listener removal");
				false
			}
		}
	}
}

/// Subscribes to provider events and republishes them as updates and
/// deactivations.
///
/// The bridge remembers the provider its handlers are registered on. Moving
/// to another provider detaches from the previous one first, and re-arming
/// the same provider reuses handlers it still holds. Events arriving while
/// the bridge is unsubscribed are dropped.
pub struct EventBridge {
	sink: Sink,
	attachment: Mutex<Option<Attachment>>,
}

impl EventBridge {
	pub fn new(sink: Sink) -> Self {
		Self {
			sink,
			attachment: Mutex::new(None),
		}
	}

	pub fn is_subscribed(&self) -> bool {
		self.attachment().as_ref().is_some_and(Attachment::is_live)
	}

	/// Whether the bridge's handlers are registered on `provider`.
	pub fn is_attached_to(&self, provider: &SharedProvider) -> bool {
		self.attachment()
			.as_ref()
			.is_some_and(|attachment| attachment.is_on(provider))
	}

	/// Handler currently registered for `kind`.
	pub fn handler(&self, kind: ProviderEventKind) -> Option<EventHandler> {
		self.attachment().as_ref().and_then(|attachment| {
			attachment
				.handlers
				.iter()
				.find(|(registered, _)| *registered == kind)
				.map(|(_, handler)| handler.clone())
		})
	}

	/// Registers all handlers when the provider supports subscriptions.
	///
	/// Returns whether the bridge is subscribed afterwards. Subscribing twice
	/// to the same provider does not register duplicates.
	pub fn subscribe(&self, provider: &SharedProvider) -> bool {
		let mut attachment = self.attachment();

		if let Some(current) = attachment.as_ref() {
			if current.is_on(provider) {
				if current.live.swap(true, Ordering::SeqCst) {
					debug!("event bridge already subscribed");
				} else {
					debug!("resuming handlers still registered on provider");
				}
				return true;
			}
			debug!("provider changed, moving event subscriptions");
			current.detach();
			*attachment = None;
		}

		let Some(events) = provider.events() else {
			debug!("provider does not support event subscriptions");
			return false;
		};

		let fresh = Attachment::new(provider, &self.sink);
		for (kind, handler) in &fresh.handlers {
			events.on(*kind, handler.clone());
		}
		fresh.live.store(true, Ordering::SeqCst);
		*attachment = Some(fresh);
		debug!("subscribed to provider events");
		true
	}

	/// Removes all handlers from the provider they were registered on.
	/// Idempotent; tolerates a vanished provider and a provider without
	/// listener removal.
	pub fn unsubscribe(&self) {
		let mut attachment = self.attachment();
		let Some(current) = attachment.as_ref() else {
			return;
		};
		if !current.is_live() {
			return;
		}

		if current.detach() {
			*attachment = None;
		}
	}

	fn attachment(&self) -> MutexGuard<'_, Option<Attachment>> {
		self.attachment.lock().unwrap_or_else(PoisonError::into_inner)
	}
}

fn build_handler(
	kind: ProviderEventKind,
	provider: Weak<dyn InjectedProvider>,
	sink: Sink,
	live: Arc<AtomicBool>,
) -> EventHandler {
	EventHandler::new(move |payload: &Value| {
		if !live.load(Ordering::SeqCst) {
			debug!(event = %kind, "dropping event received while unsubscribed");
			return;
		}

		debug!(event = %kind, %payload, "provider event");
		match kind {
			ProviderEventKind::ChainChanged | ProviderEventKind::NetworkChanged => {
				let Some(chain_id) = ChainId::from_value(payload) else {
					warn!(event = %kind, %payload, "ignoring event without a chain id");
					return;
				};
				let mut update = ConnectorUpdate::new().with_chain_id(chain_id);
				update.provider = provider.upgrade();
				sink.emit_update(update);
			}
			ProviderEventKind::AccountsChanged => match first_account(payload) {
				Some(account) => sink.emit_update(ConnectorUpdate::new().with_account(account)),
				None if account_count(payload) == Some(0) => sink.emit_deactivate(),
				None => warn!(event = %kind, %payload, "ignoring malformed account list"),
			},
			ProviderEventKind::Close => sink.emit_deactivate(),
		}
	})
}
