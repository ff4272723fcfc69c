//! Scriptable in-memory provider for tests.
//!
//! Every capability is present unless switched off with the `without_*`
//! builders. Requests without a scripted reply fail with code 4200
//! (unsupported method). All calls are recorded as `kind:detail` strings.

use crate::provider::{
	EventHandler, EventSource, InjectedProvider, LegacyEnabler, ListenerRemoval, ProviderEventKind,
	RequestSender, RpcRequest,
};
use async_trait::async_trait;
use connector_types::ProviderError;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Scripted outcome of a request.
#[derive(Debug, Clone)]
pub enum MockReply {
	Value(Value),
	Error(ProviderError),
	/// Never resolves.
	Pending,
}

impl MockReply {
	pub fn value(value: Value) -> Self {
		Self::Value(value)
	}

	pub fn error(code: Option<i64>, message: &str) -> Self {
		Self::Error(ProviderError {
			code,
			message: message.to_string(),
		})
	}
}

#[derive(Default)]
struct MockState {
	send_replies: HashMap<String, MockReply>,
	object_replies: HashMap<String, MockReply>,
	enable_reply: Option<MockReply>,
	properties: HashMap<String, Value>,
	listeners: Vec<(ProviderEventKind, EventHandler)>,
	auto_refresh_on_network_change: Option<bool>,
	calls: Vec<String>,
}

pub struct MockProvider {
	state: Mutex<MockState>,
	supports_events: bool,
	supports_removal: bool,
	supports_send: bool,
	supports_enable: bool,
}

impl Default for MockProvider {
	fn default() -> Self {
		Self::new()
	}
}

impl MockProvider {
	pub fn new() -> Self {
		Self {
			state: Mutex::new(MockState::default()),
			supports_events: true,
			supports_removal: true,
			supports_send: true,
			supports_enable: true,
		}
	}

	pub fn without_events(mut self) -> Self {
		self.supports_events = false;
		self
	}

	pub fn without_removal(mut self) -> Self {
		self.supports_removal = false;
		self
	}

	pub fn without_send(mut self) -> Self {
		self.supports_send = false;
		self
	}

	pub fn without_enable(mut self) -> Self {
		self.supports_enable = false;
		self
	}

	pub fn on_send(self, method: &str, reply: MockReply) -> Self {
		self.state().send_replies.insert(method.to_string(), reply);
		self
	}

	pub fn on_send_object(self, method: &str, reply: MockReply) -> Self {
		self.state().object_replies.insert(method.to_string(), reply);
		self
	}

	pub fn on_enable(self, reply: MockReply) -> Self {
		self.state().enable_reply = Some(reply);
		self
	}

	pub fn with_property(self, name: &str, value: Value) -> Self {
		self.state().properties.insert(name.to_string(), value);
		self
	}

	/// Replaces the scripted reply of an async `send` after construction.
	pub fn set_send_reply(&self, method: &str, reply: MockReply) {
		self.state().send_replies.insert(method.to_string(), reply);
	}

	pub fn calls(&self) -> Vec<String> {
		self.state().calls.clone()
	}

	pub fn called(&self, call: &str) -> bool {
		self.state().calls.iter().any(|c| c == call)
	}

	pub fn listener_count(&self, event: ProviderEventKind) -> usize {
		self.state()
			.listeners
			.iter()
			.filter(|(kind, _)| *kind == event)
			.count()
	}

	pub fn auto_refresh_on_network_change(&self) -> Option<bool> {
		self.state().auto_refresh_on_network_change
	}

	/// Delivers `payload` to every handler registered for `event`.
	pub fn emit(&self, event: ProviderEventKind, payload: Value) {
		let handlers: Vec<EventHandler> = self
			.state()
			.listeners
			.iter()
			.filter(|(kind, _)| *kind == event)
			.map(|(_, handler)| handler.clone())
			.collect();

		for handler in handlers {
			handler.call(&payload);
		}
	}

	fn state(&self) -> MutexGuard<'_, MockState> {
		self.state.lock().unwrap_or_else(PoisonError::into_inner)
	}
}

fn unscripted(request: &str) -> ProviderError {
	ProviderError::with_code(4200, format!("The provider does not support {}", request))
}

impl EventSource for MockProvider {
	fn on(&self, event: ProviderEventKind, handler: EventHandler) {
		let mut state = self.state();
		state.calls.push(format!("on:{}", event));
		state.listeners.push((event, handler));
	}
}

impl ListenerRemoval for MockProvider {
	fn remove_listener(&self, event: ProviderEventKind, handler: &EventHandler) {
		let mut state = self.state();
		state.calls.push(format!("remove_listener:{}", event));
		state
			.listeners
			.retain(|(kind, registered)| !(*kind == event && registered == handler));
	}
}

#[async_trait]
impl RequestSender for MockProvider {
	async fn send(&self, method: &str) -> Result<Value, ProviderError> {
		let reply = {
			let mut state = self.state();
			state.calls.push(format!("send:{}", method));
			state.send_replies.get(method).cloned()
		};

		match reply {
			Some(MockReply::Value(value)) => Ok(value),
			Some(MockReply::Error(error)) => Err(error),
			Some(MockReply::Pending) => std::future::pending().await,
			None => Err(unscripted(method)),
		}
	}

	fn send_object(&self, request: &RpcRequest) -> Result<Value, ProviderError> {
		let reply = {
			let mut state = self.state();
			state.calls.push(format!("send_object:{}", request.method));
			state.object_replies.get(&request.method).cloned()
		};

		match reply {
			Some(MockReply::Value(value)) => Ok(value),
			Some(MockReply::Error(error)) => Err(error),
			Some(MockReply::Pending) | None => Err(unscripted(&request.method)),
		}
	}
}

#[async_trait]
impl LegacyEnabler for MockProvider {
	async fn enable(&self) -> Result<Value, ProviderError> {
		let reply = {
			let mut state = self.state();
			state.calls.push("enable".to_string());
			state.enable_reply.clone()
		};

		match reply {
			Some(MockReply::Value(value)) => Ok(value),
			Some(MockReply::Error(error)) => Err(error),
			Some(MockReply::Pending) => std::future::pending().await,
			None => Err(unscripted("enable")),
		}
	}
}

impl InjectedProvider for MockProvider {
	fn events(&self) -> Option<&dyn EventSource> {
		self.supports_events.then_some(self as &dyn EventSource)
	}

	fn listener_removal(&self) -> Option<&dyn ListenerRemoval> {
		self.supports_removal.then_some(self as &dyn ListenerRemoval)
	}

	fn sender(&self) -> Option<&dyn RequestSender> {
		self.supports_send.then_some(self as &dyn RequestSender)
	}

	fn legacy_enabler(&self) -> Option<&dyn LegacyEnabler> {
		self.supports_enable.then_some(self as &dyn LegacyEnabler)
	}

	fn property(&self, name: &str) -> Option<Value> {
		let mut state = self.state();
		state.calls.push(format!("property:{}", name));
		state.properties.get(name).cloned()
	}

	fn set_auto_refresh_on_network_change(&self, enabled: bool) {
		let mut state = self.state();
		state
			.calls
			.push(format!("set_auto_refresh_on_network_change:{}", enabled));
		state.auto_refresh_on_network_change = Some(enabled);
	}
}
