//! Dialect-specific operations outside the shared driver contract.
//!
//! A [`CapabilityRegistry`] maps an operation name (e.g. `"getLyric"`) to a
//! [`CapabilityFn`]. Lookup is explicit: callers ask the driver for a name and
//! get `None` when the dialect does not expose it.

use std::future::Future;
use std::pin::Pin;

use indexmap::IndexMap;
use serde_json::{Map, Value};
use tidelink_protocol::RawTrack;
use tidelink_runtime::Result;

use crate::driver::DriverCore;

/// Boxed capability future, borrowing the driver and player for `'a`.
pub type CapabilityFuture<'a> = Pin<Box<dyn Future<Output = Result<Option<Value>>> + Send + 'a>>;

/// Capability handler: driver core + player slice + named arguments.
pub type CapabilityFn = for<'a> fn(&'a DriverCore, &'a PlayerContext, CapabilityArgs) -> CapabilityFuture<'a>;

/// The part of an external player a capability needs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayerContext {
	pub guild_id: String,
	/// Track currently playing, if any.
	pub current: Option<RawTrack>,
}

impl PlayerContext {
	pub fn new(guild_id: impl Into<String>) -> Self {
		Self {
			guild_id: guild_id.into(),
			current: None,
		}
	}

	pub fn with_current(mut self, track: RawTrack) -> Self {
		self.current = Some(track);
		self
	}
}

/// Named arguments passed to a capability.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CapabilityArgs {
	values: Map<String, Value>,
}

impl CapabilityArgs {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
		self.values.insert(key.into(), value.into());
		self
	}

	pub fn get(&self, key: &str) -> Option<&Value> {
		self.values.get(key)
	}

	/// String argument, `None` when absent or not a string.
	pub fn str(&self, key: &str) -> Option<&str> {
		self.values.get(key).and_then(Value::as_str)
	}
}

/// Name-to-handler table, iterated in registration order.
#[derive(Clone, Default)]
pub struct CapabilityRegistry {
	entries: IndexMap<&'static str, CapabilityFn>,
}

impl CapabilityRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers `handler` under `name`, replacing any previous entry.
	pub fn register(&mut self, name: &'static str, handler: CapabilityFn) {
		self.entries.insert(name, handler);
	}

	pub fn get(&self, name: &str) -> Option<CapabilityFn> {
		self.entries.get(name).copied()
	}

	pub fn contains(&self, name: &str) -> bool {
		self.entries.contains_key(name)
	}

	pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
		self.entries.keys().copied()
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

impl std::fmt::Debug for CapabilityRegistry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_list().entries(self.names()).finish()
	}
}
