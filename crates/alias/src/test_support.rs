use std::sync::Arc;

use cmdalias_host::{CommandDef, CommandRegistry, HostRegistry, NotificationCenter};
use parking_lot::Mutex;
use rustc_hash::FxHashMap;

/// Registry wrapper that counts lookups per command id.
#[derive(Default)]
pub(crate) struct CountingRegistry {
	inner: HostRegistry,
	lookups: Mutex<FxHashMap<String, usize>>,
}

impl CountingRegistry {
	pub fn new() -> Arc<Self> {
		Arc::new(Self::default())
	}

	pub fn lookups(&self, id: &str) -> usize {
		self.lookups.lock().get(id).copied().unwrap_or(0)
	}
}

impl CommandRegistry for CountingRegistry {
	fn lookup(&self, id: &str) -> Option<CommandDef> {
		*self.lookups.lock().entry(id.to_string()).or_default() += 1;
		self.inner.lookup(id)
	}

	fn register(&self, def: CommandDef) -> Option<CommandDef> {
		self.inner.register(def)
	}

	fn unregister(&self, id: &str) -> Option<CommandDef> {
		self.inner.unregister(id)
	}

	fn commands(&self) -> Vec<CommandDef> {
		self.inner.commands()
	}
}

/// Messages of every queued notice, drained.
pub(crate) fn drain_messages(center: &NotificationCenter) -> Vec<String> {
	center.take_pending().into_iter().map(|n| n.message).collect()
}
