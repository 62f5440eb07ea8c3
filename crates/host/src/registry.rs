use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::CommandDef;

/// Capability interface over the host's command map.
///
/// Lookups return owned descriptors so callers never hold the registry lock
/// while running a handler. Handlers are free to re-enter the registry.
pub trait CommandRegistry: Send + Sync {
	/// Returns the command currently registered under `id`.
	fn lookup(&self, id: &str) -> Option<CommandDef>;

	/// Registers `def` under its id. Last registration wins; the replaced
	/// descriptor is returned.
	fn register(&self, def: CommandDef) -> Option<CommandDef>;

	/// Removes the command registered under `id`.
	fn unregister(&self, id: &str) -> Option<CommandDef>;

	/// Snapshot of every registered command, in unspecified order.
	fn commands(&self) -> Vec<CommandDef>;
}

/// In-memory command registry.
#[derive(Debug, Default)]
pub struct HostRegistry {
	commands: RwLock<FxHashMap<String, CommandDef>>,
}

impl HostRegistry {
	/// Creates an empty registry.
	pub fn new() -> Self {
		Self::default()
	}

	pub fn len(&self) -> usize {
		self.commands.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.commands.read().is_empty()
	}

	pub fn contains(&self, id: &str) -> bool {
		self.commands.read().contains_key(id)
	}
}

impl CommandRegistry for HostRegistry {
	fn lookup(&self, id: &str) -> Option<CommandDef> {
		self.commands.read().get(id).cloned()
	}

	fn register(&self, def: CommandDef) -> Option<CommandDef> {
		tracing::trace!(command = %def.id, "host.registry.register");
		self.commands.write().insert(def.id.clone(), def)
	}

	fn unregister(&self, id: &str) -> Option<CommandDef> {
		tracing::trace!(command = %id, "host.registry.unregister");
		self.commands.write().remove(id)
	}

	fn commands(&self) -> Vec<CommandDef> {
		self.commands.read().values().cloned().collect()
	}
}
