//! Bounded lookup of alias targets.
//!
//! Commands from other extensions may register after this plugin activates.
//! The resolver polls the registry a fixed number of times with a fixed pause
//! after every miss, so one alias waits at most
//! `max_try * msec_of_interval` before giving up. Each alias runs its own
//! resolution; polls are never shared between aliases.

use cmdalias_host::{CommandDef, CommandRegistry};

use crate::settings::CommandDetection;

/// Result of one resolution run.
#[derive(Debug, Clone)]
pub enum Resolution {
	/// The command as it was registered when found.
	Resolved(CommandDef),
	/// Every poll missed.
	Unresolved,
}

impl Resolution {
	pub fn command(&self) -> Option<&CommandDef> {
		match self {
			Self::Resolved(def) => Some(def),
			Self::Unresolved => None,
		}
	}

	pub fn is_resolved(&self) -> bool {
		matches!(self, Self::Resolved(_))
	}
}

/// Polls `registry` for `command_id` under `detection`.
pub async fn resolve(registry: &dyn CommandRegistry, command_id: &str, detection: CommandDetection) -> Resolution {
	let attempts = detection.attempts();
	for attempt in 1..=attempts {
		if let Some(def) = registry.lookup(command_id) {
			tracing::trace!(command = %command_id, attempt, "alias.resolve.hit");
			return Resolution::Resolved(def);
		}
		tracing::trace!(command = %command_id, attempt, attempts, "alias.resolve.miss");
		tokio::time::sleep(detection.interval()).await;
	}
	Resolution::Unresolved
}
