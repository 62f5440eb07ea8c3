//! Proxy command synthesis.
//!
//! Each alias becomes one registry command under `alias:<id>`. When the
//! target resolves, the proxy mirrors the target's handler kinds and
//! re-resolves the target on every call, so a renamed-then-restored or
//! replaced target keeps working. When it does not resolve, a fallback with a
//! single retry handler takes its place.

use std::sync::{Arc, Weak};

use cmdalias_host::{Callback, CheckCallback, CommandDef, CommandRegistry, Notification, Notifier};

use crate::id::AliasId;
use crate::resolver::{Resolution, resolve};
use crate::settings::CommandDetection;
use crate::store::Alias;

/// Notice shown when a proxy is invoked after its target disappeared.
pub const MISSING_COMMAND_NOTICE: &str = "Missing command. The command may be invalid.";

/// Display name suffix of fallback commands.
pub const FALLBACK_NAME_SUFFIX: &str = "Missing command. Run this and try rebinding.";

/// Terminal state of one bind attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindOutcome {
	/// A forwarding proxy was synthesized.
	Bound,
	/// The target never resolved; a retry command was synthesized.
	Fallback,
}

/// Command produced for one alias, ready to register.
#[derive(Debug, Clone)]
pub struct Binding {
	pub alias_id: AliasId,
	pub outcome: BindOutcome,
	pub command: CommandDef,
}

/// Builds proxy and fallback commands for aliases.
#[derive(Clone)]
pub struct Binder {
	registry: Arc<dyn CommandRegistry>,
	notifier: Arc<dyn Notifier>,
	detection: CommandDetection,
	retry: Callback,
}

impl Binder {
	/// `retry` becomes the handler of every fallback command.
	pub fn new(registry: Arc<dyn CommandRegistry>, notifier: Arc<dyn Notifier>, detection: CommandDetection, retry: Callback) -> Self {
		Self {
			registry,
			notifier,
			detection,
			retry,
		}
	}

	/// Resolves the alias target and synthesizes its command.
	pub async fn bind(&self, alias_id: AliasId, alias: Alias) -> Binding {
		let resolution = resolve(self.registry.as_ref(), &alias.command_id, self.detection).await;
		let (outcome, command) = match resolution {
			Resolution::Resolved(target) => {
				tracing::debug!(alias_id = %alias_id, target = %alias.command_id, "alias.bind.resolved");
				(BindOutcome::Bound, self.proxy(&alias_id, &alias, &target))
			}
			Resolution::Unresolved => {
				tracing::warn!(
					alias_id = %alias_id,
					target = %alias.command_id,
					attempts = self.detection.attempts(),
					"alias.bind.unresolved"
				);
				(BindOutcome::Fallback, self.fallback(&alias_id, &alias))
			}
		};
		Binding { alias_id, outcome, command }
	}

	/// Forwarding command whose handler kinds mirror `target`.
	pub fn proxy(&self, alias_id: &AliasId, alias: &Alias, target: &CommandDef) -> CommandDef {
		let mut command = CommandDef::new(alias_id.command_id(), alias.name.clone());
		if target.has_callback() {
			command.callback = Some(self.forward_callback(&alias.command_id));
		}
		if target.has_check_callback() {
			command.check_callback = Some(self.forward_check_callback(&alias.command_id));
		}
		command
	}

	/// Retry command registered in place of an unresolved alias.
	pub fn fallback(&self, alias_id: &AliasId, alias: &Alias) -> CommandDef {
		CommandDef {
			id: alias_id.command_id(),
			name: format!("{}: {FALLBACK_NAME_SUFFIX}", alias.name),
			callback: Some(Arc::clone(&self.retry)),
			check_callback: None,
		}
	}

	fn forward_callback(&self, target_id: &str) -> Callback {
		let registry = Arc::downgrade(&self.registry);
		let notifier = Arc::clone(&self.notifier);
		let target_id = target_id.to_string();
		Arc::new(move || {
			let Some(target) = current_target(&registry, &target_id) else {
				notifier.notify(Notification::warn(MISSING_COMMAND_NOTICE));
				return;
			};
			match target.callback {
				Some(callback) => callback(),
				None => tracing::debug!(target = %target_id, "alias.forward.no_callback"),
			}
		})
	}

	fn forward_check_callback(&self, target_id: &str) -> CheckCallback {
		let registry = Arc::downgrade(&self.registry);
		let notifier = Arc::clone(&self.notifier);
		let target_id = target_id.to_string();
		Arc::new(move |checking| {
			let Some(target) = current_target(&registry, &target_id) else {
				// A broken binding stays visible so the user can notice it.
				if checking {
					return true;
				}
				notifier.notify(Notification::warn(MISSING_COMMAND_NOTICE));
				return false;
			};
			match target.check_callback {
				Some(check) => check(checking),
				None => false,
			}
		})
	}
}

fn current_target(registry: &Weak<dyn CommandRegistry>, target_id: &str) -> Option<CommandDef> {
	registry.upgrade()?.lookup(target_id)
}
