//! Plugin lifecycle.
//!
//! [`AliasPlugin::activate`] loads settings, registers the "add alias"
//! command, and fans out one binder task per alias. Activation returns once
//! every binder has registered its proxy or fallback. Everything registered
//! belongs to a session that [`AliasPlugin::deactivate`] tears down; binders
//! still polling when their session closes drop their result.

use std::sync::{Arc, Weak};

use cmdalias_host::{Callback, CommandDef, CommandRegistry, Notification, Notifier};
use parking_lot::Mutex;
use rustc_hash::FxHashSet;
use tokio::runtime::Handle;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::binder::{BindOutcome, Binder};
use crate::error::{Result, SettingsError};
use crate::id::AliasId;
use crate::prompt::{ADD_ALIAS_COMMAND_ID, ADD_ALIAS_COMMAND_NAME, AliasPrompt, selectable_commands};
use crate::settings::{CommandDetection, Settings, SettingsStorage};
use crate::store::Alias;

/// Label shown in listings for aliases whose target is not registered.
pub const MISSING_TARGET_LABEL: &str = "command missing";

/// Collaborators the plugin is wired to.
pub struct PluginHost {
	pub registry: Arc<dyn CommandRegistry>,
	pub notifier: Arc<dyn Notifier>,
	pub storage: Arc<dyn SettingsStorage>,
	pub prompt: Arc<dyn AliasPrompt>,
}

/// Per-outcome binder counts for one activation.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ActivationReport {
	pub bound: usize,
	pub fallback: usize,
	/// Bindings dropped because the session closed or the alias was removed
	/// before they could be registered.
	pub discarded: usize,
	/// Binder tasks that panicked.
	pub failed: usize,
}

impl ActivationReport {
	pub fn total(&self) -> usize {
		self.bound + self.fallback + self.discarded + self.failed
	}
}

/// One row of the alias overview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasEntry {
	pub id: AliasId,
	pub alias: Alias,
	/// Current display name of the target, if registered.
	pub target_name: Option<String>,
}

impl AliasEntry {
	pub fn target_label(&self) -> &str {
		self.target_name.as_deref().unwrap_or(MISSING_TARGET_LABEL)
	}
}

#[derive(Default)]
struct SessionCommands {
	installed: FxHashSet<String>,
	/// Ids of removed aliases. Alias ids are never reused, so these stay
	/// blocked for the rest of the session.
	retired: FxHashSet<String>,
}

/// Commands registered during one activation.
struct Session {
	closed: CancellationToken,
	runtime: Handle,
	commands: Mutex<SessionCommands>,
}

impl Session {
	fn new(runtime: Handle) -> Self {
		Self {
			closed: CancellationToken::new(),
			runtime,
			commands: Mutex::new(SessionCommands::default()),
		}
	}

	/// Registers `def` unless the session has closed or the id was retired.
	fn install(&self, registry: &dyn CommandRegistry, def: CommandDef) -> bool {
		let mut commands = self.commands.lock();
		if self.closed.is_cancelled() || commands.retired.contains(&def.id) {
			return false;
		}
		commands.installed.insert(def.id.clone());
		registry.register(def);
		true
	}

	/// Unregisters `id` and refuses any later install of it.
	fn retire(&self, registry: &dyn CommandRegistry, id: &str) {
		let mut commands = self.commands.lock();
		commands.retired.insert(id.to_string());
		if commands.installed.remove(id) {
			registry.unregister(id);
		}
	}

	fn close(&self, registry: &dyn CommandRegistry) {
		self.closed.cancel();
		let ids: Vec<String> = self.commands.lock().installed.drain().collect();
		for id in &ids {
			registry.unregister(id);
		}
		tracing::debug!(commands = ids.len(), "alias.session.closed");
	}
}

/// Command alias plugin.
pub struct AliasPlugin {
	host: PluginHost,
	settings: Mutex<Settings>,
	session: Mutex<Option<Arc<Session>>>,
	this: Weak<AliasPlugin>,
}

impl AliasPlugin {
	pub fn new(host: PluginHost) -> Arc<Self> {
		Arc::new_cyclic(|this| Self {
			host,
			settings: Mutex::new(Settings::default()),
			session: Mutex::new(None),
			this: this.clone(),
		})
	}

	/// Replaces in-memory settings with the persisted ones.
	pub fn load_settings(&self) -> Result<()> {
		let settings = Settings::load(self.host.storage.as_ref())?;
		*self.settings.lock() = settings;
		Ok(())
	}

	pub fn save_settings(&self) -> Result<()> {
		let blob = self.settings.lock().to_value()?;
		self.host.storage.save(&blob)
	}

	/// Loads settings and binds every alias.
	///
	/// Must be called from within a tokio runtime. An already active session
	/// is torn down first.
	pub async fn activate(&self) -> ActivationReport {
		if let Err(error) = self.load_settings() {
			tracing::warn!(%error, "alias.activate.settings_unreadable");
			self.host
				.notifier
				.notify(Notification::error(format!("Failed to load alias settings: {error}")));
		}

		let session = self.open_session();
		session.install(self.host.registry.as_ref(), self.add_alias_command());

		let binder = self.binder(&session);
		let aliases = self.settings.lock().aliases.all();
		let mut binders = JoinSet::new();
		for (alias_id, alias) in aliases {
			binders.spawn(bind_and_install(
				binder.clone(),
				Arc::clone(&self.host.registry),
				Arc::clone(&session),
				alias_id,
				alias,
			));
		}

		let mut report = ActivationReport::default();
		while let Some(joined) = binders.join_next().await {
			match joined {
				Ok(Some(BindOutcome::Bound)) => report.bound += 1,
				Ok(Some(BindOutcome::Fallback)) => report.fallback += 1,
				Ok(None) => report.discarded += 1,
				Err(error) => {
					tracing::error!(%error, "alias.activate.binder_failed");
					report.failed += 1;
				}
			}
		}

		tracing::info!(
			bound = report.bound,
			fallback = report.fallback,
			discarded = report.discarded,
			failed = report.failed,
			"alias.activated"
		);
		report
	}

	/// Unregisters every command of the current session.
	pub fn deactivate(&self) {
		let session = self.session.lock().take();
		if let Some(session) = session {
			session.close(self.host.registry.as_ref());
			tracing::info!("alias.deactivated");
		}
	}

	/// Deactivates and activates again, re-running every binder.
	pub async fn reload(&self) -> ActivationReport {
		tracing::info!("alias.reload");
		self.deactivate();
		self.activate().await
	}

	/// Re-runs the binder of a single alias in the current session.
	///
	/// Returns `None` when inactive or when the alias does not exist.
	pub async fn rebind(&self, alias_id: &AliasId) -> Option<BindOutcome> {
		let session = self.current_session()?;
		let alias = self.settings.lock().aliases.get(alias_id.as_str()).cloned()?;
		let binding = self.binder(&session).bind(alias_id.clone(), alias).await;
		session
			.install(self.host.registry.as_ref(), binding.command)
			.then_some(binding.outcome)
	}

	pub fn is_active(&self) -> bool {
		self.session.lock().is_some()
	}

	/// Creates and persists an alias, binding it right away when active.
	///
	/// Blank names or targets are rejected. The alias stays in memory even if
	/// saving fails.
	pub fn add_alias(&self, name: &str, command_id: &str) -> Result<AliasId> {
		let alias = Alias::new(name.trim(), command_id.trim());
		let alias_id = self.settings.lock().aliases.insert(alias.clone())?;
		tracing::info!(alias_id = %alias_id, target = %alias.command_id, "alias.created");

		if let Some(session) = self.current_session() {
			session.runtime.spawn(bind_and_install(
				self.binder(&session),
				Arc::clone(&self.host.registry),
				Arc::clone(&session),
				alias_id.clone(),
				alias,
			));
		}

		self.save_settings()?;
		Ok(alias_id)
	}

	/// Deletes and persists an alias removal, dropping its live command.
	///
	/// Returns whether the alias existed.
	pub fn remove_alias(&self, alias_id: &AliasId) -> Result<bool> {
		let removed = self.settings.lock().aliases.delete(alias_id.as_str()).is_some();
		if let Some(session) = self.current_session() {
			session.retire(self.host.registry.as_ref(), &alias_id.command_id());
		}
		if removed {
			tracing::info!(alias_id = %alias_id, "alias.removed");
			self.save_settings()?;
		}
		Ok(removed)
	}

	/// Replaces and persists the detection policy used by later binds.
	pub fn set_detection(&self, detection: CommandDetection) -> Result<()> {
		self.settings.lock().command_detection = CommandDetection::new(detection.max_try, detection.msec_of_interval);
		self.save_settings()
	}

	pub fn detection(&self) -> CommandDetection {
		self.settings.lock().command_detection
	}

	pub fn aliases(&self) -> Vec<(AliasId, Alias)> {
		self.settings.lock().aliases.all()
	}

	/// Every alias with the current name of its target.
	pub fn listing(&self) -> Vec<AliasEntry> {
		let aliases = self.aliases();
		aliases
			.into_iter()
			.map(|(id, alias)| {
				let target_name = self.host.registry.lookup(&alias.command_id).map(|def| def.name);
				AliasEntry { id, alias, target_name }
			})
			.collect()
	}

	/// Runs the selection collaborator and creates the chosen alias.
	pub fn prompt_add_alias(&self) -> Option<AliasId> {
		let choices = selectable_commands(self.host.registry.as_ref());
		let request = self.host.prompt.prompt(&choices)?;
		match self.add_alias(&request.name, &request.command_id) {
			Ok(alias_id) => Some(alias_id),
			Err(SettingsError::EmptyField(field)) => {
				tracing::debug!(field, "alias.prompt.incomplete");
				None
			}
			Err(error) => {
				tracing::warn!(%error, "alias.prompt.save_failed");
				self.host
					.notifier
					.notify(Notification::error(format!("Failed to save alias settings: {error}")));
				None
			}
		}
	}

	fn current_session(&self) -> Option<Arc<Session>> {
		self.session.lock().clone()
	}

	fn open_session(&self) -> Arc<Session> {
		let session = Arc::new(Session::new(Handle::current()));
		let previous = self.session.lock().replace(Arc::clone(&session));
		if let Some(previous) = previous {
			previous.close(self.host.registry.as_ref());
		}
		session
	}

	fn binder(&self, session: &Session) -> Binder {
		let detection = self.detection();
		Binder::new(
			Arc::clone(&self.host.registry),
			Arc::clone(&self.host.notifier),
			detection,
			self.retry_callback(session),
		)
	}

	fn add_alias_command(&self) -> CommandDef {
		let plugin = self.this.clone();
		CommandDef::new(ADD_ALIAS_COMMAND_ID, ADD_ALIAS_COMMAND_NAME).with_callback(move || {
			if let Some(plugin) = plugin.upgrade() {
				plugin.prompt_add_alias();
			}
		})
	}

	/// Handler of fallback commands: reload the whole plugin.
	fn retry_callback(&self, session: &Session) -> Callback {
		let plugin = self.this.clone();
		let runtime = session.runtime.clone();
		Arc::new(move || {
			let Some(plugin) = plugin.upgrade() else {
				return;
			};
			tracing::info!("alias.fallback.retry");
			runtime.spawn(async move {
				plugin.reload().await;
			});
		})
	}
}

async fn bind_and_install(
	binder: Binder,
	registry: Arc<dyn CommandRegistry>,
	session: Arc<Session>,
	alias_id: AliasId,
	alias: Alias,
) -> Option<BindOutcome> {
	let binding = binder.bind(alias_id, alias).await;
	if !session.install(registry.as_ref(), binding.command) {
		tracing::debug!(alias_id = %binding.alias_id, "alias.bind.discarded");
		return None;
	}
	Some(binding.outcome)
}
