//! Persisted plugin settings.
//!
//! The blob layout is:
//!
//! ```json
//! {
//!   "aliases": { "1700000000000": { "name": "Bold", "commandId": "editor:toggle-bold" } },
//!   "commandDetection": { "maxTry": 5, "msecOfInterval": 200 }
//! }
//! ```
//!
//! Loading never fails on shape problems. Missing or mistyped fields fall
//! back to their defaults, and alias entries that cannot form a valid
//! [`Alias`] are dropped with a warning so the store holds no partial
//! entries.

mod storage;

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
pub use storage::{JsonFileStorage, MemoryStorage, SettingsStorage};

use crate::error::Result;
use crate::id::AliasId;
use crate::store::{Alias, AliasStore};

/// Default number of registry polls per alias.
pub const DEFAULT_MAX_TRY: u32 = 5;
/// Default pause between registry polls, in milliseconds.
pub const DEFAULT_MSEC_OF_INTERVAL: u64 = 200;

/// Bounded polling policy used when resolving alias targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandDetection {
	/// Number of registry polls, at least 1.
	pub max_try: u32,
	/// Fixed pause after each miss.
	pub msec_of_interval: u64,
}

impl Default for CommandDetection {
	fn default() -> Self {
		Self {
			max_try: DEFAULT_MAX_TRY,
			msec_of_interval: DEFAULT_MSEC_OF_INTERVAL,
		}
	}
}

impl CommandDetection {
	/// Creates a policy, clamping `max_try` to at least one poll.
	pub fn new(max_try: u32, msec_of_interval: u64) -> Self {
		Self {
			max_try: max_try.max(1),
			msec_of_interval,
		}
	}

	pub fn attempts(&self) -> u32 {
		self.max_try.max(1)
	}

	pub fn interval(&self) -> Duration {
		Duration::from_millis(self.msec_of_interval)
	}

	fn from_value(value: Option<&Value>) -> Self {
		let defaults = Self::default();
		let Some(section) = value.and_then(Value::as_object) else {
			return defaults;
		};

		let max_try = match section.get("maxTry").and_then(Value::as_u64) {
			Some(0) => {
				tracing::warn!("settings.command_detection.max_try_zero");
				1
			}
			Some(n) => u32::try_from(n).unwrap_or(u32::MAX),
			None => defaults.max_try,
		};
		let msec_of_interval = section
			.get("msecOfInterval")
			.and_then(Value::as_u64)
			.unwrap_or(defaults.msec_of_interval);

		Self { max_try, msec_of_interval }
	}
}

/// Everything the plugin persists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
	pub aliases: AliasStore,
	pub command_detection: CommandDetection,
}

impl Settings {
	/// Builds settings from a persisted blob, defaulting anything missing.
	pub fn from_value(value: &Value) -> Self {
		let mut aliases = AliasStore::new();
		if let Some(entries) = value.get("aliases").and_then(Value::as_object) {
			for (id, entry) in entries {
				let alias = match serde_json::from_value::<Alias>(entry.clone()) {
					Ok(alias) => alias,
					Err(error) => {
						tracing::warn!(alias_id = %id, %error, "settings.alias.malformed");
						continue;
					}
				};
				match alias.validate() {
					Ok(()) => aliases.restore(AliasId::new(id.as_str()), alias),
					Err(error) => tracing::warn!(alias_id = %id, %error, "settings.alias.invalid"),
				}
			}
		}

		Self {
			aliases,
			command_detection: CommandDetection::from_value(value.get("commandDetection")),
		}
	}

	pub fn to_value(&self) -> Result<Value> {
		Ok(serde_json::to_value(self)?)
	}

	/// Loads settings through `storage`, defaulting when nothing was saved.
	pub fn load(storage: &dyn SettingsStorage) -> Result<Self> {
		Ok(match storage.load()? {
			Some(blob) => Self::from_value(&blob),
			None => Self::default(),
		})
	}

	pub fn save(&self, storage: &dyn SettingsStorage) -> Result<()> {
		storage.save(&self.to_value()?)
	}
}
