use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SettingsError};
use crate::id::{AliasId, IdClock};

/// A user-defined name bound to a target command id.
///
/// The target is not checked against the registry at creation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alias {
	/// Display name of the alias.
	pub name: String,
	/// Registry id of the target command.
	pub command_id: String,
}

impl Alias {
	pub fn new(name: impl Into<String>, command_id: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			command_id: command_id.into(),
		}
	}

	/// Rejects blank names and targets. Persisted entries are held to the
	/// same rule when loaded.
	pub fn validate(&self) -> Result<()> {
		if self.name.trim().is_empty() {
			return Err(SettingsError::EmptyField("name"));
		}
		if self.command_id.trim().is_empty() {
			return Err(SettingsError::EmptyField("commandId"));
		}
		Ok(())
	}
}

/// Mapping from [`AliasId`] to [`Alias`].
///
/// In-memory state is authoritative for the session. Nothing here writes to
/// disk; callers persist through [`Settings::save`](crate::Settings::save)
/// after every mutation.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct AliasStore {
	entries: BTreeMap<AliasId, Alias>,
	#[serde(skip)]
	clock: IdClock,
}

impl AliasStore {
	pub fn new() -> Self {
		Self::default()
	}

	/// Inserts a new alias under a freshly generated id.
	pub fn create(&mut self, name: impl Into<String>, command_id: impl Into<String>) -> Result<AliasId> {
		self.insert(Alias::new(name, command_id))
	}

	/// Stores `alias` with surrounding whitespace trimmed.
	///
	/// Fails without touching the store if a field is blank.
	pub fn insert(&mut self, alias: Alias) -> Result<AliasId> {
		let alias = Alias::new(alias.name.trim(), alias.command_id.trim());
		alias.validate()?;

		let mut id = self.clock.next();
		while self.entries.contains_key(&id) {
			id = self.clock.next();
		}
		self.entries.insert(id.clone(), alias);
		Ok(id)
	}

	/// Removes an alias. Unknown ids are ignored.
	pub fn delete(&mut self, id: &str) -> Option<Alias> {
		self.entries.remove(id)
	}

	/// Inserts an alias read back from persisted state.
	pub(crate) fn restore(&mut self, id: AliasId, alias: Alias) {
		self.entries.insert(id, alias);
	}

	pub fn get(&self, id: &str) -> Option<&Alias> {
		self.entries.get(id)
	}

	pub fn contains(&self, id: &str) -> bool {
		self.entries.contains_key(id)
	}

	/// Snapshot of every entry.
	pub fn all(&self) -> Vec<(AliasId, Alias)> {
		self.entries.iter().map(|(id, alias)| (id.clone(), alias.clone())).collect()
	}

	pub fn iter(&self) -> impl Iterator<Item = (&AliasId, &Alias)> {
		self.entries.iter()
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

impl PartialEq for AliasStore {
	fn eq(&self, other: &Self) -> bool {
		self.entries == other.entries
	}
}

impl Eq for AliasStore {}
