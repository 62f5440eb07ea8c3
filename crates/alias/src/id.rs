use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Prefix of every command id derived from an alias.
pub const PROXY_COMMAND_PREFIX: &str = "alias:";

/// Opaque alias key, unique within an [`AliasStore`](crate::AliasStore).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AliasId(String);

impl AliasId {
	pub fn new(id: impl Into<String>) -> Self {
		Self(id.into())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}

	/// Registry id of the proxy or fallback command bound to this alias.
	pub fn command_id(&self) -> String {
		format!("{PROXY_COMMAND_PREFIX}{}", self.0)
	}
}

impl fmt::Display for AliasId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl Borrow<str> for AliasId {
	fn borrow(&self) -> &str {
		&self.0
	}
}

impl From<&str> for AliasId {
	fn from(id: &str) -> Self {
		Self::new(id)
	}
}

impl From<String> for AliasId {
	fn from(id: String) -> Self {
		Self(id)
	}
}

/// Millisecond-timestamp id source that never hands out the same value twice.
///
/// Wall-clock readings that repeat or step backwards are bumped past the last
/// issued id.
#[derive(Debug, Clone, Default)]
pub struct IdClock {
	last: i64,
}

impl IdClock {
	pub fn new() -> Self {
		Self::default()
	}

	/// Issues an id from the current wall clock.
	pub fn next(&mut self) -> AliasId {
		self.next_at(chrono::Utc::now().timestamp_millis())
	}

	#[cfg(test)]
	pub(crate) fn starting_after(last: i64) -> Self {
		Self { last }
	}

	pub(crate) fn next_at(&mut self, now_ms: i64) -> AliasId {
		let id = now_ms.max(self.last.saturating_add(1));
		self.last = id;
		AliasId(id.to_string())
	}
}
