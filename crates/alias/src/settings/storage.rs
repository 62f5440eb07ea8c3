use std::io::Write;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use serde_json::Value;

use crate::error::{Result, SettingsError};

/// Load/save collaborator for the settings blob.
pub trait SettingsStorage: Send + Sync {
	/// Returns the saved blob, or `None` when nothing has been saved yet.
	fn load(&self) -> Result<Option<Value>>;

	fn save(&self, blob: &Value) -> Result<()>;
}

/// Settings kept in memory only.
#[derive(Debug, Default)]
pub struct MemoryStorage {
	blob: Mutex<Option<Value>>,
}

impl MemoryStorage {
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates storage pre-seeded with `blob`.
	pub fn with_blob(blob: Value) -> Self {
		Self { blob: Mutex::new(Some(blob)) }
	}

	/// Last saved blob.
	pub fn snapshot(&self) -> Option<Value> {
		self.blob.lock().clone()
	}
}

impl SettingsStorage for MemoryStorage {
	fn load(&self) -> Result<Option<Value>> {
		Ok(self.blob.lock().clone())
	}

	fn save(&self, blob: &Value) -> Result<()> {
		*self.blob.lock() = Some(blob.clone());
		Ok(())
	}
}

/// Settings stored as a pretty-printed JSON file.
///
/// Writes go to a sibling temp file that is renamed over the target, so a
/// crash mid-save leaves the previous file intact.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
	path: PathBuf,
}

impl JsonFileStorage {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	fn io_error(&self, error: std::io::Error) -> SettingsError {
		SettingsError::Io {
			path: self.path.clone(),
			error,
		}
	}
}

impl SettingsStorage for JsonFileStorage {
	fn load(&self) -> Result<Option<Value>> {
		let content = match std::fs::read_to_string(&self.path) {
			Ok(content) => content,
			Err(error) if error.kind() == std::io::ErrorKind::NotFound => return Ok(None),
			Err(error) => return Err(self.io_error(error)),
		};
		if content.trim().is_empty() {
			return Ok(None);
		}
		Ok(Some(serde_json::from_str(&content)?))
	}

	fn save(&self, blob: &Value) -> Result<()> {
		let dir = match self.path.parent() {
			Some(dir) if !dir.as_os_str().is_empty() => dir,
			_ => Path::new("."),
		};
		std::fs::create_dir_all(dir).map_err(|e| self.io_error(e))?;

		let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| self.io_error(e))?;
		serde_json::to_writer_pretty(&mut tmp, blob)?;
		tmp.write_all(b"\n").map_err(|e| self.io_error(e))?;
		tmp.persist(&self.path).map_err(|e| self.io_error(e.error))?;

		tracing::debug!(path = %self.path.display(), "settings.saved");
		Ok(())
	}
}
