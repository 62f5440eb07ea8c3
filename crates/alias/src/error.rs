//! Error types for alias settings.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while editing, loading, or saving alias settings.
#[derive(Debug, Error)]
pub enum SettingsError {
	/// Error reading or writing a settings file.
	#[error("I/O error accessing {path}: {error}")]
	Io {
		/// Path to the file that failed.
		path: PathBuf,
		/// The underlying I/O error.
		error: std::io::Error,
	},

	/// The persisted blob is not valid JSON, or could not be encoded.
	#[error("settings JSON error: {0}")]
	Json(#[from] serde_json::Error),

	/// An alias field that must carry text is blank.
	#[error("alias {0} must not be empty")]
	EmptyField(&'static str),
}

/// Result type for settings operations.
pub type Result<T> = std::result::Result<T, SettingsError>;
