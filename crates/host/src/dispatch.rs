//! Host invocation dispatch.
//!
//! Mirrors how the host runs palette entries: an unconditional handler wins,
//! otherwise a checkable handler is asked first and then run.

use thiserror::Error;

use crate::CommandRegistry;

/// Errors surfaced when the host cannot run a command.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvokeError {
	/// No command is registered under the id.
	#[error("command not found: {0}")]
	NotFound(String),
	/// The command exists but carries no handler.
	#[error("command has no handler: {0}")]
	NoHandler(String),
	/// The checkable handler reported the command as not applicable.
	#[error("command not available: {0}")]
	Unavailable(String),
}

/// Runs the command registered under `id`.
pub fn execute(registry: &dyn CommandRegistry, id: &str) -> Result<(), InvokeError> {
	let def = registry.lookup(id).ok_or_else(|| InvokeError::NotFound(id.to_string()))?;
	tracing::debug!(command = %id, "host.dispatch.execute");

	if let Some(callback) = def.callback {
		callback();
		return Ok(());
	}
	if let Some(check) = def.check_callback {
		if !check(true) {
			return Err(InvokeError::Unavailable(id.to_string()));
		}
		check(false);
		return Ok(());
	}
	Err(InvokeError::NoHandler(id.to_string()))
}

/// Returns whether the command registered under `id` currently applies.
pub fn is_available(registry: &dyn CommandRegistry, id: &str) -> bool {
	let Some(def) = registry.lookup(id) else {
		return false;
	};
	match def.check_callback {
		Some(check) => check(true),
		None => def.callback.is_some(),
	}
}
