use std::fmt;
use std::sync::Arc;

/// Unconditional invocation handler.
pub type Callback = Arc<dyn Fn() + Send + Sync>;

/// Conditional invocation handler.
///
/// Called with `checking = true` to ask whether the command currently
/// applies, and with `checking = false` to run it. The return value is only
/// meaningful in check mode. Host adapters that receive a non-boolean result
/// from a foreign handler must map it to `false`.
pub type CheckCallback = Arc<dyn Fn(bool) -> bool + Send + Sync>;

/// Command descriptor stored in a [`CommandRegistry`](crate::CommandRegistry).
///
/// A command may carry no handler, either handler kind, or both. Handler
/// presence is part of the descriptor's shape and is never implied.
#[derive(Clone)]
pub struct CommandDef {
	/// Unique registry key.
	pub id: String,
	/// Human-readable name shown in pickers and palettes.
	pub name: String,
	/// Fire-and-forget handler.
	pub callback: Option<Callback>,
	/// Checkable handler.
	pub check_callback: Option<CheckCallback>,
}

impl CommandDef {
	/// Creates a descriptor with no handlers.
	pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			name: name.into(),
			callback: None,
			check_callback: None,
		}
	}

	/// Attaches an unconditional handler.
	pub fn with_callback<F>(mut self, f: F) -> Self
	where
		F: Fn() + Send + Sync + 'static,
	{
		self.callback = Some(Arc::new(f));
		self
	}

	/// Attaches a conditional handler.
	pub fn with_check_callback<F>(mut self, f: F) -> Self
	where
		F: Fn(bool) -> bool + Send + Sync + 'static,
	{
		self.check_callback = Some(Arc::new(f));
		self
	}

	pub fn has_callback(&self) -> bool {
		self.callback.is_some()
	}

	pub fn has_check_callback(&self) -> bool {
		self.check_callback.is_some()
	}
}

impl fmt::Debug for CommandDef {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("CommandDef")
			.field("id", &self.id)
			.field("name", &self.name)
			.field("callback", &self.callback.is_some())
			.field("check_callback", &self.check_callback.is_some())
			.finish()
	}
}
