//! Transient user-visible notices.
//!
//! Producers push [`Notification`]s through the [`Notifier`] seam. The host
//! frontend owns toast lifecycle and rendering; [`NotificationCenter`] just
//! queues them for it.

use std::collections::VecDeque;

use parking_lot::Mutex;

/// How loudly the frontend should present a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
	Info,
	/// A command could not do what was asked.
	Warn,
	/// Settings could not be read or written.
	Error,
}

/// A notice queued for the frontend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
	pub level: Level,
	pub message: String,
}

impl Notification {
	pub fn new(level: Level, message: impl Into<String>) -> Self {
		Self {
			level,
			message: message.into(),
		}
	}

	pub fn info(message: impl Into<String>) -> Self {
		Self::new(Level::Info, message)
	}

	pub fn warn(message: impl Into<String>) -> Self {
		Self::new(Level::Warn, message)
	}

	pub fn error(message: impl Into<String>) -> Self {
		Self::new(Level::Error, message)
	}
}

/// Sink for user-visible notices.
pub trait Notifier: Send + Sync {
	fn notify(&self, notification: Notification);
}

/// Queue of notifications awaiting presentation.
#[derive(Debug, Default)]
pub struct NotificationCenter {
	pending: Mutex<VecDeque<Notification>>,
}

impl NotificationCenter {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn is_empty(&self) -> bool {
		self.pending.lock().is_empty()
	}

	pub fn len(&self) -> usize {
		self.pending.lock().len()
	}

	pub fn clear(&self) {
		self.pending.lock().clear();
	}

	/// Drains every queued notification in arrival order.
	pub fn take_pending(&self) -> Vec<Notification> {
		self.pending.lock().drain(..).collect()
	}
}

impl Notifier for NotificationCenter {
	fn notify(&self, notification: Notification) {
		tracing::debug!(level = ?notification.level, message = %notification.message, "host.notify");
		self.pending.lock().push_back(notification);
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	#[test]
	fn center_drains_in_order() {
		let center = NotificationCenter::new();
		center.notify(Notification::info("first"));
		center.notify(Notification::warn("second"));
		assert_eq!(center.len(), 2);

		let drained = center.take_pending();
		assert_eq!(drained, vec![Notification::info("first"), Notification::warn("second")]);
		assert!(center.is_empty());
	}

	#[test]
	fn constructors_set_level() {
		let levels: Vec<_> = [Notification::info("a"), Notification::warn("b"), Notification::error("c")]
			.iter()
			.map(|n| n.level)
			.collect();
		assert_eq!(levels, vec![Level::Info, Level::Warn, Level::Error]);
	}
}
