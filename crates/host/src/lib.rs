//! Host-side seams consumed by the alias core.
//!
//! The host application owns a mutable command map and a notification
//! surface. Both are modeled here as injected capabilities so the alias core
//! never touches ambient global state:
//!
//! - [`CommandRegistry`]: `lookup`/`register`/`unregister` over [`CommandDef`]
//!   descriptors, with [`HostRegistry`] as the in-memory implementation.
//! - [`dispatch`]: how the host runs a command or asks whether it is
//!   currently applicable.
//! - [`notifications`]: transient user-visible notices.

pub mod command;
pub mod dispatch;
pub mod notifications;
pub mod registry;

pub use command::{Callback, CheckCallback, CommandDef};
pub use dispatch::{InvokeError, execute, is_available};
pub use notifications::{Level, Notification, NotificationCenter, Notifier};
pub use registry::{CommandRegistry, HostRegistry};
