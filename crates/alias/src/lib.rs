//! Command aliases with late-binding proxy commands.
//!
//! An alias gives a stable name to a command id in the host registry. On
//! activation every alias is bound concurrently:
//!
//! 1. The [`resolver`] polls the registry for the target a bounded number of
//!    times, tolerating commands that register after this plugin.
//! 2. The [`binder`] registers `alias:<id>` as a proxy that mirrors the
//!    target's handler kinds and re-resolves the target on every call, or as a
//!    fallback whose only action is to reload the plugin.
//!
//! Aliases live in an [`AliasStore`] persisted as part of [`Settings`]
//! through a [`SettingsStorage`] collaborator. [`AliasPlugin`] drives the
//! lifecycle.

pub mod binder;
pub mod error;
pub mod id;
pub mod plugin;
pub mod prompt;
pub mod resolver;
pub mod settings;
pub mod store;

#[cfg(test)]
mod test_support;

pub use binder::{BindOutcome, Binder, Binding, FALLBACK_NAME_SUFFIX, MISSING_COMMAND_NOTICE};
pub use error::{Result, SettingsError};
pub use id::{AliasId, PROXY_COMMAND_PREFIX};
pub use plugin::{ActivationReport, AliasEntry, AliasPlugin, MISSING_TARGET_LABEL, PluginHost};
pub use prompt::{
	ADD_ALIAS_COMMAND_ID, ADD_ALIAS_COMMAND_NAME, AliasPrompt, AliasRequest, CommandChoice, DismissedPrompt, selectable_commands,
};
pub use resolver::{Resolution, resolve};
pub use settings::{CommandDetection, JsonFileStorage, MemoryStorage, Settings, SettingsStorage};
pub use store::{Alias, AliasStore};
