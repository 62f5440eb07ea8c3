//! Selection collaborator for creating aliases.

use cmdalias_host::CommandRegistry;

use crate::id::PROXY_COMMAND_PREFIX;

/// Registry id of the top-level "add alias" command.
pub const ADD_ALIAS_COMMAND_ID: &str = "add-alias";
/// Display name of the top-level "add alias" command.
pub const ADD_ALIAS_COMMAND_NAME: &str = "Add command alias";

/// A host command offered as an alias target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandChoice {
	pub id: String,
	pub name: String,
}

/// What the user picked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasRequest {
	pub name: String,
	pub command_id: String,
}

impl AliasRequest {
	pub fn new(name: impl Into<String>, command_id: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			command_id: command_id.into(),
		}
	}
}

/// UI that lets the user pick a target command and name an alias.
///
/// Returning `None` means the user dismissed the picker.
pub trait AliasPrompt: Send + Sync {
	fn prompt(&self, choices: &[CommandChoice]) -> Option<AliasRequest>;
}

/// Prompt that is always dismissed.
#[derive(Debug, Default, Clone, Copy)]
pub struct DismissedPrompt;

impl AliasPrompt for DismissedPrompt {
	fn prompt(&self, _choices: &[CommandChoice]) -> Option<AliasRequest> {
		None
	}
}

/// Host commands eligible as alias targets, sorted by name.
///
/// This plugin's own commands are left out so aliases never point at other
/// aliases.
pub fn selectable_commands(registry: &dyn CommandRegistry) -> Vec<CommandChoice> {
	let mut choices: Vec<_> = registry
		.commands()
		.into_iter()
		.filter(|def| def.id != ADD_ALIAS_COMMAND_ID && !def.id.starts_with(PROXY_COMMAND_PREFIX))
		.map(|def| CommandChoice { id: def.id, name: def.name })
		.collect();
	choices.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
	choices
}
