//! CLI schema and parsing helpers for the cmdalias binary.

use std::path::PathBuf;
use std::str::FromStr;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "cmdalias")]
#[command(about = "Manage command aliases and preview how they bind")]
#[command(version)]
/// Command-line arguments.
pub struct Cli {
	/// Settings file (defaults to the user config directory)
	#[arg(long, global = true, value_name = "PATH")]
	pub settings: Option<PathBuf>,

	/// Verbose logging
	#[arg(short, long, global = true)]
	pub verbose: bool,

	/// Subcommand to execute.
	#[command(subcommand)]
	pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
	/// List aliases and the commands they point at
	List {
		/// Host command to treat as registered
		#[arg(long = "provide", value_name = "ID[=NAME]")]
		provide: Vec<ProvidedCommand>,
	},
	/// Create an alias
	Add {
		/// Display name of the alias
		name: String,
		/// Id of the target command
		command_id: String,
	},
	/// Delete an alias
	Remove {
		/// Alias id as printed by `list`
		alias_id: String,
	},
	/// Show or change how long aliases wait for their targets
	Detection {
		/// Registry polls per alias
		#[arg(long)]
		max_try: Option<u32>,
		/// Pause between polls, in milliseconds
		#[arg(long, value_name = "MS")]
		interval: Option<u64>,
	},
	/// Activate against a host seeded with the given commands and show the result
	Bind {
		/// Host command to register before activation
		#[arg(long = "provide", value_name = "ID[=NAME]")]
		provide: Vec<ProvidedCommand>,
		/// Alias to invoke once bound
		#[arg(long, value_name = "ALIAS_ID")]
		invoke: Vec<String>,
	},
}

/// Host command given on the command line as `id` or `id=name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvidedCommand {
	pub id: String,
	pub name: String,
}

impl FromStr for ProvidedCommand {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let (id, name) = match s.split_once('=') {
			Some((id, name)) => (id.trim(), name.trim()),
			None => (s.trim(), s.trim()),
		};
		if id.is_empty() {
			return Err(format!("missing command id in '{s}'"));
		}
		let name = if name.is_empty() { id } else { name };
		Ok(Self {
			id: id.to_string(),
			name: name.to_string(),
		})
	}
}

/// `<config dir>/cmdalias/settings.json`, or a relative path when the
/// platform has no config directory.
pub fn default_settings_path() -> PathBuf {
	dirs::config_dir()
		.unwrap_or_else(|| PathBuf::from("."))
		.join("cmdalias")
		.join("settings.json")
}
