//! cmdalias binary.
//!
//! Edits the alias settings file and previews activation against a host
//! registry seeded from the command line.

mod cli;

use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::Parser;
use cli::{Cli, Command, ProvidedCommand};
use cmdalias_core::{AliasId, AliasPlugin, CommandDetection, DismissedPrompt, JsonFileStorage, PluginHost};
use cmdalias_host::{CommandDef, CommandRegistry, HostRegistry, NotificationCenter, execute};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
	let args = Cli::parse();
	setup_tracing(args.verbose);

	let path = args.settings.clone().unwrap_or_else(cli::default_settings_path);
	tracing::debug!(path = %path.display(), "cli.settings_path");

	let registry = Arc::new(HostRegistry::new());
	let notices = Arc::new(NotificationCenter::new());
	let plugin = AliasPlugin::new(PluginHost {
		registry: registry.clone(),
		notifier: notices.clone(),
		storage: Arc::new(JsonFileStorage::new(&path)),
		prompt: Arc::new(DismissedPrompt),
	});

	match args.command {
		Command::List { provide } => {
			seed(&registry, &provide);
			plugin
				.load_settings()
				.with_context(|| format!("reading {}", path.display()))?;
			for entry in plugin.listing() {
				println!("{}\t{}\t{}\t{}", entry.id, entry.alias.name, entry.alias.command_id, entry.target_label());
			}
		}
		Command::Add { name, command_id } => {
			plugin
				.load_settings()
				.with_context(|| format!("reading {}", path.display()))?;
			let alias_id = plugin.add_alias(&name, &command_id)?;
			println!("{alias_id}");
		}
		Command::Remove { alias_id } => {
			plugin
				.load_settings()
				.with_context(|| format!("reading {}", path.display()))?;
			if !plugin.remove_alias(&AliasId::new(alias_id.as_str()))? {
				bail!("no alias with id {alias_id}");
			}
		}
		Command::Detection { max_try, interval } => {
			plugin
				.load_settings()
				.with_context(|| format!("reading {}", path.display()))?;
			let current = plugin.detection();
			if max_try.is_some() || interval.is_some() {
				plugin.set_detection(CommandDetection::new(
					max_try.unwrap_or(current.max_try),
					interval.unwrap_or(current.msec_of_interval),
				))?;
			}
			let detection = plugin.detection();
			println!("maxTry\t{}\nmsecOfInterval\t{}", detection.max_try, detection.msec_of_interval);
		}
		Command::Bind { provide, invoke } => {
			seed(&registry, &provide);
			let report = plugin.activate().await;
			println!(
				"bound {}, fallback {}, discarded {}, failed {}",
				report.bound, report.fallback, report.discarded, report.failed
			);

			for (alias_id, _) in plugin.aliases() {
				let command_id = alias_id.command_id();
				if let Some(def) = registry.lookup(&command_id) {
					println!("{command_id}\t{}\t{}", def.name, handler_kinds(&def));
				}
			}

			for alias_id in invoke {
				let command_id = AliasId::new(alias_id).command_id();
				match execute(registry.as_ref(), &command_id) {
					Ok(()) => println!("invoked {command_id}"),
					Err(error) => println!("{error}"),
				}
			}
			for notice in notices.take_pending() {
				println!("notice: {}", notice.message);
			}
			plugin.deactivate();
		}
	}

	Ok(())
}

/// Registers a printing command for every `--provide` argument.
fn seed(registry: &HostRegistry, provided: &[ProvidedCommand]) {
	for command in provided {
		let id = command.id.clone();
		registry.register(CommandDef::new(command.id.as_str(), command.name.as_str()).with_callback(move || {
			println!("ran {id}");
		}));
	}
}

fn handler_kinds(def: &CommandDef) -> &'static str {
	match (def.has_callback(), def.has_check_callback()) {
		(true, true) => "callback+check",
		(true, false) => "callback",
		(false, true) => "check",
		(false, false) => "none",
	}
}

fn setup_tracing(verbose: bool) {
	use tracing_subscriber::EnvFilter;

	let filter = EnvFilter::try_from_env("CMDALIAS_LOG").unwrap_or_else(|_| {
		if verbose {
			EnvFilter::new("debug")
		} else {
			EnvFilter::new("warn")
		}
	});
	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.init();
}
