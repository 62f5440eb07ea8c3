use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use cmdalias_core::{
	AliasId, AliasPlugin, DismissedPrompt, FALLBACK_NAME_SUFFIX, MISSING_COMMAND_NOTICE, MemoryStorage, PluginHost,
	Settings,
};
use cmdalias_host::{CommandDef, CommandRegistry, NotificationCenter, execute};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use tokio::time::Instant;
use chrono as _;
use serde as _;
use tempfile as _;
use thiserror as _;
use tokio_util as _;
use tracing as _;

#[path = "../src/test_support.rs"]
mod test_support;

use test_support::{CountingRegistry, drain_messages};

fn plugin_with(registry: Arc<CountingRegistry>, storage: Arc<MemoryStorage>) -> Arc<AliasPlugin> {
	plugin_notifying(registry, storage, Arc::new(NotificationCenter::new()))
}

fn plugin_notifying(
	registry: Arc<CountingRegistry>,
	storage: Arc<MemoryStorage>,
	notices: Arc<NotificationCenter>,
) -> Arc<AliasPlugin> {
	AliasPlugin::new(PluginHost {
		registry,
		notifier: notices,
		storage,
		prompt: Arc::new(DismissedPrompt),
	})
}

fn counter_command(id: &str, hits: &Arc<AtomicUsize>) -> CommandDef {
	let hits = Arc::clone(hits);
	CommandDef::new(id, id).with_callback(move || {
		hits.fetch_add(1, Ordering::SeqCst);
	})
}

#[tokio::test(start_paused = true)]
async fn present_target_gets_callback_only_proxy() {
	let registry = CountingRegistry::new();
	registry.register(CommandDef::new("editor:toggle-bold", "Toggle bold").with_callback(|| {}));
	let storage = Arc::new(MemoryStorage::with_blob(json!({
		"aliases": { "1001": { "name": "Bold-X", "commandId": "editor:toggle-bold" } }
	})));

	let report = plugin_with(registry.clone(), storage).activate().await;
	assert_eq!((report.bound, report.fallback), (1, 0));

	let proxy = registry.lookup("alias:1001").expect("proxy registered");
	assert_eq!(proxy.name, "Bold-X");
	assert!(proxy.has_callback());
	assert!(!proxy.has_check_callback());
}

#[tokio::test(start_paused = true)]
async fn absent_target_gets_fallback_after_all_polls() {
	let registry = CountingRegistry::new();
	let storage = Arc::new(MemoryStorage::with_blob(json!({
		"aliases": { "1002": { "name": "Ghost", "commandId": "nonexistent:cmd" } },
		"commandDetection": { "maxTry": 4, "msecOfInterval": 150 }
	})));

	let start = Instant::now();
	let report = plugin_with(registry.clone(), storage).activate().await;
	let elapsed = start.elapsed();

	assert_eq!(report.fallback, 1);
	assert_eq!(registry.lookups("nonexistent:cmd"), 4);
	assert!(elapsed >= Duration::from_millis(600) && elapsed < Duration::from_millis(650), "{elapsed:?}");

	let fallback = registry.lookup("alias:1002").expect("fallback registered");
	assert!(fallback.name.starts_with("Ghost"));
	assert!(fallback.name.contains(FALLBACK_NAME_SUFFIX));
	assert!(fallback.has_callback());
	assert!(!fallback.has_check_callback());
}

#[tokio::test(start_paused = true)]
async fn fallback_handler_reactivates_plugin() {
	let registry = CountingRegistry::new();
	let storage = Arc::new(MemoryStorage::with_blob(json!({
		"aliases": { "1002": { "name": "Ghost", "commandId": "nonexistent:cmd" } },
		"commandDetection": { "maxTry": 2, "msecOfInterval": 50 }
	})));
	let plugin = plugin_with(registry.clone(), storage);
	plugin.activate().await;

	let hits = Arc::new(AtomicUsize::new(0));
	registry.register(counter_command("nonexistent:cmd", &hits));

	execute(registry.as_ref(), "alias:1002").unwrap();
	tokio::time::sleep(Duration::from_secs(1)).await;

	let proxy = registry.lookup("alias:1002").unwrap();
	assert_eq!(proxy.name, "Ghost");
	execute(registry.as_ref(), "alias:1002").unwrap();
	assert_eq!(hits.load(Ordering::SeqCst), 1);
	assert!(plugin.is_active());
}

#[tokio::test(start_paused = true)]
async fn replaced_target_is_used_at_call_time() {
	let registry = CountingRegistry::new();
	let old_hits = Arc::new(AtomicUsize::new(0));
	let new_hits = Arc::new(AtomicUsize::new(0));
	registry.register(counter_command("editor:toggle-bold", &old_hits));
	let storage = Arc::new(MemoryStorage::with_blob(json!({
		"aliases": { "1001": { "name": "Bold-X", "commandId": "editor:toggle-bold" } }
	})));
	plugin_with(registry.clone(), storage).activate().await;

	registry.register(counter_command("editor:toggle-bold", &new_hits));
	execute(registry.as_ref(), "alias:1001").unwrap();

	assert_eq!(old_hits.load(Ordering::SeqCst), 0);
	assert_eq!(new_hits.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn check_mode_stays_available_when_target_missing() {
	let registry = CountingRegistry::new();
	registry.register(CommandDef::new("editor:fold", "Fold").with_check_callback(|_| false));
	let storage = Arc::new(MemoryStorage::with_blob(json!({
		"aliases": { "5": { "name": "Fold", "commandId": "editor:fold" } }
	})));
	let notices = Arc::new(NotificationCenter::new());
	plugin_notifying(registry.clone(), storage, notices.clone()).activate().await;

	let check = registry.lookup("alias:5").and_then(|d| d.check_callback).unwrap();
	assert!(!check(true));

	registry.unregister("editor:fold");
	assert!(check(true));
	assert!(drain_messages(&notices).is_empty());

	assert!(!check(false));
	assert_eq!(drain_messages(&notices), vec![MISSING_COMMAND_NOTICE.to_string()]);
}

#[tokio::test(start_paused = true)]
async fn deleted_alias_is_not_reregistered_after_reload() {
	let registry = CountingRegistry::new();
	registry.register(CommandDef::new("editor:save", "Save").with_callback(|| {}));
	let storage = Arc::new(MemoryStorage::with_blob(json!({
		"aliases": {
			"1": { "name": "Save", "commandId": "editor:save" },
			"2": { "name": "Save too", "commandId": "editor:save" }
		}
	})));
	let plugin = plugin_with(registry.clone(), storage.clone());
	plugin.activate().await;
	plugin.remove_alias(&AliasId::new("1")).unwrap();

	let fresh = plugin_with(registry.clone(), storage.clone());
	let report = fresh.reload().await;

	assert_eq!(report.bound, 1);
	assert!(registry.lookup("alias:1").is_none());
	assert!(registry.lookup("alias:2").is_some());
	let reloaded = Settings::load(storage.as_ref()).unwrap();
	assert!(reloaded.aliases.get("1").is_none());
}

#[tokio::test(start_paused = true)]
async fn aliases_sharing_a_target_forward_independently() {
	let registry = CountingRegistry::new();
	let hits = Arc::new(AtomicUsize::new(0));
	registry.register(counter_command("editor:save", &hits));
	let storage = Arc::new(MemoryStorage::new());
	let plugin = plugin_with(registry.clone(), storage);
	plugin.activate().await;

	let a = plugin.add_alias("Save", "editor:save").unwrap();
	let b = plugin.add_alias("Write", "editor:save").unwrap();
	assert_ne!(a, b);
	tokio::time::sleep(Duration::from_millis(1)).await;

	execute(registry.as_ref(), &a.command_id()).unwrap();
	execute(registry.as_ref(), &b.command_id()).unwrap();
	assert_eq!(hits.load(Ordering::SeqCst), 2);

	plugin.remove_alias(&a).unwrap();
	execute(registry.as_ref(), &b.command_id()).unwrap();
	assert_eq!(hits.load(Ordering::SeqCst), 3);
}

#[tokio::test(start_paused = true)]
async fn slow_alias_does_not_delay_others() {
	let registry = CountingRegistry::new();
	registry.register(CommandDef::new("editor:save", "Save").with_callback(|| {}));
	let storage = Arc::new(MemoryStorage::with_blob(json!({
		"aliases": {
			"1": { "name": "Save", "commandId": "editor:save" },
			"2": { "name": "Ghost", "commandId": "ghost:a" },
			"3": { "name": "Phantom", "commandId": "ghost:b" }
		},
		"commandDetection": { "maxTry": 5, "msecOfInterval": 200 }
	})));
	let plugin = plugin_with(registry.clone(), storage);

	let start = Instant::now();
	let activation = tokio::spawn({
		let plugin = Arc::clone(&plugin);
		async move { plugin.activate().await }
	});

	tokio::time::sleep(Duration::from_millis(1)).await;
	assert!(registry.lookup("alias:1").is_some());
	assert!(registry.lookup("alias:2").is_none());
	assert!(!activation.is_finished());

	let report = activation.await.unwrap();
	assert_eq!((report.bound, report.fallback, report.failed), (1, 2, 0));
	assert!(start.elapsed() < Duration::from_millis(1100), "binders ran sequentially: {:?}", start.elapsed());
	assert_eq!(registry.lookups("ghost:a"), 5);
	assert_eq!(registry.lookups("ghost:b"), 5);
}

#[tokio::test(start_paused = true)]
async fn deactivation_discards_late_bindings() {
	let registry = CountingRegistry::new();
	let storage = Arc::new(MemoryStorage::with_blob(json!({
		"aliases": { "9": { "name": "Late", "commandId": "late:cmd" } }
	})));
	let plugin = plugin_with(registry.clone(), storage);

	let activation = tokio::spawn({
		let plugin = Arc::clone(&plugin);
		async move { plugin.activate().await }
	});
	tokio::time::sleep(Duration::from_millis(10)).await;
	plugin.deactivate();
	registry.register(CommandDef::new("late:cmd", "Late").with_callback(|| {}));

	let report = activation.await.unwrap();
	assert_eq!((report.bound, report.discarded), (0, 1));
	assert!(registry.lookup("alias:9").is_none());
}

#[test]
fn settings_round_trip_preserves_ids() {
	let storage = MemoryStorage::new();
	let mut settings = Settings::default();
	let a = settings.aliases.create("Bold-X", "editor:toggle-bold").unwrap();
	let b = settings.aliases.create("Ghost", "nonexistent:cmd").unwrap();
	settings.save(&storage).unwrap();

	let blob: Value = storage.snapshot().unwrap();
	let loaded = Settings::from_value(&blob);
	assert_eq!(loaded, settings);
	assert_eq!(loaded.aliases.all().len(), 2);
	assert!(loaded.aliases.contains(a.as_str()) && loaded.aliases.contains(b.as_str()));
}
