//! Plugin loading integration tests
//! Run with: cargo test --test plugin_loader_test

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, Once};

use async_trait::async_trait;
use serde_json::json;

use starling_bot::application::commands::CommandRouter;
use starling_bot::application::errors::{BotError, LoadError};
use starling_bot::application::events::EventBinder;
use starling_bot::domain::entities::{CommandRegistry, OptionValue, User};
use starling_bot::domain::traits::{prefix_key, starboard_key, ChannelSender, ConfigStore, Interaction, Reply};
use starling_bot::infrastructure::events::EventBus;
use starling_bot::infrastructure::plugins::{CatalogResolver, LoadOutcome, LoadTargets, PluginLoader};
use starling_bot::infrastructure::storage::MemoryStore;
use starling_bot::plugins::builtin_catalog;

static INIT: Once = Once::new();

fn ensure_init() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    });
}

struct Harness {
    outcome: LoadOutcome,
    router: CommandRouter,
    bus: EventBus,
    binder: EventBinder,
    store: Arc<MemoryStore>,
    outbox: Arc<Outbox>,
}

/// Records messages sent to channels
#[derive(Default)]
struct Outbox(Mutex<Vec<(String, String)>>);

#[async_trait]
impl ChannelSender for Outbox {
    async fn send_message(&self, channel_id: &str, text: &str) -> Result<String, BotError> {
        let mut sent = self.0.lock().unwrap();
        sent.push((channel_id.to_string(), text.to_string()));
        Ok(format!("msg-{}", sent.len()))
    }
}

fn load(root: &Path) -> Harness {
    ensure_init();
    let store = Arc::new(MemoryStore::new());
    let outbox = Arc::new(Outbox::default());
    let resolver = CatalogResolver::new(builtin_catalog(store.clone(), outbox.clone(), "rf!").unwrap());

    let mut registry = CommandRegistry::new();
    let mut binder = EventBinder::new();
    let bus = EventBus::new();
    let outcome = PluginLoader::new(root, &resolver).load_all(&mut LoadTargets {
        registry: &mut registry,
        binder: &mut binder,
        emitter: &bus,
    });

    Harness {
        outcome,
        router: CommandRouter::new(Arc::new(registry)),
        bus,
        binder,
        store,
        outbox,
    }
}

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

fn sample_plugins() -> std::path::PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("plugins")
}

struct TestInteraction {
    command: String,
    subcommand: Option<String>,
    options: HashMap<String, OptionValue>,
    user: User,
    replies: Mutex<Vec<Reply>>,
    deferred: AtomicBool,
}

impl TestInteraction {
    fn new(command: &str, subcommand: Option<&str>) -> Self {
        Self {
            command: command.to_string(),
            subcommand: subcommand.map(str::to_string),
            options: HashMap::new(),
            user: User::new("1", "admin"),
            replies: Mutex::new(Vec::new()),
            deferred: AtomicBool::new(false),
        }
    }

    fn with_option(mut self, name: &str, value: OptionValue) -> Self {
        self.options.insert(name.to_string(), value);
        self
    }

    fn replies(&self) -> Vec<Reply> {
        self.replies.lock().unwrap().clone()
    }
}

#[async_trait]
impl Interaction for TestInteraction {
    fn command_name(&self) -> &str {
        &self.command
    }

    fn subcommand(&self) -> Option<&str> {
        self.subcommand.as_deref()
    }

    fn option(&self, name: &str) -> Option<&OptionValue> {
        self.options.get(name)
    }

    fn guild_id(&self) -> Option<&str> {
        Some("g1")
    }

    fn user(&self) -> &User {
        &self.user
    }

    fn has_permission(&self, _permission: &str) -> bool {
        true
    }

    fn replied(&self) -> bool {
        !self.replies.lock().unwrap().is_empty()
    }

    fn deferred(&self) -> bool {
        self.deferred.load(Ordering::SeqCst)
    }

    async fn reply(&self, reply: Reply) -> Result<(), BotError> {
        self.replies.lock().unwrap().push(reply);
        Ok(())
    }

    async fn defer(&self) -> Result<(), BotError> {
        self.deferred.store(true, Ordering::SeqCst);
        Ok(())
    }
}

#[test]
fn test_sample_plugins_load_cleanly() {
    let h = load(&sample_plugins());

    let names: Vec<&str> = h.outcome.plugins.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Bot Core", "Starboard"]);
    assert!(h.outcome.diagnostics.is_empty(), "{:?}", h.outcome.diagnostics);

    let registered: Vec<&str> = h.router.registry().all().map(|c| c.name.as_str()).collect();
    assert_eq!(registered, vec!["ping", "prefix", "userinfo", "starboard"]);

    let bot = h.outcome.report.plugin("Bot Core").unwrap();
    assert_eq!(bot.author, "GuikiPT");
    assert_eq!(bot.commands, vec!["ping", "prefix", "userinfo"]);
    let events: Vec<(&str, bool)> = bot.events.iter().map(|e| (e.name.as_str(), e.once)).collect();
    assert_eq!(events, vec![("guildDelete", false), ("prefixedMessage", false), ("ready", true)]);
    assert_eq!(bot.subcommands_of("prefix").unwrap(), ["set", "view"]);

    let star = h.outcome.report.plugin("Starboard").unwrap();
    assert_eq!(star.subcommands_of("starboard").unwrap(), ["remove", "set"]);
    let star_events: Vec<&str> = star.events.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(star_events, vec!["messageReactionAdd"]);

    let schema = &h.router.registry().resolve("starboard").unwrap().schema;
    let set = schema.options.iter().find(|o| o.name == "set").unwrap();
    assert_eq!(set.options.len(), 3);
    assert_eq!(set.options[2].max_value, Some(1000));
}

#[test]
fn test_duplicate_command_keeps_first_plugin() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "A/aplugin.yaml", "name: A\n");
    write(dir.path(), "A/commands/ping.yaml", "name: ping\ndescription: from A\nhandler: ping\n");
    write(dir.path(), "B/bplugin.yaml", "name: B\n");
    write(dir.path(), "B/commands/ping.yaml", "name: ping\ndescription: from B\nhandler: ping\n");
    write(dir.path(), "B/commands/pong.yaml", "name: pong\nhandler: ping\n");

    let h = load(dir.path());

    assert_eq!(h.outcome.plugins.len(), 2);
    let ping = h.router.registry().resolve("ping").unwrap();
    assert_eq!(ping.description.as_deref(), Some("from A"));
    assert!(h.router.registry().resolve("pong").is_some());

    let duplicates: Vec<&LoadError> = h
        .outcome
        .diagnostics
        .iter()
        .filter(|d| matches!(d, LoadError::DuplicateCommand { .. }))
        .collect();
    assert_eq!(duplicates.len(), 1);
    assert!(matches!(duplicates[0], LoadError::DuplicateCommand { name, plugin } if name == "ping" && plugin == "B"));

    let b = h.outcome.report.plugin("B").unwrap();
    assert_eq!(b.commands, vec!["pong"]);
    assert_eq!(h.outcome.plugins[1].commands.len(), 1);
}

#[test]
fn test_first_manifest_in_sorted_order_wins() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "Twin/APlugin.yaml", "name: First\n");
    write(dir.path(), "Twin/bplugin.yml", "name: Second\n");

    let h = load(dir.path());

    let names: Vec<&str> = h.outcome.plugins.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["First"]);
    assert!(h.outcome.report.plugin("Second").is_none());
    assert!(h.outcome.diagnostics.is_empty(), "{:?}", h.outcome.diagnostics);
}

#[test]
fn test_bad_folders_are_skipped_without_affecting_others() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "Good/goodplugin.yaml", "name: Good\nauthor: me\n");
    write(dir.path(), "Good/commands/ping.yaml", "name: ping\nhandler: ping\n");
    write(dir.path(), "Good/commands/broken.yaml", "name: [oops\n");
    write(dir.path(), "Good/commands/unbound.yaml", "name: unbound\nhandler: does-not-exist\n");
    write(dir.path(), "Empty/readme.txt", "no manifest here");
    write(dir.path(), "Nameless/plugin.yml", "description: no name\n");
    write(dir.path(), "Garbled/Plugin.YAML", "name: [\n");
    write(dir.path(), "stray-file.yaml", "name: not a folder\n");

    let h = load(dir.path());

    let names: Vec<&str> = h.outcome.plugins.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Good"]);
    assert_eq!(h.outcome.report.rows.len(), 1);
    assert_eq!(h.outcome.report.rows[0].commands, vec!["ping"]);

    let d = &h.outcome.diagnostics;
    assert!(d.iter().any(|e| matches!(e, LoadError::NoManifest { folder } if folder == "Empty")));
    assert!(d.iter().any(|e| matches!(e, LoadError::MissingName { folder } if folder == "Nameless")));
    assert!(d.iter().any(|e| matches!(e, LoadError::InvalidManifest { .. })));
    assert!(d.iter().any(|e| matches!(e, LoadError::Import { .. })));
    assert!(d.iter().any(|e| matches!(e, LoadError::MalformedDescriptor { .. })));
}

#[test]
fn test_plugin_loads_the_same_regardless_of_neighbours() {
    let alone = tempfile::tempdir().unwrap();
    write(alone.path(), "M/mplugin.yaml", "name: M\n");
    write(alone.path(), "M/commands/ping.yaml", "name: ping\nhandler: ping\n");
    write(alone.path(), "M/events/ready.yaml", "name: ready\nonce: true\nhandler: ready\n");

    let crowded = tempfile::tempdir().unwrap();
    for (rel, content) in [
        ("M/mplugin.yaml", "name: M\n"),
        ("M/commands/ping.yaml", "name: ping\nhandler: ping\n"),
        ("M/events/ready.yaml", "name: ready\nonce: true\nhandler: ready\n"),
        ("A/aplugin.yaml", "name: A\n"),
        ("A/commands/bad.yaml", "handler: ping\n"),
        ("Z/zplugin.yaml", "name: Z\n"),
        ("Z/events/x.yaml", "name: x\nhandler: nope\n"),
    ] {
        write(crowded.path(), rel, content);
    }

    let a = load(alone.path());
    let b = load(crowded.path());

    assert_eq!(a.outcome.report.plugin("M"), b.outcome.report.plugin("M"));
    assert_eq!(b.outcome.plugins.len(), 3);
}

#[tokio::test]
async fn test_commands_and_events_end_to_end() {
    let h = load(&sample_plugins());
    assert_eq!(h.binder.bindings().len(), 4);

    let set = TestInteraction::new("starboard", Some("set"))
        .with_option("channel", OptionValue::Channel("stars".into()))
        .with_option("emoji", OptionValue::String("⭐".into()))
        .with_option("reactions", OptionValue::Integer(5));
    h.router.route(&set).await.unwrap();
    assert!(set.replies()[0].content.contains("#stars"));

    let reaction = json!({
        "guild_id": "g1",
        "channel_id": "general",
        "message_id": "m9",
        "author": "alice",
        "content": "hello",
        "emoji": "⭐",
        "count": 5,
    });
    h.bus.emit("messageReactionAdd", reaction.clone()).await;
    h.bus.emit("messageReactionAdd", reaction).await;
    let sent = h.outbox.0.lock().unwrap().clone();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, "stars");
    assert!(sent[0].1.contains("ID: m9"));

    let prefix = TestInteraction::new("prefix", Some("set")).with_option("new_prefix", OptionValue::String("?".into()));
    h.router.route(&prefix).await.unwrap();
    assert_eq!(h.store.get(&prefix_key("g1")).await.unwrap(), Some(json!("?")));

    let unknown = TestInteraction::new("prefix", Some("reset"));
    h.router.route(&unknown).await.unwrap();
    assert_eq!(unknown.replies().len(), 1);
    assert_eq!(unknown.replies()[0].content, "Unknown subcommand: reset");

    assert_eq!(h.bus.emit("ready", json!({"user": "bot"})).await, 1);
    assert_eq!(h.bus.emit("ready", json!({"user": "bot"})).await, 0);

    h.bus.emit("guildDelete", json!({"id": "g1"})).await;
    assert_eq!(h.store.get(&prefix_key("g1")).await.unwrap(), None);
    assert_eq!(h.store.get(&starboard_key("g1")).await.unwrap(), None);

    // A failing handler (payload without id) does not unbind the listener
    h.bus.emit("guildDelete", json!({})).await;
    h.store.upsert(&prefix_key("g2"), json!("!")).await.unwrap();
    h.bus.emit("guildDelete", json!({"id": "g2"})).await;
    assert_eq!(h.store.get(&prefix_key("g2")).await.unwrap(), None);

    h.bus.emit("prefixedMessage", json!({"guild_id": "g3", "prefix": "rf!"})).await;
    assert_eq!(h.store.get(&prefix_key("g3")).await.unwrap(), Some(json!("rf!")));

    let info = TestInteraction::new("userinfo", None);
    h.router.route(&info).await.unwrap();
    assert!(info.replies()[0].content.contains("**Username**: admin"));
}
