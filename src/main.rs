use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde_json::json;
use tokio::io::{AsyncBufReadExt, BufReader};

use starling_bot::application::commands::CommandRouter;
use starling_bot::application::errors::{BotError, CommandError};
use starling_bot::application::events::EventBinder;
use starling_bot::domain::entities::CommandRegistry;
use starling_bot::domain::traits::{ConfigStore, Interaction};
use starling_bot::infrastructure::adapters::console::{ConsoleAdapter, ConsoleInput, ConsoleSender, CONSOLE_GUILD};
use starling_bot::infrastructure::config::{Config, StorageBackend};
use starling_bot::infrastructure::events::EventBus;
use starling_bot::infrastructure::plugins::{CatalogResolver, LoadOutcome, LoadTargets, PluginLoader};
use starling_bot::infrastructure::storage::{MemoryStore, SqliteStore};
use starling_bot::plugins::builtin_catalog;

#[derive(Parser)]
#[command(name = "starling-bot")]
#[command(about = "Plugin-driven chat bot", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "config.yaml")]
    config: String,

    /// Plugin root directory (overrides config)
    #[arg(short, long)]
    plugins_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Load plugins and start the console bot
    Run,
    /// Load plugins and print the load report
    Plugins {
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show version
    Version,
    /// Generate default config
    InitConfig,
}

fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run => run_bot(&cli.config, cli.plugins_dir),
        Commands::Plugins { json } => print_plugins(&cli.config, cli.plugins_dir, json),
        Commands::Version => {
            println!("starling-bot v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Commands::InitConfig => init_config(),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn load_config(config_path: &str, plugins_dir: Option<PathBuf>) -> Config {
    let mut config = if Path::new(config_path).exists() {
        Config::load(config_path).unwrap_or_else(|e| {
            tracing::warn!("Failed to load config: {}, using defaults", e);
            Config::default()
        })
    } else {
        Config::default()
    };
    config.apply_env();

    if let Some(dir) = plugins_dir {
        config.plugins.directory = dir;
    }
    config
}

fn open_store(config: &Config) -> Result<Arc<dyn ConfigStore>, BotError> {
    let store: Arc<dyn ConfigStore> = match config.storage.backend {
        StorageBackend::Memory => Arc::new(MemoryStore::new()),
        StorageBackend::Sqlite => {
            let store = SqliteStore::open(&config.storage.path)?;
            tracing::info!("Database opened at {}", config.storage.path.display());
            Arc::new(store)
        }
    };
    Ok(store)
}

/// Everything the load phase hands to the runtime
struct Loaded {
    outcome: LoadOutcome,
    router: CommandRouter,
    bus: Arc<EventBus>,
    store: Arc<dyn ConfigStore>,
}

fn load_plugins(config: &Config, store: Arc<dyn ConfigStore>) -> Result<Loaded, BotError> {
    let catalog = builtin_catalog(store.clone(), Arc::new(ConsoleSender), &config.bot.prefix)
        .map_err(|e| BotError::Internal(format!("Failed to build handler catalog: {}", e)))?;
    let resolver = CatalogResolver::new(catalog);

    let mut registry = CommandRegistry::new();
    let mut binder = EventBinder::new();
    let bus = Arc::new(EventBus::new());

    let outcome = PluginLoader::new(&config.plugins.directory, &resolver).load_all(&mut LoadTargets {
        registry: &mut registry,
        binder: &mut binder,
        emitter: bus.as_ref(),
    });

    tracing::info!(
        "Loaded {} plugins: {} commands, {} event bindings, {} diagnostics",
        outcome.plugins.len(),
        registry.len(),
        binder.bindings().len(),
        outcome.diagnostics.len()
    );

    // Frozen from here on
    let router = CommandRouter::new(Arc::new(registry));
    Ok(Loaded {
        outcome,
        router,
        bus,
        store,
    })
}

fn print_plugins(config_path: &str, plugins_dir: Option<PathBuf>, as_json: bool) -> Result<(), BotError> {
    let config = load_config(config_path, plugins_dir);
    let loaded = load_plugins(&config, Arc::new(MemoryStore::new()))?;

    if as_json {
        let json = serde_json::to_string_pretty(&loaded.outcome.report)
            .map_err(|e| BotError::Internal(e.to_string()))?;
        println!("{}", json);
    } else {
        print!("{}", loaded.outcome.report);
        for diagnostic in &loaded.outcome.diagnostics {
            println!("! {}", diagnostic);
        }
    }
    Ok(())
}

fn run_bot(config_path: &str, plugins_dir: Option<PathBuf>) -> Result<(), BotError> {
    let config = load_config(config_path, plugins_dir);
    tracing::info!("Starting {}", config.bot.name);

    let store = open_store(&config)?;
    let loaded = load_plugins(&config, store)?;

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| BotError::Internal(format!("Failed to start runtime: {}", e)))?;
    rt.block_on(run_console_bot(config, loaded))
}

async fn run_console_bot(config: Config, loaded: Loaded) -> Result<(), BotError> {
    let Loaded { router, bus, store, .. } = loaded;
    let adapter = ConsoleAdapter::new(&config.bot.prefix);

    bus.emit("ready", json!({ "user": config.bot.name })).await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout()
            .flush()
            .map_err(|e| BotError::Internal(format!("Failed to flush stdout: {}", e)))?;

        let line = tokio::select! {
            line = lines.next_line() => line.map_err(|e| BotError::Internal(e.to_string()))?,
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Received Ctrl-C, shutting down");
                return Ok(());
            }
        };
        let Some(line) = line else {
            return Ok(());
        };

        let prefix = adapter.current_prefix(store.as_ref()).await;
        match adapter.parse(&line, &prefix) {
            Ok(Some(ConsoleInput::Command { interaction, prefixed })) => {
                if prefixed {
                    bus.emit("prefixedMessage", json!({ "guild_id": CONSOLE_GUILD, "prefix": prefix }))
                        .await;
                }
                tracing::debug!("Console invocation {}: /{}", interaction.id(), interaction.command_name());
                let router = router.clone();
                let task = tokio::spawn(async move {
                    // Handler failures were already logged and answered by the router
                    if let Err(CommandError::NotFound(name)) = router.route(&interaction).await {
                        println!("[BOT] Unknown command: /{}", name);
                    }
                });
                if let Err(e) = task.await {
                    tracing::error!("Command task failed: {}", e);
                }
            }
            Ok(Some(ConsoleInput::Event { name, payload })) => {
                let delivered = bus.emit(&name, payload).await;
                tracing::debug!("Event {} delivered to {} listeners", name, delivered);
            }
            Ok(None) => {}
            Err(e) => println!("[BOT] Error: {}", e),
        }
    }
}

fn init_config() -> Result<(), BotError> {
    let config = Config::default();
    let yaml = serde_yaml::to_string(&config).map_err(|e| BotError::Internal(e.to_string()))?;
    println!("{}", yaml);
    println!("\nSave this to config.yaml and adjust as needed.");
    Ok(())
}
