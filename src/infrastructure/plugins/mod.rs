//! Plugin system
//!
//! Plugins are folders holding a `*plugin.yaml` manifest plus declarative
//! command, event and sub-command modules bound to Rust handlers by key.

pub mod loader;
pub mod manifest;
pub mod report;
pub mod resolver;
pub mod subcommands;

pub use loader::{LoadOutcome, LoadTargets, PluginLoader};
pub use manifest::PluginManifest;
pub use report::{LoadReport, LoadedEvent, PluginReport, SubcommandGroup};
pub use resolver::{CatalogResolver, Handler, HandlerCatalog, ModuleExports, ModuleResolver};
pub use subcommands::load_subcommands;
