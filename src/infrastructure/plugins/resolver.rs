//! Module resolution - turns a file discovered on disk into module exports
//!
//! Plugin files are declarative YAML documents. Each one names the Rust
//! handler it binds to through the `handler` key, looked up in a
//! [`HandlerCatalog`] that the binary fills at startup.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use serde::Deserialize;
use tracing::warn;

use crate::application::commands::{build_schema, SubcommandDispatcher};
use crate::application::errors::LoadError;
use crate::domain::entities::{
    Command, CommandSchema, Event, OptionSpec, SubcommandDescriptor, SubcommandSet,
};
use crate::domain::traits::{CommandHandler, EventHandler};
use super::subcommands::load_subcommands;

/// File extensions the loader treats as plugin modules
pub const MODULE_EXTENSIONS: [&str; 2] = ["yaml", "yml"];

/// Whether `path` has one of the recognized module extensions
pub fn is_module_file(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| MODULE_EXTENSIONS.contains(&e))
            .unwrap_or(false)
}

/// Executable part of a module
#[derive(Clone)]
pub enum Handler {
    Command(Arc<dyn CommandHandler>),
    Event(Arc<dyn EventHandler>),
}

/// What a module exposes, before any shape validation
#[derive(Clone, Default)]
pub struct ModuleExports {
    pub name: Option<String>,
    pub description: Option<String>,
    pub data: Option<CommandSchema>,
    pub once: Option<bool>,
    pub options: Vec<OptionSpec>,
    pub handler: Option<Handler>,
    /// Inline sub-commands carried by a composite command
    pub subcommands: Option<SubcommandSet>,
}

impl ModuleExports {
    fn required_name(&self, path: &Path) -> Result<String, LoadError> {
        self.name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string)
            .ok_or_else(|| LoadError::malformed(path, "missing name"))
    }

    fn command_handler(&self, path: &Path) -> Result<Arc<dyn CommandHandler>, LoadError> {
        match &self.handler {
            Some(Handler::Command(h)) => Ok(h.clone()),
            Some(Handler::Event(_)) => Err(LoadError::malformed(path, "handler is an event handler")),
            None => Err(LoadError::malformed(path, "missing handler")),
        }
    }

    /// Accept the module as a command: non-empty name and a command handler
    pub fn to_command(&self, path: &Path) -> Result<Command, LoadError> {
        let name = self.required_name(path)?;
        let handler = self.command_handler(path)?;

        let mut command = Command::new(name.clone(), handler);
        if let Some(desc) = &self.description {
            command = command.with_description(desc.clone());
        }
        match &self.data {
            Some(data) => command = command.with_schema(data.clone()),
            None => command.schema.options = self.options.clone(),
        }
        Ok(command)
    }

    /// Accept the module as an event: non-empty event key and an event handler
    pub fn to_event(&self, path: &Path) -> Result<Event, LoadError> {
        let name = self.required_name(path)?;
        match &self.handler {
            Some(Handler::Event(h)) => Ok(Event::new(name, h.clone()).once(self.once.unwrap_or(false))),
            Some(Handler::Command(_)) => Err(LoadError::malformed(path, "handler is a command handler")),
            None => Err(LoadError::malformed(path, "missing handler")),
        }
    }

    /// Accept the module as a sub-command: name and a command handler
    pub fn to_subcommand(&self, path: &Path) -> Result<SubcommandDescriptor, LoadError> {
        let name = self.required_name(path)?;
        let handler = self.command_handler(path)?;
        Ok(SubcommandDescriptor {
            name,
            description: self.description.clone().unwrap_or_default(),
            options: self.options.clone(),
            handler,
        })
    }
}

/// Loads the module stored at a path
pub trait ModuleResolver: Send + Sync {
    /// An `Err` means the module could not be imported at all
    fn resolve(&self, path: &Path) -> Result<ModuleExports, LoadError>;
}

/// Named handlers that module files bind to
#[derive(Clone, Default)]
pub struct HandlerCatalog {
    handlers: HashMap<String, Handler>,
}

impl HandlerCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn command(mut self, key: impl Into<String>, handler: Arc<dyn CommandHandler>) -> Self {
        self.handlers.insert(key.into(), Handler::Command(handler));
        self
    }

    pub fn event(mut self, key: impl Into<String>, handler: Arc<dyn EventHandler>) -> Self {
        self.handlers.insert(key.into(), Handler::Event(handler));
        self
    }

    pub fn get(&self, key: &str) -> Option<&Handler> {
        self.handlers.get(key)
    }
}

/// On-disk module document
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct ModuleFile {
    name: Option<String>,
    description: Option<String>,
    handler: Option<String>,
    once: Option<bool>,
    #[serde(default)]
    options: Vec<OptionSpec>,
    data: Option<CommandSchema>,
    /// Folder, relative to the plugin folder, holding this command's sub-commands
    subcommands: Option<String>,
}

/// Resolves YAML module files against a handler catalog
pub struct CatalogResolver {
    catalog: HandlerCatalog,
}

impl CatalogResolver {
    pub fn new(catalog: HandlerCatalog) -> Self {
        Self { catalog }
    }
}

impl ModuleResolver for CatalogResolver {
    fn resolve(&self, path: &Path) -> Result<ModuleExports, LoadError> {
        let content = std::fs::read_to_string(path).map_err(|e| LoadError::import(path, e.to_string()))?;
        let file: ModuleFile = serde_yaml::from_str(&content).map_err(|e| LoadError::import(path, e.to_string()))?;

        let mut handler = None;
        if let Some(key) = &file.handler {
            handler = self.catalog.get(key).cloned();
            if handler.is_none() {
                warn!("Unknown handler '{}' referenced by {}", key, path.display());
            }
        }

        let mut exports = ModuleExports {
            name: file.name,
            description: file.description,
            data: file.data,
            once: file.once,
            options: file.options,
            handler,
            subcommands: None,
        };

        if let Some(folder) = file.subcommands.filter(|f| !f.is_empty()) {
            // <plugin>/<commands>/<file> -> <plugin>
            let plugin_dir = path.parent().and_then(Path::parent).unwrap_or_else(|| Path::new("."));
            let set = load_subcommands(&plugin_dir.join(folder), self);

            let name = exports.name.clone().unwrap_or_default();
            let desc = exports.description.clone().unwrap_or_default();
            if exports.data.is_none() {
                exports.data = Some(build_schema(&name, &desc, &set));
            }
            if exports.handler.is_none() {
                exports.handler = Some(Handler::Command(Arc::new(SubcommandDispatcher::new(set.clone()))));
            }
            exports.subcommands = Some(set);
        }

        Ok(exports)
    }
}
