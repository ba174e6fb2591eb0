use std::collections::HashSet;
use std::sync::Arc;
use serde::{Deserialize, Serialize};

use super::command::Command;
use super::event::Event;

pub const DEFAULT_COMMANDS_FOLDER: &str = "commands";
pub const DEFAULT_EVENTS_FOLDER: &str = "events";

/// Per-plugin folder overrides and skip-lists
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct LoadOptions {
    pub commands_folder: String,
    pub events_folder: String,
    pub subcommands_folder: Option<String>,
    pub skip_commands: HashSet<String>,
    pub skip_events: HashSet<String>,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            commands_folder: DEFAULT_COMMANDS_FOLDER.to_string(),
            events_folder: DEFAULT_EVENTS_FOLDER.to_string(),
            subcommands_folder: None,
            skip_commands: HashSet::new(),
            skip_events: HashSet::new(),
        }
    }
}

impl LoadOptions {
    /// Configured sub-command folder; an empty name counts as unset
    pub fn subcommands_folder(&self) -> Option<&str> {
        self.subcommands_folder.as_deref().filter(|f| !f.is_empty())
    }
}

/// A loaded plugin. Built once at startup and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct Plugin {
    pub name: String,
    pub description: String,
    pub author: String,
    pub commands: Vec<Arc<Command>>,
    pub events: Vec<Arc<Event>>,
    pub load_options: LoadOptions,
}

impl Plugin {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            author: String::new(),
            commands: Vec::new(),
            events: Vec::new(),
            load_options: LoadOptions::default(),
        }
    }
}
