use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

use crate::domain::traits::CommandHandler;
use super::schema::CommandSchema;

/// Represents an invocable bot command
#[derive(Clone)]
pub struct Command {
    pub name: String,
    pub description: Option<String>,
    pub schema: CommandSchema,
    pub handler: Arc<dyn CommandHandler>,
}

impl Command {
    pub fn new(name: impl Into<String>, handler: Arc<dyn CommandHandler>) -> Self {
        let name = name.into();
        Self {
            schema: CommandSchema::new(name.clone(), ""),
            name,
            description: None,
            handler,
        }
    }

    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        let desc = desc.into();
        if self.schema.description.is_empty() {
            self.schema.description = desc.clone();
        }
        self.description = Some(desc);
        self
    }

    pub fn with_schema(mut self, schema: CommandSchema) -> Self {
        self.schema = schema;
        self
    }
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("schema", &self.schema)
            .finish_non_exhaustive()
    }
}

/// Returned when a command name is already taken
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Command \"{0}\" is already registered")]
pub struct DuplicateCommand(pub String);

/// Command registry mapping command name to command.
///
/// Filled through `&mut` during plugin loading, then shared behind an `Arc`
/// so the lookup path never needs a lock.
#[derive(Default)]
pub struct CommandRegistry {
    commands: Vec<Arc<Command>>,
    index: HashMap<String, usize>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `command` unless its name is taken; the first registration wins
    pub fn register(&mut self, command: Arc<Command>) -> Result<(), DuplicateCommand> {
        if self.index.contains_key(&command.name) {
            return Err(DuplicateCommand(command.name.clone()));
        }
        self.index.insert(command.name.clone(), self.commands.len());
        self.commands.push(command);
        Ok(())
    }

    pub fn resolve(&self, name: &str) -> Option<&Arc<Command>> {
        self.index.get(name).map(|&i| &self.commands[i])
    }

    /// Commands in registration order
    pub fn all(&self) -> impl Iterator<Item = &Arc<Command>> {
        self.commands.iter()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
