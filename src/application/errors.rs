//! Application layer errors

use std::path::PathBuf;
use thiserror::Error;

/// General bot errors
#[derive(Error, Debug)]
pub enum BotError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Command error: {0}")]
    Command(#[from] CommandError),

    #[error("Plugin error: {0}")]
    Plugin(#[from] LoadError),

    #[error("Response error: {0}")]
    Response(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Load-time errors. Each one is scoped to a single file or plugin folder.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("No plugin manifest found in folder \"{folder}\"")]
    NoManifest { folder: String },

    #[error("Invalid manifest {path}: {reason}")]
    InvalidManifest { path: PathBuf, reason: String },

    #[error("Plugin in folder \"{folder}\" is missing a name")]
    MissingName { folder: String },

    #[error("Malformed descriptor {path}: {reason}")]
    MalformedDescriptor { path: PathBuf, reason: String },

    #[error("Command \"{name}\" from plugin \"{plugin}\" is already registered")]
    DuplicateCommand { name: String, plugin: String },

    #[error("Failed to import {path}: {reason}")]
    Import { path: PathBuf, reason: String },

    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl LoadError {
    pub fn malformed(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        LoadError::MalformedDescriptor {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn import(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        LoadError::Import {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// Command execution errors
#[derive(Error, Debug)]
pub enum CommandError {
    #[error("Command not found: {0}")]
    NotFound(String),

    #[error("Unknown subcommand: {0}")]
    UnknownSubcommand(String),

    #[error("Invalid arguments: {0}")]
    InvalidArgs(String),

    #[error("Execution failed: {0}")]
    ExecutionFailed(String),

    #[error("Permission denied")]
    PermissionDenied,

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Response error: {0}")]
    Response(String),
}

/// Runtime event handler failures
#[derive(Error, Debug)]
pub enum EventError {
    #[error("Handler for event \"{event}\" in plugin \"{plugin}\" failed: {reason}")]
    HandlerThrew {
        event: String,
        plugin: String,
        reason: String,
    },
}

/// Storage errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Lock poisoned")]
    Poisoned,
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Parse error: {0}")]
    Parse(String),
}
