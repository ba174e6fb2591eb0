//! Declarative command schema
//!
//! The core treats schemas as opaque data: it only builds them (for composite
//! commands) and carries them next to the handler for platform registration.

use serde::{Deserialize, Serialize};

/// Option types a command or sub-command can declare
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionKind {
    Subcommand,
    String,
    Integer,
    Boolean,
    User,
    Channel,
    Role,
    Mentionable,
    Number,
    Attachment,
    #[serde(other)]
    Unknown,
}

impl OptionKind {
    /// Kinds that composite schemas can carry on a sub-command
    pub fn is_subcommand_option(&self) -> bool {
        matches!(
            self,
            OptionKind::Channel
                | OptionKind::String
                | OptionKind::Integer
                | OptionKind::Boolean
                | OptionKind::User
                | OptionKind::Role
        )
    }

    pub fn as_str(&self) -> &str {
        match self {
            OptionKind::Subcommand => "subcommand",
            OptionKind::String => "string",
            OptionKind::Integer => "integer",
            OptionKind::Boolean => "boolean",
            OptionKind::User => "user",
            OptionKind::Channel => "channel",
            OptionKind::Role => "role",
            OptionKind::Mentionable => "mentionable",
            OptionKind::Number => "number",
            OptionKind::Attachment => "attachment",
            OptionKind::Unknown => "unknown",
        }
    }
}

/// A single declared option
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct OptionSpec {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type")]
    pub kind: OptionKind,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_value: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_value: Option<i64>,
    /// Nested options, only populated for sub-command entries
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<OptionSpec>,
}

impl OptionSpec {
    pub fn new(name: impl Into<String>, kind: OptionKind) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            kind,
            required: false,
            min_value: None,
            max_value: None,
            options: Vec::new(),
        }
    }

    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_range(mut self, min: Option<i64>, max: Option<i64>) -> Self {
        self.min_value = min;
        self.max_value = max;
        self
    }
}

/// Top-level command schema
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct CommandSchema {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub options: Vec<OptionSpec>,
}

impl CommandSchema {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            options: Vec::new(),
        }
    }
}

/// Value supplied for an option by an inbound invocation
#[derive(Debug, Clone, PartialEq)]
pub enum OptionValue {
    String(String),
    Integer(i64),
    Boolean(bool),
    User(String),
    Channel(String),
    Role(String),
}

impl OptionValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            OptionValue::String(s)
            | OptionValue::User(s)
            | OptionValue::Channel(s)
            | OptionValue::Role(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            OptionValue::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            OptionValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }
}
