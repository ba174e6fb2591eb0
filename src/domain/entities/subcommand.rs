use std::sync::Arc;
use crate::domain::traits::CommandHandler;
use super::schema::OptionSpec;

/// One named branch of a composite command
#[derive(Clone)]
pub struct SubcommandDescriptor {
    pub name: String,
    pub description: String,
    pub options: Vec<OptionSpec>,
    pub handler: Arc<dyn CommandHandler>,
}

impl SubcommandDescriptor {
    pub fn new(name: impl Into<String>, handler: Arc<dyn CommandHandler>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            options: Vec::new(),
            handler,
        }
    }

    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }

    pub fn with_option(mut self, option: OptionSpec) -> Self {
        self.options.push(option);
        self
    }
}

/// Sub-commands keyed by name, in insertion order
#[derive(Clone, Default)]
pub struct SubcommandSet {
    entries: Vec<(String, SubcommandDescriptor)>,
}

impl SubcommandSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert under `key`. Re-inserting a key replaces it in place.
    pub fn insert(&mut self, key: impl Into<String>, descriptor: SubcommandDescriptor) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = descriptor,
            None => self.entries.push((key, descriptor)),
        }
    }

    pub fn with(mut self, key: impl Into<String>, descriptor: SubcommandDescriptor) -> Self {
        self.insert(key, descriptor);
        self
    }

    pub fn get(&self, key: &str) -> Option<&SubcommandDescriptor> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, d)| d)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SubcommandDescriptor)> {
        self.entries.iter().map(|(k, d)| (k.as_str(), d))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
