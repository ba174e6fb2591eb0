//! Plugin manifest definition

use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};

use crate::application::errors::LoadError;
use crate::domain::entities::LoadOptions;

/// Reserved file-name suffixes marking a plugin's manifest (compared lowercase)
pub const MANIFEST_SUFFIXES: [&str; 2] = ["plugin.yaml", "plugin.yml"];

/// Plugin metadata
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct PluginManifest {
    /// Plugin name (required, checked by the loader)
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub author: String,

    /// Folder overrides and skip-lists; missing keys take the defaults
    #[serde(default)]
    pub load_options: LoadOptions,
}

impl PluginManifest {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Self::parse(&content).map_err(|e| LoadError::InvalidManifest {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    pub fn parse(content: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(content)
    }

    /// The declared name, if present and non-blank
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref().map(str::trim).filter(|n| !n.is_empty())
    }
}

/// Whether `file_name` carries one of the manifest suffixes
pub fn is_manifest_file(file_name: &str) -> bool {
    let lower = file_name.to_lowercase();
    MANIFEST_SUFFIXES.iter().any(|suffix| lower.ends_with(suffix))
}

/// First manifest among `entries`, which must already be in listing order
pub fn find_manifest(entries: &[PathBuf]) -> Option<&PathBuf> {
    entries.iter().find(|path| {
        path.is_file()
            && path
                .file_name()
                .and_then(|n| n.to_str())
                .map(is_manifest_file)
                .unwrap_or(false)
    })
}
