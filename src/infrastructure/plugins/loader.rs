//! Plugin loader - discovers plugin folders and wires their modules up
//!
//! Layout: `<root>/<plugin>/<*plugin.yaml>` plus `commands/`, `events/` and an
//! optional sub-command folder. Every failure is scoped to one file or one
//! plugin folder; it is logged, kept as a diagnostic, and loading goes on.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::application::errors::LoadError;
use crate::application::events::EventBinder;
use crate::domain::entities::{CommandRegistry, Plugin};
use crate::domain::traits::Emitter;
use super::manifest::{find_manifest, PluginManifest};
use super::report::{LoadReport, LoadedEvent, PluginReport, SubcommandGroup};
use super::resolver::{is_module_file, ModuleResolver};
use super::subcommands::list_subcommand_names;

/// Entries of `dir` sorted by file name, hidden entries left out
pub fn list_sorted(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut entries = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                warn!("Failed to read directory entry in {}: {}", dir.display(), e);
                continue;
            }
        };
        if entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }
        entries.push(entry.path());
    }
    entries.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(entries)
}

/// Everything a load pass produced
#[derive(Debug, Default)]
pub struct LoadOutcome {
    pub plugins: Vec<Plugin>,
    pub report: LoadReport,
    pub diagnostics: Vec<LoadError>,
}

/// Where loaded modules go
pub struct LoadTargets<'a> {
    pub registry: &'a mut CommandRegistry,
    pub binder: &'a mut EventBinder,
    pub emitter: &'a dyn Emitter,
}

/// Plugin loader
pub struct PluginLoader<'r> {
    root: PathBuf,
    resolver: &'r dyn ModuleResolver,
}

impl<'r> PluginLoader<'r> {
    pub fn new(root: impl Into<PathBuf>, resolver: &'r dyn ModuleResolver) -> Self {
        Self {
            root: root.into(),
            resolver,
        }
    }

    /// Load every plugin folder under the root, in sorted folder order
    pub fn load_all(&self, targets: &mut LoadTargets<'_>) -> LoadOutcome {
        let mut outcome = LoadOutcome::default();

        let folders = match list_sorted(&self.root) {
            Ok(entries) => entries.into_iter().filter(|p| p.is_dir()).collect::<Vec<_>>(),
            Err(e) => {
                warn!("Plugins directory not readable at {}: {}", self.root.display(), e);
                return outcome;
            }
        };

        for folder in folders {
            match self.load_plugin(&folder, targets, &mut outcome.diagnostics) {
                Ok((plugin, row)) => {
                    info!("Loaded plugin: {}", plugin.name);
                    outcome.report.rows.push(row);
                    outcome.plugins.push(plugin);
                }
                Err(e) => {
                    warn!("Skipping plugin folder {}: {}", folder.display(), e);
                    outcome.diagnostics.push(e);
                }
            }
        }

        info!("Plugin load report:\n{}", outcome.report);
        outcome
    }

    /// Load one plugin folder. `Err` means the folder produced no plugin;
    /// per-file problems are pushed to `diagnostics` instead.
    pub fn load_plugin(
        &self,
        folder: &Path,
        targets: &mut LoadTargets<'_>,
        diagnostics: &mut Vec<LoadError>,
    ) -> Result<(Plugin, PluginReport), LoadError> {
        let folder_name = folder
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let entries = list_sorted(folder).map_err(|source| LoadError::Io {
            path: folder.to_path_buf(),
            source,
        })?;
        let manifest_path = find_manifest(&entries).ok_or_else(|| LoadError::NoManifest {
            folder: folder_name.clone(),
        })?;
        let manifest = PluginManifest::from_file(manifest_path)?;
        let name = manifest
            .name()
            .ok_or_else(|| LoadError::MissingName { folder: folder_name.clone() })?
            .to_string();

        let mut plugin = Plugin::new(name.clone());
        plugin.description = manifest.description;
        plugin.author = manifest.author;
        plugin.load_options = manifest.load_options;

        let mut row = PluginReport::new(name, plugin.author.clone());
        self.load_commands(folder, &mut plugin, &mut row, targets.registry, diagnostics);
        self.load_events(folder, &mut plugin, &mut row, diagnostics);

        for event in &plugin.events {
            targets.binder.bind(event.clone(), &plugin.name, targets.emitter);
        }

        Ok((plugin, row))
    }

    fn module_files(&self, dir: &Path) -> Vec<PathBuf> {
        if !dir.is_dir() {
            return Vec::new();
        }
        match list_sorted(dir) {
            Ok(entries) => entries.into_iter().filter(|p| is_module_file(p)).collect(),
            Err(e) => {
                warn!("Failed to read {}: {}", dir.display(), e);
                Vec::new()
            }
        }
    }

    fn load_commands(
        &self,
        folder: &Path,
        plugin: &mut Plugin,
        row: &mut PluginReport,
        registry: &mut CommandRegistry,
        diagnostics: &mut Vec<LoadError>,
    ) {
        let dir = folder.join(&plugin.load_options.commands_folder);

        for path in self.module_files(&dir) {
            let exports = match self.resolver.resolve(&path) {
                Ok(exports) => exports,
                Err(e) => {
                    error!("Error loading command file {} in plugin {}: {}", file_name(&path), plugin.name, e);
                    diagnostics.push(e);
                    continue;
                }
            };
            let command = match exports.to_command(&path) {
                Ok(command) => command,
                Err(e) => {
                    warn!("Rejected command file {} in plugin {}: {}", file_name(&path), plugin.name, e);
                    diagnostics.push(e);
                    continue;
                }
            };

            if plugin.load_options.skip_commands.contains(&command.name) {
                debug!("Skipping command {} in plugin {}", command.name, plugin.name);
                continue;
            }

            let command = Arc::new(command);
            if registry.register(command.clone()).is_err() {
                let err = LoadError::DuplicateCommand {
                    name: command.name.clone(),
                    plugin: plugin.name.clone(),
                };
                warn!("{}", err);
                diagnostics.push(err);
                continue;
            }

            row.commands.push(command.name.clone());

            let subcommands = match &exports.subcommands {
                Some(set) => Some(set.keys().map(str::to_string).collect::<Vec<_>>()),
                None => plugin
                    .load_options
                    .subcommands_folder()
                    .map(|sub| list_subcommand_names(&folder.join(sub)))
                    .filter(|names| !names.is_empty()),
            };
            if let Some(subcommands) = subcommands {
                row.subcommands.push(SubcommandGroup {
                    command: command.name.clone(),
                    subcommands,
                });
            }

            plugin.commands.push(command);
        }
    }

    fn load_events(
        &self,
        folder: &Path,
        plugin: &mut Plugin,
        row: &mut PluginReport,
        diagnostics: &mut Vec<LoadError>,
    ) {
        let dir = folder.join(&plugin.load_options.events_folder);

        for path in self.module_files(&dir) {
            let event = match self.resolver.resolve(&path).and_then(|exports| exports.to_event(&path)) {
                Ok(event) => event,
                Err(e) => {
                    error!("Error loading event file {} in plugin {}: {}", file_name(&path), plugin.name, e);
                    diagnostics.push(e);
                    continue;
                }
            };

            if plugin.load_options.skip_events.contains(&event.name) {
                debug!("Skipping event {} in plugin {}", event.name, plugin.name);
                continue;
            }

            row.events.push(LoadedEvent {
                name: event.name.clone(),
                once: event.once,
            });
            plugin.events.push(Arc::new(event));
        }
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
