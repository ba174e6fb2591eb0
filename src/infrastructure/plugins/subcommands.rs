//! Sub-command folder loading

use std::path::Path;
use tracing::{debug, error, warn};

use crate::domain::entities::SubcommandSet;
use super::loader::list_sorted;
use super::resolver::{is_module_file, ModuleResolver};

/// Set key for a sub-command: the part after the last `-`
/// (`starboard-set` is keyed `set`)
pub fn subcommand_key(name: &str) -> &str {
    name.rsplit('-').next().unwrap_or(name)
}

/// Load every sub-command module in `dir`.
///
/// A missing folder yields an empty set; modules that fail to import or fail
/// validation are logged and left out.
pub fn load_subcommands(dir: &Path, resolver: &dyn ModuleResolver) -> SubcommandSet {
    let mut set = SubcommandSet::new();

    let entries = match list_sorted(dir) {
        Ok(entries) => entries,
        Err(_) => {
            warn!("Subcommand directory not found: {}", dir.display());
            return set;
        }
    };

    for path in entries.iter().filter(|p| is_module_file(p)) {
        let descriptor = resolver.resolve(path).and_then(|exports| exports.to_subcommand(path));
        match descriptor {
            Ok(descriptor) => {
                let key = subcommand_key(&descriptor.name).to_string();
                debug!("Loaded subcommand {} from {}", key, path.display());
                set.insert(key, descriptor);
            }
            Err(e) => error!("Error loading subcommand from {}: {}", path.display(), e),
        }
    }

    set
}

/// Basenames of the module files in `dir`, for load reporting only
pub fn list_subcommand_names(dir: &Path) -> Vec<String> {
    list_sorted(dir)
        .map(|entries| {
            entries
                .iter()
                .filter(|p| is_module_file(p))
                .filter_map(|p| p.file_stem().and_then(|s| s.to_str()).map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}
