//! Load report - startup summary of what each plugin registered

use std::fmt;
use comfy_table::{presets::ASCII_FULL, Table};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadedEvent {
    pub name: String,
    pub once: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubcommandGroup {
    pub command: String,
    pub subcommands: Vec<String>,
}

/// One row per plugin whose manifest loaded
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PluginReport {
    pub plugin: String,
    pub author: String,
    pub commands: Vec<String>,
    pub events: Vec<LoadedEvent>,
    pub subcommands: Vec<SubcommandGroup>,
}

impl PluginReport {
    pub fn new(plugin: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            plugin: plugin.into(),
            author: author.into(),
            ..Self::default()
        }
    }

    pub fn subcommands_of(&self, command: &str) -> Option<&[String]> {
        self.subcommands
            .iter()
            .find(|g| g.command == command)
            .map(|g| g.subcommands.as_slice())
    }

    fn cells(&self) -> [Vec<String>; 4] {
        let author = if self.author.is_empty() { "Unknown" } else { &self.author };
        let plugin = vec![self.plugin.clone(), format!("By ({})", author)];

        let commands = self.commands.clone();
        let events = self
            .events
            .iter()
            .map(|e| format!("{}{}", e.name, if e.once { " (once)" } else { "" }))
            .collect();
        let subcommands = self
            .subcommands
            .iter()
            .map(|g| format!("{}: {}", g.command, g.subcommands.join(", ")))
            .collect();

        [plugin, or_none(commands), or_none(events), or_none(subcommands)]
    }
}

fn or_none(lines: Vec<String>) -> Vec<String> {
    if lines.is_empty() {
        vec!["None".to_string()]
    } else {
        lines
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub rows: Vec<PluginReport>,
}

impl LoadReport {
    pub fn plugin(&self, name: &str) -> Option<&PluginReport> {
        self.rows.iter().find(|r| r.plugin == name)
    }
}

const HEADERS: [&str; 4] = ["Plugin", "Commands Loaded", "Events Loaded", "Subcommands Loaded"];

impl LoadReport {
    /// Four-column summary table, one row per plugin, multi-line cells
    pub fn table(&self) -> Table {
        let mut table = Table::new();
        table.load_preset(ASCII_FULL);
        table.set_header(HEADERS);
        for row in &self.rows {
            table.add_row(row.cells().map(|lines| lines.join("\n")));
        }
        table
    }
}

impl fmt::Display for LoadReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.table())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_rendering() {
        let mut row = PluginReport::new("Starboard", "GuikiPT");
        row.commands.push("starboard".to_string());
        row.events.push(LoadedEvent { name: "messageReactionAdd".to_string(), once: false });
        row.subcommands.push(SubcommandGroup {
            command: "starboard".to_string(),
            subcommands: vec!["set".to_string(), "remove".to_string()],
        });
        let mut bot = PluginReport::new("Bot Core", "");
        bot.events.push(LoadedEvent { name: "ready".to_string(), once: true });
        bot.commands = vec!["ping".to_string(), "prefix".to_string()];

        let table = LoadReport { rows: vec![row, bot] }.to_string();

        assert!(table.contains("| Plugin "));
        assert!(table.contains("By (GuikiPT)"));
        assert!(table.contains("By (Unknown)"));
        assert!(table.contains("starboard: set, remove"));
        assert!(table.contains("ready (once)"));
        assert!(table.contains("None"));
        // One command per line inside the same cell
        let ping = table.lines().position(|l| l.contains(" ping ")).unwrap();
        assert!(table.lines().nth(ping + 1).unwrap().contains(" prefix "));
        let widths: Vec<usize> = table.lines().map(|l| l.chars().count()).collect();
        assert!(widths.windows(2).all(|w| w[0] == w[1]));
    }

    #[test]
    fn test_subcommands_of() {
        let mut row = PluginReport::new("P", "");
        row.subcommands.push(SubcommandGroup { command: "c".to_string(), subcommands: vec!["x".to_string()] });
        assert_eq!(row.subcommands_of("c"), Some(&["x".to_string()][..]));
        assert_eq!(row.subcommands_of("d"), None);
    }
}
