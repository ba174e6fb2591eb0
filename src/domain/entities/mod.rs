//! Domain entities - Core business objects with no external dependencies

pub mod user;
pub mod command;
pub mod event;
pub mod plugin;
pub mod schema;
pub mod subcommand;

pub use user::User;
pub use command::{Command, CommandRegistry, DuplicateCommand};
pub use event::Event;
pub use plugin::{LoadOptions, Plugin};
pub use schema::{CommandSchema, OptionKind, OptionSpec, OptionValue};
pub use subcommand::{SubcommandDescriptor, SubcommandSet};
