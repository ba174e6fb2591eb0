//! Command routing and sub-command dispatch

pub mod guard;
pub mod router;
pub mod subcommands;

pub use router::CommandRouter;
pub use guard::execute_guarded;
pub use subcommands::{build_schema, dispatch, SubcommandDispatcher};
