//! Domain traits - Abstractions for infrastructure implementations

pub mod emitter;
pub mod handler;
pub mod interaction;
pub mod outbound;
pub mod store;

pub use emitter::{Emitter, Listener};
pub use handler::{CommandHandler, EventHandler};
pub use interaction::{Interaction, Reply};
pub use outbound::ChannelSender;
pub use store::{ConfigStore, prefix_key, starboard_key, starboard_post_key};
