//! starling-bot: plugin loading and dispatch core for a chat-platform bot
//!
//! Plugins are discovered on disk, validated, registered into a command
//! registry and an event emitter, and isolated so one broken file or handler
//! cannot take down another.

pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod plugins;

#[cfg(test)]
pub(crate) mod test_support;
