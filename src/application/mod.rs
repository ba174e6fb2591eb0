//! Application layer - Routing and dispatch on top of the domain types
//!
//! This layer contains:
//! - Errors: Load-time and runtime error taxonomy
//! - Commands: Registry-backed routing and sub-command dispatch
//! - Events: Binding plugin events to the client emitter

pub mod errors;
pub mod commands;
pub mod events;
