//! Domain layer - Core types with no infrastructure dependencies
//!
//! This layer contains:
//! - Entities: Plugin, Command, Event, sub-command descriptors, schemas
//! - Traits: Seams to the outside (handlers, Interaction, Emitter, ConfigStore)

pub mod entities;
pub mod traits;
