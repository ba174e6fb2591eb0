//! Infrastructure layer - External concerns
//!
//! This layer contains:
//! - Config: Configuration loading
//! - Plugins: Manifest parsing, module resolution, the plugin loader
//! - Events: In-process emitter
//! - Storage: Configuration store backends
//! - Adapters: Platform integrations (console)

pub mod adapters;
pub mod config;
pub mod events;
pub mod plugins;
pub mod storage;
