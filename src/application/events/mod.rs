//! Event binding

pub mod binder;

pub use binder::{Binding, EventBinder};
