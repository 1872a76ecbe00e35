//! Scroll tracking, trigger lifecycle, property binding and pinning.

pub mod binder;
pub mod host;
pub mod offsets;
pub mod orchestrator;
pub mod pin;
pub mod property;
pub mod registry;
pub mod tracker;
pub mod trigger;
