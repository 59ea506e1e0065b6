//! Flutter-Rust bridge wrapper for guard-core.
//!
//! Complex values cross the bridge as JSON strings in the same camelCase
//! shape the core persists.

pub mod api;

pub use guard_core::*;
