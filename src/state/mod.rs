//! State persistence
//!
//! Versioned preset records for the delay parameters. Ring contents are
//! deliberately never persisted.

pub mod preset;

pub use preset::{DelayPreset, CURRENT_SCHEMA_VERSION};
