//! Effect trait definition
//!
//! The seam between an audio host and a DSP processor. A host drives the
//! lifecycle: `prepare` whenever the audio configuration changes, `process`
//! once per block on the audio thread, `reset` when playback stops. The
//! JSON parameter surface is for control-side consumers (CLI, preset layer)
//! and must never be touched from the audio thread.

use serde_json::Value;

use crate::engine::AudioBuffer;
use crate::error::Result;

/// Base trait for DSP effects processing planar float audio in place.
pub trait Effect: Send {
    /// Prepare the effect for processing.
    ///
    /// Called when sample rate, block size or channel count changes.
    /// Must not be called while `process` is running for the same instance;
    /// both methods take `&mut self`, so safe Rust cannot violate this.
    ///
    /// # Errors
    /// Configuration errors (invalid sample rate, zero block size or
    /// channels). After an error the effect must not be processed.
    fn prepare(&mut self, sample_rate: f64, block_size: usize, num_channels: usize) -> Result<()>;

    /// Process one block of audio in place.
    ///
    /// Infallible by contract: once `prepare` has succeeded, processing a
    /// valid block cannot fail, and must not allocate, lock or perform I/O.
    fn process(&mut self, buffer: &mut AudioBuffer);

    /// Reset internal state (delay lines, histories) to silence.
    ///
    /// Prepared sizes are kept; no allocation.
    fn reset(&mut self);

    /// Get the effect type identifier
    fn effect_type(&self) -> &'static str;

    /// Get human-readable display name
    fn display_name(&self) -> &str;

    /// Check if the effect is enabled (disabled effects pass audio through)
    fn is_enabled(&self) -> bool;

    /// Enable or disable the effect
    fn set_enabled(&mut self, enabled: bool);

    /// Get all parameters as JSON (for UI/CLI)
    fn get_params(&self) -> Value;

    /// Set a single parameter by name
    fn set_param(&mut self, name: &str, value: &Value) -> Result<()>;
}
