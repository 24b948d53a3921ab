//! Shared delay parameters
//!
//! A control thread (CLI, UI, automation) writes the four delay parameters
//! while the audio thread is inside `process`. To keep the audio path
//! lock-free, each parameter is stored as the bit pattern of an `f32` in an
//! `AtomicU32`; the audio thread reads all four as ONE snapshot per block
//! and uses only the snapshot for the whole block. Changes therefore apply
//! at the next block boundary, never mid-block, and no value can be torn.
//!
//! Ordering is `Relaxed`: the parameters are independent scalars and the
//! only consistency requirement is per-value atomicity plus block-boundary
//! application, both of which the snapshot provides.

use std::sync::atomic::{AtomicU32, Ordering};

/// Longest representable delay; also fixes the ring capacity at prepare time.
pub const MAX_DELAY_SECONDS: f32 = 2.0;

/// Shortest accepted delay. Zero is excluded: the read cursor would collide
/// with the write cursor and the effect degenerates to a gain stage.
pub const MIN_DELAY_SECONDS: f32 = 0.001;

/// Feedback ceiling, kept below unity so echoes always decay.
pub const MAX_FEEDBACK: f32 = 0.99;

/// Lock-free parameter cell shared between a control thread and the
/// audio thread.
///
/// Setters clamp to the valid ranges; getters return the last stored value.
/// The audio thread should not use the getters directly - it takes a
/// [`snapshot`](DelayParams::snapshot) once per block.
#[derive(Debug)]
pub struct DelayParams {
    delay_time_secs: AtomicU32,
    dry_mix: AtomicU32,
    wet_mix: AtomicU32,
    feedback: AtomicU32,
}

/// Plain-value copy of the parameters, taken once per processed block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamSnapshot {
    pub delay_time_secs: f32,
    pub dry_mix: f32,
    pub wet_mix: f32,
    pub feedback: f32,
}

impl Default for DelayParams {
    fn default() -> Self {
        Self::new(0.5, 0.5, 0.5, 0.75)
    }
}

impl DelayParams {
    /// Create a parameter cell with the given initial values (clamped)
    pub fn new(delay_time_secs: f32, dry_mix: f32, wet_mix: f32, feedback: f32) -> Self {
        let params = Self {
            delay_time_secs: AtomicU32::new(0),
            dry_mix: AtomicU32::new(0),
            wet_mix: AtomicU32::new(0),
            feedback: AtomicU32::new(0),
        };
        params.set_delay_time(delay_time_secs);
        params.set_dry_mix(dry_mix);
        params.set_wet_mix(wet_mix);
        params.set_feedback(feedback);
        params
    }

    /// Set delay time in seconds, clamped to (0, 2.0]
    pub fn set_delay_time(&self, seconds: f32) {
        let clamped = seconds.clamp(MIN_DELAY_SECONDS, MAX_DELAY_SECONDS);
        self.delay_time_secs
            .store(clamped.to_bits(), Ordering::Relaxed);
    }

    /// Set dry mix level, clamped to [0, 1]
    pub fn set_dry_mix(&self, level: f32) {
        let clamped = level.clamp(0.0, 1.0);
        self.dry_mix.store(clamped.to_bits(), Ordering::Relaxed);
    }

    /// Set wet mix level, clamped to [0, 1]
    pub fn set_wet_mix(&self, level: f32) {
        let clamped = level.clamp(0.0, 1.0);
        self.wet_mix.store(clamped.to_bits(), Ordering::Relaxed);
    }

    /// Set feedback amount, clamped to [0, 0.99]
    pub fn set_feedback(&self, amount: f32) {
        let clamped = amount.clamp(0.0, MAX_FEEDBACK);
        self.feedback.store(clamped.to_bits(), Ordering::Relaxed);
    }

    /// Get delay time in seconds
    pub fn delay_time(&self) -> f32 {
        f32::from_bits(self.delay_time_secs.load(Ordering::Relaxed))
    }

    /// Get dry mix level
    pub fn dry_mix(&self) -> f32 {
        f32::from_bits(self.dry_mix.load(Ordering::Relaxed))
    }

    /// Get wet mix level
    pub fn wet_mix(&self) -> f32 {
        f32::from_bits(self.wet_mix.load(Ordering::Relaxed))
    }

    /// Get feedback amount
    pub fn feedback(&self) -> f32 {
        f32::from_bits(self.feedback.load(Ordering::Relaxed))
    }

    /// Read all four parameters as one per-block snapshot
    pub fn snapshot(&self) -> ParamSnapshot {
        ParamSnapshot {
            delay_time_secs: self.delay_time(),
            dry_mix: self.dry_mix(),
            wet_mix: self.wet_mix(),
            feedback: self.feedback(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = DelayParams::default();
        assert_eq!(params.delay_time(), 0.5);
        assert_eq!(params.dry_mix(), 0.5);
        assert_eq!(params.wet_mix(), 0.5);
        assert_eq!(params.feedback(), 0.75);
    }

    #[test]
    fn test_clamping() {
        let params = DelayParams::default();

        params.set_delay_time(5.0);
        assert_eq!(params.delay_time(), MAX_DELAY_SECONDS);

        params.set_delay_time(0.0);
        assert_eq!(params.delay_time(), MIN_DELAY_SECONDS);

        params.set_feedback(1.5);
        assert_eq!(params.feedback(), MAX_FEEDBACK);

        params.set_dry_mix(-0.2);
        assert_eq!(params.dry_mix(), 0.0);

        params.set_wet_mix(1.2);
        assert_eq!(params.wet_mix(), 1.0);
    }

    #[test]
    fn test_snapshot_matches_values() {
        let params = DelayParams::new(0.25, 0.8, 0.3, 0.5);
        let snap = params.snapshot();
        assert_eq!(snap.delay_time_secs, 0.25);
        assert_eq!(snap.dry_mix, 0.8);
        assert_eq!(snap.wet_mix, 0.3);
        assert_eq!(snap.feedback, 0.5);
    }

    #[test]
    fn test_shared_across_threads() {
        use std::sync::Arc;

        let params = Arc::new(DelayParams::default());
        let writer = Arc::clone(&params);

        let handle = std::thread::spawn(move || {
            writer.set_feedback(0.25);
            writer.set_delay_time(1.0);
        });
        handle.join().unwrap();

        let snap = params.snapshot();
        assert_eq!(snap.feedback, 0.25);
        assert_eq!(snap.delay_time_secs, 1.0);
    }
}
