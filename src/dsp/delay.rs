//! Delay Effect
//!
//! Circular-buffer echo line. Input is mixed with a time-delayed,
//! feedback-attenuated copy of itself read from a ring buffer, one ring per
//! prepared channel, and written back in place.
//!
//! The engine keeps a single write/read cursor pair shared by all channels:
//! every channel starts a block from the same cursor values and advances a
//! local copy, so only the final pair is persisted per block. The read
//! cursor always trails the write cursor by the delay length in samples.
//!
//! The per-sample loop couples record and playback in one pass: the sample
//! written into the ring is `input + feedback * delayed`, where `delayed`
//! is the pre-update value under the read cursor. That single-pass design
//! means the newly recorded sample cannot be scaled independently of the
//! read tap, in exchange for one unconditional pass over the block.

use std::sync::Arc;

use serde_json::{json, Value};

use crate::dsp::effect::Effect;
use crate::dsp::params::{DelayParams, ParamSnapshot, MAX_DELAY_SECONDS};
use crate::engine::AudioBuffer;
use crate::error::{EcholineError, Result};

/// Circular-buffer delay engine with feedback.
///
/// Lifecycle: [`prepare`](Delay::prepare) allocates the rings for a sample
/// rate / block size / channel configuration, then
/// [`process_block`](Delay::process_block) runs once per audio block with
/// no further allocation. `prepare` must never race a pending `process_block`
/// call; both take `&mut self`, so safe Rust enforces the host contract that
/// processing is stopped before reinitialization.
pub struct Delay {
    /// Shared parameter cell; a control thread may write it at any time.
    params: Arc<DelayParams>,
    /// Bypass flag for the `Effect` seam.
    enabled: bool,
    /// Sample rate configured by the last successful `prepare`.
    sample_rate: f64,
    /// Delay storage: one ring per prepared channel, all `capacity` long.
    rings: Vec<Vec<f32>>,
    /// Ring length in samples; fixed at `round(sample_rate * 2.0)`.
    capacity: usize,
    /// Where the next input sample is recorded.
    write_pos: usize,
    /// Where the delayed sample is fetched; trails `write_pos` by the
    /// delay length modulo `capacity`.
    read_pos: usize,
    /// Delay time the read cursor currently reflects. When a block starts
    /// with a different snapshot value, the read cursor is recomputed.
    applied_delay_secs: f32,
}

impl Delay {
    /// Create a delay engine sharing the given parameter cell.
    ///
    /// The engine is unusable until [`prepare`](Delay::prepare) succeeds.
    pub fn new(params: Arc<DelayParams>) -> Self {
        Self {
            params,
            enabled: true,
            sample_rate: 0.0,
            rings: Vec::new(),
            capacity: 0,
            write_pos: 0,
            read_pos: 0,
            applied_delay_secs: 0.0,
        }
    }

    /// Handle to the shared parameter cell, for control threads
    pub fn params(&self) -> Arc<DelayParams> {
        Arc::clone(&self.params)
    }

    /// Ring capacity in samples (0 before the first successful `prepare`)
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Current write cursor
    pub fn write_position(&self) -> usize {
        self.write_pos
    }

    /// Current read cursor
    pub fn read_position(&self) -> usize {
        self.read_pos
    }

    /// Delay length in samples for the given time at the prepared rate
    pub fn delay_samples(&self, delay_secs: f32) -> usize {
        (delay_secs as f64 * self.sample_rate).round() as usize
    }

    /// Allocate delay storage for an audio configuration.
    ///
    /// Rings hold two seconds per channel - the maximum representable
    /// delay - and are zero-filled. The write cursor restarts at zero and
    /// the read cursor is placed `delay_samples` behind it. Call again
    /// whenever sample rate, block size or channel count changes; never
    /// while a block is being processed (enforced by `&mut self`).
    ///
    /// # Errors
    /// * `InvalidSampleRate` - non-positive or non-finite rate
    /// * `InvalidChannelCount` - zero channels
    /// * `InvalidBlockSize` - zero, or larger than the two-second ring
    pub fn prepare(
        &mut self,
        sample_rate: f64,
        block_size: usize,
        num_channels: usize,
    ) -> Result<()> {
        if !sample_rate.is_finite() || sample_rate <= 0.0 {
            return Err(EcholineError::InvalidSampleRate { sample_rate });
        }
        if num_channels == 0 {
            return Err(EcholineError::InvalidChannelCount {
                channels: num_channels,
            });
        }

        let capacity = (sample_rate * MAX_DELAY_SECONDS as f64).round() as usize;
        if block_size == 0 || capacity < block_size {
            return Err(EcholineError::InvalidBlockSize {
                block_size,
                capacity,
            });
        }

        self.sample_rate = sample_rate;
        self.capacity = capacity;
        self.rings = vec![vec![0.0_f32; capacity]; num_channels];
        self.write_pos = 0;
        self.applied_delay_secs = self.params.delay_time();
        self.read_pos = self.initial_read_position(self.applied_delay_secs);

        Ok(())
    }

    /// Clear all rings to silence and restart the cursors.
    ///
    /// Keeps the prepared capacity; no allocation.
    pub fn reset(&mut self) {
        for ring in &mut self.rings {
            ring.fill(0.0);
        }
        self.write_pos = 0;
        self.applied_delay_secs = self.params.delay_time();
        self.read_pos = self.initial_read_position(self.applied_delay_secs);
    }

    /// Process one block in place.
    ///
    /// Channels `0..num_input_channels` are processed; buffer channels
    /// beyond that are cleared to silence (no signal to delay). Input
    /// channels beyond the prepared ring count alias the last ring - a
    /// documented policy for hosts that deliver more channels than the
    /// engine was prepared for; later aliased channels overwrite earlier
    /// ones at the same cursor positions.
    ///
    /// Performs no allocation, locking or I/O. A no-op before `prepare`
    /// has succeeded.
    pub fn process_block(&mut self, buffer: &mut AudioBuffer, num_input_channels: usize) {
        if self.capacity == 0 || self.rings.is_empty() {
            return;
        }

        let num_samples = buffer.num_samples();
        debug_assert!(
            num_samples <= self.capacity,
            "block of {} samples exceeds ring capacity {}",
            num_samples,
            self.capacity
        );

        // One snapshot for the whole block; parameter changes land at the
        // next block boundary.
        let snapshot: ParamSnapshot = self.params.snapshot();
        if snapshot.delay_time_secs != self.applied_delay_secs {
            self.applied_delay_secs = snapshot.delay_time_secs;
            let delay_samples = self.delay_samples(self.applied_delay_secs);
            self.read_pos = (self.write_pos + self.capacity - delay_samples) % self.capacity;
        }

        let capacity = self.capacity;
        let read_start = self.read_pos;
        let write_start = self.write_pos;
        let last_ring = self.rings.len() - 1;
        let num_input = num_input_channels.min(buffer.num_channels());

        for ch in 0..num_input {
            let ring = &mut self.rings[ch.min(last_ring)];
            let data = buffer.channel_mut(ch);

            // Every channel replays the block from the same cursor pair.
            let mut r = read_start;
            let mut w = write_start;

            for sample in data.iter_mut().take(num_samples) {
                let input = *sample;
                let delayed = ring[r];

                let out = snapshot.dry_mix * input + snapshot.wet_mix * delayed;
                ring[w] = input + delayed * snapshot.feedback;

                r += 1;
                if r >= capacity {
                    r = 0;
                }
                w += 1;
                if w >= capacity {
                    w = 0;
                }

                *sample = out;
            }
        }

        // Output channels with no corresponding input carry silence.
        for ch in num_input..buffer.num_channels() {
            buffer.channel_mut(ch).fill(0.0);
        }

        // Every channel advanced by the same fixed block length, so the
        // final cursor pair is channel-independent.
        self.read_pos = (read_start + num_samples) % capacity;
        self.write_pos = (write_start + num_samples) % capacity;

        debug_assert!(self.read_pos < capacity && self.write_pos < capacity);
    }

    fn initial_read_position(&self, delay_secs: f32) -> usize {
        if self.capacity == 0 {
            return 0;
        }
        let delay_samples = self.delay_samples(delay_secs);
        (self.capacity - delay_samples % self.capacity) % self.capacity
    }
}

impl Default for Delay {
    fn default() -> Self {
        Self::new(Arc::new(DelayParams::default()))
    }
}

impl Effect for Delay {
    fn prepare(&mut self, sample_rate: f64, block_size: usize, num_channels: usize) -> Result<()> {
        Delay::prepare(self, sample_rate, block_size, num_channels)
    }

    fn process(&mut self, buffer: &mut AudioBuffer) {
        if !self.enabled || buffer.is_empty() {
            return;
        }
        let channels = buffer.num_channels();
        self.process_block(buffer, channels);
    }

    fn reset(&mut self) {
        Delay::reset(self);
    }

    fn effect_type(&self) -> &'static str {
        "delay"
    }

    fn display_name(&self) -> &str {
        "Delay"
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn get_params(&self) -> Value {
        json!({
            "enabled": self.enabled,
            "delay_time_secs": self.params.delay_time(),
            "dry_mix": self.params.dry_mix(),
            "wet_mix": self.params.wet_mix(),
            "feedback": self.params.feedback(),
        })
    }

    fn set_param(&mut self, name: &str, value: &Value) -> Result<()> {
        let invalid = || EcholineError::InvalidParameterValue {
            name: name.to_string(),
            value: value.to_string(),
        };

        match name {
            "delay_time_secs" => {
                let v = value.as_f64().ok_or_else(invalid)?;
                self.params.set_delay_time(v as f32);
            }
            "dry_mix" => {
                let v = value.as_f64().ok_or_else(invalid)?;
                self.params.set_dry_mix(v as f32);
            }
            "wet_mix" => {
                let v = value.as_f64().ok_or_else(invalid)?;
                self.params.set_wet_mix(v as f32);
            }
            "feedback" => {
                let v = value.as_f64().ok_or_else(invalid)?;
                self.params.set_feedback(v as f32);
            }
            "enabled" => {
                self.enabled = value.as_bool().ok_or_else(invalid)?;
            }
            _ => {
                return Err(EcholineError::UnknownParameter {
                    name: name.to_string(),
                })
            }
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
