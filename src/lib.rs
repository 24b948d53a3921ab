//! Echoline - Circular-Buffer Delay Engine
//!
//! Echoline implements a real-time delay/echo effect: input audio is mixed
//! with a time-delayed, feedback-attenuated copy of itself read from a
//! circular buffer, block by block, at an arbitrary sample rate.
//!
//! # Architecture
//!
//! - `dsp` - the delay engine, the `Effect` trait seam, and the lock-free
//!   parameter cell shared with a control thread
//! - `engine` - audio buffer type and WAV file I/O
//! - `state` - versioned preset persistence for the four delay parameters
//! - `cli` - the command-line host that streams WAV files through the engine
//!
//! The audio path (`Delay::process`) performs no allocation, no locking and
//! no I/O; everything it needs is sized once in `Delay::prepare`.

pub mod cli;
pub mod dsp;
pub mod engine;
pub mod error;
pub mod state;

pub use error::{EcholineError, Result};
