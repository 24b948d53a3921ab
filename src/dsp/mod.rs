//! DSP Module
//!
//! The delay engine, the `Effect` seam it sits behind, and the lock-free
//! parameter cell a control thread shares with the audio thread.

mod delay;
mod effect;
mod params;

pub use delay::Delay;
pub use effect::Effect;
pub use params::{
    DelayParams, ParamSnapshot, MAX_DELAY_SECONDS, MAX_FEEDBACK, MIN_DELAY_SECONDS,
};
