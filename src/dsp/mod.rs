//! # DSP (Digital Signal Processing)
//!
//! Everything that runs on the audio thread, with no dependency on the
//! plugin host:
//!
//! - **`delay_line`**: the fixed-length circular buffer at the heart of
//!   every filter, plus the denormal flush used on feedback paths.
//!
//! - **`filter`**: the damped comb filter, the all-pass diffuser and the
//!   one-pole lowpass that damps the comb feedback.
//!
//! - **`smoother`**: linear parameter ramps that keep control changes
//!   click-free.
//!
//! - **`reverb`**: the stereo engine that wires 8 combs and 4 all-passes
//!   per channel together.

pub mod delay_line;
pub mod filter;
pub mod reverb;
pub mod smoother;

pub use reverb::{
    Parameters, Reverb, DEFAULT_ALL_PASSES, DEFAULT_COMBS, NUM_ALL_PASSES, NUM_COMBS,
};
