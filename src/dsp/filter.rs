//! # Reverb Filters
//!
//! The two building blocks of the Schroeder/Moorer reverb network.
//!
//! ## Comb Filter (with damping)
//!
//! A delay line whose output is fed back into its own input. An impulse
//! comes out again every `len` samples, a little quieter each time:
//!
//! ```text
//!  input ──►(+)──► [ delay: len ] ──┬──► output
//!            ▲                      │
//!            └── × feedback ◄─ [LP] ┘
//! ```
//!
//! The `[LP]` block is a one-pole lowpass:
//!
//! ```text
//! last = output * (1 - damp) + last * damp
//! ```
//!
//! Each trip round the loop passes through it again, so high frequencies
//! die away faster than low ones, the way soft furnishings absorb treble
//! in a real room. `damp = 0` disables it; higher values darken the tail.
//!
//! ## All-Pass Filter
//!
//! ```text
//! buffered = delay[pos]
//! delay[pos] = input + buffered * 0.5
//! output = buffered - input
//! ```
//!
//! The magnitude response is (approximately) flat but the phase is smeared,
//! turning each discrete comb echo into a dense cloud of smaller ones. The
//! 0.5 coefficient is fixed.

use super::delay_line::{undenormalise, DelayLine};

/// Fixed feedback coefficient of every all-pass diffuser.
const ALL_PASS_FEEDBACK: f32 = 0.5;

/// A one-pole (6 dB/octave) lowpass filter.
///
/// ```text
/// y[n] = (1 - a) * x[n] + a * y[n-1]
/// ```
///
/// The coefficient `a` is supplied per sample by the caller, because in
/// the reverb it is the smoothed damping parameter.
pub struct OnePoleFilter {
    /// The previous output sample: the filter's only state variable.
    prev_output: f32,
}

impl OnePoleFilter {
    /// Create a filter with cleared memory.
    pub fn new() -> Self {
        Self { prev_output: 0.0 }
    }

    /// Process one sample with coefficient `a` in `[0, 1]`.
    ///
    /// `a = 0` passes the input straight through; `a → 1` holds the
    /// previous output almost unchanged.
    #[inline]
    pub fn process(&mut self, input: f32, a: f32) -> f32 {
        let output = undenormalise(input * (1.0 - a) + self.prev_output * a);
        self.prev_output = output;
        output
    }

    /// Reset the filter state to zero.
    pub fn reset(&mut self) {
        self.prev_output = 0.0;
    }
}

impl Default for OnePoleFilter {
    fn default() -> Self {
        Self::new()
    }
}

/// Feedback comb filter with a damped feedback path.
pub struct CombFilter {
    delay: DelayLine,
    damping: OnePoleFilter,
}

impl CombFilter {
    /// Create a comb filter with a delay of `len` samples.
    pub fn new(len: usize) -> Self {
        Self {
            delay: DelayLine::new(len),
            damping: OnePoleFilter::new(),
        }
    }

    /// Delay length in samples.
    pub fn len(&self) -> usize {
        self.delay.len()
    }

    /// Resize the delay line and clear all state.
    pub fn resize(&mut self, len: usize) {
        self.delay.resize(len);
        self.damping.reset();
    }

    /// Clear the buffer and the damping memory.
    pub fn clear(&mut self) {
        self.delay.clear();
        self.damping.reset();
    }

    /// Process one sample.
    ///
    /// * `damp` - lowpass coefficient on the feedback path, `[0, 1]`.
    /// * `feedback` - loop gain; `1.0` recirculates forever.
    #[inline]
    pub fn process(&mut self, input: f32, damp: f32, feedback: f32) -> f32 {
        let output = self.delay.front();
        let last = self.damping.process(output, damp);
        self.delay.tick(undenormalise(input + last * feedback));
        output
    }
}

/// Schroeder all-pass diffuser with a fixed 0.5 coefficient.
pub struct AllPassFilter {
    delay: DelayLine,
}

impl AllPassFilter {
    /// Create an all-pass filter with a delay of `len` samples.
    pub fn new(len: usize) -> Self {
        Self {
            delay: DelayLine::new(len),
        }
    }

    /// Delay length in samples.
    pub fn len(&self) -> usize {
        self.delay.len()
    }

    /// Resize the delay line and clear it.
    pub fn resize(&mut self, len: usize) {
        self.delay.resize(len);
    }

    /// Clear the buffer.
    pub fn clear(&mut self) {
        self.delay.clear();
    }

    /// Process one sample.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let buffered = self.delay.front();
        self.delay
            .tick(undenormalise(input + buffered * ALL_PASS_FEEDBACK));
        buffered - input
    }
}

// ─────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────
