//! # Linear Parameter Smoothing
//!
//! When a control jumps (a knob is grabbed, automation steps), applying the
//! new value on the very next sample produces a discontinuity you can hear
//! as a click. Instead the value glides there in a straight line over a
//! fixed number of samples.
//!
//! ```text
//! value
//!   ▲        target ───────────────
//!   │              ╱
//!   │            ╱    total_steps samples
//!   │          ╱
//!   │ ───────╱
//!   └──────────────────────────────► samples
//! ```
//!
//! [`next_value()`](LinearSmoothedValue::next_value) must be called exactly
//! once per processed sample, otherwise the ramp drifts off the audio
//! timeline.

use nih_plug::nih_debug_assert;

/// A scalar that ramps linearly towards its target.
#[derive(Debug, Clone, Default)]
pub struct LinearSmoothedValue {
    current: f32,
    target: f32,
    step: f32,
    remaining_steps: i32,
    total_steps: i32,
}

impl LinearSmoothedValue {
    /// Create a smoother resting at `value` with a zero-length ramp.
    pub fn new(value: f32) -> Self {
        Self {
            current: value,
            target: value,
            ..Self::default()
        }
    }

    /// Set the ramp length from a duration and sample rate.
    ///
    /// Any ramp in flight is dropped: the value jumps straight to its
    /// target.
    pub fn reset(&mut self, sample_rate: f64, ramp_seconds: f64) {
        nih_debug_assert!(sample_rate > 0.0 && ramp_seconds >= 0.0);
        self.total_steps = (ramp_seconds * sample_rate).floor() as i32;
        self.current = self.target;
        self.remaining_steps = 0;
    }

    /// Start a ramp towards `target`.
    ///
    /// Setting the value it is already heading to is a no-op, so calling
    /// this every block with an unchanged value costs nothing and never
    /// restarts the ramp.
    pub fn set_value(&mut self, target: f32) {
        if target == self.target {
            return;
        }

        self.target = target;
        self.remaining_steps = self.total_steps;

        if self.remaining_steps <= 0 {
            self.current = self.target;
        } else {
            self.step = (self.target - self.current) / self.remaining_steps as f32;
        }
    }

    /// Advance the ramp by one sample and return the new value.
    #[inline]
    pub fn next_value(&mut self) -> f32 {
        if self.remaining_steps <= 0 {
            return self.target;
        }

        self.remaining_steps -= 1;
        if self.remaining_steps == 0 {
            // Land exactly; accumulated `step` rounding could fall short.
            self.current = self.target;
        } else {
            self.current += self.step;
        }
        self.current
    }

    /// The value the ramp is heading towards.
    pub fn target(&self) -> f32 {
        self.target
    }

    /// Whether a ramp is still in progress.
    pub fn is_smoothing(&self) -> bool {
        self.remaining_steps > 0
    }

    /// Number of samples a full ramp takes.
    #[cfg(test)]
    pub(crate) fn total_steps(&self) -> i32 {
        self.total_steps
    }
}

// ─────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────
