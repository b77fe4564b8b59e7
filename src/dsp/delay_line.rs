//! # Delay Line (Circular Buffer)
//!
//! Every filter in the reverb is built around a fixed-length delay line:
//! the comb filters and the all-pass filters each own one. Unlike a
//! general-purpose delay with a movable read head, a reverb delay line
//! always taps the *oldest* sample in the buffer, so the delay time is
//! simply the buffer length.
//!
//! ## How the Fixed Tap Works
//!
//! Imagine a circular tape loop exactly `len` samples long with a single
//! head that reads and then records at the same spot:
//!
//! 1. Read the sample under the head. It was written exactly `len`
//!    samples ago.
//! 2. Overwrite that slot with the new sample.
//! 3. Advance the head by 1, wrapping back to 0 at the end.
//!
//! Reading *before* writing is what makes the loop a delay of `len`
//! samples rather than zero.
//!
//! ## Denormals
//!
//! Feedback loops decay towards zero forever. Once values drop below
//! `f32::MIN_POSITIVE` they become *denormal* numbers, which some CPUs
//! process up to 100x slower. [`undenormalise`] flushes anything that tiny
//! to an exact zero and is applied at every point where a filter writes
//! recirculating energy back into a buffer.

/// Magnitudes below this are flushed to zero. Roughly -300 dBFS, far below
/// anything audible, and comfortably above the denormal range.
const DENORMAL_THRESHOLD: f32 = 1.0e-15;

/// Flush a sample to exactly zero if it is too small to matter.
#[inline]
pub fn undenormalise(sample: f32) -> f32 {
    if sample.abs() < DENORMAL_THRESHOLD {
        0.0
    } else {
        sample
    }
}

/// A fixed-length ring buffer with a combined read/write head.
///
/// The buffer is sized by [`resize()`](Self::resize), which only the
/// engine's sample-rate configuration calls. During audio processing the
/// length never changes and nothing is allocated.
pub struct DelayLine {
    /// The circular buffer storing audio samples. All values start at
    /// 0.0 (silence).
    buffer: Vec<f32>,

    /// Current head position: the slot that is read and then overwritten
    /// by the next call to [`tick()`](Self::tick).
    pos: usize,
}

impl DelayLine {
    /// Create a delay line of `len` samples, cleared to silence.
    ///
    /// A zero length is bumped to one sample so the modular arithmetic
    /// always has something to wrap around.
    pub fn new(len: usize) -> Self {
        Self {
            buffer: vec![0.0; len.max(1)],
            pos: 0,
        }
    }

    /// The delay in samples (equal to the buffer length).
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Change the buffer length.
    ///
    /// Reallocates only when the length actually changes, but always
    /// clears the contents and rewinds the head, so a resize to the same
    /// size behaves exactly like [`clear()`](Self::clear).
    ///
    /// Must never be called while the audio thread is processing.
    pub fn resize(&mut self, len: usize) {
        let len = len.max(1);
        if len != self.buffer.len() {
            self.buffer = vec![0.0; len];
        }
        self.clear();
    }

    /// Read the oldest sample, replace it with `input` and advance.
    ///
    /// Returns the sample written `len()` calls ago.
    #[inline]
    pub fn tick(&mut self, input: f32) -> f32 {
        let output = self.buffer[self.pos];
        self.buffer[self.pos] = input;
        self.pos += 1;
        if self.pos == self.buffer.len() {
            self.pos = 0;
        }
        output
    }

    /// Peek at the sample the next [`tick()`](Self::tick) will return.
    ///
    /// Feedback filters read this first, since the value they write back
    /// depends on it.
    #[inline]
    pub fn front(&self) -> f32 {
        self.buffer[self.pos]
    }

    /// Clear the entire buffer to silence and rewind the head.
    pub fn clear(&mut self) {
        self.buffer.fill(0.0);
        self.pos = 0;
    }
}

// ─────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────
