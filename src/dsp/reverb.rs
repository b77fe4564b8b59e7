//! # Reverb Engine
//!
//! A Freeverb-style network with a twist in its tuning table: instead of
//! eight nearly equal, mutually prime comb lengths, the combs are spaced in
//! octaves (8092 down to 64 samples). Enabling a handful of short combs
//! gives metallic, robotic resonances; the long ones give ambience.
//!
//! ```text
//!            ┌──► [Comb 0] ──┐
//!            ├──► [Comb 1] ──┤
//!  (L+R)     │      ...      │
//!  × gain ───┼──► [Comb 7] ──┴─►(+)─► [AP 0] ─► [AP 1] ─► [AP 2] ─► [AP 3] ─► wet
//! ```
//!
//! One such network runs per channel. The right channel's buffers are
//! [`STEREO_SPREAD`] samples longer than the left's, which decorrelates
//! the two tails. The wet mix then cross-feeds them according to the
//! width control:
//!
//! ```text
//! out_l = wet_l * wet1 + wet_r * wet2 + in_l * dry
//! out_r = wet_r * wet1 + wet_l * wet2 + in_r * dry
//! ```
//!
//! Any comb or all-pass can be switched out. A disabled filter is skipped
//! entirely: its buffer keeps whatever it held when it was switched off.

use nih_plug::{nih_debug_assert, nih_debug_assert_eq};

use super::filter::{AllPassFilter, CombFilter};
use super::smoother::LinearSmoothedValue;

/// Number of parallel comb filters per channel.
pub const NUM_COMBS: usize = 8;

/// Number of serial all-pass filters per channel.
pub const NUM_ALL_PASSES: usize = 4;

const NUM_CHANNELS: usize = 2;

/// Comb delay lengths in samples at [`REFERENCE_RATE`].
pub const COMB_TUNINGS: [usize; NUM_COMBS] = [8092, 4096, 2048, 1024, 512, 256, 128, 64];

/// All-pass delay lengths in samples at [`REFERENCE_RATE`].
pub const ALL_PASS_TUNINGS: [usize; NUM_ALL_PASSES] = [556, 441, 341, 225];

/// Extra samples added to every right-channel buffer.
pub const STEREO_SPREAD: usize = 23;

/// The rate the tuning tables are expressed at.
pub const REFERENCE_RATE: f64 = 44100.0;

/// Length of every parameter ramp.
const SMOOTHING_SECONDS: f64 = 0.01;

const INPUT_GAIN: f32 = 0.015;
const WET_SCALE: f32 = 6.0;
const DRY_SCALE: f32 = 2.0;
const DAMP_SCALE: f32 = 0.4;
const ROOM_SCALE: f32 = 0.28;
const ROOM_OFFSET: f32 = 0.7;

/// Combs enabled on a fresh engine.
pub const DEFAULT_COMBS: [bool; NUM_COMBS] = [false, false, false, true, true, true, false, false];

/// All-passes enabled on a fresh engine.
pub const DEFAULT_ALL_PASSES: [bool; NUM_ALL_PASSES] = [true, true, false, false];

/// User-facing reverb controls. All fields are normalized to `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Parameters {
    /// Room size: 0 is small, 1 is big. Drives the comb feedback.
    pub room_size: f32,
    /// High-frequency damping: 0 is bright, 1 is fully damped.
    pub damping: f32,
    /// Level of the reverberated signal.
    pub wet_level: f32,
    /// Level of the unprocessed signal.
    pub dry_level: f32,
    /// Stereo width of the wet signal: 0 is mono, 1 is very wide.
    pub width: f32,
    /// Values `>= 0.5` put the reverb into a continuous feedback loop.
    pub freeze_mode: f32,
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            room_size: 0.5,
            damping: 0.5,
            wet_level: 0.33,
            dry_level: 0.4,
            width: 1.0,
            freeze_mode: 0.0,
        }
    }
}

impl Parameters {
    /// Whether these parameters select frozen (infinite sustain) mode.
    pub fn is_frozen(&self) -> bool {
        self.freeze_mode >= 0.5
    }
}

/// Scale a reference-rate tuning to `sample_rate`.
fn scale_to_rate(tuning: usize, sample_rate: f64) -> usize {
    ((tuning as f64 * sample_rate / REFERENCE_RATE).round() as usize).max(1)
}

/// The complete stereo reverb.
///
/// Construction allocates every buffer for 44.1 kHz, so a fresh engine can
/// process straight away. Call [`set_sample_rate()`](Self::set_sample_rate)
/// whenever the host rate changes and [`reset()`](Self::reset) when
/// playback (re)starts. Neither may run concurrently with processing.
pub struct Reverb {
    parameters: Parameters,
    /// Input gain into the combs. Not smoothed: freezing must stop new
    /// input immediately.
    gain: f32,

    combs: [[CombFilter; NUM_COMBS]; NUM_CHANNELS],
    all_passes: [[AllPassFilter; NUM_ALL_PASSES]; NUM_CHANNELS],

    enabled_combs: [bool; NUM_COMBS],
    enabled_all_passes: [bool; NUM_ALL_PASSES],

    damping: LinearSmoothedValue,
    feedback: LinearSmoothedValue,
    dry_gain: LinearSmoothedValue,
    wet_gain_1: LinearSmoothedValue,
    wet_gain_2: LinearSmoothedValue,
}

impl Default for Reverb {
    fn default() -> Self {
        Self::new()
    }
}

impl Reverb {
    /// Create a reverb with default parameters and enablement at 44.1 kHz.
    pub fn new() -> Self {
        let mut reverb = Self {
            parameters: Parameters::default(),
            gain: 0.0,
            combs: std::array::from_fn(|_| std::array::from_fn(|_| CombFilter::new(1))),
            all_passes: std::array::from_fn(|_| std::array::from_fn(|_| AllPassFilter::new(1))),
            enabled_combs: DEFAULT_COMBS,
            enabled_all_passes: DEFAULT_ALL_PASSES,
            damping: LinearSmoothedValue::new(0.0),
            feedback: LinearSmoothedValue::new(0.0),
            dry_gain: LinearSmoothedValue::new(0.0),
            wet_gain_1: LinearSmoothedValue::new(0.0),
            wet_gain_2: LinearSmoothedValue::new(0.0),
        };

        // Targets first, then re-arm, so the defaults apply without a ramp.
        reverb.set_parameters(Parameters::default());
        reverb.set_sample_rate(REFERENCE_RATE);
        reverb
    }

    /// Size every buffer for `sample_rate` and re-arm the smoothers.
    ///
    /// Allocates when a buffer length changes. All buffers are cleared.
    pub fn set_sample_rate(&mut self, sample_rate: f64) {
        nih_debug_assert!(sample_rate > 0.0, "sample rate must be positive");

        for (i, &tuning) in COMB_TUNINGS.iter().enumerate() {
            let len = scale_to_rate(tuning, sample_rate);
            self.combs[0][i].resize(len);
            self.combs[1][i].resize(len + STEREO_SPREAD);
        }

        for (i, &tuning) in ALL_PASS_TUNINGS.iter().enumerate() {
            let len = scale_to_rate(tuning, sample_rate);
            self.all_passes[0][i].resize(len);
            self.all_passes[1][i].resize(len + STEREO_SPREAD);
        }

        for smoother in [
            &mut self.damping,
            &mut self.feedback,
            &mut self.dry_gain,
            &mut self.wet_gain_1,
            &mut self.wet_gain_2,
        ] {
            smoother.reset(sample_rate, SMOOTHING_SECONDS);
        }
    }

    /// Clear every delay buffer on both channels.
    ///
    /// Parameters and smoother ramps are left alone.
    pub fn reset(&mut self) {
        for channel in &mut self.combs {
            for comb in channel.iter_mut() {
                comb.clear();
            }
        }
        for channel in &mut self.all_passes {
            for all_pass in channel.iter_mut() {
                all_pass.clear();
            }
        }
    }

    /// The parameters most recently passed to
    /// [`set_parameters()`](Self::set_parameters).
    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    /// Apply new parameters. Gains and damping glide to their new values
    /// over the smoothing time; the freeze switch acts immediately.
    pub fn set_parameters(&mut self, parameters: Parameters) {
        let wet = parameters.wet_level * WET_SCALE;
        self.dry_gain.set_value(parameters.dry_level * DRY_SCALE);
        self.wet_gain_1.set_value(0.5 * wet * (1.0 + parameters.width));
        self.wet_gain_2.set_value(0.5 * wet * (1.0 - parameters.width));

        self.gain = if parameters.is_frozen() { 0.0 } else { INPUT_GAIN };
        self.parameters = parameters;
        self.update_damping();
    }

    fn update_damping(&mut self) {
        let (damp, feedback) = if self.parameters.is_frozen() {
            (0.0, 1.0)
        } else {
            (
                self.parameters.damping * DAMP_SCALE,
                self.parameters.room_size * ROOM_SCALE + ROOM_OFFSET,
            )
        };
        self.damping.set_value(damp);
        self.feedback.set_value(feedback);
    }

    /// Switch comb `index` (`0..8`) in or out of the network.
    pub fn set_comb_toggle(&mut self, index: usize, enabled: bool) {
        nih_debug_assert!(index < NUM_COMBS, "comb index {} out of range", index);
        if let Some(slot) = self.enabled_combs.get_mut(index) {
            *slot = enabled;
        }
    }

    /// Switch all-pass `index` (`0..4`) in or out of the chain.
    pub fn set_all_pass_toggle(&mut self, index: usize, enabled: bool) {
        nih_debug_assert!(index < NUM_ALL_PASSES, "all-pass index {} out of range", index);
        if let Some(slot) = self.enabled_all_passes.get_mut(index) {
            *slot = enabled;
        }
    }

    /// Exchange the comb enablement mask with `enabled`.
    pub fn swap_enabled_combs(&mut self, enabled: &mut [bool; NUM_COMBS]) {
        std::mem::swap(&mut self.enabled_combs, enabled);
    }

    /// Exchange the all-pass enablement mask with `enabled`.
    pub fn swap_enabled_all_passes(&mut self, enabled: &mut [bool; NUM_ALL_PASSES]) {
        std::mem::swap(&mut self.enabled_all_passes, enabled);
    }

    /// Copies of the comb and all-pass enablement masks.
    pub fn enablement(&self) -> ([bool; NUM_COMBS], [bool; NUM_ALL_PASSES]) {
        (self.enabled_combs, self.enabled_all_passes)
    }

    /// `1.0` if comb `index` is enabled, else `0.0`.
    pub fn toggled_comb_float(&self, index: usize) -> f32 {
        nih_debug_assert!(index < NUM_COMBS);
        match self.enabled_combs.get(index) {
            Some(true) => 1.0,
            _ => 0.0,
        }
    }

    /// `1.0` if all-pass `index` is enabled, else `0.0`.
    pub fn toggled_all_pass_float(&self, index: usize) -> f32 {
        nih_debug_assert!(index < NUM_ALL_PASSES);
        match self.enabled_all_passes.get(index) {
            Some(true) => 1.0,
            _ => 0.0,
        }
    }

    /// How long the tail rings after the input stops, in samples.
    ///
    /// `None` means forever (frozen). Otherwise this is the time for the
    /// longest enabled comb to decay by 60 dB at the current feedback
    /// target, plus the delay through the enabled all-passes.
    ///
    /// Sized from the right-channel buffers, the longer of the two, so the
    /// figure also covers a mono run through the left network.
    pub fn tail_samples(&self) -> Option<u32> {
        let feedback = self.feedback.target();
        if self.parameters.is_frozen() || feedback >= 1.0 {
            return None;
        }

        let longest_comb = self
            .enabled_combs
            .iter()
            .zip(&self.combs[1])
            .filter(|(enabled, _)| **enabled)
            .map(|(_, comb)| comb.len())
            .max()
            .unwrap_or(0);

        let all_pass_delay: usize = self
            .enabled_all_passes
            .iter()
            .zip(&self.all_passes[1])
            .filter(|(enabled, _)| **enabled)
            .map(|(_, all_pass)| all_pass.len())
            .sum();

        // feedback^repeats = 0.001 (-60 dB), and log10(0.001) = -3.
        let repeats = if feedback > 0.001 {
            (-3.0 / feedback.log10()).ceil()
        } else {
            1.0
        };

        Some((repeats * longest_comb as f32) as u32 + all_pass_delay as u32)
    }

    /// Process a block of stereo audio out of place.
    ///
    /// The block length is the shortest of the four slices.
    pub fn process_stereo(
        &mut self,
        in_left: &[f32],
        in_right: &[f32],
        out_left: &mut [f32],
        out_right: &mut [f32],
    ) {
        nih_debug_assert_eq!(in_left.len(), in_right.len());
        nih_debug_assert_eq!(in_left.len(), out_left.len());
        nih_debug_assert_eq!(in_left.len(), out_right.len());

        for (((&in_l, &in_r), out_l), out_r) in in_left
            .iter()
            .zip(in_right)
            .zip(out_left.iter_mut())
            .zip(out_right.iter_mut())
        {
            (*out_l, *out_r) = self.tick_stereo(in_l, in_r);
        }
    }

    /// Process a block of stereo audio in place.
    pub fn process_stereo_in_place(&mut self, left: &mut [f32], right: &mut [f32]) {
        nih_debug_assert_eq!(left.len(), right.len());

        for (l, r) in left.iter_mut().zip(right.iter_mut()) {
            (*l, *r) = self.tick_stereo(*l, *r);
        }
    }

    /// Process a block of mono audio in place through the left network.
    pub fn process_mono(&mut self, samples: &mut [f32]) {
        for sample in samples.iter_mut() {
            let input = *sample;
            let mixed = input * self.gain;

            let damp = self.damping.next_value();
            let feedback = self.feedback.next_value();

            let mut out = 0.0;
            for (comb, _) in self.combs[0]
                .iter_mut()
                .zip(&self.enabled_combs)
                .filter(|(_, enabled)| **enabled)
            {
                out += comb.process(mixed, damp, feedback);
            }

            for (all_pass, _) in self.all_passes[0]
                .iter_mut()
                .zip(&self.enabled_all_passes)
                .filter(|(_, enabled)| **enabled)
            {
                out = all_pass.process(out);
            }

            let dry = self.dry_gain.next_value();
            let wet_1 = self.wet_gain_1.next_value();
            // Keep the cross-feed ramp on the same timeline as the others.
            self.wet_gain_2.next_value();

            *sample = out * wet_1 + input * dry;
        }
    }

    /// One stereo sample through the whole network.
    #[inline]
    fn tick_stereo(&mut self, in_l: f32, in_r: f32) -> (f32, f32) {
        let mixed = (in_l + in_r) * self.gain;

        let damp = self.damping.next_value();
        let feedback = self.feedback.next_value();

        let [combs_l, combs_r] = &mut self.combs;
        let mut out_l = 0.0;
        let mut out_r = 0.0;

        // Combs in parallel.
        for (j, _) in self.enabled_combs.iter().enumerate().filter(|(_, e)| **e) {
            out_l += combs_l[j].process(mixed, damp, feedback);
            out_r += combs_r[j].process(mixed, damp, feedback);
        }

        // All-passes in series, lowest index first.
        let [all_passes_l, all_passes_r] = &mut self.all_passes;
        for (j, _) in self
            .enabled_all_passes
            .iter()
            .enumerate()
            .filter(|(_, e)| **e)
        {
            out_l = all_passes_l[j].process(out_l);
            out_r = all_passes_r[j].process(out_r);
        }

        let dry = self.dry_gain.next_value();
        let wet_1 = self.wet_gain_1.next_value();
        let wet_2 = self.wet_gain_2.next_value();

        (
            out_l * wet_1 + out_r * wet_2 + in_l * dry,
            out_r * wet_1 + out_l * wet_2 + in_r * dry,
        )
    }
}

// ─────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────
