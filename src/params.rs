//! # Plugin Parameters
//!
//! The knobs and switches the host sees. Each has a stable string ID
//! (`#[id = "..."]`) that presets are saved under, so never rename one
//! once published.
//!
//! ## No Host-Side Smoothing
//!
//! Unlike most nih-plug plugins, none of these parameters has a smoother.
//! The reverb engine ramps its own gains and damping over 10 ms, and the
//! plugin pushes new values to it once per block. Smoothing twice would
//! only make the controls feel sluggish.

use nih_plug::prelude::*;

use crate::dsp::{Parameters, DEFAULT_ALL_PASSES, DEFAULT_COMBS, NUM_ALL_PASSES, NUM_COMBS};

/// All user-facing parameters for Roboverb.
#[derive(Params)]
pub struct PluginParams {
    /// **Room Size**: how long the tail rings (comb feedback).
    #[id = "room"]
    pub room_size: FloatParam,

    /// **Damping**: how quickly high frequencies die away in the tail.
    #[id = "damp"]
    pub damping: FloatParam,

    /// **Wet Level**: loudness of the reverberated signal.
    #[id = "wet"]
    pub wet_level: FloatParam,

    /// **Dry Level**: loudness of the untouched input.
    #[id = "dry"]
    pub dry_level: FloatParam,

    /// **Width**: stereo spread of the wet signal. At 0% both outputs
    /// carry the same reverb.
    #[id = "width"]
    pub width: FloatParam,

    /// **Freeze**: stop taking input and hold the current tail forever.
    #[id = "freeze"]
    pub freeze: BoolParam,

    /// One switch per comb filter, longest first. IDs `comb_1`..`comb_8`.
    #[nested(array, group = "Comb")]
    pub combs: [CombToggleParams; NUM_COMBS],

    /// One switch per all-pass stage. IDs `allpass_1`..`allpass_4`.
    #[nested(array, group = "All-Pass")]
    pub all_passes: [AllPassToggleParams; NUM_ALL_PASSES],
}

/// Enable switch for a single comb filter.
#[derive(Params)]
pub struct CombToggleParams {
    #[id = "comb"]
    pub enabled: BoolParam,
}

/// Enable switch for a single all-pass filter.
#[derive(Params)]
pub struct AllPassToggleParams {
    #[id = "allpass"]
    pub enabled: BoolParam,
}

/// A 0-100% parameter.
fn percentage(name: &str, default: f32) -> FloatParam {
    FloatParam::new(name, default, FloatRange::Linear { min: 0.0, max: 1.0 })
        .with_unit("%")
        .with_value_to_string(formatters::v2s_f32_percentage(1))
        .with_string_to_value(formatters::s2v_f32_percentage())
}

impl Default for PluginParams {
    fn default() -> Self {
        let defaults = Parameters::default();

        Self {
            room_size: percentage("Room Size", defaults.room_size),
            damping: percentage("Damping", defaults.damping),
            wet_level: percentage("Wet Level", defaults.wet_level),
            dry_level: percentage("Dry Level", defaults.dry_level),
            width: percentage("Width", defaults.width),
            freeze: BoolParam::new("Freeze", defaults.is_frozen()),

            combs: std::array::from_fn(|i| CombToggleParams {
                enabled: BoolParam::new(format!("Comb {}", i + 1), DEFAULT_COMBS[i]),
            }),
            all_passes: std::array::from_fn(|i| AllPassToggleParams {
                enabled: BoolParam::new(format!("All-Pass {}", i + 1), DEFAULT_ALL_PASSES[i]),
            }),
        }
    }
}

impl PluginParams {
    /// Snapshot the engine parameters from the current host values.
    pub fn to_parameters(&self) -> Parameters {
        Parameters {
            room_size: self.room_size.value(),
            damping: self.damping.value(),
            wet_level: self.wet_level.value(),
            dry_level: self.dry_level.value(),
            width: self.width.value(),
            freeze_mode: if self.freeze.value() { 1.0 } else { 0.0 },
        }
    }

    /// Current comb switch positions.
    pub fn comb_mask(&self) -> [bool; NUM_COMBS] {
        std::array::from_fn(|i| self.combs[i].enabled.value())
    }

    /// Current all-pass switch positions.
    pub fn all_pass_mask(&self) -> [bool; NUM_ALL_PASSES] {
        std::array::from_fn(|i| self.all_passes[i].enabled.value())
    }
}
