//! # Roboverb: A Stereo Comb/All-Pass Reverb Plugin
//!
//! A Freeverb-style reverb with switchable filters, built with
//! [nih-plug](https://github.com/robbert-vdh/nih-plug). Outputs Audio Unit
//! (AUv2), VST3 and CLAP formats from a single codebase.
//!
//! ## Signal Flow
//!
//! ```text
//! In L ──┬───────────────────────────────────────────── × dry ────────┐
//!        │                                                             │
//!        └──►(+)── × gain ──┬─► 8 parallel combs (L) ─► 4 serial ──► wet L
//!             ▲             │                            all-passes    │
//! In R ──┬────┘             └─► 8 parallel combs (R) ─► 4 serial ──► wet R
//!        │                                                             │
//!        └───────────────────────────────────────────── × dry ────────┤
//!                                                                      ▼
//!                                         width cross-mix ──► Out L, Out R
//! ```
//!
//! All of the DSP lives in [`dsp`] and knows nothing about the host. This
//! file only translates: host parameters in, audio buffers through.

pub mod dsp;
mod params;

use std::num::NonZeroU32;
use std::sync::Arc;

use dsp::Reverb;
use nih_plug::prelude::*;
use params::PluginParams;

/// The plugin struct.
///
/// Parameters (`PluginParams`) are shared with the host through an `Arc`
/// and can be read from any thread. The reverb engine is owned exclusively
/// by the audio thread and only touched in `initialize()`, `reset()` and
/// `process()`, which the host never runs concurrently. That split is the
/// whole concurrency story: the engine itself has no locks.
struct Roboverb {
    params: Arc<PluginParams>,

    /// The DSP engine. Its buffers are sized in `initialize()`.
    reverb: Reverb,
}

impl Default for Roboverb {
    fn default() -> Self {
        Self {
            params: Arc::new(PluginParams::default()),
            // Configured for 44100 Hz until the host tells us otherwise.
            reverb: Reverb::new(),
        }
    }
}

impl Roboverb {
    /// Copy the host's parameter and switch values into the engine.
    ///
    /// Cheap when nothing changed: the engine compares before it touches
    /// its smoothers, and the masks are plain arrays. Never allocates.
    fn sync_engine(&mut self) {
        let parameters = self.params.to_parameters();
        if parameters != *self.reverb.parameters() {
            self.reverb.set_parameters(parameters);
        }

        let (combs, all_passes) = self.reverb.enablement();
        let mut wanted_combs = self.params.comb_mask();
        if wanted_combs != combs {
            self.reverb.swap_enabled_combs(&mut wanted_combs);
        }
        let mut wanted_all_passes = self.params.all_pass_mask();
        if wanted_all_passes != all_passes {
            self.reverb.swap_enabled_all_passes(&mut wanted_all_passes);
        }
    }
}

impl Plugin for Roboverb {
    const NAME: &'static str = "Roboverb";
    const VENDOR: &'static str = "Kushview";
    const URL: &'static str = "https://kushview.net/roboverb";
    const EMAIL: &'static str = "";
    const VERSION: &'static str = env!("CARGO_PKG_VERSION");

    // Stereo first: most tracks are stereo and the reverb is a stereo
    // design. Mono runs the left-channel network only.
    const AUDIO_IO_LAYOUTS: &'static [AudioIOLayout] = &[
        AudioIOLayout {
            main_input_channels: NonZeroU32::new(2),
            main_output_channels: NonZeroU32::new(2),
            aux_input_ports: &[],
            aux_output_ports: &[],
            names: PortNames::const_default(),
        },
        AudioIOLayout {
            main_input_channels: NonZeroU32::new(1),
            main_output_channels: NonZeroU32::new(1),
            aux_input_ports: &[],
            aux_output_ports: &[],
            names: PortNames::const_default(),
        },
    ];

    const MIDI_INPUT: MidiConfig = MidiConfig::None;

    // Parameters are pushed to the engine once per block and the engine
    // ramps them itself, so sample-accurate automation buys nothing.
    const SAMPLE_ACCURATE_AUTOMATION: bool = false;

    type SysExMessage = ();
    type BackgroundTask = ();

    fn params(&self) -> Arc<dyn Params> {
        self.params.clone()
    }

    /// Size every delay buffer for the host's sample rate.
    ///
    /// This is the only place the engine allocates. The host guarantees
    /// `process()` is not running while this is called.
    fn initialize(
        &mut self,
        audio_io_layout: &AudioIOLayout,
        buffer_config: &BufferConfig,
        _context: &mut impl InitContext<Self>,
    ) -> bool {
        let num_channels = audio_io_layout
            .main_input_channels
            .map(|c| c.get())
            .unwrap_or(0);
        if !(1..=2).contains(&num_channels) {
            nih_warn!("Unsupported channel count: {}", num_channels);
            return false;
        }

        // Targets first, then re-arm: the restored state applies without
        // a ramp from the engine defaults.
        self.sync_engine();
        self.reverb.set_sample_rate(f64::from(buffer_config.sample_rate));

        nih_log!(
            "Configured for {} Hz, {} channel(s), tail {:?} samples",
            buffer_config.sample_rate,
            num_channels,
            self.reverb.tail_samples()
        );

        true
    }

    /// Clear every delay buffer so stale tail doesn't bleed into the next
    /// playback.
    fn reset(&mut self) {
        self.reverb.reset();
    }

    fn process(
        &mut self,
        buffer: &mut Buffer,
        _aux: &mut AuxiliaryBuffers,
        _context: &mut impl ProcessContext<Self>,
    ) -> ProcessStatus {
        self.sync_engine();

        match buffer.as_slice() {
            [left, right] => self.reverb.process_stereo_in_place(left, right),
            [mono] => self.reverb.process_mono(mono),
            _ => (),
        }

        // Keep the host calling process() while the tail rings out after
        // the input stops. A frozen tail never ends.
        match self.reverb.tail_samples() {
            Some(samples) => ProcessStatus::Tail(samples),
            None => ProcessStatus::KeepAlive,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────
// Plugin format trait implementations
// ─────────────────────────────────────────────────────────────────────

impl ClapPlugin for Roboverb {
    const CLAP_ID: &'static str = "net.kushview.roboverb";
    const CLAP_DESCRIPTION: Option<&'static str> =
        Some("Robotic voice and ambience reverb with switchable comb and all-pass filters");
    const CLAP_MANUAL_URL: Option<&'static str> = None;
    const CLAP_SUPPORT_URL: Option<&'static str> = None;
    const CLAP_FEATURES: &'static [ClapFeature] = &[
        ClapFeature::AudioEffect,
        ClapFeature::Stereo,
        ClapFeature::Mono,
        ClapFeature::Reverb,
    ];
}

impl Vst3Plugin for Roboverb {
    const VST3_CLASS_ID: [u8; 16] = *b"KushviewRobovrb1";
    const VST3_SUBCATEGORIES: &'static [Vst3SubCategory] =
        &[Vst3SubCategory::Fx, Vst3SubCategory::Reverb];
}

// ─────────────────────────────────────────────────────────────────────
// Export macros
// ─────────────────────────────────────────────────────────────────────

nih_export_clap!(Roboverb);
nih_export_vst3!(Roboverb);

// AUv2 entry point for hosts that only load Audio Units.
clap_wrapper::export_auv2!();
