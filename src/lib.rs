mod analyzer;
mod biquad;
mod chain;
mod display;
mod fft;
mod fifo;
mod filters;
mod gui;
mod parameter_formatters;
mod params;
mod response;
mod state;

use analyzer::{AnalyzerHandoff, AnalyzerInputs};
use chain::MonoChain;
use fifo::{sample_fifo, SampleFifoProducer};
use nih_plug::{prelude::*, wrapper::state::PluginState};
use params::{ChainSettings, EqParams};
use response::ParamsChanged;
use std::sync::Arc;

pub struct ColinasEq {
    params: Arc<EqParams>,
    params_changed: ParamsChanged,
    analyzer: Arc<AnalyzerHandoff>,

    sample_rate: f32,
    left_chain: MonoChain,
    right_chain: MonoChain,

    // audio thread ends of the analyzer queues, created in `initialize()`
    left_fifo: Option<SampleFifoProducer>,
    right_fifo: Option<SampleFifoProducer>,
}

impl Default for ColinasEq {
    fn default() -> Self {
        let params_changed = ParamsChanged::default();

        Self {
            params: Arc::new(EqParams::new(&params_changed)),
            params_changed,
            analyzer: Arc::new(AnalyzerHandoff::default()),
            // these fields are not initialised here, see `initialize()` for the actual values
            sample_rate: 0.0,
            left_chain: MonoChain::default(),
            right_chain: MonoChain::default(),
            left_fifo: None,
            right_fifo: None,
        }
    }
}

impl ColinasEq {
    fn update_filters(&mut self) {
        let settings = ChainSettings::from_params(&self.params);
        let sr = self.sample_rate.into();

        self.left_chain.update(&settings, sr);
        self.right_chain.update(&settings, sr);
    }
}

/// Filter one block in place, then hand the filtered audio to the analyzer queues if enabled.
fn process_channels(
    channels: &mut [&mut [f32]],
    [left_chain, right_chain]: [&mut MonoChain; 2],
    [left_fifo, right_fifo]: [Option<&mut SampleFifoProducer>; 2],
    analyzer_enabled: bool,
) {
    match channels {
        [left, right, ..] => {
            left_chain.process(left);
            right_chain.process(right);

            if analyzer_enabled {
                if let Some(fifo) = left_fifo {
                    fifo.push(left);
                }
                if let Some(fifo) = right_fifo {
                    fifo.push(right);
                }
            }
        }
        [mono] => {
            left_chain.process(mono);

            // both analyzers show the single channel
            if analyzer_enabled {
                for fifo in [left_fifo, right_fifo].into_iter().flatten() {
                    fifo.push(mono);
                }
            }
        }
        [] => (),
    }
}

impl Plugin for ColinasEq {
    const NAME: &'static str = "Colinas EQ";
    const VENDOR: &'static str = "Colinas Audio";
    const URL: &'static str = env!("CARGO_PKG_HOMEPAGE");
    const EMAIL: &'static str = "your@email.com";

    const VERSION: &'static str = env!("CARGO_PKG_VERSION");

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
    const MIDI_OUTPUT: MidiConfig = MidiConfig::None;

    const SAMPLE_ACCURATE_AUTOMATION: bool = false;

    type SysExMessage = ();
    type BackgroundTask = ();

    fn params(&self) -> Arc<dyn Params> {
        self.params.clone()
    }

    fn editor(&mut self, async_executor: AsyncExecutor<Self>) -> Option<Box<dyn Editor>> {
        gui::create_gui(self, async_executor)
    }

    fn filter_state(plugin_state: &mut PluginState) {
        let dropped = state::sanitize_state(plugin_state);
        if dropped > 0 {
            nih_warn!("{dropped} saved parameter(s) could not be restored");
        }
        nih_log!("restoring {:?}", state::settings_from_state(plugin_state));
    }

    fn initialize(
        &mut self,
        audio_io_layout: &AudioIOLayout,
        buffer_config: &BufferConfig,
        _context: &mut impl InitContext<Self>,
    ) -> bool {
        self.sample_rate = buffer_config.sample_rate;
        let max_block_size = buffer_config.max_buffer_size as usize;

        self.left_chain.prepare(self.sample_rate, max_block_size);
        self.right_chain.prepare(self.sample_rate, max_block_size);
        self.update_filters();

        // fresh queues for whichever editor is open, sized from the largest host block
        let (left_fifo, left) = sample_fifo(max_block_size);
        let (right_fifo, right) = sample_fifo(max_block_size);
        self.left_fifo = Some(left_fifo);
        self.right_fifo = Some(right_fifo);
        self.analyzer.publish(AnalyzerInputs {
            left,
            right,
            sample_rate: self.sample_rate,
        });
        self.params_changed.notify();

        nih_log!(
            "initialized: {} Hz, {} channel(s), blocks up to {} samples",
            self.sample_rate,
            audio_io_layout
                .main_output_channels
                .map(NonZeroU32::get)
                .unwrap_or(0),
            max_block_size
        );

        true
    }

    fn reset(&mut self) {
        self.left_chain.reset();
        self.right_chain.reset();
    }

    fn process(
        &mut self,
        buffer: &mut Buffer,
        _aux: &mut AuxiliaryBuffers,
        _context: &mut impl ProcessContext<Self>,
    ) -> ProcessStatus {
        self.update_filters();

        process_channels(
            buffer.as_slice(),
            [&mut self.left_chain, &mut self.right_chain],
            [self.left_fifo.as_mut(), self.right_fifo.as_mut()],
            self.params.analyzer_enabled.value(),
        );

        ProcessStatus::Normal
    }
}

impl ClapPlugin for ColinasEq {
    const CLAP_ID: &'static str = "com.colinas-audio.colinas-eq";
    const CLAP_DESCRIPTION: Option<&'static str> = Some(env!("CARGO_PKG_DESCRIPTION"));
    const CLAP_MANUAL_URL: Option<&'static str> = None;
    const CLAP_SUPPORT_URL: Option<&'static str> = None;

    const CLAP_FEATURES: &'static [ClapFeature] = &[
        ClapFeature::AudioEffect,
        ClapFeature::Stereo,
        ClapFeature::Mono,
        ClapFeature::Equalizer,
    ];
}

impl Vst3Plugin for ColinasEq {
    const VST3_CLASS_ID: [u8; 16] = *b"ColinasEqPlugin1";

    const VST3_SUBCATEGORIES: &'static [Vst3SubCategory] =
        &[Vst3SubCategory::Fx, Vst3SubCategory::Eq];
}

nih_export_clap!(ColinasEq);
nih_export_vst3!(ColinasEq);
