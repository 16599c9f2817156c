use crate::{
    gui::editor::{GUI_DEFAULT_HEIGHT, GUI_DEFAULT_WIDTH},
    parameter_formatters::{s2v_f32_k_suffix, v2s_f32_k_suffix},
    response::ParamsChanged,
};
use nih_plug::prelude::*;
use nih_plug_egui::EguiState;
use std::sync::Arc;

pub(crate) const MIN_FREQUENCY: f32 = 20.0;
pub(crate) const MAX_FREQUENCY: f32 = 20000.0;
pub(crate) const MIN_GAIN_DB: f32 = -24.0;
pub(crate) const MAX_GAIN_DB: f32 = 24.0;
pub(crate) const MIN_QUALITY: f32 = 0.1;
pub(crate) const MAX_QUALITY: f32 = 10.0;

/// Digits after the dot, shared by the knobs and the host's value strings
pub(crate) const GAIN_DECIMALS: usize = 0;
pub(crate) const QUALITY_DECIMALS: usize = 2;

/// Steepness of a cut filter. Every step adds one second order section.
#[derive(Enum, Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Slope {
    #[id = "slope_12"]
    #[name = "12 dB/Oct"]
    S12,
    #[id = "slope_24"]
    #[name = "24 dB/Oct"]
    S24,
    #[id = "slope_36"]
    #[name = "36 dB/Oct"]
    S36,
    #[id = "slope_48"]
    #[name = "48 dB/Oct"]
    S48,
}

impl Slope {
    #[cfg(test)]
    pub(crate) const ALL: [Slope; 4] = [Slope::S12, Slope::S24, Slope::S36, Slope::S48];

    /// Number of active second order sections, 1 to 4
    pub(crate) fn sections(self) -> usize {
        self.to_index() + 1
    }

    /// Butterworth filter order for this slope
    pub(crate) fn order(self) -> usize {
        self.sections() * 2
    }
}

/// Plain snapshot of everything the filter chain needs for one block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ChainSettings {
    pub(crate) low_cut_freq: f32,
    pub(crate) high_cut_freq: f32,
    pub(crate) peak_freq: f32,
    pub(crate) peak_gain_db: f32,
    pub(crate) peak_quality: f32,
    pub(crate) low_cut_slope: Slope,
    pub(crate) high_cut_slope: Slope,

    pub(crate) low_cut_bypassed: bool,
    pub(crate) peak_bypassed: bool,
    pub(crate) high_cut_bypassed: bool,
}

impl Default for ChainSettings {
    fn default() -> Self {
        Self {
            low_cut_freq: MIN_FREQUENCY,
            high_cut_freq: MAX_FREQUENCY,
            peak_freq: 750.0,
            peak_gain_db: 0.0,
            peak_quality: 1.0,
            low_cut_slope: Slope::S12,
            high_cut_slope: Slope::S12,
            low_cut_bypassed: false,
            peak_bypassed: false,
            high_cut_bypassed: false,
        }
    }
}

impl ChainSettings {
    pub(crate) fn from_params(params: &EqParams) -> Self {
        Self {
            low_cut_freq: params.low_cut_freq.value(),
            high_cut_freq: params.high_cut_freq.value(),
            peak_freq: params.peak_freq.value(),
            peak_gain_db: params.peak_gain.value(),
            peak_quality: params.peak_quality.value(),
            low_cut_slope: params.low_cut_slope.value(),
            high_cut_slope: params.high_cut_slope.value(),
            low_cut_bypassed: params.low_cut_bypassed.value(),
            peak_bypassed: params.peak_bypassed.value(),
            high_cut_bypassed: params.high_cut_bypassed.value(),
        }
    }
}

#[derive(Params)]
pub(crate) struct EqParams {
    #[persist = "editor-state"]
    pub(crate) editor_state: Arc<EguiState>,

    #[id = "lowcut_freq"]
    pub(crate) low_cut_freq: FloatParam,
    #[id = "highcut_freq"]
    pub(crate) high_cut_freq: FloatParam,
    #[id = "peak_freq"]
    pub(crate) peak_freq: FloatParam,
    #[id = "peak_gain"]
    pub(crate) peak_gain: FloatParam,
    #[id = "peak_quality"]
    pub(crate) peak_quality: FloatParam,

    #[id = "lowcut_slope"]
    pub(crate) low_cut_slope: EnumParam<Slope>,
    #[id = "highcut_slope"]
    pub(crate) high_cut_slope: EnumParam<Slope>,

    #[id = "lowcut_bypassed"]
    pub(crate) low_cut_bypassed: BoolParam,
    #[id = "peak_bypassed"]
    pub(crate) peak_bypassed: BoolParam,
    #[id = "highcut_bypassed"]
    pub(crate) high_cut_bypassed: BoolParam,
    #[id = "analyzer_enabled"]
    pub(crate) analyzer_enabled: BoolParam,
}

fn frequency_param(name: &str, default: f32, changed: &ParamsChanged) -> FloatParam {
    FloatParam::new(
        name,
        default,
        FloatRange::Skewed {
            min: MIN_FREQUENCY,
            max: MAX_FREQUENCY,
            factor: 0.25,
        },
    )
    .with_step_size(1.0)
    .with_value_to_string(v2s_f32_k_suffix("Hz", 0))
    .with_string_to_value(s2v_f32_k_suffix())
    .with_callback(changed.callback())
}

impl Default for EqParams {
    fn default() -> Self {
        Self::new(&ParamsChanged::default())
    }
}

impl EqParams {
    /// Every parameter raises `changed` whenever its value moves.
    pub(crate) fn new(changed: &ParamsChanged) -> Self {
        let defaults = ChainSettings::default();

        Self {
            editor_state: EguiState::from_size(GUI_DEFAULT_WIDTH, GUI_DEFAULT_HEIGHT),

            low_cut_freq: frequency_param("LowCut Freq", defaults.low_cut_freq, changed),
            high_cut_freq: frequency_param("HighCut Freq", defaults.high_cut_freq, changed),
            peak_freq: frequency_param("Peak Freq", defaults.peak_freq, changed),
            peak_gain: FloatParam::new(
                "Peak Gain",
                defaults.peak_gain_db,
                FloatRange::Linear {
                    min: MIN_GAIN_DB,
                    max: MAX_GAIN_DB,
                },
            )
            .with_step_size(0.5)
            .with_value_to_string(v2s_f32_k_suffix("dB", GAIN_DECIMALS))
            .with_string_to_value(s2v_f32_k_suffix())
            .with_callback(changed.callback()),
            peak_quality: FloatParam::new(
                "Peak Quality",
                defaults.peak_quality,
                FloatRange::Linear {
                    min: MIN_QUALITY,
                    max: MAX_QUALITY,
                },
            )
            .with_step_size(0.05)
            .with_value_to_string(v2s_f32_k_suffix("", QUALITY_DECIMALS))
            .with_string_to_value(s2v_f32_k_suffix())
            .with_callback(changed.callback()),

            low_cut_slope: EnumParam::new("LowCut Slope", defaults.low_cut_slope)
                .with_callback(changed.callback()),
            high_cut_slope: EnumParam::new("HighCut Slope", defaults.high_cut_slope)
                .with_callback(changed.callback()),

            low_cut_bypassed: BoolParam::new("LowCut Bypassed", defaults.low_cut_bypassed)
                .with_callback(changed.callback()),
            peak_bypassed: BoolParam::new("Peak Bypassed", defaults.peak_bypassed)
                .with_callback(changed.callback()),
            high_cut_bypassed: BoolParam::new("HighCut Bypassed", defaults.high_cut_bypassed)
                .with_callback(changed.callback()),
            analyzer_enabled: BoolParam::new("Analyzer Enabled", true)
                .with_callback(changed.callback()),
        }
    }
}
