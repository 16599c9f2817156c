//! Coefficient factory for the three stages of the chain.

use crate::{
    biquad::{Coefficients, Precision, C},
    params::{ChainSettings, Slope},
};
use arrayvec::ArrayVec;
use nih_plug::util::db_to_gain;

/// Most sections a cut stage can hold, one per 12 dB/Oct.
pub(crate) const MAX_CUT_SECTIONS: usize = 4;

pub(crate) type CutCoefficients = ArrayVec<Coefficients, MAX_CUT_SECTIONS>;

pub(crate) fn make_peak_filter(settings: &ChainSettings, sr: Precision) -> Coefficients {
    Coefficients::peak(
        settings.peak_freq.into(),
        settings.peak_quality.into(),
        db_to_gain(settings.peak_gain_db).into(),
        sr,
    )
}

pub(crate) fn make_low_cut_filter(settings: &ChainSettings, sr: Precision) -> CutCoefficients {
    butterworth_sections(settings.low_cut_slope, |q| {
        Coefficients::high_pass(settings.low_cut_freq.into(), q, sr)
    })
}

pub(crate) fn make_high_cut_filter(settings: &ChainSettings, sr: Precision) -> CutCoefficients {
    butterworth_sections(settings.high_cut_slope, |q| {
        Coefficients::low_pass(settings.high_cut_freq.into(), q, sr)
    })
}

/// Q of section `i` when an even order Butterworth filter is split into biquads.
pub(crate) fn butterworth_q(order: usize, i: usize) -> Precision {
    let angle = (2 * i + 1) as Precision * C::PI / (2 * order) as Precision;
    1.0 / (2.0 * angle.cos())
}

fn butterworth_sections(
    slope: Slope,
    section: impl Fn(Precision) -> Coefficients,
) -> CutCoefficients {
    let order = slope.order();
    (0..slope.sections())
        .map(|i| section(butterworth_q(order, i)))
        .collect()
}
