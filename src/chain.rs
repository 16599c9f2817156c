//! The per-channel filter chain: low cut, then peak, then high cut.

use crate::{
    biquad::{Biquad, Coefficients, Precision},
    filters::{make_high_cut_filter, make_low_cut_filter, make_peak_filter, MAX_CUT_SECTIONS},
    params::{ChainSettings, Slope},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ChainPosition {
    LowCut,
    Peak,
    HighCut,
}

/// Copy `replacement` over `old`. The section owning `old` keeps its history.
pub(crate) fn update_coefficients(old: &mut Coefficients, replacement: &Coefficients) {
    *old = *replacement;
}

/// Four sections in series. Sections past the current slope stay in place but are bypassed.
#[derive(Debug, Clone)]
pub(crate) struct CutFilter {
    sections: [Biquad; MAX_CUT_SECTIONS],
    bypassed: [bool; MAX_CUT_SECTIONS],
}

impl Default for CutFilter {
    fn default() -> Self {
        Self {
            sections: Default::default(),
            bypassed: [false; MAX_CUT_SECTIONS],
        }
    }
}

impl CutFilter {
    pub(crate) fn set_bypassed(&mut self, index: usize, bypassed: bool) {
        self.bypassed[index] = bypassed;
    }

    pub(crate) fn is_bypassed(&self, index: usize) -> bool {
        self.bypassed[index]
    }

    #[cfg(test)]
    pub(crate) fn section(&self, index: usize) -> &Biquad {
        &self.sections[index]
    }

    pub(crate) fn active_sections(&self) -> usize {
        self.bypassed.iter().filter(|b| !**b).count()
    }

    fn reset(&mut self) {
        for section in self.sections.iter_mut() {
            section.reset();
        }
    }

    #[inline]
    fn process_sample(&mut self, mut x: Precision) -> Precision {
        for (section, bypassed) in self.sections.iter_mut().zip(self.bypassed) {
            if !bypassed {
                x = section.process_sample(x);
            }
        }
        x
    }

    /// Product of the magnitudes of every section that is not bypassed.
    pub(crate) fn magnitude_for_frequency(&self, f: Precision, sr: Precision) -> Precision {
        self.sections
            .iter()
            .zip(self.bypassed)
            .filter(|(_, bypassed)| !bypassed)
            .map(|(section, _)| section.coefficients().magnitude_for_frequency(f, sr))
            .product()
    }
}

/// Bypass every section, then enable and update the first `slope.sections()` of them.
pub(crate) fn update_cut_filter(chain: &mut CutFilter, coefficients: &[Coefficients], slope: Slope) {
    nih_plug::nih_debug_assert!(coefficients.len() >= slope.sections());

    for i in 0..MAX_CUT_SECTIONS {
        chain.set_bypassed(i, true);
    }

    for (i, replacement) in coefficients.iter().take(slope.sections()).enumerate() {
        update_coefficients(chain.sections[i].coefficients_mut(), replacement);
        chain.set_bypassed(i, false);
    }
}

/// Processing spec recorded by [`MonoChain::prepare()`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ProcessSpec {
    pub(crate) sample_rate: f32,
    pub(crate) max_block_size: usize,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct MonoChain {
    spec: Option<ProcessSpec>,

    low_cut: CutFilter,
    peak: Biquad,
    high_cut: CutFilter,

    low_cut_bypassed: bool,
    peak_bypassed: bool,
    high_cut_bypassed: bool,
}

impl MonoChain {
    /// Must be called before the first [`MonoChain::process()`]. Clears the filter history.
    pub(crate) fn prepare(&mut self, sample_rate: f32, max_block_size: usize) {
        self.spec = Some(ProcessSpec {
            sample_rate,
            max_block_size,
        });
        self.reset();
    }

    #[cfg(test)]
    pub(crate) fn spec(&self) -> Option<ProcessSpec> {
        self.spec
    }

    pub(crate) fn reset(&mut self) {
        self.low_cut.reset();
        self.peak.reset();
        self.high_cut.reset();
    }

    pub(crate) fn set_bypassed(&mut self, position: ChainPosition, bypassed: bool) {
        match position {
            ChainPosition::LowCut => self.low_cut_bypassed = bypassed,
            ChainPosition::Peak => self.peak_bypassed = bypassed,
            ChainPosition::HighCut => self.high_cut_bypassed = bypassed,
        }
    }

    pub(crate) fn is_bypassed(&self, position: ChainPosition) -> bool {
        match position {
            ChainPosition::LowCut => self.low_cut_bypassed,
            ChainPosition::Peak => self.peak_bypassed,
            ChainPosition::HighCut => self.high_cut_bypassed,
        }
    }

    pub(crate) fn low_cut(&self) -> &CutFilter {
        &self.low_cut
    }

    pub(crate) fn peak(&self) -> &Biquad {
        &self.peak
    }

    pub(crate) fn high_cut(&self) -> &CutFilter {
        &self.high_cut
    }

    /// Recompute all coefficients and bypass flags from `settings`.
    pub(crate) fn update(&mut self, settings: &ChainSettings, sr: Precision) {
        self.set_bypassed(ChainPosition::LowCut, settings.low_cut_bypassed);
        self.set_bypassed(ChainPosition::Peak, settings.peak_bypassed);
        self.set_bypassed(ChainPosition::HighCut, settings.high_cut_bypassed);

        let peak = make_peak_filter(settings, sr);
        update_coefficients(self.peak.coefficients_mut(), &peak);

        let low_cut = make_low_cut_filter(settings, sr);
        update_cut_filter(&mut self.low_cut, &low_cut, settings.low_cut_slope);

        let high_cut = make_high_cut_filter(settings, sr);
        update_cut_filter(&mut self.high_cut, &high_cut, settings.high_cut_slope);
    }

    /// Filter `block` in place.
    pub(crate) fn process(&mut self, block: &mut [f32]) {
        nih_plug::nih_debug_assert!(
            self.spec
                .is_some_and(|spec| block.len() <= spec.max_block_size),
            "process() called before prepare() or with an oversized block"
        );

        for sample in block.iter_mut() {
            let mut x = *sample as Precision;
            if !self.low_cut_bypassed {
                x = self.low_cut.process_sample(x);
            }
            if !self.peak_bypassed {
                x = self.peak.process_sample(x);
            }
            if !self.high_cut_bypassed {
                x = self.high_cut.process_sample(x);
            }
            *sample = x as f32;
        }
    }

    /// Combined linear magnitude of every stage and section that is not bypassed.
    pub(crate) fn magnitude_for_frequency(&self, f: Precision, sr: Precision) -> Precision {
        let mut mag = 1.0;

        if !self.peak_bypassed {
            mag *= self.peak.coefficients().magnitude_for_frequency(f, sr);
        }
        if !self.low_cut_bypassed {
            mag *= self.low_cut.magnitude_for_frequency(f, sr);
        }
        if !self.high_cut_bypassed {
            mag *= self.high_cut.magnitude_for_frequency(f, sr);
        }

        mag
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const SR: f32 = 48000.0;

    fn prepared(settings: &ChainSettings) -> MonoChain {
        let mut chain = MonoChain::default();
        chain.prepare(SR, 512);
        chain.update(settings, SR.into());
        chain
    }

    mod cut_filter {
        use super::*;

        #[test]
        fn active_sections_match_slope() {
            for sr in [44100.0, 48000.0, 96000.0] {
                for slope in Slope::ALL {
                    let settings = ChainSettings {
                        low_cut_freq: 120.0,
                        low_cut_slope: slope,
                        high_cut_slope: slope,
                        ..Default::default()
                    };
                    let mut chain = MonoChain::default();
                    chain.prepare(sr, 256);
                    chain.update(&settings, sr.into());

                    for cut in [chain.low_cut(), chain.high_cut()] {
                        assert_eq!(cut.active_sections(), slope.sections());
                        for i in 0..MAX_CUT_SECTIONS {
                            assert_eq!(cut.is_bypassed(i), i >= slope.sections());
                        }
                    }
                }
            }
        }

        #[test]
        fn lowering_slope_keeps_sections() {
            let mut settings = ChainSettings {
                low_cut_freq: 300.0,
                low_cut_slope: Slope::S48,
                ..Default::default()
            };
            let mut chain = prepared(&settings);
            let last = *chain.low_cut().section(3).coefficients();

            settings.low_cut_slope = Slope::S12;
            chain.update(&settings, SR.into());

            // the fourth section is bypassed but still holds its old coefficients
            assert!(chain.low_cut().is_bypassed(3));
            assert_eq!(*chain.low_cut().section(3).coefficients(), last);
        }

        #[test]
        fn bypassed_sections_do_not_process() {
            let mut cut = CutFilter::default();
            let coefficients = [Coefficients {
                b0: 0.5,
                ..Coefficients::IDENTITY
            }; 4];
            update_cut_filter(&mut cut, &coefficients, Slope::S24);
            assert_abs_diff_eq!(cut.process_sample(1.0), 0.25);
        }
    }

    mod mono_chain {
        use super::*;

        #[test]
        fn all_bypassed_is_identity() {
            let settings = ChainSettings {
                low_cut_freq: 1000.0,
                peak_gain_db: 12.0,
                high_cut_freq: 2000.0,
                low_cut_bypassed: true,
                peak_bypassed: true,
                high_cut_bypassed: true,
                ..Default::default()
            };
            let mut chain = prepared(&settings);
            let input: Vec<f32> = (0..256).map(|i| (i as f32 * 0.1).sin()).collect();
            let mut block = input.clone();
            chain.process(&mut block);
            assert_eq!(block, input);
            assert_eq!(chain.magnitude_for_frequency(1000.0, SR.into()), 1.0);
        }

        #[test]
        fn bypass_flags_follow_settings() {
            let settings = ChainSettings {
                peak_bypassed: true,
                ..Default::default()
            };
            let chain = prepared(&settings);
            assert!(!chain.is_bypassed(ChainPosition::LowCut));
            assert!(chain.is_bypassed(ChainPosition::Peak));
            assert!(!chain.is_bypassed(ChainPosition::HighCut));
        }

        #[test]
        fn peak_boost_scales_sine() {
            let settings = ChainSettings {
                peak_freq: 1000.0,
                peak_gain_db: 6.0,
                low_cut_bypassed: true,
                high_cut_bypassed: true,
                ..Default::default()
            };
            let mut chain = prepared(&settings);

            let mut block: Vec<f32> = (0..48000)
                .map(|i| (std::f32::consts::TAU * 1000.0 * i as f32 / SR).sin())
                .collect();
            chain.process(&mut block);

            // skip the transient, then look at the steady state peak
            let peak = block[24000..].iter().fold(0.0f32, |acc, x| acc.max(x.abs()));
            assert_abs_diff_eq!(peak, 10.0_f32.powf(6.0 / 20.0), epsilon = 0.01);
        }

        #[test]
        fn low_cut_removes_dc() {
            let settings = ChainSettings {
                low_cut_freq: 100.0,
                ..Default::default()
            };
            let mut chain = prepared(&settings);
            let mut block = vec![1.0f32; 48000];
            chain.process(&mut block);
            assert!(block[47999].abs() < 1e-3);
        }

        #[test]
        fn prepare_records_spec_and_clears_history() {
            let mut chain = prepared(&ChainSettings::default());
            let mut block = vec![1.0f32; 64];
            chain.process(&mut block);

            chain.prepare(96000.0, 1024);
            assert_eq!(
                chain.spec(),
                Some(ProcessSpec {
                    sample_rate: 96000.0,
                    max_block_size: 1024
                })
            );
            let mut silence = vec![0.0f32; 8];
            chain.process(&mut silence);
            assert!(silence.iter().all(|x| *x == 0.0));
        }

        #[test]
        fn magnitude_is_product_of_active_stages() {
            let base = ChainSettings {
                low_cut_freq: 200.0,
                high_cut_freq: 4000.0,
                peak_freq: 1000.0,
                peak_gain_db: -9.0,
                peak_quality: 2.0,
                low_cut_slope: Slope::S36,
                high_cut_slope: Slope::S24,
                ..Default::default()
            };
            let sr: Precision = SR.into();

            for mask in 0..8u8 {
                let settings = ChainSettings {
                    low_cut_bypassed: mask & 1 != 0,
                    peak_bypassed: mask & 2 != 0,
                    high_cut_bypassed: mask & 4 != 0,
                    ..base
                };
                let chain = prepared(&settings);

                for f in [20.0, 150.0, 1000.0, 3000.0, 15000.0] {
                    let mut expected = 1.0;
                    if !settings.low_cut_bypassed {
                        expected *= make_low_cut_filter(&settings, sr)
                            .iter()
                            .map(|c| c.magnitude_for_frequency(f, sr))
                            .product::<Precision>();
                    }
                    if !settings.peak_bypassed {
                        expected *= make_peak_filter(&settings, sr).magnitude_for_frequency(f, sr);
                    }
                    if !settings.high_cut_bypassed {
                        expected *= make_high_cut_filter(&settings, sr)
                            .iter()
                            .map(|c| c.magnitude_for_frequency(f, sr))
                            .product::<Precision>();
                    }
                    assert_abs_diff_eq!(
                        chain.magnitude_for_frequency(f, sr),
                        expected,
                        epsilon = 1e-12
                    );
                }
            }
        }
    }
}
