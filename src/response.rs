//! Editor side state: the display filter chain, its response curve and the two analyzers.

use crate::{
    analyzer::{AnalyzerHandoff, PathProducer},
    chain::MonoChain,
    display::{db_to_y, log_position_to_freq},
    params::{ChainSettings, EqParams},
};
use nih_plug::util::gain_to_db;
use nih_plug_egui::egui::{pos2, Pos2, Rect};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

/// Used until the plugin has been initialised and published its sample rate.
const DEFAULT_SAMPLE_RATE: f32 = 44100.0;

/// Raised by every parameter callback, cleared by the editor when it rebuilds its chain.
#[derive(Debug, Clone, Default)]
pub(crate) struct ParamsChanged(Arc<AtomicBool>);

impl ParamsChanged {
    pub(crate) fn notify(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Clear the flag, returning whether it was raised.
    pub(crate) fn take(&self) -> bool {
        self.0
            .compare_exchange(true, false, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// A parameter value-changed callback that raises this flag.
    pub(crate) fn callback<T: 'static>(&self) -> Arc<dyn Fn(T) + Send + Sync> {
        let changed = self.clone();
        Arc::new(move |_| changed.notify())
    }
}

/// Chain gain in dB for each of `width` columns spread logarithmically over 20Hz - 20kHz.
/// Bypassed stages and sections are left out of the product. Never below -100 dB.
pub(crate) fn response_magnitudes(chain: &MonoChain, sample_rate: f32, width: usize) -> Vec<f32> {
    (0..width)
        .map(|i| {
            let freq = log_position_to_freq(i as f32 / width as f32);
            let mag = chain.magnitude_for_frequency(freq.into(), sample_rate.into());
            gain_to_db(mag as f32)
        })
        .collect()
}

/// One point per column, starting at the left edge of `rect`.
pub(crate) fn response_path(rect: Rect, magnitudes_db: &[f32]) -> Vec<Pos2> {
    magnitudes_db
        .iter()
        .enumerate()
        .map(|(i, db)| pos2(rect.left() + i as f32, db_to_y(*db, rect)))
        .collect()
}

pub(crate) struct ResponseCurve {
    chain: MonoChain,
    sample_rate: f32,
    needs_update: bool,

    left: Option<PathProducer>,
    right: Option<PathProducer>,
}

impl Default for ResponseCurve {
    fn default() -> Self {
        Self {
            chain: MonoChain::default(),
            sample_rate: DEFAULT_SAMPLE_RATE,
            needs_update: true,
            left: None,
            right: None,
        }
    }
}

impl ResponseCurve {
    /// Runs once per editor frame, at most 60 times a second.
    pub(crate) fn tick(
        &mut self,
        params: &EqParams,
        changed: &ParamsChanged,
        handoff: &AnalyzerHandoff,
        analysis_rect: Rect,
        analyzer_enabled: bool,
    ) {
        self.connect(handoff);

        if changed.take() {
            self.needs_update = true;
        }
        if self.needs_update {
            self.update_chain(&ChainSettings::from_params(params));
        }

        if analyzer_enabled {
            for producer in [&mut self.left, &mut self.right].into_iter().flatten() {
                producer.process(analysis_rect, self.sample_rate);
            }
        }
    }

    /// Pick up fresh queues after the plugin has been (re)initialised.
    fn connect(&mut self, handoff: &AnalyzerHandoff) {
        if let Some(inputs) = handoff.take() {
            self.sample_rate = inputs.sample_rate;
            self.chain.prepare(inputs.sample_rate, inputs.left.block_size());
            self.left = Some(PathProducer::new(inputs.left));
            self.right = Some(PathProducer::new(inputs.right));
            self.needs_update = true;
        }
    }

    pub(crate) fn update_chain(&mut self, settings: &ChainSettings) {
        self.chain.update(settings, self.sample_rate.into());
        self.needs_update = false;
    }

    pub(crate) fn chain(&self) -> &MonoChain {
        &self.chain
    }

    pub(crate) fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    pub(crate) fn response_path(&self, rect: Rect) -> Vec<Pos2> {
        let width = rect.width().max(0.0) as usize;
        response_path(rect, &response_magnitudes(&self.chain, self.sample_rate, width))
    }

    pub(crate) fn left_path(&self) -> &[Pos2] {
        self.left.as_ref().map(PathProducer::path).unwrap_or_default()
    }

    pub(crate) fn right_path(&self) -> &[Pos2] {
        self.right.as_ref().map(PathProducer::path).unwrap_or_default()
    }
}
