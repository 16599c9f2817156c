//! Turns the samples queued by the audio thread into spectrum paths for the editor.

use crate::{
    display::{db_to_y, freq_to_log_position},
    fft::{FftDataGenerator, FFT_SIZE, NUM_BINS},
    fifo::SampleFifoConsumer,
};
use nih_plug::nih_error;
use nih_plug_egui::egui::{pos2, Pos2, Rect};
use parking_lot::Mutex;
use ringbuffer::{AllocRingBuffer, RingBuffer};

/// Floor of the spectrum data in dB
pub(crate) const NEGATIVE_INFINITY: f32 = -48.0;
/// Only every n-th bin becomes a point on the path
const PATH_RESOLUTION: usize = 2;
/// Paths waiting to be shown. Only the newest one is drawn.
const PATH_BLOCKS: usize = 8;

/// The editor ends of the two sample queues, published by the plugin on `initialize()`.
pub(crate) struct AnalyzerInputs {
    pub(crate) left: SampleFifoConsumer,
    pub(crate) right: SampleFifoConsumer,
    pub(crate) sample_rate: f32,
}

/// Hands the queue consumers from the plugin to whichever editor instance is open.
#[derive(Default)]
pub(crate) struct AnalyzerHandoff {
    inputs: Mutex<Option<AnalyzerInputs>>,
}

impl AnalyzerHandoff {
    /// Replaces any inputs that were not picked up yet.
    pub(crate) fn publish(&self, inputs: AnalyzerInputs) {
        *self.inputs.lock() = Some(inputs);
    }

    pub(crate) fn take(&self) -> Option<AnalyzerInputs> {
        self.inputs.lock().take()
    }
}

/// Build the spectrum path for one block of dB data inside `rect`.
///
/// Bin `n` sits at `n * bin_width` Hz on the log frequency axis. Values are plotted against the
/// response area's gain axis. Non-finite values are skipped, except for the first point which
/// falls back to the bottom edge.
pub(crate) fn generate_path(data: &[f32], rect: Rect, fft_size: usize, bin_width: f32) -> Vec<Pos2> {
    let num_bins = (fft_size / 2).min(data.len());
    let mut path = Vec::with_capacity(num_bins / PATH_RESOLUTION + 1);

    let Some(first) = data.first() else {
        return path;
    };
    let y = db_to_y(*first, rect);
    path.push(pos2(rect.left(), if y.is_finite() { y } else { rect.bottom() }));

    for bin in (1..num_bins).step_by(PATH_RESOLUTION) {
        let y = db_to_y(data[bin], rect);
        if !y.is_finite() {
            continue;
        }

        let bin_freq = bin as f32 * bin_width;
        let x = (freq_to_log_position(bin_freq) * rect.width()).floor() + rect.left();
        path.push(pos2(x, y));
    }

    path
}

/// The analyzer for one channel.
pub(crate) struct PathProducer {
    fifo: SampleFifoConsumer,
    incoming: Vec<f32>,
    mono: AllocRingBuffer<f32>,
    generator: FftDataGenerator,
    paths: AllocRingBuffer<Vec<Pos2>>,
    path: Vec<Pos2>,
    error_logged: bool,
}

impl PathProducer {
    pub(crate) fn new(fifo: SampleFifoConsumer) -> Self {
        let incoming = vec![0.0; fifo.block_size()];
        let mut mono = AllocRingBuffer::new(FFT_SIZE);
        mono.fill(0.0);

        Self {
            fifo,
            incoming,
            mono,
            generator: FftDataGenerator::new(),
            paths: AllocRingBuffer::new(PATH_BLOCKS),
            path: Vec::new(),
            error_logged: false,
        }
    }

    /// Drain every complete block from the queue and refresh the path.
    pub(crate) fn process(&mut self, rect: Rect, sample_rate: f32) {
        while self.fifo.num_complete_blocks_available() > 0 {
            if !self.fifo.pop_block(&mut self.incoming) {
                break;
            }

            // the oldest samples fall off the front
            for sample in &self.incoming {
                self.mono.push(*sample);
            }

            if let Err(err) = self
                .generator
                .produce_fft_data(self.mono.iter(), NEGATIVE_INFINITY)
            {
                if !self.error_logged {
                    nih_error!("analyzer block skipped: {err}");
                    self.error_logged = true;
                }
            }
        }

        let fft_size = self.generator.fft_size();
        let bin_width = sample_rate / fft_size as f32;

        while self.generator.num_available_fft_data_blocks() > 0 {
            if let Some(data) = self.generator.pop_fft_data() {
                self.paths
                    .push(generate_path(&data, rect, fft_size, bin_width));
            }
        }

        // an empty queue keeps the previous path
        while let Some(path) = self.paths.dequeue() {
            self.path = path;
        }
    }

    pub(crate) fn path(&self) -> &[Pos2] {
        &self.path
    }
}
