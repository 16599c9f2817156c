//! Windowed magnitude spectrum of the rolling analysis buffer.

use nih_plug::util::gain_to_db;
use realfft::{num_complex::Complex, FftError, RealFftPlanner, RealToComplex};
use ringbuffer::{AllocRingBuffer, RingBuffer};
use std::sync::Arc;
use thiserror::Error;

pub(crate) const FFT_SIZE: usize = 2048;
/// Bins that end up in a block of spectrum data.
pub(crate) const NUM_BINS: usize = FFT_SIZE / 2;
/// Spectrum blocks waiting to be turned into paths. The oldest is overwritten when full.
const FFT_DATA_BLOCKS: usize = 32;

#[derive(Error, Debug)]
pub(crate) enum AnalyzerError {
    #[error("spectrum transform failed: {0}")]
    Fft(#[from] FftError),
}

type Result<T, E = AnalyzerError> = std::result::Result<T, E>;

/// Blackman-Harris window scaled so its mean is 1.
fn blackman_harris(size: usize) -> Vec<f32> {
    let n = (size - 1) as f64;
    let window: Vec<f64> = (0..size)
        .map(|i| {
            let x = std::f64::consts::TAU * i as f64 / n;
            0.35875 - 0.48829 * x.cos() + 0.14128 * (2.0 * x).cos() - 0.01168 * (3.0 * x).cos()
        })
        .collect();

    let scale = size as f64 / window.iter().sum::<f64>();
    window.into_iter().map(|w| (w * scale) as f32).collect()
}

pub(crate) struct FftDataGenerator {
    fft: Arc<dyn RealToComplex<f32>>,
    window: Vec<f32>,

    input: Vec<f32>,
    spectrum: Vec<Complex<f32>>,
    scratch: Vec<Complex<f32>>,

    blocks: AllocRingBuffer<Vec<f32>>,
}

impl Default for FftDataGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl FftDataGenerator {
    pub(crate) fn new() -> Self {
        let fft = RealFftPlanner::<f32>::new().plan_fft_forward(FFT_SIZE);
        let spectrum = fft.make_output_vec();
        let scratch = fft.make_scratch_vec();

        Self {
            fft,
            window: blackman_harris(FFT_SIZE),
            input: vec![0.0; FFT_SIZE],
            spectrum,
            scratch,
            blocks: AllocRingBuffer::new(FFT_DATA_BLOCKS),
        }
    }

    pub(crate) fn fft_size(&self) -> usize {
        FFT_SIZE
    }

    /// Window the last [`FFT_SIZE`] samples, transform them and queue one block of [`NUM_BINS`]
    /// magnitudes in dB. Magnitudes are normalised by the bin count and never go below
    /// `negative_infinity`.
    pub(crate) fn produce_fft_data<'a>(
        &mut self,
        samples: impl IntoIterator<Item = &'a f32>,
        negative_infinity: f32,
    ) -> Result<()> {
        self.input.fill(0.0);
        for ((input, sample), w) in self.input.iter_mut().zip(samples).zip(&self.window) {
            *input = sample * w;
        }

        self.fft
            .process_with_scratch(&mut self.input, &mut self.spectrum, &mut self.scratch)?;

        let data = self
            .spectrum
            .iter()
            .take(NUM_BINS)
            .map(|bin| {
                let magnitude = bin.norm() / NUM_BINS as f32;
                if magnitude > 0.0 {
                    gain_to_db(magnitude).max(negative_infinity)
                } else {
                    negative_infinity
                }
            })
            .collect();
        self.blocks.push(data);

        Ok(())
    }

    pub(crate) fn num_available_fft_data_blocks(&self) -> usize {
        self.blocks.len()
    }

    /// Oldest queued block, if any.
    pub(crate) fn pop_fft_data(&mut self) -> Option<Vec<f32>> {
        self.blocks.dequeue()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const SR: f32 = 48000.0;

    fn sine(freq: f32, amplitude: f32) -> Vec<f32> {
        (0..FFT_SIZE)
            .map(|i| amplitude * (std::f32::consts::TAU * freq * i as f32 / SR).sin())
            .collect()
    }

    mod window {
        use super::*;

        #[test]
        fn mean_is_one() {
            let window = blackman_harris(FFT_SIZE);
            let mean = window.iter().sum::<f32>() / FFT_SIZE as f32;
            assert_abs_diff_eq!(mean, 1.0, epsilon = 1e-4);
        }

        #[test]
        fn symmetric_and_tapered() {
            let window = blackman_harris(FFT_SIZE);
            assert_abs_diff_eq!(window[0], window[FFT_SIZE - 1], epsilon = 1e-6);
            assert!(window[0] < 1e-3);
            assert!(window[FFT_SIZE / 2] > 2.0);
        }
    }

    mod produce_fft_data {
        use super::*;

        #[test]
        fn silence_sits_on_floor() {
            let mut generator = FftDataGenerator::new();
            let silence = vec![0.0; FFT_SIZE];
            generator.produce_fft_data(&silence, -48.0).unwrap();

            let data = generator.pop_fft_data().unwrap();
            assert_eq!(data.len(), NUM_BINS);
            assert!(data.iter().all(|db| *db == -48.0));
        }

        #[test]
        fn sine_peaks_at_its_bin() {
            let mut generator = FftDataGenerator::new();
            // exactly on bin 64
            let freq = 64.0 * SR / FFT_SIZE as f32;
            generator.produce_fft_data(&sine(freq, 1.0), -48.0).unwrap();

            let data = generator.pop_fft_data().unwrap();
            let loudest = data
                .iter()
                .enumerate()
                .max_by(|a, b| a.1.total_cmp(b.1))
                .map(|(i, _)| i)
                .unwrap();
            assert_eq!(loudest, 64);
            // a full scale sine lands close to 0 dB with the normalised window
            assert_abs_diff_eq!(data[64], 0.0, epsilon = 0.5);
            assert!(data[300] < -40.0);
        }

        #[test]
        fn queue_keeps_newest_blocks() {
            let mut generator = FftDataGenerator::new();
            let silence = vec![0.0; FFT_SIZE];
            for _ in 0..FFT_DATA_BLOCKS + 5 {
                generator.produce_fft_data(&silence, -48.0).unwrap();
            }
            assert_eq!(generator.num_available_fft_data_blocks(), FFT_DATA_BLOCKS);

            while generator.pop_fft_data().is_some() {}
            assert_eq!(generator.num_available_fft_data_blocks(), 0);
        }
    }
}
