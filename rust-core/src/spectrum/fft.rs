//! Whole-signal FFT engine using rustfft
//!
//! Transforms the complete signal in one pass (no windowing, no padding),
//! for any length N

use crate::error::{Result, WaveError};
use num_complex::Complex64;
use rustfft::{Fft, FftPlanner};
use std::sync::Arc;

/// FFT engine for a fixed transform size
pub struct FftEngine {
    /// FFT size (number of samples)
    fft_size: usize,

    /// Complex FFT processor
    fft: Arc<dyn Fft<f64>>,

    /// Reusable in-place buffer
    buffer: Vec<Complex64>,

    /// Reusable scratch space
    scratch: Vec<Complex64>,
}

impl FftEngine {
    /// Create new FFT engine
    ///
    /// # Arguments
    /// * `fft_size` - FFT size (number of samples, any positive length)
    pub fn new(fft_size: usize) -> Self {
        let mut planner = FftPlanner::<f64>::new();
        let fft = planner.plan_fft_forward(fft_size);
        let scratch = vec![Complex64::new(0.0, 0.0); fft.get_inplace_scratch_len()];

        Self {
            fft_size,
            fft,
            buffer: vec![Complex64::new(0.0, 0.0); fft_size],
            scratch,
        }
    }

    /// Compute the full complex spectrum X[k] for k = 0..N-1
    ///
    /// The signal length must equal the engine's FFT size
    pub fn compute(&mut self, signal: &[f64]) -> Result<&[Complex64]> {
        if signal.is_empty() {
            return Err(WaveError::InvalidInput("cannot transform an empty signal".into()));
        }
        if signal.len() != self.fft_size {
            return Err(WaveError::Fft(format!(
                "signal length {} does not match FFT size {}",
                signal.len(),
                self.fft_size
            )));
        }

        for (slot, &s) in self.buffer.iter_mut().zip(signal.iter()) {
            *slot = Complex64::new(s, 0.0);
        }

        self.fft.process_with_scratch(&mut self.buffer, &mut self.scratch);

        Ok(&self.buffer)
    }

    /// Compute magnitude spectrum |X[k]| for all N bins
    pub fn compute_magnitude(&mut self, signal: &[f64]) -> Result<Vec<f64>> {
        Ok(self.compute(signal)?.iter().map(|c| c.norm()).collect())
    }

    /// Number of non-negative frequency bins reported for display: floor(N/2)
    pub fn num_positive_bins(&self) -> usize {
        self.fft_size / 2
    }

    /// Convert bin index to frequency in Hz: k * sample_rate / N
    pub fn bin_to_hz(&self, bin: usize, sample_rate: f64) -> f64 {
        bin as f64 * sample_rate / self.fft_size as f64
    }

    /// Frequency resolution in Hz (sample_rate / N)
    pub fn resolution_hz(&self, sample_rate: f64) -> f64 {
        sample_rate / self.fft_size as f64
    }
}
