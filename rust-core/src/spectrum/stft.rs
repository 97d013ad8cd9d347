//! Short-time Fourier transform using realfft
//!
//! Frame f covers samples [f*hop, f*hop + n_fft). Samples past the end of
//! the signal read as zero, so a signal shorter than one window still
//! produces exactly one frame.

use super::windowing::{apply_window_inplace, generate_periodic_window, WindowType};
use crate::error::{Result, WaveError};
use ndarray::Array2;
use num_complex::Complex64;
use realfft::{RealFftPlanner, RealToComplex};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// STFT parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StftConfig {
    /// Window (and FFT) size in samples
    pub n_fft: usize,

    /// Samples advanced between successive frames
    pub hop_length: usize,

    /// Analysis window applied to each frame
    pub window: WindowType,

    /// Pad n_fft/2 zeros on both sides so frame f is centered on f*hop
    pub center: bool,
}

impl Default for StftConfig {
    fn default() -> Self {
        Self {
            n_fft: 2048,
            hop_length: 512,
            window: WindowType::Hann,
            center: false,
        }
    }
}

impl StftConfig {
    /// Number of frequency bins per frame (n_fft/2 + 1)
    pub fn num_bins(&self) -> usize {
        self.n_fft / 2 + 1
    }

    /// Number of frames produced for a signal of `len` samples
    pub fn num_frames(&self, len: usize) -> usize {
        if self.center {
            1 + len / self.hop_length
        } else if len <= self.n_fft {
            1
        } else {
            1 + (len - self.n_fft).div_ceil(self.hop_length)
        }
    }

    fn validate(&self) -> Result<()> {
        if self.n_fft < 2 {
            return Err(WaveError::InvalidInput(format!(
                "STFT window size must be at least 2 (got {})",
                self.n_fft
            )));
        }
        if self.hop_length == 0 {
            return Err(WaveError::InvalidInput("STFT hop size must be positive".into()));
        }
        Ok(())
    }
}

/// Short-time Fourier transform processor
pub struct Stft {
    config: StftConfig,
    window: Vec<f64>,
    plan: Arc<dyn RealToComplex<f64>>,
}

impl Stft {
    pub fn new(config: StftConfig) -> Result<Self> {
        config.validate()?;

        let mut planner = RealFftPlanner::<f64>::new();
        let plan = planner.plan_fft_forward(config.n_fft);
        let window = generate_periodic_window(config.window, config.n_fft);

        Ok(Self {
            config,
            window,
            plan,
        })
    }

    /// Compute the complex STFT
    ///
    /// # Returns
    /// Matrix of shape (n_fft/2 + 1, frames); rows are frequency bins,
    /// columns are time frames
    pub fn forward(&self, samples: &[f64]) -> Result<Array2<Complex64>> {
        if samples.is_empty() {
            return Err(WaveError::InvalidInput("cannot transform an empty signal".into()));
        }

        let n_fft = self.config.n_fft;
        let hop = self.config.hop_length;
        let offset = if self.config.center { n_fft / 2 } else { 0 };
        let frames = self.config.num_frames(samples.len());

        let mut output = Array2::<Complex64>::zeros((self.config.num_bins(), frames));

        let mut frame_time = self.plan.make_input_vec();
        let mut frame_freq = self.plan.make_output_vec();
        let mut scratch = self.plan.make_scratch_vec();

        for f in 0..frames {
            // Position of frame start in the (virtually) padded signal
            let start = (f * hop) as isize - offset as isize;
            for (i, slot) in frame_time.iter_mut().enumerate() {
                let idx = start + i as isize;
                *slot = if idx >= 0 && (idx as usize) < samples.len() {
                    samples[idx as usize]
                } else {
                    0.0
                };
            }

            apply_window_inplace(&mut frame_time, &self.window);

            self.plan
                .process_with_scratch(&mut frame_time, &mut frame_freq, &mut scratch)
                .map_err(|e| WaveError::Fft(format!("STFT frame {} failed: {}", f, e)))?;

            output.column_mut(f).assign(&ndarray::ArrayView1::from(&frame_freq[..]));
        }

        Ok(output)
    }

    /// Compute the STFT magnitude |X[k, f]|
    pub fn magnitude(&self, samples: &[f64]) -> Result<Array2<f64>> {
        Ok(self.forward(samples)?.mapv(|c| c.norm()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_frame_count() {
        let config = StftConfig::default();
        assert_eq!(config.num_frames(1), 1);
        assert_eq!(config.num_frames(2048), 1);
        assert_eq!(config.num_frames(2049), 2);
        assert_eq!(config.num_frames(2048 + 512), 2);
        assert_eq!(config.num_frames(2048 + 513), 3);

        let centered = StftConfig {
            center: true,
            ..StftConfig::default()
        };
        assert_eq!(centered.num_frames(22050), 44);
    }

    #[test]
    fn test_short_signal_yields_single_frame() {
        let stft = Stft::new(StftConfig::default()).unwrap();
        let spec = stft.forward(&vec![0.5; 100]).unwrap();

        assert_eq!(spec.dim(), (1025, 1));
    }

    #[test]
    fn test_empty_signal_rejected() {
        let stft = Stft::new(StftConfig::default()).unwrap();
        assert!(matches!(stft.forward(&[]), Err(WaveError::InvalidInput(_))));
    }

    #[test]
    fn test_centered_frames_around_impulse() {
        let config = StftConfig {
            n_fft: 8,
            hop_length: 2,
            center: true,
            ..StftConfig::default()
        };
        let stft = Stft::new(config.clone()).unwrap();
        let mut impulse = vec![0.0; 16];
        impulse[0] = 1.0;

        let mag = stft.magnitude(&impulse).unwrap();
        assert_eq!(mag.dim(), (5, 9));

        // Frame 0 is centered on sample 0: the impulse meets w[4] == 1
        assert!(mag.column(0).iter().all(|&m| (m - 1.0).abs() < 1e-12));
        // Frame 1 sees it two samples left of center: w[2] == 0.5
        assert!(mag.column(1).iter().all(|&m| (m - 0.5).abs() < 1e-12));
        // From frame 2 on it sits on w[0] == 0 or outside the frame
        assert!(mag.columns().into_iter().skip(2).all(|c| c.iter().all(|&m| m.abs() < 1e-12)));

        let uncentered = Stft::new(StftConfig {
            center: false,
            ..config
        })
        .unwrap();
        let mag = uncentered.magnitude(&impulse).unwrap();
        assert_eq!(mag.dim(), (5, 5));
        assert!(mag.iter().all(|&m| m.abs() < 1e-12));
    }

    #[test]
    fn test_invalid_config() {
        let config = StftConfig {
            hop_length: 0,
            ..StftConfig::default()
        };
        assert!(Stft::new(config).is_err());
    }

    #[test]
    fn test_sine_peaks_in_expected_bin() {
        let sr = 16000.0;
        let config = StftConfig {
            n_fft: 1024,
            hop_length: 256,
            ..StftConfig::default()
        };
        let stft = Stft::new(config).unwrap();

        // Bin 64 of a 1024-point FFT at 16 kHz is exactly 1000 Hz; 8192
        // samples tile the frames without a zero-padded tail
        let signal: Vec<f64> = (0..8192)
            .map(|n| (2.0 * PI * 1000.0 * n as f64 / sr).sin())
            .collect();
        let mag = stft.magnitude(&signal).unwrap();

        for frame in mag.columns() {
            let (peak, _) = frame
                .iter()
                .enumerate()
                .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap())
                .unwrap();
            assert_eq!(peak, 64);
        }
    }
}
