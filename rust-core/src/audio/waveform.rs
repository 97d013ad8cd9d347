//! Single-channel waveform container

use crate::error::{Result, WaveError};

/// Mono audio signal with its sample rate
#[derive(Debug, Clone, PartialEq)]
pub struct Waveform {
    samples: Vec<f64>,
    sample_rate: u32,
}

impl Waveform {
    /// Create a waveform
    ///
    /// # Arguments
    /// * `samples` - Amplitude samples (must be non-empty)
    /// * `sample_rate` - Sample rate in Hz (must be positive)
    pub fn new(samples: Vec<f64>, sample_rate: u32) -> Result<Self> {
        if samples.is_empty() {
            return Err(WaveError::InvalidInput("signal contains no samples".into()));
        }
        if sample_rate == 0 {
            return Err(WaveError::InvalidInput("sample rate must be positive".into()));
        }

        Ok(Self {
            samples,
            sample_rate,
        })
    }

    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Signal duration in seconds
    pub fn duration_secs(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }

    /// Sample instants in seconds: n / sample_rate, end point excluded
    pub fn time_axis(&self) -> Vec<f64> {
        let fs = self.sample_rate as f64;
        (0..self.samples.len()).map(|n| n as f64 / fs).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_empty_signal() {
        let err = Waveform::new(Vec::new(), 44100).unwrap_err();
        assert!(matches!(err, WaveError::InvalidInput(_)));
    }

    #[test]
    fn test_rejects_zero_sample_rate() {
        assert!(Waveform::new(vec![0.0; 4], 0).is_err());
    }

    #[test]
    fn test_time_axis() {
        let wave = Waveform::new(vec![0.0; 4], 4).unwrap();
        assert_eq!(wave.time_axis(), vec![0.0, 0.25, 0.5, 0.75]);
        assert!((wave.duration_secs() - 1.0).abs() < 1e-12);
    }
}
