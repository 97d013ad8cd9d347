//! High-level spectrum analyzer
//!
//! Combines the whole-signal FFT and the STFT into the data behind the three
//! rendered panels

use super::fft::FftEngine;
use super::stft::{Stft, StftConfig};
use crate::audio::Waveform;
use crate::error::Result;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// Spectrum analyzer configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Highest frequency (Hz) kept in the whole-signal spectrum
    pub freq_limit: f64,

    /// Short-time transform parameters
    pub stft: StftConfig,

    /// Magnitude floor for the dB conversion
    pub amin: f64,

    /// Dynamic range below the peak kept in the spectrogram, `None` keeps all
    pub top_db: Option<f64>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            freq_limit: 4096.0,
            stft: StftConfig::default(),
            amin: 1e-5,
            top_db: Some(80.0),
        }
    }
}

impl AnalyzerConfig {
    pub fn with_freq_limit(mut self, freq_limit: f64) -> Self {
        self.freq_limit = freq_limit;
        self
    }

    pub fn with_stft(mut self, stft: StftConfig) -> Self {
        self.stft = stft;
        self
    }

    pub fn with_top_db(mut self, top_db: Option<f64>) -> Self {
        self.top_db = top_db;
        self
    }
}

/// Non-negative frequency content of the whole signal, band-limited
#[derive(Debug, Clone, PartialEq)]
pub struct FrequencySpectrum {
    /// Bin frequencies in Hz, ascending, all within [0, freq_limit]
    pub frequencies: Vec<f64>,

    /// |X[k]| for each retained bin
    pub magnitudes: Vec<f64>,

    /// Bin spacing in Hz (sample_rate / N)
    pub resolution_hz: f64,

    /// Upper frequency bound used for the cut
    pub freq_limit: f64,
}

impl FrequencySpectrum {
    pub fn len(&self) -> usize {
        self.frequencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frequencies.is_empty()
    }

    /// Frequency and magnitude of the strongest retained bin
    pub fn peak(&self) -> Option<(f64, f64)> {
        self.magnitudes
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.total_cmp(b))
            .map(|(i, &mag)| (self.frequencies[i], mag))
    }

    pub fn max_magnitude(&self) -> f64 {
        self.magnitudes.iter().fold(0.0, |acc, &m| acc.max(m))
    }
}

/// Log-magnitude spectrogram, rows are frequency bins and columns are frames
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrogram {
    /// dB values relative to the loudest cell (max is 0 dB)
    pub db: Array2<f64>,

    pub sample_rate: u32,
    pub n_fft: usize,
    pub hop_length: usize,
}

impl Spectrogram {
    pub fn num_bins(&self) -> usize {
        self.db.nrows()
    }

    pub fn num_frames(&self) -> usize {
        self.db.ncols()
    }

    /// Center frequency of each row in Hz
    pub fn frequencies(&self) -> Vec<f64> {
        let fs = self.sample_rate as f64;
        (0..self.num_bins())
            .map(|k| k as f64 * fs / self.n_fft as f64)
            .collect()
    }

    /// Start time of each frame in seconds
    pub fn frame_times(&self) -> Vec<f64> {
        let fs = self.sample_rate as f64;
        (0..self.num_frames())
            .map(|f| (f * self.hop_length) as f64 / fs)
            .collect()
    }

    /// Time covered by the frames, one hop per frame
    pub fn duration_secs(&self) -> f64 {
        (self.num_frames() * self.hop_length) as f64 / self.sample_rate as f64
    }

    pub fn max_db(&self) -> f64 {
        self.db.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    pub fn min_db(&self) -> f64 {
        self.db.iter().copied().fold(f64::INFINITY, f64::min)
    }
}

/// Everything computed for one waveform
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub spectrum: FrequencySpectrum,
    pub spectrogram: Spectrogram,
}

/// Convert a magnitude matrix to dB relative to its own maximum
///
/// 20*log10(max(amin, S)) - 20*log10(max(amin, max(S))), floored at
/// `peak - top_db` when a range is given
pub fn amplitude_to_db(magnitude: &Array2<f64>, amin: f64, top_db: Option<f64>) -> Array2<f64> {
    let reference = magnitude.iter().copied().fold(0.0, f64::max);
    let ref_db = 20.0 * reference.max(amin).log10();

    let mut db = magnitude.mapv(|m| 20.0 * m.max(amin).log10() - ref_db);

    if let Some(range) = top_db {
        let floor = db.iter().copied().fold(f64::NEG_INFINITY, f64::max) - range;
        db.mapv_inplace(|v| v.max(floor));
    }

    db
}

/// Whole-signal and short-time spectral analyzer
pub struct SpectrumAnalyzer {
    config: AnalyzerConfig,
    stft: Stft,
}

impl SpectrumAnalyzer {
    /// Create new spectrum analyzer
    pub fn new(config: AnalyzerConfig) -> Result<Self> {
        let stft = Stft::new(config.stft.clone())?;
        Ok(Self { config, stft })
    }

    /// Band-limited magnitude spectrum of the complete signal
    pub fn spectrum(&self, wave: &Waveform) -> Result<FrequencySpectrum> {
        let sample_rate = wave.sample_rate() as f64;
        let mut engine = FftEngine::new(wave.len());
        let magnitude = engine.compute_magnitude(wave.samples())?;

        let (frequencies, magnitudes): (Vec<f64>, Vec<f64>) = (0..engine.num_positive_bins())
            .map(|k| (engine.bin_to_hz(k, sample_rate), magnitude[k]))
            .take_while(|&(freq, _)| freq <= self.config.freq_limit)
            .unzip();

        Ok(FrequencySpectrum {
            frequencies,
            magnitudes,
            resolution_hz: engine.resolution_hz(sample_rate),
            freq_limit: self.config.freq_limit,
        })
    }

    /// dB-scaled STFT magnitude
    pub fn spectrogram(&self, wave: &Waveform) -> Result<Spectrogram> {
        let magnitude = self.stft.magnitude(wave.samples())?;
        let db = amplitude_to_db(&magnitude, self.config.amin, self.config.top_db);

        Ok(Spectrogram {
            db,
            sample_rate: wave.sample_rate(),
            n_fft: self.config.stft.n_fft,
            hop_length: self.config.stft.hop_length,
        })
    }

    /// Run both transforms
    pub fn analyze(&self, wave: &Waveform) -> Result<Analysis> {
        let spectrum = self.spectrum(wave)?;
        let spectrogram = self.spectrogram(wave)?;

        tracing::debug!(
            spectrum_bins = spectrum.len(),
            frames = spectrogram.num_frames(),
            "analysis complete"
        );

        Ok(Analysis {
            spectrum,
            spectrogram,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use std::f64::consts::PI;

    fn sine(freq_hz: f64, sample_rate: u32, len: usize) -> Waveform {
        let fs = sample_rate as f64;
        let samples = (0..len)
            .map(|n| (2.0 * PI * freq_hz * n as f64 / fs).sin())
            .collect();
        Waveform::new(samples, sample_rate).unwrap()
    }

    #[test]
    fn test_spectrum_peak_at_sine_frequency() {
        let analyzer = SpectrumAnalyzer::new(AnalyzerConfig::default()).unwrap();
        let wave = sine(440.0, 44100, 44100);

        let spectrum = analyzer.spectrum(&wave).unwrap();
        let (peak_freq, _) = spectrum.peak().unwrap();

        assert!((peak_freq - 440.0).abs() <= spectrum.resolution_hz);
    }

    #[test]
    fn test_builder_overrides() {
        let stft = StftConfig {
            n_fft: 256,
            hop_length: 64,
            ..StftConfig::default()
        };
        let config = AnalyzerConfig::default()
            .with_freq_limit(1000.0)
            .with_stft(stft)
            .with_top_db(None);
        let analyzer = SpectrumAnalyzer::new(config).unwrap();
        // 1000 Hz is exactly bin 32 of a 256-point frame at 8 kHz
        let wave = sine(1000.0, 8000, 4096);

        let analysis = analyzer.analyze(&wave).unwrap();
        assert_eq!(analysis.spectrum.frequencies.last().copied(), Some(1000.0));
        assert_eq!(analysis.spectrogram.num_bins(), 129);
        assert_eq!(analysis.spectrogram.hop_length, 64);
        // Without a top_db clamp the floor reaches far below -80 dB
        assert!(analysis.spectrogram.min_db() < -100.0);

        let clamped = SpectrumAnalyzer::new(AnalyzerConfig::default().with_stft(
            StftConfig {
                n_fft: 256,
                hop_length: 64,
                ..StftConfig::default()
            },
        ))
        .unwrap();
        assert!(clamped.spectrogram(&wave).unwrap().min_db() >= -80.0);
    }

    #[test]
    fn test_spectrum_respects_freq_limit() {
        let analyzer = SpectrumAnalyzer::new(AnalyzerConfig::default()).unwrap();
        let wave = sine(6000.0, 48000, 4800);

        let spectrum = analyzer.spectrum(&wave).unwrap();

        assert!(spectrum.frequencies.iter().all(|&f| (0.0..=4096.0).contains(&f)));
        // 10 Hz bins: 0, 10, ..., 4090
        assert_eq!(spectrum.len(), 410);
        assert_eq!(spectrum.frequencies.len(), spectrum.magnitudes.len());
    }

    #[test]
    fn test_spectrum_includes_limit_bin() {
        // 1 Hz bins land exactly on 4096 Hz
        let analyzer = SpectrumAnalyzer::new(AnalyzerConfig::default()).unwrap();
        let wave = Waveform::new(vec![0.0; 10000], 10000).unwrap();

        let spectrum = analyzer.spectrum(&wave).unwrap();
        assert_eq!(spectrum.frequencies.last().copied(), Some(4096.0));
    }

    #[test]
    fn test_spectrum_half_length_when_below_limit() {
        let analyzer = SpectrumAnalyzer::new(AnalyzerConfig::default()).unwrap();
        let wave = Waveform::new(vec![0.1; 101], 1000).unwrap();

        let spectrum = analyzer.spectrum(&wave).unwrap();
        assert_eq!(spectrum.len(), 50);
    }

    #[test]
    fn test_zero_signal_has_zero_spectrum() {
        let analyzer = SpectrumAnalyzer::new(AnalyzerConfig::default()).unwrap();
        let wave = Waveform::new(vec![0.0; 4096], 8000).unwrap();

        let spectrum = analyzer.spectrum(&wave).unwrap();
        assert!(spectrum.magnitudes.iter().all(|&m| m == 0.0));
    }

    #[test]
    fn test_spectrogram_peak_is_zero_db() {
        let analyzer = SpectrumAnalyzer::new(AnalyzerConfig::default()).unwrap();
        let wave = sine(1000.0, 22050, 22050);

        let spectrogram = analyzer.spectrogram(&wave).unwrap();

        assert_eq!(spectrogram.max_db(), 0.0);
        assert!(spectrogram.min_db() >= -80.0);
        assert_eq!(spectrogram.num_bins(), 1025);
        assert_eq!(spectrogram.num_frames(), 1 + (22050 - 2048usize).div_ceil(512));
    }

    #[test]
    fn test_spectrogram_of_silence() {
        let analyzer = SpectrumAnalyzer::new(AnalyzerConfig::default()).unwrap();
        let wave = Waveform::new(vec![0.0; 3000], 8000).unwrap();

        let spectrogram = analyzer.spectrogram(&wave).unwrap();
        assert!(spectrogram.db.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_amplitude_to_db() {
        let mag = array![[10.0, 1.0], [0.1, 0.0]];

        let db = amplitude_to_db(&mag, 1e-5, None);
        assert_eq!(db[[0, 0]], 0.0);
        assert!((db[[0, 1]] + 20.0).abs() < 1e-9);
        assert!((db[[1, 0]] + 40.0).abs() < 1e-9);
        assert!((db[[1, 1]] + 120.0).abs() < 1e-9);

        let clipped = amplitude_to_db(&mag, 1e-5, Some(30.0));
        assert!((clipped[[1, 0]] + 30.0).abs() < 1e-9);
        assert!((clipped[[1, 1]] + 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_axes() {
        let spectrogram = Spectrogram {
            db: Array2::zeros((5, 3)),
            sample_rate: 8000,
            n_fft: 8,
            hop_length: 4,
        };

        assert_eq!(spectrogram.frequencies(), vec![0.0, 1000.0, 2000.0, 3000.0, 4000.0]);
        assert_eq!(spectrogram.frame_times(), vec![0.0, 0.0005, 0.001]);
        assert!((spectrogram.duration_secs() - 0.0015).abs() < 1e-12);
    }
}
