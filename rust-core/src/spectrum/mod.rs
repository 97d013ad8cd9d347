//! Spectral analysis with FFT

pub mod analysis;
pub mod fft;
pub mod stft;
pub mod windowing;

pub use analysis::{amplitude_to_db, Analysis, AnalyzerConfig, FrequencySpectrum, Spectrogram, SpectrumAnalyzer};
pub use fft::FftEngine;
pub use stft::{Stft, StftConfig};
pub use windowing::WindowType;
