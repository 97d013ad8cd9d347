//! Wavescope - WAV spectrum and spectrogram visualizer
//!
//! Decodes an uploaded waveform, computes its whole-signal FFT and a
//! short-time spectrogram, and renders both next to the time-domain signal.

pub mod audio;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod render;
pub mod spectrum;
pub mod web;

pub use audio::{load_wav, Waveform};
pub use error::{Result, WaveError};
pub use pipeline::{Pipeline, Report};
pub use render::{FigureConfig, FigureRenderer};
pub use spectrum::{AnalyzerConfig, SpectrumAnalyzer};
pub use web::{ServerConfig, WebServer};
