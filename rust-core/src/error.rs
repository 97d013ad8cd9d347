//! Error types for the analysis pipeline

use thiserror::Error;

#[derive(Error, Debug)]
pub enum WaveError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Failed to decode WAV data: {0}")]
    Decode(#[from] symphonia::core::errors::Error),

    #[error("FFT processing failed: {0}")]
    Fft(String),

    #[error("Failed to render figure: {0}")]
    Render(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias used across the crate
pub type Result<T> = std::result::Result<T, WaveError>;
