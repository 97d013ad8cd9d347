//! Audio loading

pub mod loader;
pub mod waveform;

pub use loader::{load_wav, load_wav_bytes};
pub use waveform::Waveform;
