//! Load -> analyze -> render, once per input file

use crate::audio;
use crate::error::Result;
use crate::render::{FigureConfig, FigureRenderer};
use crate::spectrum::{AnalyzerConfig, SpectrumAnalyzer};
use std::path::Path;
use std::time::Instant;

/// Summary of one processed file
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub sample_rate: u32,
    pub num_samples: usize,
    pub duration_secs: f64,
    /// Strongest frequency at or below the spectrum limit
    pub peak_hz: Option<f64>,
    pub frames: usize,
}

/// Stateless analysis pipeline, shared across requests
pub struct Pipeline {
    analyzer: SpectrumAnalyzer,
    renderer: FigureRenderer,
}

impl Pipeline {
    pub fn new(analyzer: AnalyzerConfig, figure: FigureConfig) -> Result<Self> {
        Ok(Self {
            analyzer: SpectrumAnalyzer::new(analyzer)?,
            renderer: FigureRenderer::new(figure)?,
        })
    }

    /// Decode `input`, analyze it and write the figure to `output`
    pub fn process_file<P: AsRef<Path>, Q: AsRef<Path>>(&self, input: P, output: Q) -> Result<Report> {
        let started = Instant::now();
        let wave = audio::load_wav(input)?;
        let loaded = started.elapsed();

        let analysis = self.analyzer.analyze(&wave)?;
        let analyzed = started.elapsed();

        self.renderer.render_to_file(&wave, &analysis, output)?;

        tracing::debug!(
            load_ms = loaded.as_millis() as u64,
            analyze_ms = (analyzed - loaded).as_millis() as u64,
            render_ms = (started.elapsed() - analyzed).as_millis() as u64,
            "pipeline stages"
        );

        Ok(Report {
            sample_rate: wave.sample_rate(),
            num_samples: wave.len(),
            duration_secs: wave.duration_secs(),
            peak_hz: analysis.spectrum.peak().map(|(freq, _)| freq),
            frames: analysis.spectrogram.num_frames(),
        })
    }
}
