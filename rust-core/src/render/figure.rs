//! Three-panel figure: waveform, band-limited spectrum, log-frequency spectrogram
//!
//! Heatmap and color bar pixels are written straight into a tiny-skia pixmap;
//! everything else is an SVG overlay rasterized by resvg on top.

use super::colormap::Colormap;
use super::decimate;
use super::svg::{Anchor, SvgDocument};
use super::ticks::{format_db, format_tick, linear_ticks, log2_ticks};
use crate::audio::Waveform;
use crate::error::{Result, WaveError};
use crate::spectrum::{Analysis, FrequencySpectrum, Spectrogram};
use resvg::tiny_skia::{Color, Pixmap, PixmapPaint, Transform};
use resvg::usvg::{self, fontdb};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

const LINE_COLOR: &str = "#1f77b4";
const AXIS_COLOR: &str = "#000000";

const MARGIN_LEFT: f64 = 100.0;
const MARGIN_RIGHT: f64 = 40.0;
const COLORBAR_GAP: f64 = 20.0;
const COLORBAR_WIDTH: f64 = 22.0;
const COLORBAR_LABELS: f64 = 80.0;
const PANEL_TOP: f64 = 40.0;
const PANEL_BOTTOM: f64 = 70.0;

const TITLE_SIZE: f64 = 17.0;
const LABEL_SIZE: f64 = 15.0;
const TICK_SIZE: f64 = 13.0;

/// Figure size and appearance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FigureConfig {
    /// Image width in pixels
    pub width: u32,

    /// Image height in pixels
    pub height: u32,

    /// Spectrogram color map
    pub colormap: Colormap,
}

impl Default for FigureConfig {
    fn default() -> Self {
        Self {
            width: 1400,
            height: 1200,
            colormap: Colormap::Magma,
        }
    }
}

impl FigureConfig {
    pub const MIN_SIZE: u32 = 400;
    pub const MAX_SIZE: u32 = 8000;

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn validate(&self) -> Result<()> {
        let range = Self::MIN_SIZE..=Self::MAX_SIZE;
        if !range.contains(&self.width) || !range.contains(&self.height) {
            return Err(WaveError::InvalidInput(format!(
                "figure size {}x{} outside {}..={} pixels",
                self.width,
                self.height,
                Self::MIN_SIZE,
                Self::MAX_SIZE
            )));
        }
        Ok(())
    }
}

/// Plot area in figure pixels plus the data range it shows
#[derive(Debug, Clone, Copy)]
struct Panel {
    left: f64,
    top: f64,
    width: f64,
    height: f64,
    x_range: (f64, f64),
    y_range: (f64, f64),
    log_y: bool,
}

impl Panel {
    fn right(&self) -> f64 {
        self.left + self.width
    }

    fn bottom(&self) -> f64 {
        self.top + self.height
    }

    fn x_px(&self, x: f64) -> f64 {
        let (x0, x1) = self.x_range;
        self.left + (x - x0) / (x1 - x0) * self.width
    }

    fn y_px(&self, y: f64) -> f64 {
        let (y0, y1) = self.y_range;
        let t = if self.log_y {
            (y.ln() - y0.ln()) / (y1.ln() - y0.ln())
        } else {
            (y - y0) / (y1 - y0)
        };
        self.bottom() - t * self.height
    }

    /// Data value shown at pixel row `row` (0 = top edge)
    fn y_at_row(&self, row: usize) -> f64 {
        let (y0, y1) = self.y_range;
        let t = 1.0 - (row as f64 + 0.5) / self.height;
        if self.log_y {
            (y0.ln() + t * (y1.ln() - y0.ln())).exp()
        } else {
            y0 + t * (y1 - y0)
        }
    }

    /// Data value shown at pixel column `col`
    fn x_at_col(&self, col: usize) -> f64 {
        let (x0, x1) = self.x_range;
        x0 + (col as f64 + 0.5) / self.width * (x1 - x0)
    }
}

/// Symmetric-ish value range with a 5% margin, never zero-width
fn padded_range(lo: f64, hi: f64) -> (f64, f64) {
    if !lo.is_finite() || !hi.is_finite() || hi <= lo {
        let mid = if lo.is_finite() { lo } else { 0.0 };
        return (mid - 1.0, mid + 1.0);
    }
    let pad = (hi - lo) * 0.05;
    (lo - pad, hi + pad)
}

/// Renders analysis results to a raster image
pub struct FigureRenderer {
    config: FigureConfig,
    fontdb: Arc<fontdb::Database>,
}

impl FigureRenderer {
    /// Create a renderer, loading the system fonts once
    pub fn new(config: FigureConfig) -> Result<Self> {
        config.validate()?;

        let mut db = fontdb::Database::new();
        db.load_system_fonts();

        let sans = fontdb::Query {
            families: &[fontdb::Family::SansSerif],
            ..Default::default()
        };
        if db.query(&sans).is_none() {
            // Generic family unmapped on this system, fall back to any face
            let fallback = db
                .faces()
                .find_map(|face| face.families.first().map(|(name, _)| name.clone()));
            if let Some(family) = fallback {
                db.set_sans_serif_family(family);
            }
        }

        if db.is_empty() {
            tracing::warn!("no system fonts found, figure labels will be omitted");
        } else {
            tracing::debug!(faces = db.len(), "loaded fonts");
        }

        Ok(Self {
            config,
            fontdb: Arc::new(db),
        })
    }

    /// Render the figure into a pixmap
    pub fn render(&self, wave: &Waveform, analysis: &Analysis) -> Result<Pixmap> {
        let width = self.config.width;
        let height = self.config.height;

        let mut pixmap = Pixmap::new(width, height)
            .ok_or_else(|| WaveError::Render(format!("cannot allocate {}x{} pixmap", width, height)))?;
        pixmap.fill(Color::WHITE);

        let mut doc = SvgDocument::new(width, height);
        let slot = height as f64 / 3.0;
        let full_width = width as f64 - MARGIN_LEFT - MARGIN_RIGHT;
        let plot_height = slot - PANEL_TOP - PANEL_BOTTOM;

        let time_panel = self.time_panel(wave, full_width, plot_height);
        draw_waveform(&mut doc, &time_panel, wave);

        let mut spectrum_panel = time_panel;
        spectrum_panel.top += slot;
        draw_spectrum(&mut doc, &mut spectrum_panel, &analysis.spectrum);

        let spectrogram_width =
            full_width - COLORBAR_GAP - COLORBAR_WIDTH - COLORBAR_LABELS;
        let mut spec_panel = time_panel;
        spec_panel.top += 2.0 * slot;
        spec_panel.width = spectrogram_width;
        self.draw_spectrogram(&mut pixmap, &mut doc, &mut spec_panel, &analysis.spectrogram)?;

        self.overlay(&mut pixmap, &doc.finish())?;

        Ok(pixmap)
    }

    /// Render and encode as PNG
    pub fn render_png(&self, wave: &Waveform, analysis: &Analysis) -> Result<Vec<u8>> {
        self.render(wave, analysis)?
            .encode_png()
            .map_err(|e| WaveError::Render(format!("PNG encoding failed: {}", e)))
    }

    /// Render and write a PNG to `path`, replacing any previous file
    ///
    /// The image is written to a sibling temporary file first and renamed
    /// into place, so readers never observe a partial PNG.
    pub fn render_to_file<P: AsRef<Path>>(
        &self,
        wave: &Waveform,
        analysis: &Analysis,
        path: P,
    ) -> Result<()> {
        let path = path.as_ref();
        let png = self.render_png(wave, analysis)?;

        let tmp = path.with_extension(format!("{}.tmp", uuid::Uuid::new_v4().simple()));
        std::fs::write(&tmp, &png)?;
        if let Err(e) = std::fs::rename(&tmp, path) {
            let _ = std::fs::remove_file(&tmp);
            return Err(e.into());
        }

        tracing::debug!(path = %path.display(), bytes = png.len(), "wrote figure");
        Ok(())
    }

    fn time_panel(&self, wave: &Waveform, width: f64, height: f64) -> Panel {
        let (lo, hi) = wave
            .samples()
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &s| (lo.min(s), hi.max(s)));

        Panel {
            left: MARGIN_LEFT,
            top: PANEL_TOP,
            width,
            height,
            x_range: (0.0, wave.duration_secs()),
            y_range: padded_range(lo, hi),
            log_y: false,
        }
    }

    fn draw_spectrogram(
        &self,
        pixmap: &mut Pixmap,
        doc: &mut SvgDocument,
        panel: &mut Panel,
        spectrogram: &Spectrogram,
    ) -> Result<()> {
        let fs = spectrogram.sample_rate as f64;
        let bins = spectrogram.num_bins();
        let frames = spectrogram.num_frames();
        let bin_hz = fs / spectrogram.n_fft as f64;

        // Log axis starts at the first non-DC bin
        let f_min = bin_hz;
        let f_max = (bins - 1) as f64 * bin_hz;
        panel.x_range = (0.0, spectrogram.duration_secs());
        panel.y_range = if f_max > f_min {
            (f_min, f_max)
        } else {
            (f_min, f_min * 2.0)
        };
        panel.log_y = true;

        let vmax = spectrogram.max_db();
        let vmin = spectrogram.min_db();
        let cmap = self.config.colormap;

        let w = panel.width.round() as u32;
        let h = panel.height.round() as u32;
        let mut heat = Pixmap::new(w, h)
            .ok_or_else(|| WaveError::Render("spectrogram panel has no area".into()))?;

        let hop_secs = spectrogram.hop_length as f64 / fs;
        let frame_of_col: Vec<usize> = (0..w as usize)
            .map(|col| ((panel.x_at_col(col) / hop_secs) as usize).min(frames - 1))
            .collect();

        let data = heat.data_mut();
        for row in 0..h as usize {
            let freq = panel.y_at_row(row);
            let bin = ((freq / bin_hz).round() as usize).clamp(1, bins - 1);
            for (col, &frame) in frame_of_col.iter().enumerate() {
                let [r, g, b] = cmap.map_db(spectrogram.db[[bin, frame]], vmin, vmax);
                let idx = (row * w as usize + col) * 4;
                data[idx..idx + 4].copy_from_slice(&[r, g, b, 255]);
            }
        }

        pixmap.draw_pixmap(
            panel.left.round() as i32,
            panel.top.round() as i32,
            heat.as_ref(),
            &PixmapPaint::default(),
            Transform::identity(),
            None,
        );

        let x_ticks = tick_labels(panel.x_range.0, panel.x_range.1, 10);
        let y_ticks: Vec<(f64, String)> = log2_ticks(panel.y_range.0, panel.y_range.1)
            .into_iter()
            .map(|f| (f, format!("{:.0}", f)))
            .collect();
        draw_axes(
            doc,
            panel,
            "Spectrogram (Log Frequency)",
            "Time [s]",
            "Hz",
            &x_ticks,
            &y_ticks,
        );

        self.draw_colorbar(pixmap, doc, panel, vmin, vmax)
    }

    fn draw_colorbar(
        &self,
        pixmap: &mut Pixmap,
        doc: &mut SvgDocument,
        panel: &Panel,
        vmin: f64,
        vmax: f64,
    ) -> Result<()> {
        let left = panel.right() + COLORBAR_GAP;
        let w = COLORBAR_WIDTH as u32;
        let h = panel.height.round() as u32;
        let mut bar = Pixmap::new(w, h)
            .ok_or_else(|| WaveError::Render("color bar has no area".into()))?;

        let bar_panel = Panel {
            left,
            top: panel.top,
            width: COLORBAR_WIDTH,
            height: panel.height,
            x_range: (0.0, 1.0),
            y_range: if vmax > vmin { (vmin, vmax) } else { (vmin - 1.0, vmax) },
            log_y: false,
        };

        let data = bar.data_mut();
        for row in 0..h as usize {
            let [r, g, b] = self.config.colormap.map_db(bar_panel.y_at_row(row), vmin, vmax);
            for col in 0..w as usize {
                let idx = (row * w as usize + col) * 4;
                data[idx..idx + 4].copy_from_slice(&[r, g, b, 255]);
            }
        }

        pixmap.draw_pixmap(
            left.round() as i32,
            panel.top.round() as i32,
            bar.as_ref(),
            &PixmapPaint::default(),
            Transform::identity(),
            None,
        );

        doc.frame(left, panel.top, COLORBAR_WIDTH, panel.height, AXIS_COLOR);
        let (lo, hi) = bar_panel.y_range;
        for value in linear_ticks(lo, hi, 8) {
            let y = bar_panel.y_px(value);
            doc.line(left + COLORBAR_WIDTH, y, left + COLORBAR_WIDTH + 5.0, y, AXIS_COLOR, 1.0);
            doc.text(left + COLORBAR_WIDTH + 8.0, y + 4.0, TICK_SIZE, Anchor::Start, &format_db(value));
        }

        Ok(())
    }

    /// Rasterize the vector overlay onto the pixmap
    fn overlay(&self, pixmap: &mut Pixmap, svg: &str) -> Result<()> {
        let options = usvg::Options {
            fontdb: Arc::clone(&self.fontdb),
            ..Default::default()
        };
        let tree = usvg::Tree::from_str(svg, &options)
            .map_err(|e| WaveError::Render(format!("invalid overlay SVG: {}", e)))?;
        resvg::render(&tree, Transform::default(), &mut pixmap.as_mut());
        Ok(())
    }
}

fn tick_labels(min: f64, max: f64, target: usize) -> Vec<(f64, String)> {
    let ticks = linear_ticks(min, max, target);
    let step = if ticks.len() > 1 { ticks[1] - ticks[0] } else { 1.0 };
    ticks
        .into_iter()
        .map(|v| (v, format_tick(v, step)))
        .collect()
}

fn draw_axes(
    doc: &mut SvgDocument,
    panel: &Panel,
    title: &str,
    x_label: &str,
    y_label: &str,
    x_ticks: &[(f64, String)],
    y_ticks: &[(f64, String)],
) {
    doc.frame(panel.left, panel.top, panel.width, panel.height, AXIS_COLOR);

    for (value, label) in x_ticks {
        let x = panel.x_px(*value);
        doc.line(x, panel.bottom(), x, panel.bottom() + 5.0, AXIS_COLOR, 1.0);
        doc.text(x, panel.bottom() + 20.0, TICK_SIZE, Anchor::Middle, label);
    }
    for (value, label) in y_ticks {
        let y = panel.y_px(*value);
        doc.line(panel.left - 5.0, y, panel.left, y, AXIS_COLOR, 1.0);
        doc.text(panel.left - 8.0, y + 4.0, TICK_SIZE, Anchor::End, label);
    }

    doc.text(
        panel.left + panel.width / 2.0,
        panel.top - 12.0,
        TITLE_SIZE,
        Anchor::Middle,
        title,
    );
    doc.text(
        panel.left + panel.width / 2.0,
        panel.bottom() + 45.0,
        LABEL_SIZE,
        Anchor::Middle,
        x_label,
    );
    doc.vertical_text(
        panel.left - MARGIN_LEFT + 22.0,
        panel.top + panel.height / 2.0,
        LABEL_SIZE,
        y_label,
    );
}

fn draw_waveform(doc: &mut SvgDocument, panel: &Panel, wave: &Waveform) {
    let fs = wave.sample_rate() as f64;
    let columns = panel.width as usize;
    let samples = wave.samples();

    let mut points = Vec::new();
    if samples.len() <= 2 * columns {
        points.extend(
            samples
                .iter()
                .enumerate()
                .map(|(n, &s)| (panel.x_px(n as f64 / fs), panel.y_px(s))),
        );
    } else {
        for (start, lo, hi) in decimate::envelope(samples, columns) {
            let x = panel.x_px(start as f64 / fs);
            points.push((x, panel.y_px(lo)));
            points.push((x, panel.y_px(hi)));
        }
    }
    doc.polyline(&points, LINE_COLOR, 1.0);

    let x_ticks = tick_labels(panel.x_range.0, panel.x_range.1, 10);
    let y_ticks = tick_labels(panel.y_range.0, panel.y_range.1, 6);
    draw_axes(
        doc,
        panel,
        "Time-Domain Signal",
        "Time [s]",
        "Amplitude",
        &x_ticks,
        &y_ticks,
    );
}

fn draw_spectrum(doc: &mut SvgDocument, panel: &mut Panel, spectrum: &FrequencySpectrum) {
    let top = spectrum.max_magnitude();
    panel.x_range = (0.0, spectrum.freq_limit);
    panel.y_range = if top > 0.0 { (0.0, top * 1.05) } else { (0.0, 1.0) };
    panel.log_y = false;

    let columns = panel.width as usize;
    let stems = decimate::stems(
        &spectrum.frequencies,
        &spectrum.magnitudes,
        panel.x_range.0,
        panel.x_range.1,
        columns,
    );
    let with_markers = stems.len() * 3 <= columns;

    let base = panel.y_px(0.0);
    for &(freq, mag) in &stems {
        let x = panel.x_px(freq);
        let y = panel.y_px(mag);
        doc.line(x, base, x, y, LINE_COLOR, 1.0);
        if with_markers {
            doc.circle(x, y, 3.0, LINE_COLOR);
        }
    }

    let x_ticks = tick_labels(panel.x_range.0, panel.x_range.1, 10);
    let y_ticks = tick_labels(panel.y_range.0, panel.y_range.1, 6);
    draw_axes(
        doc,
        panel,
        "FFT - Frequency Spectrum",
        "Frequency [Hz]",
        "Magnitude",
        &x_ticks,
        &y_ticks,
    );
}
