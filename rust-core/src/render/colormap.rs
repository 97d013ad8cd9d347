//! Color maps for the spectrogram heatmap and its color bar

use serde::{Deserialize, Serialize};

/// Magma anchor colors at evenly spaced positions 0, 1/8, ..., 1
const MAGMA: [[u8; 3]; 9] = [
    [0, 0, 4],
    [28, 16, 68],
    [79, 18, 123],
    [129, 37, 129],
    [181, 54, 122],
    [229, 80, 100],
    [251, 135, 97],
    [254, 194, 135],
    [252, 253, 191],
];

/// Available color maps
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Colormap {
    /// Perceptually uniform black-purple-orange-white ramp
    #[default]
    Magma,

    /// Black to white
    Greyscale,
}

impl Colormap {
    /// Map a normalized value in [0, 1] to RGB; out-of-range values clamp
    pub fn map(&self, t: f64) -> [u8; 3] {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        match self {
            Colormap::Magma => interpolate(&MAGMA, t),
            Colormap::Greyscale => {
                let g = (t * 255.0).round() as u8;
                [g, g, g]
            }
        }
    }

    /// Map a dB value within [vmin, vmax]
    ///
    /// A flat range (vmin == vmax) maps everything to the low end
    pub fn map_db(&self, value: f64, vmin: f64, vmax: f64) -> [u8; 3] {
        let span = vmax - vmin;
        if span <= 0.0 {
            return self.map(0.0);
        }
        self.map((value - vmin) / span)
    }
}

fn interpolate(anchors: &[[u8; 3]], t: f64) -> [u8; 3] {
    let segments = (anchors.len() - 1) as f64;
    let pos = t * segments;
    let idx = (pos.floor() as usize).min(anchors.len() - 2);
    let frac = pos - idx as f64;

    let lo = anchors[idx];
    let hi = anchors[idx + 1];
    let mut out = [0u8; 3];
    for c in 0..3 {
        let v = lo[c] as f64 + (hi[c] as f64 - lo[c] as f64) * frac;
        out[c] = v.round().clamp(0.0, 255.0) as u8;
    }
    out
}
