//! Axis tick placement and labels

/// Evenly spaced "nice" ticks (1, 2, 5 x 10^k steps) covering [min, max]
///
/// # Arguments
/// * `min`, `max` - Axis range
/// * `target` - Approximate number of ticks wanted
pub fn linear_ticks(min: f64, max: f64, target: usize) -> Vec<f64> {
    if !min.is_finite() || !max.is_finite() || max <= min {
        return vec![min];
    }

    let step = nice_step((max - min) / target.max(1) as f64);
    let first = (min / step).ceil() as i64;
    let last = (max / step).floor() as i64;

    (first..=last)
        .map(|i| {
            let v = i as f64 * step;
            // Avoid printing -0
            if v == 0.0 {
                0.0
            } else {
                v
            }
        })
        .collect()
}

/// Round a raw step up to 1, 2, 5 or 10 times a power of ten
pub fn nice_step(raw: f64) -> f64 {
    let magnitude = 10f64.powi(raw.log10().floor() as i32);
    let fraction = raw / magnitude;
    let nice = if fraction <= 1.0 {
        1.0
    } else if fraction <= 2.0 {
        2.0
    } else if fraction <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * magnitude
}

/// Powers of two inside [min, max] for a log-frequency axis
pub fn log2_ticks(min: f64, max: f64) -> Vec<f64> {
    if !min.is_finite() || !max.is_finite() || min <= 0.0 || max <= min {
        return Vec::new();
    }
    let lo = min.log2().ceil() as i32;
    let hi = max.log2().floor() as i32;
    (lo..=hi).map(|e| 2f64.powi(e)).collect()
}

/// Format a tick value with just enough decimals for the step size
pub fn format_tick(value: f64, step: f64) -> String {
    let decimals = if step >= 1.0 || step <= 0.0 {
        0
    } else {
        (-step.log10().floor()) as usize
    };
    format!("{:.*}", decimals, value)
}

/// Color bar label, signed with a dB suffix: "+0 dB", "-20 dB"
pub fn format_db(value: f64) -> String {
    let rounded = value.round();
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    format!("{:+.0} dB", rounded)
}
