//! Reduce long series to what a pixel grid can show
//!
//! Drawing only; the analysis always works on the full data.

/// Min/max envelope of `samples` split into `columns` equal buckets
///
/// Returns one `(start_index, min, max)` per non-empty bucket. When the
/// signal already fits (`samples.len() <= columns`) each sample is its own
/// bucket.
pub fn envelope(samples: &[f64], columns: usize) -> Vec<(usize, f64, f64)> {
    let n = samples.len();
    if n == 0 || columns == 0 {
        return Vec::new();
    }
    if n <= columns {
        return samples.iter().enumerate().map(|(i, &s)| (i, s, s)).collect();
    }

    (0..columns)
        .filter_map(|c| {
            let start = c * n / columns;
            let end = ((c + 1) * n / columns).min(n);
            let bucket = &samples[start..end];
            if bucket.is_empty() {
                return None;
            }
            let (lo, hi) = bucket
                .iter()
                .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &s| (lo.min(s), hi.max(s)));
            Some((start, lo, hi))
        })
        .collect()
}

/// Keep the tallest stem per pixel column
///
/// `frequencies` must be ascending and lie in [x_min, x_max]. Returns
/// `(frequency, magnitude)` pairs, unchanged when they already fit.
pub fn stems(
    frequencies: &[f64],
    magnitudes: &[f64],
    x_min: f64,
    x_max: f64,
    columns: usize,
) -> Vec<(f64, f64)> {
    let pairs = frequencies.iter().copied().zip(magnitudes.iter().copied());
    if frequencies.len() <= columns || columns == 0 || x_max <= x_min {
        return pairs.collect();
    }

    let mut best: Vec<Option<(f64, f64)>> = vec![None; columns];
    for (f, m) in pairs {
        let t = (f - x_min) / (x_max - x_min);
        let col = ((t * columns as f64) as usize).min(columns - 1);
        match best[col] {
            Some((_, prev)) if prev >= m => {}
            _ => best[col] = Some((f, m)),
        }
    }

    best.into_iter().flatten().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_short_signal_untouched() {
        let env = envelope(&[0.1, -0.2, 0.3], 10);
        assert_eq!(env, vec![(0, 0.1, 0.1), (1, -0.2, -0.2), (2, 0.3, 0.3)]);
    }

    #[test]
    fn test_envelope_buckets() {
        let samples: Vec<f64> = (0..100).map(|i| if i % 2 == 0 { 1.0 } else { -1.0 }).collect();
        let env = envelope(&samples, 10);

        assert_eq!(env.len(), 10);
        assert_eq!(env[3], (30, -1.0, 1.0));
        assert!(env.iter().all(|&(_, lo, hi)| lo == -1.0 && hi == 1.0));
    }

    #[test]
    fn test_stems_keep_tallest() {
        let freqs: Vec<f64> = (0..100).map(|i| i as f64).collect();
        let mut mags = vec![1.0; 100];
        mags[42] = 9.0;

        let kept = stems(&freqs, &mags, 0.0, 100.0, 10);
        assert_eq!(kept.len(), 10);
        assert!(kept.contains(&(42.0, 9.0)));
    }

    #[test]
    fn test_stems_fit() {
        let kept = stems(&[1.0, 2.0], &[3.0, 4.0], 0.0, 10.0, 50);
        assert_eq!(kept, vec![(1.0, 3.0), (2.0, 4.0)]);
    }
}
