//! Volatility measures: Bollinger Bands and Average True Range.

use super::sma;
use crate::models::Bar;

/// Upper and lower Bollinger Bands: SMA(window) ± k standard deviations.
///
/// Uses the sample standard deviation (n - 1 denominator), so a window of
/// one bar has no defined band.
pub fn bollinger_bands(closes: &[f64], window: usize, k: f64) -> (Vec<Option<f64>>, Vec<Option<f64>>) {
    let mut upper = vec![None; closes.len()];
    let mut lower = vec![None; closes.len()];
    if window < 2 || closes.len() < window {
        return (upper, lower);
    }

    let mid = sma(closes, window);
    for i in (window - 1)..closes.len() {
        let mean = mid[i].unwrap();
        let slice = &closes[i + 1 - window..=i];
        let variance: f64 =
            slice.iter().map(|c| (c - mean).powi(2)).sum::<f64>() / (window - 1) as f64;
        let std = variance.sqrt();

        upper[i] = Some(mean + k * std);
        lower[i] = Some(mean - k * std);
    }
    (upper, lower)
}

/// Average True Range: rolling mean of the per-bar true range over the
/// trailing window. The first bar has no previous close, so its true
/// range collapses to `high - low`.
pub fn atr(bars: &[Bar], window: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; bars.len()];
    if window == 0 || bars.len() < window {
        return out;
    }

    let mut true_ranges = Vec::with_capacity(bars.len());
    for (i, bar) in bars.iter().enumerate() {
        let tr = if i == 0 {
            bar.high - bar.low
        } else {
            bar.true_range(bars[i - 1].close)
        };
        true_ranges.push(tr);
    }

    for i in (window - 1)..bars.len() {
        let sum: f64 = true_ranges[i + 1 - window..=i].iter().sum();
        out[i] = Some(sum / window as f64);
    }
    out
}
