//! Bounded momentum oscillators: RSI and the stochastic oscillator.

use super::rolling_mean_opt;
use crate::constants::RSI_EPSILON;
use crate::models::Bar;

/// Relative Strength Index over the trailing `window` bars.
///
/// Per-bar gains and losses come from close-to-close deltas, so the first
/// bar has no delta and the first defined RSI lands at index `window`.
/// The average loss is floored at a small epsilon to avoid division by
/// zero; an all-gain window therefore saturates near 100.
pub fn rsi(closes: &[f64], window: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; closes.len()];
    if window == 0 || closes.len() <= window {
        return out;
    }

    let mut gains = vec![0.0; closes.len()];
    let mut losses = vec![0.0; closes.len()];
    for i in 1..closes.len() {
        let delta = closes[i] - closes[i - 1];
        gains[i] = delta.max(0.0);
        losses[i] = (-delta).max(0.0);
    }

    for i in window..closes.len() {
        let slice = i + 1 - window..=i;
        let avg_gain: f64 = gains[slice.clone()].iter().sum::<f64>() / window as f64;
        let avg_loss: f64 = losses[slice].iter().sum::<f64>() / window as f64;

        let rs = avg_gain / avg_loss.max(RSI_EPSILON);
        out[i] = Some(100.0 - 100.0 / (1.0 + rs));
    }
    out
}

/// Stochastic oscillator: %K, %D and slow %D.
///
/// `%K = (close - min(low)) / (max(high) - min(low)) * 100` over the
/// trailing window; undefined while the window fills and when the window
/// range is degenerate (`max(high) == min(low)`). %D is an SMA of %K over
/// `smooth_k` bars, and slow %D an SMA of %D over `smooth_d` bars.
pub fn stochastic(
    bars: &[Bar],
    window: usize,
    smooth_k: usize,
    smooth_d: usize,
) -> (Vec<Option<f64>>, Vec<Option<f64>>, Vec<Option<f64>>) {
    let mut percent_k = vec![None; bars.len()];
    if window == 0 || bars.len() < window {
        let d = vec![None; bars.len()];
        return (percent_k, d.clone(), d);
    }

    for i in (window - 1)..bars.len() {
        let slice = &bars[i + 1 - window..=i];
        let low_min = slice.iter().map(|b| b.low).fold(f64::INFINITY, f64::min);
        let high_max = slice.iter().map(|b| b.high).fold(f64::NEG_INFINITY, f64::max);

        let range = high_max - low_min;
        if range > 0.0 {
            percent_k[i] = Some((bars[i].close - low_min) / range * 100.0);
        }
    }

    let percent_d = rolling_mean_opt(&percent_k, smooth_k);
    let percent_d_slow = rolling_mean_opt(&percent_d, smooth_d);
    (percent_k, percent_d, percent_d_slow)
}
