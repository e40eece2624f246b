//! Simple and exponential moving averages, and the MACD built from them.

/// Simple moving average of the trailing `window` values, inclusive of
/// the current one. Undefined until the window is full.
pub fn sma(values: &[f64], window: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if window == 0 || values.len() < window {
        return out;
    }

    for i in (window - 1)..values.len() {
        let sum: f64 = values[i + 1 - window..=i].iter().sum();
        out[i] = Some(sum / window as f64);
    }
    out
}

/// Exponential moving average with smoothing `alpha = 2 / (span + 1)`,
/// seeded at the first value: `ema[0] = values[0]`,
/// `ema[t] = alpha * values[t] + (1 - alpha) * ema[t-1]`.
pub fn ema(values: &[f64], span: usize) -> Vec<f64> {
    if values.is_empty() {
        return vec![];
    }

    let alpha = 2.0 / (span as f64 + 1.0);
    let mut out = Vec::with_capacity(values.len());
    out.push(values[0]);
    for &value in &values[1..] {
        let prev = *out.last().unwrap();
        out.push(alpha * value + (1.0 - alpha) * prev);
    }
    out
}

/// MACD line, signal line and histogram.
///
/// `macd = EMA(short) - EMA(long)`; the signal line is an EMA of the MACD
/// series itself; `histogram = macd - signal`.
pub fn macd(
    closes: &[f64],
    short_span: usize,
    long_span: usize,
    signal_span: usize,
) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
    let short = ema(closes, short_span);
    let long = ema(closes, long_span);

    let line: Vec<f64> = short.iter().zip(&long).map(|(s, l)| s - l).collect();
    let signal = ema(&line, signal_span);
    let histogram: Vec<f64> = line.iter().zip(&signal).map(|(m, s)| m - s).collect();

    (line, signal, histogram)
}
