use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One OHLCV observation plus optional derived columns.
///
/// The OHLCV core is immutable once fetched; indicator stages clone the
/// bar and fill in the optional columns. A `None` in a derived column
/// means the rolling window was not yet full at that bar — an expected
/// state, not an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bar {
    /// Timestamp of the observation
    #[serde(with = "chrono::serde::ts_seconds")]
    pub time: DateTime<Utc>,

    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,

    /// Percent change of close vs the previous bar (resampler output)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percent_change: Option<f64>,

    // Moving averages
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sma_10: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sma_50: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub rsi: Option<f64>,

    // Bollinger Bands
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bb_upper: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bb_lower: Option<f64>,

    // MACD
    #[serde(skip_serializing_if = "Option::is_none")]
    pub macd: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub macd_signal: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub macd_histogram: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub atr: Option<f64>,

    // Stochastic oscillator
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percent_k: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percent_d: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percent_d_slow: Option<f64>,

    // Candlestick flags; None when the bar's range is degenerate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doji: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hammer: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engulfing: Option<bool>,
}

impl Bar {
    /// Create a bare OHLCV bar with no derived columns
    pub fn new(time: DateTime<Utc>, open: f64, high: f64, low: f64, close: f64, volume: u64) -> Self {
        Self {
            time,
            open,
            high,
            low,
            close,
            volume,
            percent_change: None,
            sma_10: None,
            sma_50: None,
            rsi: None,
            bb_upper: None,
            bb_lower: None,
            macd: None,
            macd_signal: None,
            macd_histogram: None,
            atr: None,
            percent_k: None,
            percent_d: None,
            percent_d_slow: None,
            doji: None,
            hammer: None,
            engulfing: None,
        }
    }

    /// max(high - low, |high - prev_close|, |low - prev_close|)
    pub fn true_range(&self, prev_close: f64) -> f64 {
        let hl = self.high - self.low;
        let hc = (self.high - prev_close).abs();
        let lc = (self.low - prev_close).abs();
        hl.max(hc).max(lc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_bar() -> Bar {
        Bar::new(
            Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap(),
            100.0,
            110.0,
            90.0,
            105.0,
            50_000,
        )
    }

    #[test]
    fn test_true_range_hl_dominates() {
        // high-low=20, |110-100|=10, |90-100|=10
        assert!((sample_bar().true_range(100.0) - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_true_range_gap_up() {
        // |110-70|=40 dominates
        assert!((sample_bar().true_range(70.0) - 40.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_derived_columns_skipped_when_none() {
        let json = serde_json::to_string(&sample_bar()).unwrap();
        assert!(!json.contains("rsi"));
        assert!(!json.contains("macd"));
    }
}
