//! Technical indicator engine.
//!
//! Indicator functions are stateless: slices in, vectors of per-bar
//! values out, with `None` for the leading bars where a rolling window is
//! not yet full. [`apply`] composes them onto a series by cloning the
//! bars and filling their optional columns.

mod moving;
mod oscillators;
mod patterns;
mod stats;
mod volatility;

pub use moving::{ema, macd, sma};
pub use oscillators::{rsi, stochastic};
pub use patterns::candlestick_flags;
pub use stats::{correlation, sharpe_ratio, support_resistance, SupportResistance};
pub use volatility::{atr, bollinger_bands};

use crate::constants::{
    ATR_WINDOW, BOLLINGER_K, BOLLINGER_WINDOW, MACD_LONG_SPAN, MACD_SHORT_SPAN, MACD_SIGNAL_SPAN,
    RSI_WINDOW, SMA_LONG_WINDOW, SMA_SHORT_WINDOW, STOCHASTIC_SMOOTH_D, STOCHASTIC_SMOOTH_K,
    STOCHASTIC_WINDOW,
};
use crate::error::{AppError, Result};
use crate::models::{Bar, TimeSeries};

/// Indicator families selectable through the API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndicatorKind {
    /// 10- and 50-bar simple moving averages
    Ma,
    Rsi,
    Bollinger,
    Macd,
    Atr,
    Stochastic,
    /// Candlestick pattern flags
    Patterns,
}

impl IndicatorKind {
    /// Parse a query-string indicator name; unknown names are a
    /// validation error surfaced to the caller
    pub fn parse(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "MA" | "SMA" => Ok(IndicatorKind::Ma),
            "RSI" => Ok(IndicatorKind::Rsi),
            "BB" | "BOLLINGER" => Ok(IndicatorKind::Bollinger),
            "MACD" => Ok(IndicatorKind::Macd),
            "ATR" => Ok(IndicatorKind::Atr),
            "STOCH" | "STOCHASTIC" => Ok(IndicatorKind::Stochastic),
            "PATTERNS" | "CANDLES" => Ok(IndicatorKind::Patterns),
            other => Err(AppError::Validation(format!(
                "Unknown indicator: '{}'",
                other
            ))),
        }
    }
}

/// Compute the requested indicator columns over a series, returning a new
/// series with the columns filled in. The input is never mutated.
pub fn apply(series: &[Bar], kinds: &[IndicatorKind]) -> TimeSeries {
    let mut out: TimeSeries = series.to_vec();
    let closes: Vec<f64> = series.iter().map(|b| b.close).collect();

    for kind in kinds {
        match kind {
            IndicatorKind::Ma => {
                let short = sma(&closes, SMA_SHORT_WINDOW);
                let long = sma(&closes, SMA_LONG_WINDOW);
                for (i, bar) in out.iter_mut().enumerate() {
                    bar.sma_10 = short[i];
                    bar.sma_50 = long[i];
                }
            }
            IndicatorKind::Rsi => {
                let values = rsi(&closes, RSI_WINDOW);
                for (i, bar) in out.iter_mut().enumerate() {
                    bar.rsi = values[i];
                }
            }
            IndicatorKind::Bollinger => {
                let (upper, lower) = bollinger_bands(&closes, BOLLINGER_WINDOW, BOLLINGER_K);
                for (i, bar) in out.iter_mut().enumerate() {
                    bar.bb_upper = upper[i];
                    bar.bb_lower = lower[i];
                }
            }
            IndicatorKind::Macd => {
                let (line, signal, histogram) =
                    macd(&closes, MACD_SHORT_SPAN, MACD_LONG_SPAN, MACD_SIGNAL_SPAN);
                for (i, bar) in out.iter_mut().enumerate() {
                    bar.macd = Some(line[i]);
                    bar.macd_signal = Some(signal[i]);
                    bar.macd_histogram = Some(histogram[i]);
                }
            }
            IndicatorKind::Atr => {
                let values = atr(series, ATR_WINDOW);
                for (i, bar) in out.iter_mut().enumerate() {
                    bar.atr = values[i];
                }
            }
            IndicatorKind::Stochastic => {
                let (k, d, d_slow) = stochastic(
                    series,
                    STOCHASTIC_WINDOW,
                    STOCHASTIC_SMOOTH_K,
                    STOCHASTIC_SMOOTH_D,
                );
                for (i, bar) in out.iter_mut().enumerate() {
                    bar.percent_k = k[i];
                    bar.percent_d = d[i];
                    bar.percent_d_slow = d_slow[i];
                }
            }
            IndicatorKind::Patterns => {
                let (doji, hammer, engulfing) = candlestick_flags(series);
                for (i, bar) in out.iter_mut().enumerate() {
                    bar.doji = doji[i];
                    bar.hammer = hammer[i];
                    bar.engulfing = engulfing[i];
                }
            }
        }
    }

    out
}

/// Rolling mean over a window, requiring every value in the window to be
/// defined. Shared by the smoothed stochastic lines.
pub(crate) fn rolling_mean_opt(values: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if window == 0 || values.len() < window {
        return out;
    }

    for i in (window - 1)..values.len() {
        let slice = &values[i + 1 - window..=i];
        if slice.iter().all(Option::is_some) {
            let sum: f64 = slice.iter().map(|v| v.unwrap()).sum();
            out[i] = Some(sum / window as f64);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn series(closes: &[f64]) -> Vec<Bar> {
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| {
                Bar::new(
                    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
                        + chrono::Duration::days(i as i64),
                    close,
                    close + 1.0,
                    close - 1.0,
                    close,
                    1000,
                )
            })
            .collect()
    }

    #[test]
    fn test_parse_indicator_names() {
        assert_eq!(IndicatorKind::parse("ma").unwrap(), IndicatorKind::Ma);
        assert_eq!(IndicatorKind::parse("RSI").unwrap(), IndicatorKind::Rsi);
        assert_eq!(IndicatorKind::parse("bb").unwrap(), IndicatorKind::Bollinger);
        assert!(IndicatorKind::parse("vwap").is_err());
    }

    #[test]
    fn test_apply_does_not_mutate_input() {
        let input = series(&[10.0, 11.0, 12.0]);
        let _ = apply(&input, &[IndicatorKind::Macd]);
        assert!(input.iter().all(|b| b.macd.is_none()));
    }

    #[test]
    fn test_apply_fills_requested_columns_only() {
        let input = series(&(1..=30).map(f64::from).collect::<Vec<_>>());
        let out = apply(&input, &[IndicatorKind::Ma]);
        assert!(out[29].sma_10.is_some());
        assert!(out[29].rsi.is_none());
    }

    #[test]
    fn test_rolling_mean_opt_requires_full_window() {
        let values = vec![None, Some(2.0), Some(4.0), Some(6.0)];
        let means = rolling_mean_opt(&values, 2);
        assert_eq!(means, vec![None, None, Some(3.0), Some(5.0)]);
    }
}
