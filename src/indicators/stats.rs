//! Series-level statistics: support/resistance, Sharpe ratio and
//! cross-series correlation.

use crate::constants::TRADING_DAYS_PER_YEAR;
use crate::error::{AppError, Result};
use crate::models::Bar;
use serde::Serialize;
use std::collections::HashMap;

/// Trailing support and resistance levels over the final bars of a series
#[derive(Debug, Clone, Serialize)]
pub struct SupportResistance {
    #[serde(rename = "Support")]
    pub support: f64,
    #[serde(rename = "Resistance")]
    pub resistance: f64,
}

/// Support = min(low), resistance = max(high) over the last `window` bars
/// of the series. One trailing window at the series end, not per-bar.
pub fn support_resistance(bars: &[Bar], window: usize) -> Result<SupportResistance> {
    if window == 0 || bars.len() < window {
        return Err(AppError::InsufficientData(format!(
            "support/resistance needs {} bars, have {}",
            window,
            bars.len()
        )));
    }

    let tail = &bars[bars.len() - window..];
    Ok(SupportResistance {
        support: tail.iter().map(|b| b.low).fold(f64::INFINITY, f64::min),
        resistance: tail.iter().map(|b| b.high).fold(f64::NEG_INFINITY, f64::max),
    })
}

/// Annualized Sharpe ratio over daily close-to-close returns:
/// `(mean(returns) - risk_free_rate) / std(returns) * sqrt(252)`
pub fn sharpe_ratio(bars: &[Bar], risk_free_rate: f64) -> Result<f64> {
    let returns: Vec<f64> = bars
        .windows(2)
        .filter(|pair| pair[0].close != 0.0)
        .map(|pair| pair[1].close / pair[0].close - 1.0)
        .collect();

    if returns.len() < 2 {
        return Err(AppError::InsufficientData(format!(
            "Sharpe ratio needs at least 3 bars, have {}",
            bars.len()
        )));
    }

    let mean = returns.iter().sum::<f64>() / returns.len() as f64;
    let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>()
        / (returns.len() - 1) as f64;
    let std_dev = variance.sqrt();

    if std_dev == 0.0 {
        return Err(AppError::InsufficientData(
            "Sharpe ratio undefined for constant returns".to_string(),
        ));
    }

    Ok((mean - risk_free_rate) / std_dev * TRADING_DAYS_PER_YEAR.sqrt())
}

/// Pearson correlation of two series' closes, joined on matching
/// timestamps. Fails when fewer than 2 rows join or when either joined
/// close column is constant.
pub fn correlation(series_a: &[Bar], series_b: &[Bar]) -> Result<f64> {
    let by_time: HashMap<_, f64> = series_a.iter().map(|b| (b.time, b.close)).collect();

    let joined: Vec<(f64, f64)> = series_b
        .iter()
        .filter_map(|b| by_time.get(&b.time).map(|&a_close| (a_close, b.close)))
        .collect();

    if joined.len() < 2 {
        return Err(AppError::InsufficientData(format!(
            "correlation needs at least 2 joined rows, have {}",
            joined.len()
        )));
    }

    let n = joined.len() as f64;
    let mean_a = joined.iter().map(|(a, _)| a).sum::<f64>() / n;
    let mean_b = joined.iter().map(|(_, b)| b).sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_a = 0.0;
    let mut var_b = 0.0;
    for (a, b) in &joined {
        cov += (a - mean_a) * (b - mean_b);
        var_a += (a - mean_a).powi(2);
        var_b += (b - mean_b).powi(2);
    }

    let denom = (var_a * var_b).sqrt();
    if denom == 0.0 {
        return Err(AppError::InsufficientData(
            "correlation undefined for constant series".to_string(),
        ));
    }

    Ok(cov / denom)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::{Duration, TimeZone, Utc};

    fn series(closes: &[f64]) -> Vec<Bar> {
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| {
                Bar::new(
                    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::days(i as i64),
                    close,
                    close + 2.0,
                    close - 2.0,
                    close,
                    1000,
                )
            })
            .collect()
    }

    #[test]
    fn test_support_resistance_trailing_window() {
        let bars = series(&[10.0, 50.0, 20.0, 21.0, 22.0]);
        // Window 3 covers closes [20, 21, 22]; the 50 spike is outside it
        let levels = support_resistance(&bars, 3).unwrap();
        assert_relative_eq!(levels.support, 18.0);
        assert_relative_eq!(levels.resistance, 24.0);
    }

    #[test]
    fn test_support_resistance_short_series() {
        let bars = series(&[10.0, 11.0]);
        assert!(matches!(
            support_resistance(&bars, 20),
            Err(AppError::InsufficientData(_))
        ));
    }

    #[test]
    fn test_correlation_with_self_is_one() {
        let bars = series(&[10.0, 12.0, 11.0, 14.0, 13.0]);
        let corr = correlation(&bars, &bars).unwrap();
        assert_relative_eq!(corr, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_correlation_inverse_series() {
        let a = series(&[1.0, 2.0, 3.0, 4.0]);
        let b = series(&[4.0, 3.0, 2.0, 1.0]);
        assert_relative_eq!(correlation(&a, &b).unwrap(), -1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_correlation_joins_on_timestamp() {
        let a = series(&[1.0, 2.0, 3.0, 4.0]);
        // Only one overlapping timestamp
        let mut b = series(&[5.0]);
        b[0].time = a[3].time;
        assert!(matches!(
            correlation(&a, &b),
            Err(AppError::InsufficientData(_))
        ));
    }

    #[test]
    fn test_sharpe_ratio_sign() {
        // Steady gains well above the risk-free rate
        let closes: Vec<f64> = (0..30).map(|i| 100.0 * 1.01f64.powi(i)).collect();
        // Mild noise so the deviation is nonzero
        let noisy: Vec<f64> = closes
            .iter()
            .enumerate()
            .map(|(i, c)| if i % 2 == 0 { c * 1.001 } else { *c })
            .collect();
        let sharpe = sharpe_ratio(&series(&noisy), 0.0).unwrap();
        assert!(sharpe > 0.0);
    }

    #[test]
    fn test_sharpe_ratio_insufficient_data() {
        let bars = series(&[10.0, 11.0]);
        assert!(matches!(
            sharpe_ratio(&bars, 0.02),
            Err(AppError::InsufficientData(_))
        ));
    }
}
