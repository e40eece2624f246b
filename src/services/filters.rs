//! Date and threshold filters: pure predicates over an ordered series.
//!
//! Every function takes the input by reference and returns a new series;
//! an empty result is valid, not an error.

use crate::error::{AppError, Result};
use crate::models::{Bar, TimeSeries};
use chrono::NaiveDate;

fn parse_bound(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| AppError::InvalidRange(format!("Cannot parse date: '{}'", raw)))
}

/// Restrict a series to bars whose calendar date lies in
/// `[start_date, end_date]`, inclusive on both ends. Both bounds are
/// optional YYYY-MM-DD strings.
pub fn filter_by_date_range(
    series: &[Bar],
    start_date: Option<&str>,
    end_date: Option<&str>,
) -> Result<TimeSeries> {
    let start = start_date.map(parse_bound).transpose()?;
    let end = end_date.map(parse_bound).transpose()?;

    Ok(series
        .iter()
        .filter(|bar| {
            let date = bar.time.date_naive();
            start.map_or(true, |s| date >= s) && end.map_or(true, |e| date <= e)
        })
        .cloned()
        .collect())
}

/// Keep bars whose close lies in `[min_price, max_price]` inclusive
pub fn filter_by_price_range(series: &[Bar], min_price: f64, max_price: f64) -> TimeSeries {
    series
        .iter()
        .filter(|bar| bar.close >= min_price && bar.close <= max_price)
        .cloned()
        .collect()
}

/// Keep bars with volume of at least `min_volume`
pub fn filter_by_min_volume(series: &[Bar], min_volume: u64) -> TimeSeries {
    series
        .iter()
        .filter(|bar| bar.volume >= min_volume)
        .cloned()
        .collect()
}

/// Keep bars whose selected indicator value lies in `[lower, upper]`
/// inclusive; bars where the indicator is undefined are dropped
pub fn filter_by_indicator_range<F>(
    series: &[Bar],
    indicator: F,
    lower: f64,
    upper: f64,
) -> TimeSeries
where
    F: Fn(&Bar) -> Option<f64>,
{
    series
        .iter()
        .filter(|bar| indicator(bar).is_some_and(|v| v >= lower && v <= upper))
        .cloned()
        .collect()
}

/// Keep bars with RSI in `[lower, upper]` inclusive
pub fn filter_by_rsi(series: &[Bar], lower: f64, upper: f64) -> TimeSeries {
    filter_by_indicator_range(series, |bar| bar.rsi, lower, upper)
}

/// Keep only bars where `macd > macd_signal` first becomes true relative
/// to the prior bar — the first bar of each "MACD above signal" run. The
/// series must already carry MACD columns.
pub fn filter_macd_crossovers(series: &[Bar]) -> TimeSeries {
    let above = |bar: &Bar| -> Option<bool> {
        match (bar.macd, bar.macd_signal) {
            (Some(m), Some(s)) => Some(m > s),
            _ => None,
        }
    };

    series
        .windows(2)
        .filter_map(|pair| {
            let (prev, curr) = (&pair[0], &pair[1]);
            match (above(prev), above(curr)) {
                (Some(false), Some(true)) => Some(curr.clone()),
                _ => None,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn bar_on(year: i32, month: u32, day: u32, close: f64, volume: u64) -> Bar {
        Bar::new(
            Utc.with_ymd_and_hms(year, month, day, 0, 0, 0).unwrap(),
            close,
            close + 1.0,
            close - 1.0,
            close,
            volume,
        )
    }

    #[test]
    fn test_date_range_inclusive_on_both_ends() {
        let series: Vec<Bar> = [
            (2023, 12, 31),
            (2024, 1, 1),
            (2024, 1, 2),
            (2024, 1, 3),
            (2024, 1, 4),
            (2024, 1, 5),
        ]
        .iter()
        .map(|&(y, m, d)| bar_on(y, m, d, 10.0, 1000))
        .collect();

        let filtered =
            filter_by_date_range(&series, Some("2024-01-01"), Some("2024-01-03")).unwrap();

        assert_eq!(filtered.len(), 3);
        assert_eq!(
            filtered[0].time,
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
        );
        assert_eq!(
            filtered[2].time,
            Utc.with_ymd_and_hms(2024, 1, 3, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_date_range_open_bounds() {
        let series = vec![bar_on(2024, 1, 1, 10.0, 1000), bar_on(2024, 1, 5, 11.0, 1000)];
        let all = filter_by_date_range(&series, None, None).unwrap();
        assert_eq!(all.len(), 2);

        let from = filter_by_date_range(&series, Some("2024-01-02"), None).unwrap();
        assert_eq!(from.len(), 1);
    }

    #[test]
    fn test_unparseable_bound_is_invalid_range() {
        let series = vec![bar_on(2024, 1, 1, 10.0, 1000)];
        let err = filter_by_date_range(&series, Some("not-a-date"), None).unwrap_err();
        assert!(matches!(err, AppError::InvalidRange(_)));
    }

    #[test]
    fn test_empty_result_is_valid() {
        let series = vec![bar_on(2024, 1, 1, 10.0, 1000)];
        let filtered =
            filter_by_date_range(&series, Some("2025-01-01"), Some("2025-12-31")).unwrap();
        assert!(filtered.is_empty());
    }

    #[test]
    fn test_price_range_inclusive() {
        let series = vec![
            bar_on(2024, 1, 1, 9.99, 1000),
            bar_on(2024, 1, 2, 10.0, 1000),
            bar_on(2024, 1, 3, 15.0, 1000),
            bar_on(2024, 1, 4, 15.01, 1000),
        ];
        let filtered = filter_by_price_range(&series, 10.0, 15.0);
        assert_eq!(filtered.len(), 2);
    }

    #[test]
    fn test_min_volume_inclusive() {
        let series = vec![
            bar_on(2024, 1, 1, 10.0, 999),
            bar_on(2024, 1, 2, 10.0, 1000),
        ];
        let filtered = filter_by_min_volume(&series, 1000);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].volume, 1000);
    }

    #[test]
    fn test_rsi_filter_drops_undefined() {
        let mut warm = bar_on(2024, 1, 2, 10.0, 1000);
        warm.rsi = Some(45.0);
        let cold = bar_on(2024, 1, 1, 10.0, 1000); // rsi None
        let filtered = filter_by_rsi(&[cold, warm], 30.0, 70.0);
        assert_eq!(filtered.len(), 1);
    }

    #[test]
    fn test_macd_crossover_keeps_first_bar_of_run() {
        let mut series: Vec<Bar> = (1..=5).map(|d| bar_on(2024, 1, d, 10.0, 1000)).collect();
        // below, below, above, above, above: only bar index 2 crosses
        let states = [(-1.0, 0.0), (-0.5, 0.0), (0.5, 0.0), (0.6, 0.0), (0.7, 0.0)];
        for (bar, (macd, signal)) in series.iter_mut().zip(states) {
            bar.macd = Some(macd);
            bar.macd_signal = Some(signal);
        }

        let crossings = filter_macd_crossovers(&series);
        assert_eq!(crossings.len(), 1);
        assert_eq!(
            crossings[0].time,
            Utc.with_ymd_and_hms(2024, 1, 3, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_macd_crossover_ignores_first_bar_without_prior() {
        let mut series = vec![bar_on(2024, 1, 1, 10.0, 1000), bar_on(2024, 1, 2, 10.0, 1000)];
        for bar in &mut series {
            bar.macd = Some(1.0);
            bar.macd_signal = Some(0.0);
        }
        // Already above at the start of the series: no transition
        assert!(filter_macd_crossovers(&series).is_empty());
    }
}
