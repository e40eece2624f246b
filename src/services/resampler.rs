use crate::models::{Bar, ResampleRule, TimeSeries};
use chrono::{DateTime, Datelike, Duration, TimeZone, Utc};
use std::collections::HashMap;
use tracing::debug;

/// Aggregates a daily (or finer) series into coarser buckets.
///
/// Aggregation per bucket: open = first, high = max, low = min,
/// close = last, volume = sum. Buckets with no contributing bars are
/// omitted, never zero-filled.
pub struct Resampler;

impl Resampler {
    /// Resample a series to the target rule.
    ///
    /// The native daily rule is an identity: the input comes back
    /// unchanged without any bucket work. Callers rely on this
    /// short-circuit to skip aggregation.
    pub fn resample(series: &[Bar], rule: ResampleRule) -> TimeSeries {
        if rule == ResampleRule::Daily {
            return series.to_vec();
        }
        if series.is_empty() {
            return vec![];
        }

        debug!(rows = series.len(), rule = %rule, "Resampling series");

        let mut buckets: HashMap<DateTime<Utc>, Vec<&Bar>> = HashMap::new();
        for bar in series {
            let bucket_time = match rule {
                ResampleRule::Weekly => Self::bucket_week(bar.time),
                ResampleRule::Monthly => Self::bucket_month(bar.time),
                ResampleRule::Days(n) => Self::bucket_days(bar.time, n),
                ResampleRule::Daily => unreachable!(),
            };
            buckets.entry(bucket_time).or_default().push(bar);
        }

        let mut result: Vec<Bar> = buckets
            .into_iter()
            .map(|(bucket_time, bars)| Self::aggregate(&bars, bucket_time))
            .collect();
        result.sort_by_key(|b| b.time);

        let result = Self::with_percent_changes(result);
        debug!(buckets = result.len(), "Resample complete");
        result
    }

    /// Week bucket start: Monday 00:00:00 (ISO weeks)
    fn bucket_week(time: DateTime<Utc>) -> DateTime<Utc> {
        let days_from_monday = time.weekday().num_days_from_monday();
        let monday = time.date_naive() - Duration::days(days_from_monday as i64);
        Utc.from_utc_datetime(&monday.and_hms_opt(0, 0, 0).unwrap())
    }

    /// Month bucket start: first of the month at 00:00:00
    fn bucket_month(time: DateTime<Utc>) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(time.year(), time.month(), 1, 0, 0, 0)
            .unwrap()
    }

    /// Fixed n-day bucket start, anchored at a common day-zero so bucket
    /// boundaries are stable across requests
    fn bucket_days(time: DateTime<Utc>, n: u32) -> DateTime<Utc> {
        let epoch_days = time.date_naive().num_days_from_ce() as i64;
        let bucket_start = (epoch_days.div_euclid(n as i64)) * n as i64;
        let date = chrono::NaiveDate::from_num_days_from_ce_opt(bucket_start as i32)
            .unwrap_or(time.date_naive());
        Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0).unwrap())
    }

    /// Collapse one bucket's bars, which arrive in ascending time order
    fn aggregate(bars: &[&Bar], bucket_time: DateTime<Utc>) -> Bar {
        let first = bars[0];
        let last = bars[bars.len() - 1];

        let high = bars.iter().map(|b| b.high).fold(f64::NEG_INFINITY, f64::max);
        let low = bars.iter().map(|b| b.low).fold(f64::INFINITY, f64::min);
        let volume = bars.iter().map(|b| b.volume).sum();

        Bar::new(bucket_time, first.open, high, low, last.close, volume)
    }

    /// percent_change = (close[t] / close[t-1] - 1) * 100 for every
    /// bucket except the first, which has no prior bucket
    fn with_percent_changes(mut bars: Vec<Bar>) -> Vec<Bar> {
        for i in 1..bars.len() {
            let prev_close = bars[i - 1].close;
            if prev_close != 0.0 {
                bars[i].percent_change = Some((bars[i].close / prev_close - 1.0) * 100.0);
            }
        }
        bars
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::TimeZone;

    fn daily_bars(days: &[(u32, u32)], closes: &[f64]) -> Vec<Bar> {
        days.iter()
            .zip(closes)
            .enumerate()
            .map(|(i, (&(month, day), &close))| {
                Bar::new(
                    Utc.with_ymd_and_hms(2024, month, day, 0, 0, 0).unwrap(),
                    close - 1.0,
                    close + 1.0,
                    close - 2.0,
                    close,
                    (i as u64 + 1) * 1000,
                )
            })
            .collect()
    }

    #[test]
    fn test_daily_rule_is_identity() {
        let bars = daily_bars(&[(1, 2), (1, 3), (1, 4)], &[10.0, 11.0, 12.0]);
        let resampled = Resampler::resample(&bars, ResampleRule::Daily);
        assert_eq!(resampled.len(), bars.len());
        for (a, b) in bars.iter().zip(&resampled) {
            assert_eq!(a.time, b.time);
            assert_eq!(a.close, b.close);
            assert_eq!(a.volume, b.volume);
        }
    }

    #[test]
    fn test_bucket_week_is_monday() {
        // Wednesday Jan 10, 2024 -> Monday Jan 8
        let wed = Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap();
        assert_eq!(
            Resampler::bucket_week(wed),
            Utc.with_ymd_and_hms(2024, 1, 8, 0, 0, 0).unwrap()
        );
        // Monday maps to itself
        let mon = Utc.with_ymd_and_hms(2024, 1, 8, 0, 0, 0).unwrap();
        assert_eq!(Resampler::bucket_week(mon), mon);
    }

    #[test]
    fn test_bucket_month_is_first_of_month() {
        let mid = Utc.with_ymd_and_hms(2024, 2, 15, 0, 0, 0).unwrap();
        assert_eq!(
            Resampler::bucket_month(mid),
            Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_weekly_aggregation_rules() {
        // Mon Jan 8 .. Wed Jan 10 in one week, Mon Jan 15 in the next
        let bars = daily_bars(
            &[(1, 8), (1, 9), (1, 10), (1, 15)],
            &[10.0, 12.0, 11.0, 13.0],
        );
        let weekly = Resampler::resample(&bars, ResampleRule::Weekly);

        assert_eq!(weekly.len(), 2);
        let first = &weekly[0];
        assert_eq!(first.time, Utc.with_ymd_and_hms(2024, 1, 8, 0, 0, 0).unwrap());
        assert_eq!(first.open, 9.0); // first bar's open
        assert_eq!(first.close, 11.0); // last bar's close
        assert_eq!(first.high, 13.0); // max high = 12 + 1
        assert_eq!(first.low, 8.0); // min low = 10 - 2
        assert_eq!(first.volume, 6000); // 1000 + 2000 + 3000

        // Empty week between the two buckets is omitted, not zero-filled
        assert_eq!(
            weekly[1].time,
            Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_percent_change_between_buckets() {
        let bars = daily_bars(&[(1, 8), (1, 15)], &[10.0, 11.0]);
        let weekly = Resampler::resample(&bars, ResampleRule::Weekly);

        assert!(weekly[0].percent_change.is_none());
        assert_relative_eq!(weekly[1].percent_change.unwrap(), 10.0, epsilon = 1e-9);
    }

    #[test]
    fn test_monthly_aggregation() {
        let bars = daily_bars(&[(1, 8), (1, 22), (2, 5)], &[10.0, 12.0, 14.0]);
        let monthly = Resampler::resample(&bars, ResampleRule::Monthly);

        assert_eq!(monthly.len(), 2);
        assert_eq!(monthly[0].close, 12.0);
        assert_eq!(monthly[0].volume, 3000);
        assert_eq!(monthly[1].close, 14.0);
    }

    #[test]
    fn test_custom_day_buckets_group_consecutive_days() {
        let bars = daily_bars(
            &[(1, 1), (1, 2), (1, 3), (1, 4), (1, 5), (1, 6)],
            &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0],
        );
        let resampled = Resampler::resample(&bars, ResampleRule::Days(2));
        assert_eq!(resampled.len(), 3);
        let total: u64 = resampled.iter().map(|b| b.volume).sum();
        assert_eq!(total, 21_000);
    }

    #[test]
    fn test_empty_series() {
        assert!(Resampler::resample(&[], ResampleRule::Weekly).is_empty());
    }
}
