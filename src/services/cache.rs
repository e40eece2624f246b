use crate::error::{AppError, Result};
use crate::models::{Bar, CacheKey, TimeSeries};
use chrono::{NaiveDate, NaiveDateTime, TimeZone, Utc};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;
use tracing::debug;

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Backing store for fetched series, keyed by the exact
/// (symbol, period, interval) triple.
///
/// Entries never expire within a process lifetime; a present entry is
/// always served instead of re-fetching.
pub trait SeriesCache: Send + Sync {
    fn get(&self, key: &CacheKey) -> Result<Option<TimeSeries>>;
    fn put(&self, key: &CacheKey, series: &[Bar]) -> Result<()>;
}

/// Disk cache: one CSV file per key with a `Date` column.
///
/// Daily and coarser series persist the date component only; intraday
/// series persist date + time, so timestamps round-trip exactly either
/// way. There is no invalidation policy — a stale entry is only refreshed
/// by deleting its file out of band. Known limitation, kept for
/// simplicity.
pub struct CsvCache {
    dir: PathBuf,
}

impl CsvCache {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn path_for(&self, key: &CacheKey) -> PathBuf {
        self.dir.join(key.file_name())
    }

    fn format_time(bar: &Bar, intraday: bool) -> String {
        if intraday {
            bar.time.format(DATETIME_FORMAT).to_string()
        } else {
            bar.time.format(DATE_FORMAT).to_string()
        }
    }

    fn parse_time(raw: &str) -> Result<chrono::DateTime<Utc>> {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, DATETIME_FORMAT) {
            return Ok(Utc.from_utc_datetime(&dt));
        }
        let date = NaiveDate::parse_from_str(raw, DATE_FORMAT)
            .map_err(|_| AppError::Io(format!("Unparseable Date value in cache: '{}'", raw)))?;
        Ok(Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0).unwrap()))
    }

    fn parse_row(record: &csv::StringRecord) -> Result<Bar> {
        let field = |idx: usize| -> Result<&str> {
            record
                .get(idx)
                .ok_or_else(|| AppError::Io(format!("Cache row has {} columns, need 6", record.len())))
        };

        let time = Self::parse_time(field(0)?)?;
        let number = |idx: usize| -> Result<f64> {
            field(idx)?
                .parse()
                .map_err(|_| AppError::Io(format!("Unparseable number in cache: '{}'", record.get(idx).unwrap_or(""))))
        };
        let volume_raw = field(5)?;
        let volume: u64 = volume_raw
            .parse()
            .map_err(|_| AppError::Io(format!("Unparseable volume in cache: '{}'", volume_raw)))?;

        Ok(Bar::new(
            time,
            number(1)?,
            number(2)?,
            number(3)?,
            number(4)?,
            volume,
        ))
    }
}

impl SeriesCache for CsvCache {
    fn get(&self, key: &CacheKey) -> Result<Option<TimeSeries>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }

        let mut reader = csv::Reader::from_path(&path)?;
        let mut bars = Vec::new();
        for result in reader.records() {
            let record = result?;
            bars.push(Self::parse_row(&record)?);
        }

        debug!(key = %path.display(), rows = bars.len(), "Cache hit");
        Ok(Some(bars))
    }

    fn put(&self, key: &CacheKey, series: &[Bar]) -> Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.path_for(key);
        let intraday = key.interval.is_intraday();

        let mut writer = csv::Writer::from_path(&path)?;
        writer.write_record(["Date", "Open", "High", "Low", "Close", "Volume"])?;
        for bar in series {
            writer.write_record(&[
                Self::format_time(bar, intraday),
                bar.open.to_string(),
                bar.high.to_string(),
                bar.low.to_string(),
                bar.close.to_string(),
                bar.volume.to_string(),
            ])?;
        }
        writer.flush()?;

        debug!(key = %path.display(), rows = series.len(), "Cache entry written");
        Ok(())
    }
}

/// In-memory cache behind an RwLock, used in tests and as the simplest
/// swappable backing store
#[derive(Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<CacheKey, TimeSeries>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SeriesCache for MemoryCache {
    fn get(&self, key: &CacheKey) -> Result<Option<TimeSeries>> {
        let entries = self
            .entries
            .read()
            .map_err(|_| AppError::Io("Cache lock poisoned".to_string()))?;
        Ok(entries.get(key).cloned())
    }

    fn put(&self, key: &CacheKey, series: &[Bar]) -> Result<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| AppError::Io("Cache lock poisoned".to_string()))?;
        entries.insert(key.clone(), series.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Interval, Period};
    use chrono::TimeZone;

    fn daily_key() -> CacheKey {
        CacheKey::new("AAPL", Period::Month1, Interval::Day1)
    }

    fn daily_series() -> TimeSeries {
        vec![
            Bar::new(
                Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap(),
                185.0,
                186.5,
                183.9,
                185.6,
                52_000_000,
            ),
            Bar::new(
                Utc.with_ymd_and_hms(2024, 1, 3, 0, 0, 0).unwrap(),
                184.2,
                185.9,
                183.4,
                184.3,
                58_000_000,
            ),
        ]
    }

    #[test]
    fn test_missing_entry_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let cache = CsvCache::new(dir.path().to_path_buf());
        assert!(cache.get(&daily_key()).unwrap().is_none());
    }

    #[test]
    fn test_daily_round_trip_is_exact() {
        let dir = tempfile::tempdir().unwrap();
        let cache = CsvCache::new(dir.path().to_path_buf());
        let series = daily_series();

        cache.put(&daily_key(), &series).unwrap();
        let restored = cache.get(&daily_key()).unwrap().unwrap();

        assert_eq!(restored.len(), series.len());
        for (a, b) in series.iter().zip(&restored) {
            assert_eq!(a.time, b.time);
            assert_eq!(a.open, b.open);
            assert_eq!(a.high, b.high);
            assert_eq!(a.low, b.low);
            assert_eq!(a.close, b.close);
            assert_eq!(a.volume, b.volume);
        }
    }

    #[test]
    fn test_intraday_round_trip_keeps_time_of_day() {
        let dir = tempfile::tempdir().unwrap();
        let cache = CsvCache::new(dir.path().to_path_buf());
        let key = CacheKey::new("AAPL", Period::Day5, Interval::Hour1);
        let series = vec![Bar::new(
            Utc.with_ymd_and_hms(2024, 1, 2, 14, 30, 0).unwrap(),
            185.0,
            185.4,
            184.8,
            185.1,
            3_200_000,
        )];

        cache.put(&key, &series).unwrap();
        let restored = cache.get(&key).unwrap().unwrap();
        assert_eq!(restored[0].time, series[0].time);
    }

    #[test]
    fn test_memory_cache_round_trip() {
        let cache = MemoryCache::new();
        cache.put(&daily_key(), &daily_series()).unwrap();
        let restored = cache.get(&daily_key()).unwrap().unwrap();
        assert_eq!(restored.len(), 2);
    }
}
