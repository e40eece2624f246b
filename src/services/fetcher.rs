use crate::constants::{DEFAULT_RETRIES, RETRY_BACKOFF_SECS};
use crate::error::{AppError, Result};
use crate::models::{Interval, Period, TimeSeries};
use crate::provider::StockDataProvider;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

/// Retrieves OHLCV series from the upstream provider with bounded retry.
///
/// Only transient failures are retried; an upstream "no data for this
/// symbol" answer is definitive and returned immediately. The fetcher
/// never writes the cache — caching is a read-through wrapper in
/// [`crate::services::Pipeline`].
pub struct Fetcher {
    provider: Arc<dyn StockDataProvider>,
    retries: u32,
    backoff: Duration,
}

impl Fetcher {
    pub fn new(provider: Arc<dyn StockDataProvider>) -> Self {
        Self::with_policy(
            provider,
            DEFAULT_RETRIES,
            Duration::from_secs(RETRY_BACKOFF_SECS),
        )
    }

    pub fn with_policy(
        provider: Arc<dyn StockDataProvider>,
        retries: u32,
        backoff: Duration,
    ) -> Self {
        Self {
            provider,
            retries: retries.max(1),
            backoff,
        }
    }

    /// Fetch a series, retrying transient upstream failures with a fixed
    /// backoff between attempts
    pub async fn fetch(
        &self,
        symbol: &str,
        period: Period,
        interval: Interval,
    ) -> Result<TimeSeries> {
        let mut last_reason = String::new();

        for attempt in 0..self.retries {
            if attempt > 0 {
                debug!(
                    symbol,
                    attempt = attempt + 1,
                    retries = self.retries,
                    backoff_secs = self.backoff.as_secs_f64(),
                    "Retrying upstream fetch"
                );
                sleep(self.backoff).await;
            }

            match self.provider.fetch_history(symbol, period, interval).await {
                Ok(bars) => {
                    debug!(symbol, rows = bars.len(), %period, %interval, "Upstream fetch succeeded");
                    return Ok(Self::normalize(bars));
                }
                // Empty result is a definitive answer, not transient
                Err(AppError::NotFound(s)) => return Err(AppError::NotFound(s)),
                Err(e) => {
                    warn!(symbol, attempt = attempt + 1, error = %e, "Upstream fetch attempt failed");
                    last_reason = e.to_string();
                }
            }
        }

        Err(AppError::Upstream {
            symbol: symbol.to_string(),
            attempts: self.retries,
            reason: last_reason,
        })
    }

    /// Enforce the series invariant: strictly ascending timestamps with
    /// no duplicates
    fn normalize(mut bars: TimeSeries) -> TimeSeries {
        bars.sort_by_key(|b| b.time);
        bars.dedup_by_key(|b| b.time);
        bars
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Bar;
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Provider that fails `failures` times before succeeding, counting
    /// every call
    struct FlakyProvider {
        calls: AtomicUsize,
        failures: usize,
        not_found: bool,
    }

    impl FlakyProvider {
        fn failing(failures: usize) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                failures,
                not_found: false,
            }
        }

        fn empty() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                failures: 0,
                not_found: true,
            }
        }
    }

    #[async_trait]
    impl StockDataProvider for FlakyProvider {
        async fn fetch_history(
            &self,
            symbol: &str,
            _period: Period,
            _interval: Interval,
        ) -> Result<TimeSeries> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if self.not_found {
                return Err(AppError::NotFound(symbol.to_string()));
            }
            if call < self.failures {
                return Err(AppError::Network("connection reset".to_string()));
            }
            Ok(vec![Bar::new(
                Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap(),
                10.0,
                11.0,
                9.0,
                10.5,
                1000,
            )])
        }

        async fn fetch_quote(&self, _symbol: &str) -> Result<crate::models::RealtimeQuote> {
            unimplemented!()
        }

        async fn fetch_financials(
            &self,
            _symbol: &str,
        ) -> Result<crate::models::FinancialStatements> {
            unimplemented!()
        }

        async fn fetch_profile(&self, _symbol: &str) -> Result<crate::models::CompanyProfile> {
            unimplemented!()
        }
    }

    fn fetcher(provider: Arc<FlakyProvider>) -> Fetcher {
        Fetcher::with_policy(provider, 3, Duration::ZERO)
    }

    #[tokio::test]
    async fn test_succeeds_after_transient_failures() {
        let provider = Arc::new(FlakyProvider::failing(2));
        let series = fetcher(provider.clone())
            .fetch("AAPL", Period::Year1, Interval::Day1)
            .await
            .unwrap();
        assert_eq!(series.len(), 1);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_exhausted_retries_surface_upstream_error() {
        let provider = Arc::new(FlakyProvider::failing(5));
        let err = fetcher(provider.clone())
            .fetch("AAPL", Period::Year1, Interval::Day1)
            .await
            .unwrap_err();
        match err {
            AppError::Upstream {
                symbol, attempts, ..
            } => {
                assert_eq!(symbol, "AAPL");
                assert_eq!(attempts, 3);
            }
            other => panic!("expected Upstream, got {:?}", other),
        }
        assert_eq!(provider.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_not_found_is_not_retried() {
        let provider = Arc::new(FlakyProvider::empty());
        let err = fetcher(provider.clone())
            .fetch("NOPE", Period::Year1, Interval::Day1)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_normalize_sorts_and_dedups() {
        let t = |d: u32| Utc.with_ymd_and_hms(2024, 1, d, 0, 0, 0).unwrap();
        let bars = vec![
            Bar::new(t(3), 1.0, 1.0, 1.0, 1.0, 1),
            Bar::new(t(1), 1.0, 1.0, 1.0, 1.0, 1),
            Bar::new(t(3), 2.0, 2.0, 2.0, 2.0, 2),
        ];
        let normalized = Fetcher::normalize(bars);
        assert_eq!(normalized.len(), 2);
        assert!(normalized[0].time < normalized[1].time);
    }
}
