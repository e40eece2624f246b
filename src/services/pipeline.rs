use crate::error::Result;
use crate::indicators::{self, IndicatorKind};
use crate::models::{CacheKey, Interval, Period, ResampleRule, TimeSeries};
use crate::services::{filter_by_date_range, Fetcher, Resampler, SeriesCache};
use std::sync::Arc;
use tracing::{debug, info};

/// One composed pipeline run: cached fetch, then the optional pure
/// transformation stages in order
#[derive(Debug, Clone)]
pub struct PipelineRequest {
    pub symbol: String,
    pub period: Period,
    pub interval: Interval,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub resample: Option<ResampleRule>,
    pub indicators: Vec<IndicatorKind>,
}

impl PipelineRequest {
    /// Fetch-only request with no transformation stages
    pub fn fetch_only(symbol: impl Into<String>, period: Period, interval: Interval) -> Self {
        Self {
            symbol: symbol.into(),
            period,
            interval,
            start_date: None,
            end_date: None,
            resample: None,
            indicators: Vec::new(),
        }
    }
}

/// The transformation pipeline entry point: read-through cached fetch
/// followed by date filtering, resampling and indicator computation.
///
/// The cache is an injected dependency behind [`SeriesCache`], so the
/// backing store is swappable. Each stage takes the series by reference
/// and produces a new one; nothing a caller holds is mutated.
pub struct Pipeline {
    fetcher: Fetcher,
    cache: Arc<dyn SeriesCache>,
}

impl Pipeline {
    pub fn new(fetcher: Fetcher, cache: Arc<dyn SeriesCache>) -> Self {
        Self { fetcher, cache }
    }

    /// Read-through fetch: serve the cached series when present,
    /// otherwise fetch upstream and persist the result.
    ///
    /// Concurrent misses on the same key are not coordinated: both
    /// callers fetch and both write the entry. Last write wins; the
    /// duplicate upstream call is accepted as benign.
    pub async fn get_or_fetch(&self, key: &CacheKey) -> Result<TimeSeries> {
        if let Some(series) = self.cache.get(key)? {
            debug!(symbol = %key.symbol, period = %key.period, interval = %key.interval, "Serving cached series");
            return Ok(series);
        }

        let series = self
            .fetcher
            .fetch(&key.symbol, key.period, key.interval)
            .await?;
        self.cache.put(key, &series)?;
        info!(symbol = %key.symbol, rows = series.len(), "Fetched and cached series");
        Ok(series)
    }

    /// Run the full pipeline for one request
    pub async fn run(&self, request: &PipelineRequest) -> Result<TimeSeries> {
        let key = CacheKey::new(request.symbol.clone(), request.period, request.interval);
        let mut series = self.get_or_fetch(&key).await?;

        if request.start_date.is_some() || request.end_date.is_some() {
            series = filter_by_date_range(
                &series,
                request.start_date.as_deref(),
                request.end_date.as_deref(),
            )?;
        }

        if let Some(rule) = request.resample {
            series = Resampler::resample(&series, rule);
        }

        if !request.indicators.is_empty() {
            series = indicators::apply(&series, &request.indicators);
        }

        Ok(series)
    }
}
