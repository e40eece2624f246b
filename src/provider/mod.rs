//! Upstream market-data provider abstraction.
//!
//! The provider is an opaque OHLCV source; its wire format is private to
//! the implementation. [`crate::services::Fetcher`] adds retry on top and
//! is the only caller that should reach for `fetch_history` directly.

mod http;

pub use http::HttpProvider;

use crate::error::Result;
use crate::models::{CompanyProfile, FinancialStatements, Interval, Period, RealtimeQuote, TimeSeries};
use async_trait::async_trait;

#[async_trait]
pub trait StockDataProvider: Send + Sync {
    /// Fetch a historical OHLCV series.
    ///
    /// Returns `AppError::NotFound` when the upstream reports no rows for
    /// the symbol — a definitive answer, not a transient failure.
    async fn fetch_history(
        &self,
        symbol: &str,
        period: Period,
        interval: Interval,
    ) -> Result<TimeSeries>;

    /// Fetch the current quote snapshot
    async fn fetch_quote(&self, symbol: &str) -> Result<RealtimeQuote>;

    /// Fetch balance sheet, income statement and cash flow mappings
    async fn fetch_financials(&self, symbol: &str) -> Result<FinancialStatements>;

    /// Fetch sector/industry classification
    async fn fetch_profile(&self, symbol: &str) -> Result<CompanyProfile>;
}
