use crate::constants::REQUEST_TIMEOUT_SECS;
use crate::error::{AppError, Result};
use crate::models::{
    Bar, CompanyProfile, FinancialStatements, Interval, Period, RealtimeQuote, TimeSeries,
};
use crate::provider::StockDataProvider;
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// HTTP client for a Yahoo-Finance-compatible market-data API
pub struct HttpProvider {
    base_url: String,
    client: reqwest::Client,
}

impl HttpProvider {
    /// Create a provider against the given base URL
    pub fn new(base_url: String) -> Result<Self> {
        let base_url = base_url.trim().trim_end_matches('/').to_string();

        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(AppError::Config(format!(
                "Invalid upstream URL: must start with http:// or https://, got: '{}'",
                base_url
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent("stockpulse/0.1")
            .build()
            .map_err(|e| AppError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { base_url, client })
    }

    async fn get_json(&self, url: &str) -> Result<Value> {
        debug!(%url, "Upstream request");
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Network(format!(
                "Upstream returned HTTP {} for {}",
                status.as_u16(),
                url
            )));
        }

        let body: Value = response.json().await?;
        Ok(body)
    }

    /// Walk the chart payload into bars, skipping rows with null prices
    fn parse_chart(symbol: &str, body: &Value) -> Result<TimeSeries> {
        let result = body
            .pointer("/chart/result/0")
            .ok_or_else(|| AppError::NotFound(symbol.to_string()))?;

        let timestamps = result
            .pointer("/timestamp")
            .and_then(Value::as_array)
            .ok_or_else(|| AppError::NotFound(symbol.to_string()))?;

        let quote = result
            .pointer("/indicators/quote/0")
            .ok_or_else(|| AppError::NotFound(symbol.to_string()))?;

        let field = |name: &str| -> &[Value] {
            quote
                .pointer(&format!("/{}", name))
                .and_then(Value::as_array)
                .map(|v| v.as_slice())
                .unwrap_or(&[])
        };

        let (opens, highs, lows, closes, volumes) = (
            field("open"),
            field("high"),
            field("low"),
            field("close"),
            field("volume"),
        );

        let mut bars = Vec::with_capacity(timestamps.len());
        for (i, ts) in timestamps.iter().enumerate() {
            let Some(secs) = ts.as_i64() else { continue };
            let Some(time) = Utc.timestamp_opt(secs, 0).single() else {
                continue;
            };

            // A row with a null close is a market holiday or a partial
            // row; skip it rather than fabricating a zero price.
            let Some(close) = closes.get(i).and_then(Value::as_f64) else {
                continue;
            };
            let open = opens.get(i).and_then(Value::as_f64).unwrap_or(close);
            let high = highs.get(i).and_then(Value::as_f64).unwrap_or(close);
            let low = lows.get(i).and_then(Value::as_f64).unwrap_or(close);
            let volume = volumes.get(i).and_then(Value::as_u64).unwrap_or(0);

            bars.push(Bar::new(time, open, high, low, close, volume));
        }

        if bars.is_empty() {
            return Err(AppError::NotFound(symbol.to_string()));
        }

        Ok(bars)
    }
}

#[async_trait]
impl StockDataProvider for HttpProvider {
    async fn fetch_history(
        &self,
        symbol: &str,
        period: Period,
        interval: Interval,
    ) -> Result<TimeSeries> {
        let url = format!(
            "{}/v8/finance/chart/{}?range={}&interval={}",
            self.base_url,
            symbol,
            period.as_str(),
            interval.as_str()
        );

        let body = self.get_json(&url).await?;
        Self::parse_chart(symbol, &body)
    }

    async fn fetch_quote(&self, symbol: &str) -> Result<RealtimeQuote> {
        let url = format!(
            "{}/v7/finance/quote?symbols={}",
            self.base_url, symbol
        );

        let body = self.get_json(&url).await?;
        let result = body
            .pointer("/quoteResponse/result/0")
            .ok_or_else(|| AppError::NotFound(symbol.to_string()))?;

        Ok(RealtimeQuote {
            symbol: symbol.to_string(),
            price: result.pointer("/regularMarketPrice").and_then(Value::as_f64),
            volume: result.pointer("/regularMarketVolume").and_then(Value::as_u64),
            market_cap: result.pointer("/marketCap").and_then(Value::as_f64),
            timestamp: Utc::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        })
    }

    async fn fetch_financials(&self, symbol: &str) -> Result<FinancialStatements> {
        let url = format!(
            "{}/v10/finance/quoteSummary/{}?modules=balanceSheetHistory,incomeStatementHistory,cashflowStatementHistory",
            self.base_url, symbol
        );

        let body = self.get_json(&url).await?;
        let result = body
            .pointer("/quoteSummary/result/0")
            .ok_or_else(|| AppError::NotFound(symbol.to_string()))?;

        let module = |name: &str| -> Value {
            result
                .pointer(&format!("/{}", name))
                .cloned()
                .unwrap_or(Value::Null)
        };

        Ok(FinancialStatements {
            balance_sheet: module("balanceSheetHistory"),
            income_statement: module("incomeStatementHistory"),
            cash_flow: module("cashflowStatementHistory"),
        })
    }

    async fn fetch_profile(&self, symbol: &str) -> Result<CompanyProfile> {
        let url = format!(
            "{}/v10/finance/quoteSummary/{}?modules=assetProfile",
            self.base_url, symbol
        );

        let body = self.get_json(&url).await?;
        let profile = body
            .pointer("/quoteSummary/result/0/assetProfile")
            .ok_or_else(|| AppError::NotFound(symbol.to_string()))?;

        Ok(CompanyProfile {
            sector: profile
                .pointer("/sector")
                .and_then(Value::as_str)
                .map(str::to_string),
            industry: profile
                .pointer("/industry")
                .and_then(Value::as_str)
                .map(str::to_string),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_non_http_url() {
        assert!(HttpProvider::new("ftp://example.com".to_string()).is_err());
        assert!(HttpProvider::new("https://example.com/".to_string()).is_ok());
    }

    #[test]
    fn test_parse_chart_skips_null_rows() {
        let body = serde_json::json!({
            "chart": { "result": [{
                "timestamp": [1704067200, 1704153600, 1704240000],
                "indicators": { "quote": [{
                    "open":   [10.0, null, 12.0],
                    "high":   [11.0, null, 13.0],
                    "low":    [9.0,  null, 11.0],
                    "close":  [10.5, null, 12.5],
                    "volume": [1000, null, 3000]
                }]}
            }]}
        });

        let bars = HttpProvider::parse_chart("TEST", &body).unwrap();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].close, 10.5);
        assert_eq!(bars[1].volume, 3000);
    }

    #[test]
    fn test_parse_chart_empty_is_not_found() {
        let body = serde_json::json!({
            "chart": { "result": [{
                "timestamp": [],
                "indicators": { "quote": [{ "close": [] }]}
            }]}
        });

        let err = HttpProvider::parse_chart("NOPE", &body).unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
