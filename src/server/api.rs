use crate::error::{AppError, Result};
use crate::indicators::IndicatorKind;
use crate::models::{Bar, Interval, Period, ResampleRule, TimeSeries};
use crate::server::AppState;
use crate::services::{
    export_series, filter_by_min_volume, filter_by_price_range, PipelineRequest,
};
use crate::utils::get_export_dir;
use axum::extract::{Path, State};
use axum::Json;
use axum_extra::extract::Query;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Bar as rendered at the HTTP boundary: time in YYYY-MM-DD format for
/// daily and coarser series, YYYY-MM-DD HH:MM:SS when intraday
#[derive(Debug, Serialize)]
pub struct BarResponse {
    pub time: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub percent_change: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sma_10: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sma_50: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rsi: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bb_upper: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bb_lower: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub macd: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub macd_signal: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub macd_histogram: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub atr: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percent_k: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percent_d: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percent_d_slow: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doji: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hammer: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engulfing: Option<bool>,
}

impl BarResponse {
    fn from_bar(bar: &Bar, interval: Interval) -> Self {
        let time_format = if interval.is_intraday() {
            "%Y-%m-%d %H:%M:%S"
        } else {
            "%Y-%m-%d"
        };

        Self {
            time: bar.time.format(time_format).to_string(),
            open: bar.open,
            high: bar.high,
            low: bar.low,
            close: bar.close,
            volume: bar.volume,
            percent_change: bar.percent_change,
            sma_10: bar.sma_10,
            sma_50: bar.sma_50,
            rsi: bar.rsi,
            bb_upper: bar.bb_upper,
            bb_lower: bar.bb_lower,
            macd: bar.macd,
            macd_signal: bar.macd_signal,
            macd_histogram: bar.macd_histogram,
            atr: bar.atr,
            percent_k: bar.percent_k,
            percent_d: bar.percent_d,
            percent_d_slow: bar.percent_d_slow,
            doji: bar.doji,
            hammer: bar.hammer,
            engulfing: bar.engulfing,
        }
    }
}

fn render(series: &TimeSeries, interval: Interval) -> Vec<BarResponse> {
    series
        .iter()
        .map(|bar| BarResponse::from_bar(bar, interval))
        .collect()
}

/// period/interval query parameters shared by the series endpoints
#[derive(Debug, Deserialize)]
pub struct RangeQuery {
    pub period: Option<String>,
    pub interval: Option<String>,
}

fn parse_period(raw: Option<&str>) -> Result<Period> {
    match raw {
        None => Ok(Period::default()),
        Some(s) => {
            Period::parse(s).ok_or_else(|| AppError::Validation(format!("Invalid period: '{}'", s)))
        }
    }
}

fn parse_interval(raw: Option<&str>) -> Result<Interval> {
    match raw {
        None => Ok(Interval::default()),
        Some(s) => Interval::parse(s)
            .ok_or_else(|| AppError::Validation(format!("Invalid interval: '{}'", s))),
    }
}

/// Parse an optional numeric query parameter by hand so a malformed
/// value surfaces as the uniform 400 error shape
fn parse_numeric<T: std::str::FromStr>(name: &str, raw: Option<&str>) -> Result<Option<T>> {
    raw.map(|s| {
        s.parse::<T>()
            .map_err(|_| AppError::Validation(format!("Invalid numeric value for {}: '{}'", name, s)))
    })
    .transpose()
}

async fn fetch_series(
    state: &AppState,
    symbol: &str,
    params: &RangeQuery,
    indicators: Vec<IndicatorKind>,
) -> Result<(TimeSeries, Interval)> {
    let period = parse_period(params.period.as_deref())?;
    let interval = parse_interval(params.interval.as_deref())?;

    let mut request = PipelineRequest::fetch_only(symbol, period, interval);
    request.indicators = indicators;

    let series = state.pipeline.run(&request).await?;
    Ok((series, interval))
}

/// GET /api/stocks/historical/{symbol}?period&interval
pub async fn historical_handler(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
    Query(params): Query<RangeQuery>,
) -> Result<Json<Vec<BarResponse>>> {
    debug!(%symbol, ?params, "Historical request");
    let (series, interval) = fetch_series(&state, &symbol, &params, Vec::new()).await?;
    Ok(Json(render(&series, interval)))
}

/// GET /api/stocks/realtime/{symbol}
pub async fn realtime_handler(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<Json<crate::models::RealtimeQuote>> {
    let quote = state.provider.fetch_quote(&symbol).await?;
    Ok(Json(quote))
}

/// GET /api/stocks/financials/{symbol}
pub async fn financials_handler(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<Json<crate::models::FinancialStatements>> {
    let statements = state.provider.fetch_financials(&symbol).await?;
    Ok(Json(statements))
}

/// GET /api/stocks/sector-industry/{symbol}
pub async fn sector_industry_handler(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<Json<crate::models::CompanyProfile>> {
    let profile = state.provider.fetch_profile(&symbol).await?;
    Ok(Json(profile))
}

/// Query parameters for the price threshold filter
#[derive(Debug, Deserialize)]
pub struct PriceFilterQuery {
    pub symbol: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub period: Option<String>,
    pub interval: Option<String>,
}

/// GET /api/stocks/filter/price?symbol&min_price&max_price
///
/// Absent bounds are unbounded on that side.
pub async fn filter_price_handler(
    State(state): State<AppState>,
    Query(params): Query<PriceFilterQuery>,
) -> Result<Json<Vec<BarResponse>>> {
    let symbol = params
        .symbol
        .ok_or_else(|| AppError::Validation("Missing required parameter: symbol".to_string()))?;
    let min_price: f64 =
        parse_numeric("min_price", params.min_price.as_deref())?.unwrap_or(f64::MIN);
    let max_price: f64 =
        parse_numeric("max_price", params.max_price.as_deref())?.unwrap_or(f64::MAX);

    let range = RangeQuery {
        period: params.period,
        interval: params.interval,
    };
    let (series, interval) = fetch_series(&state, &symbol, &range, Vec::new()).await?;
    let filtered = filter_by_price_range(&series, min_price, max_price);
    Ok(Json(render(&filtered, interval)))
}

/// Query parameters for the volume threshold filter
#[derive(Debug, Deserialize)]
pub struct VolumeFilterQuery {
    pub symbol: Option<String>,
    pub min_volume: Option<String>,
    pub period: Option<String>,
    pub interval: Option<String>,
}

/// GET /api/stocks/filter/volume?symbol&min_volume
pub async fn filter_volume_handler(
    State(state): State<AppState>,
    Query(params): Query<VolumeFilterQuery>,
) -> Result<Json<Vec<BarResponse>>> {
    let symbol = params
        .symbol
        .ok_or_else(|| AppError::Validation("Missing required parameter: symbol".to_string()))?;
    let min_volume: u64 = parse_numeric("min_volume", params.min_volume.as_deref())?.unwrap_or(0);

    let range = RangeQuery {
        period: params.period,
        interval: params.interval,
    };
    let (series, interval) = fetch_series(&state, &symbol, &range, Vec::new()).await?;
    let filtered = filter_by_min_volume(&series, min_volume);
    Ok(Json(render(&filtered, interval)))
}

/// GET /api/stocks/indicators/{symbol}?period&interval
pub async fn indicators_handler(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
    Query(params): Query<RangeQuery>,
) -> Result<Json<Vec<BarResponse>>> {
    let kinds = vec![
        IndicatorKind::Ma,
        IndicatorKind::Rsi,
        IndicatorKind::Bollinger,
        IndicatorKind::Macd,
        IndicatorKind::Atr,
        IndicatorKind::Stochastic,
    ];
    let (series, interval) = fetch_series(&state, &symbol, &params, kinds).await?;
    Ok(Json(render(&series, interval)))
}

/// GET /api/stocks/patterns/{symbol}?period&interval
pub async fn patterns_handler(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
    Query(params): Query<RangeQuery>,
) -> Result<Json<Vec<BarResponse>>> {
    let (series, interval) =
        fetch_series(&state, &symbol, &params, vec![IndicatorKind::Patterns]).await?;
    Ok(Json(render(&series, interval)))
}

#[derive(Debug, Serialize)]
pub struct ExportResponse {
    pub message: String,
}

/// GET /api/stocks/export/{symbol}?period&interval
///
/// Writes the spreadsheet server-side and returns a confirmation message.
pub async fn export_handler(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
    Query(params): Query<RangeQuery>,
) -> Result<Json<ExportResponse>> {
    let (series, interval) = fetch_series(&state, &symbol, &params, Vec::new()).await?;

    let path = get_export_dir().join(format!("{}_data.csv", symbol));
    let rows = export_series(&series, interval, &path)?;

    info!(%symbol, rows, path = %path.display(), "Export complete");
    Ok(Json(ExportResponse {
        message: format!("Exported {} rows for {} to {}", rows, symbol, path.display()),
    }))
}

/// Query parameters for the composed pipeline endpoint; `indicators` may
/// be repeated: indicators=MA&indicators=RSI
#[derive(Debug, Deserialize)]
pub struct ComposedQuery {
    pub period: Option<String>,
    pub interval: Option<String>,
    pub resample: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    #[serde(default)]
    pub indicators: Vec<String>,
}

/// GET /api/stocks/{symbol} — the full pipeline: cached fetch, optional
/// date filter, optional resample, optional indicators
pub async fn composed_handler(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
    Query(params): Query<ComposedQuery>,
) -> Result<Json<Vec<BarResponse>>> {
    debug!(%symbol, ?params, "Composed pipeline request");

    let period = parse_period(params.period.as_deref())?;
    let interval = parse_interval(params.interval.as_deref())?;

    let resample = params
        .resample
        .as_deref()
        .map(|s| {
            ResampleRule::parse(s)
                .ok_or_else(|| AppError::Validation(format!("Invalid resample rule: '{}'", s)))
        })
        .transpose()?;

    let indicators = params
        .indicators
        .iter()
        .map(|s| IndicatorKind::parse(s))
        .collect::<Result<Vec<_>>>()?;

    let request = PipelineRequest {
        symbol,
        period,
        interval,
        start_date: params.start_date,
        end_date: params.end_date,
        resample,
        indicators,
    };

    let series = state.pipeline.run(&request).await?;
    Ok(Json(render(&series, interval)))
}
