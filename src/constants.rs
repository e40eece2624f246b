//! Numeric defaults shared across the fetcher and indicator engine.

/// Fetch attempts against the upstream provider before giving up.
pub const DEFAULT_RETRIES: u32 = 3;

/// Fixed backoff between fetch attempts, in seconds.
pub const RETRY_BACKOFF_SECS: u64 = 2;

/// Per-attempt HTTP request timeout, in seconds.
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Short and long moving-average windows added by the `MA` indicator.
pub const SMA_SHORT_WINDOW: usize = 10;
pub const SMA_LONG_WINDOW: usize = 50;

pub const RSI_WINDOW: usize = 14;

/// Floor applied to the average loss so RSI never divides by zero.
pub const RSI_EPSILON: f64 = 1e-10;

pub const BOLLINGER_WINDOW: usize = 20;
pub const BOLLINGER_K: f64 = 2.0;

pub const MACD_SHORT_SPAN: usize = 12;
pub const MACD_LONG_SPAN: usize = 26;
pub const MACD_SIGNAL_SPAN: usize = 9;

pub const ATR_WINDOW: usize = 14;

pub const STOCHASTIC_WINDOW: usize = 14;
pub const STOCHASTIC_SMOOTH_K: usize = 3;
pub const STOCHASTIC_SMOOTH_D: usize = 3;

pub const SUPPORT_RESISTANCE_WINDOW: usize = 20;

pub const DEFAULT_RISK_FREE_RATE: f64 = 0.02;

/// Trading days per year, used to annualize the Sharpe ratio.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Candlestick body-to-range ratio below which a bar counts as a doji.
pub const DOJI_BODY_RATIO: f64 = 0.1;
