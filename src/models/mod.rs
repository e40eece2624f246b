mod bar;
mod cache_key;
mod interval;
mod quote;

pub use bar::Bar;
pub use cache_key::CacheKey;
pub use interval::{Interval, Period, ResampleRule};
pub use quote::{CompanyProfile, FinancialStatements, RealtimeQuote};

/// Time series for a single symbol, ordered strictly ascending by time
pub type TimeSeries = Vec<Bar>;
