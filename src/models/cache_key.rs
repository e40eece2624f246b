use super::{Interval, Period};

/// Identity of one cached series: the exact (symbol, period, interval)
/// triple. Differing period or interval produce distinct entries even for
/// the same symbol.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub symbol: String,
    pub period: Period,
    pub interval: Interval,
}

impl CacheKey {
    pub fn new(symbol: impl Into<String>, period: Period, interval: Interval) -> Self {
        Self {
            symbol: symbol.into(),
            period,
            interval,
        }
    }

    /// File name of the persisted entry, one CSV per key
    pub fn file_name(&self) -> String {
        format!(
            "{}_{}_{}.csv",
            self.symbol,
            self.period.as_str(),
            self.interval.as_str()
        )
    }
}
