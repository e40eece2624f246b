use serde::{Deserialize, Serialize};
use std::fmt;

/// Lookback period requested from the upstream provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Period {
    Day1,
    Day5,
    Month1,
    Month3,
    Month6,
    Year1,
    Year2,
    Year5,
    Year10,
    Ytd,
    Max,
}

impl Period {
    /// Parse from the query-string representation
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "1d" => Some(Period::Day1),
            "5d" => Some(Period::Day5),
            "1mo" => Some(Period::Month1),
            "3mo" => Some(Period::Month3),
            "6mo" => Some(Period::Month6),
            "1y" => Some(Period::Year1),
            "2y" => Some(Period::Year2),
            "5y" => Some(Period::Year5),
            "10y" => Some(Period::Year10),
            "ytd" => Some(Period::Ytd),
            "max" => Some(Period::Max),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Period::Day1 => "1d",
            Period::Day5 => "5d",
            Period::Month1 => "1mo",
            Period::Month3 => "3mo",
            Period::Month6 => "6mo",
            Period::Year1 => "1y",
            Period::Year2 => "2y",
            Period::Year5 => "5y",
            Period::Year10 => "10y",
            Period::Ytd => "ytd",
            Period::Max => "max",
        }
    }
}

impl Default for Period {
    fn default() -> Self {
        Period::Year1
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Native bar interval of a fetched series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Interval {
    Minute1,
    Minute5,
    Minute15,
    Minute30,
    Hour1,
    Day1,
    Week1,
    Month1,
}

impl Interval {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "1m" => Some(Interval::Minute1),
            "5m" => Some(Interval::Minute5),
            "15m" => Some(Interval::Minute15),
            "30m" => Some(Interval::Minute30),
            "1h" => Some(Interval::Hour1),
            "1d" => Some(Interval::Day1),
            "1wk" => Some(Interval::Week1),
            "1mo" => Some(Interval::Month1),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Interval::Minute1 => "1m",
            Interval::Minute5 => "5m",
            Interval::Minute15 => "15m",
            Interval::Minute30 => "30m",
            Interval::Hour1 => "1h",
            Interval::Day1 => "1d",
            Interval::Week1 => "1wk",
            Interval::Month1 => "1mo",
        }
    }

    /// Intraday intervals render timestamps as date + time; daily and
    /// coarser render the date component only.
    pub fn is_intraday(&self) -> bool {
        matches!(
            self,
            Interval::Minute1
                | Interval::Minute5
                | Interval::Minute15
                | Interval::Minute30
                | Interval::Hour1
        )
    }
}

impl Default for Interval {
    fn default() -> Self {
        Interval::Day1
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Target bucket size for resampling a daily (or finer) series
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResampleRule {
    /// Native daily interval; resampling to it is an identity
    Daily,
    /// Calendar weeks starting Monday
    Weekly,
    /// Calendar months
    Monthly,
    /// Fixed windows of N days with stable boundaries
    Days(u32),
}

impl ResampleRule {
    /// Parse from the query-string representation: "D", "W", "M" or a
    /// day count like "10d"
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "D" | "d" | "1d" => Some(ResampleRule::Daily),
            "W" | "w" | "1wk" => Some(ResampleRule::Weekly),
            "M" | "1mo" => Some(ResampleRule::Monthly),
            _ => {
                let days: u32 = s.strip_suffix('d')?.parse().ok()?;
                if days == 0 {
                    None
                } else {
                    Some(ResampleRule::Days(days))
                }
            }
        }
    }
}

impl fmt::Display for ResampleRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResampleRule::Daily => write!(f, "D"),
            ResampleRule::Weekly => write!(f, "W"),
            ResampleRule::Monthly => write!(f, "M"),
            ResampleRule::Days(n) => write!(f, "{}d", n),
        }
    }
}
