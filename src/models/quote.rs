use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Real-time quote snapshot for a symbol
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealtimeQuote {
    pub symbol: String,
    pub price: Option<f64>,
    pub volume: Option<u64>,
    pub market_cap: Option<f64>,
    /// Server-side time the quote was taken, YYYY-MM-DD HH:MM:SS
    pub timestamp: String,
}

/// Sector and industry classification of a company
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyProfile {
    #[serde(rename = "Sector")]
    pub sector: Option<String>,
    #[serde(rename = "Industry")]
    pub industry: Option<String>,
}

/// Financial statements as nested provider-defined mappings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinancialStatements {
    pub balance_sheet: Value,
    pub income_statement: Value,
    pub cash_flow: Value,
}
