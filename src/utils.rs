use std::path::PathBuf;

/// Get the series cache directory from environment variable or use default
pub fn get_cache_dir() -> PathBuf {
    std::env::var("STOCKPULSE_CACHE_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("cache"))
}

/// Get the spreadsheet export directory from environment variable or use default
pub fn get_export_dir() -> PathBuf {
    std::env::var("STOCKPULSE_EXPORT_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("exports"))
}

/// Get the upstream market-data base URL from environment variable or use default
pub fn get_upstream_base_url() -> String {
    std::env::var("STOCKPULSE_UPSTREAM_URL")
        .unwrap_or_else(|_| "https://query1.finance.yahoo.com".to_string())
}

/// Get the HTTP bind port from environment variable or use default
pub fn get_server_port() -> u16 {
    std::env::var("STOCKPULSE_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(5000)
}
