use crate::error::Result;
use crate::models::{Bar, Interval};
use std::path::Path;
use tracing::info;

fn opt_num(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn opt_flag(value: Option<bool>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Write a series to a spreadsheet (CSV) file, one row per bar with every
/// derived column included; undefined values become empty cells.
///
/// Returns the number of rows written.
pub fn export_series(series: &[Bar], interval: Interval, path: &Path) -> Result<usize> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let time_format = if interval.is_intraday() {
        "%Y-%m-%d %H:%M:%S"
    } else {
        "%Y-%m-%d"
    };

    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record([
        "Date", "Open", "High", "Low", "Close", "Volume", "PctChange", "SMA10", "SMA50", "RSI",
        "BBUpper", "BBLower", "MACD", "Signal", "Histogram", "ATR", "PercentK", "PercentD",
        "PercentDSlow", "Doji", "Hammer", "Engulfing",
    ])?;

    for bar in series {
        writer.write_record(&[
            bar.time.format(time_format).to_string(),
            bar.open.to_string(),
            bar.high.to_string(),
            bar.low.to_string(),
            bar.close.to_string(),
            bar.volume.to_string(),
            opt_num(bar.percent_change),
            opt_num(bar.sma_10),
            opt_num(bar.sma_50),
            opt_num(bar.rsi),
            opt_num(bar.bb_upper),
            opt_num(bar.bb_lower),
            opt_num(bar.macd),
            opt_num(bar.macd_signal),
            opt_num(bar.macd_histogram),
            opt_num(bar.atr),
            opt_num(bar.percent_k),
            opt_num(bar.percent_d),
            opt_num(bar.percent_d_slow),
            opt_flag(bar.doji),
            opt_flag(bar.hammer),
            opt_flag(bar.engulfing),
        ])?;
    }
    writer.flush()?;

    info!(path = %path.display(), rows = series.len(), "Exported series");
    Ok(series.len())
}
