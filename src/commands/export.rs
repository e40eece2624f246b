use crate::commands::build_pipeline;
use crate::indicators::IndicatorKind;
use crate::models::{Interval, Period};
use crate::services::{export_series, PipelineRequest};
use crate::utils::get_export_dir;
use std::path::PathBuf;

pub async fn run(symbol: String, period: String, interval: String, output: Option<PathBuf>) {
    let period = match Period::parse(&period) {
        Some(p) => p,
        None => {
            eprintln!("❌ Invalid period: {}", period);
            std::process::exit(1);
        }
    };
    let interval = match Interval::parse(&interval) {
        Some(i) => i,
        None => {
            eprintln!("❌ Invalid interval: {}", interval);
            std::process::exit(1);
        }
    };

    let symbol = symbol.to_uppercase();
    let path = output.unwrap_or_else(|| get_export_dir().join(format!("{}_data.csv", symbol)));

    println!("📊 Fetching {} ({} / {})...", symbol, period, interval);

    let (pipeline, _) = match build_pipeline() {
        Ok(parts) => parts,
        Err(e) => {
            eprintln!("❌ Failed to initialize: {}", e);
            std::process::exit(1);
        }
    };

    // Enrich with every indicator family so the spreadsheet carries the
    // full set of derived columns
    let request = PipelineRequest {
        symbol: symbol.clone(),
        period,
        interval,
        start_date: None,
        end_date: None,
        resample: None,
        indicators: vec![
            IndicatorKind::Ma,
            IndicatorKind::Rsi,
            IndicatorKind::Bollinger,
            IndicatorKind::Macd,
            IndicatorKind::Atr,
            IndicatorKind::Stochastic,
            IndicatorKind::Patterns,
        ],
    };

    let series = match pipeline.run(&request).await {
        Ok(series) => series,
        Err(e) => {
            eprintln!("❌ Fetch failed: {}", e);
            std::process::exit(1);
        }
    };

    match export_series(&series, interval, &path) {
        Ok(rows) => println!("✅ Exported {} rows to {}", rows, path.display()),
        Err(e) => {
            eprintln!("❌ Export failed: {}", e);
            std::process::exit(1);
        }
    }
}
