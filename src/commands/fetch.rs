use crate::commands::build_pipeline;
use crate::constants::{DEFAULT_RISK_FREE_RATE, SUPPORT_RESISTANCE_WINDOW};
use crate::indicators::{sharpe_ratio, support_resistance};
use crate::models::{Interval, Period};
use crate::services::PipelineRequest;

pub async fn run(symbol: String, period: String, interval: String) {
    let period = match Period::parse(&period) {
        Some(p) => p,
        None => {
            eprintln!("❌ Invalid period: {}", period);
            eprintln!("   Valid options: 1d, 5d, 1mo, 3mo, 6mo, 1y, 2y, 5y, 10y, ytd, max");
            std::process::exit(1);
        }
    };
    let interval = match Interval::parse(&interval) {
        Some(i) => i,
        None => {
            eprintln!("❌ Invalid interval: {}", interval);
            eprintln!("   Valid options: 1m, 5m, 15m, 30m, 1h, 1d, 1wk, 1mo");
            std::process::exit(1);
        }
    };

    let symbol = symbol.to_uppercase();
    println!("📊 Fetching {} ({} / {})...", symbol, period, interval);

    let (pipeline, _) = match build_pipeline() {
        Ok(parts) => parts,
        Err(e) => {
            eprintln!("❌ Failed to initialize: {}", e);
            std::process::exit(1);
        }
    };

    let request = PipelineRequest::fetch_only(symbol.clone(), period, interval);
    let series = match pipeline.run(&request).await {
        Ok(series) => series,
        Err(e) => {
            eprintln!("❌ Fetch failed: {}", e);
            std::process::exit(1);
        }
    };

    let time_format = if interval.is_intraday() {
        "%Y-%m-%d %H:%M:%S"
    } else {
        "%Y-%m-%d"
    };

    println!("✅ {} bars for {}", series.len(), symbol);
    if let (Some(first), Some(last)) = (series.first(), series.last()) {
        println!(
            "   📅 Range:      {} .. {}",
            first.time.format(time_format),
            last.time.format(time_format)
        );
        println!("   💰 Last close: {:.2}", last.close);
        if first.close != 0.0 {
            let change = (last.close / first.close - 1.0) * 100.0;
            println!("   📈 Change:     {:+.2}%", change);
        }
    }

    match support_resistance(&series, SUPPORT_RESISTANCE_WINDOW) {
        Ok(levels) => {
            println!("   🔻 Support:    {:.2}", levels.support);
            println!("   🔺 Resistance: {:.2}", levels.resistance);
        }
        Err(e) => println!("   ⚠️  Support/resistance unavailable: {}", e),
    }

    match sharpe_ratio(&series, DEFAULT_RISK_FREE_RATE) {
        Ok(sharpe) => println!("   ⚖️  Sharpe:     {:.3}", sharpe),
        Err(e) => println!("   ⚠️  Sharpe unavailable: {}", e),
    }
}
