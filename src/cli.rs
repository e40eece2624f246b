use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::commands;

#[derive(Parser)]
#[command(name = "stockpulse")]
#[command(about = "Stock market data API and analysis CLI", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server
    Serve {
        /// Port to listen on (defaults to STOCKPULSE_PORT or 5000)
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Fetch a symbol's history and print a summary
    Fetch {
        /// Ticker symbol, e.g. AAPL
        symbol: String,
        /// Lookback period (1d, 5d, 1mo, 3mo, 6mo, 1y, 2y, 5y, 10y, ytd, max)
        #[arg(short, long, default_value = "1y")]
        period: String,
        /// Bar interval (1m, 5m, 15m, 30m, 1h, 1d, 1wk, 1mo)
        #[arg(short, long, default_value = "1d")]
        interval: String,
    },
    /// Fetch a symbol's history and export it to a spreadsheet file
    Export {
        /// Ticker symbol, e.g. AAPL
        symbol: String,
        /// Lookback period
        #[arg(short, long, default_value = "1y")]
        period: String,
        /// Bar interval
        #[arg(short, long, default_value = "1d")]
        interval: String,
        /// Output file path (defaults to <export dir>/<SYMBOL>_data.csv)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

pub async fn run() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { port } => {
            commands::serve::run(port).await;
        }
        Commands::Fetch {
            symbol,
            period,
            interval,
        } => {
            commands::fetch::run(symbol, period, interval).await;
        }
        Commands::Export {
            symbol,
            period,
            interval,
            output,
        } => {
            commands::export::run(symbol, period, interval, output).await;
        }
    }
}
