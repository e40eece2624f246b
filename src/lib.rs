//! stockpulse — stock market data API with technical analysis.
//!
//! Fetches OHLCV series from an upstream provider through a read-through
//! cache, then runs them through a pure transformation pipeline: date
//! filtering, resampling, indicator computation and threshold filtering.
//! The HTTP surface in [`server`] exposes the pipeline as JSON endpoints.

pub mod cli;
pub mod commands;
pub mod constants;
pub mod error;
pub mod indicators;
pub mod models;
pub mod provider;
pub mod server;
pub mod services;
pub mod utils;
