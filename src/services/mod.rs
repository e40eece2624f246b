mod cache;
mod export;
mod fetcher;
mod filters;
mod pipeline;
mod resampler;

pub use cache::{CsvCache, MemoryCache, SeriesCache};
pub use export::export_series;
pub use fetcher::Fetcher;
pub use filters::{
    filter_by_date_range, filter_by_indicator_range, filter_by_min_volume, filter_by_price_range,
    filter_by_rsi, filter_macd_crossovers,
};
pub use pipeline::{Pipeline, PipelineRequest};
pub use resampler::Resampler;
