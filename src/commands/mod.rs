pub mod export;
pub mod fetch;
pub mod serve;

use crate::provider::HttpProvider;
use crate::services::{CsvCache, Fetcher, Pipeline};
use crate::utils::{get_cache_dir, get_upstream_base_url};
use std::sync::Arc;

/// Build the pipeline every command runs on: HTTP provider against the
/// configured upstream, retrying fetcher, CSV-backed series cache.
pub(crate) fn build_pipeline() -> Result<(Pipeline, Arc<HttpProvider>), crate::error::AppError> {
    let provider = Arc::new(HttpProvider::new(get_upstream_base_url())?);
    let fetcher = Fetcher::new(provider.clone());
    let cache = Arc::new(CsvCache::new(get_cache_dir()));
    Ok((Pipeline::new(fetcher, cache), provider))
}
