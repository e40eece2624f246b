pub mod api;

use crate::provider::StockDataProvider;
use crate::services::Pipeline;
use axum::{routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<Pipeline>,
    pub provider: Arc<dyn StockDataProvider>,
}

/// Build the API router over the given state
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([axum::http::Method::GET])
        .allow_headers(Any);

    Router::new()
        .route("/api/stocks/historical/{symbol}", get(api::historical_handler))
        .route("/api/stocks/realtime/{symbol}", get(api::realtime_handler))
        .route("/api/stocks/financials/{symbol}", get(api::financials_handler))
        .route("/api/stocks/filter/price", get(api::filter_price_handler))
        .route("/api/stocks/filter/volume", get(api::filter_volume_handler))
        .route("/api/stocks/indicators/{symbol}", get(api::indicators_handler))
        .route(
            "/api/stocks/sector-industry/{symbol}",
            get(api::sector_industry_handler),
        )
        .route("/api/stocks/patterns/{symbol}", get(api::patterns_handler))
        .route("/api/stocks/export/{symbol}", get(api::export_handler))
        .route("/api/stocks/{symbol}", get(api::composed_handler))
        .layer(cors)
        .with_state(state)
}

/// Start the axum server
pub async fn serve(state: AppState, port: u16) -> Result<(), Box<dyn std::error::Error>> {
    info!("Registering routes:");
    info!("  GET /api/stocks/historical/{{symbol}}?period&interval");
    info!("  GET /api/stocks/realtime/{{symbol}}");
    info!("  GET /api/stocks/financials/{{symbol}}");
    info!("  GET /api/stocks/filter/price?symbol&min_price&max_price");
    info!("  GET /api/stocks/filter/volume?symbol&min_volume");
    info!("  GET /api/stocks/indicators/{{symbol}}");
    info!("  GET /api/stocks/sector-industry/{{symbol}}");
    info!("  GET /api/stocks/patterns/{{symbol}}");
    info!("  GET /api/stocks/export/{{symbol}}");
    info!("  GET /api/stocks/{{symbol}}?period&interval&resample&start_date&end_date&indicators");

    let app = router(state);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!(%addr, "Server listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
