use crate::commands::build_pipeline;
use crate::server::{self, AppState};
use crate::utils::{get_cache_dir, get_server_port, get_upstream_base_url};
use std::sync::Arc;

pub async fn run(port: Option<u16>) {
    let port = port.unwrap_or_else(get_server_port);

    println!("🚀 Starting stockpulse server on port {}", port);
    println!("📁 Cache directory: {}", get_cache_dir().display());
    println!("🌐 Upstream: {}", get_upstream_base_url());

    let (pipeline, provider) = match build_pipeline() {
        Ok(parts) => parts,
        Err(e) => {
            eprintln!("❌ Failed to initialize: {}", e);
            std::process::exit(1);
        }
    };

    let state = AppState {
        pipeline: Arc::new(pipeline),
        provider,
    };

    if let Err(e) = server::serve(state, port).await {
        eprintln!("❌ Server error: {}", e);
        std::process::exit(1);
    }
}
