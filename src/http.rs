//! HTTP endpoint for Prometheus scraping.
//!
//! Serves `GET /metrics` from the blockgate registry; every other path is 404.

use axum::{Router, routing::get};
use std::io;
use tokio::net::TcpListener;

/// Handler for GET /metrics - returns Prometheus metrics in text format.
async fn metrics_handler() -> String {
    crate::metrics::gather_metrics()
}

/// Routes served by the metrics endpoint.
pub fn router() -> Router {
    Router::new().route("/metrics", get(metrics_handler))
}

/// Serve the metrics endpoint on an already bound listener.
///
/// Runs until the listener fails; spawn it in the background.
pub async fn serve_metrics(listener: TcpListener) -> io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!(%addr, "Prometheus HTTP server listening");
    }
    axum::serve(listener, router()).await
}
