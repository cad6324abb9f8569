//! blockgate - message-gating policy engine.
//!
//! Reads inbound messages as JSON lines on stdin and writes the resulting
//! host events as JSON lines on stdout.

use blockgate::config::{Config, validation};
use blockgate::db::{BlockStore, Database};
use blockgate::{Host, http, metrics};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // stdout carries events, so logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.toml".to_string());

    let config = Config::load(&config_path).map_err(|e| {
        error!(path = %config_path, error = %e, "Failed to load config");
        e
    })?;

    if let Err(errors) = validation::validate(&config) {
        for e in &errors {
            error!(error = %e, "Invalid configuration");
        }
        return Err(anyhow::anyhow!(
            "configuration has {} error(s), see log above",
            errors.len()
        ));
    }

    info!(
        auto_block_channels = config.gate.auto_block_channels,
        allow_self_operation = config.gate.allow_self_operation,
        allow_trigger = config.gate.allow_trigger,
        command_targets = config.gate.command_targets.len(),
        channel_commands = config.gate.channel_commands.len(),
        outbound_filter = config.outbound.enabled,
        "Starting blockgate"
    );

    let db = Database::new(&config.database.path).await?;
    match db.blocks().count().await {
        Ok(count) => info!(count, "Loaded block records"),
        Err(e) => warn!(error = %e, "Failed to count block records"),
    }

    // Convention: metrics_port = 0 disables the HTTP endpoint.
    let metrics_port = config.server.metrics_port.unwrap_or(9090);
    if metrics_port == 0 {
        info!("Metrics disabled");
    } else {
        let addr = SocketAddr::new(config.server.metrics_bind, metrics_port);
        match TcpListener::bind(addr).await {
            Ok(listener) => {
                metrics::init();
                info!("Metrics initialized");

                tokio::spawn(async move {
                    if let Err(e) = http::serve_metrics(listener).await {
                        error!(error = %e, "Metrics HTTP server error");
                    }
                });
                info!(%addr, "Prometheus HTTP server started");
            }
            Err(e) => {
                warn!(%addr, error = %e, "Failed to bind metrics endpoint; metrics disabled");
            }
        }
    }

    let store: Arc<dyn BlockStore> = Arc::new(db);
    let host = Host::new(Arc::new(config), store);

    host.serve(tokio::io::stdin(), tokio::io::stdout()).await?;

    info!("Input closed, shutting down");
    Ok(())
}
