//! Server mode
//!
//! Wires storage and services together and runs the HTTP server.

use actix_web::{
    App, HttpServer,
    middleware::{Compress, DefaultHeaders},
};
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{info, warn};

use crate::api::AppServices;
use crate::api::middleware::RequestLogger;
use crate::config::StaticConfig;
use crate::storage::{PollRepository, StorageFactory};

/// Run the HTTP server
///
/// **Note**: Logging system must be initialized before calling this function
pub async fn run_server(config: &StaticConfig) -> Result<()> {
    let storage = StorageFactory::create(&config.database)
        .await
        .map_err(|e| {
            tracing::error!("Server startup failed: {}", e);
            anyhow::anyhow!(e.format_simple())
        })?;

    let backend = storage.backend_name().to_string();
    let repository: Arc<dyn PollRepository> = storage;
    let services = AppServices::new(repository, &backend, &config.chart);

    let cpu_count = config.server.cpu_count.clamp(1, 32);
    warn!("Using {} CPU cores for the server", cpu_count);

    let bind_address = format!("{}:{}", config.server.host, config.server.port);

    let server = HttpServer::new(move || {
        let services = services.clone();
        App::new()
            .wrap(RequestLogger)
            .wrap(Compress::default())
            .wrap(
                DefaultHeaders::new()
                    .add(("Cache-Control", "no-cache, no-store, must-revalidate")),
            )
            .configure(|cfg| services.configure(cfg))
    })
    .keep_alive(std::time::Duration::from_secs(30))
    .workers(cpu_count)
    .bind(&bind_address)
    .with_context(|| format!("Failed to bind {}", bind_address))?;

    warn!("Starting server at http://{}", bind_address);
    server.run().await.context("HTTP server terminated with error")?;

    info!("Server stopped");
    Ok(())
}
