mod app_system;
mod clients;
mod domain;
mod error;
mod http;
mod messages;
mod pricing;
mod repository;
mod services;

#[cfg(test)]
mod mock_framework;

use tracing::{error, info, Instrument};

use crate::app_system::{setup_tracing, AppConfig, OrderSystem};

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Could not listen for shutdown signal");
    }
    info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();

    let config = AppConfig::from_env().map_err(|e| e.to_string())?;
    info!(bind_addr = %config.bind_addr(), oversell_policy = ?config.oversell_policy, "Starting storefront order service");

    let system = OrderSystem::new(&config);

    if config.seed_demo_catalog {
        let span = tracing::info_span!("catalog_seed");
        let seeded = system
            .seed_demo_catalog()
            .instrument(span)
            .await
            .map_err(|e| e.to_string())?;
        info!(product_count = seeded, "Catalog ready");
    }

    let listener = tokio::net::TcpListener::bind(config.bind_addr())
        .await
        .map_err(|e| format!("Failed to bind {}: {}", config.bind_addr(), e))?;

    if let Err(e) = http::serve(system.order_client.clone(), listener, shutdown_signal()).await {
        error!(error = %e, "HTTP server failed");
    }

    system.shutdown().await?;

    info!("Application stopped");
    Ok(())
}
