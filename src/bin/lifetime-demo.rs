//! Lifetime demo server.
//!
//! Usage: `lifetime-demo [CONFIG_FILE]`
//!
//! Serves the operations endpoints on `LIFETIME_DEMO_BIND_ADDR` (default
//! `127.0.0.1:5000`). Log verbosity follows `RUST_LOG`.

use std::path::PathBuf;
use std::sync::Arc;

use lifetime_registry::axum_integration::router;
use lifetime_registry::config::DemoConfig;
use lifetime_registry::{LoggingObserver, Registrations, RegistrationsExt};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    let config = DemoConfig::load(config_path.as_deref())?;

    let mut registrations = Registrations::new();
    registrations
        .add_module(&config)
        .add_observer(Arc::new(LoggingObserver::with_prefix("lifetime-demo")));
    let registry = registrations.build();

    for (key, lifetime) in registry.bindings() {
        tracing::info!(key = %key, lifetime = %lifetime, "registered capability");
    }

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!("DI lifetime demo started, navigate to http://{}/api/operations", listener.local_addr()?);

    axum::serve(listener, router(registry))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("DI lifetime demo stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
