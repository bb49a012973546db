//! Registration API - Entry point.

use registration_api::{
    api::{create_router_with_rate_limit, AppState, RateLimitState},
    config::Config,
};
use registration_core::{RegistrationService, RegistrationStore};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() {
    // Load configuration
    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {:#}", e);
            std::process::exit(1);
        }
    };

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log.level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Registration API");

    // Initialize storage
    let store = RegistrationStore::new(config.storage.path.clone());
    match store.count() {
        Ok(n) => info!(path = %store.path().display(), "Loaded {} registrations", n),
        Err(e) => warn!(path = %store.path().display(), "Registration file unreadable: {}", e),
    }

    let state = AppState::new(RegistrationService::new(store));
    let rate_limit = RateLimitState::from(&config.rate_limit);
    let app = create_router_with_rate_limit(state, rate_limit);

    // Bind to address
    let addr = SocketAddr::new(
        config
            .server
            .listen_addr
            .parse()
            .unwrap_or([127, 0, 0, 1].into()),
        config.server.port,
    );

    info!("Listening on {}", addr);

    let listener = match TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            error!("Failed to bind to {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for shutdown signal: {}", e);
        }
        info!("Shutting down");
    };

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
    {
        error!("Server error: {}", e);
        std::process::exit(1);
    }
}
