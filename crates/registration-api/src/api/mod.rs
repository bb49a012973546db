//! HTTP API over the registration service.

mod handlers;
mod middleware;
mod types;

pub use handlers::*;
pub use middleware::{logging_middleware, rate_limit_middleware, RateLimitState};
pub use types::*;

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use registration_core::RegistrationService;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<RegistrationService>,
}

impl AppState {
    pub fn new(service: RegistrationService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}

/// Create the API router behind the given rate limit.
pub fn create_router_with_rate_limit(state: AppState, rate_limit: RateLimitState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/add_registration", post(handlers::add_registration))
        .route("/get_all_registrations", get(handlers::get_all_registrations))
        .route("/search_registrations", get(handlers::search_registrations))
        .layer(axum_middleware::from_fn_with_state(
            rate_limit,
            rate_limit_middleware,
        ))
        .layer(axum_middleware::from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
