//! Rate limiting and request logging middleware.

use crate::config::RateLimitConfig;
use crate::error::ApiError;
use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use governor::{
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter,
};
use std::{num::NonZeroU32, sync::Arc, time::Instant};
use tracing::{debug, error, warn};

const FALLBACK_REQUESTS_PER_MINUTE: NonZeroU32 = match NonZeroU32::new(60) {
    Some(n) => n,
    None => unreachable!(),
};

/// One quota shared by every client.
#[derive(Clone)]
pub struct RateLimitState {
    limiter: Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>,
}

impl RateLimitState {
    /// A zero quota falls back to 60 requests per minute.
    pub fn new(requests_per_minute: u32) -> Self {
        let per_minute =
            NonZeroU32::new(requests_per_minute).unwrap_or(FALLBACK_REQUESTS_PER_MINUTE);

        Self {
            limiter: Arc::new(RateLimiter::direct(Quota::per_minute(per_minute))),
        }
    }

    /// Effectively unlimited; for tests.
    pub fn permissive() -> Self {
        Self::new(10_000)
    }

    /// Take one request from the quota, if any is left.
    pub fn try_acquire(&self) -> bool {
        self.limiter.check().is_ok()
    }
}

pub async fn rate_limit_middleware(
    State(rate_limit): State<RateLimitState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if !rate_limit.try_acquire() {
        warn!(uri = %request.uri(), "Rate limit exceeded");
        return Err(ApiError::RateLimitExceeded);
    }

    Ok(next.run(request).await)
}

/// Log each request once it completes, at a level chosen by status class.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let started = Instant::now();

    let response = next.run(request).await;

    let status = response.status();
    let latency_ms = started.elapsed().as_millis() as u64;

    match status {
        s if s.is_server_error() => error!(%method, %path, %status, latency_ms, "Request failed"),
        s if s.is_client_error() && s != StatusCode::TOO_MANY_REQUESTS => {
            warn!(%method, %path, %status, latency_ms, "Request rejected")
        }
        _ => debug!(%method, %path, %status, latency_ms, "Request handled"),
    }

    response
}

impl From<&RateLimitConfig> for RateLimitState {
    fn from(config: &RateLimitConfig) -> Self {
        Self::new(config.requests_per_minute)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quota_exhaustion() {
        let state = RateLimitState::new(2);

        assert!(state.try_acquire());
        assert!(state.try_acquire());
        assert!(!state.try_acquire());
    }

    #[test]
    fn test_clones_share_quota() {
        let state = RateLimitState::new(1);
        let clone = state.clone();

        assert!(state.try_acquire());
        assert!(!clone.try_acquire());
    }

    #[test]
    fn test_built_from_config() {
        let state = RateLimitState::from(&RateLimitConfig {
            requests_per_minute: 1,
        });

        assert!(state.try_acquire());
        assert!(!state.try_acquire());
    }

    #[test]
    fn test_zero_quota_falls_back() {
        let state = RateLimitState::new(0);
        assert!((0..60).all(|_| state.try_acquire()));
        assert!(!state.try_acquire());
    }
}
