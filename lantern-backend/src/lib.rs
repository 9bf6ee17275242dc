pub mod config;
pub mod discord;
mod error;
pub mod exaroton;
pub mod helpers;
mod routes;
mod validation;

use axum::{Router, http::StatusCode, routing::get};
use lantern_core::{ReferenceZone, StatusBoard};
use std::sync::Arc;
use std::time::Duration;
use tower_governor::{
    GovernorLayer, governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor,
};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

pub use error::ErrorResponse;

pub struct AppState {
    pub board: StatusBoard,
    pub zone: ReferenceZone,
}

/// Rate limiting configuration
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Requests per second for the JSON API
    pub per_sec: u64,
    /// Burst size for the JSON API
    pub burst: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            per_sec: 10,
            burst: 20,
        }
    }
}

/// HTTP limits applied to every route
#[derive(Debug, Clone)]
pub struct HttpLimits {
    pub request_body_limit: usize,
    pub request_timeout: Duration,
}

impl Default for HttpLimits {
    fn default() -> Self {
        Self {
            request_body_limit: 64 * 1024,
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// Create the dashboard/API router reading from the given status board.
///
/// Pass `None` for `rate_limit` when there is no peer address to key on (tests).
pub fn create_app(
    board: StatusBoard,
    zone: ReferenceZone,
    limits: HttpLimits,
    rate_limit: Option<RateLimitConfig>,
) -> Router {
    let state = Arc::new(AppState { board, zone });

    let mut api_routes: Router<Arc<AppState>> = Router::new()
        .route("/api/online", get(routes::online))
        .route("/api/players/{name}", get(routes::player));

    if let Some(rate_limit) = rate_limit {
        let governor = GovernorConfigBuilder::default()
            .per_second(rate_limit.per_sec)
            .burst_size(rate_limit.burst)
            .key_extractor(SmartIpKeyExtractor)
            .finish();
        match governor {
            Some(governor) => api_routes = api_routes.layer(GovernorLayer::new(governor)),
            None => tracing::warn!(?rate_limit, "invalid rate limit, API is not rate limited"),
        }
    }

    Router::new()
        .route("/health", get(|| async { StatusCode::OK }))
        .route("/", get(routes::dashboard))
        .merge(api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            limits.request_timeout,
        ))
        .layer(RequestBodyLimitLayer::new(limits.request_body_limit))
        .with_state(state)
}
