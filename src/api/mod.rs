pub mod friendship;
pub mod middleware;
pub mod resources;
pub mod state;

pub use state::AppState;
pub use middleware::RateLimiter;

use axum::{
    BoxError,
    Router,
    error_handling::HandleErrorLayer,
    routing::{get, post},
    middleware as axum_middleware,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    trace::TraceLayer,
};
use std::sync::Arc;
use std::time::Duration;
use serde::Serialize;

use crate::error::AppError;

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

pub fn create_router(state: AppState, rate_limiter: Arc<RateLimiter>) -> Router {
    let timeout = Duration::from_secs(state.config.request_timeout_secs);

    // Friendship endpoints (require auth)
    let friendship = Router::new()
        .route("/add/:user", post(friendship::add_friend))
        .route("/list", get(friendship::get_friends_list))
        .route("/mutual", get(friendship::get_mutual_friends))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::auth_middleware,
        ));

    Router::new()
        .route("/api/health", get(health))
        .nest("/api/friendship", friendship)
        .layer(axum_middleware::from_fn(move |req, next| {
            let limiter = rate_limiter.clone();
            middleware::rate_limit_middleware(limiter, req, next)
        }))
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_timeout))
                .timeout(timeout),
        )
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Turns errors from the timeout layer into the JSON error envelope
async fn handle_timeout(err: BoxError) -> AppError {
    if err.is::<tower::timeout::error::Elapsed>() {
        tracing::warn!("request timed out");
        AppError::Timeout
    } else {
        AppError::Internal(format!("Unhandled middleware error: {}", err))
    }
}

async fn health() -> axum::Json<HealthResponse> {
    axum::Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
