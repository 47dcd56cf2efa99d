//! Route configuration and setup.

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use intake_core::Config;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::error::{ErrorBody, NOT_FOUND_MESSAGE};
use crate::handlers::{health, submissions, submit_form};
use crate::middleware::rate_limit::{rate_limit_middleware, HttpRateLimiter};
use crate::state::AppState;

/// Setup all application routes.
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router, anyhow::Error> {
    let cors = setup_cors(config)?;
    let rate_limiter = setup_rate_limiter(config);

    let app = Router::new()
        // Only the ingestion endpoint sits behind the rate limiter.
        .route(
            "/api/submit-form",
            post(submit_form::submit_form).layer(axum::middleware::from_fn_with_state(
                rate_limiter,
                rate_limit_middleware,
            )),
        )
        .route("/api/submissions", get(submissions::list_submissions))
        .route("/api/healthz", get(health::healthz))
        .fallback(not_found)
        .layer(RequestBodyLimitLayer::new(config.max_request_body_bytes))
        .layer(DefaultBodyLimit::disable())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(app)
}

async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(ErrorBody::new(NOT_FOUND_MESSAGE)))
}

fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let cors = if config.cors_origins.contains(&"*".to_string()) {
        if config.is_production() {
            tracing::warn!("CORS configured to allow all origins in production");
        }
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any)
    } else {
        let origins: Result<Vec<HeaderValue>, _> =
            config.cors_origins.iter().map(|o| o.parse()).collect();
        CorsLayer::new()
            .allow_origin(origins.unwrap_or_default())
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any)
    };
    Ok(cors)
}

fn setup_rate_limiter(config: &Config) -> Arc<HttpRateLimiter> {
    let rate_limiter = Arc::new(HttpRateLimiter::new(
        config.rate_limit_max,
        config.rate_limit_window_secs,
        config.trusted_proxy_count,
    ));

    // Expired buckets are reclaimed in the background so idle clients do not
    // accumulate forever.
    let rate_limiter_for_cleanup = rate_limiter.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(tokio::time::Duration::from_secs(300));
        loop {
            interval.tick().await;
            rate_limiter_for_cleanup.cleanup_expired_buckets().await;
        }
    });

    tracing::info!(
        rate_limit_max = config.rate_limit_max,
        rate_limit_window_secs = config.rate_limit_window_secs,
        "Rate limiting enabled for the ingestion endpoint"
    );
    rate_limiter
}
