//! In-memory rate limiting for the ingestion endpoint.
//!
//! Sharded fixed-window limiter keyed by client IP. Requests over the quota
//! are rejected before the ingestion pipeline runs at all.

use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tokio::sync::Mutex;

use crate::error::ErrorBody;
use crate::utils::ip_extraction::extract_client_ip;

pub const RATE_LIMIT_MESSAGE: &str = "Too many requests. Please slow down.";

#[derive(Clone)]
struct RateLimitBucket {
    count: u32,
    reset_at: Instant,
}

impl RateLimitBucket {
    fn new(window: Duration) -> Self {
        Self {
            count: 0,
            reset_at: Instant::now() + window,
        }
    }

    fn check_and_increment(&mut self, limit: u32, window: Duration) -> (bool, u32) {
        let now = Instant::now();

        // Reset if window expired
        if now >= self.reset_at {
            self.count = 0;
            self.reset_at = now + window;
        }

        if self.count < limit {
            self.count += 1;
            (true, limit.saturating_sub(self.count))
        } else {
            (false, 0)
        }
    }

    fn reset_in(&self) -> Duration {
        self.reset_at.saturating_duration_since(Instant::now())
    }
}

/// Sharded per-IP rate limiter (multiple maps to reduce lock contention).
#[derive(Clone)]
pub struct HttpRateLimiter {
    shards: Vec<Arc<Mutex<HashMap<String, RateLimitBucket>>>>,
    shard_count: usize,
    limit: u32,
    window: Duration,
    max_buckets: usize,
    trusted_proxy_count: usize,
}

impl HttpRateLimiter {
    pub fn new(limit: u32, window_seconds: u64, trusted_proxy_count: usize) -> Self {
        Self::with_shards(limit, window_seconds, trusted_proxy_count, 16)
    }

    pub fn with_shards(
        limit: u32,
        window_seconds: u64,
        trusted_proxy_count: usize,
        shard_count: usize,
    ) -> Self {
        let shards = (0..shard_count)
            .map(|_| Arc::new(Mutex::new(HashMap::new())))
            .collect();
        Self {
            shards,
            shard_count,
            limit,
            window: Duration::from_secs(window_seconds),
            max_buckets: 10_000,
            trusted_proxy_count,
        }
    }

    fn shard_index(&self, key: &str) -> usize {
        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        key.hash(&mut hasher);
        (hasher.finish() as usize) % self.shard_count
    }

    /// Check the quota for one key. Returns remaining requests in the
    /// current window, or the time until the window resets when exhausted.
    pub async fn check_rate_limit(&self, key: &str) -> Result<u32, Duration> {
        let shard = &self.shards[self.shard_index(key)];
        let mut buckets = shard.lock().await;

        // Bound memory: drop expired buckets when a shard fills up, then
        // evict the oldest one if that was not enough.
        if buckets.len() >= self.max_buckets {
            let now = Instant::now();
            buckets.retain(|_key, bucket| bucket.reset_at > now);

            if buckets.len() >= self.max_buckets {
                let oldest_key = buckets
                    .iter()
                    .min_by_key(|(_, bucket)| bucket.reset_at)
                    .map(|(k, _)| k.clone());
                if let Some(key_to_remove) = oldest_key {
                    buckets.remove(&key_to_remove);
                }
            }
        }

        let window = self.window;
        let bucket = buckets
            .entry(key.to_string())
            .or_insert_with(|| RateLimitBucket::new(window));

        let (allowed, remaining) = bucket.check_and_increment(self.limit, window);
        if allowed {
            Ok(remaining)
        } else {
            Err(bucket.reset_in())
        }
    }

    /// Drop buckets whose window already ended, across all shards.
    pub async fn cleanup_expired_buckets(&self) {
        let now = Instant::now();
        let mut total_cleaned = 0;

        for shard in &self.shards {
            let mut buckets = shard.lock().await;
            let before = buckets.len();
            buckets.retain(|_key, bucket| bucket.reset_at > now);
            total_cleaned += before - buckets.len();
        }

        if total_cleaned > 0 {
            tracing::debug!(
                buckets_cleaned = total_cleaned,
                "Cleaned up expired rate limit buckets"
            );
        }
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }
}

/// Axum middleware gating a route behind the limiter.
///
/// Adds `X-RateLimit-Limit` / `X-RateLimit-Remaining` headers on accepted
/// requests; rejected ones get 429 with the response envelope plus a
/// `Retry-After` header.
pub async fn rate_limit_middleware(
    State(rate_limiter): State<Arc<HttpRateLimiter>>,
    request: Request,
    next: Next,
) -> Response {
    let socket_addr = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0);
    let ip = extract_client_ip(
        request.headers(),
        socket_addr.as_ref(),
        rate_limiter.trusted_proxy_count,
    );
    let key = format!("ip:{}", ip);
    let limit = rate_limiter.limit();

    match rate_limiter.check_rate_limit(&key).await {
        Ok(remaining) => {
            let mut response = next.run(request).await;
            set_header(&mut response, "X-RateLimit-Limit", &limit.to_string());
            set_header(
                &mut response,
                "X-RateLimit-Remaining",
                &remaining.to_string(),
            );
            response
        }
        Err(reset_in) => {
            tracing::warn!(client_ip = %ip, "Rate limit exceeded");

            let mut response = (
                StatusCode::TOO_MANY_REQUESTS,
                axum::Json(ErrorBody::new(RATE_LIMIT_MESSAGE)),
            )
                .into_response();
            set_header(&mut response, "X-RateLimit-Limit", &limit.to_string());
            set_header(&mut response, "X-RateLimit-Remaining", "0");
            set_header(
                &mut response,
                "Retry-After",
                &reset_in.as_secs().max(1).to_string(),
            );
            response
        }
    }
}

fn set_header(response: &mut Response, name: &'static str, value: &str) {
    if let Ok(header_value) = HeaderValue::from_str(value) {
        response.headers_mut().insert(name, header_value);
    }
}
