//! Health check endpoint.

/// GET /api/healthz
pub async fn healthz() -> &'static str {
    "ok"
}
