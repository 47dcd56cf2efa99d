//! Listing endpoint.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use intake_core::models::SubmissionResponse;
use serde::Serialize;

use crate::error::HttpAppError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct SubmissionListResponse {
    pub success: bool,
    pub count: usize,
    pub data: Vec<SubmissionResponse>,
}

/// GET /api/submissions
///
/// All submissions newest-first. The projection excludes provenance by
/// construction (`SubmissionResponse` has no such fields).
pub async fn list_submissions(
    State(state): State<Arc<AppState>>,
) -> Result<Json<SubmissionListResponse>, HttpAppError> {
    let records = state.submissions.list_recent().await?;
    let data: Vec<SubmissionResponse> = records.into_iter().map(Into::into).collect();

    Ok(Json(SubmissionListResponse {
        success: true,
        count: data.len(),
        data,
    }))
}
