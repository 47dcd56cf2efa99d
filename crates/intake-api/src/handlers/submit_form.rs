//! Ingestion endpoint: one multipart form in, one persisted submission out.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::multipart::MultipartRejection;
use axum::extract::rejection::ExtensionRejection;
use axum::extract::{ConnectInfo, Multipart, State};
use axum::http::{header::USER_AGENT, HeaderMap};
use axum::Json;
use intake_core::models::Provenance;
use intake_core::AppError;
use serde::Serialize;
use uuid::Uuid;

use crate::error::HttpAppError;
use crate::services::intake::IntakeService;
use crate::state::AppState;

/// Fallback recorded when the client sends no User-Agent header.
const UNKNOWN_USER_AGENT: &str = "unknown";

#[derive(Debug, Serialize)]
pub struct SubmitFormResponse {
    pub success: bool,
    pub message: String,
    pub data: SubmittedId,
}

#[derive(Debug, Serialize)]
pub struct SubmittedId {
    pub id: Uuid,
}

/// POST /api/submit-form
///
/// Streams and classifies every part, assembles the submission, persists it,
/// then answers with the generated id. The confirmation email is dispatched
/// fire-and-forget after persistence; its outcome never changes the response.
pub async fn submit_form(
    State(state): State<Arc<AppState>>,
    connect_info: Result<ConnectInfo<SocketAddr>, ExtensionRejection>,
    headers: HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<SubmitFormResponse>, HttpAppError> {
    // A request that is not valid multipart is a stream-level failure and
    // renders as the same generic envelope as any other pipeline error.
    let multipart = multipart.map_err(|e| AppError::Multipart(e.to_string()))?;

    let socket_addr = connect_info.ok().map(|info| info.0);
    let provenance = Provenance {
        client_ip: crate::utils::ip_extraction::extract_client_ip(
            &headers,
            socket_addr.as_ref(),
            state.config.trusted_proxy_count,
        ),
        user_agent: headers
            .get(USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .unwrap_or(UNKNOWN_USER_AGENT)
            .to_string(),
    };

    let service = IntakeService::new(state.sink.clone(), state.config.max_file_size_bytes);
    let submission = service.assemble(multipart, provenance).await?;

    let id = state.submissions.save(&submission).await?;

    tracing::info!(
        submission_id = %id,
        files = submission.documents.total_files(),
        "Submission persisted"
    );

    if let (Some(mailer), Some(email)) = (state.mailer.clone(), submission.profile.email.clone()) {
        let first_name = submission.profile.first_name.clone();
        tokio::spawn(async move {
            if let Err(e) = mailer
                .send_confirmation(&email, first_name.as_deref())
                .await
            {
                tracing::warn!(error = %e, "Failed to send confirmation email");
            }
        });
    }

    Ok(Json(SubmitFormResponse {
        success: true,
        message: "Form submitted successfully".to_string(),
        data: SubmittedId { id },
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_response_shape() {
        let response = SubmitFormResponse {
            success: true,
            message: "Form submitted successfully".to_string(),
            data: SubmittedId { id: Uuid::new_v4() },
        };
        let json = serde_json::to_value(&response).expect("serialize");
        assert_eq!(json["success"], true);
        assert!(json["data"]["id"].as_str().is_some());
    }
}
