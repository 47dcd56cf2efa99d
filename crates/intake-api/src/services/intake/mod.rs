//! Submission assembly: drains a multipart stream into one `NewSubmission`.

pub mod classifier;

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::Multipart;
use intake_core::models::{ApplicantProfile, DocumentBuckets, NewSubmission, Provenance};
use intake_core::AppError;
use intake_storage::DocumentSink;

use classifier::{classify, PartRoute};

/// Folds classified multipart parts into a submission record.
pub struct IntakeService {
    sink: Arc<dyn DocumentSink>,
    max_file_size: usize,
}

impl IntakeService {
    pub fn new(sink: Arc<dyn DocumentSink>, max_file_size: usize) -> Self {
        Self {
            sink,
            max_file_size,
        }
    }

    /// Drain the whole multipart stream and build the submission.
    ///
    /// Parts are handled strictly in arrival order, and every part is fully
    /// drained before the next one is requested; this function never returns
    /// a record for a still-uploading request. Unrecognized parts are
    /// dropped, not errors. A stream error, an oversized file, or a sink
    /// write failure abandons the whole request.
    pub async fn assemble(
        &self,
        mut multipart: Multipart,
        provenance: Provenance,
    ) -> Result<NewSubmission, AppError> {
        let mut fields: HashMap<String, String> = HashMap::new();
        let mut documents = DocumentBuckets::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::Multipart(format!("Failed to read multipart part: {}", e)))?
        {
            let field_name = field.name().unwrap_or_default().to_string();
            let is_file = field.file_name().is_some();

            match classify(&field_name, is_file) {
                PartRoute::Document(category) => {
                    let original_filename =
                        field.file_name().unwrap_or("upload").to_string();
                    let content_type = field
                        .content_type()
                        .unwrap_or("application/octet-stream")
                        .to_string();

                    // Full drain before anything else: the recorded size and
                    // the sink write both need the complete byte stream.
                    let data = field.bytes().await.map_err(|e| {
                        AppError::Multipart(format!(
                            "Failed to read file data for '{}': {}",
                            field_name, e
                        ))
                    })?;

                    if data.len() > self.max_file_size {
                        return Err(AppError::PayloadTooLarge(format!(
                            "File '{}' exceeds the maximum of {} MB",
                            original_filename,
                            self.max_file_size / 1024 / 1024
                        )));
                    }

                    let record = self
                        .sink
                        .store(category, &original_filename, &content_type, data)
                        .await
                        .map_err(|e| AppError::Storage(e.to_string()))?;

                    documents.push(category, record);
                }
                PartRoute::Scalar => {
                    let value = field.text().await.map_err(|e| {
                        AppError::Multipart(format!(
                            "Failed to read field '{}': {}",
                            field_name, e
                        ))
                    })?;
                    // Last writer wins on repeated field names.
                    fields.insert(field_name, value);
                }
                PartRoute::Ignored => {
                    // Still drain the bytes so the parser can move on.
                    field.bytes().await.map_err(|e| {
                        AppError::Multipart(format!("Failed to drain ignored part: {}", e))
                    })?;
                }
            }
        }

        Ok(NewSubmission {
            profile: ApplicantProfile::from_fields(&fields),
            documents,
            provenance,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::extract::{FromRequest, Request};
    use intake_core::models::DocumentCategory;
    use intake_storage::MetadataSink;

    const BOUNDARY: &str = "intake-test-boundary";
    const MAX_FILE_SIZE: usize = 1024;

    enum Part<'a> {
        Text(&'a str, &'a str),
        File(&'a str, &'a str, &'a [u8]),
    }

    fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
        let mut body = Vec::new();
        for part in parts {
            body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
            match part {
                Part::Text(name, value) => {
                    body.extend_from_slice(
                        format!(
                            "Content-Disposition: form-data; name=\"{}\"\r\n\r\n",
                            name
                        )
                        .as_bytes(),
                    );
                    body.extend_from_slice(value.as_bytes());
                }
                Part::File(name, filename, data) => {
                    body.extend_from_slice(
                        format!(
                            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n\
                             Content-Type: application/pdf\r\n\r\n",
                            name, filename
                        )
                        .as_bytes(),
                    );
                    body.extend_from_slice(data);
                }
            }
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
        body
    }

    async fn multipart_from(parts: &[Part<'_>]) -> Multipart {
        let request = Request::builder()
            .header(
                "content-type",
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(multipart_body(parts)))
            .expect("request");
        Multipart::from_request(request, &()).await.expect("multipart")
    }

    fn provenance() -> Provenance {
        Provenance {
            client_ip: "203.0.113.7".to_string(),
            user_agent: "test-agent".to_string(),
        }
    }

    fn service() -> IntakeService {
        IntakeService::new(Arc::new(MetadataSink::new()), MAX_FILE_SIZE)
    }

    #[tokio::test]
    async fn routes_files_into_their_categories() {
        let multipart = multipart_from(&[
            Part::Text("firstName", "Anna"),
            Part::Text("lastName", "Keller"),
            Part::File("identityDocument", "passport.pdf", b"%PDF passport"),
            Part::File("qualifications", "diploma.pdf", b"%PDF diploma"),
            Part::File("qualifications", "certificate.pdf", b"%PDF certificate"),
        ])
        .await;

        let submission = service()
            .assemble(multipart, provenance())
            .await
            .expect("assemble");

        assert_eq!(submission.profile.first_name.as_deref(), Some("Anna"));
        assert_eq!(
            submission
                .documents
                .get(DocumentCategory::IdentityDocument)
                .len(),
            1
        );
        let qualifications = submission.documents.get(DocumentCategory::Qualifications);
        assert_eq!(qualifications.len(), 2);
        assert_eq!(qualifications[0].original_filename, "diploma.pdf");
        assert_eq!(qualifications[1].original_filename, "certificate.pdf");
        assert_eq!(qualifications[0].size_bytes, b"%PDF diploma".len() as i64);
    }

    #[tokio::test]
    async fn unrecognized_parts_are_dropped_without_failing() {
        let multipart = multipart_from(&[
            Part::Text("email", "a@x.com"),
            Part::File("profilePicture", "me.png", b"png bytes"),
            Part::Text("somethingExtra", "ignored but harmless"),
        ])
        .await;

        let submission = service()
            .assemble(multipart, provenance())
            .await
            .expect("assemble");

        assert_eq!(submission.profile.email.as_deref(), Some("a@x.com"));
        assert_eq!(submission.documents.total_files(), 0);
    }

    #[tokio::test]
    async fn zero_files_still_yields_all_six_buckets() {
        let multipart = multipart_from(&[Part::Text("firstName", "Anna")]).await;

        let submission = service()
            .assemble(multipart, provenance())
            .await
            .expect("assemble");

        for category in DocumentCategory::ALL {
            assert!(submission.documents.get(category).is_empty());
        }
    }

    #[tokio::test]
    async fn repeated_scalar_fields_keep_the_last_value() {
        let multipart = multipart_from(&[
            Part::Text("city", "Hamburg"),
            Part::Text("city", "Bremen"),
        ])
        .await;

        let submission = service()
            .assemble(multipart, provenance())
            .await
            .expect("assemble");

        assert_eq!(submission.profile.city.as_deref(), Some("Bremen"));
    }

    #[tokio::test]
    async fn oversized_file_fails_the_request() {
        let big = vec![0u8; MAX_FILE_SIZE + 1];
        let multipart =
            multipart_from(&[Part::File("identityDocument", "huge.pdf", &big)]).await;

        let err = service()
            .assemble(multipart, provenance())
            .await
            .expect_err("oversized upload must fail");

        assert!(matches!(err, AppError::PayloadTooLarge(_)));
    }

    #[tokio::test]
    async fn provenance_is_carried_through() {
        let multipart = multipart_from(&[]).await;
        let submission = service()
            .assemble(multipart, provenance())
            .await
            .expect("assemble");
        assert_eq!(submission.provenance.client_ip, "203.0.113.7");
        assert_eq!(submission.provenance.user_agent, "test-agent");
    }
}
