use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::category::DocumentCategory;
use super::file_record::FileRecord;

/// Scalar profile fields of a registration form.
///
/// Every field is optional: the form may omit any of them and the record is
/// still accepted. Field names mirror the camelCase names clients submit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicantProfile {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub street: Option<String>,
    pub postal_code: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub tax_number: Option<String>,
    pub vat_id: Option<String>,
    pub iban: Option<String>,
    pub bic: Option<String>,
    pub hourly_rate: Option<f64>,
    pub travel_rate: Option<f64>,
}

impl ApplicantProfile {
    /// Build a profile from the accumulated scalar form fields.
    ///
    /// Unknown keys are dropped, matching the classifier's policy for
    /// unrecognized file fields. Rate fields are parsed leniently; values
    /// that are not numbers end up as `None`.
    pub fn from_fields(fields: &HashMap<String, String>) -> Self {
        let text = |key: &str| fields.get(key).map(|v| v.trim().to_string());
        ApplicantProfile {
            first_name: text("firstName"),
            last_name: text("lastName"),
            email: text("email"),
            phone: text("phone"),
            street: text("street"),
            postal_code: text("postalCode"),
            city: text("city"),
            country: text("country"),
            tax_number: text("taxNumber"),
            vat_id: text("vatId"),
            iban: text("iban"),
            bic: text("bic"),
            hourly_rate: fields.get("hourlyRate").and_then(|v| parse_rate(v)),
            travel_rate: fields.get("travelRate").and_then(|v| parse_rate(v)),
        }
    }
}

/// Parse a rate entered as form text. Accepts a comma decimal separator.
fn parse_rate(value: &str) -> Option<f64> {
    value.trim().replace(',', ".").parse().ok()
}

/// The six per-category file lists of a submission.
///
/// All six buckets are always present, possibly empty; serialization never
/// omits a key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentBuckets {
    pub identity_document: Vec<FileRecord>,
    pub residency_proof: Vec<FileRecord>,
    pub qualifications: Vec<FileRecord>,
    pub business_permit: Vec<FileRecord>,
    pub liability_insurance: Vec<FileRecord>,
    pub company_statutes: Vec<FileRecord>,
}

impl DocumentBuckets {
    pub fn push(&mut self, category: DocumentCategory, record: FileRecord) {
        self.bucket_mut(category).push(record);
    }

    pub fn get(&self, category: DocumentCategory) -> &[FileRecord] {
        match category {
            DocumentCategory::IdentityDocument => &self.identity_document,
            DocumentCategory::ResidencyProof => &self.residency_proof,
            DocumentCategory::Qualifications => &self.qualifications,
            DocumentCategory::BusinessPermit => &self.business_permit,
            DocumentCategory::LiabilityInsurance => &self.liability_insurance,
            DocumentCategory::CompanyStatutes => &self.company_statutes,
        }
    }

    fn bucket_mut(&mut self, category: DocumentCategory) -> &mut Vec<FileRecord> {
        match category {
            DocumentCategory::IdentityDocument => &mut self.identity_document,
            DocumentCategory::ResidencyProof => &mut self.residency_proof,
            DocumentCategory::Qualifications => &mut self.qualifications,
            DocumentCategory::BusinessPermit => &mut self.business_permit,
            DocumentCategory::LiabilityInsurance => &mut self.liability_insurance,
            DocumentCategory::CompanyStatutes => &mut self.company_statutes,
        }
    }

    pub fn total_files(&self) -> usize {
        DocumentCategory::ALL
            .into_iter()
            .map(|category| self.get(category).len())
            .sum()
    }
}

/// Request provenance captured alongside a submission.
#[derive(Debug, Clone, PartialEq)]
pub struct Provenance {
    pub client_ip: String,
    pub user_agent: String,
}

/// A fully assembled submission, ready to be persisted.
#[derive(Debug, Clone)]
pub struct NewSubmission {
    pub profile: ApplicantProfile,
    pub documents: DocumentBuckets,
    pub provenance: Provenance,
}

/// A persisted submission as read back from the store.
#[derive(Debug, Clone)]
pub struct Submission {
    pub id: Uuid,
    pub profile: ApplicantProfile,
    pub documents: DocumentBuckets,
    pub provenance: Provenance,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Listing projection of a submission.
///
/// Provenance (client IP, user agent) is deliberately not part of this type,
/// so it can never leak into API responses.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionResponse {
    pub id: Uuid,
    #[serde(flatten)]
    pub profile: ApplicantProfile,
    #[serde(flatten)]
    pub documents: DocumentBuckets,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Submission> for SubmissionResponse {
    fn from(submission: Submission) -> Self {
        SubmissionResponse {
            id: submission.id,
            profile: submission.profile,
            documents: submission.documents,
            created_at: submission.created_at,
            updated_at: submission.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn sample_record(name: &str) -> FileRecord {
        FileRecord {
            original_filename: name.to_string(),
            content_type: "application/pdf".to_string(),
            size_bytes: 42,
            storage_path: None,
            stored_filename: None,
        }
    }

    #[test]
    fn profile_from_fields_maps_known_keys_and_drops_unknown() {
        let profile = ApplicantProfile::from_fields(&fields(&[
            ("firstName", "Anna"),
            ("lastName", "Keller"),
            ("email", "a@x.com"),
            ("favouriteColor", "green"),
        ]));
        assert_eq!(profile.first_name.as_deref(), Some("Anna"));
        assert_eq!(profile.email.as_deref(), Some("a@x.com"));
        assert_eq!(profile.phone, None);
    }

    #[test]
    fn rate_fields_parse_leniently() {
        let profile = ApplicantProfile::from_fields(&fields(&[
            ("hourlyRate", "85,50"),
            ("travelRate", "not a number"),
        ]));
        assert_eq!(profile.hourly_rate, Some(85.5));
        assert_eq!(profile.travel_rate, None);
    }

    #[test]
    fn buckets_default_to_six_empty_lists() {
        let buckets = DocumentBuckets::default();
        for category in DocumentCategory::ALL {
            assert!(buckets.get(category).is_empty());
        }
        let json = serde_json::to_value(&buckets).expect("serialize");
        for category in DocumentCategory::ALL {
            assert_eq!(json[category.field_name()], serde_json::json!([]));
        }
    }

    #[test]
    fn buckets_preserve_arrival_order() {
        let mut buckets = DocumentBuckets::default();
        buckets.push(DocumentCategory::Qualifications, sample_record("a.pdf"));
        buckets.push(DocumentCategory::Qualifications, sample_record("b.pdf"));
        let stored = buckets.get(DocumentCategory::Qualifications);
        assert_eq!(stored[0].original_filename, "a.pdf");
        assert_eq!(stored[1].original_filename, "b.pdf");
        assert_eq!(buckets.total_files(), 2);
    }

    #[test]
    fn response_projection_excludes_provenance() {
        let submission = Submission {
            id: Uuid::new_v4(),
            profile: ApplicantProfile {
                first_name: Some("Anna".to_string()),
                ..Default::default()
            },
            documents: DocumentBuckets::default(),
            provenance: Provenance {
                client_ip: "203.0.113.7".to_string(),
                user_agent: "curl/8.0".to_string(),
            },
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_value(SubmissionResponse::from(submission)).expect("serialize");
        assert_eq!(json["firstName"], "Anna");
        assert_eq!(json["identityDocument"], serde_json::json!([]));
        assert!(json.get("clientIp").is_none());
        assert!(json.get("userAgent").is_none());
    }
}
