use serde::{Deserialize, Serialize};

/// Metadata for one uploaded file, as stored inside a submission's
/// category buckets and returned by the listing endpoint.
///
/// `storage_path` and `stored_filename` are populated only when the deployed
/// sink persists bytes; the metadata-only sink leaves them absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    pub original_filename: String,
    pub content_type: String,
    /// Byte count of the fully drained upload stream.
    pub size_bytes: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stored_filename: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_camel_case_without_absent_placement() {
        let record = FileRecord {
            original_filename: "passport.pdf".to_string(),
            content_type: "application/pdf".to_string(),
            size_bytes: 1234,
            storage_path: None,
            stored_filename: None,
        };
        let json = serde_json::to_value(&record).expect("serialize");
        assert_eq!(json["originalFilename"], "passport.pdf");
        assert_eq!(json["sizeBytes"], 1234);
        assert!(json.get("storagePath").is_none());
        assert!(json.get("storedFilename").is_none());
    }

    #[test]
    fn deserializes_persisted_record() {
        let json = r#"{
            "originalFilename": "permit.pdf",
            "contentType": "application/pdf",
            "sizeBytes": 99,
            "storagePath": "uploads/1722470400000-0-permit.pdf",
            "storedFilename": "1722470400000-0-permit.pdf"
        }"#;
        let record: FileRecord = serde_json::from_str(json).expect("deserialize");
        assert_eq!(record.size_bytes, 99);
        assert!(record.storage_path.is_some());
    }
}
