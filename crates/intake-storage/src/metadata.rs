use async_trait::async_trait;
use bytes::Bytes;
use intake_core::models::{DocumentCategory, FileRecord};
use intake_core::SinkBackend;

use crate::traits::{DocumentSink, SinkResult};

/// Metadata-only sink: retains nothing, records what was uploaded.
///
/// Used by deployments that keep the document bytes out of this system
/// entirely. The byte buffer is already fully drained by the caller, so the
/// recorded size is still accurate.
#[derive(Clone, Default)]
pub struct MetadataSink;

impl MetadataSink {
    pub fn new() -> Self {
        MetadataSink
    }
}

#[async_trait]
impl DocumentSink for MetadataSink {
    async fn store(
        &self,
        category: DocumentCategory,
        original_filename: &str,
        content_type: &str,
        data: Bytes,
    ) -> SinkResult<FileRecord> {
        tracing::debug!(
            category = category.field_name(),
            original_filename,
            size_bytes = data.len(),
            "Recorded document metadata, bytes discarded"
        );

        Ok(FileRecord {
            original_filename: original_filename.to_string(),
            content_type: content_type.to_string(),
            size_bytes: data.len() as i64,
            storage_path: None,
            stored_filename: None,
        })
    }

    fn backend_type(&self) -> SinkBackend {
        SinkBackend::Metadata
    }
}
