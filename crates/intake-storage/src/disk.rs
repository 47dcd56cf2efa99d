use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use bytes::Bytes;
use intake_core::models::{DocumentCategory, FileRecord};
use intake_core::SinkBackend;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::traits::{DocumentSink, SinkError, SinkResult};

/// Process-wide sequence that keeps same-millisecond writes apart.
static FILE_SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Persisting sink: writes uploaded bytes to the local uploads directory.
#[derive(Clone)]
pub struct DiskSink {
    base_path: PathBuf,
}

impl DiskSink {
    /// Create a new DiskSink rooted at `base_path`.
    ///
    /// The directory is created here, once, so request handling never has to
    /// probe for it.
    pub async fn new(base_path: impl Into<PathBuf>) -> SinkResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            SinkError::ConfigError(format!(
                "Failed to create uploads directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(DiskSink { base_path })
    }

    /// Generate the stored filename: submission time plus the sanitized
    /// original name, with a sequence number so concurrent writes of the
    /// same name in the same millisecond stay distinct.
    fn stored_filename(original_filename: &str) -> String {
        let millis = chrono::Utc::now().timestamp_millis();
        let sequence = FILE_SEQUENCE.fetch_add(1, Ordering::Relaxed);
        format!(
            "{}-{}-{}",
            millis,
            sequence,
            sanitize_filename(original_filename)
        )
    }
}

/// Reduce a client-supplied filename to its final path component and strip
/// characters that have no business in a filesystem name.
fn sanitize_filename(original: &str) -> String {
    let name = Path::new(original)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("upload");

    let sanitized: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();

    if sanitized.trim_matches(|c| c == '.' || c == '_').is_empty() {
        "upload".to_string()
    } else {
        sanitized
    }
}

#[async_trait]
impl DocumentSink for DiskSink {
    async fn store(
        &self,
        category: DocumentCategory,
        original_filename: &str,
        content_type: &str,
        data: Bytes,
    ) -> SinkResult<FileRecord> {
        let stored_filename = Self::stored_filename(original_filename);
        let path = self.base_path.join(&stored_filename);
        let size = data.len();

        let start = std::time::Instant::now();

        let mut file = fs::File::create(&path).await.map_err(|e| {
            SinkError::WriteFailed(format!("Failed to create file {}: {}", path.display(), e))
        })?;

        file.write_all(&data).await.map_err(|e| {
            SinkError::WriteFailed(format!("Failed to write file {}: {}", path.display(), e))
        })?;

        file.sync_all().await.map_err(|e| {
            SinkError::WriteFailed(format!("Failed to sync file {}: {}", path.display(), e))
        })?;

        tracing::info!(
            category = category.field_name(),
            path = %path.display(),
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Stored uploaded document"
        );

        Ok(FileRecord {
            original_filename: original_filename.to_string(),
            content_type: content_type.to_string(),
            size_bytes: size as i64,
            storage_path: Some(path.display().to_string()),
            stored_filename: Some(stored_filename),
        })
    }

    fn backend_type(&self) -> SinkBackend {
        SinkBackend::Disk
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn stores_bytes_and_records_placement() {
        let dir = tempfile::tempdir().expect("tempdir");
        let sink = DiskSink::new(dir.path()).await.expect("sink");

        let record = sink
            .store(
                DocumentCategory::IdentityDocument,
                "passport.pdf",
                "application/pdf",
                Bytes::from_static(b"%PDF-1.4 test"),
            )
            .await
            .expect("store");

        assert_eq!(record.size_bytes, 13);
        assert_eq!(record.original_filename, "passport.pdf");
        let stored = record.stored_filename.expect("stored filename");
        assert!(stored.ends_with("-passport.pdf"));

        let on_disk = std::fs::read(dir.path().join(&stored)).expect("read back");
        assert_eq!(on_disk, b"%PDF-1.4 test");
    }

    #[tokio::test]
    async fn repeated_uploads_of_same_name_get_distinct_filenames() {
        let dir = tempfile::tempdir().expect("tempdir");
        let sink = DiskSink::new(dir.path()).await.expect("sink");

        let first = sink
            .store(
                DocumentCategory::Qualifications,
                "diploma.pdf",
                "application/pdf",
                Bytes::from_static(b"a"),
            )
            .await
            .expect("store");
        let second = sink
            .store(
                DocumentCategory::Qualifications,
                "diploma.pdf",
                "application/pdf",
                Bytes::from_static(b"b"),
            )
            .await
            .expect("store");

        assert_ne!(first.stored_filename, second.stored_filename);
    }

    #[test]
    fn sanitize_strips_path_components_and_odd_characters() {
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("über rechnung.pdf"), "_ber_rechnung.pdf");
        assert_eq!(sanitize_filename(""), "upload");
        assert_eq!(sanitize_filename("..."), "upload");
    }
}
