//! Sink abstraction trait.

use async_trait::async_trait;
use bytes::Bytes;
use intake_core::models::{DocumentCategory, FileRecord};
use intake_core::SinkBackend;
use thiserror::Error;

/// Sink operation errors
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Write failed: {0}")]
    WriteFailed(String),

    #[error("Invalid filename: {0}")]
    InvalidFilename(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for sink operations
pub type SinkResult<T> = Result<T, SinkError>;

/// Destination for one classified file part.
///
/// Callers hand over the *fully drained* byte buffer of a multipart part;
/// the recorded size is therefore always the post-drain byte count, never a
/// mid-stream snapshot. Implementations must not return before the bytes
/// they intend to retain are durably written.
#[async_trait]
pub trait DocumentSink: Send + Sync {
    /// Consume one file's bytes and return its record for the submission.
    async fn store(
        &self,
        category: DocumentCategory,
        original_filename: &str,
        content_type: &str,
        data: Bytes,
    ) -> SinkResult<FileRecord>;

    /// The backend type this sink was deployed with.
    fn backend_type(&self) -> SinkBackend;
}
