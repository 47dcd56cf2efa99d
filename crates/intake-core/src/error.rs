//! Error types module
//!
//! Core error taxonomy for the intake service. All failures funnel into
//! `AppError`; the HTTP layer decides how each variant renders.
//!
//! The `Database` variant and `From<sqlx::Error>` are gated behind the `sqlx`
//! feature so leaf crates can depend on core without pulling in the driver.

use std::io;

#[cfg(feature = "sqlx")]
use sqlx::Error as SqlxError;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Expected client-side problems (malformed uploads, oversize files)
    Warn,
    /// Unexpected failures (database, storage)
    Error,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[cfg(feature = "sqlx")]
    #[error("Database error: {0}")]
    Database(#[source] SqlxError),

    #[cfg(not(feature = "sqlx"))]
    #[error("Database error: {0}")]
    Database(String),

    #[error("Uniqueness conflict: {0}")]
    Conflict(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Multipart error: {0}")]
    Multipart(String),

    #[error("File too large: {0}")]
    PayloadTooLarge(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Severity used when the HTTP boundary logs this error.
    pub fn log_level(&self) -> LogLevel {
        match self {
            AppError::Multipart(_) | AppError::PayloadTooLarge(_) | AppError::NotFound(_) => {
                LogLevel::Warn
            }
            _ => LogLevel::Error,
        }
    }

    /// Short machine-readable tag for log lines.
    pub fn error_type(&self) -> &'static str {
        match self {
            AppError::Database(_) => "database",
            AppError::Conflict(_) => "conflict",
            AppError::Storage(_) => "storage",
            AppError::Multipart(_) => "multipart",
            AppError::PayloadTooLarge(_) => "payload_too_large",
            AppError::NotFound(_) => "not_found",
            AppError::Internal(_) => "internal",
        }
    }
}

#[cfg(feature = "sqlx")]
impl From<SqlxError> for AppError {
    fn from(err: SqlxError) -> Self {
        AppError::Database(err)
    }
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        AppError::Internal(format!("IO error: {}", err))
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_side_errors_log_as_warnings() {
        assert_eq!(
            AppError::Multipart("boundary missing".to_string()).log_level(),
            LogLevel::Warn
        );
        assert_eq!(
            AppError::PayloadTooLarge("25 MiB".to_string()).log_level(),
            LogLevel::Warn
        );
    }

    #[test]
    fn server_side_errors_log_as_errors() {
        assert_eq!(
            AppError::Storage("disk full".to_string()).log_level(),
            LogLevel::Error
        );
        assert_eq!(
            AppError::Conflict("email".to_string()).log_level(),
            LogLevel::Error
        );
    }

    #[test]
    fn io_errors_convert_to_internal() {
        let err: AppError = io::Error::other("boom").into();
        match err {
            AppError::Internal(msg) => assert!(msg.contains("boom")),
            _ => panic!("Expected Internal variant"),
        }
    }
}
