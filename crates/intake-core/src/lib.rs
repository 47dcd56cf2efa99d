//! Core types for the intake service.
//!
//! This crate holds the configuration, error types, and domain models shared
//! by the storage, database, and API crates. It deliberately contains no I/O
//! beyond reading the environment at startup.

pub mod config;
pub mod error;
pub mod models;
pub mod storage_types;

pub use config::Config;
pub use error::AppError;
pub use storage_types::SinkBackend;
