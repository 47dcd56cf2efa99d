//! Document sink for the intake service.
//!
//! This crate provides the `DocumentSink` abstraction and its two deployment
//! strategies: `DiskSink` persists uploaded bytes under the configured
//! uploads directory, `MetadataSink` drains bytes and records descriptive
//! metadata only. The strategy is fixed at startup by configuration, never
//! chosen per request.
//!
//! # Stored filename format
//!
//! Disk placement uses `{unix_millis}-{sequence}-{sanitized original name}`,
//! generated in the `disk` module. Concurrent writes therefore never share a
//! filename even when clients upload identically named files.

pub mod disk;
pub mod factory;
pub mod metadata;
pub mod traits;

pub use disk::DiskSink;
pub use factory::create_sink;
pub use intake_core::SinkBackend;
pub use metadata::MetadataSink;
pub use traits::{DocumentSink, SinkError, SinkResult};
