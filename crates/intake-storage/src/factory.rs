//! Sink factory: builds the deployed sink strategy from configuration.

use std::sync::Arc;

use intake_core::{Config, SinkBackend};

use crate::disk::DiskSink;
use crate::metadata::MetadataSink;
use crate::traits::{DocumentSink, SinkResult};

/// Create the document sink selected by `STORAGE_BACKEND`.
pub async fn create_sink(config: &Config) -> SinkResult<Arc<dyn DocumentSink>> {
    match config.storage_backend {
        SinkBackend::Disk => {
            let sink = DiskSink::new(config.local_storage_path.clone()).await?;
            tracing::info!(
                path = %config.local_storage_path,
                "Disk document sink initialized"
            );
            Ok(Arc::new(sink))
        }
        SinkBackend::Metadata => {
            tracing::info!("Metadata-only document sink initialized");
            Ok(Arc::new(MetadataSink::new()))
        }
    }
}
