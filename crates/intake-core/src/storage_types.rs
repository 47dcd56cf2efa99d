use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// Document sink backend types.
///
/// Defined in core because both configuration and the storage crate need it.
/// `Disk` persists uploaded bytes under the configured uploads directory;
/// `Metadata` drains and discards bytes, recording descriptive metadata only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SinkBackend {
    Disk,
    Metadata,
}

impl FromStr for SinkBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "disk" | "local" => Ok(SinkBackend::Disk),
            "metadata" => Ok(SinkBackend::Metadata),
            _ => Err(anyhow::anyhow!("Invalid storage backend: {}", s)),
        }
    }
}

impl Display for SinkBackend {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            SinkBackend::Disk => write!(f, "disk"),
            SinkBackend::Metadata => write!(f, "metadata"),
        }
    }
}
