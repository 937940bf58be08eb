// Error types for the aggregation pipeline
//
// None of these cross a component boundary as a panic: connector errors
// become empty contributions, store errors become `success: false` responses.

use std::path::PathBuf;
use std::time::Duration;

use crate::record::Source;

/// A registry name that does not match any known source
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown registry: {0}")]
pub struct UnknownSource(pub String);

/// Failures raised while querying one registry
#[derive(Debug, thiserror::Error)]
pub enum ConnectorError {
    #[error("{registry} search failed: {reason}")]
    SearchFailed { registry: Source, reason: String },

    #[error("{registry} did not answer within {timeout:?}")]
    TimedOut { registry: Source, timeout: Duration },
}

/// Failures of the unified store's backing container
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to access store container {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("store container {} is not valid JSON: {source}", .path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize store contents: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("store is unavailable: {reason}")]
    Unavailable { reason: String },
}
