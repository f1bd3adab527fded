use std::fmt;
use thiserror::Error;

/// Failures of the local durable layer.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("failed to encode tags for entry {id}: {source}")]
    Tags {
        id: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures of the remote gateway.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The gateway has no usable connection handle. No request was made.
    #[error("cloud connection is not configured: {0}")]
    Configuration(String),

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("failed to encode row {id}: {source}")]
    Encode {
        id: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("remote rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },
}

/// The network exchange a sync failure happened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStep {
    Fetch,
    Delete,
    Upload,
}

impl fmt::Display for SyncStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncStep::Fetch => write!(f, "fetch"),
            SyncStep::Delete => write!(f, "delete"),
            SyncStep::Upload => write!(f, "upload"),
        }
    }
}

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("cloud connection is not configured: {0}")]
    Configuration(String),

    #[error("remote {step} failed: {source}")]
    Remote {
        step: SyncStep,
        #[source]
        source: GatewayError,
    },

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("another sync is already in progress")]
    InProgress,
}

impl SyncError {
    pub(crate) fn remote(step: SyncStep, source: GatewayError) -> Self {
        match source {
            GatewayError::Configuration(reason) => SyncError::Configuration(reason),
            source => SyncError::Remote { step, source },
        }
    }

    /// The step that failed, if the failure came from the remote store.
    pub fn step(&self) -> Option<SyncStep> {
        match self {
            SyncError::Remote { step, .. } => Some(*step),
            _ => None,
        }
    }
}

/// Failures of the catalog editing path.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("invalid entry: {0}")]
    Validation(String),

    #[error("entry not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configuration_failures_are_not_wrapped_as_remote_failures() {
        let err = SyncError::remote(SyncStep::Fetch, GatewayError::Configuration("no url".into()));
        assert!(matches!(err, SyncError::Configuration(_)));
        assert_eq!(err.step(), None);

        let err = SyncError::remote(
            SyncStep::Delete,
            GatewayError::Rejected {
                status: 500,
                message: "boom".into(),
            },
        );
        assert_eq!(err.step(), Some(SyncStep::Delete));
        assert_eq!(
            err.to_string(),
            "remote delete failed: remote rejected the request (500): boom"
        );
    }

    #[test]
    fn encoding_failures_stay_on_their_step() {
        let source = serde_json::from_str::<u8>("not a number").unwrap_err();
        let err = SyncError::remote(
            SyncStep::Upload,
            GatewayError::Encode {
                id: "a1".into(),
                source,
            },
        );
        assert!(matches!(err, SyncError::Remote { step: SyncStep::Upload, .. }));
        assert!(err.to_string().starts_with("remote upload failed: failed to encode row a1"));
    }
}
