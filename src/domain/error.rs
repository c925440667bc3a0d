//! Errors raised while loading artifacts or running the classifier.

use std::path::PathBuf;

/// Error type for model and schema operations.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("Failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid model artifact: {0}")]
    InvalidArtifact(String),

    #[error("Feature schema mismatch: {0}")]
    SchemaMismatch(String),

    #[error("Classifier returned unknown label {label:?} (expected one of {expected:?})")]
    UnknownLabel { label: String, expected: [String; 2] },

    #[error("Artifact integrity check failed: {0}")]
    Integrity(String),

    #[error("Feature count mismatch: got {got}, expected {expected}")]
    FeatureCount { got: usize, expected: usize },
}
