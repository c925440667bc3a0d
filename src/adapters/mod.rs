//! Adapters layer: Concrete implementations of ports.
//!
//! - `logistic`: JSON logistic-regression classifier
//! - `artifacts`: schema loading and manifest verification
//! - `sanitize`: clinical-value filtering for logs

pub mod artifacts;
pub mod logistic;
pub mod sanitize;

pub use artifacts::{load_artifacts, ArtifactPaths};
pub use logistic::LogisticClassifier;
