//! # CardioRisk
//!
//! Terminal form for heart disease risk prediction with a pre-trained classifier.
//!
//! Seven clinical measurements are collected from the form, padded with six
//! fixed reference values into a thirteen-column record ordered by the
//! feature schema artifact, and scored by the model artifact.
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture:
//! - `domain`: Core types (clinical inputs, feature schema/record, verdict)
//! - `ports`: Trait definitions for external operations (`Classifier`)
//! - `adapters`: Concrete implementations (JSON logistic model, artifact loading, log sanitizing)
//! - `application`: Use cases orchestrating domain and ports
//! - `config`: Environment configuration
//! - `tui`: Terminal user interface

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod tui;

pub use domain::{ClinicalInputs, FeatureRecord, Prediction, Verdict};

/// Result type for CardioRisk operations
pub type Result<T> = std::result::Result<T, CardioRiskError>;

/// Main error type for CardioRisk
#[derive(Debug, thiserror::Error)]
pub enum CardioRiskError {
    #[error("Model operation failed: {0}")]
    Model(#[from] domain::ModelError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
