//! Domain layer: Core business types and logic.
//!
//! Pure types with no I/O: clinical inputs, the feature schema and record,
//! and the prediction result.

mod diagnosis;
mod error;
mod patient;
mod record;

pub use diagnosis::{ClassLabels, Prediction, Verdict};
pub use error::ModelError;
pub use patient::{
    ChestPainType, ClinicalInputs, FixedDefaults, AGE_RANGE, CHOLESTEROL_RANGE,
    MAX_HEART_RATE_RANGE, ORDINAL_RANGE, ST_DEPRESSION_TENTHS_RANGE,
};
pub use record::{FeatureField, FeatureRecord, FeatureSchema, FEATURE_COUNT};
