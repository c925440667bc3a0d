//! Classifier port: Trait for a pre-trained binary classifier.
//!
//! This trait abstracts the model artifact format from the application logic.

use crate::domain::{ClassLabels, FeatureRecord, ModelError};

/// Trait for a loaded, read-only binary classifier.
///
/// Implementations score exactly one feature record per call.
pub trait Classifier: Send + Sync {
    /// The two labels this classifier can emit.
    fn classes(&self) -> &ClassLabels;

    /// Feature names in the order the classifier was trained on.
    fn feature_names(&self) -> &[String];

    /// Predict the class label for a single record.
    ///
    /// # Errors
    /// Returns `ModelError::FeatureCount` or `ModelError::SchemaMismatch` if
    /// the record does not match the training columns.
    fn predict(&self, record: &FeatureRecord) -> Result<String, ModelError>;

    /// Class probabilities for a single record, in the model's class order.
    ///
    /// [`ClassLabels::positive_probability`] picks the positive column.
    ///
    /// # Errors
    /// Same conditions as [`Classifier::predict`].
    fn predict_proba(&self, record: &FeatureRecord) -> Result<[f64; 2], ModelError>;
}
