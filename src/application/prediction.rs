//! Prediction service: Assembles the feature record and runs the classifier.
//!
//! This service coordinates:
//! - Record assembly (form inputs + fixed defaults, in schema order)
//! - Label and probability inference on the single record
//! - Label -> `Verdict` conversion at the classifier boundary

use std::sync::Arc;

use crate::domain::{
    ClinicalInputs, FeatureRecord, FeatureSchema, FixedDefaults, ModelError, Prediction,
};
use crate::ports::Classifier;
use crate::CardioRiskError;

/// Service for running one-shot risk predictions.
///
/// Holds read-only handles loaded once at startup; nothing here mutates after
/// construction.
pub struct PredictionService<C>
where
    C: Classifier,
{
    classifier: Arc<C>,
    schema: Arc<FeatureSchema>,
    defaults: FixedDefaults,
}

impl<C> PredictionService<C>
where
    C: Classifier,
{
    /// Create a new prediction service.
    ///
    /// # Errors
    /// Returns `SchemaMismatch` if the schema order differs from the order the
    /// classifier was trained on.
    pub fn new(classifier: Arc<C>, schema: Arc<FeatureSchema>) -> Result<Self, CardioRiskError> {
        let trained = FeatureSchema::from_names(classifier.feature_names())?;
        if trained.fields() != schema.fields() {
            return Err(ModelError::SchemaMismatch(format!(
                "schema order {:?} differs from model training order {:?}",
                schema.names(),
                classifier.feature_names()
            ))
            .into());
        }

        Ok(Self {
            classifier,
            schema,
            defaults: FixedDefaults::REFERENCE,
        })
    }

    #[must_use]
    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    /// Label the classifier uses for the positive class.
    #[must_use]
    pub fn positive_label(&self) -> &str {
        self.classifier.classes().positive()
    }

    /// Build the single-row record for the current inputs.
    ///
    /// Inputs are clamped to the form's control ranges first, so values built
    /// outside the form cannot reach the classifier out of range.
    #[must_use]
    pub fn build_record(&self, inputs: &ClinicalInputs) -> FeatureRecord {
        self.schema.assemble(&inputs.clamped(), &self.defaults)
    }

    /// Run the classifier on the current inputs.
    ///
    /// # Errors
    /// Returns error if the classifier fails or emits an unknown label.
    pub fn predict(&self, inputs: &ClinicalInputs) -> Result<Prediction, CardioRiskError> {
        let record = self.build_record(inputs);

        tracing::debug!("Scoring record with {} columns", record.len());
        let classes = self.classifier.classes();
        let label = self.classifier.predict(&record)?;
        let positive = classes.positive_probability(self.classifier.predict_proba(&record)?);
        let verdict = classes.verdict_for(&label)?;

        let prediction = Prediction::new(verdict, label, positive);
        tracing::info!(
            "Prediction complete: verdict={}, probability={}",
            prediction.verdict,
            prediction.probability_text()
        );

        Ok(prediction)
    }
}
