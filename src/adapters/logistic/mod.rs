//! Logistic regression adapter: Implementation of `Classifier` over a JSON artifact.
//!
//! The training pipeline exports a standard-scaled logistic regression:
//!
//! ```text
//! z = intercept + sum(coef_i * (x_i - mean_i) / scale_i)
//! p = sigmoid(z)
//! ```
//!
//! `predict_proba` returns `[1 - p, p]` and `predict` returns the positive
//! class only when `p > 0.5` (argmax, ties go to the first class).

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::{ClassLabels, FeatureRecord, FeatureSchema, ModelError};
use crate::ports::Classifier;

/// Only model family this adapter understands.
const LOGISTIC_REGRESSION: &str = "logistic_regression";

/// Model parameters exported by the training pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportedLogisticModel {
    pub model_type: String,
    /// Class labels; index 1 is the class whose probability is `p`.
    pub classes: Vec<String>,
    pub feature_names: Vec<String>,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    pub scaler_mean: Vec<f64>,
    pub scaler_scale: Vec<f64>,
}

/// Loaded, validated logistic regression classifier.
#[derive(Debug, Clone)]
pub struct LogisticClassifier {
    model: ExportedLogisticModel,
    schema: FeatureSchema,
    labels: ClassLabels,
}

impl LogisticClassifier {
    /// Read and validate a model artifact.
    ///
    /// # Errors
    /// Returns error if the file cannot be read or parsed, or fails validation.
    pub fn load(path: &Path, positive_label: &str) -> Result<Self, ModelError> {
        let content = std::fs::read_to_string(path).map_err(|source| ModelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let model: ExportedLogisticModel =
            serde_json::from_str(&content).map_err(|source| ModelError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        let classifier = Self::from_exported(model, positive_label)?;
        tracing::info!(
            "Loaded model from {:?} (type={}, n_features={}, positive_label={:?})",
            path,
            classifier.model.model_type,
            classifier.schema.len(),
            classifier.labels.positive()
        );
        Ok(classifier)
    }

    /// Validate exported parameters.
    ///
    /// # Errors
    /// Returns `InvalidArtifact` or `SchemaMismatch` describing the first problem found.
    pub fn from_exported(
        model: ExportedLogisticModel,
        positive_label: &str,
    ) -> Result<Self, ModelError> {
        if model.model_type != LOGISTIC_REGRESSION {
            return Err(ModelError::InvalidArtifact(format!(
                "unsupported model_type {:?} (expected {LOGISTIC_REGRESSION:?})",
                model.model_type
            )));
        }

        let schema = FeatureSchema::from_names(model.feature_names.as_slice())?;
        let n = schema.len();
        if model.coefficients.len() != n
            || model.scaler_mean.len() != n
            || model.scaler_scale.len() != n
        {
            return Err(ModelError::InvalidArtifact(
                "Model parameter lengths do not match feature_names length".into(),
            ));
        }

        let all_finite = model
            .coefficients
            .iter()
            .chain(&model.scaler_mean)
            .chain(std::iter::once(&model.intercept))
            .all(|v| v.is_finite());
        if !all_finite {
            return Err(ModelError::InvalidArtifact(
                "Model parameters must be finite".into(),
            ));
        }
        if let Some(i) = model
            .scaler_scale
            .iter()
            .position(|s| !s.is_finite() || *s == 0.0)
        {
            return Err(ModelError::InvalidArtifact(format!(
                "scaler_scale for {:?} must be finite and non-zero",
                model.feature_names[i]
            )));
        }

        let labels = ClassLabels::from_classes(&model.classes, positive_label)?;

        Ok(Self {
            model,
            schema,
            labels,
        })
    }

    /// Positive-class probability for a record.
    fn positive_probability(&self, record: &FeatureRecord) -> Result<f64, ModelError> {
        if record.len() != self.schema.len() {
            return Err(ModelError::FeatureCount {
                got: record.len(),
                expected: self.schema.len(),
            });
        }
        if record.fields() != self.schema.fields() {
            return Err(ModelError::SchemaMismatch(format!(
                "record columns {:?} do not match training columns {:?}",
                record.columns(),
                self.model.feature_names
            )));
        }

        let m = &self.model;
        let z = record
            .values()
            .iter()
            .enumerate()
            .fold(m.intercept, |acc, (i, x)| {
                acc + m.coefficients[i] * (x - m.scaler_mean[i]) / m.scaler_scale[i]
            });

        Ok(sigmoid(z))
    }

    /// Label emitted for a positive-class probability.
    fn label_for(&self, p: f64) -> &str {
        if p > 0.5 {
            &self.model.classes[1]
        } else {
            &self.model.classes[0]
        }
    }
}

impl Classifier for LogisticClassifier {
    fn classes(&self) -> &ClassLabels {
        &self.labels
    }

    fn feature_names(&self) -> &[String] {
        &self.model.feature_names
    }

    fn predict(&self, record: &FeatureRecord) -> Result<String, ModelError> {
        let p = self.positive_probability(record)?;
        Ok(self.label_for(p).to_string())
    }

    fn predict_proba(&self, record: &FeatureRecord) -> Result<[f64; 2], ModelError> {
        let p = self.positive_probability(record)?;
        Ok([1.0 - p, p])
    }
}

/// Logistic function, evaluated without overflowing `exp` for large |z|.
fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ChestPainType, ClinicalInputs, FeatureField, FixedDefaults};
    use tempfile::tempdir;

    fn column_names() -> Vec<String> {
        FeatureField::ALL
            .iter()
            .map(|f| f.column_name().to_string())
            .collect()
    }

    fn flat_model(intercept: f64) -> ExportedLogisticModel {
        ExportedLogisticModel {
            model_type: LOGISTIC_REGRESSION.into(),
            classes: vec!["Absence".into(), "Presence".into()],
            feature_names: column_names(),
            coefficients: vec![0.0; 13],
            intercept,
            scaler_mean: vec![0.0; 13],
            scaler_scale: vec![1.0; 13],
        }
    }

    fn default_record() -> FeatureRecord {
        FeatureSchema::canonical().assemble(&ClinicalInputs::default(), &FixedDefaults::default())
    }

    #[test]
    fn test_sigmoid() {
        assert!((sigmoid(0.0) - 0.5).abs() < f64::EPSILON);
        assert!(sigmoid(800.0) <= 1.0);
        assert!(sigmoid(-800.0) >= 0.0);
        assert!((sigmoid(2.0) + sigmoid(-2.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_tie_goes_to_first_class() {
        let clf = LogisticClassifier::from_exported(flat_model(0.0), "Presence")
            .expect("Valid model");
        let record = default_record();

        let proba = clf.predict_proba(&record).expect("Should score");
        assert!((proba[0] - 0.5).abs() < f64::EPSILON);
        assert!((proba[1] - 0.5).abs() < f64::EPSILON);
        assert_eq!(clf.predict(&record).expect("Should predict"), "Absence");
    }

    #[test]
    fn test_probabilities_sum_to_one() {
        let clf = LogisticClassifier::from_exported(flat_model(1.3), "Presence")
            .expect("Valid model");
        let proba = clf.predict_proba(&default_record()).expect("Should score");
        assert!((proba[0] + proba[1] - 1.0).abs() < 1e-12);
        assert_eq!(clf.predict(&default_record()).unwrap(), "Presence");
    }

    #[test]
    fn test_single_coefficient_scoring() {
        // Only Age contributes: z = 0.5 * (50 - 40) / 10 = 0.5
        let mut model = flat_model(0.0);
        model.coefficients[0] = 0.5;
        model.scaler_mean[0] = 40.0;
        model.scaler_scale[0] = 10.0;
        let clf = LogisticClassifier::from_exported(model, "Presence").expect("Valid model");

        let proba = clf.predict_proba(&default_record()).expect("Should score");
        assert!((proba[1] - sigmoid(0.5)).abs() < 1e-12);
    }

    #[test]
    fn test_rejects_invalid_artifacts() {
        let mut wrong_type = flat_model(0.0);
        wrong_type.model_type = "random_forest".into();
        assert!(LogisticClassifier::from_exported(wrong_type, "Presence").is_err());

        let mut short = flat_model(0.0);
        short.coefficients.pop();
        assert!(LogisticClassifier::from_exported(short, "Presence").is_err());

        let mut zero_scale = flat_model(0.0);
        zero_scale.scaler_scale[4] = 0.0;
        let err = LogisticClassifier::from_exported(zero_scale, "Presence")
            .expect_err("must fail");
        assert!(err.to_string().contains("Cholesterol"));

        let mut nan = flat_model(0.0);
        nan.intercept = f64::NAN;
        assert!(LogisticClassifier::from_exported(nan, "Presence").is_err());

        assert!(LogisticClassifier::from_exported(flat_model(0.0), "Yes").is_err());
    }

    #[test]
    fn test_rejects_record_in_other_order() {
        let clf = LogisticClassifier::from_exported(flat_model(0.0), "Presence")
            .expect("Valid model");

        let mut names = column_names();
        names.swap(0, 1);
        let permuted = FeatureSchema::from_names(names.as_slice()).expect("Valid schema");
        let record = permuted.assemble(&ClinicalInputs::default(), &FixedDefaults::default());

        assert!(matches!(
            clf.predict(&record),
            Err(ModelError::SchemaMismatch(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("model.json");
        let json = serde_json::to_string(&flat_model(-2.0)).expect("serialize model");
        std::fs::write(&path, json).expect("write model");

        let clf = LogisticClassifier::load(&path, "Presence").expect("Should load");
        assert_eq!(clf.classes().positive(), "Presence");
        assert_eq!(clf.feature_names().len(), 13);

        let missing = LogisticClassifier::load(&temp.path().join("nope.json"), "Presence");
        assert!(matches!(missing, Err(ModelError::Io { .. })));

        std::fs::write(&path, "{not json").expect("write garbage");
        let garbage = LogisticClassifier::load(&path, "Presence");
        assert!(matches!(garbage, Err(ModelError::Parse { .. })));
    }

    #[test]
    fn test_shipped_model_separates_profiles() {
        let clf = LogisticClassifier::load(Path::new("models/heart_disease_model.json"), "Presence")
            .expect("Shipped model should load");
        let schema = FeatureSchema::canonical();
        let defaults = FixedDefaults::default();

        let baseline = schema.assemble(&ClinicalInputs::default(), &defaults);
        assert_eq!(clf.predict(&baseline).unwrap(), "Absence");

        let severe = ClinicalInputs {
            age: 70,
            cholesterol: 350,
            max_heart_rate: 100,
            st_depression: 4.0,
            chest_pain: ChestPainType::Asymptomatic,
            thallium: 3,
            vessels: 3,
        };
        let record = schema.assemble(&severe, &defaults);
        assert_eq!(clf.predict(&record).unwrap(), "Presence");
        assert!(clf.predict_proba(&record).unwrap()[1] > 0.9);
    }
}
