//! Prediction result types.
//!
//! The classifier speaks in class labels; everything past the classifier
//! boundary works with `Verdict`.

use serde::{Deserialize, Serialize};

use super::error::ModelError;

/// Two-valued risk outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    /// The classifier predicted the positive (disease present) class
    AtRisk,
    /// Any other prediction
    NotAtRisk,
}

impl Verdict {
    /// Headline shown to the user.
    #[must_use]
    pub fn headline(&self) -> &'static str {
        match self {
            Self::AtRisk => "High risk of heart disease",
            Self::NotAtRisk => "Low risk of heart disease",
        }
    }

    /// Get the associated color for TUI display (RGB).
    #[must_use]
    pub fn color(&self) -> (u8, u8, u8) {
        match self {
            Self::AtRisk => (244, 63, 94),     // Rose (#F43F5E)
            Self::NotAtRisk => (16, 185, 129), // Emerald (#10B981)
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AtRisk => write!(f, "HIGH RISK"),
            Self::NotAtRisk => write!(f, "LOW RISK"),
        }
    }
}

/// The two class labels a binary classifier emits, with the positive one marked.
///
/// `positive_index` is the position of the positive label in the model's
/// class list, which is also its column in `predict_proba`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassLabels {
    negative: String,
    positive: String,
    positive_index: usize,
}

impl ClassLabels {
    /// Build from a model's class list and the sentinel label.
    ///
    /// # Errors
    /// Returns `InvalidArtifact` unless `classes` holds exactly two distinct
    /// labels, one of which is `positive`.
    pub fn from_classes(classes: &[String], positive: &str) -> Result<Self, ModelError> {
        let [a, b] = classes else {
            return Err(ModelError::InvalidArtifact(format!(
                "expected 2 classes, got {}",
                classes.len()
            )));
        };
        if a == b {
            return Err(ModelError::InvalidArtifact(format!(
                "duplicate class label {a:?}"
            )));
        }

        let (negative, positive_index) = if a == positive {
            (b, 0)
        } else if b == positive {
            (a, 1)
        } else {
            return Err(ModelError::InvalidArtifact(format!(
                "positive label {positive:?} is not one of the model classes {classes:?}"
            )));
        };

        Ok(Self {
            negative: negative.clone(),
            positive: positive.to_string(),
            positive_index,
        })
    }

    #[must_use]
    pub fn positive(&self) -> &str {
        &self.positive
    }

    /// Column of the positive class in a `[f64; 2]` probability pair.
    #[must_use]
    pub fn positive_index(&self) -> usize {
        self.positive_index
    }

    /// Probability of the positive class from a pair in model class order.
    #[must_use]
    pub fn positive_probability(&self, proba: [f64; 2]) -> f64 {
        proba[self.positive_index]
    }

    /// Convert a predicted label into a verdict.
    ///
    /// # Errors
    /// Returns `UnknownLabel` if the label is neither class.
    pub fn verdict_for(&self, label: &str) -> Result<Verdict, ModelError> {
        if label == self.positive {
            Ok(Verdict::AtRisk)
        } else if label == self.negative {
            Ok(Verdict::NotAtRisk)
        } else {
            Err(ModelError::UnknownLabel {
                label: label.to_string(),
                expected: [self.negative.clone(), self.positive.clone()],
            })
        }
    }
}

/// Outcome of one Predict trigger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    pub verdict: Verdict,

    /// Label as emitted by the classifier
    pub label: String,

    /// Positive-class probability (0.0 to 1.0), shown for both verdicts
    pub probability: f64,

    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl Prediction {
    #[must_use]
    pub fn new(verdict: Verdict, label: impl Into<String>, probability: f64) -> Self {
        Self {
            verdict,
            label: label.into(),
            probability,
            created_at: chrono::Utc::now(),
        }
    }

    /// Probability as a percentage with two decimals, e.g. `73.21%`.
    #[must_use]
    pub fn probability_text(&self) -> String {
        format!("{:.2}%", self.probability * 100.0)
    }

    /// Two-line rendered verdict.
    #[must_use]
    pub fn message(&self) -> String {
        format!(
            "{}\nProbability: {}",
            self.verdict.headline(),
            self.probability_text()
        )
    }
}
