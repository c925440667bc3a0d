//! Feature schema and the single-row feature record handed to the classifier.
//!
//! The column order is not hardcoded: it comes from the schema artifact the
//! classifier was trained with. `FeatureSchema` resolves each column name to a
//! `FeatureField` once, at load time, and `assemble` fills values in that order.

use std::collections::HashSet;

use serde::Serialize;

use super::error::ModelError;
use super::patient::{ClinicalInputs, FixedDefaults};

/// Number of columns the classifier expects.
pub const FEATURE_COUNT: usize = 13;

/// One column of the feature record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FeatureField {
    Age,
    Sex,
    ChestPainType,
    RestingBp,
    Cholesterol,
    FastingBloodSugar,
    RestingEkg,
    MaxHeartRate,
    ExerciseAngina,
    StDepression,
    StSlope,
    Vessels,
    Thallium,
}

impl FeatureField {
    /// All fields in the order of the training dataset.
    pub const ALL: [FeatureField; FEATURE_COUNT] = [
        Self::Age,
        Self::Sex,
        Self::ChestPainType,
        Self::RestingBp,
        Self::Cholesterol,
        Self::FastingBloodSugar,
        Self::RestingEkg,
        Self::MaxHeartRate,
        Self::ExerciseAngina,
        Self::StDepression,
        Self::StSlope,
        Self::Vessels,
        Self::Thallium,
    ];

    /// Column header as it appears in the training data.
    #[must_use]
    pub fn column_name(self) -> &'static str {
        match self {
            Self::Age => "Age",
            Self::Sex => "Sex",
            Self::ChestPainType => "Chest pain type",
            Self::RestingBp => "BP",
            Self::Cholesterol => "Cholesterol",
            Self::FastingBloodSugar => "FBS over 120",
            Self::RestingEkg => "EKG results",
            Self::MaxHeartRate => "Max HR",
            Self::ExerciseAngina => "Exercise angina",
            Self::StDepression => "ST depression",
            Self::StSlope => "Slope of ST",
            Self::Vessels => "Number of vessels fluro",
            Self::Thallium => "Thallium",
        }
    }

    /// snake_case alias accepted in schema files.
    #[must_use]
    pub fn alias(self) -> &'static str {
        match self {
            Self::Age => "age",
            Self::Sex => "sex",
            Self::ChestPainType => "chest_pain_type",
            Self::RestingBp => "bp",
            Self::Cholesterol => "cholesterol",
            Self::FastingBloodSugar => "fbs_over_120",
            Self::RestingEkg => "ekg_results",
            Self::MaxHeartRate => "max_hr",
            Self::ExerciseAngina => "exercise_angina",
            Self::StDepression => "st_depression",
            Self::StSlope => "slope_of_st",
            Self::Vessels => "number_of_vessels_fluro",
            Self::Thallium => "thallium",
        }
    }

    /// Resolve a schema column name (case-insensitive, surrounding whitespace ignored).
    #[must_use]
    pub fn from_column(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL.into_iter().find(|f| {
            f.column_name().eq_ignore_ascii_case(name) || f.alias().eq_ignore_ascii_case(name)
        })
    }

    /// Whether the value comes from the form rather than `FixedDefaults`.
    #[must_use]
    pub fn is_user_supplied(self) -> bool {
        matches!(
            self,
            Self::Age
                | Self::ChestPainType
                | Self::Cholesterol
                | Self::MaxHeartRate
                | Self::StDepression
                | Self::Vessels
                | Self::Thallium
        )
    }

    fn value(self, inputs: &ClinicalInputs, defaults: &FixedDefaults) -> f64 {
        match self {
            Self::Age => f64::from(inputs.age),
            Self::Sex => f64::from(defaults.sex),
            Self::ChestPainType => f64::from(inputs.chest_pain.code()),
            Self::RestingBp => f64::from(defaults.resting_bp),
            Self::Cholesterol => f64::from(inputs.cholesterol),
            Self::FastingBloodSugar => f64::from(defaults.fasting_blood_sugar),
            Self::RestingEkg => f64::from(defaults.resting_ekg),
            Self::MaxHeartRate => f64::from(inputs.max_heart_rate),
            Self::ExerciseAngina => f64::from(defaults.exercise_angina),
            Self::StDepression => inputs.st_depression,
            Self::StSlope => f64::from(defaults.st_slope),
            Self::Vessels => f64::from(inputs.vessels),
            Self::Thallium => f64::from(inputs.thallium),
        }
    }
}

/// Ordered list of feature columns, as declared by the schema artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureSchema {
    fields: Vec<FeatureField>,
    names: Vec<String>,
}

impl FeatureSchema {
    /// Build a schema from column names in artifact order.
    ///
    /// # Errors
    /// Returns `SchemaMismatch` for unknown or duplicate columns, or if any of
    /// the thirteen fields is missing.
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Result<Self, ModelError> {
        let mut fields = Vec::with_capacity(names.len());
        let mut seen = HashSet::with_capacity(names.len());

        for name in names {
            let name = name.as_ref();
            let field = FeatureField::from_column(name)
                .ok_or_else(|| ModelError::SchemaMismatch(format!("unknown column {name:?}")))?;
            if !seen.insert(field) {
                return Err(ModelError::SchemaMismatch(format!(
                    "duplicate column {name:?}"
                )));
            }
            fields.push(field);
        }

        let missing: Vec<&str> = FeatureField::ALL
            .iter()
            .filter(|f| !seen.contains(*f))
            .map(|f| f.column_name())
            .collect();
        if !missing.is_empty() {
            return Err(ModelError::SchemaMismatch(format!(
                "missing columns: {}",
                missing.join(", ")
            )));
        }

        Ok(Self {
            fields,
            names: names.iter().map(|n| n.as_ref().trim().to_string()).collect(),
        })
    }

    /// Schema in training-dataset order with canonical column names.
    #[must_use]
    pub fn canonical() -> Self {
        Self {
            fields: FeatureField::ALL.to_vec(),
            names: FeatureField::ALL
                .iter()
                .map(|f| f.column_name().to_string())
                .collect(),
        }
    }

    #[must_use]
    pub fn fields(&self) -> &[FeatureField] {
        &self.fields
    }

    /// Column names exactly as declared by the artifact (trimmed).
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Concatenate the form inputs with the fixed defaults in schema order.
    #[must_use]
    pub fn assemble(&self, inputs: &ClinicalInputs, defaults: &FixedDefaults) -> FeatureRecord {
        FeatureRecord {
            fields: self.fields.clone(),
            columns: self.names.clone(),
            values: self
                .fields
                .iter()
                .map(|f| f.value(inputs, defaults))
                .collect(),
        }
    }
}

/// A single row of thirteen named values in schema order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureRecord {
    fields: Vec<FeatureField>,
    columns: Vec<String>,
    values: Vec<f64>,
}

impl FeatureRecord {
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    #[must_use]
    pub fn fields(&self) -> &[FeatureField] {
        &self.fields
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// `(column, field, value)` triples in schema order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, FeatureField, f64)> + '_ {
        self.columns
            .iter()
            .zip(self.fields.iter())
            .zip(self.values.iter())
            .map(|((c, f), v)| (c.as_str(), *f, *v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ChestPainType;

    fn value_of(record: &FeatureRecord, field: FeatureField) -> Option<f64> {
        record.iter().find(|(_, f, _)| *f == field).map(|(_, _, v)| v)
    }

    fn assert_row(record: &FeatureRecord, expected: &[f64]) {
        assert_eq!(record.len(), expected.len());
        for (i, (got, want)) in record.values().iter().zip(expected).enumerate() {
            assert!(
                (got - want).abs() < 1e-12,
                "column {i} ({}): got {got}, want {want}",
                record.columns()[i]
            );
        }
    }

    #[test]
    fn test_default_inputs_produce_reference_row() {
        let record =
            FeatureSchema::canonical().assemble(&ClinicalInputs::default(), &FixedDefaults::default());
        assert_row(
            &record,
            &[50.0, 1.0, 0.0, 120.0, 200.0, 0.0, 1.0, 150.0, 0.0, 1.0, 1.0, 0.0, 0.0],
        );
        assert_eq!(record.columns()[0], "Age");
        assert_eq!(record.columns()[12], "Thallium");
    }

    #[test]
    fn test_boundary_inputs_produce_full_rows() {
        let schema = FeatureSchema::canonical();
        let defaults = FixedDefaults::default();

        let low = ClinicalInputs {
            age: 20,
            cholesterol: 100,
            max_heart_rate: 60,
            st_depression: 0.0,
            chest_pain: ChestPainType::TypicalAngina,
            thallium: 0,
            vessels: 0,
        };
        let high = ClinicalInputs {
            age: 100,
            cholesterol: 400,
            max_heart_rate: 220,
            st_depression: 6.0,
            chest_pain: ChestPainType::Asymptomatic,
            thallium: 3,
            vessels: 3,
        };

        assert_row(
            &schema.assemble(&low, &defaults),
            &[20.0, 1.0, 0.0, 120.0, 100.0, 0.0, 1.0, 60.0, 0.0, 0.0, 1.0, 0.0, 0.0],
        );
        assert_row(
            &schema.assemble(&high, &defaults),
            &[100.0, 1.0, 3.0, 120.0, 400.0, 0.0, 1.0, 220.0, 0.0, 6.0, 1.0, 3.0, 3.0],
        );
    }

    #[test]
    fn test_fixed_fields_ignore_user_input() {
        let schema = FeatureSchema::canonical();
        let defaults = FixedDefaults::default();

        for age in [20, 63, 100] {
            for cp in ChestPainType::ALL {
                for ordinal in 0..=3 {
                    let inputs = ClinicalInputs {
                        age,
                        chest_pain: cp,
                        thallium: ordinal,
                        vessels: 3 - ordinal,
                        st_depression: f64::from(ordinal) * 1.5,
                        ..Default::default()
                    };
                    let record = schema.assemble(&inputs, &defaults);
                    assert_eq!(value_of(&record, FeatureField::RestingBp), Some(120.0));
                    assert_eq!(value_of(&record, FeatureField::Sex), Some(1.0));
                    assert_eq!(value_of(&record, FeatureField::FastingBloodSugar), Some(0.0));
                    assert_eq!(value_of(&record, FeatureField::RestingEkg), Some(1.0));
                    assert_eq!(value_of(&record, FeatureField::ExerciseAngina), Some(0.0));
                    assert_eq!(value_of(&record, FeatureField::StSlope), Some(1.0));
                }
            }
        }
    }

    #[test]
    fn test_permuted_schema_permutes_values() {
        let names = [
            "Thallium",
            "Age",
            "BP",
            "Number of vessels fluro",
            "Cholesterol",
            "Max HR",
            "Sex",
            "ST depression",
            "Chest pain type",
            "FBS over 120",
            "EKG results",
            "Exercise angina",
            "Slope of ST",
        ];
        let schema = FeatureSchema::from_names(&names).expect("Should resolve");
        let inputs = ClinicalInputs {
            age: 61,
            thallium: 2,
            vessels: 1,
            chest_pain: ChestPainType::NonAnginalPain,
            st_depression: 2.4,
            ..Default::default()
        };
        let record = schema.assemble(&inputs, &FixedDefaults::default());

        assert_eq!(record.columns(), &names.map(String::from)[..]);
        assert_row(
            &record,
            &[2.0, 61.0, 120.0, 1.0, 200.0, 150.0, 1.0, 2.4, 2.0, 0.0, 1.0, 0.0, 1.0],
        );
    }

    #[test]
    fn test_aliases_and_case_are_accepted() {
        let names: Vec<String> = FeatureField::ALL
            .iter()
            .map(|f| format!("  {} ", f.alias().to_uppercase()))
            .collect();
        let schema = FeatureSchema::from_names(names.as_slice()).expect("Should resolve");
        assert_eq!(schema.fields(), &FeatureField::ALL[..]);
        assert_eq!(schema.names()[0], "AGE");
    }

    #[test]
    fn test_schema_rejects_bad_columns() {
        let mut names: Vec<&str> = FeatureField::ALL.iter().map(|f| f.column_name()).collect();

        names[3] = "Blood pressure";
        let err = FeatureSchema::from_names(names.as_slice()).expect_err("unknown column");
        assert!(err.to_string().contains("unknown column"));

        names[3] = "Age";
        let err = FeatureSchema::from_names(names.as_slice()).expect_err("duplicate column");
        assert!(err.to_string().contains("duplicate"));

        let all = FeatureField::ALL.map(|f| f.column_name());
        let err = FeatureSchema::from_names(&all[..12]).expect_err("missing column");
        assert!(err.to_string().contains("Thallium"));
    }

    #[test]
    fn test_user_supplied_split() {
        let user = FeatureField::ALL.iter().filter(|f| f.is_user_supplied()).count();
        assert_eq!(user, 7);
        assert_eq!(FEATURE_COUNT - user, 6);
    }
}
