//! Clinical inputs for heart disease risk prediction.
//!
//! Seven values are collected from the form. The remaining six features the
//! classifier expects are pinned to a fixed reference profile (`FixedDefaults`).

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

/// Age in years.
pub const AGE_RANGE: RangeInclusive<u32> = 20..=100;

/// Serum cholesterol in mg/dL.
pub const CHOLESTEROL_RANGE: RangeInclusive<u32> = 100..=400;

/// Maximum heart rate achieved during exercise, in bpm.
pub const MAX_HEART_RATE_RANGE: RangeInclusive<u32> = 60..=220;

/// ST depression in mm, stored as tenths (0.0 - 6.0 in steps of 0.1).
pub const ST_DEPRESSION_TENTHS_RANGE: RangeInclusive<u32> = 0..=60;

/// Thallium stress test result and fluoroscopy vessel count share {0,1,2,3}.
pub const ORDINAL_RANGE: RangeInclusive<u8> = 0..=3;

/// Chest pain category as encoded in the training data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ChestPainType {
    #[default]
    TypicalAngina,
    AtypicalAngina,
    NonAnginalPain,
    Asymptomatic,
}

impl ChestPainType {
    /// All categories in code order.
    pub const ALL: [ChestPainType; 4] = [
        Self::TypicalAngina,
        Self::AtypicalAngina,
        Self::NonAnginalPain,
        Self::Asymptomatic,
    ];

    /// Numeric code fed to the classifier.
    #[must_use]
    pub fn code(self) -> u8 {
        match self {
            Self::TypicalAngina => 0,
            Self::AtypicalAngina => 1,
            Self::NonAnginalPain => 2,
            Self::Asymptomatic => 3,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::TypicalAngina => "Typical Angina",
            Self::AtypicalAngina => "Atypical Angina",
            Self::NonAnginalPain => "Non-anginal Pain",
            Self::Asymptomatic => "Asymptomatic",
        }
    }

    /// Next category, wrapping around.
    #[must_use]
    pub fn next(self) -> Self {
        Self::ALL[(usize::from(self.code()) + 1) % Self::ALL.len()]
    }

    /// Previous category, wrapping around.
    #[must_use]
    pub fn prev(self) -> Self {
        let len = Self::ALL.len();
        Self::ALL[(usize::from(self.code()) + len - 1) % len]
    }
}

impl std::fmt::Display for ChestPainType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// The seven user-controlled measurements.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClinicalInputs {
    /// Age in years
    pub age: u32,

    /// Cholesterol in mg/dL
    pub cholesterol: u32,

    /// Max heart rate in bpm
    pub max_heart_rate: u32,

    /// ST depression induced by exercise relative to rest, in mm
    pub st_depression: f64,

    /// Chest pain category
    pub chest_pain: ChestPainType,

    /// Thallium stress test result (0-3)
    pub thallium: u8,

    /// Number of major vessels colored by fluoroscopy (0-3)
    pub vessels: u8,
}

impl Default for ClinicalInputs {
    fn default() -> Self {
        Self {
            age: 50,
            cholesterol: 200,
            max_heart_rate: 150,
            st_depression: 1.0,
            chest_pain: ChestPainType::TypicalAngina,
            thallium: 0,
            vessels: 0,
        }
    }
}

impl ClinicalInputs {
    /// Clamp every value into its control range and snap ST depression to
    /// the 0.1 mm grid.
    #[must_use]
    pub fn clamped(self) -> Self {
        let st_max = f64::from(*ST_DEPRESSION_TENTHS_RANGE.end()) / 10.0;
        let st = if self.st_depression.is_finite() {
            self.st_depression.clamp(0.0, st_max)
        } else {
            1.0
        };

        Self {
            age: self.age.clamp(*AGE_RANGE.start(), *AGE_RANGE.end()),
            cholesterol: self
                .cholesterol
                .clamp(*CHOLESTEROL_RANGE.start(), *CHOLESTEROL_RANGE.end()),
            max_heart_rate: self
                .max_heart_rate
                .clamp(*MAX_HEART_RATE_RANGE.start(), *MAX_HEART_RATE_RANGE.end()),
            st_depression: (st * 10.0).round() / 10.0,
            chest_pain: self.chest_pain,
            thallium: self.thallium.min(*ORDINAL_RANGE.end()),
            vessels: self.vessels.min(*ORDINAL_RANGE.end()),
        }
    }
}

/// Clinical features the form does not collect.
///
/// Every prediction is made for this reference profile: a male patient with
/// resting BP 120 mmHg, normal fasting blood sugar, EKG result 1, no
/// exercise-induced angina and ST slope 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedDefaults {
    /// Resting blood pressure in mmHg
    pub resting_bp: u32,
    /// 1 = male, 0 = female
    pub sex: u8,
    /// Fasting blood sugar > 120 mg/dL
    pub fasting_blood_sugar: u8,
    /// Resting electrocardiographic result
    pub resting_ekg: u8,
    /// Exercise-induced angina
    pub exercise_angina: u8,
    /// Slope of the peak exercise ST segment
    pub st_slope: u8,
}

impl FixedDefaults {
    pub const REFERENCE: FixedDefaults = FixedDefaults {
        resting_bp: 120,
        sex: 1,
        fasting_blood_sugar: 0,
        resting_ekg: 1,
        exercise_angina: 0,
        st_slope: 1,
    };
}

impl Default for FixedDefaults {
    fn default() -> Self {
        Self::REFERENCE
    }
}
