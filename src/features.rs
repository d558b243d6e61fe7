//! Feature schema and encoding shared by training and serving.
//!
//! Both sides build vectors in [`FEATURE_NAMES`] order. The artifact stores
//! the same list and loading fails when it differs, so a reordered schema
//! can never silently feed weights to the wrong inputs.

use crate::config::MAX_PLAUSIBLE_RCOUNT;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Model inputs, in the order the weights are stored.
pub const FEATURE_NAMES: [&str; 5] = ["rcount", "gender", "asthma", "pneum", "depress"];

/// Number of model inputs.
pub const N_FEATURES: usize = FEATURE_NAMES.len();

/// Dataset column holding the length of stay.
pub const TARGET_NAME: &str = "lengthofstay";

/// Dataset spelling of the "5 or more" diagnosis count.
pub const RCOUNT_SENTINEL: &str = "5+";

/// Value the sentinel maps to.
pub const RCOUNT_SENTINEL_VALUE: u32 = 5;

/// Form label for male patients.
pub const MALE_LABEL: &str = "Laki-laki";
/// Form label for female patients.
pub const FEMALE_LABEL: &str = "Perempuan";
/// Form label for an affirmative answer.
pub const YES_LABEL: &str = "Ya";
/// Form label for a negative answer.
pub const NO_LABEL: &str = "Tidak";

/// Dataset code for male patients.
pub const MALE_CODE: &str = "M";
/// Dataset code for female patients.
pub const FEMALE_CODE: &str = "F";

/// Patient gender as a closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    /// Encoded as 1
    Male,
    /// Encoded as 0
    Female,
}

impl Gender {
    /// Parses a form label (`Laki-laki` / `Perempuan`).
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim() {
            MALE_LABEL => Some(Self::Male),
            FEMALE_LABEL => Some(Self::Female),
            _ => None,
        }
    }

    /// Parses a dataset code (`M` / `F`).
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            MALE_CODE => Some(Self::Male),
            FEMALE_CODE => Some(Self::Female),
            _ => None,
        }
    }

    /// Form label for this value.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Male => MALE_LABEL,
            Self::Female => FEMALE_LABEL,
        }
    }

    /// Numeric encoding: male is 1, female is 0.
    #[must_use]
    pub fn encode(self) -> f64 {
        match self {
            Self::Male => 1.0,
            Self::Female => 0.0,
        }
    }
}

/// Yes/no answer for a diagnosis indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Answer {
    /// Encoded as 1
    Yes,
    /// Encoded as 0
    No,
}

impl Answer {
    /// Parses a form label (`Ya` / `Tidak`).
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim() {
            YES_LABEL => Some(Self::Yes),
            NO_LABEL => Some(Self::No),
            _ => None,
        }
    }

    /// Form label for this value.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Yes => YES_LABEL,
            Self::No => NO_LABEL,
        }
    }

    /// Numeric encoding: yes is 1, no is 0.
    #[must_use]
    pub fn encode(self) -> f64 {
        match self {
            Self::Yes => 1.0,
            Self::No => 0.0,
        }
    }
}

/// Encodes a form gender label. Anything but the male label is 0; labels
/// outside the closed set are logged before taking that default.
#[must_use]
pub fn encode_gender_label(label: &str) -> f64 {
    match Gender::from_label(label) {
        Some(gender) => gender.encode(),
        None => {
            tracing::warn!(label, "unrecognized gender label, encoding as 0");
            0.0
        }
    }
}

/// Encodes a dataset gender code. Anything but `M` is 0; codes outside
/// `{M, F}` are logged before taking that default.
#[must_use]
pub fn encode_gender_code(code: &str) -> f64 {
    match Gender::from_code(code) {
        Some(gender) => gender.encode(),
        None => {
            tracing::warn!(code, "unrecognized gender code, encoding as 0");
            0.0
        }
    }
}

/// Encodes a yes/no form label. Anything but the yes label is 0; labels
/// outside the closed set are logged before taking that default.
#[must_use]
pub fn encode_answer_label(field: &'static str, label: &str) -> f64 {
    match Answer::from_label(label) {
        Some(answer) => answer.encode(),
        None => {
            tracing::warn!(field, label, "unrecognized yes/no label, encoding as 0");
            0.0
        }
    }
}

/// Raw values as collected by the input form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatientForm {
    /// Diagnosis count (form bounds 0..=50)
    pub rcount: i64,
    /// Gender label
    pub gender: String,
    /// Asthma yes/no label
    pub asthma: String,
    /// Pneumonia yes/no label
    pub pneum: String,
    /// Depression yes/no label
    pub depress: String,
}

impl PatientForm {
    /// Builds a form from typed values.
    #[must_use]
    pub fn new(rcount: i64, gender: Gender, asthma: Answer, pneum: Answer, depress: Answer) -> Self {
        Self {
            rcount,
            gender: gender.label().to_string(),
            asthma: asthma.label().to_string(),
            pneum: pneum.label().to_string(),
            depress: depress.label().to_string(),
        }
    }

    /// True when the diagnosis count passes the plausibility check.
    #[must_use]
    pub fn rcount_is_plausible(&self) -> bool {
        (0..=MAX_PLAUSIBLE_RCOUNT).contains(&self.rcount)
    }

    /// Encodes the form in [`FEATURE_NAMES`] order.
    ///
    /// Does not validate; see [`crate::service::AppContext::predict`].
    #[must_use]
    pub fn encode(&self) -> FeatureVector {
        FeatureVector([
            self.rcount as f64,
            encode_gender_label(&self.gender),
            encode_answer_label("asthma", &self.asthma),
            encode_answer_label("pneum", &self.pneum),
            encode_answer_label("depress", &self.depress),
        ])
    }
}

/// One encoded observation in [`FEATURE_NAMES`] order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector(pub [f64; N_FEATURES]);

impl FeatureVector {
    /// Values as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }
}

impl fmt::Display for FeatureVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|v| format!("{v}")).collect();
        write!(f, "[{}]", parts.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gender_label_encoding() {
        assert_eq!(encode_gender_label("Laki-laki"), 1.0);
        assert_eq!(encode_gender_label("Perempuan"), 0.0);
        // Current behavior for unknown labels: silent 0 (plus a log line).
        assert_eq!(encode_gender_label("laki-laki"), 0.0);
        assert_eq!(encode_gender_label("Other"), 0.0);
        assert_eq!(encode_gender_label(""), 0.0);
    }

    #[test]
    fn test_gender_code_encoding() {
        assert_eq!(encode_gender_code("M"), 1.0);
        assert_eq!(encode_gender_code("F"), 0.0);
        assert_eq!(encode_gender_code("?"), 0.0);
        assert_eq!(encode_gender_code("m"), 0.0);
    }

    #[test]
    fn test_answer_encoding() {
        assert_eq!(encode_answer_label("asthma", "Ya"), 1.0);
        assert_eq!(encode_answer_label("asthma", "Tidak"), 0.0);
        assert_eq!(encode_answer_label("asthma", "yes"), 0.0);
    }

    #[test]
    fn test_labels_round_trip_through_enums() {
        for g in [Gender::Male, Gender::Female] {
            assert_eq!(Gender::from_label(g.label()), Some(g));
        }
        for a in [Answer::Yes, Answer::No] {
            assert_eq!(Answer::from_label(a.label()), Some(a));
        }
    }

    #[test]
    fn test_form_encodes_in_schema_order() {
        let form = PatientForm::new(3, Gender::Male, Answer::No, Answer::Yes, Answer::No);
        assert_eq!(form.encode(), FeatureVector([3.0, 1.0, 0.0, 1.0, 0.0]));
        assert_eq!(form.encode().to_string(), "[3, 1, 0, 1, 0]");
    }

    #[test]
    fn test_encoding_is_idempotent() {
        let form = PatientForm::new(7, Gender::Female, Answer::Yes, Answer::Yes, Answer::Yes);
        assert_eq!(form.encode(), form.encode());
    }

    #[test]
    fn test_plausibility_bounds() {
        let mut form = PatientForm::new(0, Gender::Female, Answer::No, Answer::No, Answer::No);
        assert!(form.rcount_is_plausible());
        form.rcount = 20;
        assert!(form.rcount_is_plausible());
        form.rcount = 21;
        assert!(!form.rcount_is_plausible());
        form.rcount = -1;
        assert!(!form.rcount_is_plausible());
    }

    #[test]
    fn test_schema_order() {
        assert_eq!(N_FEATURES, 5);
        assert_eq!(FEATURE_NAMES[0], "rcount");
        assert_eq!(FEATURE_NAMES[4], "depress");
    }
}
