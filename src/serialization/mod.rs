//! Portable model artifact.
//!
//! The fitted model is stored as pretty-printed JSON:
//!
//! ```text
//! {
//!   "model_type": "linear_regression",
//!   "target": "lengthofstay",
//!   "feature_names": ["rcount", "gender", "asthma", "pneum", "depress"],
//!   "coefficients": [...],          // one per feature, same order
//!   "intercept": 3.1,
//!   "training": { "seed": 42, "test_size": 0.2, "n_train": ..., "n_test": ..., "n_dropped": ... }
//! }
//! ```
//!
//! Writes go to a sibling temp file that is renamed over the target, so an
//! interrupted save never leaves a truncated artifact behind.

use crate::error::{LosError, Result};
use crate::features::{FEATURE_NAMES, N_FEATURES, TARGET_NAME};
use crate::linear_model::LinearRegression;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Value of [`ModelArtifact::model_type`].
pub const MODEL_TYPE: &str = "linear_regression";

/// How the stored model was produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingProvenance {
    /// Shuffle seed of the train/test split
    pub seed: u64,
    /// Held-out share
    pub test_size: f64,
    /// Rows used for fitting
    pub n_train: usize,
    /// Rows held out
    pub n_test: usize,
    /// Rows dropped for a missing target
    pub n_dropped: usize,
}

/// Serialized linear model: ordered weights, intercept and the feature
/// names they belong to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    /// Always [`MODEL_TYPE`]
    pub model_type: String,
    /// Predicted column
    pub target: String,
    /// Feature names in weight order
    pub feature_names: Vec<String>,
    /// One weight per feature
    pub coefficients: Vec<f64>,
    /// Constant offset
    pub intercept: f64,
    /// Split and row counts of the run that wrote this file
    pub training: TrainingProvenance,
}

impl ModelArtifact {
    /// Captures a fitted model under the shared feature schema.
    ///
    /// # Errors
    ///
    /// Returns an error if the model is unfitted or has the wrong width.
    pub fn from_model(model: &LinearRegression, training: TrainingProvenance) -> Result<Self> {
        let coefficients = model
            .coefficients()
            .ok_or("Cannot save unfitted model. Call fit() first.")?
            .as_slice()
            .to_vec();

        let artifact = Self {
            model_type: MODEL_TYPE.to_string(),
            target: TARGET_NAME.to_string(),
            feature_names: FEATURE_NAMES.iter().map(|s| (*s).to_string()).collect(),
            coefficients,
            intercept: model.intercept(),
            training,
        };
        artifact.validate()?;
        Ok(artifact)
    }

    /// Checks the artifact against the shared feature schema.
    ///
    /// # Errors
    ///
    /// Returns [`LosError::SchemaMismatch`] if the model type, feature
    /// names or weight count differ, or a weight is not finite.
    pub fn validate(&self) -> Result<()> {
        let mismatch = |message: String| Err(LosError::SchemaMismatch { message });

        if self.model_type != MODEL_TYPE {
            return mismatch(format!(
                "model_type is '{}', expected '{MODEL_TYPE}'",
                self.model_type
            ));
        }
        if self.feature_names.len() != N_FEATURES
            || self.feature_names.iter().zip(FEATURE_NAMES).any(|(a, b)| a != b)
        {
            return mismatch(format!(
                "feature_names are {:?}, expected {:?}",
                self.feature_names, FEATURE_NAMES
            ));
        }
        if self.coefficients.len() != N_FEATURES {
            return mismatch(format!(
                "{} coefficients for {N_FEATURES} features",
                self.coefficients.len()
            ));
        }
        if !self.intercept.is_finite() || self.coefficients.iter().any(|c| !c.is_finite()) {
            return mismatch("non-finite weight".to_string());
        }
        Ok(())
    }

    /// Rebuilds the estimator.
    #[must_use]
    pub fn to_model(&self) -> LinearRegression {
        LinearRegression::from_parts(self.coefficients.clone(), self.intercept)
    }

    /// Writes the artifact, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or any filesystem step fails; the
    /// previous file at `path`, if any, is left untouched in that case.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        tracing::info!(path = %path.display(), "saving model artifact");

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self)?;
        let tmp = path.with_extension("json.tmp");
        if let Err(e) = fs::write(&tmp, json).and_then(|()| fs::rename(&tmp, path)) {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }

        tracing::debug!(
            path = %path.display(),
            size = fs::metadata(path).map(|m| m.len()).unwrap_or(0),
            "model artifact saved"
        );
        Ok(())
    }

    /// Reads and validates an artifact.
    ///
    /// # Errors
    ///
    /// Returns [`LosError::MissingFile`] if `path` does not exist, a
    /// serialization error for malformed JSON, and
    /// [`LosError::SchemaMismatch`] for a foreign schema.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(LosError::MissingFile {
                what: "model",
                path: path.to_path_buf(),
            });
        }
        tracing::info!(path = %path.display(), "loading model artifact");

        let bytes = fs::read(path)?;
        let artifact: Self = serde_json::from_slice(&bytes)?;
        artifact.validate()?;
        Ok(artifact)
    }
}
