//! Prediction service.
//!
//! [`AppContext::init`] loads the artifact and the dataset once; every
//! request then goes through [`AppContext::predict`], which validates the
//! form, encodes it and invokes the model. Nothing is cached between
//! requests.

use crate::config::{DEFAULT_DATA_PATH, DEFAULT_MODEL_PATH, MAX_PLAUSIBLE_RCOUNT, RCOUNT_INPUT_MAX};
use crate::data::Dataset;
use crate::error::Result;
use crate::features::{FeatureVector, PatientForm};
use crate::linear_model::LinearRegression;
use crate::serialization::ModelArtifact;
use std::fmt;
use std::path::PathBuf;

/// Files the service needs at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Model artifact
    pub model_path: PathBuf,
    /// Raw dataset for the about view
    pub data_path: PathBuf,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
        }
    }
}

impl ServiceConfig {
    /// Default paths.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the artifact path.
    #[must_use]
    pub fn with_model_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.model_path = path.into();
        self
    }

    /// Sets the dataset path.
    #[must_use]
    pub fn with_data_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.data_path = path.into();
        self
    }
}

/// Why a request was refused before reaching the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Count above the plausibility threshold
    ImplausibleDiagnosisCount {
        /// Submitted count
        rcount: i64,
    },
    /// Negative count; the form never produces one
    NegativeDiagnosisCount {
        /// Submitted count
        rcount: i64,
    },
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ImplausibleDiagnosisCount { rcount } => write!(
                f,
                "diagnosis count {rcount} is too large, check the input (usually below {MAX_PLAUSIBLE_RCOUNT})"
            ),
            Self::NegativeDiagnosisCount { rcount } => write!(
                f,
                "diagnosis count {rcount} is out of range (0-{RCOUNT_INPUT_MAX})"
            ),
        }
    }
}

/// A served prediction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    /// Predicted length of stay in days
    pub days: f64,
    /// Vector the model saw
    pub features: FeatureVector,
}

impl fmt::Display for Prediction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} days", self.days)
    }
}

/// Result of one request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Outcome {
    /// Model was invoked
    Predicted(Prediction),
    /// Refused, model not invoked
    Rejected(Rejection),
}

/// Checks the diagnosis count.
///
/// # Errors
///
/// Returns the [`Rejection`] for counts outside `0..=20`.
pub fn validate(form: &PatientForm) -> std::result::Result<(), Rejection> {
    if form.rcount > MAX_PLAUSIBLE_RCOUNT {
        return Err(Rejection::ImplausibleDiagnosisCount {
            rcount: form.rcount,
        });
    }
    if form.rcount < 0 {
        return Err(Rejection::NegativeDiagnosisCount {
            rcount: form.rcount,
        });
    }
    Ok(())
}

/// Validates, encodes and hands the vector to `invoke`. `invoke` is not
/// called for rejected forms.
///
/// # Errors
///
/// Propagates errors from `invoke`.
pub fn handle_request<F>(form: &PatientForm, invoke: F) -> Result<Outcome>
where
    F: FnOnce(&FeatureVector) -> Result<f64>,
{
    if let Err(rejection) = validate(form) {
        tracing::warn!(rcount = form.rcount, "request rejected");
        return Ok(Outcome::Rejected(rejection));
    }

    let features = form.encode();
    let days = invoke(&features)?;
    tracing::debug!(%features, days, "prediction served");
    Ok(Outcome::Predicted(Prediction { days, features }))
}

/// Process-lifetime state: the loaded model and dataset.
#[derive(Debug, Clone)]
pub struct AppContext {
    artifact: ModelArtifact,
    model: LinearRegression,
    dataset: Dataset,
}

impl AppContext {
    /// Loads the artifact, then the dataset.
    ///
    /// # Errors
    ///
    /// Fails with [`crate::error::LosError::MissingFile`] naming the first
    /// absent path, or with the load error of either file.
    pub fn init(config: &ServiceConfig) -> Result<Self> {
        let artifact = ModelArtifact::load(&config.model_path)?;
        let dataset = Dataset::load(&config.data_path)?;
        tracing::info!(
            model = %config.model_path.display(),
            data = %config.data_path.display(),
            rows = dataset.n_rows(),
            "service initialized"
        );
        Ok(Self::from_parts(artifact, dataset))
    }

    /// Builds a context from already loaded parts.
    #[must_use]
    pub fn from_parts(artifact: ModelArtifact, dataset: Dataset) -> Self {
        let model = artifact.to_model();
        Self {
            artifact,
            model,
            dataset,
        }
    }

    /// Serves one request.
    ///
    /// # Errors
    ///
    /// Returns an error only if the model cannot evaluate the vector.
    pub fn predict(&self, form: &PatientForm) -> Result<Outcome> {
        handle_request(form, |features| self.model.predict_one(features.as_slice()))
    }

    /// The loaded artifact.
    #[must_use]
    pub fn artifact(&self) -> &ModelArtifact {
        &self.artifact
    }

    /// The loaded raw dataset.
    #[must_use]
    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::{Answer, Gender};
    use crate::serialization::TrainingProvenance;
    use crate::test_support::{synthetic_csv, write_csv};
    use crate::training::{train, TrainingConfig};
    use std::cell::Cell;
    use tempfile::TempDir;

    fn form(rcount: i64) -> PatientForm {
        PatientForm::new(rcount, Gender::Male, Answer::No, Answer::Yes, Answer::No)
    }

    fn context() -> AppContext {
        let model = LinearRegression::from_parts(vec![1.0, 0.5, 0.25, 2.0, 0.75], 1.0);
        let artifact = ModelArtifact::from_model(
            &model,
            TrainingProvenance {
                seed: 42,
                test_size: 0.2,
                n_train: 8,
                n_test: 2,
                n_dropped: 0,
            },
        )
        .unwrap();
        let dataset = Dataset::from_rows(&["rcount"], &[vec!["1"]]).unwrap();
        AppContext::from_parts(artifact, dataset)
    }

    #[test]
    fn test_plausible_counts_reach_model() {
        let calls = Cell::new(0);
        for rcount in 0..=20 {
            let outcome = handle_request(&form(rcount), |_| {
                calls.set(calls.get() + 1);
                Ok(1.0)
            })
            .unwrap();
            assert!(matches!(outcome, Outcome::Predicted(_)));
        }
        assert_eq!(calls.get(), 21);
    }

    #[test]
    fn test_implausible_counts_skip_model() {
        for rcount in 21..=50 {
            let outcome =
                handle_request(&form(rcount), |_| panic!("model must not run")).unwrap();
            assert_eq!(
                outcome,
                Outcome::Rejected(Rejection::ImplausibleDiagnosisCount { rcount })
            );
        }
    }

    #[test]
    fn test_out_of_range_counts_do_not_panic() {
        for rcount in [-1, -50, 51, i64::MAX, i64::MIN] {
            let outcome =
                handle_request(&form(rcount), |_| panic!("model must not run")).unwrap();
            assert!(matches!(outcome, Outcome::Rejected(_)));
        }
    }

    #[test]
    fn test_context_predicts_encoded_vector() {
        let ctx = context();
        let outcome = ctx.predict(&form(3)).unwrap();
        let Outcome::Predicted(p) = outcome else {
            panic!("expected a prediction");
        };
        assert_eq!(p.features, FeatureVector([3.0, 1.0, 0.0, 1.0, 0.0]));
        // 1 + 3*1 + 0.5 + 2
        assert!((p.days - 6.5).abs() < 1e-12);
        assert_eq!(p.to_string(), "6.50 days");
    }

    #[test]
    fn test_rejection_message() {
        let msg = Rejection::ImplausibleDiagnosisCount { rcount: 25 }.to_string();
        assert!(msg.contains("25"));
        assert!(msg.contains("20"));
    }

    #[test]
    fn test_init_missing_model_names_path() {
        let dir = TempDir::new().unwrap();
        let data = write_csv(&dir, &synthetic_csv(10));
        let model_path = dir.path().join("models").join("linear_regression_los.json");
        let err = AppContext::init(
            &ServiceConfig::new()
                .with_model_path(&model_path)
                .with_data_path(&data),
        )
        .unwrap_err();
        assert!(err.is_missing_file());
        assert!(err.to_string().contains(&model_path.display().to_string()));
    }

    #[test]
    fn test_init_missing_dataset_names_path() {
        let dir = TempDir::new().unwrap();
        let data = write_csv(&dir, &synthetic_csv(60));
        let model_path = dir.path().join("m.json");
        train(
            &TrainingConfig::new()
                .with_data_path(&data)
                .with_model_path(&model_path),
        )
        .unwrap();

        let absent = dir.path().join("gone.csv");
        let err = AppContext::init(
            &ServiceConfig::new()
                .with_model_path(&model_path)
                .with_data_path(&absent),
        )
        .unwrap_err();
        assert!(err.to_string().contains("gone.csv"));
    }

    #[test]
    fn test_train_then_serve() {
        let dir = TempDir::new().unwrap();
        let mut csv = synthetic_csv(80);
        csv.push_str("1000,1/1/2012,3,M,0,1,0,B,4.2\n");
        let data = write_csv(&dir, &csv);
        let model_path = dir.path().join("models").join("linear_regression_los.json");
        train(
            &TrainingConfig::new()
                .with_data_path(&data)
                .with_model_path(&model_path),
        )
        .unwrap();

        let ctx = AppContext::init(
            &ServiceConfig::new()
                .with_model_path(&model_path)
                .with_data_path(&data),
        )
        .unwrap();
        assert_eq!(ctx.dataset().n_rows(), 81);
        assert_eq!(ctx.artifact().feature_names.len(), 5);

        match ctx.predict(&form(3)).unwrap() {
            Outcome::Predicted(p) => assert!(p.days.is_finite()),
            Outcome::Rejected(r) => panic!("unexpected rejection: {r}"),
        }
    }
}
