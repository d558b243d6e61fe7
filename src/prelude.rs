//! Convenience re-exports for common usage.
//!
//! # Usage
//!
//! ```
//! use los_model::prelude::*;
//! ```

pub use crate::data::Dataset;
pub use crate::features::{Answer, FeatureVector, Gender, PatientForm, FEATURE_NAMES};
pub use crate::linear_model::LinearRegression;
pub use crate::metrics::r_squared;
pub use crate::model_selection::train_test_split;
pub use crate::primitives::{Matrix, Vector};
pub use crate::serialization::ModelArtifact;
pub use crate::service::{AppContext, Outcome, ServiceConfig};
pub use crate::traits::Estimator;
pub use crate::training::{train, TrainingConfig};
