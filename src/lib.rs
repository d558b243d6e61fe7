//! Length-of-stay prediction for hospital patients.
//!
//! A linear regression over five encoded patient attributes (diagnosis
//! count, gender, asthma, pneumonia, depression) estimates the number of
//! days a patient stays. Training reads a CSV dataset and writes a JSON
//! artifact; the prediction service loads that artifact once and answers
//! one form at a time.
//!
//! # Quick Start
//!
//! ```
//! use los_model::prelude::*;
//!
//! // y = 2*x + 1
//! let x = Matrix::from_vec(4, 1, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
//! let y = Vector::from_slice(&[3.0, 5.0, 7.0, 9.0]);
//!
//! let mut model = LinearRegression::new();
//! model.fit(&x, &y).unwrap();
//!
//! let r2 = model.score(&x, &y).unwrap();
//! assert!(r2 > 0.99);
//! ```
//!
//! # Modules
//!
//! - [`primitives`]: Core Vector and Matrix types
//! - [`data`]: CSV dataset loading and cleaning
//! - [`features`]: Feature schema and form encoding
//! - [`linear_model`]: Ordinary least squares
//! - [`model_selection`]: Seeded train/test splitting
//! - [`metrics`]: Evaluation metrics
//! - [`stats`]: Descriptive statistics and correlation
//! - [`serialization`]: JSON model artifact
//! - [`training`]: Offline training pipeline
//! - [`service`]: Prediction service
//! - [`report`]: Dataset exploration views

pub mod config;
pub mod data;
pub mod error;
pub mod features;
pub mod linear_model;
pub mod metrics;
pub mod model_selection;
pub mod prelude;
pub mod primitives;
pub mod report;
pub mod serialization;
pub mod service;
pub mod stats;
pub mod traits;
pub mod training;

#[cfg(test)]
mod test_support;

pub use error::{LosError, Result};
pub use traits::Estimator;
