//! Linear models for regression.
//!
//! Includes Ordinary Least Squares (OLS) linear regression.

use crate::error::{LosError, Result};
use crate::metrics::r_squared;
use crate::primitives::{LeastSquares, Matrix, Vector};
use crate::traits::Estimator;

/// Eigenvalues below this fraction of the largest are treated as zero.
const RANK_RTOL: f64 = 1e-12;

/// Ordinary Least Squares (OLS) linear regression.
///
/// Fits a linear model by minimizing the residual sum of squares between
/// observed targets and predicted targets:
///
/// ```text
/// y = X β + b + ε
/// ```
///
/// # Solver
///
/// With an intercept, `X` and `y` are centered first and the intercept is
/// recovered from the means. `β` is the minimum-norm solution of the normal
/// equations `X^T X β = X^T y`, taken through the eigen decomposition of the
/// Gram matrix, so rank-deficient data still fits: a column that never
/// varies gets weight zero.
///
/// # Examples
///
/// ```
/// use los_model::prelude::*;
///
/// // y = 2x + 1
/// let x = Matrix::from_vec(4, 1, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
/// let y = Vector::from_slice(&[3.0, 5.0, 7.0, 9.0]);
///
/// let mut model = LinearRegression::new();
/// model.fit(&x, &y).unwrap();
///
/// let predictions = model.predict(&x).unwrap();
/// assert!((predictions[0] - 3.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone)]
pub struct LinearRegression {
    /// Coefficients for features (excluding intercept).
    coefficients: Option<Vector<f64>>,
    /// Intercept (bias) term.
    intercept: f64,
    /// Whether to fit an intercept.
    fit_intercept: bool,
}

impl Default for LinearRegression {
    fn default() -> Self {
        Self::new()
    }
}

impl LinearRegression {
    /// Creates a new `LinearRegression` with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            coefficients: None,
            intercept: 0.0,
            fit_intercept: true,
        }
    }

    /// Rebuilds a fitted model from stored weights.
    #[must_use]
    pub fn from_parts(coefficients: Vec<f64>, intercept: f64) -> Self {
        Self {
            coefficients: Some(Vector::from_vec(coefficients)),
            intercept,
            fit_intercept: true,
        }
    }

    /// Sets whether to fit an intercept term.
    #[must_use]
    pub fn with_intercept(mut self, fit_intercept: bool) -> Self {
        self.fit_intercept = fit_intercept;
        self
    }

    /// Returns the coefficients (excluding intercept), if fitted.
    #[must_use]
    pub fn coefficients(&self) -> Option<&Vector<f64>> {
        self.coefficients.as_ref()
    }

    /// Returns the intercept term.
    #[must_use]
    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// Returns true if the model has been fitted.
    #[must_use]
    pub fn is_fitted(&self) -> bool {
        self.coefficients.is_some()
    }

    /// Predicts a single observation.
    ///
    /// # Errors
    ///
    /// Returns an error if the model is unfitted or `features` has the wrong length.
    pub fn predict_one(&self, features: &[f64]) -> Result<f64> {
        let coefficients = self.fitted_coefficients()?;
        if features.len() != coefficients.len() {
            return Err(LosError::dimension_mismatch(
                "features",
                coefficients.len(),
                features.len(),
            ));
        }
        Ok(Vector::from_slice(features).dot(coefficients) + self.intercept)
    }

    fn fitted_coefficients(&self) -> Result<&Vector<f64>> {
        self.coefficients
            .as_ref()
            .ok_or_else(|| "Model not fitted. Call fit() first.".into())
    }
}

impl Estimator for LinearRegression {
    /// Fits by least squares on the centered data.
    ///
    /// # Errors
    ///
    /// Returns an error if the row counts disagree or there are no rows.
    /// Constant or collinear features are not an error: they share the
    /// minimum-norm weight, and a constant feature gets none.
    fn fit(&mut self, x: &Matrix<f64>, y: &Vector<f64>) -> Result<()> {
        let (n_samples, n_features) = x.shape();

        if n_samples != y.len() {
            return Err(LosError::dimension_mismatch("samples", n_samples, y.len()));
        }

        if n_samples == 0 {
            return Err(LosError::Training(
                "Cannot fit with zero samples".to_string(),
            ));
        }

        let (x_offset, y_offset) = if self.fit_intercept {
            (x.column_means(), y.mean())
        } else {
            (Vector::from_vec(vec![0.0; n_features]), 0.0)
        };

        let xc = x.centered(&x_offset)?;
        let yc = y.add_scalar(-y_offset);

        let gram = xc.gram();
        let rhs = xc.t_matvec(&yc)?;
        let LeastSquares { solution, rank } = gram.pinv_solve(&rhs, RANK_RTOL)?;

        if rank < n_features {
            tracing::warn!(
                rank,
                n_features,
                "design is rank deficient, using the minimum-norm solution"
            );
        }

        self.intercept = y_offset - x_offset.dot(&solution);
        self.coefficients = Some(solution);

        Ok(())
    }

    fn predict(&self, x: &Matrix<f64>) -> Result<Vector<f64>> {
        let coefficients = self.fitted_coefficients()?;
        let result = x.matvec(coefficients)?;
        Ok(result.add_scalar(self.intercept))
    }

    fn score(&self, x: &Matrix<f64>, y: &Vector<f64>) -> Result<f64> {
        let y_pred = self.predict(x)?;
        if y_pred.len() != y.len() {
            return Err(LosError::dimension_mismatch("samples", y_pred.len(), y.len()));
        }
        Ok(r_squared(&y_pred, y))
    }
}
