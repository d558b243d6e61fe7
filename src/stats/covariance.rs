//! Pearson correlation.

use crate::primitives::Matrix;

/// Computes the Pearson correlation coefficient of two equally long samples.
///
/// Returns `NaN` when the lengths differ, fewer than two values are given,
/// or either sample has zero variance.
///
/// # Examples
///
/// ```
/// use los_model::stats::pearson;
///
/// let r = pearson(&[1.0, 2.0, 3.0, 4.0], &[2.0, 4.0, 6.0, 8.0]);
/// assert!((r - 1.0).abs() < 1e-12);
/// ```
#[must_use]
pub fn pearson(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len();
    if n != y.len() || n < 2 {
        return f64::NAN;
    }

    let x_mean = x.iter().sum::<f64>() / n as f64;
    let y_mean = y.iter().sum::<f64>() / n as f64;

    let mut cov_sum = 0.0;
    let mut x_var_sum = 0.0;
    let mut y_var_sum = 0.0;

    for (&xi, &yi) in x.iter().zip(y) {
        let x_diff = xi - x_mean;
        let y_diff = yi - y_mean;
        cov_sum += x_diff * y_diff;
        x_var_sum += x_diff * x_diff;
        y_var_sum += y_diff * y_diff;
    }

    let denom = (x_var_sum * y_var_sum).sqrt();
    if denom < 1e-12 {
        return f64::NAN;
    }

    (cov_sum / denom).clamp(-1.0, 1.0)
}

/// Computes the Pearson correlation matrix of the columns of `data`.
///
/// Entry (i, j) is the correlation between columns i and j. A column with
/// zero variance yields `NaN` in its row and column, including the diagonal.
///
/// # Examples
///
/// ```
/// use los_model::primitives::Matrix;
/// use los_model::stats::corr_matrix;
///
/// let data = Matrix::from_vec(3, 2, vec![1.0, 2.0, 2.0, 4.0, 3.0, 6.0]).unwrap();
/// let c = corr_matrix(&data);
/// assert_eq!(c.shape(), (2, 2));
/// assert!((c.get(0, 1) - 1.0).abs() < 1e-12);
/// ```
#[must_use]
pub fn corr_matrix(data: &Matrix<f64>) -> Matrix<f64> {
    let p = data.n_cols();
    let columns: Vec<Vec<f64>> = (0..p).map(|j| data.column(j).into_vec()).collect();

    let mut values = vec![0.0; p * p];
    for i in 0..p {
        for j in 0..=i {
            let r = pearson(&columns[i], &columns[j]);
            values[i * p + j] = r;
            values[j * p + i] = r;
        }
    }
    Matrix::from_vec(p, p, values).unwrap_or_else(|_| Matrix::zeros(p, p))
}
