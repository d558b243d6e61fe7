//! Dense row-major matrix and the least-squares kernels the regression uses.

use super::Vector;
use serde::{Deserialize, Serialize};

/// Row-major 2D buffer.
///
/// # Examples
///
/// ```
/// use los_model::primitives::Matrix;
///
/// let design = Matrix::from_vec(3, 2, vec![1.0_f64, 0.0, 2.0, 1.0, 3.0, 0.0]).unwrap();
/// assert_eq!(design.shape(), (3, 2));
/// assert_eq!(design.column(0).as_slice(), &[1.0, 2.0, 3.0]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrix<T> {
    data: Vec<T>,
    rows: usize,
    cols: usize,
}

impl<T: Copy> Matrix<T> {
    /// Wraps `data`, read as `rows` consecutive rows of `cols` entries.
    ///
    /// # Errors
    ///
    /// Fails when `data.len() != rows * cols`.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<T>) -> Result<Self, &'static str> {
        if rows.checked_mul(cols) != Some(data.len()) {
            return Err("Data length must equal rows * cols");
        }
        Ok(Self { data, rows, cols })
    }

    /// `(rows, cols)`
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Row count.
    #[must_use]
    pub fn n_rows(&self) -> usize {
        self.rows
    }

    /// Column count.
    #[must_use]
    pub fn n_cols(&self) -> usize {
        self.cols
    }

    /// Entry at `(row, col)`; panics outside the shape.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> T {
        self.data[self.offset(row, col)]
    }

    /// Copy of one row.
    #[must_use]
    pub fn row(&self, row: usize) -> Vector<T> {
        Vector::from_slice(self.row_slice(row))
    }

    /// Copy of one column.
    #[must_use]
    pub fn column(&self, col: usize) -> Vector<T> {
        Vector::from_vec((0..self.rows).map(|r| self.get(r, col)).collect())
    }

    /// New matrix holding the listed rows in the listed order; panics on an
    /// index past the last row.
    #[must_use]
    pub fn select_rows(&self, indices: &[usize]) -> Self {
        let data = indices
            .iter()
            .flat_map(|&r| self.row_slice(r).iter().copied())
            .collect();
        Self {
            data,
            rows: indices.len(),
            cols: self.cols,
        }
    }

    /// Backing buffer, row after row.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    fn offset(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    fn row_slice(&self, row: usize) -> &[T] {
        let start = self.offset(row, 0);
        &self.data[start..start + self.cols]
    }
}

/// Off-diagonal mass below which a Jacobi sweep counts as converged,
/// relative to the Frobenius norm.
const JACOBI_TOLERANCE: f64 = 1e-15;

/// Sweeps allowed before [`Matrix::symmetric_eigen`] gives up.
const JACOBI_MAX_SWEEPS: usize = 64;

/// Eigen decomposition of a symmetric matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct SymmetricEigen {
    /// Eigenvalues, unsorted
    pub values: Vector<f64>,
    /// Eigenvectors stored as columns, aligned with `values`
    pub vectors: Matrix<f64>,
}

/// Minimum-norm solution of a possibly singular symmetric system.
#[derive(Debug, Clone, PartialEq)]
pub struct LeastSquares {
    /// Solution vector
    pub solution: Vector<f64>,
    /// Eigen directions kept, i.e. the numerical rank
    pub rank: usize,
}

impl Matrix<f64> {
    /// Creates a matrix of zeros.
    #[must_use]
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            data: vec![0.0; rows * cols],
            rows,
            cols,
        }
    }

    /// Creates the `n x n` identity.
    #[must_use]
    pub fn identity(n: usize) -> Self {
        let mut m = Self::zeros(n, n);
        for i in 0..n {
            m.data[i * n + i] = 1.0;
        }
        m
    }

    /// Matrix-vector product `A v`.
    ///
    /// # Errors
    ///
    /// Returns an error if `v` does not have one entry per column.
    pub fn matvec(&self, v: &Vector<f64>) -> Result<Vector<f64>, &'static str> {
        if self.cols != v.len() {
            return Err("Matrix columns must match vector length");
        }
        let out = (0..self.rows)
            .map(|r| {
                self.row_slice(r)
                    .iter()
                    .zip(v.as_slice())
                    .map(|(a, b)| a * b)
                    .sum()
            })
            .collect();
        Ok(Vector::from_vec(out))
    }

    /// Transposed product `A^T v`, without materializing `A^T`.
    ///
    /// # Errors
    ///
    /// Returns an error if `v` does not have one entry per row.
    pub fn t_matvec(&self, v: &Vector<f64>) -> Result<Vector<f64>, &'static str> {
        if self.rows != v.len() {
            return Err("Matrix rows must match vector length");
        }
        let mut out = vec![0.0; self.cols];
        for (r, &weight) in v.as_slice().iter().enumerate() {
            for (acc, x) in out.iter_mut().zip(self.row_slice(r)) {
                *acc += weight * x;
            }
        }
        Ok(Vector::from_vec(out))
    }

    /// Gram matrix `A^T A` (symmetric, `cols x cols`).
    #[must_use]
    pub fn gram(&self) -> Self {
        let p = self.cols;
        let mut g = Self::zeros(p, p);
        for r in 0..self.rows {
            let row = self.row_slice(r);
            for i in 0..p {
                for j in i..p {
                    g.data[i * p + j] += row[i] * row[j];
                }
            }
        }
        for i in 0..p {
            for j in 0..i {
                g.data[i * p + j] = g.data[j * p + i];
            }
        }
        g
    }

    /// Mean of every column. Zeros for an empty matrix.
    #[must_use]
    pub fn column_means(&self) -> Vector<f64> {
        let mut sums = vec![0.0; self.cols];
        for r in 0..self.rows {
            for (acc, x) in sums.iter_mut().zip(self.row_slice(r)) {
                *acc += x;
            }
        }
        if self.rows > 0 {
            let n = self.rows as f64;
            sums.iter_mut().for_each(|s| *s /= n);
        }
        Vector::from_vec(sums)
    }

    /// Subtracts `offsets` from every row.
    ///
    /// # Errors
    ///
    /// Returns an error if `offsets` does not have one entry per column.
    pub fn centered(&self, offsets: &Vector<f64>) -> Result<Self, &'static str> {
        if offsets.len() != self.cols {
            return Err("Offsets must have one entry per column");
        }
        let data = self
            .data
            .iter()
            .enumerate()
            .map(|(k, x)| x - offsets[k % self.cols])
            .collect();
        Ok(Self {
            data,
            rows: self.rows,
            cols: self.cols,
        })
    }

    /// Eigen decomposition of a symmetric matrix by cyclic Jacobi rotations.
    ///
    /// Only the upper triangle's symmetry is assumed, not checked.
    ///
    /// # Errors
    ///
    /// Returns an error if the matrix is not square or the rotations do not
    /// converge.
    pub fn symmetric_eigen(&self) -> Result<SymmetricEigen, &'static str> {
        if self.rows != self.cols {
            return Err("Matrix must be square for eigen decomposition");
        }
        let n = self.rows;
        let mut a = self.data.clone();
        let mut v = Self::identity(n).data;

        let norm: f64 = a.iter().map(|x| x * x).sum::<f64>().sqrt();
        let mut converged = norm == 0.0;

        for _ in 0..JACOBI_MAX_SWEEPS {
            if converged {
                break;
            }
            for p in 0..n {
                for q in (p + 1)..n {
                    let apq = a[p * n + q];
                    if apq == 0.0 {
                        continue;
                    }
                    let theta = (a[q * n + q] - a[p * n + p]) / (2.0 * apq);
                    let t = if theta == 0.0 {
                        1.0
                    } else {
                        theta.signum() / (theta.abs() + theta.hypot(1.0))
                    };
                    let c = 1.0 / t.hypot(1.0);
                    let s = t * c;

                    for k in 0..n {
                        let (akp, akq) = (a[k * n + p], a[k * n + q]);
                        a[k * n + p] = c * akp - s * akq;
                        a[k * n + q] = s * akp + c * akq;
                    }
                    for k in 0..n {
                        let (apk, aqk) = (a[p * n + k], a[q * n + k]);
                        a[p * n + k] = c * apk - s * aqk;
                        a[q * n + k] = s * apk + c * aqk;
                    }
                    for k in 0..n {
                        let (vkp, vkq) = (v[k * n + p], v[k * n + q]);
                        v[k * n + p] = c * vkp - s * vkq;
                        v[k * n + q] = s * vkp + c * vkq;
                    }
                }
            }

            let off: f64 = (0..n)
                .flat_map(|i| (0..n).filter(move |&j| j != i).map(move |j| (i, j)))
                .map(|(i, j)| a[i * n + j] * a[i * n + j])
                .sum::<f64>()
                .sqrt();
            converged = off <= JACOBI_TOLERANCE * norm;
        }

        if !converged {
            return Err("Eigen decomposition did not converge");
        }

        Ok(SymmetricEigen {
            values: Vector::from_vec((0..n).map(|i| a[i * n + i]).collect()),
            vectors: Self {
                data: v,
                rows: n,
                cols: n,
            },
        })
    }

    /// Minimum-norm solution of `A x = b` for symmetric positive
    /// semi-definite `A`, through its pseudo-inverse.
    ///
    /// Eigenvalues at or below `rtol` times the largest one are treated as
    /// zero, so directions the data never excites get no weight.
    ///
    /// # Errors
    ///
    /// Returns an error if the shapes disagree or the decomposition fails.
    pub fn pinv_solve(&self, b: &Vector<f64>, rtol: f64) -> Result<LeastSquares, &'static str> {
        if self.rows != b.len() {
            return Err("Matrix rows must match vector length");
        }
        let eigen = self.symmetric_eigen()?;
        let n = self.rows;

        let largest = eigen.values.as_slice().iter().copied().fold(0.0_f64, f64::max);
        let cutoff = largest * rtol;

        let mut x = vec![0.0; n];
        let mut rank = 0;
        for (k, &lambda) in eigen.values.as_slice().iter().enumerate() {
            if largest <= 0.0 || lambda <= cutoff {
                continue;
            }
            rank += 1;
            let direction = eigen.vectors.column(k);
            let weight = direction.dot(b) / lambda;
            for (xi, di) in x.iter_mut().zip(direction.as_slice()) {
                *xi += weight * di;
            }
        }

        Ok(LeastSquares {
            solution: Vector::from_vec(x),
            rank,
        })
    }
}

#[cfg(test)]
#[path = "matrix_tests.rs"]
mod tests;
