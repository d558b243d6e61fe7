//! Train/test splitting.

use crate::error::{LosError, Result};
use crate::primitives::{Matrix, Vector};
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Rows of one partition: features and targets, aligned by index.
#[derive(Debug, Clone, PartialEq)]
pub struct Partition {
    /// Feature rows
    pub x: Matrix<f64>,
    /// Targets, one per row of `x`
    pub y: Vector<f64>,
}

impl Partition {
    /// Number of rows in the partition.
    #[must_use]
    pub fn len(&self) -> usize {
        self.y.len()
    }

    /// Returns true if the partition holds no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.y.is_empty()
    }
}

fn validate_split_inputs(x: &Matrix<f64>, y: &Vector<f64>, test_size: f64) -> Result<usize> {
    if !(test_size > 0.0 && test_size < 1.0) {
        return Err(LosError::Training(format!(
            "test_size must be between 0 and 1, got {test_size}"
        )));
    }

    let n_samples = x.n_rows();
    if n_samples != y.len() {
        return Err(LosError::dimension_mismatch("samples", n_samples, y.len()));
    }

    // Test share rounds up, train gets the remainder.
    let n_test = (n_samples as f64 * test_size).ceil() as usize;
    let n_train = n_samples.saturating_sub(n_test);

    if n_test == 0 || n_train == 0 {
        return Err(LosError::Training(format!(
            "Split would result in empty train or test set (n_train={n_train}, n_test={n_test})"
        )));
    }

    Ok(n_train)
}

fn shuffle_indices(n_samples: usize, seed: u64) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..n_samples).collect();
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);
    indices
}

/// Shuffles rows with a seeded RNG and splits them into train and test
/// partitions.
///
/// The same `(x, y, test_size, seed)` always yields the same partitions.
///
/// # Errors
///
/// Returns an error if `test_size` is outside (0, 1), the inputs disagree on
/// row count, or either partition would be empty.
///
/// # Examples
///
/// ```
/// use los_model::model_selection::train_test_split;
/// use los_model::primitives::{Matrix, Vector};
///
/// let x = Matrix::from_vec(10, 1, (0..10).map(f64::from).collect()).unwrap();
/// let y = Vector::from_vec((0..10).map(f64::from).collect());
/// let (train, test) = train_test_split(&x, &y, 0.2, 42).unwrap();
/// assert_eq!(train.len(), 8);
/// assert_eq!(test.len(), 2);
/// ```
pub fn train_test_split(
    x: &Matrix<f64>,
    y: &Vector<f64>,
    test_size: f64,
    seed: u64,
) -> Result<(Partition, Partition)> {
    let n_train = validate_split_inputs(x, y, test_size)?;

    let indices = shuffle_indices(x.n_rows(), seed);
    let (train_idx, test_idx) = indices.split_at(n_train);

    Ok((extract(x, y, train_idx), extract(x, y, test_idx)))
}

fn extract(x: &Matrix<f64>, y: &Vector<f64>, indices: &[usize]) -> Partition {
    let targets: Vec<f64> = indices.iter().map(|&i| y[i]).collect();
    Partition {
        x: x.select_rows(indices),
        y: Vector::from_vec(targets),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(n: usize) -> (Matrix<f64>, Vector<f64>) {
        let x = Matrix::from_vec(n, 2, (0..n * 2).map(|i| i as f64).collect()).unwrap();
        let y = Vector::from_vec((0..n).map(|i| i as f64 * 10.0).collect());
        (x, y)
    }

    #[test]
    fn test_train_test_split_basic() {
        let (x, y) = sample(10);
        let (train, test) = train_test_split(&x, &y, 0.2, 42).unwrap();

        assert_eq!(train.x.shape(), (8, 2));
        assert_eq!(test.x.shape(), (2, 2));
        assert_eq!(train.len(), 8);
        assert_eq!(test.len(), 2);
    }

    #[test]
    fn test_test_share_rounds_up() {
        let (x, y) = sample(11);
        let (train, test) = train_test_split(&x, &y, 0.2, 42).unwrap();
        assert_eq!(test.len(), 3);
        assert_eq!(train.len(), 8);
    }

    #[test]
    fn test_train_test_split_reproducibility() {
        let (x, y) = sample(25);
        let a = train_test_split(&x, &y, 0.2, 42).unwrap();
        let b = train_test_split(&x, &y, 0.2, 42).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_rows_stay_aligned_with_targets() {
        let (x, y) = sample(20);
        let (train, test) = train_test_split(&x, &y, 0.2, 7).unwrap();
        for part in [&train, &test] {
            for i in 0..part.len() {
                // Row r holds [2r, 2r+1] and target 10r.
                let r = part.x.get(i, 0) / 2.0;
                assert!((part.y[i] - r * 10.0).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_partitions_cover_all_rows_once() {
        let (x, y) = sample(15);
        let (train, test) = train_test_split(&x, &y, 0.2, 42).unwrap();
        let mut seen: Vec<f64> = train
            .y
            .as_slice()
            .iter()
            .chain(test.y.as_slice())
            .copied()
            .collect();
        seen.sort_by(f64::total_cmp);
        assert_eq!(seen, y.as_slice().to_vec());
    }

    #[test]
    fn test_invalid_test_size() {
        let (x, y) = sample(10);
        assert!(train_test_split(&x, &y, 0.0, 42).is_err());
        assert!(train_test_split(&x, &y, 1.0, 42).is_err());
        assert!(train_test_split(&x, &y, f64::NAN, 42).is_err());
    }

    #[test]
    fn test_too_few_rows() {
        let (x, y) = sample(1);
        assert!(train_test_split(&x, &y, 0.2, 42).is_err());
    }
}
