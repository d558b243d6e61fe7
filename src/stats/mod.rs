//! Descriptive statistics and correlation.
//!
//! Semantics follow the usual dataframe conventions: sample standard
//! deviation (n - 1), R-7 quantiles, and `NaN` correlation for a column
//! without variance instead of an error.

mod covariance;

pub use covariance::{corr_matrix, pearson};

/// Summary of one numeric column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnSummary {
    /// Non-missing values
    pub count: usize,
    /// Arithmetic mean
    pub mean: f64,
    /// Sample standard deviation (`NaN` below two values)
    pub std: f64,
    /// Smallest value
    pub min: f64,
    /// 25th percentile
    pub q25: f64,
    /// Median
    pub median: f64,
    /// 75th percentile
    pub q75: f64,
    /// Largest value
    pub max: f64,
}

impl ColumnSummary {
    /// Summarizes the present values of a column. Returns `None` when
    /// nothing is present.
    #[must_use]
    pub fn from_values(values: &[Option<f64>]) -> Option<Self> {
        let mut sorted: Vec<f64> = values.iter().flatten().copied().collect();
        if sorted.is_empty() {
            return None;
        }
        sorted.sort_by(f64::total_cmp);

        let n = sorted.len();
        let mean = sorted.iter().sum::<f64>() / n as f64;
        let std = if n < 2 {
            f64::NAN
        } else {
            let ss: f64 = sorted.iter().map(|v| (v - mean).powi(2)).sum();
            (ss / (n - 1) as f64).sqrt()
        };

        Some(Self {
            count: n,
            mean,
            std,
            min: sorted[0],
            q25: quantile_sorted(&sorted, 0.25),
            median: quantile_sorted(&sorted, 0.5),
            q75: quantile_sorted(&sorted, 0.75),
            max: sorted[n - 1],
        })
    }
}

/// R-7 quantile (linear interpolation) of already sorted, non-empty data.
///
/// # Panics
///
/// Panics if `sorted` is empty.
#[must_use]
pub fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }
    let h = (n - 1) as f64 * q.clamp(0.0, 1.0);
    let lo = h.floor() as usize;
    let hi = h.ceil() as usize;
    let fraction = h - lo as f64;
    sorted[lo] + fraction * (sorted[hi] - sorted[lo])
}
