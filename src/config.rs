//! Fixed paths and thresholds shared by training and serving.

/// Where `train` writes the artifact and `predict` reads it.
pub const DEFAULT_MODEL_PATH: &str = "models/linear_regression_los.json";

/// Raw dataset consumed by training and the about view.
pub const DEFAULT_DATA_PATH: &str = "LengthOfStay.csv";

/// Seed for the train/test shuffle.
pub const DEFAULT_SEED: u64 = 42;

/// Share of cleaned rows held out from fitting.
pub const DEFAULT_TEST_SIZE: f64 = 0.2;

/// Diagnosis counts above this are rejected as implausible.
pub const MAX_PLAUSIBLE_RCOUNT: i64 = 20;

/// Upper bound the input form accepts for the diagnosis count.
pub const RCOUNT_INPUT_MAX: i64 = 50;

/// Rows shown in dataset previews.
pub const PREVIEW_ROWS: usize = 5;
