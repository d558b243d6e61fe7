//! Offline training pipeline: dataset in, model artifact out.
//!
//! Steps: load, replace `?` with missing, drop rows without a target,
//! encode the five features, seeded 80/20 split, OLS fit on the training
//! partition, atomic artifact write. Any conversion failure aborts before
//! the write, so a previous artifact survives a bad dataset.

use crate::config::{DEFAULT_DATA_PATH, DEFAULT_MODEL_PATH, DEFAULT_SEED, DEFAULT_TEST_SIZE};
use crate::data::{Dataset, TrainingTable};
use crate::error::Result;
use crate::linear_model::LinearRegression;
use crate::model_selection::{train_test_split, Partition};
use crate::serialization::{ModelArtifact, TrainingProvenance};
use crate::traits::Estimator;
use std::path::{Path, PathBuf};

/// Inputs of a training run.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingConfig {
    /// Dataset to read
    pub data_path: PathBuf,
    /// Artifact to write
    pub model_path: PathBuf,
    /// Shuffle seed
    pub seed: u64,
    /// Held-out share
    pub test_size: f64,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            seed: DEFAULT_SEED,
            test_size: DEFAULT_TEST_SIZE,
        }
    }
}

impl TrainingConfig {
    /// Default paths and split.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the dataset path.
    #[must_use]
    pub fn with_data_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.data_path = path.into();
        self
    }

    /// Sets the artifact path.
    #[must_use]
    pub fn with_model_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.model_path = path.into();
        self
    }

    /// Sets the shuffle seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Sets the held-out share.
    #[must_use]
    pub fn with_test_size(mut self, test_size: f64) -> Self {
        self.test_size = test_size;
        self
    }
}

/// Everything a run produced.
#[derive(Debug, Clone)]
pub struct TrainingOutcome {
    /// What was written to disk
    pub artifact: ModelArtifact,
    /// Where it was written
    pub model_path: PathBuf,
    /// Cleaned rows before the split, used for the console report
    pub table: TrainingTable,
    /// Held-out rows. Kept for later evaluation; not scored here.
    pub test: Partition,
}

/// Cleans the raw dataset into encoded rows.
///
/// # Errors
///
/// Returns an error if a required column is missing or a kept row does not
/// convert.
pub fn prepare(dataset: Dataset) -> Result<TrainingTable> {
    let table = dataset.replace_missing().training_table()?;
    tracing::info!(
        rows = table.n_rows(),
        dropped = table.dropped,
        "dataset cleaned"
    );
    Ok(table)
}

/// Splits and fits without touching the filesystem.
///
/// # Errors
///
/// Returns an error if the split is impossible. Rank-deficient partitions
/// still fit; constant columns get a zero weight.
pub fn fit_table(
    table: &TrainingTable,
    seed: u64,
    test_size: f64,
) -> Result<(LinearRegression, Partition, Partition)> {
    let (train, test) = train_test_split(&table.x, &table.y, test_size, seed)?;
    tracing::info!(n_train = train.len(), n_test = test.len(), seed, "split dataset");

    let mut model = LinearRegression::new();
    model.fit(&train.x, &train.y)?;
    if let Ok(r2) = model.score(&train.x, &train.y) {
        tracing::debug!(r2, "fit on training partition");
    }
    Ok((model, train, test))
}

/// Runs the whole pipeline and writes the artifact.
///
/// # Errors
///
/// Returns an error if the dataset is absent or malformed, fitting fails,
/// or the artifact cannot be written. Nothing is written on error.
pub fn train(config: &TrainingConfig) -> Result<TrainingOutcome> {
    tracing::info!(path = %config.data_path.display(), "reading dataset");
    let dataset = Dataset::load(&config.data_path)?;
    train_dataset(dataset, config.seed, config.test_size, &config.model_path)
}

/// Pipeline from an already loaded dataset.
///
/// # Errors
///
/// See [`train`].
pub fn train_dataset(
    dataset: Dataset,
    seed: u64,
    test_size: f64,
    model_path: &Path,
) -> Result<TrainingOutcome> {
    let table = prepare(dataset)?;
    let (model, train, test) = fit_table(&table, seed, test_size)?;

    let provenance = TrainingProvenance {
        seed,
        test_size,
        n_train: train.len(),
        n_test: test.len(),
        n_dropped: table.dropped,
    };
    let artifact = ModelArtifact::from_model(&model, provenance)?;
    artifact.save(model_path)?;

    Ok(TrainingOutcome {
        artifact,
        model_path: model_path.to_path_buf(),
        table,
        test,
    })
}
