//! Train command implementation
//!
//! Prints the first rows as read, then fits the model on the cleaned
//! dataset and writes the artifact, with a preview of the cleaned rows and
//! their correlation with the target.

use crate::error::Result;
use crate::output;
use los_model::config::PREVIEW_ROWS;
use los_model::data::Dataset;
use los_model::features::FEATURE_NAMES;
use los_model::report::{Preview, TrainingReport};
use los_model::training::{train_dataset, TrainingConfig};

/// Run the train command
pub(crate) fn run(config: &TrainingConfig) -> Result<()> {
    let dataset = Dataset::load(&config.data_path)?;
    output::section("Raw Data");
    output::block(&Preview::of_dataset(&dataset, PREVIEW_ROWS).render());

    let outcome = train_dataset(dataset, config.seed, config.test_size, &config.model_path)?;
    let report = TrainingReport::build(&outcome.table)?;

    output::section("Cleaned Data");
    output::block(&report.preview.render());
    output::kv("Rows used", outcome.table.n_rows());
    output::kv("Rows dropped (no target)", outcome.table.dropped);

    output::section("Correlation");
    output::block(&report.correlation.render());

    output::section("Model");
    output::kv("Train rows", outcome.artifact.training.n_train);
    output::kv("Held-out rows", outcome.artifact.training.n_test);
    output::kv("Seed", outcome.artifact.training.seed);
    for (name, weight) in FEATURE_NAMES.iter().zip(&outcome.artifact.coefficients) {
        output::kv(name, format!("{weight:.4}"));
    }
    output::kv("intercept", format!("{:.4}", outcome.artifact.intercept));

    println!();
    output::success(&format!("Model saved to {}", outcome.model_path.display()));
    Ok(())
}
