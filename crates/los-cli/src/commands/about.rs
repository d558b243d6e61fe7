//! About command implementation
//!
//! Shows the raw dataset: a preview, numeric summaries, correlations and
//! mean length of stay by gender.

use crate::error::Result;
use crate::output;
use los_model::data::Dataset;
use los_model::report::{bar_chart, render_describe, AboutReport, BAR_WIDTH};
use std::path::Path;

/// Run the about command
pub(crate) fn run(data_path: &Path) -> Result<()> {
    let dataset = Dataset::load(data_path)?;
    let report = AboutReport::build(&dataset);

    output::section("About Dataset");
    output::kv("File", data_path.display());
    output::kv("Rows", dataset.n_rows());
    output::kv("Columns", dataset.headers().len());

    output::section("Preview");
    output::block(&report.preview.render());

    output::section("Summary Statistics");
    if report.summary.is_empty() {
        output::warning("no numeric columns");
    } else {
        output::block(&render_describe(&report.summary));
    }

    output::section("Correlation Matrix");
    if report.correlation.names.is_empty() {
        output::warning("no numeric columns");
    } else {
        output::block(&report.correlation.render());
    }

    output::section("Mean Length of Stay by Gender");
    match &report.los_by_gender {
        Ok(groups) if !groups.is_empty() => output::block(&bar_chart(groups, BAR_WIDTH)),
        Ok(_) => output::warning("no rows with both gender and length of stay"),
        Err(reason) => output::warning(reason),
    }
    Ok(())
}
