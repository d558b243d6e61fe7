//! Dataset exploration views.
//!
//! The about view works on the raw dataset (no cleaning); the training
//! report works on the cleaned, encoded table. Both produce plain data
//! plus text renderers, and the CLI adds color on top.

use crate::config::PREVIEW_ROWS;
use crate::data::{Dataset, TrainingTable};
use crate::error::Result;
use crate::features::{FEATURE_NAMES, TARGET_NAME};
use crate::primitives::Matrix;
use crate::stats::{corr_matrix, pearson, ColumnSummary};
use std::collections::BTreeMap;
use std::fmt::Write as _;

/// Column grouped on for the length-of-stay chart.
pub const GROUP_COLUMN: &str = "gender";

/// Widest bar in [`bar_chart`].
pub const BAR_WIDTH: usize = 40;

/// First rows of a table, already stringified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preview {
    /// Column names
    pub headers: Vec<String>,
    /// Rows, missing cells shown as `NaN`
    pub rows: Vec<Vec<String>>,
}

impl Preview {
    /// Takes the first `n` rows of a raw dataset.
    #[must_use]
    pub fn of_dataset(dataset: &Dataset, n: usize) -> Self {
        let rows = dataset
            .records()
            .iter()
            .take(n)
            .map(|r| {
                r.cells
                    .iter()
                    .map(|c| c.clone().unwrap_or_else(|| "NaN".to_string()))
                    .collect()
            })
            .collect();
        Self {
            headers: dataset.headers().to_vec(),
            rows,
        }
    }

    /// Takes the first `n` rows of a numeric matrix.
    #[must_use]
    pub fn of_matrix(names: &[String], data: &Matrix<f64>, n: usize) -> Self {
        let rows = (0..data.n_rows().min(n))
            .map(|i| data.row(i).as_slice().iter().map(|v| format_number(*v)).collect())
            .collect();
        Self {
            headers: names.to_vec(),
            rows,
        }
    }

    /// Renders an aligned text table with a row index.
    #[must_use]
    pub fn render(&self) -> String {
        let mut headers = vec![String::new()];
        headers.extend(self.headers.iter().cloned());
        let rows: Vec<Vec<String>> = self
            .rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                let mut out = vec![i.to_string()];
                out.extend(row.iter().cloned());
                out
            })
            .collect();
        render_table(&headers, &rows)
    }
}

/// Summaries of every numeric column, in file order.
#[must_use]
pub fn describe(dataset: &Dataset) -> Vec<(String, ColumnSummary)> {
    dataset
        .headers()
        .iter()
        .filter_map(|name| {
            let values = dataset.numeric_column(name)?;
            ColumnSummary::from_values(&values).map(|s| (name.clone(), s))
        })
        .collect()
}

/// Renders [`describe`] output with statistics as rows, like a dataframe
/// `describe()`.
#[must_use]
pub fn render_describe(summaries: &[(String, ColumnSummary)]) -> String {
    let mut headers = vec![String::new()];
    headers.extend(summaries.iter().map(|(name, _)| name.clone()));

    let stats: [(&str, fn(&ColumnSummary) -> f64); 8] = [
        ("count", |s| s.count as f64),
        ("mean", |s| s.mean),
        ("std", |s| s.std),
        ("min", |s| s.min),
        ("25%", |s| s.q25),
        ("50%", |s| s.median),
        ("75%", |s| s.q75),
        ("max", |s| s.max),
    ];
    let rows: Vec<Vec<String>> = stats
        .iter()
        .map(|(label, get)| {
            let mut row = vec![(*label).to_string()];
            row.extend(summaries.iter().map(|(_, s)| format_number(get(s))));
            row
        })
        .collect();
    render_table(&headers, &rows)
}

/// Named square correlation matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct Correlation {
    /// Row and column names
    pub names: Vec<String>,
    /// Coefficients, `NaN` where undefined
    pub matrix: Matrix<f64>,
}

impl Correlation {
    /// Correlation over the numeric columns of a raw dataset. Each pair
    /// uses the rows where both values are present.
    #[must_use]
    pub fn of_dataset(dataset: &Dataset) -> Self {
        let columns: Vec<(String, Vec<Option<f64>>)> = dataset
            .headers()
            .iter()
            .filter_map(|name| dataset.numeric_column(name).map(|c| (name.clone(), c)))
            .collect();

        let p = columns.len();
        let mut values = vec![0.0; p * p];
        for i in 0..p {
            for j in 0..=i {
                let (a, b): (Vec<f64>, Vec<f64>) = columns[i]
                    .1
                    .iter()
                    .zip(&columns[j].1)
                    .filter_map(|(a, b)| Some(((*a)?, (*b)?)))
                    .unzip();
                let r = pearson(&a, &b);
                values[i * p + j] = r;
                values[j * p + i] = r;
            }
        }

        Self {
            names: columns.into_iter().map(|(name, _)| name).collect(),
            matrix: Matrix::from_vec(p, p, values).unwrap_or_else(|_| Matrix::zeros(p, p)),
        }
    }

    /// Correlation over a complete numeric matrix.
    #[must_use]
    pub fn of_matrix(names: Vec<String>, data: &Matrix<f64>) -> Self {
        Self {
            names,
            matrix: corr_matrix(data),
        }
    }

    /// Coefficient between two named columns.
    #[must_use]
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.names.iter().position(|n| n == a)?;
        let j = self.names.iter().position(|n| n == b)?;
        Some(self.matrix.get(i, j))
    }

    /// Renders the matrix as an aligned table.
    #[must_use]
    pub fn render(&self) -> String {
        let mut headers = vec![String::new()];
        headers.extend(self.names.iter().cloned());
        let rows: Vec<Vec<String>> = self
            .names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let mut row = vec![name.clone()];
                row.extend((0..self.names.len()).map(|j| format_number(self.matrix.get(i, j))));
                row
            })
            .collect();
        render_table(&headers, &rows)
    }
}

/// Mean of a value column for one group.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupMean {
    /// Group key as it appears in the data
    pub group: String,
    /// Mean of the numeric values in the group
    pub mean: f64,
    /// Values averaged
    pub count: usize,
}

/// Means `value_col` per distinct `group_col`, groups sorted by key.
/// Rows with a missing key or a non-numeric value are skipped.
///
/// # Errors
///
/// Returns [`crate::error::LosError::MissingColumn`] if either column is
/// absent.
pub fn mean_by_group(dataset: &Dataset, group_col: &str, value_col: &str) -> Result<Vec<GroupMean>> {
    let keys = dataset.column(group_col)?;
    let values = dataset.column(value_col)?;

    let mut acc: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for (key, value) in keys.into_iter().zip(values) {
        let (Some(key), Some(value)) = (key, value.and_then(|v| v.parse::<f64>().ok())) else {
            continue;
        };
        let entry = acc.entry(key).or_insert((0.0, 0));
        entry.0 += value;
        entry.1 += 1;
    }

    Ok(acc
        .into_iter()
        .map(|(group, (sum, count))| GroupMean {
            group: group.to_string(),
            mean: sum / count as f64,
            count,
        })
        .collect())
}

/// Horizontal bars scaled so the largest mean spans `width` cells.
#[must_use]
pub fn bar_chart(groups: &[GroupMean], width: usize) -> String {
    let max = groups.iter().map(|g| g.mean).fold(0.0_f64, f64::max);
    let label_width = groups.iter().map(|g| g.group.chars().count()).max().unwrap_or(0);

    let mut out = String::new();
    for g in groups {
        let len = if max > 0.0 && g.mean > 0.0 {
            ((g.mean / max) * width as f64).round() as usize
        } else {
            0
        };
        let _ = writeln!(
            out,
            "{:>label_width$} | {} {:.2}",
            g.group,
            "#".repeat(len),
            g.mean
        );
    }
    out
}

/// Everything the about view shows.
#[derive(Debug, Clone)]
pub struct AboutReport {
    /// First rows
    pub preview: Preview,
    /// Numeric column summaries
    pub summary: Vec<(String, ColumnSummary)>,
    /// Correlation over numeric columns
    pub correlation: Correlation,
    /// Mean length of stay by gender; `Err` carries the reason it is
    /// unavailable
    pub los_by_gender: std::result::Result<Vec<GroupMean>, String>,
}

impl AboutReport {
    /// Builds the view from the raw dataset.
    #[must_use]
    pub fn build(dataset: &Dataset) -> Self {
        let los_by_gender = mean_by_group(dataset, GROUP_COLUMN, TARGET_NAME).map_err(|e| {
            tracing::warn!(error = %e, "length of stay by gender unavailable");
            format!("columns '{GROUP_COLUMN}' and '{TARGET_NAME}' are required: {e}")
        });
        Self {
            preview: Preview::of_dataset(dataset, PREVIEW_ROWS),
            summary: describe(dataset),
            correlation: Correlation::of_dataset(dataset),
            los_by_gender,
        }
    }
}

/// Console report printed after training.
#[derive(Debug, Clone)]
pub struct TrainingReport {
    /// First cleaned rows, target last
    pub preview: Preview,
    /// Correlation of the features and the target
    pub correlation: Correlation,
}

impl TrainingReport {
    /// Builds the report from the cleaned table.
    ///
    /// # Errors
    ///
    /// Returns an error if the table shapes disagree.
    pub fn build(table: &TrainingTable) -> Result<Self> {
        let names: Vec<String> = FEATURE_NAMES
            .iter()
            .chain(std::iter::once(&TARGET_NAME))
            .map(|s| (*s).to_string())
            .collect();
        let data = table.with_target()?;
        Ok(Self {
            preview: Preview::of_matrix(&names, &data, PREVIEW_ROWS),
            correlation: Correlation::of_matrix(names, &data),
        })
    }
}

fn format_number(v: f64) -> String {
    if v.is_nan() {
        "NaN".to_string()
    } else if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{v:.0}")
    } else {
        format!("{v:.3}")
    }
}

fn render_table(headers: &[String], rows: &[Vec<String>]) -> String {
    let n_cols = headers.len();
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let mut line = |cells: &[String]| {
        let parts: Vec<String> = (0..n_cols)
            .map(|i| {
                let cell = cells.get(i).map_or("", String::as_str);
                format!("{:>width$}", cell, width = widths[i])
            })
            .collect();
        let _ = writeln!(out, "{}", parts.join("  ").trim_end());
    };
    line(headers);
    for row in rows {
        line(row);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset() -> Dataset {
        Dataset::from_rows(
            &["eid", "rcount", "gender", "facid", "lengthofstay"],
            &[
                vec!["1", "0", "F", "B", "3"],
                vec!["2", "5+", "M", "A", "7"],
                vec!["3", "1", "F", "B", "5"],
                vec!["4", "2", "M", "", "6"],
                vec!["5", "0", "", "E", "2"],
                vec!["6", "3", "M", "B", ""],
                vec!["7", "1", "F", "C", "4"],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_preview_takes_first_rows() {
        let p = Preview::of_dataset(&dataset(), 5);
        assert_eq!(p.rows.len(), 5);
        assert_eq!(p.headers.len(), 5);
        assert_eq!(p.rows[3][3], "NaN");
        let text = p.render();
        assert!(text.lines().next().unwrap().contains("lengthofstay"));
        assert_eq!(text.lines().count(), 6);
    }

    #[test]
    fn test_describe_skips_text_columns() {
        let s = describe(&dataset());
        let names: Vec<&str> = s.iter().map(|(n, _)| n.as_str()).collect();
        // rcount holds "5+", so only eid and lengthofstay are numeric.
        assert_eq!(names, vec!["eid", "lengthofstay"]);

        let (_, los) = &s[1];
        assert_eq!(los.count, 6);
        assert!((los.mean - 4.5).abs() < 1e-12);
        assert_eq!(los.min, 2.0);
        assert_eq!(los.max, 7.0);

        let text = render_describe(&s);
        assert!(text.contains("25%"));
        assert!(text.contains("4.500"));
    }

    #[test]
    fn test_correlation_pairwise_complete() {
        let ds = Dataset::from_rows(
            &["a", "b"],
            &[
                vec!["1", "2"],
                vec!["2", "4"],
                vec!["3", ""],
                vec!["4", "8"],
            ],
        )
        .unwrap();
        let c = Correlation::of_dataset(&ds);
        assert_eq!(c.names, vec!["a", "b"]);
        assert!((c.get("a", "b").unwrap() - 1.0).abs() < 1e-12);
        assert!((c.get("a", "a").unwrap() - 1.0).abs() < 1e-12);
        assert!(c.get("a", "zzz").is_none());
        assert!(c.render().contains('b'));
    }

    #[test]
    fn test_mean_by_group() {
        let groups = mean_by_group(&dataset(), "gender", "lengthofstay").unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].group, "F");
        assert!((groups[0].mean - 4.0).abs() < 1e-12);
        assert_eq!(groups[0].count, 3);
        assert_eq!(groups[1].group, "M");
        assert!((groups[1].mean - 6.5).abs() < 1e-12);
        assert_eq!(groups[1].count, 2);
    }

    #[test]
    fn test_mean_by_group_missing_column() {
        let ds = Dataset::from_rows(&["gender"], &[vec!["M"]]).unwrap();
        assert!(mean_by_group(&ds, "gender", "lengthofstay").is_err());

        let report = AboutReport::build(&ds);
        let reason = report.los_by_gender.unwrap_err();
        assert!(reason.contains("lengthofstay"));
    }

    #[test]
    fn test_bar_chart_scales_to_largest() {
        let groups = vec![
            GroupMean {
                group: "F".into(),
                mean: 2.0,
                count: 1,
            },
            GroupMean {
                group: "M".into(),
                mean: 4.0,
                count: 1,
            },
        ];
        let chart = bar_chart(&groups, 10);
        let lines: Vec<&str> = chart.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].matches('#').count(), 5);
        assert_eq!(lines[1].matches('#').count(), 10);
        assert!(lines[1].ends_with("4.00"));
    }

    #[test]
    fn test_about_report() {
        let report = AboutReport::build(&dataset());
        assert_eq!(report.preview.rows.len(), PREVIEW_ROWS);
        assert_eq!(report.summary.len(), 2);
        assert_eq!(report.correlation.names.len(), 2);
        assert_eq!(report.los_by_gender.unwrap().len(), 2);
    }

    #[test]
    fn test_training_report() {
        let ds = Dataset::from_rows(
            &["rcount", "gender", "asthma", "pneum", "depress", "lengthofstay"],
            &[
                vec!["0", "F", "0", "0", "0", "2"],
                vec!["1", "M", "1", "0", "0", "3.5"],
                vec!["2", "F", "0", "1", "0", "5"],
                vec!["5+", "M", "0", "0", "1", "9"],
            ],
        )
        .unwrap();
        let table = ds.replace_missing().training_table().unwrap();
        let report = TrainingReport::build(&table).unwrap();

        assert_eq!(report.correlation.names.len(), 6);
        assert_eq!(report.correlation.names[5], "lengthofstay");
        assert!(report.correlation.get("rcount", "lengthofstay").unwrap() > 0.9);
        assert_eq!(report.preview.rows[3][0], "5");
        assert_eq!(report.preview.rows[1][5], "3.500");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(f64::NAN), "NaN");
        assert_eq!(format_number(3.0), "3");
        assert_eq!(format_number(0.12345), "0.123");
    }
}
