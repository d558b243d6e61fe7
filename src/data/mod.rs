//! Dataset loading and cleaning.
//!
//! [`Dataset`] holds the CSV as trimmed text cells (empty cells become
//! `None`). Training calls [`Dataset::replace_missing`] and then
//! [`Dataset::training_table`]; the about view works on the raw table.

use crate::error::{LosError, Result};
use crate::features::{Gender, FEATURE_NAMES, N_FEATURES, RCOUNT_SENTINEL, RCOUNT_SENTINEL_VALUE, TARGET_NAME};
use crate::primitives::{Matrix, Vector};
use std::path::{Path, PathBuf};

/// Literal placeholder the dataset uses for unknown values.
pub const MISSING_SENTINEL: &str = "?";

/// One data row with its source line.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// 1-based line in the source file (header is line 1)
    pub line: usize,
    /// Cells aligned with [`Dataset::headers`]
    pub cells: Vec<Option<String>>,
}

/// Raw tabular dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    path: PathBuf,
    headers: Vec<String>,
    records: Vec<Record>,
}

impl Dataset {
    /// Loads a comma-delimited file with a header row.
    ///
    /// # Errors
    ///
    /// Returns [`LosError::MissingFile`] if the path does not exist and
    /// [`LosError::Csv`] for unreadable or ragged content.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(LosError::MissingFile {
                what: "dataset",
                path: path.to_path_buf(),
            });
        }

        let csv_err = |e: csv::Error| LosError::Csv {
            path: path.to_path_buf(),
            message: e.to_string(),
        };

        let mut reader = csv::Reader::from_path(path).map_err(csv_err)?;
        let headers: Vec<String> = reader
            .headers()
            .map_err(csv_err)?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let mut records = Vec::new();
        for result in reader.records() {
            let record = result.map_err(csv_err)?;
            let line = record
                .position()
                .map_or(records.len() + 2, |p| p.line() as usize);
            let cells = record
                .iter()
                .map(|cell| {
                    let cell = cell.trim();
                    (!cell.is_empty()).then(|| cell.to_string())
                })
                .collect();
            records.push(Record { line, cells });
        }

        tracing::debug!(path = %path.display(), rows = records.len(), "dataset loaded");

        Ok(Self {
            path: path.to_path_buf(),
            headers,
            records,
        })
    }

    /// Builds a dataset from in-memory rows. Used by tests and tools that
    /// already hold the table.
    ///
    /// # Errors
    ///
    /// Returns an error if a row's width differs from the header.
    pub fn from_rows(headers: &[&str], rows: &[Vec<&str>]) -> Result<Self> {
        let mut records = Vec::with_capacity(rows.len());
        for (i, row) in rows.iter().enumerate() {
            if row.len() != headers.len() {
                return Err(LosError::dimension_mismatch("columns", headers.len(), row.len()));
            }
            let cells = row
                .iter()
                .map(|c| {
                    let c = c.trim();
                    (!c.is_empty()).then(|| c.to_string())
                })
                .collect();
            records.push(Record { line: i + 2, cells });
        }
        Ok(Self {
            path: PathBuf::from("<memory>"),
            headers: headers.iter().map(|h| (*h).to_string()).collect(),
            records,
        })
    }

    /// Path the dataset was read from.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Column names in file order.
    #[must_use]
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Data rows in file order.
    #[must_use]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Number of data rows.
    #[must_use]
    pub fn n_rows(&self) -> usize {
        self.records.len()
    }

    /// Position of a column.
    ///
    /// # Errors
    ///
    /// Returns [`LosError::MissingColumn`] if the header lacks `name`.
    pub fn column_index(&self, name: &str) -> Result<usize> {
        self.headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| LosError::MissingColumn {
                column: name.to_string(),
                available: self.headers.clone(),
            })
    }

    /// Returns true if the header contains `name`.
    #[must_use]
    pub fn has_column(&self, name: &str) -> bool {
        self.headers.iter().any(|h| h == name)
    }

    /// Cells of one column, in row order.
    ///
    /// # Errors
    ///
    /// Returns [`LosError::MissingColumn`] if the header lacks `name`.
    pub fn column(&self, name: &str) -> Result<Vec<Option<&str>>> {
        let idx = self.column_index(name)?;
        Ok(self
            .records
            .iter()
            .map(|r| r.cells.get(idx).and_then(|c| c.as_deref()))
            .collect())
    }

    /// Parses a column as numbers. Returns `None` when any present cell is
    /// not numeric, so text columns are skipped by numeric summaries.
    #[must_use]
    pub fn numeric_column(&self, name: &str) -> Option<Vec<Option<f64>>> {
        let cells = self.column(name).ok()?;
        let mut out = Vec::with_capacity(cells.len());
        for cell in cells {
            match cell {
                None => out.push(None),
                Some(text) => out.push(Some(text.parse::<f64>().ok()?)),
            }
        }
        Some(out)
    }

    /// Replaces the missing-value placeholder with `None` in every column.
    #[must_use]
    pub fn replace_missing(mut self) -> Self {
        for record in &mut self.records {
            for cell in &mut record.cells {
                if cell.as_deref() == Some(MISSING_SENTINEL) {
                    *cell = None;
                }
            }
        }
        self
    }

    /// Drops rows with no target and encodes the rest into the fixed
    /// feature set.
    ///
    /// Expects [`Dataset::replace_missing`] to have run first; a literal
    /// `?` left in a feature column is reported as malformed.
    ///
    /// # Errors
    ///
    /// Returns an error if a required column is absent or any kept row has
    /// a target, diagnosis count or indicator that does not convert.
    pub fn training_table(&self) -> Result<TrainingTable> {
        let target_idx = self.column_index(TARGET_NAME)?;
        let feature_idx: Vec<usize> = FEATURE_NAMES
            .iter()
            .map(|name| self.column_index(name))
            .collect::<Result<_>>()?;

        let mut x_data = Vec::with_capacity(self.records.len() * N_FEATURES);
        let mut y_data = Vec::with_capacity(self.records.len());
        let mut dropped = 0;
        let mut unknown_gender = 0;

        for record in &self.records {
            let cell = |idx: usize| record.cells.get(idx).and_then(|c| c.as_deref());

            let Some(raw_target) = cell(target_idx) else {
                dropped += 1;
                continue;
            };
            let target = parse_target(raw_target).ok_or_else(|| LosError::MalformedValue {
                line: record.line,
                column: TARGET_NAME.to_string(),
                value: Some(raw_target.to_string()),
                expected: "a finite number",
            })?;

            for (name, &idx) in FEATURE_NAMES.iter().zip(&feature_idx) {
                let raw = cell(idx);
                let value = match *name {
                    "rcount" => parse_rcount(raw).map(f64::from),
                    "gender" => Some(match raw.and_then(Gender::from_code) {
                        Some(gender) => gender.encode(),
                        None => {
                            unknown_gender += 1;
                            0.0
                        }
                    }),
                    _ => raw.and_then(parse_indicator),
                };
                let value = value.ok_or_else(|| LosError::MalformedValue {
                    line: record.line,
                    column: (*name).to_string(),
                    value: raw.map(str::to_string),
                    expected: expected_for(name),
                })?;
                x_data.push(value);
            }
            y_data.push(target);
        }

        if unknown_gender > 0 {
            tracing::warn!(
                rows = unknown_gender,
                "gender values outside {{M, F}} encoded as 0"
            );
        }

        let n_rows = y_data.len();
        let x = Matrix::from_vec(n_rows, N_FEATURES, x_data)?;

        Ok(TrainingTable {
            x,
            y: Vector::from_vec(y_data),
            dropped,
        })
    }
}

fn expected_for(feature: &str) -> &'static str {
    match feature {
        "rcount" => "a non-negative integer or '5+'",
        _ => "0 or 1",
    }
}

/// Normalizes a diagnosis count cell: `5+` is 5, otherwise a
/// non-negative integer.
///
/// # Examples
///
/// ```
/// use los_model::data::parse_rcount;
///
/// assert_eq!(parse_rcount(Some("5+")), Some(5));
/// assert_eq!(parse_rcount(Some("3")), Some(3));
/// assert_eq!(parse_rcount(Some("many")), None);
/// assert_eq!(parse_rcount(None), None);
/// ```
#[must_use]
pub fn parse_rcount(raw: Option<&str>) -> Option<u32> {
    let raw = raw?.trim();
    if raw == RCOUNT_SENTINEL {
        return Some(RCOUNT_SENTINEL_VALUE);
    }
    raw.parse::<u32>().ok()
}

/// Parses a binary indicator cell (`0`/`1`, also `0.0`/`1.0`).
#[must_use]
pub fn parse_indicator(raw: &str) -> Option<f64> {
    let value = raw.trim().parse::<f64>().ok()?;
    (value == 0.0 || value == 1.0).then_some(value)
}

/// Parses a target cell as a finite number.
#[must_use]
pub fn parse_target(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Cleaned, encoded rows ready for fitting.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingTable {
    /// Features in [`FEATURE_NAMES`] order
    pub x: Matrix<f64>,
    /// Length of stay per row
    pub y: Vector<f64>,
    /// Rows excluded for having no target
    pub dropped: usize,
}

impl TrainingTable {
    /// Number of usable rows.
    #[must_use]
    pub fn n_rows(&self) -> usize {
        self.y.len()
    }

    /// Features and target side by side, target last.
    ///
    /// # Errors
    ///
    /// Returns an error if the internal shapes disagree.
    pub fn with_target(&self) -> Result<Matrix<f64>> {
        let n = self.n_rows();
        let mut data = Vec::with_capacity(n * (N_FEATURES + 1));
        for i in 0..n {
            data.extend_from_slice(self.x.row(i).as_slice());
            data.push(self.y[i]);
        }
        Ok(Matrix::from_vec(n, N_FEATURES + 1, data)?)
    }
}
