//! Error types for length-of-stay operations.
//!
//! One enum covers dataset loading, training, artifact I/O and serving
//! startup. Per-request rejections are not errors; see
//! [`crate::service::Rejection`].

use std::fmt;
use std::path::PathBuf;

/// Main error type for the training pipeline and prediction service.
///
/// # Examples
///
/// ```
/// use los_model::error::LosError;
///
/// let err = LosError::MissingFile {
///     what: "model",
///     path: "models/linear_regression_los.json".into(),
/// };
/// assert!(err.to_string().contains("models/linear_regression_los.json"));
/// ```
#[derive(Debug)]
pub enum LosError {
    /// A required input file does not exist.
    MissingFile {
        /// Human name of the file ("model", "dataset")
        what: &'static str,
        /// Configured path that was checked
        path: PathBuf,
    },

    /// Dataset could not be read as delimited text.
    Csv {
        /// Dataset path
        path: PathBuf,
        /// Underlying parser message
        message: String,
    },

    /// A required column is absent from the dataset header.
    MissingColumn {
        /// Column name
        column: String,
        /// Columns that were found
        available: Vec<String>,
    },

    /// A cell could not be converted to the type its column requires.
    MalformedValue {
        /// 1-based data line (header is line 1)
        line: usize,
        /// Column name
        column: String,
        /// Raw cell text (`None` for a missing cell)
        value: Option<String>,
        /// What was expected
        expected: &'static str,
    },

    /// Matrix/vector dimensions don't match for the operation.
    DimensionMismatch {
        /// Expected dimensions description
        expected: String,
        /// Actual dimensions found
        actual: String,
    },

    /// Fitting failed (no rows, mismatched shapes, bad split).
    Training(String),

    /// Artifact content does not match the shared feature schema.
    SchemaMismatch {
        /// Description of the mismatch
        message: String,
    },

    /// I/O error (permission denied, rename failure, etc.).
    Io(std::io::Error),

    /// Serialization/deserialization error.
    Serialization(String),

    /// Generic error with string message.
    Other(String),
}

impl fmt::Display for LosError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LosError::MissingFile { what, path } => {
                write!(f, "{what} file not found: {}", path.display())
            }
            LosError::Csv { path, message } => {
                write!(f, "failed to read dataset {}: {message}", path.display())
            }
            LosError::MissingColumn { column, available } => {
                write!(
                    f,
                    "required column '{column}' not found (available: {})",
                    available.join(", ")
                )
            }
            LosError::MalformedValue {
                line,
                column,
                value,
                expected,
            } => match value {
                Some(v) => write!(
                    f,
                    "line {line}: column '{column}' has value '{v}', expected {expected}"
                ),
                None => write!(
                    f,
                    "line {line}: column '{column}' is missing, expected {expected}"
                ),
            },
            LosError::DimensionMismatch { expected, actual } => {
                write!(f, "dimension mismatch: expected {expected}, got {actual}")
            }
            LosError::Training(msg) => write!(f, "training failed: {msg}"),
            LosError::SchemaMismatch { message } => {
                write!(f, "model artifact does not match feature schema: {message}")
            }
            LosError::Io(e) => write!(f, "I/O error: {e}"),
            LosError::Serialization(msg) => write!(f, "serialization error: {msg}"),
            LosError::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for LosError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LosError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for LosError {
    fn from(err: std::io::Error) -> Self {
        LosError::Io(err)
    }
}

impl From<&str> for LosError {
    fn from(msg: &str) -> Self {
        LosError::Other(msg.to_string())
    }
}

impl From<String> for LosError {
    fn from(msg: String) -> Self {
        LosError::Other(msg)
    }
}

impl From<serde_json::Error> for LosError {
    fn from(err: serde_json::Error) -> Self {
        LosError::Serialization(err.to_string())
    }
}

impl LosError {
    /// Create a dimension mismatch error with descriptive context
    #[must_use]
    pub fn dimension_mismatch(context: &str, expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch {
            expected: format!("{context}={expected}"),
            actual: format!("{actual}"),
        }
    }

    /// Returns true for startup errors caused by an absent input file.
    #[must_use]
    pub fn is_missing_file(&self) -> bool {
        matches!(self, Self::MissingFile { .. })
    }
}

/// Convenience type alias for Results.
pub type Result<T> = std::result::Result<T, LosError>;
