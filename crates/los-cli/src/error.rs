//! Error types for the los CLI.

use los_model::LosError;
use std::process::ExitCode;
use thiserror::Error;

/// Result type alias for CLI operations
pub(crate) type Result<T> = std::result::Result<T, CliError>;

/// CLI error types
#[derive(Error, Debug)]
pub(crate) enum CliError {
    /// Model or dataset file absent
    #[error("{0}")]
    FileNotFound(String),

    /// Dataset content does not convert
    #[error("Invalid dataset: {0}")]
    InvalidData(String),

    /// Artifact unreadable or does not match the feature schema
    #[error("Model load failed: {0}")]
    ModelLoadFailed(String),

    /// Fitting or splitting failed
    #[error("Training failed: {0}")]
    TrainingFailed(String),

    /// Bad command-line or prompt input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Anything else from the model library
    #[error("{0}")]
    Model(String),
}

impl CliError {
    /// Get exit code for this error
    pub(crate) fn exit_code(&self) -> ExitCode {
        match self {
            Self::Model(_) => ExitCode::from(1),
            Self::InvalidInput(_) => ExitCode::from(2),
            Self::FileNotFound(_) => ExitCode::from(3),
            Self::InvalidData(_) => ExitCode::from(4),
            Self::TrainingFailed(_) => ExitCode::from(5),
            Self::ModelLoadFailed(_) => ExitCode::from(6),
            Self::Io(_) => ExitCode::from(7),
        }
    }
}

impl From<LosError> for CliError {
    fn from(e: LosError) -> Self {
        let message = e.to_string();
        match e {
            LosError::MissingFile { .. } => Self::FileNotFound(message),
            LosError::Csv { .. } | LosError::MissingColumn { .. } | LosError::MalformedValue { .. } => {
                Self::InvalidData(message)
            }
            LosError::SchemaMismatch { .. } | LosError::Serialization(_) => {
                Self::ModelLoadFailed(message)
            }
            LosError::Training(_) | LosError::DimensionMismatch { .. } => {
                Self::TrainingFailed(message)
            }
            LosError::Io(io) => Self::Io(io),
            _ => Self::Model(message),
        }
    }
}
