//! Crate-wide error type.
//!
//! Each variant carries a stable process exit code so the binary can report
//! *what kind* of failure stopped the run:
//!
//! - `2`: unreadable or malformed input tables
//! - `3`: data-integrity violations (unknown options, empty data)
//! - `4`: estimation failures
//! - `5`: output failures

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConjointError {
    /// A design cell is empty, an option index is not an integer, or the
    /// table is otherwise not a rectangular attribute × option grid.
    #[error("Malformed design table: {0}")]
    MalformedDesign(String),

    /// A rating column matched the prefix but its suffix is not an integer.
    #[error("Cannot derive an option index from rating column `{column}` (expected `{prefix}<integer>`)")]
    UnparseableColumn { column: String, prefix: String },

    /// Two rating columns resolve to the same option index (e.g. `QA_1` and `QA_01`).
    #[error("Rating columns `{first}` and `{second}` both refer to option {option}")]
    DuplicateOptionColumn { option: i64, first: String, second: String },

    /// A response references an option the design does not define.
    #[error("Respondent `{respondent}` rated option {option}, which is not defined in the design")]
    UnknownOption { respondent: String, option: i64 },

    /// A partition reached the estimator without any rows.
    #[error("Partition `{0}` has no rows to estimate")]
    EmptyPartition(String),

    #[error("Missing required column `{column}` in {table}")]
    MissingColumn { table: &'static str, column: String },

    #[error("Missing value for `{column}` (line {line})")]
    MissingValue { line: usize, column: String },

    #[error("Invalid rating '{value}' in column `{column}` (line {line})")]
    InvalidRating {
        line: usize,
        column: String,
        value: String,
    },

    #[error("Respondent id `{0}` appears more than once in the survey")]
    DuplicateRespondent(String),

    #[error("Least-squares fit failed for partition `{0}` (non-finite solution)")]
    FitFailed(String),

    #[error("No usable data: {0}")]
    EmptyInput(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Chart rendering failed: {0}")]
    Chart(String),
}

impl ConjointError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Process exit code for this failure class.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::MalformedDesign(_)
            | Self::UnparseableColumn { .. }
            | Self::DuplicateOptionColumn { .. }
            | Self::MissingColumn { .. }
            | Self::MissingValue { .. }
            | Self::InvalidRating { .. }
            | Self::InvalidConfig(_)
            | Self::Csv(_) => 2,
            Self::UnknownOption { .. } | Self::DuplicateRespondent(_) | Self::EmptyInput(_) => 3,
            Self::EmptyPartition(_) | Self::FitFailed(_) => 4,
            Self::Io { .. } | Self::Json(_) | Self::Chart(_) => 5,
        }
    }
}
