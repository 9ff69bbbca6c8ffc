//! Error types for tabrecon operations

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ReconError>;

/// Which side of a comparison an error or event belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Source,
    Target,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Source => write!(f, "source"),
            Side::Target => write!(f, "target"),
        }
    }
}

#[derive(Error, Debug)]
pub enum ReconError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error(
        "The value of the key column (col: {column}, row: {row}) in the {side} data set can not be null"
    )]
    NullKey { side: Side, row: u64, column: usize },

    #[error("Key column ({column}) was not found. Expected one of: {known}")]
    KeyColumnNotFound { column: String, known: String },

    #[error("The number of changes detected is greater than the maximum allowed ({max})")]
    MaxChangesExceeded { max: u64 },

    #[error("Cursor error: {message}")]
    Cursor { message: String },

    #[error("Report sink error: {message}")]
    ReportSink { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    /// Failure of a cursor or sink implemented outside this crate
    #[error("Generic error: {0}")]
    Generic(#[from] anyhow::Error),
}

impl ReconError {
    pub fn null_key(side: Side, row: u64, column: usize) -> Self {
        Self::NullKey { side, row, column }
    }

    pub fn cursor(msg: impl Into<String>) -> Self {
        Self::Cursor {
            message: msg.into(),
        }
    }

    pub fn report_sink(msg: impl Into<String>) -> Self {
        Self::ReportSink {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: msg.into(),
        }
    }
}
