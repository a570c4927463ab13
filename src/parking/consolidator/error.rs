use std::path::PathBuf;

use thiserror::Error;

/// Convenient alias for fallible results returned throughout the crate.
pub type Result<T> = std::result::Result<T, ConsolidationError>;

/// Fatal failures of a consolidation run.
///
/// Recoverable row-level problems never surface here; they are collected as
/// [`QualityWarning`](crate::model::QualityWarning)s instead.
#[derive(Debug, Error)]
pub enum ConsolidationError {
    /// Raised when the user provides a path that does not exist.
    #[error("input file not found: {0}")]
    InputNotFound(PathBuf),

    /// Raised when a workbook is readable but does not have the expected shape.
    #[error("malformed input {path}: {reason}")]
    InputMalformed { path: PathBuf, reason: String },

    /// Raised when more spots are allocated or free than the site holds.
    #[error("{allocated} allocated + {free} free spots exceed the capacity of {capacity}")]
    CapacityExceeded {
        allocated: usize,
        free: usize,
        capacity: usize,
    },

    /// Raised in strict mode when the run produced quality warnings.
    #[error("{0} quality warning(s) recorded in strict mode")]
    StrictWarnings(usize),

    /// Wrapper for IO failures such as reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Raised when JSON serialization fails.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Errors bubbled up from the Excel reader implementation.
    #[error("Excel read error: {0}")]
    ExcelRead(#[from] calamine::XlsxError),

    /// Errors bubbled up from the Excel writer implementation.
    #[error("Excel write error: {0}")]
    ExcelWrite(#[from] rust_xlsxwriter::XlsxError),

    /// Raised when the tracing subscriber fails to initialise.
    #[error("failed to initialise logging: {0}")]
    Logging(String),
}

impl ConsolidationError {
    pub(crate) fn malformed(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::InputMalformed {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
