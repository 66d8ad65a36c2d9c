//! Centralized error handling for datalyst.
//!
//! A single enum covers every failure the engines can produce. Profiling and
//! forecasting each abort the whole call on failure — there are no partial
//! results — and the message is what a presentation layer shows verbatim, so
//! `Display` renders the human-readable cause with no extra framing.

use std::fmt;

/// Main error type for datalyst operations.
#[derive(Debug)]
pub enum AnalystError {
    /// Profiling was asked to summarise a dataset with no rows (or no columns).
    EmptyInput,

    /// Any forecasting validation or fitting failure. Callers branch on
    /// "did it fail", not on why; the message carries the cause.
    Forecast(String),

    /// Data processing errors (Polars, parsing, etc.)
    DataProcessing(String),

    /// I/O errors (file operations, etc.)
    Io(std::io::Error),
}

impl fmt::Display for AnalystError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyInput => write!(f, "Profiling failed: dataset is empty"),
            Self::Forecast(msg) => write!(f, "{msg}"),
            Self::DataProcessing(msg) => write!(f, "Data processing error: {msg}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for AnalystError {}

impl From<std::io::Error> for AnalystError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<polars::error::PolarsError> for AnalystError {
    fn from(err: polars::error::PolarsError) -> Self {
        Self::DataProcessing(err.to_string())
    }
}

// Presentation layers want plain strings.
impl From<AnalystError> for String {
    fn from(err: AnalystError) -> Self {
        err.to_string()
    }
}

/// Result type alias for datalyst operations.
pub type Result<T> = std::result::Result<T, AnalystError>;
