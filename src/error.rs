//! Error types shared by every view.

use thiserror::Error;

/// Errors surfaced to the user of a view.
///
/// Every failure is detected at the boundary of a single call and turned into
/// one message; none of them are retried.
#[derive(Debug, Error)]
pub enum AppError {
    /// Required upstream data (dataset, column selection) is absent.
    #[error("{0}")]
    MissingInput(String),

    /// Fewer categories were selected than the matrix needs.
    #[error("Select at least {required} categories to build the matrix (got {actual})")]
    InsufficientSelection {
        /// Minimum number of categories
        required: usize,
        /// Number of distinct categories selected
        actual: usize,
    },

    /// A column could not be parsed, was not found, or a parameter is out of range.
    #[error("Malformed data: {0}")]
    MalformedData(String),

    /// The CSV reader failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Reading or writing a file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Drawing or encoding an image failed.
    #[error("Render error: {0}")]
    Render(String),

    /// The embedded explanation table could not be read.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    /// Create a MissingInput error.
    pub fn missing_input(message: impl Into<String>) -> Self {
        Self::MissingInput(message.into())
    }

    /// Create a MalformedData error.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedData(message.into())
    }

    /// Create an InsufficientSelection error.
    pub fn insufficient_selection(required: usize, actual: usize) -> Self {
        Self::InsufficientSelection { required, actual }
    }

    /// The single message shown to the end user.
    pub fn user_message(&self) -> String {
        match self {
            AppError::MissingInput(message) => message.clone(),
            AppError::InsufficientSelection { required, .. } => format!(
                "Please select at least {} categories to compare",
                required
            ),
            other => other.to_string(),
        }
    }
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, AppError>;
