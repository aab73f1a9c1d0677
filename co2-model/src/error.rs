//! Error types for loading datasets

use thiserror::Error;

/// Main error type for dataset loading
#[derive(Error, Debug)]
pub enum ModelError {
    /// Failed to parse CSV data
    #[error("Failed to parse CSV: {0}")]
    CsvParse(#[from] csv::Error),

    /// Failed to parse JSON data
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Failed to read input
    #[error("Failed to read input: {0}")]
    Io(#[from] std::io::Error),
}

/// Type alias for Results using ModelError
pub type Result<T> = std::result::Result<T, ModelError>;
