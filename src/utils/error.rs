use thiserror::Error;

/// Errors raised by the computer list engine
#[derive(Error, Debug)]
pub enum FilterError {
    /// Parameter key is not part of the list's query contract
    #[error("Unknown filter parameter: {0}")]
    UnknownParameter(String),

    /// Parameter value cannot be parsed for its key
    #[error("Invalid value {value:?} for parameter {key}")]
    InvalidValue { key: &'static str, value: String },

    /// Error from I/O operations
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error from JSON serialization/deserialization
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Result type for the list engine
pub type FilterResult<T> = Result<T, FilterError>;
