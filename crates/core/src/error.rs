//! Error types for packplan.

use thiserror::Error;

/// Result type alias for packplan operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised at the edges of the engine.
///
/// Packing strategies and sorters never fail: an item that cannot be placed
/// is simply absent from the output. These variants cover configuration
/// parsing, input decoding and I/O.
#[derive(Debug, Error)]
pub enum Error {
    /// Item with values that can never be represented.
    #[error("Invalid item: {0}")]
    InvalidItem(String),

    /// Unknown or malformed configuration value.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Malformed input line (1-based line number).
    #[error("Parse error on line {line}: {message}")]
    Parse {
        /// Line number where parsing failed.
        line: usize,
        /// What was wrong with the line.
        message: String,
    },

    /// Underlying I/O failure.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[cfg(feature = "serde")]
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl Error {
    /// Builds a parse error for the given line.
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }
}
