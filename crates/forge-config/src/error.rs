//! Error types for configuration rendering and parsing.

use thiserror::Error;

/// Convenience alias for configuration operations.
pub type Result<T, E = ConfigError> = std::result::Result<T, E>;

/// Errors that can occur while writing or parsing configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The destination sink failed. Surfaced opaquely; retrying is the
    /// caller's business.
    #[error("failed to write configuration: {0}")]
    Io(#[from] std::io::Error),

    /// A line in the input could not be parsed.
    #[error("parse error at line {line}: {message}")]
    Parse {
        /// 1-based line number.
        line: usize,
        /// What went wrong.
        message: String,
    },
}
