//! Error types for key and seed operations.

use thiserror::Error;

/// Convenience alias for key operations.
pub type Result<T, E = KeyError> = std::result::Result<T, E>;

/// Errors that can occur during key and seed operations.
#[derive(Debug, Error)]
pub enum KeyError {
    /// Seed is missing or too short to derive keys from.
    #[error("invalid seed: {length} bytes, minimum is {minimum}")]
    InvalidSeed {
        /// Length of the rejected seed in bytes.
        length: usize,
        /// Minimum accepted seed length in bytes.
        minimum: usize,
    },

    /// Invalid key length.
    #[error("invalid key length: expected 32, got {0}")]
    InvalidKeyLength(usize),

    /// Invalid base64 encoding.
    #[error("invalid base64 encoding: {0}")]
    InvalidBase64(String),

    /// Key derivation failed.
    #[error("key derivation failed: {0}")]
    Derivation(String),
}
