//! CLI error types.

use thiserror::Error;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Project file could not be read or parsed.
    #[error("project error: {0}")]
    Project(String),

    /// Missing or invalid argument.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The generation engine rejected the request.
    #[error(transparent)]
    Topology(#[from] forge_topology::TopologyError),

    /// Seed or key error.
    #[error(transparent)]
    Key(#[from] forge_keys::KeyError),

    /// Rendering or sink error.
    #[error(transparent)]
    Config(#[from] forge_config::ConfigError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
