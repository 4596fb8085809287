//! Error types for topology generation.

use forge_keys::KeyError;
use thiserror::Error;

/// Convenience alias for topology operations.
pub type Result<T, E = TopologyError> = std::result::Result<T, E>;

/// Errors that can occur while building a topology.
#[derive(Debug, Error)]
pub enum TopologyError {
    /// Subnet string could not be parsed.
    #[error("invalid subnet: {0}")]
    InvalidSubnet(String),

    /// Requested peer count exceeds the subnet's usable host capacity.
    #[error("subnet exhausted: {required} addresses required, capacity is {capacity}")]
    SubnetExhausted {
        /// Number of usable host addresses in the subnet.
        capacity: u128,
        /// Number of addresses the request needs (peer count + server).
        required: u128,
    },

    /// Listen port outside the valid range.
    #[error("invalid listen port: {0}")]
    InvalidListenPort(u16),

    /// Seed or key error from the derivation engine.
    #[error(transparent)]
    Key(#[from] KeyError),

    /// Several validation violations collected from one build call.
    #[error("{}", join_violations(.0))]
    Validation(Vec<TopologyError>),
}

fn join_violations(violations: &[TopologyError]) -> String {
    let joined = violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ");
    format!("{} validation errors: {joined}", violations.len())
}
