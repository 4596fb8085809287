//! WGForge command-line interface.
//!
//! Thin caller layer around the generation engine: builds a
//! [`TopologyRequest`](forge_topology::TopologyRequest) from flags or a
//! persisted JSON project file, and writes or previews the resulting
//! artifacts. All project state lives here; the engine below is a pure
//! function of the request.

pub mod cli;
pub mod commands;
pub mod error;
pub mod project;

pub use error::CliError;
