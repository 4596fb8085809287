//! WireGuard configuration file rendering and parsing.
//!
//! The writer serializes any single [`PeerNode`](forge_topology::PeerNode)
//! of a built graph into the canonical `.conf` INI-like format, independent
//! of how the graph was built. The parser reads the same format back and is
//! what the round-trip tests verify the writer against.

pub mod error;
mod parser;
mod script;
mod writer;

pub use error::{ConfigError, Result};
pub use parser::{parse, ParsedConfig, ParsedPeer};
pub use script::render_deploy_script;
pub use writer::{render, write_to};
