//! The peer graph produced by a build.

use std::fmt;
use std::net::IpAddr;

use forge_keys::{KeyPair, PresharedKey, PublicKey};
use serde::{Deserialize, Serialize};

/// Role of a peer in the hub-and-spoke topology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeerRole {
    /// The hub: listens on a port, references every client.
    Server,
    /// A spoke: references only the server.
    Client,
}

impl fmt::Display for PeerRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Server => write!(f, "server"),
            Self::Client => write!(f, "client"),
        }
    }
}

/// One `[Peer]` block a node should emit, pointing at another node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeerReference {
    /// The referenced peer's public key.
    pub public_key: PublicKey,
    /// Preshared key for this pairing, if the request asked for one.
    pub preshared_key: Option<PresharedKey>,
    /// Allowed IPs for this reference: the narrow `address/32` on
    /// server→client references, the request's broad routing policy on the
    /// client→server reference.
    pub allowed_ips: String,
    /// Present only on the client→server reference.
    pub endpoint: Option<String>,
}

/// One participant in the graph.
///
/// Nodes are read-only once built; the writer never mutates them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeerNode {
    /// Stable id derived from allocation order: 0 = server, 1..N = clients.
    pub id: u32,
    /// Server or client.
    pub role: PeerRole,
    /// Host address inside the subnet, without prefix.
    pub address: IpAddr,
    /// Prefix length this node's interface announces: the subnet prefix on
    /// the server, a single host (/32 or /128) on clients.
    pub address_prefix: u8,
    /// The node's derived key pair.
    pub keys: KeyPair,
    /// The node's preshared key (clients only, iff requested).
    pub preshared_key: Option<PresharedKey>,
    /// Listen port (server only).
    pub listen_port: Option<u16>,
    /// DNS servers (clients only, empty omitted).
    pub dns: Option<String>,
    /// `PostUp` hook (server only, empty omitted).
    pub post_up: Option<String>,
    /// `PostDown` hook (server only, empty omitted).
    pub post_down: Option<String>,
    /// The `[Peer]` blocks this node emits.
    pub peers: Vec<PeerReference>,
}

impl PeerNode {
    /// Human-readable label for previews: `Server` or `Peer <id>`.
    #[must_use]
    pub fn label(&self) -> String {
        match self.role {
            PeerRole::Server => "Server".to_string(),
            PeerRole::Client => format!("Peer {}", self.id),
        }
    }

    /// Output file name: `server.conf` or `peer-<id>.conf`.
    #[must_use]
    pub fn file_name(&self) -> String {
        match self.role {
            PeerRole::Server => "server.conf".to_string(),
            PeerRole::Client => format!("peer-{}.conf", self.id),
        }
    }
}

/// A fully built topology: one server and its clients, in id order.
///
/// Owned by the caller; holds nothing but the key material it contains, so
/// dropping it releases everything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeerGraph {
    /// The hub node.
    pub server: PeerNode,
    /// Client nodes, ordered by id.
    pub clients: Vec<PeerNode>,
}

impl PeerGraph {
    /// Iterates over all nodes, server first.
    pub fn nodes(&self) -> impl Iterator<Item = &PeerNode> {
        std::iter::once(&self.server).chain(self.clients.iter())
    }

    /// Total number of nodes (clients + server).
    #[must_use]
    pub fn len(&self) -> usize {
        self.clients.len() + 1
    }

    /// Never empty: a graph always has at least the server.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }
}
