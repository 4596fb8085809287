//! Generation request parameters.

use std::net::IpAddr;

use forge_keys::Seed;
use ipnet::IpNet;

use crate::error::{Result, TopologyError};

/// Immutable configuration for one generation run.
///
/// A request is constructed once per generation call and never mutated —
/// the caller layer keeps whatever mutable project state it likes and
/// snapshots it into a request when it wants a graph.
#[derive(Debug, Clone)]
pub struct TopologyRequest {
    /// The secret seed all key material is derived from.
    pub seed: Seed,
    /// CIDR block for the virtual network.
    pub subnet: IpNet,
    /// Number of client peers.
    pub peer_count: usize,
    /// UDP port the server listens on.
    pub listen_port: u16,
    /// `host:port` advertised to clients. Opaque; commonly a DNS name.
    pub endpoint: String,
    /// Comma-separated CIDR list advertised to clients, passed through
    /// verbatim as their routing policy.
    pub allowed_ips: String,
    /// DNS servers for client interfaces; empty means no `DNS` line.
    pub dns: String,
    /// Whether the server takes the last (rather than first) usable address.
    pub use_last_address: bool,
    /// Whether to derive a preshared key per server-client pair.
    pub use_preshared_keys: bool,
    /// Hook command emitted verbatim as the server's `PostUp`.
    pub post_up: String,
    /// Hook command emitted verbatim as the server's `PostDown`.
    pub post_down: String,
}

impl TopologyRequest {
    /// Starts building a request for `seed` and `subnet`.
    #[must_use]
    pub fn builder(seed: Seed, subnet: IpNet) -> TopologyRequestBuilder {
        TopologyRequestBuilder::new(seed, subnet)
    }

    /// Parses a subnet string in CIDR notation.
    ///
    /// The returned network is normalized to its base address.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::InvalidSubnet`] if the CIDR suffix is
    /// missing or either half does not parse.
    pub fn parse_subnet(s: &str) -> Result<IpNet> {
        let s = s.trim();
        let Some((addr, prefix)) = s.split_once('/') else {
            return Err(TopologyError::InvalidSubnet(format!(
                "missing CIDR suffix in \"{s}\""
            )));
        };

        let prefix: u8 = prefix.parse().map_err(|_| {
            TopologyError::InvalidSubnet(format!("unparsable prefix length \"{prefix}\""))
        })?;

        let addr: IpAddr = addr.parse().map_err(|_| {
            TopologyError::InvalidSubnet(format!("unparsable address \"{addr}\""))
        })?;

        let net = IpNet::new(addr, prefix).map_err(|_| {
            TopologyError::InvalidSubnet(format!("prefix length /{prefix} too long for {addr}"))
        })?;
        Ok(net.trunc())
    }
}

/// Builder for [`TopologyRequest`].
#[derive(Debug, Clone)]
pub struct TopologyRequestBuilder {
    seed: Seed,
    subnet: IpNet,
    peer_count: usize,
    listen_port: u16,
    endpoint: String,
    allowed_ips: String,
    dns: String,
    use_last_address: bool,
    use_preshared_keys: bool,
    post_up: String,
    post_down: String,
}

impl TopologyRequestBuilder {
    /// Creates a builder with the conventional defaults: no clients, port
    /// 51820, route-everything allowed IPs.
    #[must_use]
    pub fn new(seed: Seed, subnet: IpNet) -> Self {
        Self {
            seed,
            subnet,
            peer_count: 0,
            listen_port: 51820,
            endpoint: String::new(),
            allowed_ips: "0.0.0.0/0, ::/0".to_string(),
            dns: String::new(),
            use_last_address: false,
            use_preshared_keys: false,
            post_up: String::new(),
            post_down: String::new(),
        }
    }

    /// Sets the number of client peers.
    #[must_use]
    pub fn peer_count(mut self, count: usize) -> Self {
        self.peer_count = count;
        self
    }

    /// Sets the server listen port.
    #[must_use]
    pub fn listen_port(mut self, port: u16) -> Self {
        self.listen_port = port;
        self
    }

    /// Sets the endpoint advertised to clients.
    #[must_use]
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Sets the allowed-IPs routing policy advertised to clients.
    #[must_use]
    pub fn allowed_ips(mut self, allowed_ips: impl Into<String>) -> Self {
        self.allowed_ips = allowed_ips.into();
        self
    }

    /// Sets the DNS servers for client interfaces.
    #[must_use]
    pub fn dns(mut self, dns: impl Into<String>) -> Self {
        self.dns = dns.into();
        self
    }

    /// Puts the server on the last usable address instead of the first.
    #[must_use]
    pub fn use_last_address(mut self, yes: bool) -> Self {
        self.use_last_address = yes;
        self
    }

    /// Derives a preshared key per server-client pair.
    #[must_use]
    pub fn use_preshared_keys(mut self, yes: bool) -> Self {
        self.use_preshared_keys = yes;
        self
    }

    /// Sets the server's `PostUp` hook command.
    #[must_use]
    pub fn post_up(mut self, cmd: impl Into<String>) -> Self {
        self.post_up = cmd.into();
        self
    }

    /// Sets the server's `PostDown` hook command.
    #[must_use]
    pub fn post_down(mut self, cmd: impl Into<String>) -> Self {
        self.post_down = cmd.into();
        self
    }

    /// Builds the request.
    #[must_use]
    pub fn build(self) -> TopologyRequest {
        TopologyRequest {
            seed: self.seed,
            subnet: self.subnet,
            peer_count: self.peer_count,
            listen_port: self.listen_port,
            endpoint: self.endpoint,
            allowed_ips: self.allowed_ips,
            dns: self.dns,
            use_last_address: self.use_last_address,
            use_preshared_keys: self.use_preshared_keys,
            post_up: self.post_up,
            post_down: self.post_down,
        }
    }
}
