//! Persisted project settings.
//!
//! A project file is a JSON snapshot of the generation parameters. The seed
//! is stored base64-encoded and is the only value in the file that must be
//! kept secret; regenerating it invalidates every previously issued peer
//! config, so that is an explicit user action (`wgforge seed`), never
//! something this layer does implicitly.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use forge_keys::Seed;
use forge_topology::{TopologyRequest, TopologyRequestBuilder};

use crate::cli::TopologyArgs;
use crate::error::CliError;

/// Project settings as persisted on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectSettings {
    /// Seed, base64-encoded.
    pub seed: String,
    /// Number of client peers.
    pub clients: usize,
    /// Subnet in CIDR notation.
    pub subnet: String,
    /// DNS servers for client interfaces.
    pub dns: String,
    /// `host:port` advertised to clients.
    pub endpoint: String,
    /// UDP port the server listens on.
    pub listen_port: u16,
    /// Routing policy advertised to clients.
    pub allowed_ips: String,
    /// Server on the last usable address.
    pub use_last_address: bool,
    /// Preshared key per server-client pair.
    pub use_preshared_keys: bool,
    /// Server `PostUp` hook.
    pub post_up: String,
    /// Server `PostDown` hook.
    pub post_down: String,
    /// Deploy-script command emitted once.
    pub command_once: String,
    /// Deploy-script command emitted per client.
    pub command_per_peer: String,
    /// File name of the deploy script.
    pub command_file_name: String,
}

impl Default for ProjectSettings {
    fn default() -> Self {
        Self {
            seed: String::new(),
            clients: 3,
            subnet: "10.0.0.0/24".to_string(),
            dns: String::new(),
            endpoint: "remote.endpoint.net:51820".to_string(),
            listen_port: 51820,
            allowed_ips: "0.0.0.0/0, ::/0".to_string(),
            use_last_address: false,
            use_preshared_keys: false,
            post_up: String::new(),
            post_down: String::new(),
            command_once: String::new(),
            command_per_peer: String::new(),
            command_file_name: "output.wgc".to_string(),
        }
    }
}

impl ProjectSettings {
    /// Loads settings from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Project`] if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, CliError> {
        let contents = fs::read_to_string(path)
            .map_err(|e| CliError::Project(format!("failed to read {}: {e}", path.display())))?;
        serde_json::from_str(&contents)
            .map_err(|e| CliError::Project(format!("failed to parse {}: {e}", path.display())))
    }

    /// Applies command-line overrides on top of these settings.
    pub fn apply_overrides(&mut self, args: &TopologyArgs) {
        if let Some(ref seed) = args.seed {
            self.seed.clone_from(seed);
        }
        if let Some(ref subnet) = args.subnet {
            self.subnet.clone_from(subnet);
        }
        if let Some(peers) = args.peers {
            self.clients = peers;
        }
        if let Some(port) = args.listen_port {
            self.listen_port = port;
        }
        if let Some(ref endpoint) = args.endpoint {
            self.endpoint.clone_from(endpoint);
        }
        if let Some(ref allowed_ips) = args.allowed_ips {
            self.allowed_ips.clone_from(allowed_ips);
        }
        if let Some(ref dns) = args.dns {
            self.dns.clone_from(dns);
        }
        if args.use_last_address {
            self.use_last_address = true;
        }
        if args.preshared_keys {
            self.use_preshared_keys = true;
        }
        if let Some(ref post_up) = args.post_up {
            self.post_up.clone_from(post_up);
        }
        if let Some(ref post_down) = args.post_down {
            self.post_down.clone_from(post_down);
        }
    }

    /// Resolves the effective settings for a run: project file (if given)
    /// with flags applied on top.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Project`] if the project file cannot be loaded.
    pub fn resolve(args: &TopologyArgs) -> Result<Self, CliError> {
        let mut settings = match args.project {
            Some(ref path) => Self::load(path)?,
            None => Self::default(),
        };
        settings.apply_overrides(args);
        Ok(settings)
    }

    /// Builds the engine request from these settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the seed is missing or not base64, or the subnet
    /// does not parse.
    pub fn to_request(&self) -> Result<TopologyRequest, CliError> {
        if self.seed.trim().is_empty() {
            return Err(CliError::InvalidArgument(
                "no seed provided; generate one with `wgforge seed`".to_string(),
            ));
        }
        let seed = Seed::from_base64(self.seed.trim())?;
        let subnet = TopologyRequest::parse_subnet(&self.subnet)?;

        Ok(TopologyRequestBuilder::new(seed, subnet)
            .peer_count(self.clients)
            .listen_port(self.listen_port)
            .endpoint(self.endpoint.clone())
            .allowed_ips(self.allowed_ips.clone())
            .dns(self.dns.clone())
            .use_last_address(self.use_last_address)
            .use_preshared_keys(self.use_preshared_keys)
            .post_up(self.post_up.clone())
            .post_down(self.post_down.clone())
            .build())
    }
}
