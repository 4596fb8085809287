//! Parsing of WireGuard configuration text.
//!
//! Reads the same INI-like grammar the writer emits. Used by the round-trip
//! tests and by callers that need to inspect an existing configuration;
//! unknown keys are ignored so configs from other tooling still load.

use forge_keys::{PresharedKey, PrivateKey, PublicKey};

use crate::error::{ConfigError, Result};

/// A parsed `[Interface]` section with its `[Peer]` blocks.
#[derive(Debug, Clone)]
pub struct ParsedConfig {
    /// The interface's private key.
    pub private_key: PrivateKey,
    /// The `Address` directive, verbatim (`addr/prefix`).
    pub address: Option<String>,
    /// Listen port, if configured.
    pub listen_port: Option<u16>,
    /// DNS servers, verbatim.
    pub dns: Option<String>,
    /// `PostUp` hook, verbatim.
    pub post_up: Option<String>,
    /// `PostDown` hook, verbatim.
    pub post_down: Option<String>,
    /// Peer blocks in file order.
    pub peers: Vec<ParsedPeer>,
}

/// One parsed `[Peer]` block.
#[derive(Debug, Clone)]
pub struct ParsedPeer {
    /// The peer's public key.
    pub public_key: PublicKey,
    /// Preshared key, if present.
    pub preshared_key: Option<PresharedKey>,
    /// The `AllowedIPs` directive, verbatim.
    pub allowed_ips: Option<String>,
    /// The `Endpoint` directive, verbatim.
    pub endpoint: Option<String>,
}

/// Parser state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    None,
    Interface,
    Peer,
}

/// Parses WireGuard configuration text.
///
/// # Errors
///
/// Returns [`ConfigError::Parse`] with a line number for unknown sections,
/// malformed lines, or invalid key material; a missing `PrivateKey` is also
/// an error.
pub fn parse(input: &str) -> Result<ParsedConfig> {
    let mut section = Section::None;
    let mut private_key: Option<PrivateKey> = None;
    let mut address: Option<String> = None;
    let mut listen_port: Option<u16> = None;
    let mut dns: Option<String> = None;
    let mut post_up: Option<String> = None;
    let mut post_down: Option<String> = None;
    let mut peers: Vec<ParsedPeer> = Vec::new();
    let mut current_peer: Option<PendingPeer> = None;

    for (line_num, line) in input.lines().enumerate() {
        let line = line.trim();
        let line_number = line_num + 1;

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line.starts_with('[') && line.ends_with(']') {
            if let Some(peer) = current_peer.take() {
                peers.push(peer.finish(line_number)?);
            }

            let section_name = &line[1..line.len() - 1];
            section = match section_name {
                "Interface" => Section::Interface,
                "Peer" => {
                    current_peer = Some(PendingPeer::default());
                    Section::Peer
                }
                _ => {
                    return Err(ConfigError::Parse {
                        line: line_number,
                        message: format!("unknown section: {section_name}"),
                    });
                }
            };
            continue;
        }

        let Some((key, value)) = line.split_once('=') else {
            return Err(ConfigError::Parse {
                line: line_number,
                message: format!("invalid line format: {line}"),
            });
        };

        let key = key.trim();
        let value = value.trim();

        match section {
            Section::None => {
                return Err(ConfigError::Parse {
                    line: line_number,
                    message: "key-value pair outside of section".to_string(),
                });
            }
            Section::Interface => match key {
                "PrivateKey" => {
                    private_key =
                        Some(PrivateKey::from_base64(value).map_err(|_| ConfigError::Parse {
                            line: line_number,
                            message: "invalid PrivateKey".to_string(),
                        })?);
                }
                "Address" => address = Some(value.to_string()),
                "ListenPort" => {
                    listen_port = Some(value.parse().map_err(|_| ConfigError::Parse {
                        line: line_number,
                        message: "invalid ListenPort".to_string(),
                    })?);
                }
                "DNS" => dns = Some(value.to_string()),
                "PostUp" => post_up = Some(value.to_string()),
                "PostDown" => post_down = Some(value.to_string()),
                _ => {}
            },
            Section::Peer => {
                if let Some(ref mut peer) = current_peer {
                    peer.set(key, value, line_number)?;
                }
            }
        }
    }

    if let Some(peer) = current_peer {
        let last_line = input.lines().count();
        peers.push(peer.finish(last_line)?);
    }

    let private_key = private_key.ok_or_else(|| ConfigError::Parse {
        line: 0,
        message: "missing PrivateKey in [Interface] section".to_string(),
    })?;

    Ok(ParsedConfig {
        private_key,
        address,
        listen_port,
        dns,
        post_up,
        post_down,
        peers,
    })
}

/// Peer block under construction during parsing.
#[derive(Default)]
struct PendingPeer {
    public_key: Option<PublicKey>,
    preshared_key: Option<PresharedKey>,
    allowed_ips: Option<String>,
    endpoint: Option<String>,
}

impl PendingPeer {
    fn set(&mut self, key: &str, value: &str, line_number: usize) -> Result<()> {
        match key {
            "PublicKey" => {
                self.public_key =
                    Some(PublicKey::from_base64(value).map_err(|_| ConfigError::Parse {
                        line: line_number,
                        message: "invalid PublicKey".to_string(),
                    })?);
            }
            "PresharedKey" => {
                self.preshared_key =
                    Some(PresharedKey::from_base64(value).map_err(|_| ConfigError::Parse {
                        line: line_number,
                        message: "invalid PresharedKey".to_string(),
                    })?);
            }
            "AllowedIPs" => self.allowed_ips = Some(value.to_string()),
            "Endpoint" => self.endpoint = Some(value.to_string()),
            _ => {}
        }
        Ok(())
    }

    fn finish(self, line_number: usize) -> Result<ParsedPeer> {
        let public_key = self.public_key.ok_or_else(|| ConfigError::Parse {
            line: line_number,
            message: "missing PublicKey in [Peer] section".to_string(),
        })?;

        Ok(ParsedPeer {
            public_key,
            preshared_key: self.preshared_key,
            allowed_ips: self.allowed_ips,
            endpoint: self.endpoint,
        })
    }
}

#[cfg(test)]
mod tests {
    use forge_keys::KEY_SIZE;
    use test_case::test_case;

    use super::*;

    fn key_b64(byte: u8) -> String {
        PrivateKey::from_bytes(&[byte; KEY_SIZE])
            .expect("valid key")
            .to_base64()
    }

    #[test]
    fn parse_minimal_interface() {
        let input = format!("[Interface]\nPrivateKey = {}\n", key_b64(1));
        let config = parse(&input).expect("parse failed");
        assert!(config.peers.is_empty());
        assert_eq!(config.private_key.to_base64(), key_b64(1));
    }

    #[test]
    fn parse_full_server_config() {
        let input = format!(
            "[Interface]\n\
             PrivateKey = {}\n\
             Address = 10.0.0.1/24\n\
             ListenPort = 51820\n\
             PostUp = echo up\n\
             PostDown = echo down\n\
             \n\
             [Peer]\n\
             PublicKey = {}\n\
             AllowedIPs = 10.0.0.2/32\n",
            key_b64(1),
            key_b64(2),
        );
        let config = parse(&input).expect("parse failed");
        assert_eq!(config.address.as_deref(), Some("10.0.0.1/24"));
        assert_eq!(config.listen_port, Some(51820));
        assert_eq!(config.post_up.as_deref(), Some("echo up"));
        assert_eq!(config.peers.len(), 1);
        assert_eq!(config.peers[0].allowed_ips.as_deref(), Some("10.0.0.2/32"));
    }

    #[test]
    fn parse_client_config_with_endpoint() {
        let input = format!(
            "[Interface]\n\
             PrivateKey = {}\n\
             Address = 10.0.0.2/32\n\
             DNS = 1.1.1.1\n\
             \n\
             [Peer]\n\
             PublicKey = {}\n\
             PresharedKey = {}\n\
             AllowedIPs = 0.0.0.0/0, ::/0\n\
             Endpoint = vpn.example.net:51820\n",
            key_b64(1),
            key_b64(2),
            key_b64(3),
        );
        let config = parse(&input).expect("parse failed");
        assert_eq!(config.dns.as_deref(), Some("1.1.1.1"));
        let peer = &config.peers[0];
        assert!(peer.preshared_key.is_some());
        assert_eq!(peer.allowed_ips.as_deref(), Some("0.0.0.0/0, ::/0"));
        assert_eq!(peer.endpoint.as_deref(), Some("vpn.example.net:51820"));
    }

    #[test]
    fn comments_and_blank_lines_ignored() {
        let input = format!(
            "# generated\n\n[Interface]\n# key follows\nPrivateKey = {}\n",
            key_b64(1)
        );
        assert!(parse(&input).is_ok());
    }

    #[test]
    fn unknown_section_rejected_with_line() {
        let input = format!("[Interface]\nPrivateKey = {}\n[Bogus]\n", key_b64(1));
        let Err(ConfigError::Parse { line, .. }) = parse(&input) else {
            panic!("expected parse error");
        };
        assert_eq!(line, 3);
    }

    #[test_case("[Interface]\nListenPort = 51820\n" ; "missing private key")]
    #[test_case("PrivateKey = whatever\n" ; "key value outside section")]
    #[test_case("[Interface]\nPrivateKey = short\n" ; "private key not base64 of 32 bytes")]
    #[test_case("[Interface]\nno equals sign\n" ; "malformed line")]
    fn malformed_input_rejected(input: &str) {
        assert!(parse(input).is_err());
    }

    #[test]
    fn peer_without_public_key_rejected() {
        let input = format!(
            "[Interface]\nPrivateKey = {}\n[Peer]\nAllowedIPs = 10.0.0.2/32\n",
            key_b64(1)
        );
        assert!(parse(&input).is_err());
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let input = format!(
            "[Interface]\nPrivateKey = {}\nMTU = 1420\nTable = off\n",
            key_b64(1)
        );
        assert!(parse(&input).is_ok());
    }
}
