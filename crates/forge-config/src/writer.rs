//! Serialization of peer nodes into the canonical `.conf` format.

use std::fmt::Write as FmtWrite;
use std::io;

use forge_topology::PeerNode;

use crate::error::Result;

/// Renders a peer node as WireGuard configuration text.
///
/// Stateless and pure: the node is never mutated. The output uses LF line
/// endings and UTF-8 with no byte-order mark, and directives with empty
/// values are omitted entirely — a stray blank directive is a parse risk in
/// strict WireGuard parsers.
#[must_use]
pub fn render(node: &PeerNode) -> String {
    let mut output = String::new();

    output.push_str("[Interface]\n");
    let _ = writeln!(output, "PrivateKey = {}", node.keys.private_key().to_base64());
    let _ = writeln!(output, "Address = {}/{}", node.address, node.address_prefix);

    if let Some(port) = node.listen_port {
        let _ = writeln!(output, "ListenPort = {port}");
    }

    if let Some(ref dns) = node.dns {
        let _ = writeln!(output, "DNS = {dns}");
    }

    if let Some(ref cmd) = node.post_up {
        let _ = writeln!(output, "PostUp = {cmd}");
    }

    if let Some(ref cmd) = node.post_down {
        let _ = writeln!(output, "PostDown = {cmd}");
    }

    for peer in &node.peers {
        output.push('\n');
        output.push_str("[Peer]\n");
        let _ = writeln!(output, "PublicKey = {}", peer.public_key.to_base64());

        if let Some(ref psk) = peer.preshared_key {
            let _ = writeln!(output, "PresharedKey = {}", psk.to_base64());
        }

        if !peer.allowed_ips.trim().is_empty() {
            let _ = writeln!(output, "AllowedIPs = {}", peer.allowed_ips);
        }

        if let Some(ref endpoint) = peer.endpoint {
            let _ = writeln!(output, "Endpoint = {endpoint}");
        }
    }

    output
}

/// Renders `node` and writes the bytes to a caller-owned sink.
///
/// The sink is borrowed only for the duration of this call; nothing is
/// retained afterwards.
///
/// # Errors
///
/// Returns [`ConfigError::Io`](crate::ConfigError::Io) if the sink fails.
pub fn write_to<W: io::Write>(node: &PeerNode, writer: &mut W) -> Result<()> {
    writer.write_all(render(node).as_bytes())?;
    Ok(())
}
