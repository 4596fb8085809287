//! Deploy-script rendering.
//!
//! Alongside the `.conf` files a project can emit a command file: a
//! one-time command followed by one command per client, with per-peer
//! placeholders substituted. The commands themselves are opaque.

use forge_topology::PeerGraph;

/// Renders the deploy script for a graph.
///
/// `once` is emitted verbatim as the first line; `per_peer` is emitted once
/// per client with `{id}`, `{address}` and `{public_key}` replaced by that
/// client's values. Empty templates contribute nothing; an entirely empty
/// result means no script file should be written.
#[must_use]
pub fn render_deploy_script(graph: &PeerGraph, once: &str, per_peer: &str) -> String {
    let mut output = String::new();

    if !once.trim().is_empty() {
        output.push_str(once);
        output.push('\n');
    }

    if !per_peer.trim().is_empty() {
        for client in &graph.clients {
            let line = per_peer
                .replace("{id}", &client.id.to_string())
                .replace("{address}", &client.address.to_string())
                .replace("{public_key}", &client.keys.public_key().to_base64());
            output.push_str(&line);
            output.push('\n');
        }
    }

    output
}
