//! Topology assembly.

use forge_keys::{derive_keypair, derive_preshared};
use ipnet::IpNet;
use tracing::debug;

use crate::alloc;
use crate::error::{Result, TopologyError};
use crate::graph::{PeerGraph, PeerNode, PeerReference, PeerRole};
use crate::request::TopologyRequest;

/// Builds a peer graph from a request.
///
/// Pure function of its input: identical requests yield graphs equal in
/// every key and address field. Validation runs first and collects all
/// violations, so a rejected request derives no key material and has no
/// observable side effects.
///
/// # Errors
///
/// A single validation violation is returned verbatim; two or more are
/// wrapped in [`TopologyError::Validation`].
pub fn build(request: &TopologyRequest) -> Result<PeerGraph> {
    validate(request)?;

    debug!(
        subnet = %request.subnet,
        peer_count = request.peer_count,
        preshared = request.use_preshared_keys,
        "building topology"
    );

    let allocation = alloc::allocate(
        &request.subnet,
        request.peer_count,
        request.use_last_address,
    )?;

    let server_keys = derive_keypair(&request.seed, 0)?;

    let mut clients = Vec::with_capacity(request.peer_count);
    let mut server_refs = Vec::with_capacity(request.peer_count);

    for (slot, address) in allocation.clients.iter().enumerate() {
        let index = slot as u32 + 1;
        let keys = derive_keypair(&request.seed, index)?;
        let preshared = if request.use_preshared_keys {
            Some(derive_preshared(&request.seed, index)?)
        } else {
            None
        };

        server_refs.push(PeerReference {
            public_key: *keys.public_key(),
            preshared_key: preshared.clone(),
            allowed_ips: format!("{address}/{}", host_prefix(&request.subnet)),
            endpoint: None,
        });

        clients.push(PeerNode {
            id: index,
            role: PeerRole::Client,
            address: *address,
            address_prefix: host_prefix(&request.subnet),
            keys,
            preshared_key: preshared.clone(),
            listen_port: None,
            dns: non_empty(&request.dns),
            post_up: None,
            post_down: None,
            peers: vec![PeerReference {
                public_key: *server_keys.public_key(),
                preshared_key: preshared,
                allowed_ips: request.allowed_ips.clone(),
                endpoint: non_empty(&request.endpoint),
            }],
        });
    }

    let server = PeerNode {
        id: 0,
        role: PeerRole::Server,
        address: allocation.server,
        address_prefix: request.subnet.prefix_len(),
        keys: server_keys,
        preshared_key: None,
        listen_port: Some(request.listen_port),
        dns: None,
        post_up: non_empty(&request.post_up),
        post_down: non_empty(&request.post_down),
        peers: server_refs,
    };

    debug!(clients = clients.len(), server = %server.address, "topology built");

    Ok(PeerGraph { server, clients })
}

/// Collects every validation violation before any derivation happens.
fn validate(request: &TopologyRequest) -> Result<()> {
    let mut violations = Vec::new();

    if let Err(e) = request.seed.check_length() {
        violations.push(TopologyError::Key(e));
    }

    if request.listen_port == 0 {
        violations.push(TopologyError::InvalidListenPort(0));
    }

    let capacity = alloc::capacity(&request.subnet);
    let required = request.peer_count as u128 + 1;
    if capacity < required {
        violations.push(TopologyError::SubnetExhausted { capacity, required });
    }

    match violations.len() {
        0 => Ok(()),
        1 => Err(violations.swap_remove(0)),
        _ => Err(TopologyError::Validation(violations)),
    }
}

/// Single-host prefix length for the subnet's address family.
fn host_prefix(subnet: &IpNet) -> u8 {
    match subnet {
        IpNet::V4(_) => 32,
        IpNet::V6(_) => 128,
    }
}

fn non_empty(s: &str) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use forge_keys::Seed;

    use super::*;

    fn request(peer_count: usize) -> TopologyRequest {
        let seed = Seed::from_bytes(&[0x42u8; 64]);
        let subnet = TopologyRequest::parse_subnet("10.0.0.0/24").expect("valid subnet");
        TopologyRequest::builder(seed, subnet)
            .peer_count(peer_count)
            .endpoint("vpn.example.net:51820")
            .build()
    }

    #[test]
    fn minimal_topology_addresses() {
        let graph = build(&request(1)).expect("build failed");
        assert_eq!(graph.server.address.to_string(), "10.0.0.1");
        assert_eq!(graph.clients[0].address.to_string(), "10.0.0.2");
        assert_eq!(graph.server.peers[0].allowed_ips, "10.0.0.2/32");
    }

    #[test]
    fn graph_symmetry() {
        let graph = build(&request(5)).expect("build failed");
        for client in &graph.clients {
            let matching: Vec<_> = graph
                .server
                .peers
                .iter()
                .filter(|r| r.public_key == *client.keys.public_key())
                .collect();
            assert_eq!(matching.len(), 1, "client {} not referenced exactly once", client.id);
            assert_eq!(client.peers.len(), 1);
            assert_eq!(client.peers[0].public_key, *graph.server.keys.public_key());
        }
    }

    #[test]
    fn zero_peers_is_valid() {
        let graph = build(&request(0)).expect("build failed");
        assert!(graph.clients.is_empty());
        assert!(graph.server.peers.is_empty());
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn build_is_idempotent() {
        let a = build(&request(3)).expect("build failed");
        let b = build(&request(3)).expect("build failed");
        assert_eq!(a, b);
    }

    #[test]
    fn ids_follow_allocation_order() {
        let graph = build(&request(3)).expect("build failed");
        assert_eq!(graph.server.id, 0);
        let ids: Vec<u32> = graph.clients.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn preshared_keys_present_iff_requested() {
        let without = build(&request(2)).expect("build failed");
        assert!(without.clients.iter().all(|c| c.preshared_key.is_none()));
        assert!(without.server.peers.iter().all(|r| r.preshared_key.is_none()));

        let seed = Seed::from_bytes(&[0x42u8; 64]);
        let subnet = TopologyRequest::parse_subnet("10.0.0.0/24").expect("valid subnet");
        let with = build(
            &TopologyRequest::builder(seed, subnet)
                .peer_count(2)
                .use_preshared_keys(true)
                .build(),
        )
        .expect("build failed");

        for (client, reference) in with.clients.iter().zip(&with.server.peers) {
            let client_psk = client.preshared_key.as_ref().expect("client psk missing");
            let server_psk = reference.preshared_key.as_ref().expect("server psk missing");
            assert_eq!(client_psk, server_psk, "pairing must share one preshared key");
        }
    }

    #[test]
    fn preshared_keys_differ_between_clients() {
        let seed = Seed::from_bytes(&[0x42u8; 64]);
        let subnet = TopologyRequest::parse_subnet("10.0.0.0/24").expect("valid subnet");
        let graph = build(
            &TopologyRequest::builder(seed, subnet)
                .peer_count(2)
                .use_preshared_keys(true)
                .build(),
        )
        .expect("build failed");

        assert_ne!(
            graph.clients[0].preshared_key, graph.clients[1].preshared_key,
            "per-pair preshared keys must be independent"
        );
    }

    #[test]
    fn client_reference_carries_policy_not_address() {
        let graph = build(&request(1)).expect("build failed");
        let reference = &graph.clients[0].peers[0];
        assert_eq!(reference.allowed_ips, "0.0.0.0/0, ::/0");
        assert_eq!(reference.endpoint.as_deref(), Some("vpn.example.net:51820"));
    }

    #[test]
    fn server_announces_subnet_clients_announce_host() {
        let graph = build(&request(1)).expect("build failed");
        assert_eq!(graph.server.address_prefix, 24);
        assert_eq!(graph.clients[0].address_prefix, 32);
    }

    #[test]
    fn exhausted_subnet_is_rejected_verbatim() {
        let seed = Seed::from_bytes(&[0x42u8; 64]);
        let subnet = TopologyRequest::parse_subnet("10.0.0.0/30").expect("valid subnet");
        let result = build(
            &TopologyRequest::builder(seed, subnet)
                .peer_count(5)
                .build(),
        );
        assert!(matches!(
            result,
            Err(TopologyError::SubnetExhausted {
                capacity: 2,
                required: 6,
            })
        ));
    }

    #[test]
    fn multiple_violations_are_aggregated() {
        let seed = Seed::from_bytes(&[0u8; 4]);
        let subnet = TopologyRequest::parse_subnet("10.0.0.0/30").expect("valid subnet");
        let result = build(
            &TopologyRequest::builder(seed, subnet)
                .peer_count(5)
                .listen_port(0)
                .build(),
        );
        let Err(TopologyError::Validation(violations)) = result else {
            panic!("expected aggregated validation error");
        };
        assert_eq!(violations.len(), 3);
    }

    #[test]
    fn short_seed_derives_nothing() {
        let seed = Seed::from_bytes(&[0u8; 4]);
        let subnet = TopologyRequest::parse_subnet("10.0.0.0/24").expect("valid subnet");
        let result = build(&TopologyRequest::builder(seed, subnet).peer_count(1).build());
        assert!(matches!(result, Err(TopologyError::Key(_))));
    }

    #[test]
    fn use_last_address_moves_only_the_server() {
        let seed = Seed::from_bytes(&[0x42u8; 64]);
        let subnet = TopologyRequest::parse_subnet("10.0.0.0/24").expect("valid subnet");
        let graph = build(
            &TopologyRequest::builder(seed, subnet)
                .peer_count(2)
                .use_last_address(true)
                .build(),
        )
        .expect("build failed");

        assert_eq!(graph.server.address.to_string(), "10.0.0.254");
        assert_eq!(graph.clients[0].address.to_string(), "10.0.0.1");
        assert_eq!(graph.clients[1].address.to_string(), "10.0.0.2");
    }

    #[test]
    fn ipv6_topology_uses_128_host_prefix() {
        let seed = Seed::from_bytes(&[0x42u8; 64]);
        let subnet = TopologyRequest::parse_subnet("fd00:dead:beef::/64").expect("valid subnet");
        let graph = build(
            &TopologyRequest::builder(seed, subnet)
                .peer_count(1)
                .build(),
        )
        .expect("build failed");

        assert_eq!(graph.clients[0].address_prefix, 128);
        assert!(graph.server.peers[0].allowed_ips.ends_with("/128"));
    }
}
