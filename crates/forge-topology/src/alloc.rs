//! Host address allocation within a subnet.
//!
//! The allocator hands out disjoint addresses from the subnet's usable host
//! range: the server takes the first or last usable address depending on
//! the request, clients always fill ascending from the low end, so toggling
//! the server placement never reorders clients.
//!
//! Usable range policy: IPv4 excludes the network and broadcast addresses
//! (prefixes of /31 and longer therefore have no usable hosts); IPv6
//! excludes only the all-zeros subnet-router anycast address.

use std::net::IpAddr;

use ipnet::IpNet;

use crate::error::{Result, TopologyError};

/// Addresses assigned to one topology.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Allocation {
    /// The server's host address.
    pub server: IpAddr,
    /// Client host addresses in id order (ascending).
    pub clients: Vec<IpAddr>,
}

/// Returns the number of usable host addresses in `subnet`.
#[must_use]
pub fn capacity(subnet: &IpNet) -> u128 {
    match subnet {
        IpNet::V4(net) => {
            if net.prefix_len() >= 31 {
                return 0;
            }
            let network = u32::from(net.network());
            let broadcast = u32::from(net.broadcast());
            u128::from(broadcast - network - 1)
        }
        IpNet::V6(net) => {
            let network = u128::from(net.network());
            let last = u128::from(net.broadcast());
            last - network
        }
    }
}

/// Allocates `peer_count + 1` disjoint addresses from `subnet`.
///
/// Deterministic and order-stable: identical inputs always yield the same
/// allocation, and clients are numbered in ascending address order.
///
/// # Errors
///
/// Returns [`TopologyError::SubnetExhausted`] if the usable host range
/// cannot fit `peer_count + 1` addresses.
pub fn allocate(subnet: &IpNet, peer_count: usize, use_last_address: bool) -> Result<Allocation> {
    let available = capacity(subnet);
    let required = peer_count as u128 + 1;
    if available < required {
        return Err(TopologyError::SubnetExhausted {
            capacity: available,
            required,
        });
    }

    match subnet {
        IpNet::V4(net) => {
            let first = u32::from(net.network()) + 1;
            let last = u32::from(net.broadcast()) - 1;
            let server = if use_last_address { last } else { first };
            let client_base = if use_last_address { first } else { first + 1 };
            let clients = (0..peer_count as u32)
                .map(|i| IpAddr::from(std::net::Ipv4Addr::from(client_base + i)))
                .collect();
            Ok(Allocation {
                server: IpAddr::from(std::net::Ipv4Addr::from(server)),
                clients,
            })
        }
        IpNet::V6(net) => {
            let first = u128::from(net.network()) + 1;
            let last = u128::from(net.broadcast());
            let server = if use_last_address { last } else { first };
            let client_base = if use_last_address { first } else { first + 1 };
            let clients = (0..peer_count as u128)
                .map(|i| IpAddr::from(std::net::Ipv6Addr::from(client_base + i)))
                .collect();
            Ok(Allocation {
                server: IpAddr::from(std::net::Ipv6Addr::from(server)),
                clients,
            })
        }
    }
}
