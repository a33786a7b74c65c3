//! Binary prefix trie answering "is this address inside any of these networks?"
//!
//! Only set membership is tracked. Once a prefix is marked, everything below
//! it is covered, so a marked node drops its subtree and later, more specific
//! insertions under it are no-ops. Lookups cost at most one step per address
//! bit regardless of how many networks were inserted.

use crate::DomainError;
use ipnetwork::IpNetwork;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

#[derive(Debug, Default, Clone)]
struct BitNode {
    children: [Option<Box<BitNode>>; 2],
    member: bool,
}

#[derive(Debug, Default, Clone)]
pub struct NetworkTrie {
    v4: BitNode,
    v6: BitNode,
    prefixes: usize,
}

impl NetworkTrie {
    pub fn new() -> Self {
        Self::default()
    }

    /// Trie covering every IPv4 and IPv6 address (`0.0.0.0/0` and `::/0`).
    pub fn universal() -> Self {
        let any = || BitNode {
            member: true,
            ..BitNode::default()
        };
        Self {
            v4: any(),
            v6: any(),
            prefixes: 2,
        }
    }

    /// Marks `address/prefix_len` as a member. Host bits beyond the prefix are
    /// ignored.
    pub fn insert(&mut self, address: IpAddr, prefix_len: u8) -> Result<&mut Self, DomainError> {
        let network = IpNetwork::new(address, prefix_len)
            .map_err(|e| DomainError::InvalidCidr(format!("{}/{}: {}", address, prefix_len, e)))?;
        Ok(self.insert_network(network))
    }

    pub fn insert_network(&mut self, network: IpNetwork) -> &mut Self {
        let (root, bits) = match network.network() {
            IpAddr::V4(v4) => (&mut self.v4, v4_bits(v4)),
            IpAddr::V6(v6) => (&mut self.v6, v6_bits(v6)),
        };

        let mut node = root;
        for depth in 0..network.prefix() {
            if node.member {
                self.prefixes += 1;
                return self;
            }
            let slot = &mut node.children[bit_at(bits, depth)];
            node = &mut **slot.get_or_insert_with(Box::default);
        }
        node.member = true;
        node.children = [None, None];
        self.prefixes += 1;
        self
    }

    /// True iff `address` falls inside at least one inserted network.
    ///
    /// IPv4-mapped IPv6 addresses (`::ffff:a.b.c.d`) are also tested against
    /// the IPv4 networks, which is how dual-stack sockets report IPv4 peers.
    pub fn contains(&self, address: IpAddr) -> bool {
        match address {
            IpAddr::V4(v4) => walk(&self.v4, v4_bits(v4), 32),
            IpAddr::V6(v6) => {
                if let Some(v4) = v6.to_ipv4_mapped() {
                    if walk(&self.v4, v4_bits(v4), 32) {
                        return true;
                    }
                }
                walk(&self.v6, v6_bits(v6), 128)
            }
        }
    }

    /// Number of insertions performed, including redundant ones.
    pub fn prefix_count(&self) -> usize {
        self.prefixes
    }

    pub fn is_empty(&self) -> bool {
        self.prefixes == 0
    }
}

fn walk(root: &BitNode, bits: u128, width: u8) -> bool {
    let mut node = root;
    if node.member {
        return true;
    }
    for depth in 0..width {
        match &node.children[bit_at(bits, depth)] {
            Some(child) if child.member => return true,
            Some(child) => node = &**child,
            None => return false,
        }
    }
    false
}

// Addresses are left-aligned in a u128 so that depth 0 is always the most
// significant bit of either family.
fn v4_bits(addr: Ipv4Addr) -> u128 {
    (u32::from(addr) as u128) << 96
}

fn v6_bits(addr: Ipv6Addr) -> u128 {
    u128::from(addr)
}

fn bit_at(bits: u128, depth: u8) -> usize {
    ((bits >> (127 - depth as u32)) & 1) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ip(s: &str) -> IpAddr {
        s.parse().unwrap()
    }

    #[test]
    fn test_empty_trie_contains_nothing() {
        let trie = NetworkTrie::new();
        assert!(trie.is_empty());
        assert!(!trie.contains(ip("10.0.0.1")));
        assert!(!trie.contains(ip("::1")));
    }

    #[test]
    fn test_host_bits_are_masked_on_insert() {
        let mut trie = NetworkTrie::new();
        trie.insert(ip("10.1.2.3"), 8).unwrap();
        assert!(trie.contains(ip("10.200.0.1")));
        assert!(!trie.contains(ip("11.0.0.0")));
    }

    #[test]
    fn test_invalid_prefix_length_rejected() {
        let mut trie = NetworkTrie::new();
        assert!(trie.insert(ip("10.0.0.0"), 33).is_err());
        assert!(trie.insert(ip("::"), 129).is_err());
    }

    #[test]
    fn test_broader_prefix_absorbs_subtree() {
        let mut trie = NetworkTrie::new();
        trie.insert(ip("10.1.1.0"), 24).unwrap();
        trie.insert(ip("10.0.0.0"), 8).unwrap();
        trie.insert(ip("10.2.0.0"), 16).unwrap();
        assert_eq!(trie.prefix_count(), 3);
        assert!(trie.contains(ip("10.9.9.9")));
    }
}
