//! Host name resolution
//!
//! Only used to turn host names found where an IPv4 address is expected
//! into addresses.

use keaconv_core::config::ResolverConfig;
use std::collections::HashMap;
use std::net::{Ipv4Addr, SocketAddr, ToSocketAddrs};

/// Resolves host names to IPv4 addresses
pub trait HostResolver {
    /// Addresses of `name`, empty when unknown
    fn resolve(&self, name: &str) -> Vec<Ipv4Addr>;
}

/// System resolver
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemResolver;

impl HostResolver for SystemResolver {
    fn resolve(&self, name: &str) -> Vec<Ipv4Addr> {
        let addrs = match (name, 0).to_socket_addrs() {
            Ok(addrs) => addrs,
            Err(e) => {
                tracing::debug!("Resolving {} failed: {}", name, e);
                return Vec::new();
            }
        };
        let mut found = Vec::new();
        for addr in addrs {
            if let SocketAddr::V4(v4) = addr {
                if !found.contains(v4.ip()) {
                    found.push(*v4.ip());
                }
            }
        }
        found
    }
}

/// Resolver backed by a fixed host table
#[derive(Debug, Default, Clone)]
pub struct StaticResolver {
    hosts: HashMap<String, Vec<Ipv4Addr>>,
    fallback: Option<SystemResolver>,
}

impl StaticResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_host(mut self, name: &str, addrs: Vec<Ipv4Addr>) -> Self {
        self.hosts.insert(name.to_ascii_lowercase(), addrs);
        self
    }

    pub fn from_config(config: &ResolverConfig) -> Self {
        let hosts = config
            .hosts
            .iter()
            .map(|(name, addrs)| (name.to_ascii_lowercase(), addrs.clone()))
            .collect();
        Self {
            hosts,
            fallback: config.system.then_some(SystemResolver),
        }
    }
}

impl HostResolver for StaticResolver {
    fn resolve(&self, name: &str) -> Vec<Ipv4Addr> {
        if let Some(addrs) = self.hosts.get(&name.to_ascii_lowercase()) {
            tracing::debug!("Resolved {} from the host table", name);
            return addrs.clone();
        }
        match &self.fallback {
            Some(system) => system.resolve(name),
            None => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_table() {
        let resolver = StaticResolver::new().with_host("NS1.example.com", vec![Ipv4Addr::new(192, 0, 2, 1)]);
        assert_eq!(resolver.resolve("ns1.EXAMPLE.com"), vec![Ipv4Addr::new(192, 0, 2, 1)]);
        assert!(resolver.resolve("ns2.example.com").is_empty());
    }

    #[test]
    fn test_from_config_without_system() {
        let mut config = ResolverConfig::default();
        config.system = false;
        config.hosts.insert("a".to_string(), vec![Ipv4Addr::LOCALHOST]);
        let resolver = StaticResolver::from_config(&config);
        assert_eq!(resolver.resolve("a"), vec![Ipv4Addr::LOCALHOST]);
        assert!(resolver.resolve("localhost").is_empty());
    }
}
