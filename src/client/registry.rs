//! Client registry
//!
//! Tracks connected clients so the server can enforce its connection limit.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::{Duration, Instant};

/// Registry of active connections and when they were accepted
pub struct ClientRegistry {
    clients: HashMap<SocketAddr, Instant>,
    max_clients: usize,
}

impl ClientRegistry {
    pub fn new(max_clients: usize) -> Self {
        Self {
            clients: HashMap::new(),
            max_clients,
        }
    }

    /// Registers a client. Returns `false` when the registry is full.
    pub fn try_insert(&mut self, addr: SocketAddr) -> bool {
        if self.clients.len() >= self.max_clients {
            return false;
        }
        self.clients.insert(addr, Instant::now());
        true
    }

    /// Removes a client and returns how long it was connected.
    pub fn remove(&mut self, addr: &SocketAddr) -> Option<Duration> {
        self.clients.remove(addr).map(|since| since.elapsed())
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }

    pub fn max_clients(&self) -> usize {
        self.max_clients
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(port: u16) -> SocketAddr {
        SocketAddr::from(([127, 0, 0, 1], port))
    }

    #[test]
    fn refuses_clients_beyond_the_limit() {
        let mut registry = ClientRegistry::new(2);
        assert!(registry.try_insert(addr(5001)));
        assert!(registry.try_insert(addr(5002)));
        assert!(!registry.try_insert(addr(5003)));
        assert_eq!(registry.len(), 2);

        assert!(registry.remove(&addr(5001)).is_some());
        assert!(registry.try_insert(addr(5003)));
        assert!(registry.remove(&addr(5999)).is_none());
    }
}
