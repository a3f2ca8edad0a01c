//! USD price cache for display figures
//!
//! Prices here feed USD annotations and the MEV heuristic only. They are
//! never part of output amounts or route ranking, so staleness inside the
//! TTL is acceptable. Entries are evicted lazily on read and the map is
//! capacity-bounded so an address-spray cannot grow it without limit.

use std::collections::HashMap;

use ethereum_types::Address;
use tokio::sync::RwLock;
use tokio::time::{Duration, Instant};

const DEFAULT_TTL: Duration = Duration::from_secs(60);
const DEFAULT_CAPACITY: usize = 512;

struct Entry {
    price: f64,
    stored_at: Instant,
}

/// Bounded TTL cache of token USD prices
pub struct PriceCache {
    inner: RwLock<HashMap<Address, Entry>>,
    ttl: Duration,
    capacity: usize,
}

impl Default for PriceCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL, DEFAULT_CAPACITY)
    }
}

impl PriceCache {
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
            ttl,
            capacity: capacity.max(1),
        }
    }

    /// Fresh cached price for a token, if any
    pub async fn get(&self, token: Address) -> Option<f64> {
        let map = self.inner.read().await;
        let entry = map.get(&token)?;
        if entry.stored_at.elapsed() > self.ttl {
            return None;
        }
        Some(entry.price)
    }

    /// Insert or overwrite a price. Last write wins; when at capacity,
    /// expired entries are dropped first and the insert is skipped if the
    /// map is still full of fresh entries.
    pub async fn insert(&self, token: Address, price: f64) {
        let mut map = self.inner.write().await;
        if map.len() >= self.capacity && !map.contains_key(&token) {
            let ttl = self.ttl;
            map.retain(|_, e| e.stored_at.elapsed() <= ttl);
            if map.len() >= self.capacity {
                return;
            }
        }
        map.insert(
            token,
            Entry {
                price,
                stored_at: Instant::now(),
            },
        );
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }
}
