//! In-process store backend with per-entry TTL.
//!
//! Not a production cache server: no capacity limits, no eviction beyond
//! TTL, process-local. It exists so tests and embedded deployments can run
//! without a memcached/redis round trip.

use std::time::{Duration, Instant};

use bytes::Bytes;
use dashmap::DashMap;

use super::{CacheStore, StoreFuture};

/// An in-memory [`CacheStore`] backed by a concurrent map.
///
/// Expiry is lazy: an expired entry is removed when a `get` or `delete`
/// observes it, and counts as absent from that point on.
///
/// # Examples
///
/// ```
/// use bytes::Bytes;
/// use recache::store::{CacheStore, MemoryStore};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let store = MemoryStore::new();
/// store.set("k", Bytes::from_static(b"v"), 0).await.unwrap();
/// assert_eq!(store.get("k").await.unwrap(), Some(Bytes::from_static(b"v")));
/// # }
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: DashMap<String, Entry>,
}

#[derive(Debug)]
struct Entry {
    value: Bytes,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|at| Instant::now() >= at)
    }
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes every entry.
    pub fn flush(&self) {
        self.entries.clear();
    }
}

impl CacheStore for MemoryStore {
    fn get(&self, key: &str) -> StoreFuture<'_, Option<Bytes>> {
        let value = match self.entries.get(key) {
            Some(entry) if entry.is_expired() => {
                // Drop the read guard before removing to avoid deadlock.
                drop(entry);
                self.entries.remove(key);
                None
            }
            Some(entry) => Some(entry.value.clone()),
            None => None,
        };
        Box::pin(async move { Ok(value) })
    }

    fn set(&self, key: &str, value: Bytes, ttl_secs: u64) -> StoreFuture<'_, bool> {
        let expires_at = if ttl_secs == 0 {
            None
        } else {
            Some(Instant::now() + Duration::from_secs(ttl_secs))
        };
        self.entries
            .insert(key.to_owned(), Entry { value, expires_at });
        Box::pin(async move { Ok(true) })
    }

    fn delete(&self, key: &str) -> StoreFuture<'_, bool> {
        let removed = match self.entries.remove(key) {
            // An expired entry is already gone as far as callers can tell.
            Some((_, entry)) => !entry.is_expired(),
            None => false,
        };
        Box::pin(async move { Ok(removed) })
    }
}
