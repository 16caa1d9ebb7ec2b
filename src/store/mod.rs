//! Abstract key-value store backend.
//!
//! The caching layer talks to its backend exclusively through the
//! [`CacheStore`] trait: three operations, one round trip each. Connection
//! pooling, timeouts, and server addressing are the backend's concern —
//! implementations wrap whatever memcached/redis client the deployment
//! uses. [`MemoryStore`] is the bundled in-process implementation for
//! tests and embedded use.

use std::future::Future;
use std::pin::Pin;

use bytes::Bytes;
use thiserror::Error;

pub mod memory;

pub use memory::MemoryStore;

/// A failure surfaced by the backing store.
///
/// An opaque wrapper over whatever error the backend client produced
/// (connectivity, timeout, protocol). The caching layer never retries or
/// swallows these; they propagate to the caller unchanged.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct StoreError(Box<dyn std::error::Error + Send + Sync>);

impl StoreError {
    /// Wraps a backend error.
    pub fn backend(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self(err.into())
    }
}

/// The boxed future returned by every [`CacheStore`] operation.
///
/// Boxing keeps the trait object-safe, so stores can be swapped behind
/// `dyn CacheStore` or generics alike.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + Send + 'a>>;

/// The key-value operations the caching layer requires of its backend.
///
/// TTLs are in seconds; `0` means no expiry (the memcached convention).
/// Implementations own their concurrency safety — the caching layer calls
/// from any task without additional locking.
pub trait CacheStore: Send + Sync {
    /// Fetches the value stored under `key`, or `None` on a miss.
    fn get(&self, key: &str) -> StoreFuture<'_, Option<Bytes>>;

    /// Stores `value` under `key` with the given TTL, returning whether
    /// the write was accepted.
    fn set(&self, key: &str, value: Bytes, ttl_secs: u64) -> StoreFuture<'_, bool>;

    /// Removes the entry under `key`, returning whether one was removed.
    fn delete(&self, key: &str) -> StoreFuture<'_, bool>;
}

impl<S: CacheStore + ?Sized> CacheStore for std::sync::Arc<S> {
    fn get(&self, key: &str) -> StoreFuture<'_, Option<Bytes>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: Bytes, ttl_secs: u64) -> StoreFuture<'_, bool> {
        (**self).set(key, value, ttl_secs)
    }

    fn delete(&self, key: &str) -> StoreFuture<'_, bool> {
        (**self).delete(key)
    }
}
