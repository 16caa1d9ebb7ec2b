//! # recache
//!
//! A response-caching shim that sits in front of an HTTP client, storing
//! serialized responses in a key-value cache keyed by a hash of the request
//! URL and a service identifier.
//!
//! The crate covers the cache policy and key/value contract: deterministic
//! key derivation, normalization of responses into a serializable record,
//! and the per-`(service, url, status)` expiry decision with its override
//! mechanism. The backing store is an injected [`store::CacheStore`];
//! bring your own memcached/redis client, or use the bundled
//! [`store::MemoryStore`] for tests and embedded use.
//!
//! ## Quick Start
//!
//! ```rust
//! use recache::{CacheClient, CacheSettings, CachedResponse, HeaderMap, PolicyRegistry};
//! use recache::store::MemoryStore;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = CacheClient::new(
//!     MemoryStore::new(),
//!     CacheSettings::default(),
//!     &PolicyRegistry::new(),
//! )?;
//!
//! let response = CachedResponse::new(200, HeaderMap::new(), "data");
//! client.update_cache("abc", "/api/v1/test", &response).await?;
//!
//! if let Some(cached) = client.get_cached("abc", "/api/v1/test").await? {
//!     assert_eq!(cached.read(), b"data");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Deployments override the expiry decision by registering a policy and
//! naming it in [`CacheSettings::policy_class`]; see [`policy`].

pub mod client;
pub mod config;
pub mod key;
pub mod policy;
pub mod response;
pub mod store;

// ── Convenience re-exports ────────────────────────────────────────────────────
pub use client::{CacheClient, CacheError};
pub use config::CacheSettings;
pub use key::derive_key;
pub use policy::{ExpiryDirective, ExpiryPolicy, PolicyError, PolicyRegistry};
pub use response::{CacheableResponse, CachedResponse, HeaderMap};
