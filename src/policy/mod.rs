//! Expiry policy — the whether-and-how-long-to-cache decision.
//!
//! Every cache operation starts by asking an [`ExpiryPolicy`] what to do
//! with a `(service, url)` pair. The answer is an [`ExpiryDirective`]:
//! skip the cache entirely, cache with no expiry, or cache for N seconds.
//! The same trait serves both call sites — the read path asks without a
//! status (should a lookup even be attempted?), the write path passes the
//! response status so deployments can, say, refuse to cache errors.
//!
//! Deployments select a policy by name through a [`PolicyRegistry`];
//! an unresolvable name is a fatal [`PolicyError`], never a silent
//! fallback to the default.

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use crate::config::CacheSettings;

/// Expiry, in seconds, used by [`FixedExpiry`] when
/// [`CacheSettings::default_expiry_secs`] is unset.
pub const DEFAULT_EXPIRY_SECS: u64 = 300;

/// A policy's decision for one request.
///
/// Produced fresh on every policy call; never stored. The three variants
/// keep "do not cache" and "cache with no expiry" unambiguous — neither is
/// a magic duration value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpiryDirective {
    /// Do not store this response, and do not attempt lookups for it.
    NoCache,
    /// Store with no expiry; the entry lives until deleted or evicted by
    /// the backing store.
    Forever,
    /// Store for the given number of seconds.
    ExpireAfter(u64),
}

impl ExpiryDirective {
    /// Maps a raw seconds value onto a directive using the memcached
    /// convention: `0` means no expiry.
    pub fn from_secs(secs: u64) -> Self {
        if secs == 0 {
            Self::Forever
        } else {
            Self::ExpireAfter(secs)
        }
    }

    /// The TTL to hand the backing store, or `None` for [`NoCache`].
    ///
    /// `Forever` becomes `0`, the no-expiry TTL at the store boundary.
    ///
    /// [`NoCache`]: Self::NoCache
    pub fn store_ttl(self) -> Option<u64> {
        match self {
            Self::NoCache => None,
            Self::Forever => Some(0),
            Self::ExpireAfter(secs) => Some(secs),
        }
    }

    /// Returns `true` for [`NoCache`](Self::NoCache).
    pub fn is_no_cache(self) -> bool {
        matches!(self, Self::NoCache)
    }
}

/// The whether-and-how-long-to-cache decision procedure.
///
/// Implementations inspect the service identifier, the request URL, and —
/// on the write path — the response status, and return a directive. Called
/// with `status = None` before a cache lookup and `Some(code)` before a
/// cache write.
///
/// # Examples
///
/// A per-status policy that refuses to cache anything but 200s:
///
/// ```
/// use recache::policy::{ExpiryDirective, ExpiryPolicy};
///
/// struct OkOnly;
///
/// impl ExpiryPolicy for OkOnly {
///     fn cache_expiry(&self, _service: &str, _url: &str, status: Option<u16>) -> ExpiryDirective {
///         match status {
///             Some(200) | None => ExpiryDirective::ExpireAfter(60),
///             Some(_) => ExpiryDirective::NoCache,
///         }
///     }
/// }
/// ```
pub trait ExpiryPolicy: Send + Sync {
    /// Decides the expiry directive for a `(service, url, status)` triple.
    fn cache_expiry(&self, service: &str, url: &str, status: Option<u16>) -> ExpiryDirective;
}

impl std::fmt::Debug for dyn ExpiryPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("dyn ExpiryPolicy")
    }
}

/// The default policy: one configured duration for everything.
///
/// Reads [`CacheSettings::default_expiry_secs`] on every call (settings
/// are shared, not snapshotted), falling back to [`DEFAULT_EXPIRY_SECS`]
/// when unset. A configured `0` means cache forever, matching the store
/// TTL convention. Service, URL, and status are ignored.
#[derive(Debug, Clone)]
pub struct FixedExpiry {
    settings: Arc<CacheSettings>,
}

impl FixedExpiry {
    /// Creates the fixed-duration policy over shared settings.
    pub fn new(settings: Arc<CacheSettings>) -> Self {
        Self { settings }
    }
}

impl ExpiryPolicy for FixedExpiry {
    fn cache_expiry(&self, _service: &str, _url: &str, _status: Option<u16>) -> ExpiryDirective {
        ExpiryDirective::from_secs(
            self.settings
                .default_expiry_secs
                .unwrap_or(DEFAULT_EXPIRY_SECS),
        )
    }
}

/// Errors resolving the configured expiry policy.
///
/// Resolution failures are fatal to client construction: a deployment that
/// names a policy gets that policy or an error, never a silent fallback.
#[derive(Debug, Error)]
pub enum PolicyError {
    /// [`CacheSettings::policy_class`] names a policy no factory was
    /// registered for.
    #[error("no expiry policy registered under name {name:?}")]
    UnknownPolicy {
        /// The configured policy name that failed to resolve.
        name: String,
    },
}

/// Constructor for a named policy; receives the shared settings so custom
/// policies can read their own options.
pub type PolicyFactory = Box<dyn Fn(Arc<CacheSettings>) -> Arc<dyn ExpiryPolicy> + Send + Sync>;

/// Registry of named [`ExpiryPolicy`] factories.
///
/// The Rust stand-in for resolving a policy implementation from a
/// configured class path: deployments register their policies under short
/// names at startup and reference them via
/// [`CacheSettings::policy_class`].
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use recache::config::CacheSettings;
/// use recache::policy::{ExpiryDirective, ExpiryPolicy, PolicyRegistry};
///
/// struct NeverCache;
/// impl ExpiryPolicy for NeverCache {
///     fn cache_expiry(&self, _: &str, _: &str, _: Option<u16>) -> ExpiryDirective {
///         ExpiryDirective::NoCache
///     }
/// }
///
/// let mut registry = PolicyRegistry::new();
/// registry.register("never", |_settings| Arc::new(NeverCache));
///
/// let policy = registry.resolve("never", Arc::new(CacheSettings::default())).unwrap();
/// assert!(policy.cache_expiry("abc", "/x", None).is_no_cache());
/// ```
#[derive(Default)]
pub struct PolicyRegistry {
    factories: HashMap<String, PolicyFactory>,
}

impl PolicyRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a policy factory under `name`, replacing any previous
    /// registration with the same name.
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn(Arc<CacheSettings>) -> Arc<dyn ExpiryPolicy> + Send + Sync + 'static,
    {
        self.factories.insert(name.into(), Box::new(factory));
    }

    /// Resolves `name` into a policy instance.
    ///
    /// # Errors
    ///
    /// Returns [`PolicyError::UnknownPolicy`] when no factory is registered
    /// under `name`. Resolution is deterministic: the same name against the
    /// same registry fails (or succeeds) identically every time.
    pub fn resolve(
        &self,
        name: &str,
        settings: Arc<CacheSettings>,
    ) -> Result<Arc<dyn ExpiryPolicy>, PolicyError> {
        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| PolicyError::UnknownPolicy {
                name: name.to_owned(),
            })?;
        debug!("resolved expiry policy {name:?}");
        Ok(factory(settings))
    }
}
