//! The cache client — orchestrates key derivation, expiry policy, and the
//! store into the three caching operations.
//!
//! [`CacheClient`] owns an injected store and the policy binding resolved
//! at construction; it holds no other state. Every operation is one store
//! round trip at most, and policy "no cache" decisions short-circuit
//! before the store is touched.

use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use crate::config::CacheSettings;
use crate::key::derive_key;
use crate::policy::{ExpiryPolicy, FixedExpiry, PolicyError, PolicyRegistry};
use crate::response::{CacheableResponse, CachedResponse};
use crate::store::{CacheStore, StoreError};

/// Errors surfaced by [`CacheClient`] operations.
#[derive(Debug, Error)]
pub enum CacheError {
    /// The backing store failed; the backend's error passes through
    /// unchanged.
    #[error("cache store failure: {0}")]
    Store(#[from] StoreError),

    /// A stored value did not decode as a cached-response record. Store
    /// contents are assumed to be written by this crate, so this points at
    /// a corrupted or foreign entry.
    #[error("cached record could not be decoded: {0}")]
    Codec(#[from] serde_json::Error),
}

/// A response-caching shim over an abstract key-value store.
///
/// Construction resolves the expiry-policy binding exactly once — from
/// [`CacheSettings::policy_class`] via a [`PolicyRegistry`], or the
/// fixed-duration default when unset — and the binding never changes
/// afterwards, even if settings change elsewhere. A misconfigured policy
/// name is a constructor error, never a silent fallback.
///
/// The client is `Send + Sync` when its store is; share it via `Arc`.
///
/// # Examples
///
/// ```
/// use recache::client::CacheClient;
/// use recache::config::CacheSettings;
/// use recache::policy::PolicyRegistry;
/// use recache::response::{CachedResponse, HeaderMap};
/// use recache::store::MemoryStore;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let client = CacheClient::new(
///     MemoryStore::new(),
///     CacheSettings::default(),
///     &PolicyRegistry::new(),
/// )?;
///
/// let response = CachedResponse::new(200, HeaderMap::new(), "data");
/// client.update_cache("abc", "/api/v1/test", &response).await?;
///
/// let cached = client.get_cached("abc", "/api/v1/test").await?.unwrap();
/// assert_eq!(cached.read(), b"data");
/// # Ok(())
/// # }
/// ```
pub struct CacheClient<S> {
    store: S,
    policy: Arc<dyn ExpiryPolicy>,
}

impl<S: CacheStore> CacheClient<S> {
    /// Creates a client, resolving the policy binding from `settings`.
    ///
    /// # Errors
    ///
    /// Returns [`PolicyError::UnknownPolicy`] when
    /// [`CacheSettings::policy_class`] names a policy absent from
    /// `registry`. The failure is deterministic — reconstructing with the
    /// same inputs fails identically.
    pub fn new(
        store: S,
        settings: CacheSettings,
        registry: &PolicyRegistry,
    ) -> Result<Self, PolicyError> {
        let settings = Arc::new(settings);
        let policy: Arc<dyn ExpiryPolicy> = match settings.policy_class.as_deref() {
            Some(name) => registry.resolve(name, Arc::clone(&settings))?,
            None => Arc::new(FixedExpiry::new(settings)),
        };
        Ok(Self { store, policy })
    }

    /// Creates a client around an explicit policy instance, bypassing
    /// registry resolution.
    pub fn with_policy(store: S, policy: Arc<dyn ExpiryPolicy>) -> Self {
        Self { store, policy }
    }

    /// Returns the injected store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Looks up the cached response for `(service, url)`.
    ///
    /// Asks the policy first (read-path form, no status): a `NoCache`
    /// decision returns `Ok(None)` without touching the store. A store
    /// miss is also `Ok(None)`.
    ///
    /// # Errors
    ///
    /// [`CacheError::Store`] when the backend fails; [`CacheError::Codec`]
    /// when a stored value does not decode as a record.
    pub async fn get_cached(
        &self,
        service: &str,
        url: &str,
    ) -> Result<Option<CachedResponse>, CacheError> {
        if self.policy.cache_expiry(service, url, None).is_no_cache() {
            debug!("cache lookup skipped by policy for {service} {url}");
            return Ok(None);
        }

        let key = derive_key(service, url);
        match self.store.get(&key).await? {
            Some(raw) => {
                let record = CachedResponse::decode(&raw)?;
                debug!("cache hit for {service} {url}");
                Ok(Some(record))
            }
            None => {
                debug!("cache miss for {service} {url}");
                Ok(None)
            }
        }
    }

    /// Stores `response` for `(service, url)`, honoring the policy.
    ///
    /// The policy is asked with the response's status (write-path form).
    /// A `NoCache` decision stores nothing and returns `Ok(false)`;
    /// otherwise the response is normalized, serialized, and written with
    /// the directive's TTL (`0`, meaning no expiry, for `Forever`). The
    /// returned bool is the store's accept signal.
    ///
    /// # Errors
    ///
    /// [`CacheError::Store`] when the backend fails; [`CacheError::Codec`]
    /// when the record fails to serialize.
    pub async fn update_cache<R>(
        &self,
        service: &str,
        url: &str,
        response: &R,
    ) -> Result<bool, CacheError>
    where
        R: CacheableResponse,
    {
        let directive = self.policy.cache_expiry(service, url, response.status());
        let Some(ttl_secs) = directive.store_ttl() else {
            debug!("cache store skipped by policy for {service} {url}");
            return Ok(false);
        };

        let raw = CachedResponse::normalize(response).encode()?;
        let key = derive_key(service, url);
        let stored = self.store.set(&key, raw, ttl_secs).await?;
        debug!("cached {service} {url} for {ttl_secs}s (stored={stored})");
        Ok(stored)
    }

    /// Compatibility alias for [`update_cache`](Self::update_cache);
    /// identical behavior under the name some hosts call it by.
    pub async fn process_response<R>(
        &self,
        service: &str,
        url: &str,
        response: &R,
    ) -> Result<bool, CacheError>
    where
        R: CacheableResponse,
    {
        self.update_cache(service, url, response).await
    }

    /// Removes the cached entry for `(service, url)`, returning whether
    /// one was removed.
    ///
    /// Deletion never consults the policy — it is always allowed, and
    /// deleting a missing entry is `Ok(false)`, not an error.
    ///
    /// # Errors
    ///
    /// [`CacheError::Store`] when the backend fails.
    pub async fn delete_cache(&self, service: &str, url: &str) -> Result<bool, CacheError> {
        let key = derive_key(service, url);
        let removed = self.store.delete(&key).await?;
        debug!("cache delete for {service} {url} (removed={removed})");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use bytes::Bytes;
    use crate::policy::ExpiryDirective;
    use crate::response::HeaderMap;
    use crate::store::{MemoryStore, StoreFuture};

    const SERVICE: &str = "abc";
    const URL: &str = "/api/v1/test";

    fn response(status: u16, body: &'static str) -> CachedResponse {
        let mut headers = HeaderMap::new();
        headers.insert("Content-Type", "text/plain");
        CachedResponse::new(status, headers, body)
    }

    fn default_client() -> CacheClient<MemoryStore> {
        CacheClient::new(
            MemoryStore::new(),
            CacheSettings::default(),
            &PolicyRegistry::new(),
        )
        .unwrap()
    }

    struct NeverCache;

    impl ExpiryPolicy for NeverCache {
        fn cache_expiry(&self, _: &str, _: &str, _: Option<u16>) -> ExpiryDirective {
            ExpiryDirective::NoCache
        }
    }

    struct SkipErrors;

    impl ExpiryPolicy for SkipErrors {
        fn cache_expiry(&self, _: &str, _: &str, status: Option<u16>) -> ExpiryDirective {
            match status {
                Some(code) if code >= 400 => ExpiryDirective::NoCache,
                _ => ExpiryDirective::ExpireAfter(60),
            }
        }
    }

    #[tokio::test]
    async fn update_then_get_round_trips() {
        let client = default_client();

        assert_eq!(client.get_cached(SERVICE, URL).await.unwrap(), None);

        let stored = client
            .update_cache(SERVICE, URL, &response(200, "data"))
            .await
            .unwrap();
        assert!(stored);

        let cached = client.get_cached(SERVICE, URL).await.unwrap().unwrap();
        assert_eq!(cached.status(), Some(200));
        assert_eq!(cached.read(), b"data");
        assert_eq!(cached.header_or("content-type", ""), "text/plain");
    }

    #[tokio::test]
    async fn delete_removes_the_entry() {
        let client = default_client();

        assert!(!client.delete_cache(SERVICE, URL).await.unwrap());

        client
            .update_cache(SERVICE, URL, &response(200, "data"))
            .await
            .unwrap();
        assert!(client.delete_cache(SERVICE, URL).await.unwrap());
        assert_eq!(client.get_cached(SERVICE, URL).await.unwrap(), None);
    }

    #[tokio::test]
    async fn process_response_is_update_cache() {
        let by_update = default_client();
        let by_alias = default_client();
        let resp = response(200, "same bytes");

        let a = by_update.update_cache(SERVICE, URL, &resp).await.unwrap();
        let b = by_alias.process_response(SERVICE, URL, &resp).await.unwrap();
        assert_eq!(a, b);

        assert_eq!(
            by_update.get_cached(SERVICE, URL).await.unwrap(),
            by_alias.get_cached(SERVICE, URL).await.unwrap(),
        );
    }

    #[tokio::test]
    async fn no_cache_policy_gates_both_paths() {
        let store = Arc::new(MemoryStore::new());
        let client = CacheClient::with_policy(Arc::clone(&store), Arc::new(NeverCache));

        let stored = client
            .update_cache(SERVICE, URL, &response(200, "data"))
            .await
            .unwrap();
        assert!(!stored);
        assert_eq!(client.get_cached(SERVICE, URL).await.unwrap(), None);

        // Even a value placed in the store directly stays invisible: the
        // policy short-circuits before any store read.
        let key = derive_key(SERVICE, URL);
        let raw = response(200, "data").encode().unwrap();
        store.set(&key, raw, 0).await.unwrap();
        assert_eq!(client.get_cached(SERVICE, URL).await.unwrap(), None);
    }

    #[tokio::test]
    async fn write_path_policy_sees_the_status() {
        let client = CacheClient::with_policy(MemoryStore::new(), Arc::new(SkipErrors));

        let stored = client
            .update_cache(SERVICE, URL, &response(500, "oops"))
            .await
            .unwrap();
        assert!(!stored);
        assert_eq!(client.get_cached(SERVICE, URL).await.unwrap(), None);

        let stored = client
            .update_cache(SERVICE, URL, &response(200, "fine"))
            .await
            .unwrap();
        assert!(stored);
        assert_eq!(
            client.get_cached(SERVICE, URL).await.unwrap().unwrap().read(),
            b"fine",
        );
    }

    #[tokio::test]
    async fn read_path_policy_gets_no_status() {
        struct AssertReadForm;

        impl ExpiryPolicy for AssertReadForm {
            fn cache_expiry(&self, _: &str, _: &str, status: Option<u16>) -> ExpiryDirective {
                assert_eq!(status, None);
                ExpiryDirective::Forever
            }
        }

        let client = CacheClient::with_policy(MemoryStore::new(), Arc::new(AssertReadForm));
        client.get_cached(SERVICE, URL).await.unwrap();
    }

    #[tokio::test]
    async fn forever_directive_stores_with_zero_ttl() {
        struct CacheForever;

        impl ExpiryPolicy for CacheForever {
            fn cache_expiry(&self, _: &str, _: &str, _: Option<u16>) -> ExpiryDirective {
                ExpiryDirective::Forever
            }
        }

        let client = CacheClient::with_policy(MemoryStore::new(), Arc::new(CacheForever));
        assert!(
            client
                .update_cache(SERVICE, URL, &response(200, "kept"))
                .await
                .unwrap()
        );
        assert_eq!(
            client.get_cached(SERVICE, URL).await.unwrap().unwrap().read(),
            b"kept",
        );
    }

    #[test]
    fn unknown_policy_class_fails_construction_every_time() {
        let settings = CacheSettings {
            policy_class: Some("not_registered".to_owned()),
            ..CacheSettings::default()
        };
        let registry = PolicyRegistry::new();

        for _ in 0..3 {
            let err = CacheClient::new(MemoryStore::new(), settings.clone(), &registry)
                .err()
                .expect("construction must fail");
            assert!(matches!(
                err,
                PolicyError::UnknownPolicy { ref name } if name == "not_registered"
            ));
        }
    }

    #[tokio::test]
    async fn registered_policy_class_is_used() {
        let mut registry = PolicyRegistry::new();
        registry.register("never", |_| Arc::new(NeverCache));

        let settings = CacheSettings {
            policy_class: Some("never".to_owned()),
            ..CacheSettings::default()
        };
        let client = CacheClient::new(MemoryStore::new(), settings, &registry).unwrap();

        assert!(
            !client
                .update_cache(SERVICE, URL, &response(200, "data"))
                .await
                .unwrap()
        );
    }

    struct FailingStore;

    impl CacheStore for FailingStore {
        fn get(&self, _key: &str) -> StoreFuture<'_, Option<Bytes>> {
            Box::pin(async { Err(StoreError::backend("connection refused")) })
        }

        fn set(&self, _key: &str, _value: Bytes, _ttl_secs: u64) -> StoreFuture<'_, bool> {
            Box::pin(async { Err(StoreError::backend("connection refused")) })
        }

        fn delete(&self, _key: &str) -> StoreFuture<'_, bool> {
            Box::pin(async { Err(StoreError::backend("connection refused")) })
        }
    }

    #[tokio::test]
    async fn store_failures_propagate_unchanged() {
        let client = CacheClient::with_policy(FailingStore, Arc::new(SkipErrors));

        let err = client.get_cached(SERVICE, URL).await.unwrap_err();
        assert!(matches!(err, CacheError::Store(_)));
        assert!(err.to_string().contains("connection refused"));

        let err = client
            .update_cache(SERVICE, URL, &response(200, "data"))
            .await
            .unwrap_err();
        assert!(matches!(err, CacheError::Store(_)));

        let err = client.delete_cache(SERVICE, URL).await.unwrap_err();
        assert!(matches!(err, CacheError::Store(_)));
    }

    #[tokio::test]
    async fn malformed_stored_value_is_a_codec_error() {
        let store = Arc::new(MemoryStore::new());
        let client = CacheClient::new(
            Arc::clone(&store),
            CacheSettings::default(),
            &PolicyRegistry::new(),
        )
        .unwrap();

        let key = derive_key(SERVICE, URL);
        store
            .set(&key, Bytes::from_static(b"not a record"), 0)
            .await
            .unwrap();

        let err = client.get_cached(SERVICE, URL).await.unwrap_err();
        assert!(matches!(err, CacheError::Codec(_)));
    }

    #[tokio::test]
    async fn partially_constructed_response_stores_without_status() {
        let client = default_client();
        let bare = CachedResponse::default();

        assert!(client.update_cache(SERVICE, URL, &bare).await.unwrap());

        let cached = client.get_cached(SERVICE, URL).await.unwrap().unwrap();
        assert_eq!(cached.status(), None);
        assert_eq!(cached.read(), b"");
    }
}
