//! Normalized, serializable HTTP response records.
//!
//! This module provides the storage representation for cached responses:
//! [`CachedResponse`], its case-insensitive [`HeaderMap`], and the
//! [`CacheableResponse`] trait that live response types implement so they
//! can be normalized for storage.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

pub mod headers;

pub use headers::HeaderMap;

/// A live HTTP response that can be normalized into a [`CachedResponse`].
///
/// Implement this for whatever response type your HTTP client produces.
/// Normalization copies everything it needs, so implementations may borrow
/// from internal buffers freely.
pub trait CacheableResponse {
    /// The HTTP status code, when known.
    ///
    /// Responses observed on the wire always have one; hand-built or
    /// partially-constructed records may not.
    fn status(&self) -> Option<u16>;

    /// All header name/value pairs carried by the response.
    fn headers(&self) -> impl Iterator<Item = (&str, &str)>;

    /// The raw body bytes.
    fn body(&self) -> &[u8];
}

/// A normalized HTTP response, ready to be serialized into the cache.
///
/// The record is immutable once constructed and carries exactly three
/// fields: `status`, `headers`, and `data`. The body is opaque — it is
/// stored and returned byte-for-byte, never decoded. When deserializing,
/// missing fields materialize as absent/empty rather than erroring, so
/// partially-written records remain readable.
///
/// # Examples
///
/// ```
/// use recache::response::{CachedResponse, HeaderMap};
///
/// let mut headers = HeaderMap::new();
/// headers.insert("Content-Type", "application/json");
///
/// let record = CachedResponse::new(200, headers, r#"{"ok":true}"#);
/// assert_eq!(record.status(), Some(200));
/// assert_eq!(record.header_or("content-type", ""), "application/json");
/// assert_eq!(record.read(), br#"{"ok":true}"#);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CachedResponse {
    #[serde(default)]
    status: Option<u16>,
    #[serde(default)]
    headers: HeaderMap,
    #[serde(default)]
    data: Bytes,
}

impl CachedResponse {
    /// Creates a record from its parts.
    pub fn new(status: u16, headers: HeaderMap, data: impl Into<Bytes>) -> Self {
        Self {
            status: Some(status),
            headers,
            data: data.into(),
        }
    }

    /// Normalizes a live response into a record.
    ///
    /// All headers are copied into a plain [`HeaderMap`] — source header
    /// containers are often multi-valued, ordered, or otherwise not
    /// serializable as a flat mapping — and the body bytes are copied
    /// verbatim.
    pub fn normalize<R: CacheableResponse + ?Sized>(response: &R) -> Self {
        Self {
            status: response.status(),
            headers: response.headers().collect(),
            data: Bytes::copy_from_slice(response.body()),
        }
    }

    /// Returns the HTTP status code, if the record carries one.
    pub fn status(&self) -> Option<u16> {
        self.status
    }

    /// Returns the stored header mapping.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns the value of the named header (case-insensitive), or `None`.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    /// Returns the value of the named header (case-insensitive), or
    /// `default` when absent. Pass `""` to mirror callers that treat a
    /// missing header as an empty string.
    pub fn header_or<'a>(&'a self, name: &str, default: &'a str) -> &'a str {
        self.headers.get_or(name, default)
    }

    /// Returns the stored body bytes unchanged.
    pub fn read(&self) -> &[u8] {
        &self.data
    }

    /// Serializes the record into the on-the-wire cache value.
    pub fn encode(&self) -> Result<Bytes, serde_json::Error> {
        serde_json::to_vec(self).map(Bytes::from)
    }

    /// Materializes a record from a stored cache value.
    ///
    /// Missing fields default (`status` absent, `headers`/`data` empty).
    /// Values not written by this crate are not defended against; a shape
    /// mismatch surfaces as the underlying decode error.
    pub fn decode(raw: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(raw)
    }
}

impl CacheableResponse for CachedResponse {
    fn status(&self) -> Option<u16> {
        self.status
    }

    fn headers(&self) -> impl Iterator<Item = (&str, &str)> {
        self.headers.iter()
    }

    fn body(&self) -> &[u8] {
        &self.data
    }
}
