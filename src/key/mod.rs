//! Cache key derivation.
//!
//! Keys namespace the backing store by service identifier and bound their
//! length by hashing the URL: a 2 KiB request URL and a 10-byte one both
//! produce a 40-hex-character digest.

use sha1::{Digest, Sha1};

/// Derives the cache key for a `(service, url)` pair.
///
/// The key is `{service}-{hex(sha1(url))}`: deterministic, fixed-length
/// past the service prefix, and collision-free for all practical purposes.
/// The URL is hashed as its UTF-8 bytes.
///
/// # Examples
///
/// ```
/// use recache::key::derive_key;
///
/// assert_eq!(
///     derive_key("abc", "/api/v1/test"),
///     "abc-8157d24840389b1fec9480b59d9db3bde083cfee",
/// );
/// ```
pub fn derive_key(service: &str, url: &str) -> String {
    let digest = Sha1::digest(url.as_bytes());
    format!("{service}-{}", hex::encode(digest))
}
