//! Header mapping with case-insensitive name lookup.
//!
//! HTTP header names are case-insensitive per [RFC 9110 §5]; a cached record
//! must honor that regardless of the casing the upstream service used.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A case-insensitive, single-value header mapping for cached responses.
///
/// Stores one value per header name (a later insert with any casing of the
/// same name replaces the earlier value). Insertion order is not preserved —
/// cached records are looked up by name, never replayed on the wire.
///
/// # Examples
///
/// ```
/// use recache::response::HeaderMap;
///
/// let mut headers = HeaderMap::new();
/// headers.insert("Content-Disposition", "attachment; filename=report.csv");
///
/// assert_eq!(
///     headers.get("content-disposition"),
///     Some("attachment; filename=report.csv"),
/// );
/// assert_eq!(headers.get_or("x-missing", "fallback"), "fallback");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HeaderMap {
    inner: HashMap<String, String>,
}

impl HeaderMap {
    /// Creates an empty header map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a header, replacing any existing value stored under the same
    /// name in any casing.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        self.inner.retain(|k, _| !k.eq_ignore_ascii_case(&name));
        self.inner.insert(name, value.into());
    }

    /// Returns the value for the given header name (case-insensitive), or `None`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.inner
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Returns the value for the given header name (case-insensitive), or
    /// `default` when the header is absent.
    pub fn get_or<'a>(&'a self, name: &str, default: &'a str) -> &'a str {
        self.get(name).unwrap_or(default)
    }

    /// Returns `true` if the map contains an entry with the given name.
    pub fn contains(&self, name: &str) -> bool {
        self.inner.keys().any(|k| k.eq_ignore_ascii_case(name))
    }

    /// Returns the number of stored headers.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns `true` if there are no stored headers.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns an iterator over all `(name, value)` pairs, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.inner.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<N, V> FromIterator<(N, V)> for HeaderMap
where
    N: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut headers = Self::new();
        for (name, value) in iter {
            headers.insert(name, value);
        }
        headers
    }
}

impl fmt::Display for HeaderMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, value) in &self.inner {
            write!(f, "{name}: {value}\r\n")?;
        }
        Ok(())
    }
}
