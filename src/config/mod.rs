//! Cache configuration.
//!
//! [`CacheSettings`] is deliberately small: deployments load it from their
//! own configuration source (a settings file, environment layer, etc.) and
//! hand it to [`CacheClient::new`](crate::client::CacheClient::new). The
//! store backend's own configuration (server addresses, timeouts) belongs
//! to the store implementation, not here.

use serde::{Deserialize, Serialize};

/// Settings recognized by the caching layer.
///
/// Both fields are optional; an all-default `CacheSettings` yields the
/// fixed-duration policy with its hardcoded 300-second expiry.
///
/// # Examples
///
/// ```
/// use recache::config::CacheSettings;
///
/// let settings: CacheSettings = serde_json::from_str(
///     r#"{"policy_class": "per_service", "default_expiry_secs": 60}"#,
/// ).unwrap();
/// assert_eq!(settings.policy_class.as_deref(), Some("per_service"));
/// assert_eq!(settings.default_expiry_secs, Some(60));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheSettings {
    /// Name of an alternate expiry policy registered in the
    /// [`PolicyRegistry`](crate::policy::PolicyRegistry). Absent means the
    /// default fixed-duration policy.
    #[serde(default)]
    pub policy_class: Option<String>,

    /// Expiry in seconds used by the default policy when set. `0` means
    /// cache with no expiry. Absent means the built-in default of 300.
    #[serde(default)]
    pub default_expiry_secs: Option<u64>,
}
