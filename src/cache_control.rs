//! Cache-Control header builder
//!
//! Directives are kept in call order and joined with `", "`. Duplicate or
//! conflicting directives are not checked.

use std::fmt;
use std::time::Duration;

/// Builder for a `Cache-Control` header value
///
/// ```
/// use std::time::Duration;
/// use webresources::CacheControl;
///
/// let value = CacheControl::new()
///     .public_cache()
///     .max_age(Duration::from_secs(3600))
///     .build();
/// assert_eq!(value, "public, max-age=3600");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheControl {
    directives: Vec<String>,
}

impl CacheControl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stale responses must be revalidated before use
    #[must_use]
    pub fn must_revalidate(self) -> Self {
        self.append("must-revalidate")
    }

    /// Caches must validate with the origin before reuse
    #[must_use]
    pub fn no_cache(self) -> Self {
        self.append("no-cache")
    }

    /// Nothing about the response may be stored
    #[must_use]
    pub fn no_store(self) -> Self {
        self.append("no-store")
    }

    /// Intermediaries must not transform the payload
    #[must_use]
    pub fn no_transform(self) -> Self {
        self.append("no-transform")
    }

    /// Any cache may store the response
    #[must_use]
    pub fn public_cache(self) -> Self {
        self.append("public")
    }

    /// Only a private (browser) cache may store the response
    #[must_use]
    pub fn private_cache(self) -> Self {
        self.append("private")
    }

    /// Like `must-revalidate`, for shared caches only
    #[must_use]
    pub fn proxy_revalidate(self) -> Self {
        self.append("proxy-revalidate")
    }

    /// Freshness lifetime, truncated to whole seconds
    #[must_use]
    pub fn max_age(self, duration: Duration) -> Self {
        self.append(format!("max-age={}", duration.as_secs()))
    }

    /// Freshness lifetime for shared caches, truncated to whole seconds
    #[must_use]
    pub fn s_max_age(self, duration: Duration) -> Self {
        self.append(format!("s-maxage={}", duration.as_secs()))
    }

    /// Whether no directive has been added
    pub fn is_empty(&self) -> bool {
        self.directives.is_empty()
    }

    /// Header value; empty when no directive was added
    pub fn build(&self) -> String {
        self.directives.join(", ")
    }

    fn append(mut self, directive: impl Into<String>) -> Self {
        self.directives.push(directive.into());
        self
    }
}

impl fmt::Display for CacheControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.build())
    }
}

/// Common cache policies
#[derive(Debug, Clone, Copy)]
pub enum CachePolicy {
    /// Public cache with specified max-age (seconds)
    Public(u32),
    /// Private cache (browser cache only)
    Private(u32),
    /// No cache
    NoCache,
    /// No store
    NoStore,
}

impl From<CachePolicy> for CacheControl {
    fn from(policy: CachePolicy) -> Self {
        let secs = |s: u32| Duration::from_secs(u64::from(s));
        match policy {
            CachePolicy::Public(max_age) => Self::new().public_cache().max_age(secs(max_age)),
            CachePolicy::Private(max_age) => Self::new().private_cache().max_age(secs(max_age)),
            CachePolicy::NoCache => Self::new().no_cache(),
            CachePolicy::NoStore => Self::new().no_store(),
        }
    }
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self::Public(3600) // 1 hour
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty() {
        let cc = CacheControl::new();
        assert!(cc.is_empty());
        assert_eq!(cc.build(), "");
    }

    #[test]
    fn test_call_order_preserved() {
        let cc = CacheControl::new().no_cache().no_store().must_revalidate();
        assert!(!cc.is_empty());
        assert_eq!(cc.build(), "no-cache, no-store, must-revalidate");
    }

    #[test]
    fn test_all_flags() {
        let cc = CacheControl::new()
            .must_revalidate()
            .no_cache()
            .no_store()
            .no_transform()
            .public_cache()
            .private_cache()
            .proxy_revalidate();
        assert_eq!(
            cc.to_string(),
            "must-revalidate, no-cache, no-store, no-transform, public, private, proxy-revalidate"
        );
    }

    #[test]
    fn test_durations_truncate_to_seconds() {
        let cc = CacheControl::new()
            .max_age(Duration::from_secs(2 * 60 * 60))
            .s_max_age(Duration::from_millis(1999));
        assert_eq!(cc.build(), "max-age=7200, s-maxage=1");

        let sub_second = CacheControl::new().max_age(Duration::from_millis(900));
        assert_eq!(sub_second.build(), "max-age=0");
    }

    #[test]
    fn test_duplicates_are_kept() {
        let cc = CacheControl::new().public_cache().public_cache();
        assert_eq!(cc.build(), "public, public");
    }

    #[test]
    fn test_cache_policy() {
        assert_eq!(
            CacheControl::from(CachePolicy::Public(3600)).build(),
            "public, max-age=3600"
        );
        assert_eq!(
            CacheControl::from(CachePolicy::Private(600)).build(),
            "private, max-age=600"
        );
        assert_eq!(CacheControl::from(CachePolicy::NoCache).build(), "no-cache");
        assert_eq!(CacheControl::from(CachePolicy::NoStore).build(), "no-store");
        assert_eq!(
            CacheControl::from(CachePolicy::default()).build(),
            "public, max-age=3600"
        );
    }
}
