//! Semantic-version ordering for prompt versions.
//!
//! Components compare numerically, so `1.10.0` sorts after `1.9.9`. A string
//! that is not three dot-separated non-negative integers ranks as `0.0.0`.

use std::cmp::Reverse;

use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct VersionKey(pub u64, pub u64, pub u64);

impl VersionKey {
    pub const MIN: VersionKey = VersionKey(0, 0, 0);

    /// Strict `MAJOR.MINOR.PATCH` parse.
    pub fn parse(version: &str) -> Option<Self> {
        let mut parts = version.split('.');
        let major = parts.next()?.parse().ok()?;
        let minor = parts.next()?.parse().ok()?;
        let patch = parts.next()?.parse().ok()?;
        if parts.next().is_some() {
            return None;
        }
        Some(VersionKey(major, minor, patch))
    }

    /// Ordering key with the lowest-rank fallback for unparseable strings.
    pub fn sort_key(version: &str) -> Self {
        Self::parse(version).unwrap_or_else(|| {
            warn!("Invalid semantic version format: {version}");
            Self::MIN
        })
    }
}

/// Key for a total order over version strings: numeric first, raw string as tie-break.
pub fn order_key(version: &str) -> (VersionKey, &str) {
    (VersionKey::sort_key(version), version)
}

/// Sorts newest first. Each key is computed once per element.
pub fn sort_descending(versions: &mut [String]) {
    versions.sort_by_cached_key(|v| Reverse((VersionKey::sort_key(v), v.clone())));
}

/// Highest version under `order_key`, if any.
pub fn latest<'a, I>(versions: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    versions
        .into_iter()
        .map(order_key)
        .max()
        .map(|(_, version)| version)
}
