//! # Site Data
//!
//! The contract for external site lookups (geocoding, seismic design
//! parameters, code jurisdiction) and a process-wide TTL cache in front of
//! them. The core never talks to a network service itself; a caller plugs a
//! [`SiteDataSource`] in and the estimate pipeline consumes [`SiteData`].
//!
//! Lookups degrade instead of failing: [`resolve_site`] turns any source
//! error into [`SiteData::unavailable`], and downstream code omits the
//! dependent fields.
//!
//! ## Example
//!
//! ```rust
//! use rack_core::compliance::SeismicDesignCategory;
//! use rack_core::site::{resolve_site, SiteData, StaticSiteSource};
//!
//! let mut source = StaticSiteSource::new("fixtures");
//! source.insert("Perris, CA", SiteData {
//!     seismic_design_category: Some(SeismicDesignCategory::D),
//!     ..SiteData::unavailable()
//! });
//!
//! assert_eq!(resolve_site(&source, "perris, ca").seismic_design_category, Some(SeismicDesignCategory::D));
//! assert!(!resolve_site(&source, "Atlantis").is_available());
//! ```

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::compliance::{CommodityClass, Jurisdiction, SeismicDesignCategory};
use crate::errors::{CalcError, CalcResult};

/// Default time-to-live for cached lookups.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(60 * 60);

/// What is known about a site. Every field is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SiteData {
    #[serde(default)]
    pub seismic_design_category: Option<SeismicDesignCategory>,
    #[serde(default)]
    pub commodity_class: Option<CommodityClass>,
    #[serde(default)]
    pub jurisdiction: Option<Jurisdiction>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
}

impl SiteData {
    /// The "no data available" state.
    pub fn unavailable() -> Self {
        SiteData::default()
    }

    /// Whether anything at all is known
    pub fn is_available(&self) -> bool {
        self.seismic_design_category.is_some()
            || self.commodity_class.is_some()
            || self.jurisdiction.is_some()
            || self.latitude.is_some()
    }

    /// Jurisdiction as given, else inferred from coordinates.
    pub fn resolved_jurisdiction(&self) -> Option<Jurisdiction> {
        self.jurisdiction.or(match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some(Jurisdiction::from_coordinates(lat, lon)),
            _ => None,
        })
    }
}

/// A provider of site data keyed by a free-text query (usually an address).
pub trait SiteDataSource {
    /// Stable name used to partition the shared cache
    fn name(&self) -> &str;

    fn lookup(&self, query: &str) -> CalcResult<SiteData>;
}

fn normalize_query(query: &str) -> String {
    query.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
}

/// In-memory source for fixtures, tests and offline use.
#[derive(Debug, Clone, Default)]
pub struct StaticSiteSource {
    name: String,
    entries: HashMap<String, SiteData>,
}

impl StaticSiteSource {
    pub fn new(name: impl Into<String>) -> Self {
        StaticSiteSource {
            name: name.into(),
            entries: HashMap::new(),
        }
    }

    pub fn insert(&mut self, query: &str, data: SiteData) {
        self.entries.insert(normalize_query(query), data);
    }
}

impl SiteDataSource for StaticSiteSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookup(&self, query: &str) -> CalcResult<SiteData> {
        self.entries
            .get(&normalize_query(query))
            .cloned()
            .ok_or_else(|| CalcError::lookup_failed(query, "no entry for this site"))
    }
}

struct CacheEntry {
    data: SiteData,
    expires_at: Instant,
}

static SITE_CACHE: Lazy<Mutex<HashMap<String, CacheEntry>>> = Lazy::new(|| Mutex::new(HashMap::new()));

/// Wraps a source with the shared TTL cache.
///
/// Only successful lookups are cached. A poisoned cache lock is treated as a
/// miss, so results stay correct with the cache unusable.
pub struct CachedSiteSource<S> {
    inner: S,
    ttl: Duration,
}

impl<S: SiteDataSource> CachedSiteSource<S> {
    pub fn new(inner: S) -> Self {
        Self::with_ttl(inner, DEFAULT_CACHE_TTL)
    }

    pub fn with_ttl(inner: S, ttl: Duration) -> Self {
        CachedSiteSource { inner, ttl }
    }

    fn cache_key(&self, query: &str) -> String {
        format!("{}::{}", self.inner.name(), normalize_query(query))
    }
}

impl<S: SiteDataSource> SiteDataSource for CachedSiteSource<S> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn lookup(&self, query: &str) -> CalcResult<SiteData> {
        let key = self.cache_key(query);

        if let Ok(cache) = SITE_CACHE.lock() {
            if let Some(entry) = cache.get(&key) {
                if Instant::now() < entry.expires_at {
                    tracing::debug!(%key, "site cache hit");
                    return Ok(entry.data.clone());
                }
            }
        }

        let data = self.inner.lookup(query)?;

        if let Ok(mut cache) = SITE_CACHE.lock() {
            let now = Instant::now();
            cache.retain(|_, entry| now < entry.expires_at);
            cache.insert(
                key,
                CacheEntry {
                    data: data.clone(),
                    expires_at: now + self.ttl,
                },
            );
        }

        Ok(data)
    }
}

/// Look a site up, degrading to [`SiteData::unavailable`] on any failure.
pub fn resolve_site(source: &dyn SiteDataSource, query: &str) -> SiteData {
    match source.lookup(query) {
        Ok(data) => data,
        Err(err) => {
            tracing::warn!(source = source.name(), query, error = %err, "site lookup failed; continuing without site data");
            SiteData::unavailable()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    /// Counts calls so cache hits are observable.
    struct CountingSource {
        name: String,
        calls: Cell<u32>,
        fail: bool,
    }

    impl CountingSource {
        fn new(name: &str, fail: bool) -> Self {
            CountingSource {
                name: name.to_string(),
                calls: Cell::new(0),
                fail,
            }
        }
    }

    impl SiteDataSource for CountingSource {
        fn name(&self) -> &str {
            &self.name
        }

        fn lookup(&self, query: &str) -> CalcResult<SiteData> {
            self.calls.set(self.calls.get() + 1);
            if self.fail {
                return Err(CalcError::lookup_failed(query, "upstream timeout"));
            }
            Ok(SiteData {
                seismic_design_category: Some(SeismicDesignCategory::C),
                ..SiteData::unavailable()
            })
        }
    }

    #[test]
    fn test_static_source_normalizes_queries() {
        let mut source = StaticSiteSource::new("static-normalize");
        source.insert("  Joliet,   IL ", SiteData {
            jurisdiction: Some(Jurisdiction::IBC),
            ..SiteData::unavailable()
        });
        assert!(source.lookup("joliet, il").is_ok());
        assert_eq!(source.lookup("Gary, IN").unwrap_err().error_code(), "LOOKUP_FAILED");
    }

    #[test]
    fn test_cache_serves_repeat_lookups() {
        // Source names are unique per test so the shared cache does not leak between tests.
        let cached = CachedSiteSource::new(CountingSource::new("counting-hit", false));
        let first = cached.lookup("Perris, CA").unwrap();
        let second = cached.lookup("perris,  ca").unwrap();
        assert_eq!(first, second);
        assert_eq!(cached.inner.calls.get(), 1);
    }

    #[test]
    fn test_zero_ttl_always_misses() {
        let cached = CachedSiteSource::with_ttl(CountingSource::new("counting-ttl", false), Duration::ZERO);
        cached.lookup("Reno, NV").unwrap();
        cached.lookup("Reno, NV").unwrap();
        assert_eq!(cached.inner.calls.get(), 2);
    }

    #[test]
    fn test_failures_are_not_cached_and_degrade() {
        let cached = CachedSiteSource::new(CountingSource::new("counting-fail", true));
        let data = resolve_site(&cached, "Nowhere");
        assert_eq!(data, SiteData::unavailable());
        resolve_site(&cached, "Nowhere");
        assert_eq!(cached.inner.calls.get(), 2);
    }

    #[test]
    fn test_resolved_jurisdiction_from_coordinates() {
        let data = SiteData {
            latitude: Some(33.78),
            longitude: Some(-117.23),
            ..SiteData::unavailable()
        };
        assert_eq!(data.resolved_jurisdiction(), Some(Jurisdiction::CBC));
        assert!(data.is_available());
        assert_eq!(SiteData::unavailable().resolved_jurisdiction(), None);
    }
}
