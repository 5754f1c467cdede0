//! Lookup cache: key composition, the cache contract, and its two
//! reference implementations.
//!
//! Cache keys are the looked-up identifier plus every query option
//! rendered in call order, so two lookups with different option sets
//! never collide. Values are stored behind [`Arc`]: a hit hands back the
//! same allocation that was written, never a copy, and repeated hits for
//! one entry are pointer-equal until the entry is invalidated or replaced.
//!
//! [`DefaultCache`] bounds the store by entry count and TTL using moka's
//! LRU cache; [`NoCache`] reports every probe as a miss, forcing each call
//! onto the network.

use std::sync::Arc;
use std::time::Duration;

use crate::model::{AutonomousSystem, IpInfo, RequesterIpInfo};
use crate::options::LookupOption;

/// Compose the cache key for a lookup.
///
/// Deterministic and pure: the primary key followed by `;name=value` for
/// each option, in call order. Options are not sorted or de-duplicated;
/// order is significant.
pub fn compose_key(primary_key: &str, options: &[LookupOption]) -> String {
    let mut key = String::from(primary_key);
    for option in options {
        key.push(';');
        key.push_str(&option.name);
        key.push('=');
        key.push_str(&option.value);
    }
    key
}

/// A cached payload.
///
/// One enum covers every cacheable operation so a single cache instance
/// can back the whole client. Variants hold `Arc`s; cloning the enum is
/// cheap and preserves payload identity.
#[derive(Debug, Clone)]
pub enum CachedValue {
    Ip(Arc<IpInfo>),
    Asn(Arc<AutonomousSystem>),
    OriginIp(Arc<RequesterIpInfo>),
}

/// Ties a payload type to its [`CachedValue`] variant and to the
/// identifier the payload itself carries (used as the cache key for
/// fresh batch results).
pub(crate) trait Cacheable: Sized {
    fn into_cached(value: Arc<Self>) -> CachedValue;
    fn from_cached(value: CachedValue) -> Option<Arc<Self>>;
    fn cache_id(&self) -> String;
}

impl Cacheable for IpInfo {
    fn into_cached(value: Arc<Self>) -> CachedValue {
        CachedValue::Ip(value)
    }

    fn from_cached(value: CachedValue) -> Option<Arc<Self>> {
        match value {
            CachedValue::Ip(info) => Some(info),
            _ => None,
        }
    }

    fn cache_id(&self) -> String {
        self.ip.clone()
    }
}

impl Cacheable for AutonomousSystem {
    fn into_cached(value: Arc<Self>) -> CachedValue {
        CachedValue::Asn(value)
    }

    fn from_cached(value: CachedValue) -> Option<Arc<Self>> {
        match value {
            CachedValue::Asn(system) => Some(system),
            _ => None,
        }
    }

    fn cache_id(&self) -> String {
        self.asn.to_string()
    }
}

impl Cacheable for RequesterIpInfo {
    fn into_cached(value: Arc<Self>) -> CachedValue {
        CachedValue::OriginIp(value)
    }

    fn from_cached(value: CachedValue) -> Option<Arc<Self>> {
        match value {
            CachedValue::OriginIp(info) => Some(info),
            _ => None,
        }
    }

    fn cache_id(&self) -> String {
        self.info.ip.clone()
    }
}

/// Key-value store consumed by the client for successful lookups.
///
/// All operations are synchronous and never fail for a normal miss or
/// overwrite. Implementations must tolerate interleaved `get`/`put` from
/// concurrent tasks; entries are replaced whole, last write wins.
pub trait LookupCache: Send + Sync {
    /// Look up an entry. Returns `None` on miss, never errors.
    fn get(&self, key: &str) -> Option<CachedValue>;

    /// Unconditional upsert; overwrites any prior entry for the key.
    fn put(&self, key: &str, value: CachedValue);

    /// Remove one entry if present; no-op when absent.
    fn invalidate(&self, key: &str);

    /// Clear every entry.
    fn invalidate_all(&self);
}

/// Default number of entries retained by [`DefaultCache`].
pub const DEFAULT_MAX_ENTRIES: u64 = 2048;

/// Default time-to-live for [`DefaultCache`] entries.
pub const DEFAULT_TTL: Duration = Duration::from_secs(600);

/// Bounded in-memory cache: LRU eviction past the entry bound plus
/// passive TTL expiry, backed by moka.
pub struct DefaultCache {
    cache: moka::sync::Cache<String, CachedValue>,
}

impl DefaultCache {
    /// Create a cache holding at most `max_entries` values, each expiring
    /// `ttl` after insertion.
    pub fn new(max_entries: u64, ttl: Duration) -> Self {
        let cache = moka::sync::Cache::builder()
            .max_capacity(max_entries)
            .time_to_live(ttl)
            .build();
        Self { cache }
    }
}

impl Default for DefaultCache {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ENTRIES, DEFAULT_TTL)
    }
}

impl LookupCache for DefaultCache {
    fn get(&self, key: &str) -> Option<CachedValue> {
        self.cache.get(key)
    }

    fn put(&self, key: &str, value: CachedValue) {
        self.cache.insert(key.to_string(), value);
    }

    fn invalidate(&self, key: &str) {
        self.cache.invalidate(key);
    }

    fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }
}

/// Cache that never stores anything; every probe misses, so every call
/// reaches the network.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCache;

impl LookupCache for NoCache {
    fn get(&self, _key: &str) -> Option<CachedValue> {
        None
    }

    fn put(&self, _key: &str, _value: CachedValue) {}

    fn invalidate(&self, _key: &str) {}

    fn invalidate_all(&self) {}
}
