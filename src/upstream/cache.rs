//! TTL-aware response cache for upstream calls.
//!
//! [`CacheStore`] is the storage seam: entries are JSON values keyed by a [`CacheKey`] that
//! combines the call family with the call's arguments. [`Cache`] layers typed load/save on top of
//! a shared store so that providers don't need to deal with serialization.
//!
//! [`MemoryCache`] is the in-process store, built on `moka`. Each family holds a bounded number of
//! entries and the least recently used one is evicted once the bound is reached.

use core::fmt;
use core::time::Duration;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use moka::Expiry;
use moka::policy::EvictionPolicy;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

const LOG_TARGET: &str = "     cache";

/// Result of loading an entry from the cache.
#[derive(Debug, Clone)]
pub enum CacheResult<T> {
    /// Cached data was found and is still fresh.
    Data(T),

    /// A negative cache entry exists: the upstream previously reported the resource as absent.
    NoData(String),

    /// No usable cache entry exists (never stored, expired, or undecodable).
    Miss,
}

/// What gets stored for a key.
#[derive(Debug, Clone, PartialEq)]
pub enum CachedValue {
    /// Actual upstream data.
    Data(Value),

    /// The resource is not available, with a reason explaining why.
    NoData(String),
}

/// Identifies one cacheable call: the call family plus its arguments.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    family: &'static str,
    key: String,
}

impl CacheKey {
    #[must_use]
    pub fn new(family: &'static str, args: &[&str]) -> Self {
        let mut key = String::from(family);
        for arg in args {
            key.push('/');
            key.push_str(arg);
        }

        Self { family, key }
    }

    /// The call family this key belongs to.
    #[must_use]
    pub const fn family(&self) -> &'static str {
        self.family
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.key
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key)
    }
}

/// Storage backend for cached upstream responses.
pub trait CacheStore: Send + Sync + fmt::Debug {
    /// Look up `key`, returning [`CacheResult::Miss`] when absent or expired.
    fn get(&self, key: &CacheKey) -> CacheResult<Value>;

    /// Store `value` under `key` for `ttl`.
    fn put(&self, key: &CacheKey, value: CachedValue, ttl: Duration);
}

/// Typed access to a shared [`CacheStore`].
#[derive(Debug, Clone)]
pub struct Cache {
    store: Arc<dyn CacheStore>,
}

impl Cache {
    #[must_use]
    pub fn new(store: Arc<dyn CacheStore>) -> Self {
        Self { store }
    }

    /// A cache that never retains anything.
    #[must_use]
    pub fn disabled() -> Self {
        Self::new(Arc::new(NoCache))
    }

    /// Load a cache entry.
    #[must_use]
    pub fn load<T>(&self, key: &CacheKey) -> CacheResult<T>
    where
        T: DeserializeOwned,
    {
        match self.store.get(key) {
            CacheResult::Data(value) => match serde_json::from_value(value) {
                Ok(data) => CacheResult::Data(data),
                Err(e) => {
                    log::debug!(target: LOG_TARGET, "Cache miss for {key}: {e:#}");
                    CacheResult::Miss
                }
            },
            CacheResult::NoData(reason) => CacheResult::NoData(reason),
            CacheResult::Miss => CacheResult::Miss,
        }
    }

    /// Save data under `key` for `ttl`.
    pub fn save<T>(&self, key: &CacheKey, data: &T, ttl: Duration)
    where
        T: Serialize,
    {
        match serde_json::to_value(data) {
            Ok(value) => self.store.put(key, CachedValue::Data(value), ttl),
            Err(e) => log::debug!(target: LOG_TARGET, "Not caching {key}: {e:#}"),
        }
    }

    /// Save a negative entry under `key` for `ttl`.
    pub fn save_no_data(&self, key: &CacheKey, reason: &str, ttl: Duration) {
        self.store.put(key, CachedValue::NoData(reason.to_string()), ttl);
    }
}

#[derive(Debug)]
struct NoCache;

impl CacheStore for NoCache {
    fn get(&self, _key: &CacheKey) -> CacheResult<Value> {
        CacheResult::Miss
    }

    fn put(&self, _key: &CacheKey, _value: CachedValue, _ttl: Duration) {}
}

#[derive(Debug, Clone)]
struct Entry {
    value: CachedValue,
    ttl: Duration,
}

/// Expires each entry after the TTL it was stored with.
#[derive(Debug)]
struct EntryTtl;

impl Expiry<String, Entry> for EntryTtl {
    fn expire_after_create(&self, _key: &String, entry: &Entry, _created_at: Instant) -> Option<Duration> {
        Some(entry.ttl)
    }

    fn expire_after_update(&self, _key: &String, entry: &Entry, _updated_at: Instant, _remaining: Option<Duration>) -> Option<Duration> {
        Some(entry.ttl)
    }
}

type FamilyCache = moka::sync::Cache<String, Entry>;

/// In-process [`CacheStore`] with a bounded entry count per call family.
///
/// Every family is its own `moka` cache, created on first use with the family's limit.
#[derive(Debug)]
pub struct MemoryCache {
    families: moka::sync::Cache<&'static str, FamilyCache>,
    limits: HashMap<&'static str, u64>,
    default_limit: u64,
}

impl MemoryCache {
    /// Create a store holding at most `default_limit` entries for any family without an explicit limit.
    #[must_use]
    pub fn new(default_limit: usize) -> Self {
        Self {
            families: moka::sync::Cache::builder().build(),
            limits: HashMap::new(),
            default_limit: entry_bound(default_limit),
        }
    }

    /// Bound the number of entries kept for `family`.
    #[must_use]
    pub fn with_limit(mut self, family: &'static str, max_entries: usize) -> Self {
        let _ = self.limits.insert(family, entry_bound(max_entries));
        self
    }

    fn limit_for(&self, family: &str) -> u64 {
        self.limits.get(family).copied().unwrap_or(self.default_limit)
    }

    fn family(&self, family: &'static str) -> FamilyCache {
        self.families.get_with(family, || {
            let limit = self.limit_for(family);
            log::debug!(target: LOG_TARGET, "Creating cache for {family} holding up to {limit} entries");
            moka::sync::Cache::builder()
                .max_capacity(limit)
                .eviction_policy(EvictionPolicy::lru())
                .expire_after(EntryTtl)
                .build()
        })
    }

    #[cfg(test)]
    fn entry_count(&self, family: &'static str) -> u64 {
        let cache = self.family(family);
        cache.run_pending_tasks();
        cache.entry_count()
    }
}

fn entry_bound(max_entries: usize) -> u64 {
    u64::try_from(max_entries).unwrap_or(u64::MAX)
}

impl CacheStore for MemoryCache {
    fn get(&self, key: &CacheKey) -> CacheResult<Value> {
        match self.family(key.family()).get(key.as_str()) {
            Some(entry) => {
                log::debug!(target: LOG_TARGET, "Cache hit for {key}");
                match entry.value {
                    CachedValue::Data(value) => CacheResult::Data(value),
                    CachedValue::NoData(reason) => CacheResult::NoData(reason),
                }
            }
            None => {
                log::debug!(target: LOG_TARGET, "Cache miss for {key}");
                CacheResult::Miss
            }
        }
    }

    fn put(&self, key: &CacheKey, value: CachedValue, ttl: Duration) {
        if self.limit_for(key.family()) == 0 {
            return;
        }

        self.family(key.family()).insert(key.as_str().to_string(), Entry { value, ttl });
    }
}
