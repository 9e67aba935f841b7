use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::hash::Hash;

use crate::errors::CoreError;
use super::coin::CoinSearchResult;
use super::currency::Currency;

/// Price API response as consumed: coin id → (currency → price).
pub type PriceTable = HashMap<String, HashMap<String, f64>>;

/// Cache key for `/simple/price`: de-duplicated, sorted ids plus currency.
pub type PriceKey = (Vec<String>, Currency);

/// Look up a coin's price in a table. Missing coin or currency reads as 0.
pub fn price_of(table: &PriceTable, coin_id: &str, currency: Currency) -> f64 {
    table
        .get(coin_id)
        .and_then(|quotes| quotes.get(currency.as_str()))
        .copied()
        .unwrap_or(0.0)
}

/// Result of a gateway call that degrades instead of failing.
///
/// On failure `data` holds the empty value and `error` the reason, so the
/// caller can render the message inline and keep going with what it has.
/// Degraded results are cached like successful ones, error included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fetched<T> {
    pub data: T,
    pub error: Option<CoreError>,
}

impl<T> Fetched<T> {
    pub fn ok(data: T) -> Self {
        Self { data, error: None }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// Drop the error and keep the (possibly empty) data.
    pub fn into_data(self) -> T {
        self.data
    }
}

impl<T: Default> Fetched<T> {
    pub fn failed(error: CoreError) -> Self {
        Self {
            data: T::default(),
            error: Some(error),
        }
    }
}

/// One stored cache entry. This is the on-disk form of a `TtlCache`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry<K, V> {
    pub key: K,
    pub stored_at: DateTime<Utc>,
    pub value: V,
}

/// Time-windowed memo of lookups.
///
/// Each entry remembers when it was stored; it is served while
/// `now - stored_at < ttl` and treated as absent afterwards. Expired entries
/// linger until `prune_expired` or the next insert for the same key.
#[derive(Debug, Clone)]
pub struct TtlCache<K, V> {
    ttl: Duration,
    entries: HashMap<K, (DateTime<Utc>, V)>,
}

impl<K: Eq + Hash, V: Clone> TtlCache<K, V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Cached value for `key` if it is still fresh at `now`.
    pub fn get(&self, key: &K, now: DateTime<Utc>) -> Option<V> {
        let (stored_at, value) = self.entries.get(key)?;
        if now.signed_duration_since(*stored_at) < self.ttl {
            Some(value.clone())
        } else {
            None
        }
    }

    pub fn insert(&mut self, key: K, value: V, now: DateTime<Utc>) {
        self.entries.insert(key, (now, value));
    }

    /// Drop entries that are no longer fresh at `now`. Returns how many were removed.
    pub fn prune_expired(&mut self, now: DateTime<Utc>) -> usize {
        let before = self.entries.len();
        let ttl = self.ttl;
        self.entries
            .retain(|_, (stored_at, _)| now.signed_duration_since(*stored_at) < ttl);
        before - self.entries.len()
    }

    /// Entries still fresh at `now`, ready to be written out.
    pub fn fresh_entries(&self, now: DateTime<Utc>) -> Vec<CacheEntry<K, V>>
    where
        K: Clone,
    {
        self.entries
            .iter()
            .filter(|(_, (stored_at, _))| now.signed_duration_since(*stored_at) < self.ttl)
            .map(|(key, (stored_at, value))| CacheEntry {
                key: key.clone(),
                stored_at: *stored_at,
                value: value.clone(),
            })
            .collect()
    }

    /// Load entries read back from disk. Entries already stale at `now`, or
    /// stamped after `now`, are skipped. Returns how many were kept.
    pub fn restore(&mut self, entries: Vec<CacheEntry<K, V>>, now: DateTime<Utc>) -> usize {
        let mut kept = 0;
        for entry in entries {
            let age = now.signed_duration_since(entry.stored_at);
            if age >= Duration::zero() && age < self.ttl {
                self.entries.insert(entry.key, (entry.stored_at, entry.value));
                kept += 1;
            }
        }
        kept
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Price and search caches as written to the cache file next to the state
/// file. Never part of the state file itself.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CacheSnapshot {
    #[serde(default)]
    pub prices: Vec<CacheEntry<PriceKey, Fetched<PriceTable>>>,
    #[serde(default)]
    pub searches: Vec<CacheEntry<String, Fetched<Vec<CoinSearchResult>>>>,
}

impl CacheSnapshot {
    pub fn is_empty(&self) -> bool {
        self.prices.is_empty() && self.searches.is_empty()
    }
}
