use chrono::{DateTime, Duration, Utc};
use std::collections::BTreeSet;

use crate::models::coin::CoinSearchResult;
use crate::models::currency::Currency;
use crate::models::price::{CacheSnapshot, Fetched, PriceKey, PriceTable, TtlCache};
use crate::providers::traits::MarketDataProvider;

/// Price gateway: the market-data provider behind a time-windowed cache.
///
/// Cache strategy:
/// - Every lookup is memoized per argument set for `ttl` (600 s by default),
///   failures included; a hit inside the window never touches the network
///   and replays the stored error, if any.
/// - Expired entries are pruned whenever a new one is stored.
/// - `snapshot` / `restore` move the caches in and out of the cache file so
///   the window survives across processes.
///
/// Failures never propagate: they come back as `Fetched { data: empty, error }`
/// and are logged once at `warn`, when the provider call fails.
pub struct PriceService {
    provider: Box<dyn MarketDataProvider>,
    prices: TtlCache<PriceKey, Fetched<PriceTable>>,
    searches: TtlCache<String, Fetched<Vec<CoinSearchResult>>>,
    changed: bool,
}

impl PriceService {
    pub fn new(provider: Box<dyn MarketDataProvider>, ttl: Duration) -> Self {
        Self {
            provider,
            prices: TtlCache::new(ttl),
            searches: TtlCache::new(ttl),
            changed: false,
        }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Current prices for `coin_ids` in `currency`, one batched request.
    pub async fn fetch_prices(&mut self, coin_ids: &[String], currency: Currency) -> Fetched<PriceTable> {
        self.fetch_prices_at(coin_ids, currency, Utc::now()).await
    }

    /// `fetch_prices` with an explicit clock reading.
    pub async fn fetch_prices_at(
        &mut self,
        coin_ids: &[String],
        currency: Currency,
        now: DateTime<Utc>,
    ) -> Fetched<PriceTable> {
        let ids: Vec<String> = coin_ids
            .iter()
            .filter(|id| !id.is_empty())
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        if ids.is_empty() {
            return Fetched::ok(PriceTable::new());
        }

        let key: PriceKey = (ids, currency);
        if let Some(cached) = self.prices.get(&key, now) {
            tracing::debug!(coins = key.0.len(), %currency, failed = !cached.is_ok(), "price cache hit");
            return cached;
        }

        tracing::debug!(coins = key.0.len(), %currency, "fetching prices");
        let fetched = match self.provider.simple_price(&key.0, currency).await {
            Ok(table) => Fetched::ok(table),
            Err(e) => {
                tracing::warn!(provider = self.provider.name(), error = %e, "price fetch failed");
                Fetched::failed(e)
            }
        };

        self.prices.prune_expired(now);
        self.prices.insert(key, fetched.clone(), now);
        self.changed = true;
        fetched
    }

    /// Coins matching a free-text query. Blank queries return nothing
    /// without a request.
    pub async fn search_coins(&mut self, query: &str) -> Fetched<Vec<CoinSearchResult>> {
        self.search_coins_at(query, Utc::now()).await
    }

    /// `search_coins` with an explicit clock reading.
    pub async fn search_coins_at(&mut self, query: &str, now: DateTime<Utc>) -> Fetched<Vec<CoinSearchResult>> {
        if query.trim().is_empty() {
            return Fetched::ok(Vec::new());
        }

        let key = query.to_string();
        if let Some(cached) = self.searches.get(&key, now) {
            tracing::debug!(query, failed = !cached.is_ok(), "search cache hit");
            return cached;
        }

        let fetched = match self.provider.search(query).await {
            Ok(results) => Fetched::ok(results),
            Err(e) => {
                tracing::warn!(provider = self.provider.name(), query, error = %e, "coin search failed");
                Fetched::failed(e)
            }
        };

        self.searches.prune_expired(now);
        self.searches.insert(key, fetched.clone(), now);
        self.changed = true;
        fetched
    }

    /// Forget every memoized result.
    pub fn clear_cache(&mut self) {
        self.prices.clear();
        self.searches.clear();
        self.changed = true;
    }

    /// Whether the caches changed since the last call. Resets the flag.
    pub fn take_changed(&mut self) -> bool {
        std::mem::take(&mut self.changed)
    }

    /// Fresh entries of both caches, for the cache file.
    pub fn snapshot(&self, now: DateTime<Utc>) -> CacheSnapshot {
        CacheSnapshot {
            prices: self.prices.fresh_entries(now),
            searches: self.searches.fresh_entries(now),
        }
    }

    /// Seed the caches from a snapshot. Stale entries are dropped; returns
    /// how many were kept.
    pub fn restore(&mut self, snapshot: CacheSnapshot, now: DateTime<Utc>) -> usize {
        self.prices.restore(snapshot.prices, now) + self.searches.restore(snapshot.searches, now)
    }

    /// Stored (price, search) cache entries. Expired ones count until pruned.
    pub fn cache_sizes(&self) -> (usize, usize) {
        (self.prices.len(), self.searches.len())
    }

    /// Drop expired entries from both caches. Returns how many were removed.
    pub fn prune_cache(&mut self, now: DateTime<Utc>) -> usize {
        self.prices.prune_expired(now) + self.searches.prune_expired(now)
    }
}
