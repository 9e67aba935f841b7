pub mod errors;
pub mod models;
pub mod providers;
pub mod services;
pub mod storage;

use chrono::{Duration, Utc};
use models::{
    coin::CoinSearchResult,
    currency::Currency,
    dashboard::{Dashboard, SectorView, TargetEntry},
    portfolio::Portfolio,
    price::{Fetched, PriceTable},
    settings::Settings,
};
use providers::{coingecko::CoinGeckoProvider, traits::MarketDataProvider};
use services::{
    dashboard_service::DashboardService, portfolio_service::PortfolioService,
    price_service::PriceService,
};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use storage::manager::StorageManager;

use errors::CoreError;

/// Main entry point for the Sector Tracker core library.
///
/// Owns the portfolio, the path it is persisted to, and the price gateway.
/// Every mutation that changes the portfolio is written back to disk before
/// the method returns; invalid input is ignored and reported as `Ok(false)`.
///
/// When opened from settings, cached prices and searches are read from and
/// written to `Settings::cache_file`, so repeated runs inside the cache
/// window reuse earlier results.
#[must_use]
pub struct SectorTracker {
    portfolio: Portfolio,
    data_file: PathBuf,
    cache_file: Option<PathBuf>,
    portfolio_service: PortfolioService,
    price_service: PriceService,
    dashboard_service: DashboardService,
}

impl std::fmt::Debug for SectorTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SectorTracker")
            .field("data_file", &self.data_file)
            .field("cache_file", &self.cache_file)
            .field("sectors", &self.portfolio.crypto_sectors.len())
            .field("targets", &self.portfolio.targets.len())
            .field("provider", &self.price_service.provider_name())
            .finish()
    }
}

impl SectorTracker {
    /// Load (or seed) the portfolio from `settings.data_file` and talk to
    /// CoinGecko at `settings.api_base_url`.
    pub fn open(settings: &Settings) -> Result<Self, CoreError> {
        let provider = CoinGeckoProvider::with_base_url(
            settings.api_base_url.clone(),
            std::time::Duration::from_secs(settings.request_timeout_secs),
        );
        Self::open_with_provider(settings, Box::new(provider))
    }

    /// Like `open`, with a caller-supplied market-data provider.
    pub fn open_with_provider(
        settings: &Settings,
        provider: Box<dyn MarketDataProvider>,
    ) -> Result<Self, CoreError> {
        let portfolio = StorageManager::load_or_default(&settings.data_file)?;
        let mut tracker = Self::build(portfolio, settings, provider);
        tracker.attach_cache_file(settings.cache_file());
        Ok(tracker)
    }

    /// Wrap an existing portfolio; nothing is read from disk and the caches
    /// stay in memory.
    pub fn from_portfolio(
        portfolio: Portfolio,
        settings: &Settings,
        provider: Box<dyn MarketDataProvider>,
    ) -> Self {
        Self::build(portfolio, settings, provider)
    }

    fn build(portfolio: Portfolio, settings: &Settings, provider: Box<dyn MarketDataProvider>) -> Self {
        // chrono caps durations at i64::MAX milliseconds.
        let secs = i64::try_from(settings.cache_ttl_secs)
            .unwrap_or(i64::MAX)
            .min(i64::MAX / 1_000);
        let ttl = Duration::seconds(secs);
        Self {
            portfolio,
            data_file: settings.data_file.clone(),
            cache_file: None,
            portfolio_service: PortfolioService::new(),
            price_service: PriceService::new(provider, ttl),
            dashboard_service: DashboardService::new(),
        }
    }

    /// Seed the caches from `path` and keep writing them back there. An
    /// unreadable cache file is logged and ignored.
    fn attach_cache_file(&mut self, path: PathBuf) {
        match StorageManager::load_cache_from_file(&path) {
            Ok(snapshot) => {
                let kept = self.price_service.restore(snapshot, Utc::now());
                tracing::debug!(path = %path.display(), entries = kept, "price cache loaded");
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable price cache");
            }
        }
        self.cache_file = Some(path);
    }

    /// Write the caches out if a lookup changed them. Failures only cost
    /// the next run a network call, so they are logged, not returned.
    fn persist_cache(&mut self) {
        if !self.price_service.take_changed() {
            return;
        }
        let Some(path) = &self.cache_file else {
            return;
        };
        let snapshot = self.price_service.snapshot(Utc::now());
        if let Err(e) = StorageManager::save_cache_to_file(&snapshot, path) {
            tracing::warn!(path = %path.display(), error = %e, "could not save price cache");
        }
    }

    // ── State & Persistence ─────────────────────────────────────────

    #[must_use]
    pub fn portfolio(&self) -> &Portfolio {
        &self.portfolio
    }

    #[must_use]
    pub fn data_file(&self) -> &Path {
        &self.data_file
    }

    /// Where the caches are persisted, if anywhere.
    #[must_use]
    pub fn cache_file(&self) -> Option<&Path> {
        self.cache_file.as_deref()
    }

    /// Overwrite the state file with the current portfolio.
    pub fn save(&self) -> Result<(), CoreError> {
        StorageManager::save_to_file(&self.portfolio, &self.data_file)
    }

    fn save_if(&self, changed: bool) -> Result<bool, CoreError> {
        if changed {
            self.save()?;
        }
        Ok(changed)
    }

    // ── Sector & Coin Management ────────────────────────────────────

    /// Add an empty sector. `Ok(false)` if the name is blank or taken.
    pub fn add_sector(&mut self, name: &str) -> Result<bool, CoreError> {
        let changed = self.portfolio_service.add_sector(&mut self.portfolio, name);
        if changed {
            tracing::info!(sector = name, "sector added");
        }
        self.save_if(changed)
    }

    /// Remove a sector. Targets of its coins stay in the portfolio.
    pub fn remove_sector(&mut self, name: &str) -> Result<bool, CoreError> {
        let changed = self.portfolio_service.remove_sector(&mut self.portfolio, name);
        if changed {
            tracing::info!(sector = name, "sector removed");
        }
        self.save_if(changed)
    }

    /// Append a coin to a sector and reset its target to 100.
    pub fn add_coin(&mut self, sector: &str, coin_id: &str) -> Result<bool, CoreError> {
        let changed = self
            .portfolio_service
            .add_coin(&mut self.portfolio, sector, coin_id);
        if changed {
            tracing::info!(sector, coin = coin_id, "coin added");
        }
        self.save_if(changed)
    }

    /// Remove the first occurrence of a coin and its target.
    pub fn remove_coin(&mut self, coin_id: &str) -> Result<bool, CoreError> {
        let changed = self.portfolio_service.remove_coin(&mut self.portfolio, coin_id);
        if changed {
            tracing::info!(coin = coin_id, "coin removed");
        }
        self.save_if(changed)
    }

    /// Set one coin's target. Negative or non-finite values are ignored.
    pub fn set_target(&mut self, coin_id: &str, value: f64) -> Result<bool, CoreError> {
        let changed = self
            .portfolio_service
            .set_target(&mut self.portfolio, coin_id, value);
        self.save_if(changed)
    }

    /// Rows of the "Configure targets" form.
    #[must_use]
    pub fn target_entries(&self) -> Vec<TargetEntry> {
        self.portfolio_service.target_entries(&self.portfolio)
    }

    /// Submit the "Configure targets" form. Missing targets of tracked coins
    /// are filled with 0. The file is always rewritten, as after any form
    /// submit; the return value tells whether any target actually changed.
    pub fn configure_targets(&mut self, edits: &HashMap<String, f64>) -> Result<bool, CoreError> {
        let changed = self
            .portfolio_service
            .configure_targets(&mut self.portfolio, edits);
        self.save()?;
        Ok(changed)
    }

    // ── Prices & Search ─────────────────────────────────────────────

    /// Current prices of every tracked coin. Served from the cache inside the
    /// TTL window; on failure the table is empty and `error` is set, and that
    /// outcome is cached too.
    pub async fn fetch_prices(&mut self, currency: Currency) -> Fetched<PriceTable> {
        let ids: Vec<String> = self
            .portfolio
            .all_coins()
            .into_iter()
            .map(str::to_string)
            .collect();
        let fetched = self.price_service.fetch_prices(&ids, currency).await;
        self.persist_cache();
        fetched
    }

    /// Search the provider's coin list by name or symbol. Cached like prices.
    pub async fn search_coins(&mut self, query: &str) -> Fetched<Vec<CoinSearchResult>> {
        let found = self.price_service.search_coins(query).await;
        self.persist_cache();
        found
    }

    #[must_use]
    pub fn price_service(&self) -> &PriceService {
        &self.price_service
    }

    pub fn price_service_mut(&mut self) -> &mut PriceService {
        &mut self.price_service
    }

    // ── Views ───────────────────────────────────────────────────────

    /// Fetch prices once and build every tab.
    pub async fn dashboard(&mut self, currency: Currency) -> Dashboard {
        let prices = self.fetch_prices(currency).await;
        self.dashboard_service.build(&self.portfolio, &prices, currency)
    }

    /// One sector's tab against an already fetched price table.
    #[must_use]
    pub fn sector_view(&self, sector: &str, prices: &PriceTable, currency: Currency) -> Option<SectorView> {
        self.dashboard_service
            .sector_view(&self.portfolio, sector, prices, currency)
    }

    /// The "All coins" tab against an already fetched price table.
    #[must_use]
    pub fn all_coins_view(&self, prices: &PriceTable, currency: Currency) -> SectorView {
        self.dashboard_service
            .all_coins_view(&self.portfolio, prices, currency)
    }
}
