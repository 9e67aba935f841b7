use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::errors::CoreError;
use super::currency::Currency;

pub const DEFAULT_DATA_FILE: &str = "data.json";
pub const DEFAULT_API_URL: &str = "https://api.coingecko.com/api/v3";
pub const DEFAULT_CACHE_TTL_SECS: u64 = 600;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Extension of the price cache file kept next to the state file.
pub const CACHE_FILE_EXTENSION: &str = "cache.json";

pub const ENV_DATA_FILE: &str = "SECTOR_TRACKER_DATA_FILE";
pub const ENV_CURRENCY: &str = "SECTOR_TRACKER_CURRENCY";
pub const ENV_API_URL: &str = "SECTOR_TRACKER_API_URL";
pub const ENV_CACHE_TTL: &str = "SECTOR_TRACKER_CACHE_TTL_SECS";
pub const ENV_TIMEOUT: &str = "SECTOR_TRACKER_TIMEOUT_SECS";

/// Runtime configuration. Not part of the state file, which only ever holds
/// sectors and targets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Where the portfolio JSON lives.
    pub data_file: PathBuf,

    /// Currency prices are shown in unless the user picks another one.
    pub default_currency: Currency,

    /// Base URL of the CoinGecko-compatible API (no trailing slash needed).
    pub api_base_url: String,

    /// How long price and search results are reused.
    pub cache_ttl_secs: u64,

    /// Per-request HTTP timeout.
    pub request_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            default_currency: Currency::Usd,
            api_base_url: DEFAULT_API_URL.to_string(),
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Settings {
    /// Where cached prices and searches are kept between runs:
    /// `data.json` → `data.cache.json`.
    pub fn cache_file(&self) -> PathBuf {
        self.data_file.with_extension(CACHE_FILE_EXTENSION)
    }

    /// Read settings from the process environment, falling back to defaults
    /// for anything unset.
    pub fn from_env() -> Result<Self, CoreError> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary variable source.
    pub fn from_vars<F>(lookup: F) -> Result<Self, CoreError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::default();

        if let Some(path) = lookup(ENV_DATA_FILE).filter(|v| !v.trim().is_empty()) {
            settings.data_file = PathBuf::from(path.trim());
        }
        if let Some(currency) = lookup(ENV_CURRENCY) {
            settings.default_currency = currency.parse()?;
        }
        if let Some(url) = lookup(ENV_API_URL).filter(|v| !v.trim().is_empty()) {
            settings.api_base_url = url.trim().trim_end_matches('/').to_string();
        }
        if let Some(ttl) = lookup(ENV_CACHE_TTL) {
            settings.cache_ttl_secs = parse_secs(ENV_CACHE_TTL, &ttl)?;
        }
        if let Some(timeout) = lookup(ENV_TIMEOUT) {
            settings.request_timeout_secs = parse_secs(ENV_TIMEOUT, &timeout)?;
            if settings.request_timeout_secs == 0 {
                return Err(CoreError::ValidationError(format!(
                    "{ENV_TIMEOUT} must be greater than 0"
                )));
            }
        }

        Ok(settings)
    }
}

fn parse_secs(key: &str, raw: &str) -> Result<u64, CoreError> {
    raw.trim().parse().map_err(|_| {
        CoreError::ValidationError(format!(
            "{key} must be a whole number of seconds, got '{raw}'"
        ))
    })
}
