use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

use crate::errors::CoreError;
use crate::models::coin::CoinSearchResult;
use crate::models::currency::Currency;
use crate::models::price::PriceTable;
use crate::models::settings::{DEFAULT_API_URL, DEFAULT_TIMEOUT_SECS};
use super::traits::MarketDataProvider;

const PROVIDER: &str = "CoinGecko";

/// CoinGecko public API provider for cryptocurrency prices.
///
/// - **Free**: no API key required, but rate limited (a few requests per minute).
/// - **Endpoints**: `/simple/price?ids=..&vs_currencies=..`, `/search?query=..`
///
/// Coins are addressed by CoinGecko ids ("bitcoin", "curve-dao-token"), which
/// is also what the portfolio stores, so no symbol mapping is needed.
pub struct CoinGeckoProvider {
    client: Client,
    base_url: String,
}

impl CoinGeckoProvider {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_API_URL, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Point the provider at another CoinGecko-compatible host (mirrors, tests).
    pub fn with_base_url(base_url: impl Into<String>, timeout: Duration) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_else(|_| Client::new()),
            base_url,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get(&self, path: &str, query: &[(&str, &str)]) -> Result<Response, CoreError> {
        let url = format!("{}{path}", self.base_url);
        let resp = self.client.get(&url).query(query).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let message = if status == StatusCode::TOO_MANY_REQUESTS {
                format!("Rate limited on {path} (HTTP {status}), try again later")
            } else {
                format!("Request to {path} failed with HTTP {status}")
            };
            return Err(CoreError::Api {
                provider: PROVIDER.into(),
                message,
            });
        }
        Ok(resp)
    }
}

impl Default for CoinGeckoProvider {
    fn default() -> Self {
        Self::new()
    }
}

// ── CoinGecko API response types ────────────────────────────────────

/// `/simple/price` body: `{"bitcoin": {"usd": 67000.1}}`. Values are kept as
/// raw JSON because CoinGecko occasionally sends `null` for thin markets.
type SimplePriceResponse = HashMap<String, HashMap<String, serde_json::Value>>;

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    coins: Vec<SearchCoin>,
}

#[derive(Deserialize)]
struct SearchCoin {
    id: String,
    name: String,
    symbol: String,
}

fn into_price_table(resp: SimplePriceResponse) -> PriceTable {
    resp.into_iter()
        .map(|(coin, quotes)| {
            let quotes = quotes
                .into_iter()
                .filter_map(|(currency, value)| value.as_f64().map(|p| (currency, p)))
                .collect();
            (coin, quotes)
        })
        .collect()
}

#[async_trait]
impl MarketDataProvider for CoinGeckoProvider {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn simple_price(
        &self,
        coin_ids: &[String],
        currency: Currency,
    ) -> Result<PriceTable, CoreError> {
        let ids = coin_ids.join(",");
        let resp: SimplePriceResponse = self
            .get(
                "/simple/price",
                &[("ids", ids.as_str()), ("vs_currencies", currency.as_str())],
            )
            .await?
            .json()
            .await
            .map_err(|e| CoreError::Api {
                provider: PROVIDER.into(),
                message: format!("Failed to parse prices for {ids}: {e}"),
            })?;

        Ok(into_price_table(resp))
    }

    async fn search(&self, query: &str) -> Result<Vec<CoinSearchResult>, CoreError> {
        let resp: SearchResponse = self
            .get("/search", &[("query", query)])
            .await?
            .json()
            .await
            .map_err(|e| CoreError::Api {
                provider: PROVIDER.into(),
                message: format!("Failed to parse search results for '{query}': {e}"),
            })?;

        Ok(resp
            .coins
            .into_iter()
            .map(|c| CoinSearchResult {
                id: c.id,
                name: c.name,
                symbol: c.symbol,
            })
            .collect())
    }
}
