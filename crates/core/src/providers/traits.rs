use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::coin::CoinSearchResult;
use crate::models::currency::Currency;
use crate::models::price::PriceTable;

/// Abstraction over the market-data API behind the price gateway.
///
/// CoinGecko is the only production implementation; tests plug in mocks.
/// Implementations do no caching and no error recovery: they return exactly
/// what the API said, or an error.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Human-readable name of this provider (for logs/errors).
    fn name(&self) -> &str;

    /// Current prices for `coin_ids` in one batched request.
    /// Coins the API does not know are simply absent from the table.
    async fn simple_price(
        &self,
        coin_ids: &[String],
        currency: Currency,
    ) -> Result<PriceTable, CoreError>;

    /// Free-text search over coin names and symbols.
    async fn search(&self, query: &str) -> Result<Vec<CoinSearchResult>, CoreError>;
}
