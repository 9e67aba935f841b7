use serde::{Deserialize, Serialize};

/// One hit from the provider's free-text coin search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoinSearchResult {
    /// Provider id, the value stored in sectors (e.g. `"bitcoin"`).
    pub id: String,
    pub name: String,
    pub symbol: String,
}

impl CoinSearchResult {
    /// Label for pickers: `"Bitcoin (BTC)"`.
    pub fn label(&self) -> String {
        format!("{} ({})", self.name, self.symbol)
    }
}
