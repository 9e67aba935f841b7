use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Target assigned to a coin when it is added to a sector.
pub const DEFAULT_TARGET: f64 = 100.0;

/// Sectors and coins used when no state file exists yet.
const SEED_SECTORS: [(&str, [&str; 3]); 2] = [
    ("DeFi", ["uniswap", "aave", "curve-dao-token"]),
    ("NFT", ["decentraland", "the-sandbox", "axie-infinity"]),
];

/// The main data container. This is exactly what gets written to the JSON
/// state file: two top-level keys, sectors first, then targets.
///
/// Both maps keep insertion order so tabs and cards render in the order the
/// user created them. Coin ids are not unique: the same id may appear twice in
/// one sector or in several sectors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Portfolio {
    /// Sector name → coin ids (CoinGecko ids such as `"bitcoin"`).
    pub crypto_sectors: IndexMap<String, Vec<String>>,

    /// Coin id → target price. A tracked coin without an entry reads as 0.
    /// Entries may outlive their coin (removing a sector keeps them).
    pub targets: IndexMap<String, f64>,
}

impl Portfolio {
    /// A portfolio with no sectors and no targets.
    pub fn empty() -> Self {
        Self {
            crypto_sectors: IndexMap::new(),
            targets: IndexMap::new(),
        }
    }

    /// Sector names in display order.
    pub fn sector_names(&self) -> Vec<&str> {
        self.crypto_sectors.keys().map(String::as_str).collect()
    }

    pub fn has_sector(&self, name: &str) -> bool {
        self.crypto_sectors.contains_key(name)
    }

    /// Coin ids of one sector, or `None` if the sector does not exist.
    pub fn coins(&self, sector: &str) -> Option<&[String]> {
        self.crypto_sectors.get(sector).map(Vec::as_slice)
    }

    /// Every tracked coin id, flattened in sector order. Duplicates are kept.
    pub fn all_coins(&self) -> Vec<&str> {
        self.crypto_sectors
            .values()
            .flat_map(|coins| coins.iter().map(String::as_str))
            .collect()
    }

    /// Target for a coin, 0 when none is set.
    pub fn target(&self, coin_id: &str) -> f64 {
        self.targets.get(coin_id).copied().unwrap_or(0.0)
    }
}

impl Default for Portfolio {
    /// The seed portfolio: "DeFi" and "NFT" with three coins each, all
    /// targets at 100.
    fn default() -> Self {
        let mut portfolio = Self::empty();
        for (sector, coins) in SEED_SECTORS {
            let ids: Vec<String> = coins.iter().map(|c| c.to_string()).collect();
            portfolio.crypto_sectors.insert(sector.to_string(), ids);
        }
        for coin in SEED_SECTORS.iter().flat_map(|(_, coins)| coins) {
            portfolio.targets.insert(coin.to_string(), DEFAULT_TARGET);
        }
        portfolio
    }
}
