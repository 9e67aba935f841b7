use std::collections::{HashMap, HashSet};

use crate::models::dashboard::{display_name, TargetEntry};
use crate::models::portfolio::{Portfolio, DEFAULT_TARGET};

/// Sector and target bookkeeping on a `Portfolio`.
///
/// Pure business logic — no I/O, no API calls. Every mutation is permissive:
/// invalid input leaves the portfolio untouched and the method returns
/// `false`. A `true` return means the portfolio changed and should be saved.
pub struct PortfolioService;

impl PortfolioService {
    pub fn new() -> Self {
        Self
    }

    /// Append an empty sector. Ignored if `name` is blank or already taken.
    pub fn add_sector(&self, portfolio: &mut Portfolio, name: &str) -> bool {
        if name.is_empty() || portfolio.crypto_sectors.contains_key(name) {
            return false;
        }
        portfolio.crypto_sectors.insert(name.to_string(), Vec::new());
        true
    }

    /// Delete a sector and its coin list. Targets of its coins are kept.
    pub fn remove_sector(&self, portfolio: &mut Portfolio, name: &str) -> bool {
        portfolio.crypto_sectors.shift_remove(name).is_some()
    }

    /// Append `coin_id` to `sector` and (re)set its target to the default.
    ///
    /// A custom target the coin already had is overwritten. Duplicates are
    /// allowed: adding a coin the sector already holds appends it again.
    pub fn add_coin(&self, portfolio: &mut Portfolio, sector: &str, coin_id: &str) -> bool {
        if coin_id.is_empty() {
            return false;
        }
        let Some(coins) = portfolio.crypto_sectors.get_mut(sector) else {
            return false;
        };
        coins.push(coin_id.to_string());
        portfolio.targets.insert(coin_id.to_string(), DEFAULT_TARGET);
        true
    }

    /// Remove the first occurrence of `coin_id` from the first sector holding
    /// it, and drop its target. Other occurrences stay where they are.
    pub fn remove_coin(&self, portfolio: &mut Portfolio, coin_id: &str) -> bool {
        for coins in portfolio.crypto_sectors.values_mut() {
            if let Some(pos) = coins.iter().position(|c| c == coin_id) {
                coins.remove(pos);
                portfolio.targets.shift_remove(coin_id);
                return true;
            }
        }
        false
    }

    /// Overwrite a coin's target. Negative and non-finite values are ignored.
    pub fn set_target(&self, portfolio: &mut Portfolio, coin_id: &str, value: f64) -> bool {
        if coin_id.is_empty() || !is_valid_target(value) {
            return false;
        }
        portfolio.targets.insert(coin_id.to_string(), value);
        true
    }

    /// Rows of the target form: every tracked coin once, in sector order,
    /// with its current target (0 when missing).
    pub fn target_entries(&self, portfolio: &Portfolio) -> Vec<TargetEntry> {
        let mut seen = HashSet::new();
        portfolio
            .all_coins()
            .into_iter()
            .filter(|coin| seen.insert(*coin))
            .map(|coin| TargetEntry {
                coin_id: coin.to_string(),
                display_name: display_name(coin),
                target: portfolio.target(coin),
            })
            .collect()
    }

    /// Submit the target form.
    ///
    /// Every tracked coin ends up with a target entry: the edited value when
    /// one is given and valid, otherwise its current target, otherwise 0.
    /// Edits for coins that are not tracked are ignored.
    pub fn configure_targets(&self, portfolio: &mut Portfolio, edits: &HashMap<String, f64>) -> bool {
        let updates: Vec<(String, f64)> = self
            .target_entries(portfolio)
            .into_iter()
            .map(|entry| {
                let value = edits
                    .get(&entry.coin_id)
                    .copied()
                    .filter(|v| is_valid_target(*v))
                    .unwrap_or(entry.target);
                (entry.coin_id, value)
            })
            .collect();

        let mut changed = false;
        for (coin, value) in updates {
            if portfolio.targets.insert(coin, value) != Some(value) {
                changed = true;
            }
        }
        changed
    }
}

impl Default for PortfolioService {
    fn default() -> Self {
        Self::new()
    }
}

fn is_valid_target(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}
