use serde::{Deserialize, Serialize};

use super::currency::Currency;

/// Tab title of the aggregate view over every tracked coin.
pub const ALL_COINS_TITLE: &str = "All coins";

/// Color cue for a coin's percentage gap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Highlight {
    /// Gap as displayed is zero or positive (price still below target).
    Green,
    /// Gap as displayed is negative (target overshot) or not a number.
    Red,
}

/// One coin as rendered on a card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoinCard {
    pub coin_id: String,
    /// Coin id with the first letter upper-cased and the rest lower-cased.
    pub display_name: String,
    pub currency: Currency,
    /// Current price, 0 when the price is unknown.
    pub current_price: f64,
    /// Target price, 0 when no target is set.
    pub target: f64,
    /// Signed percentage gap, see `analytics_service::difference`.
    pub difference: f64,
    pub highlight: Highlight,
}

impl CoinCard {
    /// `"1,234.50 USD"`
    pub fn price_label(&self) -> String {
        format!("{} {}", format_amount(self.current_price), self.currency.code())
    }

    /// `"100.00 USD"`
    pub fn target_label(&self) -> String {
        format!("{} {}", format_amount(self.target), self.currency.code())
    }

    /// `"+12.34%"` / `"-20.00%"`
    pub fn difference_label(&self) -> String {
        format_difference(self.difference)
    }
}

/// A tab: a titled list of coin cards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectorView {
    pub title: String,
    pub cards: Vec<CoinCard>,
}

/// One row of the "Configure targets" form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetEntry {
    pub coin_id: String,
    pub display_name: String,
    pub target: f64,
}

/// Everything one render pass needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    pub currency: Currency,
    /// One view per sector, in sector order.
    pub sectors: Vec<SectorView>,
    /// Every tracked coin across all sectors.
    pub all_coins: SectorView,
    /// Inline message when prices could not be fetched.
    pub price_error: Option<String>,
}

/// Two decimals with comma thousands separators: `1234567.891` → `"1,234,567.89"`.
/// Non-finite values are printed as-is.
pub fn format_amount(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value.is_sign_negative() { "-" } else { "" };
    format!("{sign}{grouped}.{frac_part}")
}

/// Signed percentage with two decimals: `"+12.34%"`.
pub fn format_difference(difference: f64) -> String {
    format!("{difference:+.2}%")
}

/// Color of a difference as the user sees it: decided on the rounded label,
/// so `-0.001` (shown as `-0.00%`) is still green.
pub fn highlight_for(difference: f64) -> Highlight {
    let shown = format_difference(difference);
    match shown.trim_end_matches('%').parse::<f64>() {
        Ok(value) if value >= 0.0 => Highlight::Green,
        _ => Highlight::Red,
    }
}

/// `"curve-dao-token"` → `"Curve-dao-token"`, `"BITCOIN"` → `"Bitcoin"`.
pub fn display_name(coin_id: &str) -> String {
    let mut chars = coin_id.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
