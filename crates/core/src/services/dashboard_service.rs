use crate::models::currency::Currency;
use crate::models::dashboard::{
    display_name, highlight_for, CoinCard, Dashboard, SectorView, ALL_COINS_TITLE,
};
use crate::models::portfolio::Portfolio;
use crate::models::price::{price_of, Fetched, PriceTable};
use crate::services::analytics_service::difference;

/// Turns portfolio state plus a price table into render-ready views.
///
/// No I/O: prices are fetched by the caller and passed in.
pub struct DashboardService;

impl DashboardService {
    pub fn new() -> Self {
        Self
    }

    /// Card for one coin. Missing prices and targets read as 0.
    pub fn coin_card(
        &self,
        portfolio: &Portfolio,
        coin_id: &str,
        prices: &PriceTable,
        currency: Currency,
    ) -> CoinCard {
        let current_price = price_of(prices, coin_id, currency);
        let target = portfolio.target(coin_id);
        let difference = difference(current_price, target);
        CoinCard {
            coin_id: coin_id.to_string(),
            display_name: display_name(coin_id),
            currency,
            current_price,
            target,
            difference,
            highlight: highlight_for(difference),
        }
    }

    /// The tab of one sector, or `None` if it does not exist.
    pub fn sector_view(
        &self,
        portfolio: &Portfolio,
        sector: &str,
        prices: &PriceTable,
        currency: Currency,
    ) -> Option<SectorView> {
        let coins = portfolio.coins(sector)?;
        Some(SectorView {
            title: sector.to_string(),
            cards: coins
                .iter()
                .map(|coin| self.coin_card(portfolio, coin, prices, currency))
                .collect(),
        })
    }

    /// Every tracked coin across all sectors, in sector order.
    pub fn all_coins_view(
        &self,
        portfolio: &Portfolio,
        prices: &PriceTable,
        currency: Currency,
    ) -> SectorView {
        SectorView {
            title: ALL_COINS_TITLE.to_string(),
            cards: portfolio
                .all_coins()
                .into_iter()
                .map(|coin| self.coin_card(portfolio, coin, prices, currency))
                .collect(),
        }
    }

    /// All tabs for one render pass. A failed price fetch still renders,
    /// with zero prices and the error message attached.
    pub fn build(
        &self,
        portfolio: &Portfolio,
        prices: &Fetched<PriceTable>,
        currency: Currency,
    ) -> Dashboard {
        let sectors = portfolio
            .crypto_sectors
            .keys()
            .filter_map(|sector| self.sector_view(portfolio, sector, &prices.data, currency))
            .collect();

        Dashboard {
            currency,
            sectors,
            all_coins: self.all_coins_view(portfolio, &prices.data, currency),
            price_error: prices.error.as_ref().map(|e| e.to_string()),
        }
    }
}

impl Default for DashboardService {
    fn default() -> Self {
        Self::new()
    }
}
