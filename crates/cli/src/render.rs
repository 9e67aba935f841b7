use comfy_table::{presets::UTF8_FULL, Cell, Color, Table};

use sector_tracker_core::models::coin::CoinSearchResult;
use sector_tracker_core::models::dashboard::{format_amount, Highlight, SectorView, TargetEntry};
use sector_tracker_core::models::portfolio::Portfolio;

/// One tab as a table of coin cards.
pub fn sector_table(view: &SectorView) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["Coin", "Current price", "Target", "Difference"]);

    for card in &view.cards {
        let color = match card.highlight {
            Highlight::Green => Color::Green,
            Highlight::Red => Color::Red,
        };
        table.add_row(vec![
            Cell::new(&card.display_name),
            Cell::new(card.price_label()),
            Cell::new(card.target_label()),
            Cell::new(card.difference_label()).fg(color),
        ]);
    }

    if view.cards.is_empty() {
        format!("{}\n(no coins yet)", heading(&view.title))
    } else {
        format!("{}\n{table}", heading(&view.title))
    }
}

pub fn sector_list(portfolio: &Portfolio) -> String {
    if portfolio.crypto_sectors.is_empty() {
        return "(no sectors)".to_string();
    }
    portfolio
        .crypto_sectors
        .iter()
        .map(|(sector, coins)| format!("{sector}: {}", coins.join(", ")))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn search_results(results: &[CoinSearchResult]) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec!["Id", "Coin"]);
    for coin in results {
        table.add_row(vec![Cell::new(&coin.id), Cell::new(coin.label())]);
    }
    table.to_string()
}

pub fn target_form(entries: &[TargetEntry], currency_code: &str) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec!["Coin", "Id", "Target"]);
    for entry in entries {
        table.add_row(vec![
            Cell::new(&entry.display_name),
            Cell::new(&entry.coin_id),
            Cell::new(format!("{} {currency_code}", format_amount(entry.target))),
        ]);
    }
    format!("{}\n{table}", heading("Configure targets"))
}

fn heading(title: &str) -> String {
    format!("== {title} ==")
}
