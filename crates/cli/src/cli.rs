use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use sector_tracker_core::models::currency::Currency;

#[derive(Parser, Debug)]
#[command(name = "sector-tracker", version, about = "Track crypto sectors against target prices")]
pub struct Cli {
    /// State file (overrides SECTOR_TRACKER_DATA_FILE)
    #[arg(long, global = true)]
    pub data_file: Option<PathBuf>,

    /// Display currency: usd, eur or ars (overrides SECTOR_TRACKER_CURRENCY)
    #[arg(long, short, global = true, value_parser = parse_currency)]
    pub currency: Option<Currency>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show sector tabs with current prices, targets and gaps
    Show(ShowArgs),
    /// Manage sectors
    #[command(subcommand)]
    Sector(SectorCommand),
    /// Search, add and remove coins
    #[command(subcommand)]
    Coin(CoinCommand),
    /// Inspect and configure target prices
    #[command(subcommand)]
    Target(TargetCommand),
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Only show this sector
    #[arg(long, conflicts_with = "all")]
    pub sector: Option<String>,

    /// Only show the "All coins" view
    #[arg(long)]
    pub all: bool,
}

#[derive(Subcommand, Debug)]
pub enum SectorCommand {
    /// List sectors and their coins
    List,
    /// Add an empty sector
    Add { name: String },
    /// Remove a sector (targets of its coins are kept)
    Remove { name: String },
}

#[derive(Subcommand, Debug)]
pub enum CoinCommand {
    /// Search coins by name or symbol
    Search { query: String },
    /// Add a coin id to a sector (its target is reset to 100)
    Add { sector: String, coin_id: String },
    /// Remove the first occurrence of a coin id
    Remove { coin_id: String },
}

#[derive(Subcommand, Debug)]
pub enum TargetCommand {
    /// List the target of every tracked coin
    List,
    /// Set one coin's target
    Set {
        coin_id: String,
        #[arg(allow_negative_numbers = true)]
        value: f64,
    },
    /// Submit the target form: COIN=VALUE pairs, untouched coins keep their
    /// target and missing ones become 0
    Configure {
        #[arg(value_parser = parse_assignment)]
        edits: Vec<(String, f64)>,
    },
}

fn parse_currency(raw: &str) -> Result<Currency, String> {
    raw.parse().map_err(|e: sector_tracker_core::errors::CoreError| e.to_string())
}

fn parse_assignment(raw: &str) -> Result<(String, f64), String> {
    let (coin, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected COIN=VALUE, got '{raw}'"))?;
    let value: f64 = value
        .trim()
        .parse()
        .map_err(|_| format!("'{value}' is not a number"))?;
    Ok((coin.trim().to_string(), value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    // ── COIN=VALUE ──────────────────────────────────────────────────

    #[test]
    fn assignment_parses_coin_and_value() {
        assert_eq!(parse_assignment("aave=85").unwrap(), ("aave".to_string(), 85.0));
        assert_eq!(parse_assignment("uniswap=12.5").unwrap().1, 12.5);
    }

    #[test]
    fn assignment_trims_whitespace() {
        assert_eq!(
            parse_assignment("  aave =  85.5 ").unwrap(),
            ("aave".to_string(), 85.5)
        );
    }

    #[test]
    fn assignment_without_equals_is_rejected() {
        let err = parse_assignment("aave85").unwrap_err();
        assert!(err.contains("expected COIN=VALUE"));
    }

    #[test]
    fn assignment_with_non_numeric_value_is_rejected() {
        let err = parse_assignment("aave=lots").unwrap_err();
        assert!(err.contains("'lots' is not a number"));
    }

    #[test]
    fn assignment_splits_on_first_equals() {
        assert!(parse_assignment("aave=1=2").is_err());
    }

    // ── Currency ────────────────────────────────────────────────────

    #[test]
    fn currency_is_case_insensitive() {
        assert_eq!(parse_currency("EUR").unwrap(), Currency::Eur);
        assert_eq!(parse_currency("ars").unwrap(), Currency::Ars);
    }

    #[test]
    fn unknown_currency_is_rejected() {
        assert!(parse_currency("gbp").is_err());
    }

    // ── Full command lines ──────────────────────────────────────────

    #[test]
    fn configure_collects_every_pair() {
        let cli = Cli::try_parse_from([
            "sector-tracker",
            "target",
            "configure",
            "aave=85",
            "uniswap=12.5",
        ])
        .unwrap();
        match cli.command {
            Command::Target(TargetCommand::Configure { edits }) => {
                assert_eq!(edits, vec![("aave".to_string(), 85.0), ("uniswap".to_string(), 12.5)]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn set_accepts_negative_value_for_the_core_to_ignore() {
        let cli = Cli::try_parse_from(["sector-tracker", "target", "set", "aave", "-5"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Target(TargetCommand::Set { value, .. }) if value == -5.0
        ));
    }

    #[test]
    fn global_currency_flag_after_subcommand() {
        let cli = Cli::try_parse_from(["sector-tracker", "show", "-c", "eur"]).unwrap();
        assert_eq!(cli.currency, Some(Currency::Eur));
    }

    #[test]
    fn show_sector_conflicts_with_all() {
        assert!(Cli::try_parse_from(["sector-tracker", "show", "--all", "--sector", "DeFi"]).is_err());
    }
}
