//! sector-tracker: terminal dashboard over the sector-tracker core.
//!
//! Usage:
//!   sector-tracker show                       # every sector tab + "All coins"
//!   sector-tracker show --sector DeFi -c eur
//!   sector-tracker sector add Gaming
//!   sector-tracker coin search sandbox
//!   sector-tracker coin add Gaming the-sandbox
//!   sector-tracker target configure aave=85 uniswap=12.5

use anyhow::Result;
use clap::Parser;
use std::collections::HashMap;

use sector_tracker_core::models::settings::Settings;
use sector_tracker_core::SectorTracker;

mod cli;
mod render;

use cli::{Cli, CoinCommand, Command, SectorCommand, ShowArgs, TargetCommand};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sector_tracker=info,sector_tracker_core=warn".into()),
        )
        .init();

    let cli = Cli::parse();

    let mut settings = Settings::from_env()?;
    if let Some(path) = cli.data_file.clone() {
        settings.data_file = path;
    }
    if let Some(currency) = cli.currency {
        settings.default_currency = currency;
    }

    let mut tracker = SectorTracker::open(&settings)?;
    tracing::debug!(?tracker, "tracker ready");

    match cli.command {
        Command::Show(args) => show(&mut tracker, &settings, args).await,
        Command::Sector(cmd) => sector(&mut tracker, cmd),
        Command::Coin(cmd) => coin(&mut tracker, cmd).await,
        Command::Target(cmd) => target(&mut tracker, &settings, cmd),
    }
}

async fn show(tracker: &mut SectorTracker, settings: &Settings, args: ShowArgs) -> Result<()> {
    let currency = settings.default_currency;
    let dashboard = tracker.dashboard(currency).await;

    if let Some(message) = &dashboard.price_error {
        eprintln!("Could not fetch prices, try again later: {message}");
    }

    if args.all {
        println!("{}", render::sector_table(&dashboard.all_coins));
        return Ok(());
    }

    if let Some(name) = args.sector {
        match dashboard.sectors.iter().find(|v| v.title == name) {
            Some(view) => println!("{}", render::sector_table(view)),
            None => eprintln!("No sector named '{name}'."),
        }
        return Ok(());
    }

    for view in &dashboard.sectors {
        println!("{}\n", render::sector_table(view));
    }
    println!("{}", render::sector_table(&dashboard.all_coins));
    Ok(())
}

fn sector(tracker: &mut SectorTracker, cmd: SectorCommand) -> Result<()> {
    match cmd {
        SectorCommand::List => println!("{}", render::sector_list(tracker.portfolio())),
        SectorCommand::Add { name } => {
            if tracker.add_sector(&name)? {
                println!("Sector '{name}' added.");
            }
        }
        SectorCommand::Remove { name } => {
            if tracker.remove_sector(&name)? {
                println!("Sector '{name}' removed.");
            }
        }
    }
    Ok(())
}

async fn coin(tracker: &mut SectorTracker, cmd: CoinCommand) -> Result<()> {
    match cmd {
        CoinCommand::Search { query } => {
            let found = tracker.search_coins(&query).await;
            if let Some(e) = &found.error {
                eprintln!("Could not search coins, try again later: {e}");
            }
            println!("{}", render::search_results(&found.data));
        }
        CoinCommand::Add { sector, coin_id } => {
            if tracker.add_coin(&sector, &coin_id)? {
                println!("Coin '{coin_id}' added to sector '{sector}'.");
            }
        }
        CoinCommand::Remove { coin_id } => {
            if tracker.remove_coin(&coin_id)? {
                println!("Coin '{coin_id}' removed.");
            }
        }
    }
    Ok(())
}

fn target(tracker: &mut SectorTracker, settings: &Settings, cmd: TargetCommand) -> Result<()> {
    let code = settings.default_currency.code();
    match cmd {
        TargetCommand::List => {}
        TargetCommand::Set { coin_id, value } => {
            if tracker.set_target(&coin_id, value)? {
                println!("Target for '{coin_id}' set.");
            }
        }
        TargetCommand::Configure { edits } => {
            let edits: HashMap<String, f64> = edits.into_iter().collect();
            tracker.configure_targets(&edits)?;
        }
    }
    println!("{}", render::target_form(&tracker.target_entries(), code));
    Ok(())
}
