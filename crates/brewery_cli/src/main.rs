//! Command-line client for the beer catalog.
//!
//! Runs one lookup or list request through the same boundary an HTTP layer
//! would use and prints the status and JSON body.

use brewery_core::db::open_db;
use brewery_core::db::seed::seed_default_catalog;
use brewery_core::{beer_item_path, serve_request, BreweryConfig, BEER_API_BASE_PATH};
use clap::{Parser, Subcommand};
use log::info;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "brewery", version, about = "Query the beer catalog")]
struct Cli {
    /// Catalog database file (overrides BREWERY_DB_PATH).
    #[arg(long, global = true)]
    db: Option<PathBuf>,
    /// Load the stock catalog first when the database is empty.
    #[arg(long, global = true)]
    seed: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Fetch one beer by id.
    Get { id: String },
    /// List beers, optionally filtered.
    List {
        /// Whole-name match; `*` is a wildcard.
        #[arg(long)]
        name: Option<String>,
        /// Beer style, e.g. PALE_ALE.
        #[arg(long)]
        style: Option<String>,
        #[arg(long)]
        page: Option<String>,
        #[arg(long)]
        size: Option<String>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(message) => {
            eprintln!("brewery: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode, String> {
    let mut config = BreweryConfig::from_env().map_err(|err| err.to_string())?;
    if let Some(db) = cli.db {
        config.db_path = db;
    }
    config.init_logging().map_err(|err| err.to_string())?;

    if cli.seed {
        let conn = open_db(&config.db_path).map_err(|err| format!("open catalog: {err}"))?;
        let inserted =
            seed_default_catalog(&conn).map_err(|err| format!("seed catalog: {err}"))?;
        info!("event=cli_seed module=cli status=ok inserted={inserted}");
    }

    let response = match &cli.command {
        Command::Get { id } => {
            serve_request(&config.db_path, &beer_item_path(id), std::iter::empty())
        }
        Command::List {
            name,
            style,
            page,
            size,
        } => {
            let params = [
                ("beerName", name),
                ("beerStyle", style),
                ("pageNumber", page),
                ("pageSize", size),
            ];
            serve_request(
                &config.db_path,
                BEER_API_BASE_PATH,
                params
                    .iter()
                    .filter_map(|(key, value)| value.as_deref().map(|value| (*key, value))),
            )
        }
    };

    let body = serde_json::to_string_pretty(&response.body).map_err(|err| err.to_string())?;
    println!("{} {body}", response.status);
    Ok(if response.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
