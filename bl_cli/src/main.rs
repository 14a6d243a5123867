//! Seats a belote roster and prints the resulting tables as JSON.
//!
//! Reads the players from a file or stdin, runs one allocation and writes
//! the tables keyed by name, waiting pool included.

mod config;
mod roster;

use std::{fs::File, io};

use anyhow::{Context, Error};
use belote_lobby::{allocation::TableSize, lobby::LobbyView};
use config::{CliConfig, CliOverrides};
use log::{info, warn};
use pico_args::Arguments;
use roster::Roster;

const HELP: &str = "\
Seat belote players at tables of 4 to 7

USAGE:
  bl_cli [OPTIONS] < players.json

OPTIONS:
  --players    FILE        Roster JSON file            [default: env BL_PLAYERS_FILE or stdin]
  --seed       N           Reproducible shuffle seed   [default: env BL_SEED or random]
  --occupied   1,2,...     Table numbers already used  [default: env BL_OCCUPIED_TABLES]

FLAGS:
  --no-shuffle             Seat players in roster order
  --pretty                 Pretty-print the JSON output
  -h, --help               Print help information

ENVIRONMENT:
  BL_PLAYERS_FILE          Roster JSON file
  BL_SEED                  Shuffle seed
  BL_SHUFFLE               Shuffle players (true/false)
  BL_OCCUPIED_TABLES       Comma separated table numbers
  BL_PRETTY                Pretty-print output (true/false)
  RUST_LOG                 Log level (logs go to stderr)

INPUT:
  [{\"name\": \"ana\", \"can_play_tarot\": true, \"can_play_two_tables\": false}, ...]
  or {\"players\": [...], \"occupied\": [1, 2]}
";

fn main() -> Result<(), Error> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let overrides = CliOverrides {
        players_file: pargs.opt_value_from_str("--players")?,
        seed: pargs.opt_value_from_str("--seed")?,
        no_shuffle: pargs.contains("--no-shuffle"),
        occupied: pargs.opt_value_from_str("--occupied")?,
        pretty: pargs.contains("--pretty"),
    };

    env_logger::builder().format_target(false).init();

    let unused = pargs.finish();
    if !unused.is_empty() {
        warn!("Ignoring unused arguments: {:?}", unused);
    }

    let config = CliConfig::from_env(overrides)?;
    config.validate()?;

    let roster = match &config.players_file {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open {}", path.display()))?;
            Roster::from_reader(file)?
        }
        None => Roster::from_reader(io::stdin().lock())?,
    };
    info!("Loaded {} players", roster.players().len());

    let request = roster.into_request(&config.occupied);
    let result = config.allocator().allocate(request);

    for size in TableSize::ALL {
        let count = result.count_tables_of(size);
        if count > 0 {
            info!("{} x {} table", count, size);
        }
    }
    if !result.waiting_pool.is_empty() {
        info!("{} players waiting", result.waiting_pool.len());
    }

    let view = LobbyView::from_allocation(&result);
    let json = if config.pretty {
        serde_json::to_string_pretty(&view)?
    } else {
        serde_json::to_string(&view)?
    };
    println!("{json}");

    Ok(())
}
