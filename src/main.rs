// Seeds a remote game catalog, one POST per record.
//
// Non-2xx statuses are only reported. Whether the run stops when the endpoint
// cannot be reached at all is the caller's choice (see `--keep-going`).

use config::{FailurePolicy, SeedConfig};
use error::SeedError;
use seeder::Seeder;
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};
use std::path::Path;

mod cli;
mod config;
mod error;
mod game;
mod seeder;

fn main() -> Result<(), SeedError> {
    let matches = cli::build_command().get_matches();

    let level = if matches.get_flag("verbose") {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    if TermLogger::init(
        level,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )
    .is_err()
    {
        eprintln!("WARNING: logger already initialized.");
    }

    let mut seed_config = match matches.get_one::<String>("config") {
        Some(path) => SeedConfig::load(Path::new(path))?,
        None => SeedConfig::builtin()?,
    };

    if let Some(url) = matches.get_one::<String>("url") {
        seed_config = seed_config.with_endpoint(url);
    }

    if matches.get_flag("keep_going") {
        seed_config = seed_config.with_policy(FailurePolicy::Continue);
    }

    let seeder = Seeder::new(seed_config)?;
    log::info!(
        "Seeding {} games to {}",
        seeder.config().records.len(),
        seeder.config().endpoint
    );

    let outcomes = seeder.run(|outcome| println!("{outcome}"))?;

    let unreachable: Vec<&str> = outcomes
        .iter()
        .filter(|o| matches!(o, seeder::Outcome::TransportFailure { .. }))
        .map(seeder::Outcome::name)
        .collect();

    if unreachable.is_empty() {
        log::info!("Done: {} games sent", outcomes.len());
    } else {
        log::warn!("Done: could not reach endpoint for {}", unreachable.join(", "));
    }

    Ok(())
}
