//! cluster-query: region resolution and follow-up service queries
//!
//! Resolves an open-cluster region into a Galactic Cartesian center and runs the
//! Gaia, CFHT ETC and STARALT queries built on it.

mod cfht;
mod cli;
mod gaia;
mod staralt;

use anyhow::Context;
use celestial_services::ServiceConfig;
use clap::Parser;
use cli::{Cli, Commands};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    let config = match &cli.endpoints {
        Some(path) => ServiceConfig::from_json_file(path)
            .with_context(|| format!("loading endpoints from {}", path.display()))?,
        None => ServiceConfig::default(),
    };

    match &cli.command {
        Commands::Gaia(args) => gaia::run(args, &config),
        Commands::Cfht(args) => cfht::run(args, &config),
        Commands::Staralt(args) => staralt::run(args, &config),
    }
}
