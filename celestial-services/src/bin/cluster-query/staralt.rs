//! STARALT plots for every cluster of a summary table

use crate::cli::StarAltArgs;
use anyhow::Context;
use celestial_services::staralt::{staralt_batch, ObservationDate, StarAltClient};
use celestial_services::tables::load_cluster_summary;
use celestial_services::ServiceConfig;

pub fn run(args: &StarAltArgs, config: &ServiceConfig) -> anyhow::Result<()> {
    let date = ObservationDate::new(args.year, args.month, args.day)?;
    let clusters = load_cluster_summary(&args.catalog)
        .with_context(|| format!("reading cluster summary {}", args.catalog.display()))?;

    if args.mode.is_dated() {
        println!("query date - {}\nquery mode - {}", date.compact(), args.mode);
    } else {
        println!("query mode - {}", args.mode);
    }

    let mut client = StarAltClient::from_config(config)?;
    if let Some(observatory) = &args.observatory {
        client = client.with_observatory(observatory.clone());
    }

    let written = staralt_batch(&client, &clusters, args.mode, &date, &args.output)?;
    println!(
        "{} plots written for {} at {}",
        written.len(),
        client.observatory(),
        args.output.display()
    );
    Ok(())
}
