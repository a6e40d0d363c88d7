//! Batch SPIRou exposure-time requests for cluster members

use crate::cli::CfhtArgs;
use anyhow::Context;
use celestial_services::cfht::{exposure_time_batch, BatchSettings, EtcClient, FETCH_FAILED};
use celestial_services::tables::load_star_list;
use celestial_services::ServiceConfig;

pub fn run(args: &CfhtArgs, config: &ServiceConfig) -> anyhow::Result<()> {
    let stars = load_star_list(&args.stars)
        .with_context(|| format!("reading star list {}", args.stars.display()))?;
    println!("Loaded {} stars from {}", stars.len(), args.stars.display());

    let settings = BatchSettings {
        cluster_name: args.cluster_name.clone(),
        snr: args.snr,
        seeing: args.seeing,
        h2o: args.h2o,
        airmass: args.airmass,
    };
    let client = EtcClient::from_config(config)?;
    let (rows, summary) = exposure_time_batch(&client, &stars, &settings, &args.output)?;

    let failed = rows.iter().filter(|r| r.exposure_time == FETCH_FAILED).count();
    println!("Summary written to {}", summary.display());
    if failed > 0 {
        println!("{} of {} requests timed out; rerun those manually", failed, rows.len());
    }
    Ok(())
}
