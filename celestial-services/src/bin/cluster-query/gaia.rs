//! Resolve a region center and run the Gaia sphere selection around it

use crate::cli::{DistanceUnit, GaiaArgs, Release};
use anyhow::Context;
use celestial_region::{CoordinateResolver, Quantity, RegionDescriptor, Unit};
use celestial_services::tap::{fetch_region, GaiaRegionQuery, GaiaRelease};
use celestial_services::ServiceConfig;

pub fn run(args: &GaiaArgs, config: &ServiceConfig) -> anyhow::Result<()> {
    let resolver = descriptor(args)
        .resolve()
        .context("invalid region description")?;
    let center = resolver
        .resolve_center()
        .context("could not resolve a region center")?;

    println!("{}", resolver);
    for warning in resolver.diagnostics() {
        println!("warning: {}", warning);
    }

    if args.dry_run {
        return Ok(());
    }

    let query = GaiaRegionQuery::new(center, args.radius)?;
    let name = target_name(&resolver);
    let releases: &[GaiaRelease] = match args.release {
        Release::Dr3 => &[GaiaRelease::Dr3],
        Release::Mock => &[GaiaRelease::Edr3Mock],
        Release::Both => &[GaiaRelease::Dr3, GaiaRelease::Edr3Mock],
    };

    for &release in releases {
        println!("Querying {} within {} pc of {}...", release, args.radius, center);
        let path = fetch_region(config, release, &query, &name, &args.output)
            .with_context(|| format!("{} query for {} failed", release, name))?;
        println!("  wrote {}", path.display());
    }
    Ok(())
}

fn descriptor(args: &GaiaArgs) -> RegionDescriptor {
    let mut descriptor = RegionDescriptor::new().strict(!args.lenient);
    if let Some(name) = &args.name {
        descriptor = descriptor.named(name.clone());
    }
    if let Some(plx) = args.parallax {
        descriptor = descriptor.parallax(plx);
    }
    if let Some(distance) = args.distance {
        let unit = match args.distance_unit {
            DistanceUnit::Pc => Unit::Parsec,
            DistanceUnit::Kpc => Unit::Kiloparsec,
            DistanceUnit::Ly => Unit::LightYear,
        };
        descriptor = descriptor.distance(Quantity::new(distance, unit));
    }
    if let (Some(l), Some(b)) = (args.l, args.b) {
        descriptor = descriptor.galactic(l, b);
    }
    if let (Some(ra), Some(dec)) = (args.ra, args.dec) {
        descriptor = descriptor.equatorial(ra, dec);
    }
    if let Some(xyz) = &args.xyz {
        descriptor = descriptor.cartesian(xyz[0], xyz[1], xyz[2]);
    }
    descriptor
}

fn target_name(resolver: &CoordinateResolver) -> String {
    resolver
        .name()
        .map(|n| n.replace(' ', "_"))
        .unwrap_or_else(|| "region".to_string())
}
