//! CLI argument definitions for cluster-query

use celestial_services::staralt::StarAltMode;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "cluster-query")]
#[command(about = "Resolve an open-cluster region and query follow-up services")]
#[command(version)]
pub struct Cli {
    /// Enable verbose output (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// JSON file overriding service endpoints and timeouts
    #[arg(long, global = true)]
    pub endpoints: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve a region center and select Gaia sources within a sphere around it
    Gaia(GaiaArgs),

    /// Request SPIRou exposure times for a list of cluster members
    Cfht(CfhtArgs),

    /// Fetch STARALT observability plots for every cluster in a summary table
    Staralt(StarAltArgs),
}

#[derive(Clone, Copy, ValueEnum)]
pub enum DistanceUnit {
    Pc,
    Kpc,
    Ly,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum Release {
    /// Gaia DR3 at ESA
    Dr3,
    /// GeDR3 mock catalogue at GAVO
    Mock,
    /// Both, DR3 first
    Both,
}

#[derive(Parser)]
pub struct GaiaArgs {
    /// Region name, used for output file names
    #[arg(long)]
    pub name: Option<String>,

    /// Selection radius in parsecs
    #[arg(long, default_value = "100")]
    pub radius: f64,

    /// Parallax in milliarcseconds
    #[arg(long)]
    pub parallax: Option<f64>,

    /// Distance, in --distance-unit
    #[arg(long)]
    pub distance: Option<f64>,

    #[arg(long, value_enum, default_value = "pc")]
    pub distance_unit: DistanceUnit,

    /// Galactic longitude in degrees
    #[arg(long, requires = "b", allow_negative_numbers = true)]
    pub l: Option<f64>,

    /// Galactic latitude in degrees
    #[arg(long, requires = "l", allow_negative_numbers = true)]
    pub b: Option<f64>,

    /// Right ascension (ICRS) in degrees
    #[arg(long, requires = "dec")]
    pub ra: Option<f64>,

    /// Declination (ICRS) in degrees
    #[arg(long, requires = "ra", allow_negative_numbers = true)]
    pub dec: Option<f64>,

    /// Galactic Cartesian center in parsecs, as X Y Z
    #[arg(long, num_args = 3, value_names = ["X", "Y", "Z"], allow_negative_numbers = true)]
    pub xyz: Option<Vec<f64>>,

    /// Warn instead of failing when redundant inputs disagree
    #[arg(long)]
    pub lenient: bool,

    /// Catalogue(s) to query
    #[arg(long, value_enum, default_value = "both")]
    pub release: Release,

    /// Only print the resolved region, do not query
    #[arg(long)]
    pub dry_run: bool,

    /// Output directory for FITS results
    #[arg(long, default_value = "src_data")]
    pub output: PathBuf,
}

#[derive(Parser)]
pub struct CfhtArgs {
    /// CSV with source_id, Teff and Hmag columns
    #[arg(long)]
    pub stars: PathBuf,

    /// Cluster name, used for output file names
    #[arg(long)]
    pub cluster_name: String,

    /// Target SNR per pixel
    #[arg(long, default_value = "100")]
    pub snr: f64,

    /// Seeing in arcsec (0.1 to 5)
    #[arg(long, default_value = "1.0")]
    pub seeing: f64,

    /// Precipitable water vapour in mm
    #[arg(long, default_value = "1.6")]
    pub h2o: f64,

    #[arg(long, default_value = "1.0")]
    pub airmass: f64,

    /// Output directory
    #[arg(long, default_value = "output")]
    pub output: PathBuf,
}

#[derive(Parser)]
pub struct StarAltArgs {
    /// Observation year (1985 to 2029)
    #[arg(long)]
    pub year: u16,

    /// Observation month
    #[arg(long)]
    pub month: u8,

    /// Observation day
    #[arg(long)]
    pub day: u8,

    #[arg(long, value_enum, default_value = "staralt")]
    pub mode: StarAltMode,

    /// Cluster summary CSV with cluster_name, median_ra and median_dec columns
    #[arg(long)]
    pub catalog: PathBuf,

    /// Observatory, as named in STARALT's site list
    #[arg(long)]
    pub observatory: Option<String>,

    /// Output directory
    #[arg(long, default_value = "output")]
    pub output: PathBuf,
}
