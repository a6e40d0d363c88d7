//! STARALT (ING) observability plots.
//!
//! STARALT renders altitude, track, observability and multi-night charts for a
//! list of targets from a multipart form post. The response body is the GIF
//! itself.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use reqwest::blocking::multipart::{Form, Part};
use reqwest::blocking::Client;

use crate::export::write_payload;
use crate::tables::ClusterSummary;
use crate::{ServiceConfig, ServiceError, ServiceResult};

const SERVICE: &str = "STARALT";
const ORIGIN: &str = "http://catserver.ing.iac.es";
const REFERER: &str = "http://catserver.ing.iac.es/staralt/";

pub const DEFAULT_OBSERVATORY: &str = "Mauna Kea Observatory (Hawaii, USA)";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum StarAltMode {
    /// Altitude against time for one night.
    Staralt,
    /// Sky track for one night.
    Startrack,
    /// Observability over the year.
    Starobs,
    /// Observability over several nights.
    Starmult,
}

impl StarAltMode {
    pub fn code(self) -> u8 {
        match self {
            Self::Staralt => 1,
            Self::Startrack => 2,
            Self::Starobs => 3,
            Self::Starmult => 4,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Staralt => "staralt",
            Self::Startrack => "startrack",
            Self::Starobs => "starobs",
            Self::Starmult => "starmult",
        }
    }

    /// Single-night modes, whose output depends on the date.
    pub fn is_dated(self) -> bool {
        matches!(self, Self::Staralt | Self::Startrack)
    }
}

impl FromStr for StarAltMode {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "staralt" => Ok(Self::Staralt),
            "startrack" => Ok(Self::Startrack),
            "starobs" => Ok(Self::Starobs),
            "starmult" => Ok(Self::Starmult),
            other => Err(ServiceError::invalid_parameter(
                "mode",
                format!(
                    "'{}' does not match any known mode (staralt, startrack, starobs, starmult)",
                    other
                ),
            )),
        }
    }
}

impl std::fmt::Display for StarAltMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Night of observation. Day is only range-checked, not checked against the month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObservationDate {
    year: u16,
    month: u8,
    day: u8,
}

impl ObservationDate {
    pub fn new(year: u16, month: u8, day: u8) -> ServiceResult<Self> {
        if !(1985..=2029).contains(&year) {
            return Err(ServiceError::invalid_parameter(
                "year",
                format!("'{}' is not a valid year", year),
            ));
        }
        if !(1..=12).contains(&month) {
            return Err(ServiceError::invalid_parameter(
                "month",
                format!("'{}' is not a valid month", month),
            ));
        }
        if !(1..=31).contains(&day) {
            return Err(ServiceError::invalid_parameter(
                "day",
                format!("'{}' is not a valid day", day),
            ));
        }
        Ok(Self { year, month, day })
    }

    pub fn year(&self) -> String {
        format!("{:04}", self.year)
    }

    pub fn month(&self) -> String {
        format!("{:02}", self.month)
    }

    pub fn day(&self) -> String {
        format!("{:02}", self.day)
    }

    /// `YYYYMMDD`
    pub fn compact(&self) -> String {
        format!("{:04}{:02}{:02}", self.year, self.month, self.day)
    }
}

/// Strips underscores and restores the catalogue's upper-case group prefixes.
pub fn normalize_cluster_name(name: &str) -> String {
    name.replace('_', "").replace("gp", "GP").replace("isl", "ISL")
}

/// Where the plot for `name` is stored under `root`.
pub fn output_path(root: &Path, mode: StarAltMode, name: &str, date: &ObservationDate) -> PathBuf {
    let overall = root.join(format!("overall {}", mode));
    if mode.is_dated() {
        overall
            .join(date.compact())
            .join(format!("{}_{}_{}.gif", mode, name, date.compact()))
    } else {
        overall.join(format!("{}_{}.gif", mode, name))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Target {
    pub name: String,
    /// Degrees.
    pub ra: f64,
    /// Degrees.
    pub dec: f64,
}

impl Target {
    fn coord_line(&self) -> String {
        format!("{} {} {}", self.name, self.ra, self.dec)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StarAltRequest {
    pub mode: StarAltMode,
    pub date: ObservationDate,
    pub target: Option<Target>,
    /// Contents of a coordinate file, one `name ra dec` per line.
    pub target_list: Option<String>,
}

impl StarAltRequest {
    pub fn single(mode: StarAltMode, date: ObservationDate, target: Target) -> Self {
        Self {
            mode,
            date,
            target: Some(target),
            target_list: None,
        }
    }

    pub fn validate(&self) -> ServiceResult<()> {
        if self.target.is_none() && self.target_list.is_none() {
            return Err(ServiceError::invalid_parameter(
                "target",
                "target and target list cannot both be absent",
            ));
        }
        Ok(())
    }

    fn form(&self, observatory: &str) -> ServiceResult<Form> {
        self.validate()?;
        let coordlist = self.target.as_ref().map(Target::coord_line).unwrap_or_default();
        let coordfile = Part::bytes(self.target_list.clone().unwrap_or_default().into_bytes())
            .file_name("")
            .mime_str("application/octet-stream")?;

        Ok(Form::new()
            .text("action", "showImage")
            .text("form[mode]", self.mode.code().to_string())
            .text("form[year]", self.date.year())
            .text("form[month]", self.date.month())
            .text("form[day]", self.date.day())
            .text("form[obs_name]", observatory.to_string())
            .text("form[coordlist]", coordlist)
            .part("coordfile", coordfile)
            .text("form[paramdist]", "2")
            .text("form[minangle]", "10")
            .text("form[format]", "gif"))
    }
}

pub struct StarAltClient {
    client: Client,
    base_url: String,
    observatory: String,
}

impl StarAltClient {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            observatory: DEFAULT_OBSERVATORY.to_string(),
        }
    }

    pub fn from_config(config: &ServiceConfig) -> ServiceResult<Self> {
        Ok(Self::new(config.client()?, config.staralt_url.clone()))
    }

    pub fn with_observatory(mut self, observatory: impl Into<String>) -> Self {
        self.observatory = observatory.into();
        self
    }

    pub fn observatory(&self) -> &str {
        &self.observatory
    }

    /// Posts `request` and writes the returned plot to `dest`.
    pub fn fetch(&self, request: &StarAltRequest, dest: &Path) -> ServiceResult<PathBuf> {
        let form = request.form(&self.observatory)?;
        log::debug!("POST {} (mode {})", self.base_url, request.mode);

        let response = self
            .client
            .post(&self.base_url)
            .header("Origin", ORIGIN)
            .header("Referer", REFERER)
            .header("Cache-Control", "max-age=0")
            .multipart(form)
            .send()?;
        if !response.status().is_success() {
            return Err(ServiceError::status(SERVICE, response.status().as_u16()));
        }
        let bytes = response.bytes()?;

        let (dir, file_name) = match (dest.parent(), dest.file_name().and_then(|n| n.to_str())) {
            (Some(dir), Some(file_name)) => (dir, file_name),
            _ => {
                return Err(ServiceError::invalid_parameter(
                    "dest",
                    format!("'{}' is not a file path", dest.display()),
                ))
            }
        };
        write_payload(dir, file_name, &bytes)
    }
}

/// Fetches one plot per cluster, using its median position as the target.
pub fn staralt_batch(
    client: &StarAltClient,
    clusters: &[ClusterSummary],
    mode: StarAltMode,
    date: &ObservationDate,
    out_root: &Path,
) -> ServiceResult<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(clusters.len());
    for cluster in clusters {
        let name = normalize_cluster_name(&cluster.cluster_name);
        log::info!("{} {} {}", name, cluster.median_ra, cluster.median_dec);

        let request = StarAltRequest::single(
            mode,
            *date,
            Target {
                name: name.clone(),
                ra: cluster.median_ra,
                dec: cluster.median_dec,
            },
        );
        written.push(client.fetch(&request, &output_path(out_root, mode, &name, date))?);
    }
    Ok(written)
}
