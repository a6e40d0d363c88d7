//! CFHT SPIRou exposure time calculator (ETC).
//!
//! The ETC is a CGI script driven entirely by query parameters. In exposure-time
//! mode (`CALCOPT=1`) it reports `texp=<seconds>s` for a target SNR per pixel;
//! in SNR mode (`CALCOPT=0`) it reports `snr=<value>` for a given exposure.
//! Stellar radius and distance are fixed at the calculator's M-dwarf defaults.

use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::blocking::Client;

use crate::export::write_payload;
use crate::tables::StarEntry;
use crate::{ServiceConfig, ServiceError, ServiceResult};

const SERVICE: &str = "CFHT ETC";

/// Recorded in batch summaries for stars whose request timed out.
pub const FETCH_FAILED: &str = "Failed to Fetch! Perform Manual Request!";

static TEXP_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"texp=([-+]?[0-9]*\.?[0-9]+)s").unwrap());
static SNR_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"snr=([-+]?[0-9]*\.?[0-9]+)").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalcMode {
    ExposureTime,
    SignalToNoise,
}

impl CalcMode {
    pub fn calcopt(self) -> u8 {
        match self {
            Self::ExposureTime => 1,
            Self::SignalToNoise => 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EtcRequest {
    pub mode: CalcMode,
    /// Effective temperature, K.
    pub t_eff: f64,
    /// Target SNR per pixel (exposure-time mode).
    pub snr: f64,
    /// Exposure time, s (SNR mode).
    pub exposure_time: f64,
    pub h_mag: f64,
    /// Seeing, arcsec. Must lie in [0.1, 5].
    pub seeing: f64,
    /// Precipitable water vapour, mm.
    pub h2o: f64,
    pub airmass: f64,
}

impl Default for EtcRequest {
    fn default() -> Self {
        Self {
            mode: CalcMode::ExposureTime,
            t_eff: 3200.0,
            snr: 100.0,
            exposure_time: 1800.0,
            h_mag: 7.0,
            seeing: 1.0,
            h2o: 1.6,
            airmass: 1.0,
        }
    }
}

impl EtcRequest {
    pub fn exposure_time(t_eff: f64, h_mag: f64, snr: f64) -> Self {
        Self {
            mode: CalcMode::ExposureTime,
            t_eff,
            h_mag,
            snr,
            ..Self::default()
        }
    }

    pub fn signal_to_noise(t_eff: f64, h_mag: f64, exposure_time: f64) -> Self {
        Self {
            mode: CalcMode::SignalToNoise,
            t_eff,
            h_mag,
            exposure_time,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> ServiceResult<()> {
        if !(0.1..=5.0).contains(&self.seeing) {
            return Err(ServiceError::invalid_parameter(
                "seeing",
                format!(
                    "'{}' is not a valid value for seeing, which lies between 0.1 and 5",
                    self.seeing
                ),
            ));
        }
        Ok(())
    }

    /// Query string in the order the calculator's own form submits it.
    pub fn query_string(&self) -> ServiceResult<String> {
        self.validate()?;
        let (texp, snr) = match self.mode {
            CalcMode::ExposureTime => (0.0, self.snr),
            CalcMode::SignalToNoise => (self.exposure_time, 0.0),
        };
        Ok(format!(
            "CALCOPT={}&TEXP={}&SNR={}&MAG={}&TMP={}&SEE={}&RSTAR=0.15&DIST=27&H2O={}&AIRMASS={}&DETAILS=1",
            self.mode.calcopt(),
            texp,
            snr,
            self.h_mag,
            self.t_eff,
            self.seeing,
            self.h2o,
            self.airmass
        ))
    }

    pub fn url(&self, base_url: &str) -> ServiceResult<String> {
        Ok(format!("{}?{}", base_url, self.query_string()?))
    }
}

/// A value parsed from an ETC response.
#[derive(Debug, Clone, PartialEq)]
pub struct EtcResult {
    pub mode: CalcMode,
    pub value: f64,
}

impl std::fmt::Display for EtcResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.mode {
            CalcMode::ExposureTime => write!(f, "{}s", self.value),
            CalcMode::SignalToNoise => write!(f, "{}", self.value),
        }
    }
}

pub fn parse_response(mode: CalcMode, text: &str) -> Option<EtcResult> {
    let regex = match mode {
        CalcMode::ExposureTime => &*TEXP_REGEX,
        CalcMode::SignalToNoise => &*SNR_REGEX,
    };
    let value = regex.captures(text)?.get(1)?.as_str().parse().ok()?;
    Some(EtcResult { mode, value })
}

pub struct EtcClient {
    client: Client,
    base_url: String,
    error_dir: PathBuf,
}

impl EtcClient {
    pub fn new(client: Client, base_url: impl Into<String>, error_dir: impl Into<PathBuf>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            error_dir: error_dir.into(),
        }
    }

    pub fn from_config(config: &ServiceConfig) -> ServiceResult<Self> {
        Ok(Self::new(
            config.client()?,
            config.cfht_etc_url.clone(),
            config.error_dir.clone(),
        ))
    }

    /// Sends `request`; when `export` is given the raw response is written to
    /// `export.0/export.1` before parsing.
    pub fn fetch(
        &self,
        request: &EtcRequest,
        export: Option<(&Path, &str)>,
    ) -> ServiceResult<EtcResult> {
        let url = request.url(&self.base_url)?;
        log::debug!("GET {}", url);

        let response = self.client.get(&url).send()?;
        if !response.status().is_success() {
            return Err(ServiceError::status(SERVICE, response.status().as_u16()));
        }
        let bytes = response.bytes()?;

        if let Some((dir, file_name)) = export {
            write_payload(dir, file_name, &bytes)?;
        }

        let text = String::from_utf8_lossy(&bytes);
        match parse_response(request.mode, &text) {
            Some(result) => Ok(result),
            None => {
                let dump = write_payload(&self.error_dir, "error_output.txt", &bytes)?;
                Err(ServiceError::unexpected_response(
                    SERVICE,
                    format!("no result value found; response saved to {}", dump.display()),
                ))
            }
        }
    }
}

/// Observing conditions shared by every star of a batch.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchSettings {
    pub cluster_name: String,
    pub snr: f64,
    pub seeing: f64,
    pub h2o: f64,
    pub airmass: f64,
}

impl BatchSettings {
    fn label(&self) -> String {
        format!("{} SNR{}", self.cluster_name, self.snr)
    }

    fn request_for(&self, star: &StarEntry) -> EtcRequest {
        EtcRequest {
            seeing: self.seeing,
            h2o: self.h2o,
            airmass: self.airmass,
            ..EtcRequest::exposure_time(star.t_eff, star.h_mag, self.snr)
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BatchRow {
    pub star: StarEntry,
    /// `"<seconds>s"`, or [`FETCH_FAILED`] when the request timed out.
    pub exposure_time: String,
}

/// Requests an exposure time for every star, then writes
/// `<out_root>/<cluster> SNR<snr> summary.csv`.
///
/// Raw responses go to `<out_root>/<cluster> SNR<snr>/<source_id> t-exp_output.txt`.
/// A timed-out request is recorded as [`FETCH_FAILED`] and the batch continues;
/// any other failure aborts it.
pub fn exposure_time_batch(
    client: &EtcClient,
    stars: &[StarEntry],
    settings: &BatchSettings,
    out_root: &Path,
) -> ServiceResult<(Vec<BatchRow>, PathBuf)> {
    let response_dir = out_root.join(settings.label());
    let mut rows = Vec::with_capacity(stars.len());

    for star in stars {
        log::info!("{} {}", settings.cluster_name, star.source_id);
        let file_name = format!("{} t-exp_output.txt", star.source_id);
        let exposure_time = match client.fetch(
            &settings.request_for(star),
            Some((response_dir.as_path(), file_name.as_str())),
        ) {
            Ok(result) => result.to_string(),
            Err(e) if e.is_timeout() => {
                log::warn!("CFHT seems not responding... skipping star {}", star.source_id);
                FETCH_FAILED.to_string()
            }
            Err(e) => return Err(e),
        };
        rows.push(BatchRow {
            star: star.clone(),
            exposure_time,
        });
    }

    let summary = summary_csv(&rows, settings)?;
    let path = write_payload(
        out_root,
        &format!("{} summary.csv", settings.label()),
        &summary,
    )?;
    Ok((rows, path))
}

const SUMMARY_HEADER: [&str; 9] = [
    "cluster_name",
    "star_gaia_id",
    "star_Hmag",
    "star_Teff",
    "target_signal_noise_ratio",
    "target_seeing",
    "target_h2o",
    "target_airmass",
    "exposure_time",
];

fn summary_csv(rows: &[BatchRow], settings: &BatchSettings) -> ServiceResult<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    writer.write_record(SUMMARY_HEADER)?;
    for row in rows {
        writer.write_record([
            settings.cluster_name.clone(),
            row.star.source_id.to_string(),
            row.star.h_mag.to_string(),
            row.star.t_eff.to_string(),
            settings.snr.to_string(),
            settings.seeing.to_string(),
            settings.h2o.to_string(),
            settings.airmass.to_string(),
            row.exposure_time.clone(),
        ])?;
    }
    writer.into_inner().map_err(|e| e.into_error().into())
}
