//! Spherical selections around a Galactic Cartesian center, run against Gaia TAP services.
//!
//! The selection is done server-side: each source's heliocentric Cartesian
//! position is computed in ADQL from its parallax and (l, b), and sources within
//! `radius_pc` of the center are returned. Queries go to the synchronous `/sync`
//! endpoint; there is no job polling.

use std::path::{Path, PathBuf};

use celestial_region::GalacticCartesian;
use once_cell::sync::Lazy;
use regex::bytes::Regex;
use reqwest::blocking::Client;

use crate::export::write_payload;
use crate::{ServiceConfig, ServiceError, ServiceResult};

const X_EXPR: &str = "1000/g.parallax*COS(RADIANS(g.b))*COS(RADIANS(g.l))";
const Y_EXPR: &str = "1000/g.parallax*COS(RADIANS(g.b))*SIN(RADIANS(g.l))";
const Z_EXPR: &str = "1000/g.parallax*SIN(RADIANS(g.b))";

const SERVICE: &str = "TAP";

static QUERY_STATUS_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r#"<INFO\s+name="QUERY_STATUS"\s+value="([A-Z]+)"\s*"#,
        r#"(?:/>|>([^<]*)</INFO>)"#
    ))
    .unwrap()
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GaiaRelease {
    /// `gaiadr3.gaia_source` at ESA.
    Dr3,
    /// `gedr3mock.main`, the GeDR3 mock catalogue at GAVO Heidelberg.
    Edr3Mock,
}

impl GaiaRelease {
    pub fn default_maxrec(self) -> u64 {
        match self {
            Self::Dr3 => 10_000_000,
            Self::Edr3Mock => 16_000_000,
        }
    }

    pub fn endpoint(self, config: &ServiceConfig) -> &str {
        match self {
            Self::Dr3 => &config.gaia_tap_url,
            Self::Edr3Mock => &config.gaia_mock_tap_url,
        }
    }

    /// `<name>_<radius>.fits` or `<name>_mock_<radius>.fits`.
    pub fn output_file_name(self, name: &str, radius_pc: f64) -> String {
        match self {
            Self::Dr3 => format!("{}_{}.fits", name, radius_pc),
            Self::Edr3Mock => format!("{}_mock_{}.fits", name, radius_pc),
        }
    }
}

impl std::fmt::Display for GaiaRelease {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Dr3 => write!(f, "Gaia DR3"),
            Self::Edr3Mock => write!(f, "Gaia EDR3 mock"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaiaRegionQuery {
    center: GalacticCartesian,
    radius_pc: f64,
}

impl GaiaRegionQuery {
    pub const DEFAULT_RADIUS_PC: f64 = 100.0;

    pub fn new(center: GalacticCartesian, radius_pc: f64) -> ServiceResult<Self> {
        if !radius_pc.is_finite() || radius_pc <= 0.0 {
            return Err(ServiceError::invalid_parameter(
                "radius",
                format!("selection radius must be positive, got {}", radius_pc),
            ));
        }
        Ok(Self { center, radius_pc })
    }

    pub fn center(&self) -> GalacticCartesian {
        self.center
    }

    pub fn radius_pc(&self) -> f64 {
        self.radius_pc
    }

    fn sphere_condition(&self) -> String {
        format!(
            "(SQRT(POWER({} - ({}), 2) + POWER({} - ({}), 2) + POWER({} - ({}), 2)) < {})",
            X_EXPR,
            self.center.x(),
            Y_EXPR,
            self.center.y(),
            Z_EXPR,
            self.center.z(),
            self.radius_pc
        )
    }

    pub fn adql_gaia_dr3(&self) -> String {
        self.adql(GaiaRelease::Dr3)
    }

    pub fn adql_gaia_edr3_mock(&self) -> String {
        self.adql(GaiaRelease::Edr3Mock)
    }

    pub fn adql(&self, release: GaiaRelease) -> String {
        match release {
            GaiaRelease::Dr3 => format!(
                "SELECT *, {} AS X, {} AS Y, {} AS Z \
                 FROM gaiadr3.gaia_source AS g \
                 WHERE (g.parallax_over_error > 10) AND (g.astrometric_excess_noise < 1) AND {}",
                X_EXPR,
                Y_EXPR,
                Z_EXPR,
                self.sphere_condition()
            ),
            GaiaRelease::Edr3Mock => format!(
                "SELECT * FROM gedr3mock.main AS g \
                 WHERE (g.parallax/g.parallax_error > 10) AND (g.popid != 11) AND {}",
                self.sphere_condition()
            ),
        }
    }
}

pub struct TapClient {
    client: Client,
    base_url: String,
}

impl TapClient {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    pub fn sync_url(&self) -> String {
        format!("{}/sync", self.base_url.trim_end_matches('/'))
    }

    /// Runs `adql` synchronously and returns the raw result table in `format`.
    ///
    /// The service returns at most `maxrec` rows. A VOTable result that hit the
    /// limit carries `QUERY_STATUS="OVERFLOW"` and is logged as truncated; FITS
    /// results have no such marker, so a FITS table of exactly `maxrec` rows
    /// may be incomplete.
    pub fn run_sync(&self, adql: &str, maxrec: u64, format: &str) -> ServiceResult<Vec<u8>> {
        let url = self.sync_url();
        log::debug!("POST {} ({} chars of ADQL)", url, adql.len());

        let maxrec = maxrec.to_string();
        let response = self
            .client
            .post(&url)
            .form(&[
                ("REQUEST", "doQuery"),
                ("LANG", "ADQL"),
                ("FORMAT", format),
                ("MAXREC", maxrec.as_str()),
                ("QUERY", adql),
            ])
            .send()?;

        let status = response.status();
        let bytes = response.bytes()?.to_vec();
        match query_status(&bytes) {
            Some(QueryStatus::Error(message)) => {
                return Err(ServiceError::unexpected_response(SERVICE, message))
            }
            Some(QueryStatus::Overflow) => {
                log::warn!("{}: result truncated at MAXREC={} rows", url, maxrec)
            }
            None => {}
        }
        if !status.is_success() {
            return Err(ServiceError::status(SERVICE, status.as_u16()));
        }
        Ok(bytes)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum QueryStatus {
    Error(String),
    Overflow,
}

/// Reads the VOTable `QUERY_STATUS` INFO elements of a response. The overflow
/// marker follows the table data, so the whole body is scanned.
fn query_status(body: &[u8]) -> Option<QueryStatus> {
    let mut status = None;
    for caps in QUERY_STATUS_REGEX.captures_iter(body) {
        match &caps[1] {
            b"ERROR" => {
                let message = caps
                    .get(2)
                    .map(|m| String::from_utf8_lossy(m.as_bytes()).trim().to_string())
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| "query failed".to_string());
                return Some(QueryStatus::Error(message));
            }
            b"OVERFLOW" => status = Some(QueryStatus::Overflow),
            _ => {}
        }
    }
    status
}

/// Runs the region selection against `release` and writes the FITS result to `out_dir`.
pub fn fetch_region(
    config: &ServiceConfig,
    release: GaiaRelease,
    query: &GaiaRegionQuery,
    target_name: &str,
    out_dir: &Path,
) -> ServiceResult<PathBuf> {
    let tap = TapClient::new(config.client()?, release.endpoint(config));
    let bytes = tap.run_sync(&query.adql(release), release.default_maxrec(), "fits")?;
    log::info!("{}: received {} bytes for {}", release, bytes.len(), target_name);
    write_payload(
        out_dir,
        &release.output_file_name(target_name, query.radius_pc()),
        &bytes,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query() -> GaiaRegionQuery {
        GaiaRegionQuery::new(GalacticCartesian::new(-135.5, 86.25, -19.5), 100.0).unwrap()
    }

    #[test]
    fn test_radius_validation() {
        let c = GalacticCartesian::new(0.0, 0.0, 0.0);
        assert!(GaiaRegionQuery::new(c, 0.0).is_err());
        assert!(GaiaRegionQuery::new(c, -5.0).is_err());
        assert!(GaiaRegionQuery::new(c, f64::NAN).is_err());
    }

    #[test]
    fn test_dr3_adql() {
        let adql = query().adql_gaia_dr3();
        assert!(adql.starts_with("SELECT *, 1000/g.parallax"));
        assert!(adql.contains("FROM gaiadr3.gaia_source AS g"));
        assert!(adql.contains("(g.parallax_over_error > 10)"));
        assert!(adql.contains("(g.astrometric_excess_noise < 1)"));
        assert!(adql.contains("- (-135.5), 2)"));
        assert!(adql.contains("- (86.25), 2)"));
        assert!(adql.contains("- (-19.5), 2)"));
        assert!(adql.ends_with("< 100)"));
    }

    #[test]
    fn test_mock_adql() {
        let adql = query().adql_gaia_edr3_mock();
        assert!(adql.starts_with("SELECT * FROM gedr3mock.main AS g"));
        assert!(adql.contains("(g.parallax/g.parallax_error > 10)"));
        assert!(adql.contains("(g.popid != 11)"));
        assert!(!adql.contains("AS X"));
    }

    #[test]
    fn test_release_metadata() {
        assert_eq!(GaiaRelease::Dr3.default_maxrec(), 10_000_000);
        assert_eq!(GaiaRelease::Edr3Mock.default_maxrec(), 16_000_000);
        assert_eq!(
            GaiaRelease::Dr3.output_file_name("Pleiades", 100.0),
            "Pleiades_100.fits"
        );
        assert_eq!(
            GaiaRelease::Edr3Mock.output_file_name("Pleiades", 50.0),
            "Pleiades_mock_50.fits"
        );
    }

    #[test]
    fn test_sync_url() {
        let tap = TapClient::new(Client::new(), "http://host/tap/");
        assert_eq!(tap.sync_url(), "http://host/tap/sync");
    }

    #[test]
    fn test_query_error_detection() {
        let votable = br#"<VOTABLE><RESOURCE type="results">
<INFO name="QUERY_STATUS" value="ERROR">Column 'foo' not found</INFO>
</RESOURCE></VOTABLE>"#;
        assert_eq!(
            query_status(votable),
            Some(QueryStatus::Error("Column 'foo' not found".to_string()))
        );
        assert!(query_status(b"SIMPLE  =                    T").is_none());
    }

    #[test]
    fn test_overflow_after_table_data() {
        let mut votable = String::from(concat!(
            r#"<VOTABLE><RESOURCE type="results"><INFO name="QUERY_STATUS" value="OK"/>"#,
            "<TABLE><DATA><TABLEDATA>"
        ));
        for id in 0..2000 {
            votable.push_str(&format!("<TR><TD>{}</TD></TR>", id));
        }
        votable.push_str(concat!(
            "</TABLEDATA></DATA></TABLE>",
            r#"<INFO name="QUERY_STATUS" value="OVERFLOW"/></RESOURCE></VOTABLE>"#
        ));
        assert!(votable.len() > 8192);
        assert_eq!(query_status(votable.as_bytes()), Some(QueryStatus::Overflow));

        let complete = r#"<VOTABLE><INFO name="QUERY_STATUS" value="OK"/></VOTABLE>"#;
        assert!(query_status(complete.as_bytes()).is_none());
    }

    mod mock_http_tests {
        use super::*;
        use wiremock::matchers::{body_string_contains, method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        #[tokio::test]
        async fn test_fetch_region_writes_fits() {
            let mock_server = MockServer::start().await;
            Mock::given(method("POST"))
                .and(path("/tap/sync"))
                .and(body_string_contains("REQUEST=doQuery"))
                .and(body_string_contains("FORMAT=fits"))
                .and(body_string_contains("MAXREC=10000000"))
                .respond_with(ResponseTemplate::new(200).set_body_bytes(b"SIMPLE  = T".to_vec()))
                .expect(1)
                .mount(&mock_server)
                .await;

            let config = ServiceConfig {
                gaia_tap_url: format!("{}/tap", mock_server.uri()),
                ..ServiceConfig::default()
            };
            let out = tempfile::TempDir::new().unwrap();
            let out_path = out.path().to_path_buf();

            let written = tokio::task::spawn_blocking(move || {
                fetch_region(&config, GaiaRelease::Dr3, &query(), "Pleiades", &out_path)
            })
            .await
            .unwrap()
            .unwrap();

            assert_eq!(written, out.path().join("Pleiades_100.fits"));
            assert_eq!(std::fs::read(written).unwrap(), b"SIMPLE  = T");
        }

        #[tokio::test]
        async fn test_run_sync_http_error() {
            let mock_server = MockServer::start().await;
            Mock::given(method("POST"))
                .and(path("/sync"))
                .respond_with(ResponseTemplate::new(503))
                .mount(&mock_server)
                .await;

            let uri = mock_server.uri();
            let result = tokio::task::spawn_blocking(move || {
                TapClient::new(Client::new(), uri).run_sync("SELECT 1", 10, "csv")
            })
            .await
            .unwrap();

            assert!(matches!(
                result,
                Err(ServiceError::Status { status: 503, .. })
            ));
        }

        #[tokio::test]
        async fn test_run_sync_votable_error() {
            let mock_server = MockServer::start().await;
            let body = r#"<VOTABLE><INFO name="QUERY_STATUS" value="ERROR">syntax error</INFO></VOTABLE>"#;
            Mock::given(method("POST"))
                .and(path("/sync"))
                .respond_with(ResponseTemplate::new(400).set_body_string(body))
                .mount(&mock_server)
                .await;

            let uri = mock_server.uri();
            let result = tokio::task::spawn_blocking(move || {
                TapClient::new(Client::new(), uri).run_sync("SELEC 1", 10, "votable")
            })
            .await
            .unwrap();

            match result {
                Err(ServiceError::UnexpectedResponse { message, .. }) => {
                    assert_eq!(message, "syntax error")
                }
                other => panic!("expected UnexpectedResponse, got {:?}", other.map(|b| b.len())),
            }
        }

        #[tokio::test]
        async fn test_run_sync_overflow_returns_rows() {
            let mock_server = MockServer::start().await;
            let body = concat!(
                r#"<VOTABLE><RESOURCE><TABLE><DATA><TABLEDATA><TR><TD>1</TD></TR>"#,
                r#"</TABLEDATA></DATA></TABLE>"#,
                r#"<INFO name="QUERY_STATUS" value="OVERFLOW"/></RESOURCE></VOTABLE>"#
            );
            Mock::given(method("POST"))
                .and(path("/sync"))
                .and(body_string_contains("MAXREC=1"))
                .respond_with(ResponseTemplate::new(200).set_body_string(body))
                .mount(&mock_server)
                .await;

            let uri = mock_server.uri();
            let bytes = tokio::task::spawn_blocking(move || {
                TapClient::new(Client::new(), uri).run_sync("SELECT TOP 5 * FROM t", 1, "votable")
            })
            .await
            .unwrap()
            .unwrap();

            assert_eq!(bytes, body.as_bytes());
        }
    }
}
