//! Service endpoints and client settings.
//!
//! Every field has a default pointing at the public service, so a config file
//! only needs the entries it overrides:
//!
//! ```json
//! { "gaia_tap_url": "https://gea.esac.esa.int/tap-server/tap", "timeout_secs": 600 }
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use crate::{ServiceError, ServiceResult};

pub const GAIA_TAP_URL: &str = "https://gea.esac.esa.int/tap-server/tap";
pub const GAIA_MOCK_TAP_URL: &str = "http://dc.zah.uni-heidelberg.de/__system__/tap/run/tap";
pub const CFHT_ETC_URL: &str = "https://etc.cfht.hawaii.edu/cgi-bin/spi/etc.pl";
pub const STARALT_URL: &str = "http://catserver.ing.iac.es/staralt/index.php";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServiceConfig {
    pub gaia_tap_url: String,
    pub gaia_mock_tap_url: String,
    pub cfht_etc_url: String,
    pub staralt_url: String,
    /// Per-request timeout. TAP queries over large spheres can take minutes.
    pub timeout_secs: u64,
    pub user_agent: String,
    /// Where unparseable responses are dumped as `error_output.txt`.
    pub error_dir: PathBuf,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            gaia_tap_url: GAIA_TAP_URL.to_string(),
            gaia_mock_tap_url: GAIA_MOCK_TAP_URL.to_string(),
            cfht_etc_url: CFHT_ETC_URL.to_string(),
            staralt_url: STARALT_URL.to_string(),
            timeout_secs: 300,
            user_agent: format!("celestial-services/{}", env!("CARGO_PKG_VERSION")),
            error_dir: PathBuf::from("error"),
        }
    }
}

impl ServiceConfig {
    pub fn from_json_str(json: &str) -> ServiceResult<Self> {
        serde_json::from_str(json).map_err(|e| ServiceError::config(e.to_string()))
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> ServiceResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            ServiceError::config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_json_str(&json)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Blocking client carrying this config's timeout and user agent.
    pub fn client(&self) -> ServiceResult<Client> {
        Ok(Client::builder()
            .user_agent(&self.user_agent)
            .timeout(self.timeout())
            .build()?)
    }
}
