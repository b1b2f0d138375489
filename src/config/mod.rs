use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

mod config_dir;
pub use config_dir::{CONFIG_ENV, find_config_file, read_config, read_config_file};

mod error;
pub use error::{ConfigError, ConfigResult};

static PROD_API_BASE_URL: &str = "https://ataasil-backend-production.up.railway.app/api/v1";
static DEV_API_BASE_URL: &str = "http://localhost:5000/api/v1";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    api: Api,
    session: SessionConfig,
    downloads: Downloads,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Api {
    base_url: String,
    timeout_secs: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Downloads {
    dir: PathBuf,
}

impl Default for Api {
    fn default() -> Self {
        let base_url = if cfg!(debug_assertions) {
            DEV_API_BASE_URL
        } else {
            PROD_API_BASE_URL
        };

        Self {
            base_url: base_url.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Default for Downloads {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
        }
    }
}

impl Config {
    /// Reads `config.toml`; a missing file means defaults. Loaded once at
    /// start and passed down.
    #[tracing::instrument]
    pub fn load(use_local: bool) -> ConfigResult<Self> {
        let bytes = match read_config(use_local) {
            Ok(bytes) => bytes,
            Err(ConfigError::ConfigNotFound) => {
                tracing::debug!("config not found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(e),
        };

        Self::from_slice(&bytes)
    }

    pub fn from_slice(bytes: &[u8]) -> ConfigResult<Self> {
        let mut config: Self = toml::from_slice(bytes)?;
        // a zero timeout would fail every request immediately
        if config.api.timeout_secs == 0 {
            tracing::warn!("api.timeout_secs = 0, using {DEFAULT_TIMEOUT_SECS}s");
            config.api.timeout_secs = DEFAULT_TIMEOUT_SECS;
        }
        tracing::debug!("api base url: {}", config.api.base_url);
        Ok(config)
    }

    pub fn with_api_base_url<S: Into<String>>(mut self, base_url: S) -> Self {
        self.api.base_url = base_url.into();
        self
    }

    pub fn with_downloads_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.downloads.dir = dir.into();
        self
    }

    #[inline]
    pub fn api(&self) -> &Api {
        &self.api
    }

    #[inline]
    pub fn session(&self) -> &SessionConfig {
        &self.session
    }

    #[inline]
    pub fn downloads(&self) -> &Downloads {
        &self.downloads
    }
}

impl Api {
    #[inline]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[inline]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl SessionConfig {
    #[inline]
    pub fn path(&self) -> Option<&PathBuf> {
        self.path.as_ref()
    }
}

impl Downloads {
    #[inline]
    pub fn dir(&self) -> &PathBuf {
        &self.dir
    }
}
