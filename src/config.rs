//! Runtime configuration.
//!
//! Read from a TOML file; every section and key is optional. The file path
//! comes from `--config`, else `GNSS_SURVEY_CONFIG` (a `.env` file in the
//! working directory is honoured), else `gnss_survey.toml` if present, else
//! built-in defaults.
//!
//! ```toml
//! [log]
//! level = "info"
//! file = "gnss_survey.log"
//! timestamps = false
//!
//! [products]
//! rapid = "https://garner.ucsd.edu/pub/products/{week}/igr{id}.sp3.Z"
//!
//! [stations]
//! table = "stations.toml"
//! default_k = 5
//!
//! [download]
//! output_dir = "orbits"
//! timeout_secs = 60
//! ```

use serde::Deserialize;
use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::logging::LogLevel;
use crate::products::ProductTemplates;

pub const CONFIG_ENV_VAR: &str = "GNSS_SURVEY_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "gnss_survey.toml";

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, PartialEq)]
pub enum ConfigError {
    Io(String),
    Parse(String),
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(msg) => write!(f, "Config I/O error: {}", msg),
            ConfigError::Parse(msg) => write!(f, "Config parse error: {}", msg),
            ConfigError::Invalid(msg) => write!(f, "Invalid config: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: LogLevel,
    pub file: Option<String>,
    pub timestamps: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            file: None,
            timestamps: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct StationsConfig {
    /// Replaces the built-in station table when set.
    pub table: Option<PathBuf>,
    /// Number of stations returned when `-k` is not given.
    pub default_k: usize,
}

impl Default for StationsConfig {
    fn default() -> Self {
        Self {
            table: None,
            default_k: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DownloadConfig {
    pub output_dir: PathBuf,
    pub timeout_secs: u64,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            timeout_secs: 60,
        }
    }
}

impl DownloadConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub log: LogConfig,
    pub products: ProductTemplates,
    pub stations: StationsConfig,
    pub download: DownloadConfig,
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

impl Config {
    /// Parses and validates TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&text)
    }

    /// Resolves the config source as described in the module docs.
    ///
    /// An explicitly named file (flag or env var) must exist; the implicit
    /// `gnss_survey.toml` is optional.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();

        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        if let Ok(path) = env::var(CONFIG_ENV_VAR) {
            return Self::from_file(Path::new(&path));
        }
        let implicit = Path::new(DEFAULT_CONFIG_FILE);
        if implicit.exists() {
            return Self::from_file(implicit);
        }
        Ok(Self::default())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.products.validate().map_err(ConfigError::Invalid)?;
        if self.stations.default_k == 0 {
            return Err(ConfigError::Invalid("stations.default_k must be at least 1".to_string()));
        }
        if self.download.timeout_secs == 0 {
            return Err(ConfigError::Invalid("download.timeout_secs must be at least 1".to_string()));
        }
        Ok(())
    }
}
