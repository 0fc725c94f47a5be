use crate::core::currency::CurrencyTable;
use crate::core::share::{DEFAULT_SITE_URL, Redirect};
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use std::{fs, path::PathBuf};
use tracing::debug;

pub const SITE_URL_ENV: &str = "NEXT_PUBLIC_BASE_URL";

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ApiConfig {
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            base_url: "http://localhost:3000".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct SiteConfig {
    pub base_url: Option<String>,
}

/// Staleness windows, in seconds, for cached responses.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct CacheConfig {
    pub industries_secs: u64,
    pub company_secs: u64,
    pub default_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        CacheConfig {
            industries_secs: 10 * 60,
            company_secs: 0,
            default_secs: 5 * 60,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaleTimes {
    pub industries: Duration,
    pub company: Duration,
    pub default: Duration,
}

impl Default for StaleTimes {
    fn default() -> Self {
        (&CacheConfig::default()).into()
    }
}

impl From<&CacheConfig> for StaleTimes {
    fn from(config: &CacheConfig) -> Self {
        StaleTimes {
            industries: Duration::from_secs(config.industries_secs),
            company: Duration::from_secs(config.company_secs),
            default: Duration::from_secs(config.default_secs),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub site: SiteConfig,
    /// Units of each currency per USD; overrides the built-in and env rates.
    #[serde(default)]
    pub rates: HashMap<String, f64>,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub redirects: Vec<Redirect>,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!(
                "No config at {}, using defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("kr", "sectorking", "sectorking")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    /// Public site URL: config, then `NEXT_PUBLIC_BASE_URL`, then the default.
    pub fn site_url(&self) -> String {
        self.site
            .base_url
            .clone()
            .or_else(|| std::env::var(SITE_URL_ENV).ok())
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_SITE_URL.to_string())
    }

    pub fn currency_table(&self) -> CurrencyTable {
        CurrencyTable::from_env().with_overrides(&self.rates)
    }

    pub fn stale_times(&self) -> StaleTimes {
        (&self.cache).into()
    }
}
