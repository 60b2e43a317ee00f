use crate::providers::history::{DEFAULT_FALLBACK_PRICE, DEFAULT_HISTORY_DAYS};
use crate::providers::{blockchain, coincap, coingecko};
use anyhow::{Context, Result, bail};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use std::{fs, path::PathBuf};
use tracing::debug;

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ProviderConfig {
    pub base_url: String,
}

impl ProviderConfig {
    fn with_base_url(base_url: &str) -> Self {
        ProviderConfig {
            base_url: base_url.to_string(),
        }
    }
}

fn default_coingecko() -> ProviderConfig {
    ProviderConfig::with_base_url(coingecko::DEFAULT_BASE_URL)
}

fn default_coincap() -> ProviderConfig {
    ProviderConfig::with_base_url(coincap::DEFAULT_BASE_URL)
}

fn default_blockchain() -> ProviderConfig {
    ProviderConfig::with_base_url(blockchain::DEFAULT_BASE_URL)
}

/// Base URLs for the fixed provider chain. Order is not configurable.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ProvidersConfig {
    #[serde(default = "default_coingecko")]
    pub coingecko: ProviderConfig,
    #[serde(default = "default_coincap")]
    pub coincap: ProviderConfig,
    #[serde(default = "default_blockchain")]
    pub blockchain: ProviderConfig,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        ProvidersConfig {
            coingecko: default_coingecko(),
            coincap: default_coincap(),
            blockchain: default_blockchain(),
        }
    }
}

fn default_base_investment() -> f64 {
    100.0
}

fn default_history_days() -> u32 {
    DEFAULT_HISTORY_DAYS
}

fn default_fallback_price() -> f64 {
    DEFAULT_FALLBACK_PRICE
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_retries() -> usize {
    1
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default = "default_base_investment")]
    pub base_investment: f64,
    #[serde(default = "default_history_days")]
    pub history_days: u32,
    #[serde(default = "default_fallback_price")]
    pub fallback_price: f64,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_retries")]
    pub retries: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            providers: ProvidersConfig::default(),
            base_investment: default_base_investment(),
            history_days: default_history_days(),
            fallback_price: default_fallback_price(),
            request_timeout_secs: default_request_timeout_secs(),
            retries: default_retries(),
        }
    }
}

impl AppConfig {
    /// Loads the default config file, or built-in defaults if there is none.
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
        let proj_dirs = ProjectDirs::from("org", "ahr999", "ahr999")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        config
            .validate()
            .with_context(|| format!("Invalid config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.base_investment.is_finite() && self.base_investment > 0.0) {
            bail!("base_investment must be a positive number");
        }
        if self.history_days == 0 {
            bail!("history_days must be at least 1");
        }
        if !(self.fallback_price.is_finite() && self.fallback_price > 0.0) {
            bail!("fallback_price must be a positive number");
        }
        if self.request_timeout_secs == 0 {
            bail!("request_timeout_secs must be at least 1");
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
