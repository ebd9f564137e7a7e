use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_SEARCH_API_BASE: &str = "http://localhost:8000";
pub const DEFAULT_INGEST_API_BASE: &str = "http://localhost:8002";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub search: ServiceConfig,
    pub ingest: ServiceConfig,
    pub ui: UiConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl ServiceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UiConfig {
    pub default_n_results: Option<u32>,
    pub default_use_ai: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub dir: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let timeout_secs: u64 = var("HTTP_TIMEOUT_SECS", "30")
            .parse()
            .context("HTTP_TIMEOUT_SECS must be a whole number of seconds")?;
        if timeout_secs == 0 {
            bail!("HTTP_TIMEOUT_SECS must be at least 1");
        }

        // 0 disables the count so the backend picks its own default
        let default_n_results: u32 = var("DEFAULT_N_RESULTS", "5")
            .parse()
            .context("DEFAULT_N_RESULTS must be a non-negative integer")?;

        Ok(Self {
            search: ServiceConfig {
                base_url: normalize_base_url(&var("SEARCH_API_BASE", DEFAULT_SEARCH_API_BASE)),
                timeout_secs,
            },
            ingest: ServiceConfig {
                base_url: normalize_base_url(&var("INGEST_API_BASE", DEFAULT_INGEST_API_BASE)),
                timeout_secs,
            },
            ui: UiConfig {
                default_n_results: (default_n_results > 0).then_some(default_n_results),
                default_use_ai: var("DEFAULT_USE_AI", "false")
                    .parse()
                    .context("DEFAULT_USE_AI must be true or false")?,
            },
            logging: LoggingConfig {
                level: var("LOG_LEVEL", "info"),
                dir: lookup("LOG_DIR").filter(|d| !d.is_empty()).map(PathBuf::from),
            },
        })
    }

    /// Apply base URL overrides given on the command line.
    pub fn with_overrides(mut self, search_url: Option<String>, ingest_url: Option<String>) -> Self {
        if let Some(url) = search_url {
            self.search.base_url = normalize_base_url(&url);
        }
        if let Some(url) = ingest_url {
            self.ingest.base_url = normalize_base_url(&url);
        }
        self
    }
}

fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}
