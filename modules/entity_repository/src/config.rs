//! Configuration for the entity repository module

use crate::domain::PagePolicy;
use anyhow::{ensure, Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Environment variable prefix; nested keys are separated by `__`
pub const ENV_PREFIX: &str = "ENTITY_REPO_";

/// Entity repository configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Connection settings
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Page size bounds and policy
    #[serde(default)]
    pub paging: PagingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    /// Connection URL (`postgres://...` or `sqlite:...`)
    #[serde(default = "default_url")]
    pub url: String,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    #[serde(default = "default_connect_timeout", with = "humantime_serde")]
    pub connect_timeout: Duration,

    /// Log every statement through sqlx
    #[serde(default)]
    pub sqlx_logging: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            max_connections: default_max_connections(),
            connect_timeout: default_connect_timeout(),
            sqlx_logging: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PagingConfig {
    /// Page size used by `Repository::default_options`
    #[serde(default = "default_page_size")]
    pub default_page_size: u64,

    /// Largest page a caller may request
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u64,

    /// Reject or clamp out-of-range page requests
    #[serde(default)]
    pub policy: PagePolicy,
}

impl Default for PagingConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
            policy: PagePolicy::default(),
        }
    }
}

impl Config {
    /// Defaults, then the optional YAML file, then `ENTITY_REPO_*` variables
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if let Some(path) = path {
            figment = figment.merge(Yaml::file(path));
        }
        Self::extract(figment.merge(Env::prefixed(ENV_PREFIX).split("__")))
    }

    /// Extract and validate a configuration from any figment
    pub fn extract(figment: Figment) -> Result<Self> {
        let config: Config = figment
            .extract()
            .context("invalid entity repository configuration")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let paging = &self.paging;
        ensure!(
            (1..=i64::MAX as u64).contains(&paging.max_page_size),
            "paging.max_page_size must be between 1 and {}",
            i64::MAX
        );
        ensure!(
            (1..=paging.max_page_size).contains(&paging.default_page_size),
            "paging.default_page_size must be between 1 and {}",
            paging.max_page_size
        );
        ensure!(
            self.database.max_connections >= 1,
            "database.max_connections must be at least 1"
        );
        Ok(())
    }
}

fn default_url() -> String {
    "sqlite::memory:".to_string()
}

fn default_max_connections() -> u32 {
    10
}

fn default_connect_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_page_size() -> u64 {
    20
}

fn default_max_page_size() -> u64 {
    100
}
