//! Process configuration read from the environment.
//!
//! | Variable                    | Meaning                              | Default          |
//! |-----------------------------|--------------------------------------|------------------|
//! | `TRANSIT_DATA`              | data set file path or http(s) URL    | required         |
//! | `TRANSIT_BIND`              | listen address                       | `127.0.0.1:3000` |
//! | `TRANSIT_RELOAD_SECS`       | periodic reload interval             | no reload        |
//! | `TRANSIT_SEARCH_TIMEOUT_MS` | per-search deadline, `0` disables it | `2000`           |

use std::net::SocketAddr;
use std::time::Duration;

use crate::cache::CacheConfig;
use crate::knowledge::DataSource;
use crate::planner::SearchConfig;

const DEFAULT_BIND: &str = "127.0.0.1:3000";

/// Error reading the configuration.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("environment variable {0} must be set")]
    Missing(&'static str),

    #[error("invalid {var}={value:?}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Everything the server binary needs to start.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub data: DataSource,
    pub bind: SocketAddr,
    pub reload_interval: Option<Duration>,
    pub search: SearchConfig,
    pub cache: CacheConfig,
}

impl ServerConfig {
    /// Read the configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let data = lookup("TRANSIT_DATA")
            .filter(|v| !v.trim().is_empty())
            .map(|v| DataSource::parse(&v))
            .ok_or(ConfigError::Missing("TRANSIT_DATA"))?;

        let bind_raw = lookup("TRANSIT_BIND").unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind = bind_raw
            .trim()
            .parse()
            .map_err(|e: std::net::AddrParseError| ConfigError::Invalid {
                var: "TRANSIT_BIND",
                value: bind_raw.clone(),
                reason: e.to_string(),
            })?;

        let reload_interval = match lookup("TRANSIT_RELOAD_SECS") {
            Some(raw) => match parse_u64("TRANSIT_RELOAD_SECS", &raw)? {
                0 => None,
                secs => Some(Duration::from_secs(secs)),
            },
            None => None,
        };

        let mut search = SearchConfig::default();
        if let Some(raw) = lookup("TRANSIT_SEARCH_TIMEOUT_MS") {
            search.timeout = match parse_u64("TRANSIT_SEARCH_TIMEOUT_MS", &raw)? {
                0 => None,
                ms => Some(Duration::from_millis(ms)),
            };
        }

        Ok(Self {
            data,
            bind,
            reload_interval,
            search,
            cache: CacheConfig::default(),
        })
    }
}

fn parse_u64(var: &'static str, raw: &str) -> Result<u64, ConfigError> {
    raw.trim().parse().map_err(|e: std::num::ParseIntError| ConfigError::Invalid {
        var,
        value: raw.to_string(),
        reason: e.to_string(),
    })
}
