//! Runtime configuration
//!
//! Built once at startup from an environment-style lookup and passed into
//! component constructors. Nothing reads the environment after that.

use crate::errors::{RosterError, RosterErrorKind, Result};
use roster_core_types::Sensitive;
use std::path::PathBuf;
use std::time::Duration;

pub const ENV_API_URL: &str = "API_URL";
pub const ENV_API_TOKEN: &str = "API_TOKEN";
pub const ENV_SNAPSHOT_PATH: &str = "CSV_FILENAME";
pub const ENV_DB_PATH: &str = "DB_PATH";
pub const ENV_API_TIMEOUT_SECS: &str = "API_TIMEOUT_SECS";

pub const DEFAULT_API_URL: &str = "https://myavanti.ca/avtesting-api/v1/Employees";
pub const DEFAULT_SNAPSHOT_PATH: &str = "employees.csv";
pub const DEFAULT_DB_PATH: &str = "roster.db";

/// Everything a fetcher needs to reach the remote roster
#[derive(Debug, Clone)]
pub struct FetchEndpoint {
    pub url: String,
    pub token: Sensitive<String>,
    pub timeout: Option<Duration>,
}

/// Process configuration
#[derive(Debug, Clone)]
pub struct RosterConfig {
    pub api_url: String,
    pub api_token: Option<Sensitive<String>>,
    pub api_timeout: Option<Duration>,
    pub snapshot_path: PathBuf,
    pub db_path: PathBuf,
}

impl RosterConfig {
    /// Read configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration from an arbitrary lookup
    ///
    /// Blank values count as unset.
    ///
    /// ## Errors
    ///
    /// - `InvalidConfig`: `API_TIMEOUT_SECS` is not a positive integer
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_timeout = match get(ENV_API_TIMEOUT_SECS) {
            Some(raw) => Some(parse_timeout(&raw)?),
            None => None,
        };

        Ok(Self {
            api_url: get(ENV_API_URL).unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            api_token: get(ENV_API_TOKEN).map(Sensitive::new),
            api_timeout,
            snapshot_path: get(ENV_SNAPSHOT_PATH)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_SNAPSHOT_PATH)),
            db_path: get(ENV_DB_PATH)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_PATH)),
        })
    }

    /// Endpoint for the roster fetcher
    ///
    /// ## Errors
    ///
    /// - `InvalidConfig`: no bearer token configured
    pub fn endpoint(&self) -> Result<FetchEndpoint> {
        let token = self.api_token.clone().ok_or_else(|| {
            RosterError::new(RosterErrorKind::InvalidConfig)
                .with_op("config_endpoint")
                .with_message(format!("{} is not set", ENV_API_TOKEN))
        })?;

        Ok(FetchEndpoint {
            url: self.api_url.clone(),
            token,
            timeout: self.api_timeout,
        })
    }
}

fn parse_timeout(raw: &str) -> Result<Duration> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(RosterError::new(RosterErrorKind::InvalidConfig)
            .with_op("config_from_lookup")
            .with_message(format!(
                "{} must be a positive integer, got {:?}",
                ENV_API_TIMEOUT_SECS, raw
            ))),
    }
}
