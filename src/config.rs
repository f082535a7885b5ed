//! Environment-driven configuration for the clients.

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use dotenvy::dotenv;

use crate::client::{ClientBuilder, DEFAULT_V4_ENDPOINT, DEFAULT_V5_ENDPOINT};
use crate::domain::{Credentials, PollOptions, ValidationError};
use crate::regions::{DEFAULT_REGIONS_FILE, RegionCodeCache};

pub const LOGIN_VAR: &str = "ACCOUNT_LOGIN";
pub const TOKEN_VAR: &str = "ACCOUNT_TOKEN";
pub const V4_ENDPOINT_VAR: &str = "YADIRECT_V4_ENDPOINT";
pub const V5_ENDPOINT_VAR: &str = "YADIRECT_V5_ENDPOINT";
pub const TIMEOUT_VAR: &str = "YADIRECT_TIMEOUT_SECS";
pub const REGIONS_FILE_VAR: &str = "YADIRECT_REGIONS_FILE";
pub const POLL_INTERVAL_VAR: &str = "YADIRECT_POLL_INTERVAL_SECS";
pub const POLL_TIMEOUT_VAR: &str = "YADIRECT_POLL_TIMEOUT_SECS";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),

    #[error("invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },

    #[error("invalid credentials in environment: {0}")]
    Credentials(#[from] ValidationError),
}

/// Client configuration resolved from the process environment (and `.env`).
#[derive(Debug, Clone)]
pub struct Config {
    credentials: Credentials,
    v4_endpoint: String,
    v5_endpoint: String,
    timeout: Option<Duration>,
    regions_file: PathBuf,
    poll: PollOptions,
}

impl Config {
    /// Load `.env` if present, then read the variables from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a config from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let login = lookup(LOGIN_VAR).ok_or(ConfigError::Missing(LOGIN_VAR))?;
        let token = lookup(TOKEN_VAR).ok_or(ConfigError::Missing(TOKEN_VAR))?;
        let credentials = Credentials::new(login, token)?;

        let defaults = PollOptions::default();
        let poll = PollOptions {
            interval: parse_secs(&lookup, POLL_INTERVAL_VAR)?.unwrap_or(defaults.interval),
            timeout: parse_secs(&lookup, POLL_TIMEOUT_VAR)?.unwrap_or(defaults.timeout),
        };

        Ok(Self {
            credentials,
            v4_endpoint: lookup(V4_ENDPOINT_VAR).unwrap_or_else(|| DEFAULT_V4_ENDPOINT.to_owned()),
            v5_endpoint: lookup(V5_ENDPOINT_VAR).unwrap_or_else(|| DEFAULT_V5_ENDPOINT.to_owned()),
            timeout: parse_secs(&lookup, TIMEOUT_VAR)?,
            regions_file: lookup(REGIONS_FILE_VAR)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_REGIONS_FILE)),
            poll,
        })
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn v4_endpoint(&self) -> &str {
        &self.v4_endpoint
    }

    pub fn v5_endpoint(&self) -> &str {
        &self.v5_endpoint
    }

    /// Whole-request HTTP timeout; `None` leaves reqwest's default.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Region dataset path used by [`Config::region_cache`].
    pub fn regions_file(&self) -> &Path {
        &self.regions_file
    }

    /// Interval and timeout for [`crate::ReportClient::wait_until_done`].
    pub fn poll_options(&self) -> PollOptions {
        self.poll
    }

    /// A [`ClientBuilder`] with the configured endpoints and timeout.
    pub fn client_builder(&self) -> ClientBuilder {
        let builder = ClientBuilder::new()
            .v4_endpoint(self.v4_endpoint.clone())
            .v5_endpoint(self.v5_endpoint.clone());
        match self.timeout {
            Some(timeout) => builder.timeout(timeout),
            None => builder,
        }
    }

    /// A fresh cache over the configured region file.
    pub fn region_cache(&self) -> RegionCodeCache {
        RegionCodeCache::from_file(self.regions_file.clone())
    }
}

fn parse_secs<F>(lookup: &F, name: &'static str) -> Result<Option<Duration>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .map(|value| {
            u64::from_str(value.trim())
                .map(Duration::from_secs)
                .map_err(|_| ConfigError::Invalid { name, value })
        })
        .transpose()
}
