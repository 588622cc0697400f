use std::{env, time::Duration};
use tracing::warn;

pub const DEFAULT_API_BASE_URL: &str =
    "https://webhooks.mongodb-stitch.com/api/client/v2.0/app/covid-19-qppza/service/REST-API/incoming_webhook";
pub const DEFAULT_COUNTRY: &str = "Sri Lanka";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_SESSION_TTL_SECS: u64 = 30 * 60;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub port: u16,
    pub api_base_url: String,
    pub request_timeout: Duration,
    pub default_country: String,
    /// Sessions untouched for this long are dropped.
    pub session_ttl: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            default_country: DEFAULT_COUNTRY.to_string(),
            session_ttl: Duration::from_secs(DEFAULT_SESSION_TTL_SECS),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from any key lookup; unset or unusable values keep
    /// their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(value) = lookup("PORT") {
            match value.parse::<u16>() {
                Ok(port) => config.port = port,
                Err(err) => warn!("ignoring PORT={value}: {err}"),
            }
        }

        if let Some(value) = lookup("COVID_API_BASE_URL") {
            let value = value.trim();
            if value.is_empty() {
                warn!("ignoring empty COVID_API_BASE_URL");
            } else {
                config.api_base_url = value.to_string();
            }
        }

        if let Some(value) = lookup("COVID_API_TIMEOUT_SECS") {
            match value.parse::<u64>() {
                Ok(secs) if secs > 0 => config.request_timeout = Duration::from_secs(secs),
                Ok(_) => warn!("ignoring COVID_API_TIMEOUT_SECS=0, requests need a finite timeout"),
                Err(err) => warn!("ignoring COVID_API_TIMEOUT_SECS={value}: {err}"),
            }
        }

        if let Some(value) = lookup("COVID_SESSION_TTL_SECS") {
            match value.parse::<u64>() {
                Ok(secs) if secs > 0 => config.session_ttl = Duration::from_secs(secs),
                Ok(_) => warn!("ignoring COVID_SESSION_TTL_SECS=0"),
                Err(err) => warn!("ignoring COVID_SESSION_TTL_SECS={value}: {err}"),
            }
        }

        if let Some(value) = lookup("COVID_DEFAULT_COUNTRY") {
            let value = value.trim();
            if !value.is_empty() {
                config.default_country = value.to_string();
            }
        }

        config
    }
}
