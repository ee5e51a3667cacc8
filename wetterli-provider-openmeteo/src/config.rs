//! Endpoint configuration for the Open-Meteo backend.

use std::env;

use serde::{Deserialize, Serialize};

/// Default geocoding API root.
pub const DEFAULT_GEOCODING_URL: &str = "https://geocoding-api.open-meteo.com/v1";
/// Default forecast API root.
pub const DEFAULT_FORECAST_URL: &str = "https://api.open-meteo.com/v1";

const ENV_GEOCODING_URL: &str = "WETTERLI_GEOCODING_URL";
const ENV_FORECAST_URL: &str = "WETTERLI_FORECAST_URL";
const ENV_RESULT_COUNT: &str = "WETTERLI_RESULT_COUNT";
const ENV_LANGUAGE: &str = "WETTERLI_LANGUAGE";
const ENV_USER_AGENT: &str = "WETTERLI_USER_AGENT";

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
/// Errors raised while reading configuration.
pub enum ConfigError {
    /// A variable was set but could not be parsed.
    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue {
        /// Variable name.
        key: &'static str,
        /// Raw value found.
        value: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
/// Where and how to talk to Open-Meteo.
pub struct OpenMeteoConfig {
    /// Root of the geocoding API, without trailing `/search`.
    pub geocoding_url: String,
    /// Root of the forecast API, without trailing `/forecast`.
    pub forecast_url: String,
    /// Maximum number of location candidates requested.
    pub result_count: u8,
    /// Language for location names.
    pub language: String,
    /// User agent the HTTP client is built with.
    pub user_agent: String,
}

impl Default for OpenMeteoConfig {
    fn default() -> Self {
        Self {
            geocoding_url: DEFAULT_GEOCODING_URL.to_owned(),
            forecast_url: DEFAULT_FORECAST_URL.to_owned(),
            result_count: 5,
            language: "en".to_owned(),
            user_agent: concat!("wetterli/", env!("CARGO_PKG_VERSION")).to_owned(),
        }
    }
}

impl OpenMeteoConfig {
    /// Point both APIs at a single root, e.g. a mock server.
    #[must_use]
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            geocoding_url: base_url.to_owned(),
            forecast_url: base_url.to_owned(),
            ..Self::default()
        }
    }

    /// Defaults overridden by `WETTERLI_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if `WETTERLI_RESULT_COUNT` is not a
    /// number between 1 and 100.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup(ENV_GEOCODING_URL) {
            config.geocoding_url = url;
        }
        if let Some(url) = lookup(ENV_FORECAST_URL) {
            config.forecast_url = url;
        }
        if let Some(language) = lookup(ENV_LANGUAGE) {
            config.language = language;
        }
        if let Some(user_agent) = lookup(ENV_USER_AGENT).filter(|agent| !agent.trim().is_empty()) {
            config.user_agent = user_agent;
        }
        if let Some(raw) = lookup(ENV_RESULT_COUNT) {
            config.result_count = raw
                .trim()
                .parse::<u8>()
                .ok()
                .filter(|count| (1..=100).contains(count))
                .ok_or(ConfigError::InvalidValue {
                    key: ENV_RESULT_COUNT,
                    value: raw,
                })?;
        }

        Ok(config)
    }

    pub(crate) fn search_url(&self) -> String {
        format!("{}/search", self.geocoding_url.trim_end_matches('/'))
    }

    pub(crate) fn forecast_endpoint(&self) -> String {
        format!("{}/forecast", self.forecast_url.trim_end_matches('/'))
    }
}
