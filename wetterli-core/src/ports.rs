//! Traits describing backend capabilities and the shared error taxonomy.

use std::fmt;

use async_trait::async_trait;
use chrono::ParseError as ChronoParseError;
use reqwest::Error as ReqwestError;

use crate::model::{Coordinates, Location, PendingForecast};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Upstream call a failure originated from.
pub enum Endpoint {
    /// Free-text location search.
    Geocoding,
    /// Hourly forecast series.
    HourlyForecast,
    /// Daily forecast series.
    DailyForecast,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Endpoint::Geocoding => "geocoding",
            Endpoint::HourlyForecast => "hourly forecast",
            Endpoint::DailyForecast => "daily forecast",
        };
        write!(formatter, "{label}")
    }
}

#[derive(thiserror::Error, Debug)]
/// Errors that can occur while resolving locations or fetching forecasts.
pub enum WeatherError {
    /// The upstream answered with a non-success status or could not be reached.
    #[error("Upstream {endpoint} unavailable: {reason}")]
    UpstreamUnavailable {
        /// Call that failed.
        endpoint: Endpoint,
        /// Status line or transport failure.
        reason: String,
    },
    /// The upstream payload did not have the expected shape.
    #[error("Malformed {endpoint} response: {reason}")]
    MalformedResponse {
        /// Call whose payload was rejected.
        endpoint: Endpoint,
        /// What did not decode.
        reason: String,
    },
    /// Resolution returned no candidates for the query.
    #[error("Location not found: {0}")]
    LocationNotFound(String),
    /// Latitude or longitude outside the valid range.
    #[error("Invalid coordinates: ({latitude}, {longitude})")]
    InvalidCoordinates {
        /// Rejected latitude.
        latitude: f64,
        /// Rejected longitude.
        longitude: f64,
    },
}

impl WeatherError {
    /// Classify a transport-level failure for the given endpoint.
    ///
    /// Decode failures become [`WeatherError::MalformedResponse`], everything
    /// else (status, connect, timeout) is [`WeatherError::UpstreamUnavailable`].
    #[must_use]
    pub fn from_reqwest(endpoint: Endpoint, err: ReqwestError) -> Self {
        if err.is_decode() {
            Self::MalformedResponse {
                endpoint,
                reason: err.to_string(),
            }
        } else {
            let reason = err
                .status()
                .map_or_else(|| err.to_string(), |status| format!("HTTP {status}"));
            Self::UpstreamUnavailable { endpoint, reason }
        }
    }

    /// Wrap a timestamp parse failure from the given endpoint.
    #[must_use]
    pub fn from_timestamp(endpoint: Endpoint, raw: &str, err: ChronoParseError) -> Self {
        Self::MalformedResponse {
            endpoint,
            reason: format!("bad timestamp {raw:?}: {err}"),
        }
    }

    /// Endpoint the error came from, if it came from an upstream call.
    #[must_use]
    pub fn endpoint(&self) -> Option<Endpoint> {
        match self {
            Self::UpstreamUnavailable { endpoint, .. } | Self::MalformedResponse { endpoint, .. } => {
                Some(*endpoint)
            }
            Self::LocationNotFound(_) | Self::InvalidCoordinates { .. } => None,
        }
    }
}

#[async_trait]
/// Trait for backends that turn free text into candidate locations.
pub trait LocationPort: Send + Sync {
    /// Resolve a free-text query, most relevant match first.
    ///
    /// An empty vector means nothing matched and is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`WeatherError::UpstreamUnavailable`] or
    /// [`WeatherError::MalformedResponse`] when the backend call fails.
    async fn resolve(&self, query: &str) -> Result<Vec<Location>, WeatherError>;
}

#[async_trait]
/// Trait for backends that serve hourly and daily forecast series.
pub trait ForecastPort: Send + Sync {
    /// Fetch the next hours of forecast for a point.
    ///
    /// # Errors
    ///
    /// Returns [`WeatherError::UpstreamUnavailable`] or
    /// [`WeatherError::MalformedResponse`] when the backend call fails.
    async fn hourly(&self, at: Coordinates) -> Result<PendingForecast, WeatherError>;

    /// Fetch the week of daily forecast for a point.
    ///
    /// # Errors
    ///
    /// Returns [`WeatherError::UpstreamUnavailable`] or
    /// [`WeatherError::MalformedResponse`] when the backend call fails.
    async fn daily(&self, at: Coordinates) -> Result<PendingForecast, WeatherError>;
}
