//! Backend implementation for the Open-Meteo geocoding and forecast APIs.

/// Endpoint configuration.
pub mod config;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use wetterli_core::{
    model::{
        Coordinates, DailySeries, ForecastPoint, HourlySeries, Location, PendingForecast,
    },
    plugin::{BackendMeta, WeatherPlugin},
    ports::{Endpoint, ForecastPort, LocationPort, WeatherError},
};

pub use config::{ConfigError, OpenMeteoConfig};

const HOURLY_FIELDS: &str =
    "temperature_2m,relative_humidity_2m,precipitation_probability,weather_code,wind_speed_10m";
const DAILY_FIELDS: &str =
    "weather_code,temperature_2m_max,temperature_2m_min,precipitation_probability_max";
const HOUR_FORMAT: &str = "%Y-%m-%dT%H:%M";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Response from /v1/search. `results` is omitted entirely when nothing matches.
#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchEntry>,
}

/// Single candidate from /v1/search
#[derive(Debug, Deserialize)]
struct SearchEntry {
    name: String,
    latitude: f64,
    longitude: f64,

    #[serde(default)]
    country: String,
    #[serde(default)]
    timezone: String,
    // id, elevation, admin1..4, population etc. are ignored
}

/// Response from /v1/forecast?hourly=...
#[derive(Debug, Deserialize)]
struct HourlyResponse {
    hourly: HourlyColumns,
    timezone: String,
}

#[derive(Debug, Deserialize)]
struct HourlyColumns {
    time: Vec<String>,
    temperature_2m: Vec<f64>,
    relative_humidity_2m: Vec<f64>,
    precipitation_probability: Vec<Option<f64>>,
    weather_code: Vec<i32>,
    wind_speed_10m: Vec<f64>,
}

/// Response from /v1/forecast?daily=...
#[derive(Debug, Deserialize)]
struct DailyResponse {
    daily: DailyColumns,
    timezone: String,
}

#[derive(Debug, Deserialize)]
struct DailyColumns {
    time: Vec<String>,
    temperature_2m_max: Vec<f64>,
    // Requested, but not every response carries it.
    #[serde(default)]
    temperature_2m_min: Vec<Option<f64>>,
    weather_code: Vec<i32>,
    precipitation_probability_max: Vec<Option<f64>>,
}

/// Location search backed by the Open-Meteo geocoding API.
pub struct OpenMeteoLocationPort {
    client: Client,
    config: Arc<OpenMeteoConfig>,
}

impl OpenMeteoLocationPort {
    /// Create a new location port bound to the given HTTP client.
    #[must_use]
    pub fn new(client: Client, config: Arc<OpenMeteoConfig>) -> Self {
        Self { client, config }
    }
}

#[async_trait]
impl LocationPort for OpenMeteoLocationPort {
    async fn resolve(&self, query: &str) -> Result<Vec<Location>, WeatherError> {
        let count = self.config.result_count.to_string();
        let req = self.client.get(self.config.search_url()).query(&[
            ("name", query),
            ("count", count.as_str()),
            ("language", self.config.language.as_str()),
            ("format", "json"),
        ]);

        let resp = fetch_json::<SearchResponse>(req, Endpoint::Geocoding).await?;

        let locations = resp
            .results
            .into_iter()
            .map(|entry| {
                let coordinates = Coordinates::new(entry.latitude, entry.longitude).map_err(
                    |err| WeatherError::MalformedResponse {
                        endpoint: Endpoint::Geocoding,
                        reason: format!("{}: {err}", entry.name),
                    },
                )?;
                Ok(Location::new(
                    entry.name,
                    coordinates,
                    entry.country,
                    entry.timezone,
                ))
            })
            .collect::<Result<Vec<_>, WeatherError>>()?;

        debug!(query, candidates = locations.len(), "geocoding finished");
        Ok(locations)
    }
}

/// Forecast series backed by the Open-Meteo forecast API.
pub struct OpenMeteoForecastPort {
    client: Client,
    config: Arc<OpenMeteoConfig>,
}

impl OpenMeteoForecastPort {
    /// Create a new forecast port bound to the given HTTP client.
    #[must_use]
    pub fn new(client: Client, config: Arc<OpenMeteoConfig>) -> Self {
        Self { client, config }
    }

    fn request(&self, at: Coordinates, mode: &str, fields: &str) -> RequestBuilder {
        self.client.get(self.config.forecast_endpoint()).query(&[
            ("latitude", at.latitude().to_string().as_str()),
            ("longitude", at.longitude().to_string().as_str()),
            (mode, fields),
            ("timezone", "auto"),
        ])
    }
}

#[async_trait]
impl ForecastPort for OpenMeteoForecastPort {
    async fn hourly(&self, at: Coordinates) -> Result<PendingForecast, WeatherError> {
        const ENDPOINT: Endpoint = Endpoint::HourlyForecast;

        let req = self.request(at, "hourly", HOURLY_FIELDS);
        let resp = fetch_json::<HourlyResponse>(req, ENDPOINT).await?;
        let columns = resp.hourly;

        let mut series = HourlySeries {
            time: parse_all(&columns.time, ENDPOINT, |raw| {
                NaiveDateTime::parse_from_str(raw, HOUR_FORMAT)
            })?,
            temperature: columns.temperature_2m,
            humidity: columns.relative_humidity_2m,
            precipitation_probability: columns.precipitation_probability,
            weather_code: columns.weather_code,
            wind_speed: columns.wind_speed_10m,
        };
        if !series.is_aligned() {
            return Err(misaligned(ENDPOINT));
        }

        let upstream_len = series.len();
        series.truncate(HourlySeries::MAX_SAMPLES);
        debug!(upstream_len, kept = series.len(), "hourly forecast decoded");

        let point = ForecastPoint {
            coordinates: at,
            timezone: resp.timezone,
        };
        Ok(PendingForecast::from_hourly(point, series))
    }

    async fn daily(&self, at: Coordinates) -> Result<PendingForecast, WeatherError> {
        const ENDPOINT: Endpoint = Endpoint::DailyForecast;

        let req = self.request(at, "daily", DAILY_FIELDS);
        let resp = fetch_json::<DailyResponse>(req, ENDPOINT).await?;
        let columns = resp.daily;

        let series = DailySeries {
            time: parse_all(&columns.time, ENDPOINT, |raw| {
                NaiveDate::parse_from_str(raw, DATE_FORMAT)
            })?,
            temperature_max: columns.temperature_2m_max,
            temperature_min: columns.temperature_2m_min,
            weather_code: columns.weather_code,
            precipitation_probability_max: columns.precipitation_probability_max,
        };
        if !series.is_aligned() {
            return Err(misaligned(ENDPOINT));
        }
        debug!(days = series.len(), "daily forecast decoded");

        let point = ForecastPoint {
            coordinates: at,
            timezone: resp.timezone,
        };
        Ok(PendingForecast::from_daily(point, series))
    }
}

/// Build the plugin bundle for the Open-Meteo backend.
#[must_use]
pub fn plugin(client: Client, config: OpenMeteoConfig) -> WeatherPlugin {
    let config = Arc::new(config);
    let location_port = Arc::new(OpenMeteoLocationPort::new(
        client.clone(),
        Arc::clone(&config),
    ));
    let forecast_port = Arc::new(OpenMeteoForecastPort::new(client, config));

    WeatherPlugin {
        meta: backend_meta(),
        location_port,
        forecast_port,
    }
}

fn backend_meta() -> BackendMeta {
    BackendMeta {
        id: String::from("open-meteo"),
        name: String::from("Open-Meteo"),
    }
}

fn misaligned(endpoint: Endpoint) -> WeatherError {
    WeatherError::MalformedResponse {
        endpoint,
        reason: "series have different lengths".to_owned(),
    }
}

fn parse_all<T, F>(raw: &[String], endpoint: Endpoint, parse: F) -> Result<Vec<T>, WeatherError>
where
    F: Fn(&str) -> Result<T, chrono::ParseError>,
{
    raw.iter()
        .map(|stamp| parse(stamp).map_err(|err| WeatherError::from_timestamp(endpoint, stamp, err)))
        .collect()
}

// Small helper to fetch and decode JSON with status handling.
async fn fetch_json<T: DeserializeOwned>(
    req: RequestBuilder,
    endpoint: Endpoint,
) -> Result<T, WeatherError> {
    let classify = |err: reqwest::Error| WeatherError::from_reqwest(endpoint, err);

    let resp = req.send().await.map_err(classify)?;
    if !resp.status().is_success() {
        warn!(%endpoint, status = %resp.status(), "upstream returned an error status");
    }
    resp.error_for_status()
        .map_err(classify)?
        .json()
        .await
        .map_err(classify)
}
