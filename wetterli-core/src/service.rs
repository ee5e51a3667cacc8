//! High-level service facade combining location search and forecasts.

use tracing::{debug, info};

use crate::merge::merge;
use crate::model::{AggregateWeather, Location};
use crate::plugin::{BackendMeta, WeatherPlugin};
use crate::ports::WeatherError;

/// Public entry point for resolving places and assembling their forecasts.
#[derive(Debug, Clone)]
pub struct WeatherAggregator {
    plugin: WeatherPlugin,
}

impl WeatherAggregator {
    /// Create a new service bound to the provided backend.
    #[must_use]
    pub fn new(plugin: WeatherPlugin) -> Self {
        Self { plugin }
    }

    /// Metadata of the backend in use.
    #[must_use]
    pub fn backend(&self) -> &BackendMeta {
        &self.plugin.meta
    }

    /// Search for candidate locations, best match first.
    ///
    /// # Errors
    ///
    /// Returns a [`WeatherError`] if the backend call fails.
    pub async fn search_locations(&self, query: &str) -> Result<Vec<Location>, WeatherError> {
        self.plugin.location_port.resolve(query).await
    }

    /// Fetch hourly and daily forecasts for an already resolved location.
    ///
    /// Both fetches run concurrently; the first failure is returned.
    ///
    /// # Errors
    ///
    /// Returns a [`WeatherError`] if either forecast call fails.
    pub async fn weather_for(&self, location: Location) -> Result<AggregateWeather, WeatherError> {
        let at = location.coordinates;
        let forecasts = &self.plugin.forecast_port;

        let (hourly, daily) = tokio::try_join!(forecasts.hourly(at), forecasts.daily(at))?;

        debug!(
            hours = hourly.hourly.as_ref().map_or(0, |series| series.len()),
            days = daily.daily.as_ref().map_or(0, |series| series.len()),
            "forecasts fetched"
        );

        Ok(merge(location, hourly, daily))
    }

    /// Resolve `name` and assemble the forecast for its best match.
    ///
    /// # Errors
    ///
    /// Returns [`WeatherError::LocationNotFound`] when nothing matches `name`,
    /// or the first [`WeatherError`] raised by the backend.
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn weather_by_location(&self, name: &str) -> Result<AggregateWeather, WeatherError> {
        let location = self
            .search_locations(name)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| WeatherError::LocationNotFound(name.to_owned()))?;

        info!(
            location = %location.name,
            country = %location.country,
            latitude = location.latitude(),
            longitude = location.longitude(),
            "location resolved"
        );

        self.weather_for(location).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use chrono::{Duration, NaiveDate};

    use super::*;
    use crate::model::{Coordinates, DailySeries, ForecastPoint, HourlySeries, PendingForecast};
    use crate::ports::{Endpoint, ForecastPort, LocationPort};

    struct StubLocations(Vec<Location>);

    #[async_trait]
    impl LocationPort for StubLocations {
        async fn resolve(&self, _query: &str) -> Result<Vec<Location>, WeatherError> {
            Ok(self.0.clone())
        }
    }

    #[derive(Default)]
    struct StubForecasts {
        hourly_status: Option<u16>,
        daily_status: Option<u16>,
        calls: AtomicUsize,
    }

    fn unavailable(endpoint: Endpoint, status: u16) -> WeatherError {
        WeatherError::UpstreamUnavailable {
            endpoint,
            reason: format!("HTTP {status}"),
        }
    }

    fn point(at: Coordinates) -> ForecastPoint {
        ForecastPoint {
            coordinates: at,
            timezone: "Asia/Bangkok".to_owned(),
        }
    }

    #[async_trait]
    impl ForecastPort for StubForecasts {
        async fn hourly(&self, at: Coordinates) -> Result<PendingForecast, WeatherError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(status) = self.hourly_status {
                return Err(unavailable(Endpoint::HourlyForecast, status));
            }
            let start = NaiveDate::from_ymd_opt(2025, 3, 1)
                .and_then(|date| date.and_hms_opt(0, 0, 0))
                .expect("valid timestamp");
            let series = HourlySeries {
                time: (0..24).map(|hour| start + Duration::hours(hour)).collect(),
                temperature: vec![27.5; 24],
                humidity: vec![70.0; 24],
                precipitation_probability: vec![Some(20.0); 24],
                weather_code: vec![2; 24],
                wind_speed: vec![8.0; 24],
            };
            Ok(PendingForecast::from_hourly(point(at), series))
        }

        async fn daily(&self, at: Coordinates) -> Result<PendingForecast, WeatherError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(status) = self.daily_status {
                return Err(unavailable(Endpoint::DailyForecast, status));
            }
            let start = NaiveDate::from_ymd_opt(2025, 3, 1).expect("valid date");
            let series = DailySeries {
                time: (0..7).map(|day| start + Duration::days(day)).collect(),
                temperature_max: vec![31.0; 7],
                temperature_min: vec![Some(23.0); 7],
                weather_code: vec![61; 7],
                precipitation_probability_max: vec![Some(60.0); 7],
            };
            Ok(PendingForecast::from_daily(point(at), series))
        }
    }

    fn hanoi() -> Location {
        let coordinates = Coordinates::new(21.03, 105.85).expect("valid");
        Location::new("Hanoi", coordinates, "Vietnam", "Asia/Bangkok")
    }

    fn service(locations: Vec<Location>, forecasts: Arc<StubForecasts>) -> WeatherAggregator {
        WeatherAggregator::new(WeatherPlugin {
            meta: BackendMeta {
                id: "stub".to_owned(),
                name: "Stub".to_owned(),
            },
            location_port: Arc::new(StubLocations(locations)),
            forecast_port: forecasts,
        })
    }

    #[tokio::test]
    async fn hanoi_end_to_end() {
        let forecasts = Arc::new(StubForecasts::default());
        let service = service(vec![hanoi()], Arc::clone(&forecasts));

        let weather = service
            .weather_by_location("Hanoi")
            .await
            .expect("weather for Hanoi");

        assert_eq!(weather.location.name, "Hanoi");
        assert_eq!(weather.location.country, "Vietnam");
        assert_eq!(weather.hourly.location, weather.location);
        assert_eq!(weather.daily.location, weather.location);
        assert_eq!(weather.hourly.hourly.as_ref().map(|series| series.time.len()), Some(24));
        assert_eq!(weather.daily.daily.as_ref().map(|series| series.time.len()), Some(7));
        assert_eq!(forecasts.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn first_candidate_wins() {
        let other = Location::new(
            "Hanoi",
            Coordinates::new(42.0, -83.0).expect("valid"),
            "United States",
            "America/Detroit",
        );
        let service = service(vec![hanoi(), other], Arc::new(StubForecasts::default()));

        let weather = service.weather_by_location("Hanoi").await.expect("weather");

        assert_eq!(weather.location, hanoi());
    }

    #[tokio::test]
    async fn empty_resolution_is_location_not_found_without_fetching() {
        let forecasts = Arc::new(StubForecasts::default());
        let service = service(Vec::new(), Arc::clone(&forecasts));

        let result = service.weather_by_location("Nonexistent City Name Zzq").await;

        assert!(matches!(
            result,
            Err(WeatherError::LocationNotFound(ref name)) if name == "Nonexistent City Name Zzq"
        ));
        assert_eq!(forecasts.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn hourly_failure_fails_the_whole_call() {
        for daily_status in [None, Some(503)] {
            let forecasts = Arc::new(StubForecasts {
                hourly_status: Some(500),
                daily_status,
                ..StubForecasts::default()
            });
            let service = service(vec![hanoi()], forecasts);

            let result = service.weather_by_location("Hanoi").await;

            assert!(
                matches!(result, Err(WeatherError::UpstreamUnavailable { .. })),
                "daily status {daily_status:?} gave {result:?}"
            );
        }
    }

    #[tokio::test]
    async fn daily_failure_is_surfaced_unchanged() {
        let forecasts = Arc::new(StubForecasts {
            daily_status: Some(502),
            ..StubForecasts::default()
        });
        let service = service(vec![hanoi()], forecasts);

        let err = service
            .weather_for(hanoi())
            .await
            .expect_err("daily fetch fails");

        assert_eq!(err.endpoint(), Some(Endpoint::DailyForecast));
    }
}
