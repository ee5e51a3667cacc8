//! Domain data structures for locations and forecast series.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::codes::describe;
use crate::ports::WeatherError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinates")]
/// A point on the globe with latitude in `[-90, 90]` and longitude in `[-180, 180]`.
pub struct Coordinates {
    latitude: f64,
    longitude: f64,
}

#[derive(Deserialize)]
struct RawCoordinates {
    latitude: f64,
    longitude: f64,
}

impl Coordinates {
    /// Validate and build a coordinate pair.
    ///
    /// # Errors
    ///
    /// Returns [`WeatherError::InvalidCoordinates`] for values out of range or not finite.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, WeatherError> {
        if (-90.0..=90.0).contains(&latitude) && (-180.0..=180.0).contains(&longitude) {
            Ok(Self {
                latitude,
                longitude,
            })
        } else {
            Err(WeatherError::InvalidCoordinates {
                latitude,
                longitude,
            })
        }
    }

    /// Latitude in degrees.
    #[must_use]
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Longitude in degrees.
    #[must_use]
    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl TryFrom<RawCoordinates> for Coordinates {
    type Error = WeatherError;

    fn try_from(raw: RawCoordinates) -> Result<Self, Self::Error> {
        Self::new(raw.latitude, raw.longitude)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// A resolved place, as returned by location search.
pub struct Location {
    /// Display name, e.g. "Hanoi".
    pub name: String,
    /// Where the place is.
    #[serde(flatten)]
    pub coordinates: Coordinates,
    /// Country display name.
    pub country: String,
    /// IANA timezone identifier.
    pub timezone: String,
}

impl Location {
    /// Build a location from its parts.
    #[must_use]
    pub fn new<N: Into<String>, C: Into<String>, T: Into<String>>(
        name: N,
        coordinates: Coordinates,
        country: C,
        timezone: T,
    ) -> Self {
        Self {
            name: name.into(),
            coordinates,
            country: country.into(),
            timezone: timezone.into(),
        }
    }

    /// Latitude in degrees.
    #[must_use]
    pub fn latitude(&self) -> f64 {
        self.coordinates.latitude()
    }

    /// Longitude in degrees.
    #[must_use]
    pub fn longitude(&self) -> f64 {
        self.coordinates.longitude()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Location stub attached to a freshly fetched forecast.
///
/// Carries only what the forecast endpoint knows; name and country are filled
/// in when the forecast is merged with its resolved [`Location`].
pub struct ForecastPoint {
    /// Requested point.
    #[serde(flatten)]
    pub coordinates: Coordinates,
    /// Timezone the forecast endpoint reported for the point.
    pub timezone: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
/// Positionally aligned hourly forecast columns.
pub struct HourlySeries {
    /// Local time of each sample.
    pub time: Vec<NaiveDateTime>,
    /// Air temperature at 2 m, °C.
    pub temperature: Vec<f64>,
    /// Relative humidity at 2 m, %.
    pub humidity: Vec<f64>,
    /// Chance of precipitation, %.
    pub precipitation_probability: Vec<Option<f64>>,
    /// WMO weather code.
    pub weather_code: Vec<i32>,
    /// Wind speed at 10 m, km/h.
    pub wind_speed: Vec<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
/// One row of an [`HourlySeries`].
pub struct HourlySample {
    /// Local time.
    pub time: NaiveDateTime,
    /// Air temperature, °C.
    pub temperature: f64,
    /// Relative humidity, %.
    pub humidity: f64,
    /// Chance of precipitation, %.
    pub precipitation_probability: Option<f64>,
    /// WMO weather code.
    pub weather_code: i32,
    /// Wind speed, km/h.
    pub wind_speed: f64,
}

impl HourlySample {
    /// Human-readable weather description.
    #[must_use]
    pub fn description(&self) -> &'static str {
        describe(self.weather_code)
    }
}

impl HourlySeries {
    /// Number of hourly samples kept from upstream.
    pub const MAX_SAMPLES: usize = 24;

    /// Number of samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.time.len()
    }

    /// Whether the series has no samples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Whether every column has as many entries as `time`.
    #[must_use]
    pub fn is_aligned(&self) -> bool {
        let len = self.time.len();
        self.temperature.len() == len
            && self.humidity.len() == len
            && self.precipitation_probability.len() == len
            && self.weather_code.len() == len
            && self.wind_speed.len() == len
    }

    /// Keep at most `len` leading samples in every column.
    pub fn truncate(&mut self, len: usize) {
        self.time.truncate(len);
        self.temperature.truncate(len);
        self.humidity.truncate(len);
        self.precipitation_probability.truncate(len);
        self.weather_code.truncate(len);
        self.wind_speed.truncate(len);
    }

    /// Row at `index`, if every column has it.
    #[must_use]
    pub fn sample(&self, index: usize) -> Option<HourlySample> {
        Some(HourlySample {
            time: *self.time.get(index)?,
            temperature: *self.temperature.get(index)?,
            humidity: *self.humidity.get(index)?,
            precipitation_probability: *self.precipitation_probability.get(index)?,
            weather_code: *self.weather_code.get(index)?,
            wind_speed: *self.wind_speed.get(index)?,
        })
    }

    /// Iterate over rows in time order.
    pub fn samples(&self) -> impl Iterator<Item = HourlySample> + '_ {
        (0..self.len()).map_while(|index| self.sample(index))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
/// Positionally aligned daily forecast columns.
pub struct DailySeries {
    /// Local date of each sample.
    pub time: Vec<NaiveDate>,
    /// Daily maximum temperature at 2 m, °C.
    pub temperature_max: Vec<f64>,
    /// Daily minimum temperature at 2 m, °C. Empty when upstream did not report it.
    #[serde(default)]
    pub temperature_min: Vec<Option<f64>>,
    /// Dominant WMO weather code of the day.
    pub weather_code: Vec<i32>,
    /// Highest hourly chance of precipitation, %.
    pub precipitation_probability_max: Vec<Option<f64>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
/// One row of a [`DailySeries`].
pub struct DailySample {
    /// Local date.
    pub date: NaiveDate,
    /// Maximum temperature, °C.
    pub temperature_max: f64,
    /// Minimum temperature, °C, if reported.
    pub temperature_min: Option<f64>,
    /// WMO weather code.
    pub weather_code: i32,
    /// Highest chance of precipitation, %.
    pub precipitation_probability_max: Option<f64>,
}

impl DailySample {
    /// Human-readable weather description.
    #[must_use]
    pub fn description(&self) -> &'static str {
        describe(self.weather_code)
    }
}

impl DailySeries {
    /// Number of days.
    #[must_use]
    pub fn len(&self) -> usize {
        self.time.len()
    }

    /// Whether the series has no days.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Whether every column has as many entries as `time`.
    ///
    /// An empty `temperature_min` column counts as not reported.
    #[must_use]
    pub fn is_aligned(&self) -> bool {
        let len = self.time.len();
        self.temperature_max.len() == len
            && (self.temperature_min.is_empty() || self.temperature_min.len() == len)
            && self.weather_code.len() == len
            && self.precipitation_probability_max.len() == len
    }

    /// Row at `index`, if every column has it.
    #[must_use]
    pub fn sample(&self, index: usize) -> Option<DailySample> {
        Some(DailySample {
            date: *self.time.get(index)?,
            temperature_max: *self.temperature_max.get(index)?,
            temperature_min: self.temperature_min.get(index).copied().flatten(),
            weather_code: *self.weather_code.get(index)?,
            precipitation_probability_max: *self.precipitation_probability_max.get(index)?,
        })
    }

    /// Iterate over rows in date order.
    pub fn samples(&self) -> impl Iterator<Item = DailySample> + '_ {
        (0..self.len()).map_while(|index| self.sample(index))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// A fetched forecast together with the place it belongs to.
///
/// `L` is [`ForecastPoint`] straight out of a backend and [`Location`] once merged.
pub struct ForecastResult<L = Location> {
    /// Place the series were fetched for.
    pub location: L,
    /// Hourly series, present on hourly fetches.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hourly: Option<HourlySeries>,
    /// Daily series, present on daily fetches.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub daily: Option<DailySeries>,
}

/// Forecast as returned by a backend, before its location is resolved.
pub type PendingForecast = ForecastResult<ForecastPoint>;

impl PendingForecast {
    /// Wrap an hourly series fetched for `point`.
    #[must_use]
    pub fn from_hourly(point: ForecastPoint, series: HourlySeries) -> Self {
        Self {
            location: point,
            hourly: Some(series),
            daily: None,
        }
    }

    /// Wrap a daily series fetched for `point`.
    #[must_use]
    pub fn from_daily(point: ForecastPoint, series: DailySeries) -> Self {
        Self {
            location: point,
            hourly: None,
            daily: Some(series),
        }
    }
}

impl<L> ForecastResult<L> {
    /// Replace the attached location, keeping the series.
    #[must_use]
    pub fn with_location<M>(self, location: M) -> ForecastResult<M> {
        ForecastResult {
            location,
            hourly: self.hourly,
            daily: self.daily,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Everything the presentation layer needs for one place.
pub struct AggregateWeather {
    /// The resolved place.
    pub location: Location,
    /// Next hours, carrying the same location.
    pub hourly: ForecastResult,
    /// Next days, carrying the same location.
    pub daily: ForecastResult,
}

impl AggregateWeather {
    /// Conditions at the first hourly sample.
    #[must_use]
    pub fn current(&self) -> Option<HourlySample> {
        self.hourly.hourly.as_ref()?.sample(0)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn hour(offset: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 1)
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .expect("valid timestamp")
            + Duration::hours(i64::from(offset))
    }

    fn hourly(len: u32) -> HourlySeries {
        HourlySeries {
            time: (0..len).map(hour).collect(),
            temperature: (0..len).map(f64::from).collect(),
            humidity: vec![80.0; len as usize],
            precipitation_probability: vec![Some(10.0); len as usize],
            weather_code: vec![61; len as usize],
            wind_speed: vec![5.5; len as usize],
        }
    }

    #[test]
    fn coordinates_reject_out_of_range_values() {
        assert!(Coordinates::new(21.03, 105.85).is_ok());
        assert!(Coordinates::new(-90.0, 180.0).is_ok());
        assert!(matches!(
            Coordinates::new(90.5, 0.0),
            Err(WeatherError::InvalidCoordinates { .. })
        ));
        assert!(Coordinates::new(0.0, -180.1).is_err());
        assert!(Coordinates::new(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn location_deserializes_flat_and_validates() {
        let location: Location = serde_json::from_value(serde_json::json!({
            "name": "Hanoi",
            "latitude": 21.03,
            "longitude": 105.85,
            "country": "Vietnam",
            "timezone": "Asia/Bangkok",
        }))
        .expect("valid location");
        assert_eq!(location.name, "Hanoi");
        assert_eq!(location.coordinates, Coordinates::new(21.03, 105.85).expect("valid"));

        let bad = serde_json::from_value::<Location>(serde_json::json!({
            "name": "Nowhere",
            "latitude": 123.0,
            "longitude": 0.0,
            "country": "",
            "timezone": "",
        }));
        assert!(bad.is_err(), "latitude 123 must be rejected");
    }

    #[test]
    fn hourly_truncate_keeps_columns_aligned() {
        let mut series = hourly(48);
        assert!(series.is_aligned());

        series.truncate(HourlySeries::MAX_SAMPLES);

        assert_eq!(series.len(), 24);
        assert!(series.is_aligned());
        assert_eq!(series.time.last(), Some(&hour(23)));
    }

    #[test]
    fn misaligned_series_are_detected() {
        let mut series = hourly(3);
        series.wind_speed.pop();
        assert!(!series.is_aligned());
        assert!(series.sample(2).is_none());
        assert_eq!(series.samples().count(), 2);
    }

    #[test]
    fn daily_minimum_is_optional() {
        let start = NaiveDate::from_ymd_opt(2025, 3, 1).expect("valid date");
        let mut series = DailySeries {
            time: vec![start, start + Duration::days(1)],
            temperature_max: vec![30.0, 31.0],
            temperature_min: Vec::new(),
            weather_code: vec![3, 61],
            precipitation_probability_max: vec![Some(20.0), None],
        };
        assert!(series.is_aligned());
        assert_eq!(series.samples().count(), 2);
        assert_eq!(series.sample(1).and_then(|day| day.temperature_min), None);

        series.temperature_min = vec![Some(21.5)];
        assert!(!series.is_aligned());

        series.temperature_min = vec![Some(21.5), None];
        assert!(series.is_aligned());
        assert_eq!(series.sample(0).and_then(|day| day.temperature_min), Some(21.5));
    }

    #[test]
    fn current_conditions_come_from_first_hour() {
        let coordinates = Coordinates::new(21.03, 105.85).expect("valid");
        let location = Location::new("Hanoi", coordinates, "Vietnam", "Asia/Bangkok");
        let weather = AggregateWeather {
            location: location.clone(),
            hourly: ForecastResult {
                location: location.clone(),
                hourly: Some(hourly(24)),
                daily: None,
            },
            daily: ForecastResult {
                location,
                hourly: None,
                daily: Some(DailySeries::default()),
            },
        };

        let current = weather.current().expect("first sample");
        assert_eq!(current.time, hour(0));
        assert_eq!(current.description(), "Slight rain");
    }

    #[test]
    fn pending_forecast_serializes_without_absent_series() {
        let point = ForecastPoint {
            coordinates: Coordinates::new(52.52, 13.41).expect("valid"),
            timezone: "Europe/Berlin".to_owned(),
        };
        let pending = PendingForecast::from_daily(point, DailySeries::default());

        let json = serde_json::to_value(&pending).expect("serializes");
        assert!(json.get("hourly").is_none());
        assert!(json.get("daily").is_some());
        assert_eq!(
            json.pointer("/location/timezone").and_then(serde_json::Value::as_str),
            Some("Europe/Berlin")
        );
    }
}
