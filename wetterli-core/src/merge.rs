//! Attach a resolved location to freshly fetched forecasts.

use crate::model::{AggregateWeather, Location, PendingForecast};

/// Combine a resolved location with its hourly and daily forecasts.
///
/// The coordinate-only [`ForecastPoint`](crate::model::ForecastPoint) on each
/// forecast is replaced by `location`, so both nested results and the
/// aggregate carry the same place.
#[must_use]
pub fn merge(location: Location, hourly: PendingForecast, daily: PendingForecast) -> AggregateWeather {
    AggregateWeather {
        hourly: hourly.with_location(location.clone()),
        daily: daily.with_location(location.clone()),
        location,
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::model::{Coordinates, DailySeries, ForecastPoint, HourlySeries};

    fn hanoi() -> Location {
        let coordinates = Coordinates::new(21.03, 105.85).expect("valid");
        Location::new("Hanoi", coordinates, "Vietnam", "Asia/Bangkok")
    }

    fn point() -> ForecastPoint {
        ForecastPoint {
            coordinates: Coordinates::new(21.03, 105.85).expect("valid"),
            timezone: "Asia/Bangkok".to_owned(),
        }
    }

    fn daily_series() -> DailySeries {
        DailySeries {
            time: vec![NaiveDate::from_ymd_opt(2025, 3, 1).expect("valid date")],
            temperature_max: vec![30.1],
            temperature_min: vec![Some(22.4)],
            weather_code: vec![3],
            precipitation_probability_max: vec![Some(40.0)],
        }
    }

    #[test]
    fn every_part_carries_the_resolved_location() {
        let hourly = PendingForecast::from_hourly(point(), HourlySeries::default());
        let daily = PendingForecast::from_daily(point(), daily_series());

        let merged = merge(hanoi(), hourly, daily);

        assert_eq!(merged.location, hanoi());
        assert_eq!(merged.hourly.location, merged.location);
        assert_eq!(merged.daily.location, merged.location);
        assert!(merged.hourly.daily.is_none());
        assert_eq!(merged.daily.daily, Some(daily_series()));
    }

    #[test]
    fn merging_same_inputs_twice_is_identical() {
        let hourly = PendingForecast::from_hourly(point(), HourlySeries::default());
        let daily = PendingForecast::from_daily(point(), daily_series());

        let first = merge(hanoi(), hourly.clone(), daily.clone());
        let second = merge(hanoi(), hourly, daily);

        assert_eq!(first, second);
    }
}
