//! WMO weather interpretation codes as reported by the forecast backend.

/// Description returned for codes not in the table.
pub const UNKNOWN_WEATHER: &str = "Unknown";

/// Translate a weather code into a short English label.
///
/// Total over `i32`: any code outside the table yields [`UNKNOWN_WEATHER`].
#[must_use]
pub fn describe(code: i32) -> &'static str {
    match code {
        0 => "Clear sky",
        1 => "Mainly clear",
        2 => "Partly cloudy",
        3 => "Overcast",
        45 => "Foggy",
        48 => "Depositing rime fog",
        51 => "Light drizzle",
        53 => "Moderate drizzle",
        55 => "Dense drizzle",
        61 => "Slight rain",
        63 => "Moderate rain",
        65 => "Heavy rain",
        71 => "Slight snow fall",
        73 => "Moderate snow fall",
        75 => "Heavy snow fall",
        95 => "Thunderstorm",
        _ => UNKNOWN_WEATHER,
    }
}
