//! Bundle of ports implementing one weather backend.

use std::fmt;
use std::sync::Arc;

use crate::ports::{ForecastPort, LocationPort};

#[derive(Debug, Clone, PartialEq, Eq)]
/// Metadata describing a backend and its human-friendly name.
pub struct BackendMeta {
    /// Unique identifier, e.g. `open-meteo`.
    pub id: String,
    /// Display name, e.g. `Open-Meteo`.
    pub name: String,
}

/// Collection of ports implementing a single backend.
#[derive(Clone)]
pub struct WeatherPlugin {
    /// Static metadata describing the backend.
    pub meta: BackendMeta,
    /// Implementation for resolving free-text locations.
    pub location_port: Arc<dyn LocationPort>,
    /// Implementation for fetching forecast series.
    pub forecast_port: Arc<dyn ForecastPort>,
}

impl fmt::Debug for WeatherPlugin {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("WeatherPlugin")
            .field("meta", &self.meta)
            .finish_non_exhaustive()
    }
}
