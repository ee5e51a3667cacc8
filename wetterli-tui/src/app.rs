use std::sync::Arc;

use wetterli_core::{
    model::{AggregateWeather, Location},
    service::WeatherAggregator,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Screen {
    LocationSearch,
    ForecastView,
}

pub(crate) struct App {
    pub service: Arc<WeatherAggregator>,

    pub screen: Screen,

    pub query_input: String,
    pub candidates: Vec<Location>,
    pub candidate_index: usize,

    pub weather: Option<AggregateWeather>,

    pub is_loading: bool,
    pub error_message: Option<String>,
}

impl App {
    pub(crate) fn new(service: Arc<WeatherAggregator>) -> Self {
        Self {
            service,
            screen: Screen::LocationSearch,
            query_input: String::new(),
            candidates: Vec::new(),
            candidate_index: 0,
            weather: None,
            is_loading: false,
            error_message: None,
        }
    }

    pub(crate) fn current_candidate(&self) -> Option<Location> {
        self.candidates.get(self.candidate_index).cloned()
    }

    pub(crate) fn show_candidates(&mut self, candidates: Vec<Location>) {
        self.candidates = candidates;
        self.candidate_index = 0;
    }

    /// Either a complete forecast is shown or none at all.
    pub(crate) fn show_weather(&mut self, result: Result<AggregateWeather, String>) {
        match result {
            Ok(weather) => {
                self.weather = Some(weather);
                self.error_message = None;
                self.screen = Screen::ForecastView;
            }
            Err(message) => {
                self.weather = None;
                self.error_message = Some(message);
                self.screen = Screen::LocationSearch;
            }
        }
    }
}
