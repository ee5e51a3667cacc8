use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{App, Screen};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Action {
    None,
    Quit,
    /// Run `service.search_locations`(...)
    SearchLocations,
    /// Run `service.weather_for`(...) for the highlighted candidate
    LoadForecastForCurrentCandidate,
}

pub(crate) fn handle_key_event(key: KeyEvent, app: &mut App) -> Action {
    use KeyCode::{Backspace, Char, Down, Enter, Esc, Left, Right, Tab, Up};

    // Global quit shortcuts
    if key.code == Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Action::Quit;
    }
    if key.code == Esc && app.screen == Screen::LocationSearch {
        return Action::Quit;
    }

    let mut action = Action::None;

    match app.screen {
        Screen::LocationSearch => match key.code {
            Up => {
                if app.candidate_index > 0 {
                    app.candidate_index -= 1;
                }
            }
            Down => {
                if app.candidate_index + 1 < app.candidates.len() {
                    app.candidate_index += 1;
                }
            }
            Char(character) => {
                if !key.modifiers.contains(KeyModifiers::CONTROL)
                    && !key.modifiers.contains(KeyModifiers::ALT)
                {
                    app.query_input.push(character);
                }
            }
            Backspace => {
                app.query_input.pop();
            }
            Enter => {
                action = Action::SearchLocations;
            }
            Right | Tab => {
                action = Action::LoadForecastForCurrentCandidate;
            }
            _ => {}
        },

        Screen::ForecastView => match key.code {
            Char('q') => {
                action = Action::Quit;
            }
            Left | Esc | Char('b') => {
                app.screen = Screen::LocationSearch;
            }
            _ => {}
        },
    }
    action
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use wetterli_core::service::WeatherAggregator;
    use wetterli_provider_openmeteo::OpenMeteoConfig;

    use super::*;

    fn app() -> App {
        let plugin = wetterli_provider_openmeteo::plugin(
            reqwest::Client::new(),
            OpenMeteoConfig::default(),
        );
        App::new(Arc::new(WeatherAggregator::new(plugin)))
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn typing_edits_the_query() {
        let mut app = app();
        for character in "Hanoi!".chars() {
            assert_eq!(handle_key_event(press(KeyCode::Char(character)), &mut app), Action::None);
        }
        handle_key_event(press(KeyCode::Backspace), &mut app);

        assert_eq!(app.query_input, "Hanoi");
        assert_eq!(handle_key_event(press(KeyCode::Enter), &mut app), Action::SearchLocations);
    }

    #[test]
    fn q_is_text_on_search_but_quits_the_forecast() {
        let mut app = app();
        assert_eq!(handle_key_event(press(KeyCode::Char('q')), &mut app), Action::None);
        assert_eq!(app.query_input, "q");

        app.screen = Screen::ForecastView;
        assert_eq!(handle_key_event(press(KeyCode::Char('q')), &mut app), Action::Quit);
    }

    #[test]
    fn back_from_forecast_returns_to_search() {
        let mut app = app();
        app.screen = Screen::ForecastView;

        assert_eq!(handle_key_event(press(KeyCode::Esc), &mut app), Action::None);
        assert_eq!(app.screen, Screen::LocationSearch);
        assert_eq!(handle_key_event(press(KeyCode::Esc), &mut app), Action::Quit);
    }

    #[test]
    fn ctrl_c_always_quits() {
        let mut app = app();
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(handle_key_event(key, &mut app), Action::Quit);
    }
}
