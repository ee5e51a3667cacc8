//! Terminal UI for wetterli that shows current, hourly, and daily forecasts for a place.

mod app;
mod input;
mod ui;

use std::{env, fs::File, io, sync::Arc, sync::Mutex, time::Duration as StdDuration};

use anyhow::{Context, Result};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event as CEvent},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use reqwest::Client;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use wetterli_core::service::WeatherAggregator;
use wetterli_provider_openmeteo::{self as openmeteo, OpenMeteoConfig};

use crate::app::{App, Screen};
use crate::input::Action;

const ENV_LOG_FILE: &str = "WETTERLI_LOG";
const ENV_DEFAULT_LOCATION: &str = "WETTERLI_DEFAULT_LOCATION";
const FALLBACK_LOCATION: &str = "Hanoi";

#[tokio::main]
async fn main() -> Result<()> {
    init_logging()?;

    // HTTP + service setup
    let config = OpenMeteoConfig::from_env()?;
    let client = Client::builder().user_agent(&config.user_agent).build()?;
    let service = Arc::new(WeatherAggregator::new(openmeteo::plugin(client, config)));

    let start_location = env::args()
        .nth(1)
        .or_else(|| env::var(ENV_DEFAULT_LOCATION).ok())
        .unwrap_or_else(|| FALLBACK_LOCATION.to_owned());

    // App state
    let mut app = App::new(service);
    app.query_input.clone_from(&start_location);
    app.screen = Screen::ForecastView;
    app.is_loading = true;

    // Terminal init
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run event loop
    let res = run(&mut terminal, app, &start_location).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    res
}

/// Log to the file named by `WETTERLI_LOG`; stay silent otherwise so the
/// terminal UI is not overwritten.
fn init_logging() -> Result<()> {
    let Ok(path) = env::var(ENV_LOG_FILE) else {
        return Ok(());
    };
    let file = File::create(&path).with_context(|| format!("Failed to create log file {path}"))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

async fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    mut app: App,
    start_location: &str,
) -> Result<()> {
    // Initial forecast for the default place
    terminal.draw(|frame| ui::draw(frame, &app))?;
    let res = app.service.weather_by_location(start_location).await;
    app.is_loading = false;
    if let Err(err) = &res {
        warn!(location = start_location, error = %err, "initial forecast failed");
    }
    app.show_weather(res.map_err(|err| format!("Failed to load forecast: {err}")));

    loop {
        // Draw current UI
        terminal.draw(|frame| ui::draw(frame, &app))?;

        // Poll for input (non-blocking, small timeout to keep CPU low)
        if event::poll(StdDuration::from_millis(100))?
            && let CEvent::Key(key) = event::read()?
        {
            let action = input::handle_key_event(key, &mut app);

            match action {
                Action::Quit => break,
                Action::None => {}
                Action::SearchLocations => {
                    let query = app.query_input.trim().to_owned();
                    if query.is_empty() {
                        app.error_message = Some("Type a place name, then press Enter".into());
                        continue;
                    }

                    app.is_loading = true;
                    app.error_message = None;
                    terminal.draw(|frame| ui::draw(frame, &app))?;

                    let res = app.service.search_locations(&query).await;

                    app.is_loading = false;
                    match res {
                        Ok(candidates) if candidates.is_empty() => {
                            app.show_candidates(candidates);
                            app.error_message = Some(format!("No places found for {query:?}"));
                        }
                        Ok(candidates) => {
                            info!(query = %query, candidates = candidates.len(), "places found");
                            app.show_candidates(candidates);
                        }
                        Err(err) => {
                            app.error_message = Some(format!("Search failed: {err}"));
                        }
                    }
                }
                Action::LoadForecastForCurrentCandidate => {
                    let Some(location) = app.current_candidate() else {
                        app.error_message =
                            Some("No place selected (search and pick one first)".into());
                        continue;
                    };

                    app.is_loading = true;
                    app.error_message = None;
                    terminal.draw(|frame| ui::draw(frame, &app))?;

                    let res = app.service.weather_for(location).await;

                    app.is_loading = false;
                    app.show_weather(res.map_err(|err| format!("Failed to load forecast: {err}")));
                }
            }
        }
    }

    Ok(())
}
