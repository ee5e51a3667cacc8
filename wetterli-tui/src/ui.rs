use chrono::{Local, NaiveDate};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Cell, List, ListItem, ListState, Paragraph, Row, Table, Wrap},
};
use wetterli_core::model::{AggregateWeather, DailySeries, HourlySeries, Location};

use crate::app::{App, Screen};

pub(crate) fn draw(frame: &mut Frame<'_>, app: &App) {
    let area = frame.area();

    // Outer layout: title, main content, status line
    let layout_chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(area);

    let chunks = layout_chunks.as_ref();
    let [header_area, content_area, status_area] = chunks else {
        return;
    };

    let header = Paragraph::new(format!(
        "wetterli – forecasts from {}",
        app.service.backend().name
    ))
    .block(Block::default().borders(Borders::ALL).title("Wetterli"));
    frame.render_widget(header, *header_area);

    match (app.screen, app.weather.as_ref()) {
        (Screen::ForecastView, Some(weather)) => draw_forecast_view(frame, weather, *content_area),
        (Screen::ForecastView, None) => {
            let text = if app.is_loading {
                "Loading forecast…"
            } else {
                "No forecast loaded."
            };
            let paragraph = Paragraph::new(text)
                .block(Block::default().borders(Borders::ALL).title("Forecast"));
            frame.render_widget(paragraph, *content_area);
        }
        (Screen::LocationSearch, _) => draw_location_search(frame, app, *content_area),
    }

    // Status bar
    let nav_hint = match app.screen {
        Screen::LocationSearch => {
            "Type to edit · Enter search · ↑/↓ pick · Tab/→ show forecast · Esc/Ctrl-C quit"
        }
        Screen::ForecastView => "Esc/←/b back to search · q/Ctrl-C quit",
    };

    let status_text = if app.is_loading {
        format!("Loading… · {nav_hint}")
    } else if let Some(msg) = &app.error_message {
        format!("{msg} · {nav_hint}")
    } else {
        nav_hint.to_owned()
    };

    let status_style = if app.error_message.is_some() {
        Style::default().fg(Color::Red)
    } else if app.is_loading {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };

    let status = Paragraph::new(status_text)
        .block(Block::default().borders(Borders::ALL).title("Status"))
        .style(status_style)
        .wrap(Wrap { trim: true });

    frame.render_widget(status, *status_area);
}

fn draw_location_search(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let layout_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // input
            Constraint::Min(0),    // candidates
        ])
        .split(area);

    let chunks = layout_chunks.as_ref();
    let [input_area, results_area] = chunks else {
        return;
    };

    let input = Paragraph::new(app.query_input.as_str())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Search for a place (Enter)"),
        )
        .wrap(Wrap { trim: true });

    frame.render_widget(input, *input_area);

    let items = if app.candidates.is_empty() {
        vec![ListItem::new("No places yet. Type a city name and press Enter.")]
    } else {
        app.candidates
            .iter()
            .map(|location| ListItem::new(location_label(location)))
            .collect()
    };

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Places (↑/↓, Tab/→ to show forecast)"),
        )
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );

    let mut state = ListState::default();
    if !app.candidates.is_empty() {
        state.select(Some(app.candidate_index));
    }
    frame.render_stateful_widget(list, *results_area, &mut state);
}

fn draw_forecast_view(frame: &mut Frame<'_>, weather: &AggregateWeather, area: Rect) {
    let layout_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(6), Constraint::Min(0)])
        .split(area);
    let [current_area, series_area] = layout_chunks.as_ref() else {
        return;
    };

    let series_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(*series_area);
    let [hourly_area, daily_area] = series_chunks.as_ref() else {
        return;
    };

    draw_current(frame, weather, *current_area);

    if let Some(hourly) = &weather.hourly.hourly {
        frame.render_widget(hourly_table(hourly), *hourly_area);
    }
    if let Some(daily) = &weather.daily.daily {
        frame.render_widget(daily_table(daily), *daily_area);
    }
}

fn draw_current(frame: &mut Frame<'_>, weather: &AggregateWeather, area: Rect) {
    let title = format!("{}, {}", weather.location.name, weather.location.country);

    let lines = match weather.current() {
        Some(now) => vec![
            Line::from(vec![
                Span::styled("Temperature ", Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(format!("{:.1}°C", now.temperature)),
                Span::raw("   "),
                Span::styled("Humidity ", Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(format!("{:.0}%", now.humidity)),
            ]),
            Line::from(vec![
                Span::styled("Rain chance ", Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(percent(now.precipitation_probability)),
                Span::raw("   "),
                Span::styled("Wind ", Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(format!("{:.1} km/h", now.wind_speed)),
            ]),
            Line::from(Span::styled(
                now.description(),
                Style::default().fg(code_color(now.weather_code)),
            )),
        ],
        None => vec![Line::from("No current conditions reported.")],
    };

    let card = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(title))
        .wrap(Wrap { trim: true });
    frame.render_widget(card, area);
}

fn hourly_table(series: &HourlySeries) -> Table<'static> {
    let rows = series.samples().map(|sample| {
        Row::new(vec![
            Cell::from(sample.time.format("%H:%M").to_string()),
            Cell::from(format!("{:.1}°C", sample.temperature)),
            Cell::from(format!("{:.0}%", sample.humidity)),
            Cell::from(percent(sample.precipitation_probability)),
            Cell::from(format!("{:.1} km/h", sample.wind_speed)),
            Cell::from(sample.description()),
        ])
        .style(Style::default().fg(code_color(sample.weather_code)))
    });

    let column_widths = [
        Constraint::Length(6),
        Constraint::Length(8),
        Constraint::Length(5),
        Constraint::Length(5),
        Constraint::Length(11),
        Constraint::Min(12),
    ];

    Table::new(rows, column_widths)
        .header(
            Row::new(vec!["Time", "Temp", "Hum", "Rain", "Wind", "Weather"])
                .style(Style::default().add_modifier(Modifier::BOLD)),
        )
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Next {} hours", series.len())),
        )
        .column_spacing(1)
}

fn daily_table(series: &DailySeries) -> Table<'static> {
    let today = Local::now().date_naive();

    let rows = series.samples().map(|sample| {
        let mut style = Style::default().fg(code_color(sample.weather_code));
        if sample.date == today {
            style = style.add_modifier(Modifier::BOLD);
        }

        Row::new(vec![
            Cell::from(day_label(sample.date, today)),
            Cell::from(high_low(sample.temperature_max, sample.temperature_min)),
            Cell::from(percent(sample.precipitation_probability_max)),
            Cell::from(sample.description()),
        ])
        .style(style)
    });

    let column_widths = [
        Constraint::Length(10),
        Constraint::Length(11),
        Constraint::Length(5),
        Constraint::Min(12),
    ];

    Table::new(rows, column_widths)
        .header(
            Row::new(vec!["Day", "High/Low", "Rain", "Weather"])
                .style(Style::default().add_modifier(Modifier::BOLD)),
        )
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Next {} days", series.len())),
        )
        .column_spacing(1)
}

fn location_label(location: &Location) -> String {
    format!(
        "{}, {} ({:.2}, {:.2}) · {}",
        location.name,
        location.country,
        location.latitude(),
        location.longitude(),
        location.timezone
    )
}

fn percent(value: Option<f64>) -> String {
    value.map_or_else(|| "–".to_owned(), |pct| format!("{pct:.0}%"))
}

fn high_low(max: f64, min: Option<f64>) -> String {
    match min {
        Some(min) => format!("{max:.0}° / {min:.0}°"),
        None => format!("{max:.0}° / –"),
    }
}

fn code_color(code: i32) -> Color {
    match code {
        0 | 1 => Color::Yellow,
        2 | 3 => Color::Gray,
        45 | 48 => Color::DarkGray,
        51..=67 | 80..=82 => Color::Blue,
        71..=77 | 85 | 86 => Color::White,
        95..=99 => Color::Magenta,
        _ => Color::Reset,
    }
}

fn day_label(date: NaiveDate, today: NaiveDate) -> String {
    match (date - today).num_days() {
        0 => "Today".to_owned(),
        1 => "Tomorrow".to_owned(),
        _ => date.format("%a %d.%m").to_string(),
    }
}
