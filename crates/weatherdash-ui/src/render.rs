//! Plain-text panels for the terminal.

use std::io::Write;

use weatherdash_core::{DashboardState, Theme};
use weatherdash_weather::codes::UNKNOWN_ICON;
use weatherdash_weather::{format_speed, format_temperature, Location, ViewModel};

use crate::models::DashboardView;

const RESET: &str = "\u{1b}[0m";
const BOLD: &str = "\u{1b}[1m";
const RED: &str = "\u{1b}[31m";

/// Hourly entries shown on one row.
const HOURS_PER_ROW: usize = 6;

/// Accent color for headings.
fn accent(theme: Theme) -> &'static str {
    match theme {
        Theme::Light => "\u{1b}[34m",
        Theme::Dark => "\u{1b}[96m",
    }
}

/// Muted color for secondary text.
fn muted(theme: Theme) -> &'static str {
    match theme {
        Theme::Light => "\u{1b}[90m",
        Theme::Dark => "\u{1b}[37m",
    }
}

fn heading(theme: Theme, title: &str) -> String {
    format!("{}{}{}{}\n", BOLD, accent(theme), title, RESET)
}

/// The three weather panels: current conditions, next 24 hours, next days.
pub fn render_weather(view: &ViewModel, theme: Theme) -> String {
    let mut out = String::new();
    let current = &view.current;

    out.push_str(&heading(theme, &view.location.label()));
    out.push_str(&format!(
        "  {} {}  {}\n",
        current.weather_code.icon(),
        format_temperature(current.temperature_c),
        current.weather_code.description()
    ));
    out.push_str(&format!(
        "  {}Feels like {}  Humidity {}%  Wind {}  Precipitation {:.1} mm{}\n",
        muted(theme),
        format_temperature(current.apparent_temperature_c),
        current.humidity_pct.round() as i64,
        format_speed(current.wind_speed_kph),
        current.precipitation_mm,
        RESET
    ));
    if let Some(time) = current.time {
        out.push_str(&format!(
            "  {}Observed {}{}\n",
            muted(theme),
            time.format("%a %H:%M"),
            RESET
        ));
    }

    out.push('\n');
    out.push_str(&heading(theme, "Next 24 hours"));
    if view.hourly.is_empty() {
        out.push_str("  No hourly data\n");
    }
    for row in view.hourly.points.chunks(HOURS_PER_ROW) {
        let cells: Vec<String> = row
            .iter()
            .map(|p| {
                let rain = p
                    .precipitation_probability_pct
                    .map(|pct| format!("{}%", pct.round() as i64))
                    .unwrap_or_else(|| "-".to_string());
                let temperature = p
                    .temperature_c
                    .map(format_temperature)
                    .unwrap_or_else(|| "-".to_string());
                format!(
                    "{} {} {:>5} {:>4}",
                    p.time.format("%H:%M"),
                    p.weather_code.map_or(UNKNOWN_ICON, |code| code.icon()),
                    temperature,
                    rain
                )
            })
            .collect();
        out.push_str(&format!("  {}\n", cells.join("  ")));
    }

    out.push('\n');
    out.push_str(&heading(theme, "Forecast"));
    if view.daily.is_empty() {
        out.push_str("  No daily data\n");
    }
    for day in view.daily.iter() {
        out.push_str(&format!(
            "  {} {}  {:>5} / {:<5}  {}\n",
            day.date.format("%a %d"),
            day.weather_code.icon(),
            format_temperature(day.temperature_max_c),
            format_temperature(day.temperature_min_c),
            day.weather_code.description()
        ));
    }

    out
}

pub fn render_suggestions(suggestions: &[Location], theme: Theme) -> String {
    if suggestions.is_empty() {
        return format!("{}No cities found{}\n", muted(theme), RESET);
    }
    suggestions
        .iter()
        .enumerate()
        .map(|(i, loc)| format!("  {}. {}\n", i + 1, loc.label()))
        .collect()
}

pub fn render_error(message: &str) -> String {
    format!("{}{}! {}{}\n", BOLD, RED, message, RESET)
}

/// Writes panels to any `Write` sink, usually stdout.
pub struct TerminalView<W: Write> {
    out: W,
    theme: Theme,
}

impl<W: Write> TerminalView<W> {
    pub fn new(out: W, theme: Theme) -> Self {
        Self { out, theme }
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    pub fn print(&mut self, text: &str) {
        if let Err(e) = self
            .out
            .write_all(text.as_bytes())
            .and_then(|()| self.out.flush())
        {
            tracing::warn!("Failed to write to terminal: {}", e);
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> DashboardView for TerminalView<W> {
    fn show_state(&mut self, state: DashboardState) {
        let label = match state {
            DashboardState::Resolving => "Looking up location...",
            DashboardState::Fetching => "Fetching weather...",
            _ => return,
        };
        let line = format!("{}{}{}\n", muted(self.theme), label, RESET);
        self.print(&line);
    }

    fn show_weather(&mut self, view: &ViewModel) {
        let text = render_weather(view, self.theme);
        self.print(&text);
    }

    fn show_suggestions(&mut self, suggestions: &[Location]) {
        let text = render_suggestions(suggestions, self.theme);
        self.print(&text);
    }

    fn show_error(&mut self, message: &str) {
        self.print(&render_error(message));
    }

    fn clear_error(&mut self) {
        tracing::debug!("Error banner cleared");
    }
}
