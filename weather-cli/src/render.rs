//! Text projection of the view state. Reads it, never changes it.

use std::fmt::Write;

use weather_query_core::{ErrorKind, ViewState, WeatherSnapshot};

pub const PLACEHOLDER: &str = "Ask about the weather in any city...";
pub const THINKING: &str = "Thinking...";

const MISSING: &str = "-";

pub fn render(state: &ViewState) -> String {
    match state {
        ViewState::Idle { input_text } if input_text.is_empty() => PLACEHOLDER.to_string(),
        ViewState::Idle { input_text } => format!("> {input_text}"),
        ViewState::Loading => THINKING.to_string(),
        ViewState::Result { snapshot } => render_snapshot(snapshot),
        ViewState::Error {
            kind: ErrorKind::Rejected,
            message,
        } => format!("Note: {message}"),
        ViewState::Error {
            kind: ErrorKind::TransportFailure,
            message,
        } => format!("Error: {message}"),
    }
}

fn render_snapshot(snapshot: &WeatherSnapshot) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", snapshot.location);
    let _ = writeln!(out, "  {}", snapshot.summary);
    let _ = writeln!(out, "  Temperature: {}", metric(&snapshot.temperature));
    let _ = writeln!(out, "  Rainfall:    {}", metric(&snapshot.rainfall));
    let _ = writeln!(out, "  Humidity:    {}", metric(&snapshot.humidity));

    match snapshot.aqi_tier() {
        Some(tier) => {
            let _ = write!(
                out,
                "  AQI:         {} ({}, {})",
                metric(&snapshot.aqi),
                tier,
                tier.color()
            );
        }
        None => {
            let _ = write!(out, "  AQI:         {}", metric(&snapshot.aqi));
        }
    }

    out
}

fn metric(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or(MISSING)
}
