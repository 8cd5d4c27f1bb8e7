//! Turns one raw backend reply into exactly one [`Outcome`].
//!
//! A `200` from the backend does not mean "here is the weather": the agent can
//! answer in plain text when the question isn't about weather. The payload
//! shape decides, and the status code only rules out the failure case.

use serde::Deserialize;
use serde_json::Value;

use crate::model::{ErrorKind, WeatherSnapshot};

/// Shown when the backend answers without a snapshot and without explanation.
pub const UNSUPPORTED_QUERY_MESSAGE: &str = "Only weather-related queries are supported.";

/// Shown for every transport-level problem; the cause stays in the logs.
pub const TRANSPORT_FAILURE_MESSAGE: &str = "Unable to fetch weather data. Please try again.";

/// Key of the structured snapshot in the backend's JSON reply.
pub const WEATHER_FIELD: &str = "weather";

/// Key of the backend's plain-text reply.
pub const RESPONSE_FIELD: &str = "response";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Structured(WeatherSnapshot),
    Rejected(String),
    TransportFailure(String),
}

impl Outcome {
    /// The error kind for failure outcomes, `None` for `Structured`.
    pub fn error_kind(&self) -> Option<ErrorKind> {
        match self {
            Outcome::Structured(_) => None,
            Outcome::Rejected(_) => Some(ErrorKind::Rejected),
            Outcome::TransportFailure(_) => Some(ErrorKind::TransportFailure),
        }
    }

    pub fn transport_failure() -> Self {
        Outcome::TransportFailure(TRANSPORT_FAILURE_MESSAGE.to_string())
    }
}

/// Classify a backend reply. Pure function of its inputs.
pub fn classify(raw_body: &str, transport_ok: bool) -> Outcome {
    if !transport_ok {
        return Outcome::transport_failure();
    }

    let Ok(payload) = serde_json::from_str::<Value>(raw_body) else {
        return Outcome::transport_failure();
    };

    if let Some(snapshot) = structured_snapshot(&payload) {
        return Outcome::Structured(snapshot);
    }

    let message = payload
        .get(RESPONSE_FIELD)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .unwrap_or(UNSUPPORTED_QUERY_MESSAGE);

    Outcome::Rejected(message.to_string())
}

fn structured_snapshot(payload: &Value) -> Option<WeatherSnapshot> {
    let field = payload.get(WEATHER_FIELD)?;
    match field {
        Value::Object(map) if !map.is_empty() => {}
        _ => return None,
    }

    let raw = RawSnapshot::deserialize(field).ok()?;
    let location = non_blank(raw.location?.into_text())?;
    let summary = non_blank(raw.summary?.into_text())?;

    Some(WeatherSnapshot {
        location,
        summary,
        temperature: raw.temperature.map(DisplayValue::into_text).and_then(non_blank),
        rainfall: raw.rainfall.map(DisplayValue::into_text).and_then(non_blank),
        humidity: raw.humidity.map(DisplayValue::into_text).and_then(non_blank),
        aqi: raw.aqi.map(DisplayValue::into_text).and_then(non_blank),
    })
}

fn non_blank(text: String) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[derive(Debug, Deserialize)]
struct RawSnapshot {
    location: Option<DisplayValue>,
    summary: Option<DisplayValue>,
    temperature: Option<DisplayValue>,
    rainfall: Option<DisplayValue>,
    humidity: Option<DisplayValue>,
    aqi: Option<DisplayValue>,
}

/// Metrics arrive as preformatted strings, but bare numbers are tolerated.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DisplayValue {
    Text(String),
    Number(serde_json::Number),
}

impl DisplayValue {
    fn into_text(self) -> String {
        match self {
            DisplayValue::Text(text) => text,
            DisplayValue::Number(number) => number.to_string(),
        }
    }
}
