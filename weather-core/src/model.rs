use serde::{Deserialize, Serialize};
use std::fmt;

use crate::aqi::AqiTier;

/// A validated, trimmed, non-empty query text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query(String);

impl Query {
    /// Returns `None` for empty or whitespace-only input.
    pub fn parse(text: &str) -> Option<Self> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Structured weather result, already formatted for display by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub location: String,
    pub summary: String,
    pub temperature: Option<String>,
    pub rainfall: Option<String>,
    pub humidity: Option<String>,
    pub aqi: Option<String>,
}

impl WeatherSnapshot {
    /// Numeric AQI, if the display string starts with an integer.
    pub fn aqi_value(&self) -> Option<i64> {
        let raw = self.aqi.as_deref()?.trim();
        raw.parse::<i64>()
            .ok()
            .or_else(|| raw.split_whitespace().next()?.parse::<i64>().ok())
    }

    pub fn aqi_tier(&self) -> Option<AqiTier> {
        self.aqi_value().map(AqiTier::from_aqi)
    }
}

/// Which failure produced an `Error` view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The backend answered, but not with a supported weather result.
    Rejected,
    /// The call failed, returned a non-success status, or sent garbage.
    TransportFailure,
}

/// Everything the presentation layer can see.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState {
    Idle { input_text: String },
    Loading,
    Result { snapshot: WeatherSnapshot },
    Error { kind: ErrorKind, message: String },
}

impl Default for ViewState {
    fn default() -> Self {
        ViewState::Idle {
            input_text: String::new(),
        }
    }
}

impl ViewState {
    pub fn is_idle(&self) -> bool {
        matches!(self, ViewState::Idle { .. })
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, ViewState::Loading)
    }

    /// Input is only editable while idle.
    pub fn input_enabled(&self) -> bool {
        self.is_idle()
    }

    pub fn snapshot(&self) -> Option<&WeatherSnapshot> {
        match self {
            ViewState::Result { snapshot } => Some(snapshot),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            ViewState::Error { message, .. } => Some(message),
            _ => None,
        }
    }
}
