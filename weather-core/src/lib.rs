//! Core library for the `weather-query` client.
//!
//! This crate defines:
//! - The query view-state machine and the view states it exposes
//! - Classification of raw backend replies into one tagged outcome
//! - The outbound backend call (trait + HTTP implementation)
//! - Configuration & AQI tier helpers used by presentation
//!
//! It is used by `weather-query`, but can also back any other front end.

pub mod aqi;
pub mod backend;
pub mod classifier;
pub mod config;
pub mod error;
pub mod machine;
pub mod model;

pub use aqi::AqiTier;
pub use backend::{Backend, backend_from_config, http::HttpBackend};
pub use classifier::{Outcome, classify};
pub use config::Config;
pub use error::TransportError;
pub use machine::{PendingQuery, QueryStateMachine, Ticket};
pub use model::{ErrorKind, Query, ViewState, WeatherSnapshot};
