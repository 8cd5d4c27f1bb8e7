use async_trait::async_trait;
use std::fmt::Debug;
use tracing::{debug, warn};

use crate::{
    Config,
    backend::http::HttpBackend,
    classifier::{Outcome, classify},
    error::TransportError,
    model::Query,
};

pub mod http;

/// The single outbound call made for a submitted query.
#[async_trait]
pub trait Backend: Send + Sync + Debug {
    /// Send the query and return the raw body of a success response.
    ///
    /// Non-success statuses and request faults come back as `Err`.
    async fn send(&self, query: &Query) -> Result<String, TransportError>;
}

/// Send `query` once and classify whatever comes back.
///
/// Transport details are logged here and go no further.
pub async fn dispatch<B: Backend + ?Sized>(backend: &B, query: &Query) -> Outcome {
    match backend.send(query).await {
        Ok(body) => {
            debug!(bytes = body.len(), "backend replied");
            classify(&body, true)
        }
        Err(err) => {
            warn!(error = %err, cause = ?std::error::Error::source(&err), "backend call failed");
            classify("", false)
        }
    }
}

/// Construct the HTTP backend described by the configuration.
pub fn backend_from_config(config: &Config) -> anyhow::Result<Box<dyn Backend>> {
    let backend = HttpBackend::from_config(config)?;
    Ok(Box::new(backend))
}
