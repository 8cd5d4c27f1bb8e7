use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

use crate::{Config, error::TransportError, model::Query};

use super::Backend;

const USER_AGENT: &str = concat!("weather-query/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    message: &'a str,
}

/// Posts `{"message": ...}` to the chat endpoint of the inference backend.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    endpoint: Url,
    http: Client,
}

impl HttpBackend {
    pub fn new(endpoint: Url, timeout: Option<Duration>) -> Result<Self, TransportError> {
        let mut builder = Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(TransportError::Client)?;

        Ok(Self { endpoint, http })
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let endpoint = config.backend_url()?;
        Ok(Self::new(endpoint, config.timeout())?)
    }

    /// Use a prebuilt client, e.g. one with custom proxy settings.
    pub fn with_client(endpoint: Url, http: Client) -> Self {
        Self { endpoint, http }
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn send(&self, query: &Query) -> Result<String, TransportError> {
        debug!(endpoint = %self.endpoint, "posting query to backend");

        let res = self
            .http
            .post(self.endpoint.clone())
            .json(&ChatRequest {
                message: query.as_str(),
            })
            .send()
            .await
            .map_err(|source| TransportError::Request {
                endpoint: self.endpoint.to_string(),
                source,
            })?;

        let status = res.status();
        let body = res.text().await.map_err(TransportError::Body)?;

        if !status.is_success() {
            return Err(TransportError::Status {
                status,
                body: truncate_body(&body),
            });
        }

        Ok(body)
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}
