use reqwest::StatusCode;
use thiserror::Error;

/// Why a backend call did not produce a usable reply.
///
/// Never shown to the user; the classifier maps all of these to one message.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("failed to send request to {endpoint}")]
    Request {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("backend responded with status {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("failed to read backend response body")]
    Body(#[source] reqwest::Error),

    #[error("failed to build HTTP client")]
    Client(#[source] reqwest::Error),
}
