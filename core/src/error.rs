//! Error types for the host client.
//!
//! # Design
//! Every failure is terminal and reaches the caller unchanged. Decoding
//! failures keep the raw bytes and response metadata because the usual
//! reason a body fails to decode is that the server answered with something
//! other than the expected schema (an error document, an HTML page).

use thiserror::Error;

use crate::http::ResponseMetadata;

/// Error produced by a `Transport`, passed through untouched.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors returned by `HostClient` and delivered to `CallbackClient`
/// completions.
#[derive(Debug, Error)]
pub enum NetworkingError {
    /// Catch-all, currently used when a response carried no body.
    #[error("{0}")]
    Uncategorized(String),

    /// The response body could not be decoded into the expected type.
    #[error("failed to decode response from {} (HTTP {}): {source}", .response.url, .response.status)]
    DecodingFailure {
        #[source]
        source: serde_json::Error,
        data: Vec<u8>,
        response: ResponseMetadata,
    },

    /// The transport failed before a response was received.
    #[error("transport failure: {0}")]
    TransportFailure(#[source] BoxError),

    /// Host, route and parameters did not join into a valid URL.
    #[error("invalid path: {0}")]
    InvalidPath(String),

    /// The request body could not be serialized to JSON.
    #[error("failed to encode request body: {0}")]
    EncodingFailure(#[source] serde_json::Error),
}

impl NetworkingError {
    pub(crate) fn no_data() -> Self {
        NetworkingError::Uncategorized("no data received".to_string())
    }

    /// HTTP status of the response, if one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            NetworkingError::DecodingFailure { response, .. } => Some(response.status),
            _ => None,
        }
    }

    /// Raw body of a response that failed to decode.
    pub fn raw_body(&self) -> Option<&[u8]> {
        match self {
            NetworkingError::DecodingFailure { data, .. } => Some(data),
            _ => None,
        }
    }
}
