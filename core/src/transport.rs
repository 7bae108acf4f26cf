//! The seam between `HostClient` and the network.
//!
//! # Design
//! `Transport` is the only part of the crate that performs I/O. The default
//! `ReqwestTransport` owns a `reqwest::Client` (whose internal pool handles
//! connection reuse); tests substitute scripted transports. Errors are boxed
//! and passed through unchanged so callers can downcast to the concrete
//! transport error.

use async_trait::async_trait;

use crate::error::BoxError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Sends one request and returns the raw response.
///
/// Implementations must not interpret the status code: any response that
/// arrives is `Ok`, only failures to obtain one are `Err`.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, BoxError>;
}

/// `Transport` backed by `reqwest`.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    inner: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reuse a preconfigured client (proxy, TLS, timeouts).
    pub fn from_client(client: reqwest::Client) -> Self {
        Self { inner: client }
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, BoxError> {
        let mut builder = self.inner.request(request.method.into(), request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let url = response.url().clone();
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect();
        let body = response.bytes().await?.to_vec();

        Ok(HttpResponse {
            url,
            status,
            headers,
            body,
        })
    }
}
