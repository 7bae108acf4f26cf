//! Host-scoped JSON client.
//!
//! # Design
//! `HostClient` holds a frozen `ClientConfig` and a `Transport`. Every call
//! goes through the same three steps:
//! - `build_request` joins host, route and parameters, parses the URL and
//!   attaches the encoded body,
//! - `send` hands the request to the transport,
//! - `parse_response` decodes the body into the caller's type.
//!
//! `build_request` and `parse_response` are pure, so they can be tested
//! without a network. `CallbackClient` wraps `send` rather than duplicating
//! any of it.

use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};
use url::Url;

use crate::config::ClientConfig;
use crate::error::NetworkingError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::path;
use crate::transport::{ReqwestTransport, Transport};

const APPLICATION_JSON: &str = "application/json";

/// Placeholder for calls that send no body; pins the body type to `()`.
pub const NO_BODY: Option<&()> = None;

/// JSON client bound to a single host.
#[derive(Debug, Clone)]
pub struct HostClient<T = ReqwestTransport> {
    config: Arc<ClientConfig>,
    transport: T,
}

impl HostClient<ReqwestTransport> {
    pub fn new(host: impl Into<String>) -> Self {
        Self::with_config(ClientConfig::new(host))
    }

    pub fn with_config(config: ClientConfig) -> Self {
        Self::with_transport(config, ReqwestTransport::new())
    }
}

impl<T: Transport> HostClient<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self {
            config: Arc::new(config),
            transport,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Build the request for `method` on `route` without sending it.
    pub fn build_request<B>(
        &self,
        method: HttpMethod,
        route: &str,
        params: &[&dyn Display],
        body: Option<&B>,
    ) -> Result<HttpRequest, NetworkingError>
    where
        B: Serialize + ?Sized,
    {
        let path = path::join(&self.config.host, route, params);
        let url = Url::parse(&path).map_err(|_| NetworkingError::InvalidPath(path.clone()))?;

        let mut request = HttpRequest {
            method,
            url,
            headers: Vec::new(),
            body: None,
        };

        if let Some(body) = body {
            let bytes = self
                .config
                .encoder
                .encode(body)
                .map_err(NetworkingError::EncodingFailure)?;
            request
                .headers
                .push(("Content-Type".to_string(), APPLICATION_JSON.to_string()));
            request
                .headers
                .push(("Accept".to_string(), APPLICATION_JSON.to_string()));
            request.body = Some(bytes);
        }

        for (name, value) in &self.config.default_headers {
            if request.header(name).is_none() {
                request.headers.push((name.clone(), value.clone()));
            }
        }
        Ok(request)
    }

    /// Decode a received response into `R`.
    pub fn parse_response<R>(&self, response: HttpResponse) -> Result<R, NetworkingError>
    where
        R: DeserializeOwned,
    {
        let (metadata, data) = response.into_parts();
        if data.is_empty() {
            return Err(NetworkingError::no_data());
        }
        match self.config.decoder.decode(&data) {
            Ok(value) => Ok(value),
            Err(source) => {
                warn!(url = %metadata.url, status = metadata.status, error = %source, "failed to decode response");
                Err(NetworkingError::DecodingFailure {
                    source,
                    data,
                    response: metadata,
                })
            }
        }
    }

    /// Send an already built request and decode its response.
    pub async fn send<R>(&self, request: HttpRequest) -> Result<R, NetworkingError>
    where
        R: DeserializeOwned,
    {
        let method = request.method;
        let url = request.url.clone();
        debug!(%method, %url, "sending request");

        let response = self.transport.send(request).await.map_err(|err| {
            warn!(%method, %url, error = %err, "transport failure");
            NetworkingError::TransportFailure(err)
        })?;

        debug!(%method, %url, status = response.status, bytes = response.body.len(), "received response");
        self.parse_response(response)
    }

    /// Build, send and decode in one step.
    ///
    /// The request is built before this returns, so the future holds only
    /// the built `HttpRequest` and a borrow of the client, and can be moved
    /// to another thread.
    pub fn request<R, B>(
        &self,
        method: HttpMethod,
        route: &str,
        params: &[&dyn Display],
        body: Option<&B>,
    ) -> impl Future<Output = Result<R, NetworkingError>> + Send + '_
    where
        R: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request = self.build_request(method, route, params, body);
        async move { self.send(request?).await }
    }

    /// Always issues `GET`.
    pub fn get<R, B>(
        &self,
        route: &str,
        params: &[&dyn Display],
        body: Option<&B>,
    ) -> impl Future<Output = Result<R, NetworkingError>> + Send + '_
    where
        R: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(HttpMethod::Get, route, params, body)
    }

    pub fn post<R, B>(
        &self,
        route: &str,
        params: &[&dyn Display],
        body: Option<&B>,
    ) -> impl Future<Output = Result<R, NetworkingError>> + Send + '_
    where
        R: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(HttpMethod::Post, route, params, body)
    }

    pub fn put<R, B>(
        &self,
        route: &str,
        params: &[&dyn Display],
        body: Option<&B>,
    ) -> impl Future<Output = Result<R, NetworkingError>> + Send + '_
    where
        R: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(HttpMethod::Put, route, params, body)
    }

    /// Same as [`HostClient::put`].
    pub fn update<R, B>(
        &self,
        route: &str,
        params: &[&dyn Display],
        body: Option<&B>,
    ) -> impl Future<Output = Result<R, NetworkingError>> + Send + '_
    where
        R: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.put(route, params, body)
    }

    pub fn delete<R, B>(
        &self,
        route: &str,
        params: &[&dyn Display],
        body: Option<&B>,
    ) -> impl Future<Output = Result<R, NetworkingError>> + Send + '_
    where
        R: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(HttpMethod::Delete, route, params, body)
    }
}
