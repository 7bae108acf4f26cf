//! HTTP request and response values exchanged with a `Transport`.
//!
//! # Design
//! Requests and responses are plain data. `HostClient` builds an
//! `HttpRequest`, hands it to its transport, and decodes the returned
//! `HttpResponse`; neither type carries any connection state, so both are
//! easy to construct by hand in tests.
//!
//! Bodies are raw bytes (`Vec<u8>`) so a decoding failure can hand the exact
//! payload back to the caller.

use std::fmt;

use url::Url;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    /// The verb as it appears on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An outgoing HTTP request described as plain data.
///
/// Built by `HostClient::build_request`.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: Url,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
}

impl HttpRequest {
    /// First value of header `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

/// A received HTTP response described as plain data.
///
/// An empty `body` means the server sent no data.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub url: Url,
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Split off everything but the body.
    pub fn into_parts(self) -> (ResponseMetadata, Vec<u8>) {
        let metadata = ResponseMetadata {
            url: self.url,
            status: self.status,
            headers: self.headers,
        };
        (metadata, self.body)
    }
}

/// Status line and headers of a response, kept for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseMetadata {
    pub url: Url,
    pub status: u16,
    pub headers: Vec<(String, String)>,
}

impl ResponseMetadata {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}
