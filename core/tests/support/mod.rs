//! Shared fixtures for the integration suites.

#![allow(dead_code)]

use std::sync::Mutex;

use async_trait::async_trait;
use hostlink_core::{BoxError, HttpRequest, HttpResponse, Transport};
use serde::{Deserialize, Serialize};

pub const HOST: &str = "http://localhost:3000";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Note {
    pub title: String,
    pub pinned: bool,
}

/// Error a `ScriptedTransport` fails with, so tests can check it comes back
/// unchanged.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("connection refused by {host}")]
pub struct Refused {
    pub host: String,
}

#[derive(Debug, Clone)]
pub enum Reply {
    Body { status: u16, body: Vec<u8> },
    Refused(String),
}

/// Answers every request with the same scripted reply and records what it was
/// sent.
#[derive(Debug)]
pub struct ScriptedTransport {
    reply: Reply,
    sent: Mutex<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    pub fn json(status: u16, body: &str) -> Self {
        Self::new(Reply::Body {
            status,
            body: body.as_bytes().to_vec(),
        })
    }

    pub fn empty(status: u16) -> Self {
        Self::new(Reply::Body {
            status,
            body: Vec::new(),
        })
    }

    pub fn refused(host: &str) -> Self {
        Self::new(Reply::Refused(host.to_string()))
    }

    fn new(reply: Reply) -> Self {
        Self {
            reply,
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn sent(&self) -> Vec<HttpRequest> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, BoxError> {
        let url = request.url.clone();
        self.sent.lock().unwrap().push(request);
        match &self.reply {
            Reply::Body { status, body } => Ok(HttpResponse {
                url,
                status: *status,
                headers: vec![("content-type".to_string(), "application/json".to_string())],
                body: body.clone(),
            }),
            Reply::Refused(host) => Err(Box::new(Refused { host: host.clone() })),
        }
    }
}
