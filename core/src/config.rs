//! Client configuration: target host, JSON codec settings and default headers.
//!
//! # Design
//! `ClientConfig` is built once and then frozen inside a `HostClient` (behind
//! an `Arc`), so concurrent calls only ever read it. Field-level encodings
//! such as date formats belong on the payload types (`#[serde(with = ...)]`);
//! the codec settings here cover what applies to every payload.

use serde::de::{DeserializeOwned, Error as _};
use serde::Serialize;
use serde_json::Value;

/// How request bodies are serialized.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JsonEncoder {
    /// Emit indented JSON.
    pub pretty: bool,
    /// Drop object fields whose value is `null`, at any depth.
    pub omit_null_fields: bool,
}

impl JsonEncoder {
    pub fn encode<B>(&self, body: &B) -> Result<Vec<u8>, serde_json::Error>
    where
        B: Serialize + ?Sized,
    {
        if !self.omit_null_fields {
            return self.write(body);
        }
        let mut value = serde_json::to_value(body)?;
        strip_nulls(&mut value);
        self.write(&value)
    }

    fn write<B>(&self, body: &B) -> Result<Vec<u8>, serde_json::Error>
    where
        B: Serialize + ?Sized,
    {
        if self.pretty {
            serde_json::to_vec_pretty(body)
        } else {
            serde_json::to_vec(body)
        }
    }
}

fn strip_nulls(value: &mut Value) {
    match value {
        Value::Object(map) => {
            map.retain(|_, v| !v.is_null());
            map.values_mut().for_each(strip_nulls);
        }
        Value::Array(items) => items.iter_mut().for_each(strip_nulls),
        _ => {}
    }
}

/// How response bodies are deserialized.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JsonDecoder {
    /// Decode the value stored under this top-level key instead of the whole
    /// document, for APIs that wrap payloads in an envelope.
    pub root_key: Option<String>,
}

impl JsonDecoder {
    pub fn decode<R>(&self, bytes: &[u8]) -> Result<R, serde_json::Error>
    where
        R: DeserializeOwned,
    {
        let Some(key) = &self.root_key else {
            return serde_json::from_slice(bytes);
        };
        let mut document: Value = serde_json::from_slice(bytes)?;
        let inner = document
            .get_mut(key)
            .map(Value::take)
            .ok_or_else(|| serde_json::Error::custom(format!("missing root key `{key}`")))?;
        serde_json::from_value(inner)
    }
}

/// Settings shared by every request a `HostClient` sends.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub host: String,
    pub decoder: JsonDecoder,
    pub encoder: JsonEncoder,
    /// Sent with every request, after any content headers. A default whose
    /// name is already set on the request is skipped.
    pub default_headers: Vec<(String, String)>,
}

impl ClientConfig {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            decoder: JsonDecoder::default(),
            encoder: JsonEncoder::default(),
            default_headers: Vec::new(),
        }
    }

    pub fn decoder(mut self, decoder: JsonDecoder) -> Self {
        self.decoder = decoder;
        self
    }

    pub fn encoder(mut self, encoder: JsonEncoder) -> Self {
        self.encoder = encoder;
        self
    }

    pub fn default_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.push((name.into(), value.into()));
        self
    }
}
