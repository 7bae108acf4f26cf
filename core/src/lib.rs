//! Host-scoped JSON HTTP client.
//!
//! # Overview
//! Joins a host, a route and path parameters into a URL, attaches an optional
//! JSON body, sends the request through a `Transport` and decodes the
//! response into the caller's type or a `NetworkingError`.
//!
//! # Design
//! - `HostClient` owns a frozen `ClientConfig` and its transport; there is no
//!   process-wide client.
//! - Requests are built by a pure `build_request` and responses decoded by a
//!   pure `parse_response`; only `Transport::send` performs I/O.
//! - `HostClient` exposes async methods; `CallbackClient` is a thin adapter
//!   that spawns the same dispatch and delivers the result through a
//!   `CompletionContext`.
//! - No retries, caching or timeouts live here. Configure those on the
//!   `reqwest::Client` passed to `ReqwestTransport::from_client`.
//!
//! # Example
//!
//! ```no_run
//! use hostlink_core::{HostClient, NetworkingError, NO_BODY};
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct Note {
//!     title: String,
//! }
//!
//! async fn example() -> Result<(), NetworkingError> {
//!     let client = HostClient::new("http://localhost:3000");
//!     let note: Note = client.get("notes", &[&42], NO_BODY).await?;
//!     println!("{}", note.title);
//!     Ok(())
//! }
//! ```

pub mod callback;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod path;
pub mod transport;

pub use callback::{CallbackClient, CallbackPump, CallbackQueue, CompletionContext, Immediate};
pub use client::{HostClient, NO_BODY};
pub use config::{ClientConfig, JsonDecoder, JsonEncoder};
pub use error::{BoxError, NetworkingError};
pub use http::{HttpMethod, HttpRequest, HttpResponse, ResponseMetadata};
pub use transport::{ReqwestTransport, Transport};
