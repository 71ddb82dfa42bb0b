//! Blocking client core for a JSON document server.
//!
//! # Overview
//! Issues authenticated calls against `/api/<db>/<collection>[/<id>]` and
//! interprets each response best-effort as JSON, empty, or raw text. A demo
//! chains list, create, read, patch and delete against the `posts`
//! collection.
//!
//! # Design
//! - `build_request` / `parse_response` are pure; only a `Transport` does I/O,
//!   so request and status rules are tested without a server.
//! - `AuthContext` is built once and passed explicitly; nothing reads the
//!   environment below the binary.
//! - `Payload` is a tagged variant, so every consumer handles the empty and
//!   non-JSON cases.
//! - Calls are strictly sequential. There is no retry and, unless configured,
//!   no timeout.

pub mod client;
pub mod config;
pub mod demo;
pub mod error;
pub mod http;
pub mod payload;
pub mod request;
pub mod transport;
pub mod types;

pub use client::{execute, JsonServerClient};
pub use config::AuthContext;
pub use demo::{run_demo, ConsoleReporter, DemoPost, Reporter};
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use payload::{Payload, ResourceId};
pub use request::{build_request, collection_path, parse_response, RequestSpec};
pub use transport::{Transport, UreqTransport};
pub use types::{NewPost, PostPatch};
