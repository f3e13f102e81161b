//! HTTP/1.1 protocol implementation for embedded systems.
//!
//! This module provides the request/response exchange used by the telemetry
//! uplink. It is deliberately small:
//!
//! - one request per connection, the connection is consumed and closed
//! - fixed-size buffers for the request, each response line and the body
//! - the response head is skipped except for the status code and the two
//!   headers that decide how the body is framed
//! - chunked bodies are reassembled, truncated bodies are reported as errors
//!
//! # Usage
//!
//! [`exchange`] opens a connection through any [`Connect`](crate::network::Connect)
//! implementation and performs one request on it.
//!
//! ```rust,no_run
//! use sensorlink::network::application::http::{Header, Method, Request, exchange};
//! use sensorlink::network::{Connect, Endpoint};
//! use core::time::Duration;
//!
//! fn post_status<C: Connect>(connector: &mut C) {
//!     let endpoint = Endpoint {
//!         host: "example.com",
//!         port: 443,
//!         verify_certificates: true,
//!         read_timeout: Duration::from_secs(10),
//!     };
//!     let headers = [Header::new("Content-Type", "application/json")];
//!     let request = Request {
//!         method: Method::Post,
//!         path: "/api/status",
//!         headers: &headers,
//!         body: Some(br#"{"ok":true}"#.as_slice()),
//!     };
//!     let _response = exchange(connector, &endpoint, &request);
//! }
//! ```

/// Chunked transfer-coding decoder.
pub mod chunked;

/// HTTP client implementation and supporting types.
pub mod client;

/// Buffered line and byte reader over a [`Read`](crate::network::Read) stream.
pub mod reader;

pub use client::{Client, Header, Method, Request, Response, exchange};

/// Size of the serialized request buffer.
pub const MAX_REQUEST_LEN: usize = 1024;
/// Size of the response body buffer.
pub const MAX_BODY_LEN: usize = 1024;
/// Longest response line kept; longer lines are truncated.
pub const MAX_LINE_LEN: usize = 256;
