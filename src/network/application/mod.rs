//! # Application Layer Network Protocols
//!
//! Application layer (OSI Layer 7) protocols built on the core network
//! traits. Each protocol works with any type implementing
//! [`Connection`](crate::network::Connection) and uses fixed-size buffers only.
//!
//! - **[`http`]**: minimal HTTP/1.1 client for one request per connection

/// HTTP client implementation.
///
/// Provides a small HTTP/1.1 client suitable for embedded systems, with
/// chunked transfer decoding and fixed-size request and response buffers.
pub mod http;
