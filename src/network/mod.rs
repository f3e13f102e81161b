//! A network abstraction layer for embedded systems
//!
//! The uplink never owns a socket. It opens connections through a [`Connect`]
//! implementation supplied by the platform (typically a TLS client on top of
//! the Wi-Fi stack), uses each one for exactly one request, and asks a [`Link`]
//! implementation whether the network is up before doing so.

#![allow(missing_docs)]
#![deny(unsafe_code)]

use core::time::Duration;

/// Common error types for network operations
pub mod error;

/// Application layer protocols
pub mod application;

/// Re-exports of common traits
pub mod prelude {
    pub use super::{Close, Connect, Connection, Link, Read, Write};
}

// Core synchronous traits
pub trait Read {
    /// Associated error type. It converts into [`error::Error`] so the HTTP
    /// layer can report timeouts and resets as what they are.
    type Error: core::fmt::Debug + Into<error::Error>;
    /// Read data from the connection. `Ok(0)` means the peer closed the stream.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;
}

pub trait Write {
    /// Associated error type
    type Error: core::fmt::Debug;
    /// Write data to the connection
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error>;
    /// Flush the write buffer
    fn flush(&mut self) -> Result<(), Self::Error>;
}

pub trait Close {
    /// Associated error type
    type Error: core::fmt::Debug;
    /// Close the connection
    fn close(self) -> Result<(), Self::Error>;
}

/// A synchronous connection
pub trait Connection: Read + Write + Close {}

/// Where and how to open a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint<'a> {
    /// Host name, also sent as the HTTP `Host` header.
    pub host: &'a str,
    /// TCP port, 443 for HTTPS.
    pub port: u16,
    /// Whether the TLS layer must validate the server certificate chain.
    pub verify_certificates: bool,
    /// Deadline applied to every individual read on the connection. A read
    /// that exceeds it must fail instead of blocking.
    pub read_timeout: Duration,
}

/// A synchronous connector (client)
///
/// Implementations own whatever is needed to reach the remote (TCP stack, TLS
/// configuration, trust anchors) and must honour every field of [`Endpoint`].
pub trait Connect {
    /// Associated connection type
    type Connection: Connection;
    /// Associated error type
    type Error: core::fmt::Debug;
    /// Open a connection
    fn connect(&mut self, endpoint: &Endpoint<'_>) -> Result<Self::Connection, Self::Error>;
}

/// Link-layer connectivity (for example Wi-Fi station association).
pub trait Link {
    /// Associated error type
    type Error: core::fmt::Debug;
    /// Whether the link is currently up.
    fn is_connected(&mut self) -> bool;
    /// Bring the link back up, blocking until it is up or has failed.
    fn reconnect(&mut self) -> Result<(), Self::Error>;
}

/// Host implementations of the network traits on top of `std::net`.
#[cfg(feature = "std")]
pub mod std_net;
