//! Plain TCP connector for hosts.
//!
//! Useful against a development server or behind a TLS-terminating proxy.
//! It cannot validate certificates, so it refuses endpoints that ask for it.

use super::error::Error;
use super::{Close, Connect, Connection, Endpoint, Link, Read, Write};
use std::io::{ErrorKind, Read as StdRead, Write as StdWrite};
use std::net::{Shutdown, TcpStream};

/// Opens a fresh [`TcpConnection`] per request.
#[derive(Debug, Default, Clone, Copy)]
pub struct TcpConnector;

/// A connected TCP stream with the endpoint's read deadline applied.
#[derive(Debug)]
pub struct TcpConnection {
    stream: TcpStream,
}

impl Connect for TcpConnector {
    type Connection = TcpConnection;
    type Error = Error;

    fn connect(&mut self, endpoint: &Endpoint<'_>) -> Result<Self::Connection, Self::Error> {
        if endpoint.verify_certificates {
            return Err(Error::ConnectionRefused);
        }
        let stream = TcpStream::connect((endpoint.host, endpoint.port))
            .map_err(|_| Error::ConnectionRefused)?;
        // A zero duration would mean "block forever" to std.
        let timeout = if endpoint.read_timeout.is_zero() {
            None
        } else {
            Some(endpoint.read_timeout)
        };
        stream
            .set_read_timeout(timeout)
            .map_err(|_| Error::ConnectionRefused)?;
        Ok(TcpConnection { stream })
    }
}

impl Read for TcpConnection {
    type Error = Error;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        self.stream.read(buf).map_err(|e| match e.kind() {
            ErrorKind::WouldBlock | ErrorKind::TimedOut => Error::Timeout,
            _ => Error::ReadError,
        })
    }
}

impl Write for TcpConnection {
    type Error = Error;

    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        self.stream.write(buf).map_err(|_| Error::WriteError)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.stream.flush().map_err(|_| Error::WriteError)
    }
}

impl Close for TcpConnection {
    type Error = Error;

    fn close(self) -> Result<(), Self::Error> {
        match self.stream.shutdown(Shutdown::Both) {
            Ok(()) => Ok(()),
            // The server usually hangs up first.
            Err(e) if e.kind() == ErrorKind::NotConnected => Ok(()),
            Err(_) => Err(Error::ConnectionClosed),
        }
    }
}

impl Connection for TcpConnection {}

/// A link that is always up, for hosts whose OS manages connectivity.
#[derive(Debug, Default, Clone, Copy)]
pub struct HostLink;

impl Link for HostLink {
    type Error = core::convert::Infallible;

    fn is_connected(&mut self) -> bool {
        true
    }

    fn reconnect(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}
