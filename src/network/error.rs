//! Common error types for network operations

/// A common error type for network operations.
///
/// This enum defines the errors that can occur while talking to the remote
/// service over a single connection. It is designed to be simple and portable
/// for `no_std` environments.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Error {
    /// The connection could not be opened (TCP connect or TLS handshake).
    ConnectionRefused,
    /// An error occurred during a write operation.
    WriteError,
    /// An error occurred during a read operation.
    ReadError,
    /// A read did not complete before the endpoint's read deadline.
    Timeout,
    /// The connection was closed before the response head was complete.
    ConnectionClosed,
    /// The peer sent something that is not an HTTP/1.1 response.
    ProtocolError,
    /// An outgoing message did not fit into its fixed-size buffer.
    BufferOverflow,
    /// The response body could not be decoded.
    Decode(DecodeError),
}

/// Failures while reassembling a response body.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum DecodeError {
    /// A chunk-size line was empty after its extensions were removed, or was
    /// not a hexadecimal number.
    InvalidChunkSize,
    /// The stream ended before the terminal chunk or in the middle of a chunk.
    Truncated,
    /// The body does not fit into the response buffer.
    BodyTooLarge,
}

impl From<DecodeError> for Error {
    fn from(error: DecodeError) -> Self {
        Error::Decode(error)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Error {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Error::ConnectionRefused => defmt::write!(f, "ConnectionRefused"),
            Error::WriteError => defmt::write!(f, "WriteError"),
            Error::ReadError => defmt::write!(f, "ReadError"),
            Error::Timeout => defmt::write!(f, "Timeout"),
            Error::ConnectionClosed => defmt::write!(f, "ConnectionClosed"),
            Error::ProtocolError => defmt::write!(f, "ProtocolError"),
            Error::BufferOverflow => defmt::write!(f, "BufferOverflow"),
            Error::Decode(e) => defmt::write!(f, "Decode({})", e),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for DecodeError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            DecodeError::InvalidChunkSize => defmt::write!(f, "InvalidChunkSize"),
            DecodeError::Truncated => defmt::write!(f, "Truncated"),
            DecodeError::BodyTooLarge => defmt::write!(f, "BodyTooLarge"),
        }
    }
}
