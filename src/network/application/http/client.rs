#![allow(missing_docs)]

use super::chunked::read_chunked_body;
use super::reader::BufReader;
use super::{MAX_BODY_LEN, MAX_LINE_LEN, MAX_REQUEST_LEN};
use crate::network::error::Error;
use crate::network::{Connect, Connection, Endpoint};
use core::fmt::Write;
use heapless::{String, Vec};

const DEFAULT_USER_AGENT: &str = concat!("sensorlink/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

/// One request header. Requests carry their headers as an ordered slice and
/// they are written in that order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header<'a> {
    pub name: &'a str,
    pub value: &'a str,
}

impl<'a> Header<'a> {
    pub const fn new(name: &'a str, value: &'a str) -> Self {
        Self { name, value }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Request<'a> {
    pub method: Method,
    pub path: &'a str,
    pub headers: &'a [Header<'a>],
    pub body: Option<&'a [u8]>,
}

#[derive(Debug)]
pub struct Response {
    /// Status code from the status line, `None` if it could not be parsed.
    /// Informational only: the service reports outcomes in the body.
    pub status: Option<u16>,
    pub body: Vec<u8, MAX_BODY_LEN>,
}

impl Response {
    /// The body as UTF-8 text.
    pub fn text(&self) -> Result<&str, Error> {
        core::str::from_utf8(&self.body).map_err(|_| Error::ProtocolError)
    }
}

/// An HTTP client bound to a single connection.
///
/// [`Client::request`] consumes the client, so a connection can never carry
/// more than one request. The connection is closed when the request returns.
#[derive(Debug)]
pub struct Client<'h, C: Connection> {
    connection: C,
    host: &'h str,
}

impl<'h, C: Connection> Client<'h, C> {
    /// Wraps an open connection to `host`. The host name is sent in the
    /// `Host` header.
    pub fn new(connection: C, host: &'h str) -> Self {
        Self { connection, host }
    }

    /// Sends `request` and reads the complete response, then closes the
    /// connection.
    pub fn request(mut self, request: &Request) -> Result<Response, Error> {
        let result = encode_request(request, self.host)
            .and_then(|buf| self.write_all(&buf))
            .and_then(|()| self.receive());

        if self.connection.close().is_err() {
            debug!("closing connection to {} failed", self.host);
        }
        result
    }

    fn write_all(&mut self, mut bytes: &[u8]) -> Result<(), Error> {
        while !bytes.is_empty() {
            match self.connection.write(bytes) {
                Ok(0) | Err(_) => return Err(Error::WriteError),
                Ok(n) => bytes = &bytes[n..],
            }
        }
        self.connection.flush().map_err(|_| Error::WriteError)
    }

    fn receive(&mut self) -> Result<Response, Error> {
        let mut reader = BufReader::new(&mut self.connection);
        let mut line: Vec<u8, MAX_LINE_LEN> = Vec::new();

        if !reader.read_line(&mut line)? {
            return Err(Error::ConnectionClosed);
        }
        let status = parse_status_line(&line);

        let mut chunked = false;
        let mut content_length: Option<usize> = None;
        loop {
            if !reader.read_line(&mut line)? {
                return Err(Error::ConnectionClosed);
            }
            let header = line.trim_ascii();
            if header.is_empty() {
                break;
            }
            if let Some(value) = header_value(header, "content-length") {
                content_length = core::str::from_utf8(value)
                    .ok()
                    .and_then(|v| v.parse().ok());
            } else if let Some(value) = header_value(header, "transfer-encoding") {
                chunked = value
                    .rsplit(|&b| b == b',')
                    .next()
                    .is_some_and(|coding| coding.trim_ascii().eq_ignore_ascii_case(b"chunked"));
            }
        }

        let mut body = Vec::new();
        match content_length {
            Some(len) if !chunked => reader.read_exact_into(len, &mut body)?,
            // The service answers with chunked bodies, so that is the default
            // framing when the head says nothing.
            _ => read_chunked_body(&mut reader, &mut body)?,
        }

        Ok(Response { status, body })
    }
}

/// Opens a connection to `endpoint` and performs one request on it.
///
/// A connect failure is reported as [`Error::ConnectionRefused`] before
/// anything is written.
pub fn exchange<C: Connect>(
    connector: &mut C,
    endpoint: &Endpoint<'_>,
    request: &Request<'_>,
) -> Result<Response, Error> {
    let connection = match connector.connect(endpoint) {
        Ok(connection) => connection,
        Err(_) => {
            warn!("connect to {}:{} failed", endpoint.host, endpoint.port);
            return Err(Error::ConnectionRefused);
        }
    };

    let response = Client::new(connection, endpoint.host).request(request)?;
    debug!(
        "{} {} -> status {:?}, {} byte body",
        request.method.as_str(),
        request.path,
        response.status,
        response.body.len()
    );
    Ok(response)
}

/// Serializes `request` for `host`.
///
/// A `Host` and a `User-Agent` header are added unless the caller supplied
/// them; `Content-Length` is added whenever there is a body.
pub fn encode_request(request: &Request, host: &str) -> Result<Vec<u8, MAX_REQUEST_LEN>, Error> {
    let mut buf: Vec<u8, MAX_REQUEST_LEN> = Vec::new();
    let mut put = |bytes: &[u8]| buf.extend_from_slice(bytes).map_err(|_| Error::BufferOverflow);

    // Request line
    put(request.method.as_str().as_bytes())?;
    put(b" ")?;
    put(request.path.as_bytes())?;
    put(b" HTTP/1.1\r\n")?;

    // Headers
    let supplied = |name: &str| request.headers.iter().any(|h| h.name.eq_ignore_ascii_case(name));
    if !supplied("Host") {
        put(b"Host: ")?;
        put(host.as_bytes())?;
        put(b"\r\n")?;
    }
    if !supplied("User-Agent") {
        put(b"User-Agent: ")?;
        put(DEFAULT_USER_AGENT.as_bytes())?;
        put(b"\r\n")?;
    }
    for header in request.headers {
        put(header.name.as_bytes())?;
        put(b": ")?;
        put(header.value.as_bytes())?;
        put(b"\r\n")?;
    }

    // Body
    if let Some(body) = request.body {
        let mut len_str: String<20> = String::new();
        write!(len_str, "{}", body.len()).map_err(|_| Error::BufferOverflow)?;
        put(b"Content-Length: ")?;
        put(len_str.as_bytes())?;
        put(b"\r\n\r\n")?;
        put(body)?;
    } else {
        put(b"\r\n")?;
    }

    Ok(buf)
}

/// Extracts the status code from `HTTP/1.1 200 OK`.
fn parse_status_line(line: &[u8]) -> Option<u16> {
    let line = core::str::from_utf8(line).ok()?;
    let mut parts = line.trim().splitn(3, ' ');
    if !parts.next()?.starts_with("HTTP/") {
        return None;
    }
    parts.next()?.parse().ok()
}

/// Returns the trimmed value if `line` is a header called `name`.
fn header_value<'l>(line: &'l [u8], name: &str) -> Option<&'l [u8]> {
    let colon = line.iter().position(|&b| b == b':')?;
    let (field, value) = line.split_at(colon);
    if field.trim_ascii().eq_ignore_ascii_case(name.as_bytes()) {
        Some(value[1..].trim_ascii())
    } else {
        None
    }
}
