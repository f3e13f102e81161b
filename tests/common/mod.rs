//! Scripted collaborators for integration tests.
#![allow(dead_code)]

use sensorlink::network::error::Error;
use sensorlink::network::{Close, Connect, Connection, Endpoint, Link, Read, Write};
use sensorlink::sensor::{Reading, SensorReader};
use sensorlink::telemetry::Clock;
use sensorlink::telemetry::session::LOGIN_PATH;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

/// Largest slice handed out per `read`, small enough to split lines.
const READ_STEP: usize = 16;

/// Serves one canned response and records what was written to it.
#[derive(Debug)]
pub struct MockConnection {
    incoming: Vec<u8>,
    read_pos: usize,
    stalls: bool,
    written: Rc<RefCell<Vec<Vec<u8>>>>,
    index: usize,
    closes: Rc<Cell<usize>>,
}

impl Read for MockConnection {
    type Error = Error;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let remaining = &self.incoming[self.read_pos..];
        if remaining.is_empty() && self.stalls {
            return Err(Error::Timeout);
        }
        let n = remaining.len().min(buf.len()).min(READ_STEP);
        buf[..n].copy_from_slice(&remaining[..n]);
        self.read_pos += n;
        Ok(n)
    }
}

impl Write for MockConnection {
    type Error = Error;

    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        self.written.borrow_mut()[self.index].extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl Close for MockConnection {
    type Error = Error;

    fn close(self) -> Result<(), Self::Error> {
        self.closes.set(self.closes.get() + 1);
        Ok(())
    }
}

impl Connection for MockConnection {}

/// Hands out connections in script order. `None` refuses the connect; an
/// exhausted script refuses every further connect. A stalling connection
/// times out once its bytes are used up instead of reporting end of stream.
#[derive(Debug, Default)]
pub struct MockConnector {
    script: VecDeque<Option<(Vec<u8>, bool)>>,
    written: Rc<RefCell<Vec<Vec<u8>>>>,
    closes: Rc<Cell<usize>>,
    connects: usize,
    endpoints: Vec<(String, u16, bool, Duration)>,
}

impl MockConnector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, response: impl Into<Vec<u8>>) -> Self {
        self.script.push_back(Some((response.into(), false)));
        self
    }

    pub fn stall(mut self, partial: impl Into<Vec<u8>>) -> Self {
        self.script.push_back(Some((partial.into(), true)));
        self
    }

    pub fn refuse(mut self) -> Self {
        self.script.push_back(None);
        self
    }

    /// Connect attempts, refused ones included.
    pub fn connects(&self) -> usize {
        self.connects
    }

    pub fn closes(&self) -> usize {
        self.closes.get()
    }

    /// Raw requests of the connections that were opened, in order.
    pub fn requests(&self) -> Vec<String> {
        self.written
            .borrow()
            .iter()
            .map(|r| String::from_utf8_lossy(r).into_owned())
            .collect()
    }

    /// Request paths, in order.
    pub fn paths(&self) -> Vec<String> {
        self.requests()
            .iter()
            .map(|r| r.split(' ').nth(1).unwrap_or_default().to_string())
            .collect()
    }

    pub fn logins(&self) -> usize {
        self.paths().iter().filter(|p| *p == LOGIN_PATH).count()
    }

    pub fn sends(&self) -> usize {
        self.paths()
            .iter()
            .filter(|p| p.ends_with("/measurements"))
            .count()
    }

    pub fn endpoints(&self) -> &[(String, u16, bool, Duration)] {
        &self.endpoints
    }
}

impl Connect for MockConnector {
    type Connection = MockConnection;
    type Error = Error;

    fn connect(&mut self, endpoint: &Endpoint<'_>) -> Result<Self::Connection, Self::Error> {
        self.connects += 1;
        self.endpoints.push((
            endpoint.host.to_string(),
            endpoint.port,
            endpoint.verify_certificates,
            endpoint.read_timeout,
        ));
        let (incoming, stalls) = self
            .script
            .pop_front()
            .flatten()
            .ok_or(Error::ConnectionRefused)?;
        let mut written = self.written.borrow_mut();
        written.push(Vec::new());
        Ok(MockConnection {
            incoming,
            read_pos: 0,
            stalls,
            written: Rc::clone(&self.written),
            index: written.len() - 1,
            closes: Rc::clone(&self.closes),
        })
    }
}

/// Body of a request, everything after the blank line.
pub fn body_of(request: &str) -> &str {
    request.split_once("\r\n\r\n").map(|(_, b)| b).unwrap_or("")
}

/// A `200 OK` response carrying `json` in two chunks.
pub fn chunked(json: &str) -> Vec<u8> {
    let (head, tail) = json.split_at(json.len() / 2);
    let mut out = String::from(
        "HTTP/1.1 200 OK\r\nContent-Type: application/json; charset=utf-8\r\nTransfer-Encoding: chunked\r\nConnection: close\r\n\r\n",
    );
    for part in [head, tail] {
        if !part.is_empty() {
            out.push_str(&format!("{:x}\r\n{}\r\n", part.len(), part));
        }
    }
    out.push_str("0\r\n\r\n");
    out.into_bytes()
}

pub fn login_ok(token: &str) -> Vec<u8> {
    chunked(&format!(r#"{{"success":true,"data":{{"token":"{token}"}}}}"#))
}

pub fn login_denied() -> Vec<u8> {
    chunked(r#"{"success":false,"error":{"code":400,"message":"bad credentials"}}"#)
}

pub fn accepted() -> Vec<u8> {
    chunked(r#"{"success":true,"data":{"id":1}}"#)
}

pub fn unauthorized() -> Vec<u8> {
    chunked(r#"{"success":false,"error":{"code":401,"message":"jwt expired"}}"#)
}

pub fn rejected(code: i32) -> Vec<u8> {
    chunked(&format!(r#"{{"success":false,"error":{{"code":{code}}}}}"#))
}

/// Wi-Fi stand-in.
#[derive(Debug)]
pub struct MockLink {
    pub connected: bool,
    pub reconnect_succeeds: bool,
    pub reconnects: usize,
}

impl MockLink {
    pub fn up() -> Self {
        Self {
            connected: true,
            reconnect_succeeds: true,
            reconnects: 0,
        }
    }

    pub fn down(reconnect_succeeds: bool) -> Self {
        Self {
            connected: false,
            reconnect_succeeds,
            reconnects: 0,
        }
    }
}

impl Link for MockLink {
    type Error = ();

    fn is_connected(&mut self) -> bool {
        self.connected
    }

    fn reconnect(&mut self) -> Result<(), Self::Error> {
        self.reconnects += 1;
        if self.reconnect_succeeds {
            self.connected = true;
            Ok(())
        } else {
            Err(())
        }
    }
}

/// Returns queued readings; an empty queue is a read failure.
#[derive(Debug, Default)]
pub struct MockSensor {
    readings: VecDeque<Reading>,
    pub reads: usize,
}

impl MockSensor {
    pub fn with(readings: &[(f32, f32)]) -> Self {
        Self {
            readings: readings
                .iter()
                .map(|&(temperature, humidity)| Reading {
                    temperature,
                    humidity,
                })
                .collect(),
            reads: 0,
        }
    }
}

impl SensorReader for MockSensor {
    type Error = ();

    fn read(&mut self) -> Result<Reading, Self::Error> {
        self.reads += 1;
        self.readings.pop_front().ok_or(())
    }
}

/// Records requested sleeps instead of sleeping.
#[derive(Debug, Default)]
pub struct MockClock {
    pub slept: Vec<Duration>,
}

impl Clock for MockClock {
    fn sleep(&mut self, duration: Duration) {
        self.slept.push(duration);
    }
}
