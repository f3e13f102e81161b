//! # sensorlink - telemetry uplink for IoT sensor nodes
//!
//! A `no_std` library that takes periodic temperature and humidity readings
//! and delivers them to a REST API that authenticates clients with bearer
//! tokens. It is designed for microcontrollers with a TLS-capable network
//! stack and a few kilobytes of RAM to spare.
//!
//! ## Features
//!
//! - **Minimal HTTP/1.1 client**: one request per connection, chunked and
//!   `Content-Length` bodies, fixed-size buffers
//! - **Session handling**: login on demand, token kept until the service
//!   rejects it, a single transparent re-login per measurement
//! - **Agent loop**: sample, send both values, sleep; failed cycles retry
//!   sooner instead of waiting the full interval
//! - **Pluggable platform**: the sensor, the Wi-Fi link, the TLS connector and
//!   the clock are traits
//!
//! ## Usage
//!
//! ```rust,no_run
//! use core::time::Duration;
//! use sensorlink::config::Config;
//! use sensorlink::network::{Close, Connect, Connection, Endpoint, Link, Read, Write};
//! use sensorlink::sensor::{Reading, SensorReader};
//! use sensorlink::telemetry::{Agent, Clock};
//! # struct Tls;
//! # impl Read for Tls {
//! #     type Error = sensorlink::network::error::Error;
//! #     fn read(&mut self, _buf: &mut [u8]) -> Result<usize, Self::Error> { Ok(0) }
//! # }
//! # impl Write for Tls {
//! #     type Error = ();
//! #     fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> { Ok(buf.len()) }
//! #     fn flush(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! # }
//! # impl Close for Tls {
//! #     type Error = ();
//! #     fn close(self) -> Result<(), Self::Error> { Ok(()) }
//! # }
//! # impl Connection for Tls {}
//! # struct TlsConnector;
//! # impl Connect for TlsConnector {
//! #     type Connection = Tls;
//! #     type Error = ();
//! #     fn connect(&mut self, _endpoint: &Endpoint<'_>) -> Result<Tls, ()> { Ok(Tls) }
//! # }
//! # struct Wifi;
//! # impl Link for Wifi {
//! #     type Error = ();
//! #     fn is_connected(&mut self) -> bool { true }
//! #     fn reconnect(&mut self) -> Result<(), ()> { Ok(()) }
//! # }
//! # struct Dht22;
//! # impl SensorReader for Dht22 {
//! #     type Error = ();
//! #     fn read(&mut self) -> Result<Reading, ()> { Ok(Reading { temperature: 21.5, humidity: 40.0 }) }
//! # }
//! # struct Delay;
//! # impl Clock for Delay {
//! #     fn sleep(&mut self, _duration: Duration) {}
//! # }
//!
//! static CONFIG: Config<'static> = Config::new("api.example.com", "station-7", "hunter2");
//!
//! let mut agent = Agent::new(&CONFIG, Dht22, TlsConnector, Wifi, Delay);
//! agent.run();
//! ```
//!
//! ## Optional Features
//!
//! - `std`: host adapters (plain TCP connector with read deadlines, thread-sleep clock)
//! - `defmt`: log through `defmt`
//! - `log`: log through the `log` facade

#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![deny(missing_docs)]
#![warn(missing_debug_implementations)]

// Must come first so the logging macros are visible in every module.
mod fmt;

/// Agent configuration: endpoint, credentials, sensor ids and timings.
pub mod config;

/// Network abstraction layer: connection traits and the HTTP client.
pub mod network;

/// The sensor collaborator.
pub mod sensor;

/// Session handling, measurement delivery and the agent loop.
pub mod telemetry;
