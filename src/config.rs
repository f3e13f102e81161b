//! Agent configuration.
//!
//! Firmware usually builds a [`Config`] from `&'static str` values baked in at
//! compile time; hosts can borrow them from anything that outlives the agent.
//!
//! ```rust
//! use core::time::Duration;
//! use sensorlink::config::Config;
//! use sensorlink::telemetry::SensorId;
//!
//! let config = Config::new("api.example.com", "station-7", "hunter2")
//!     .with_sensors(SensorId(3), SensorId(4))
//!     .with_interval(Duration::from_secs(300));
//!
//! assert_eq!(config.endpoint.port, 443);
//! assert!(config.endpoint.verify_certificates);
//! ```

#![allow(missing_docs)]

use crate::network::Endpoint;
use crate::telemetry::SensorId;
use core::time::Duration;

/// HTTPS port.
pub const DEFAULT_PORT: u16 = 443;
/// Per-read deadline on every connection.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(10);
/// Time between two successful measurement cycles.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(60);
/// Sensor id the service assigned to the temperature channel.
pub const DEFAULT_TEMPERATURE_SENSOR: SensorId = SensorId(3);
/// Sensor id the service assigned to the humidity channel.
pub const DEFAULT_HUMIDITY_SENSOR: SensorId = SensorId(4);

/// Account the agent logs in with.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Credentials<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

impl core::fmt::Debug for Credentials<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Everything the agent needs to know about its environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config<'a> {
    /// The API server.
    pub endpoint: Endpoint<'a>,
    pub credentials: Credentials<'a>,
    pub temperature_sensor: SensorId,
    pub humidity_sensor: SensorId,
    /// Delay after a cycle in which both measurements were delivered.
    pub interval: Duration,
    /// Delay after a cycle in which anything failed. Zero retries
    /// immediately.
    pub retry_delay: Duration,
}

impl<'a> Config<'a> {
    /// A configuration with default port, sensor ids and timings, and
    /// certificate validation enabled.
    pub const fn new(host: &'a str, username: &'a str, password: &'a str) -> Self {
        Self {
            endpoint: Endpoint {
                host,
                port: DEFAULT_PORT,
                verify_certificates: true,
                read_timeout: DEFAULT_READ_TIMEOUT,
            },
            credentials: Credentials { username, password },
            temperature_sensor: DEFAULT_TEMPERATURE_SENSOR,
            humidity_sensor: DEFAULT_HUMIDITY_SENSOR,
            interval: DEFAULT_INTERVAL,
            retry_delay: Duration::ZERO,
        }
    }

    pub const fn with_port(mut self, port: u16) -> Self {
        self.endpoint.port = port;
        self
    }

    pub const fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.endpoint.read_timeout = timeout;
        self
    }

    /// Disables server certificate validation. Only for test servers with
    /// self-signed certificates.
    pub const fn insecure(mut self) -> Self {
        self.endpoint.verify_certificates = false;
        self
    }

    pub const fn with_sensors(mut self, temperature: SensorId, humidity: SensorId) -> Self {
        self.temperature_sensor = temperature;
        self.humidity_sensor = humidity;
        self
    }

    pub const fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub const fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::new("example.com", "user", "secret");
        assert_eq!(config.endpoint.host, "example.com");
        assert_eq!(config.endpoint.port, 443);
        assert!(config.endpoint.verify_certificates);
        assert_eq!(config.endpoint.read_timeout, DEFAULT_READ_TIMEOUT);
        assert_eq!(config.temperature_sensor, SensorId(3));
        assert_eq!(config.humidity_sensor, SensorId(4));
        assert_eq!(config.interval, Duration::from_secs(60));
        assert_eq!(config.retry_delay, Duration::ZERO);
    }

    #[test]
    fn builders_override_defaults() {
        let config = Config::new("localhost", "user", "secret")
            .with_port(8443)
            .insecure()
            .with_read_timeout(Duration::from_secs(2))
            .with_retry_delay(Duration::from_secs(5));
        assert_eq!(config.endpoint.port, 8443);
        assert!(!config.endpoint.verify_certificates);
        assert_eq!(config.endpoint.read_timeout, Duration::from_secs(2));
        assert_eq!(config.retry_delay, Duration::from_secs(5));
    }

    #[test]
    fn password_is_not_printed() {
        let config = Config::new("localhost", "user", "secret");
        let printed = std::format!("{:?}", config.credentials);
        assert!(printed.contains("user"));
        assert!(!printed.contains("secret"));
    }
}
