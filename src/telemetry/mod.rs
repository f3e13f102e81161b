//! # Telemetry uplink
//!
//! Delivers measurements to the REST API of the monitoring service.
//!
//! ## Protocol
//!
//! | Step        | Request                                   | Success reply                               |
//! |-------------|-------------------------------------------|---------------------------------------------|
//! | Login       | `POST /api/auth/login/employee`           | `{"success":true,"data":{"token":"..."}}`   |
//! | Measurement | `POST /api/sensors/{id}/measurements`     | `{"success":true,...}`                      |
//!
//! Measurement requests carry `Authorization: Bearer <token>`. An expired or
//! revoked token is reported in the body as
//! `{"success":false,"error":{"code":401}}`; the HTTP status is logged but
//! never decides anything.
//!
//! ## Layers
//!
//! - [`Api`]: connector plus endpoint, one connection per exchange
//! - [`Session`]: the bearer token and the login exchange
//! - [`Uplink`]: delivery of one measurement with a single re-login retry
//! - [`Agent`]: the periodic sample-and-send cycle

#![allow(missing_docs)]

use crate::network::application::http::{self, Request, Response};
use crate::network::error::Error;
use crate::network::{Connect, Endpoint};
use core::time::Duration;

pub mod agent;
pub mod session;
pub mod uplink;

pub use agent::{Agent, Cycle};
pub use session::{AuthError, Session};
pub use uplink::{DeliveryError, Uplink};

/// Identifier the service assigned to one measurement channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SensorId(pub u16);

impl core::fmt::Display for SensorId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single value to upload.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Measurement {
    pub sensor_id: SensorId,
    pub value: f32,
}

impl Measurement {
    pub const fn new(sensor_id: SensorId, value: f32) -> Self {
        Self { sensor_id, value }
    }
}

/// Blocking delays between cycles.
pub trait Clock {
    fn sleep(&mut self, duration: Duration);
}

/// A [`Clock`] backed by `std::thread::sleep`.
#[cfg(feature = "std")]
#[derive(Debug, Default, Clone, Copy)]
pub struct StdClock;

#[cfg(feature = "std")]
impl Clock for StdClock {
    fn sleep(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// The remote API: where it is and how to reach it.
#[derive(Debug)]
pub struct Api<'a, C: Connect> {
    connector: C,
    endpoint: Endpoint<'a>,
}

impl<'a, C: Connect> Api<'a, C> {
    pub fn new(connector: C, endpoint: Endpoint<'a>) -> Self {
        Self {
            connector,
            endpoint,
        }
    }

    /// Performs one request on a fresh connection.
    pub fn exchange(&mut self, request: &Request<'_>) -> Result<Response, Error> {
        http::exchange(&mut self.connector, &self.endpoint, request)
    }

    pub fn endpoint(&self) -> &Endpoint<'a> {
        &self.endpoint
    }

    pub fn connector(&self) -> &C {
        &self.connector
    }

    pub fn connector_mut(&mut self) -> &mut C {
        &mut self.connector
    }
}
