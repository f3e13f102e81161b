//! Measurement delivery.
//!
//! [`Uplink::deliver`] runs a small, strictly bounded state machine:
//!
//! ```text
//! CheckConnectivity -> CheckSession -> Send -> Interpret
//!                                       ^          |
//!                                       |   401, first time: invalidate, log in again
//!                                       +----------+
//! ```
//!
//! Any other outcome of `Interpret` ends the call. A second 401 ends it too,
//! so a server that rejects every token costs exactly two sends per
//! measurement.

use super::session::{AuthError, MAX_TOKEN_LEN, Session};
use super::{Api, Measurement, SensorId};
use crate::config::Config;
use crate::network::application::http::{Header, Method, Request};
use crate::network::error::Error;
use crate::network::{Connect, Link};
use core::fmt::Write;
use heapless::{String, Vec};
use serde::{Deserialize, Serialize};

/// How many times one delivery may log in again after a 401.
pub const MAX_REAUTHENTICATIONS: usize = 1;

/// Error code the service uses for a missing, expired or revoked token.
const UNAUTHORIZED: i32 = 401;

const MAX_PATH_LEN: usize = 64;
const MAX_MEASUREMENT_BODY_LEN: usize = 64;

/// Why a measurement was not delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryError {
    /// The link was down and could not be brought back up.
    Offline,
    /// No token was held and logging in failed.
    Auth(AuthError),
    /// The measurement exchange failed at the connection or HTTP level.
    Transport(Error),
    /// The value could not be encoded, for example because it is NaN.
    Encode,
    /// The reply was not the expected JSON.
    Malformed,
    /// The service rejected the token again after a fresh login.
    Unauthorized,
    /// The service answered `"success": false` for another reason.
    Rejected {
        /// `error.code` from the reply, if present.
        code: Option<i32>,
    },
}

#[cfg(feature = "defmt")]
impl defmt::Format for DeliveryError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            DeliveryError::Offline => defmt::write!(f, "Offline"),
            DeliveryError::Auth(e) => defmt::write!(f, "Auth({})", e),
            DeliveryError::Transport(e) => defmt::write!(f, "Transport({})", e),
            DeliveryError::Encode => defmt::write!(f, "Encode"),
            DeliveryError::Malformed => defmt::write!(f, "Malformed"),
            DeliveryError::Unauthorized => defmt::write!(f, "Unauthorized"),
            DeliveryError::Rejected { code } => defmt::write!(f, "Rejected({})", code),
        }
    }
}

/// What the service said about one measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Accepted,
    Unauthorized,
    Rejected { code: Option<i32> },
}

#[derive(Serialize)]
struct MeasurementBody {
    value: f32,
}

#[derive(Deserialize)]
struct Reply {
    success: bool,
    #[serde(default)]
    error: Option<ReplyError>,
}

#[derive(Deserialize)]
struct ReplyError {
    #[serde(default)]
    code: Option<i32>,
}

/// Reads the service's verdict from a reply body.
pub fn interpret(body: &[u8]) -> Result<Verdict, DeliveryError> {
    let (reply, _) =
        serde_json_core::from_slice::<Reply>(body).map_err(|_| DeliveryError::Malformed)?;
    if reply.success {
        return Ok(Verdict::Accepted);
    }
    match reply.error.and_then(|e| e.code) {
        Some(UNAUTHORIZED) => Ok(Verdict::Unauthorized),
        code => Ok(Verdict::Rejected { code }),
    }
}

/// Path measurements for `sensor` are posted to.
pub fn measurement_path(sensor: SensorId) -> Result<String<MAX_PATH_LEN>, DeliveryError> {
    let mut path = String::new();
    write!(path, "/api/sensors/{}/measurements", sensor.0).map_err(|_| DeliveryError::Encode)?;
    Ok(path)
}

/// Delivers measurements over authenticated exchanges.
///
/// The uplink owns the only [`Session`]; deliveries are strictly sequential.
#[derive(Debug)]
pub struct Uplink<'a, C: Connect, L: Link> {
    api: Api<'a, C>,
    session: Session<'a>,
    link: L,
}

impl<'a, C: Connect, L: Link> Uplink<'a, C, L> {
    pub fn new(config: &Config<'a>, connector: C, link: L) -> Self {
        Self {
            api: Api::new(connector, config.endpoint),
            session: Session::new(config.credentials),
            link,
        }
    }

    pub fn session(&self) -> &Session<'a> {
        &self.session
    }

    pub fn api(&self) -> &Api<'a, C> {
        &self.api
    }

    pub fn link(&self) -> &L {
        &self.link
    }

    /// Brings the link up if it is down.
    pub fn ensure_online(&mut self) -> Result<(), DeliveryError> {
        if self.link.is_connected() {
            return Ok(());
        }
        warn!("link down, reconnecting");
        match self.link.reconnect() {
            Ok(()) => {
                info!("link back up");
                Ok(())
            }
            Err(_) => Err(DeliveryError::Offline),
        }
    }

    /// Logs in unless a token is already held.
    pub fn authenticate(&mut self) -> Result<(), AuthError> {
        self.session.ensure_authenticated(&mut self.api)
    }

    /// Uploads one measurement.
    ///
    /// Failures are logged here; the caller only needs the outcome.
    pub fn deliver(&mut self, measurement: &Measurement) -> Result<(), DeliveryError> {
        let result = self.try_deliver(measurement);
        match &result {
            Ok(()) => info!(
                "sensor {}: delivered {}",
                measurement.sensor_id, measurement.value
            ),
            Err(e) => warn!(
                "sensor {}: {} not delivered: {:?}",
                measurement.sensor_id, measurement.value, e
            ),
        }
        result
    }

    fn try_deliver(&mut self, measurement: &Measurement) -> Result<(), DeliveryError> {
        self.ensure_online()?;

        if !self.session.is_authenticated() {
            debug!("sensor {}: no token, logging in", measurement.sensor_id);
            self.session
                .ensure_authenticated(&mut self.api)
                .map_err(DeliveryError::Auth)?;
        }

        if !measurement.value.is_finite() {
            return Err(DeliveryError::Encode);
        }
        let body: Vec<u8, MAX_MEASUREMENT_BODY_LEN> = serde_json_core::to_vec(&MeasurementBody {
            value: measurement.value,
        })
        .map_err(|_| DeliveryError::Encode)?;
        let path = measurement_path(measurement.sensor_id)?;

        let mut reauthentications = 0;
        loop {
            match self.send(&path, &body)? {
                Verdict::Accepted => return Ok(()),
                Verdict::Unauthorized => {
                    // Never retry with a token the service has refused.
                    self.session.invalidate();
                    if reauthentications == MAX_REAUTHENTICATIONS {
                        return Err(DeliveryError::Unauthorized);
                    }
                    reauthentications += 1;
                    info!(
                        "sensor {}: token rejected, logging in again",
                        measurement.sensor_id
                    );
                    self.session
                        .ensure_authenticated(&mut self.api)
                        .map_err(DeliveryError::Auth)?;
                }
                Verdict::Rejected { code } => return Err(DeliveryError::Rejected { code }),
            }
        }
    }

    /// One measurement exchange under the current token.
    fn send(&mut self, path: &str, body: &[u8]) -> Result<Verdict, DeliveryError> {
        let token = self.session.token().ok_or(DeliveryError::Unauthorized)?;
        let mut authorization: String<{ MAX_TOKEN_LEN + 7 }> = String::new();
        write!(authorization, "Bearer {}", token).map_err(|_| DeliveryError::Encode)?;

        let headers = [
            Header::new("Content-Type", "application/json"),
            Header::new("Authorization", &authorization),
        ];
        let request = Request {
            method: Method::Post,
            path,
            headers: &headers,
            body: Some(body),
        };
        let response = self
            .api
            .exchange(&request)
            .map_err(DeliveryError::Transport)?;
        if let Some(status) = response.status.filter(|s| !(200..300).contains(s)) {
            debug!("{} answered with HTTP status {}", path, status);
        }
        interpret(&response.body)
    }
}
