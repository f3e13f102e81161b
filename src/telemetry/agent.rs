//! The periodic measurement cycle.
//!
//! Each cycle takes one sensor reading and delivers temperature, then
//! humidity. After a fully successful cycle the agent waits the configured
//! interval; after any failure it waits only the retry delay, so a dropped
//! measurement is replaced by a fresh one as soon as possible.

use super::uplink::{DeliveryError, Uplink};
use super::{Clock, Measurement, SensorId};
use crate::config::Config;
use crate::network::{Connect, Link};
use crate::sensor::SensorReader;
use core::time::Duration;

/// Outcome of one cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cycle {
    /// The sensor could not be read; nothing was sent.
    SensorFailed,
    /// Both measurements were attempted.
    Sent {
        temperature: Result<(), DeliveryError>,
        humidity: Result<(), DeliveryError>,
    },
}

impl Cycle {
    /// Whether both measurements were delivered.
    pub fn is_complete(&self) -> bool {
        matches!(
            self,
            Cycle::Sent {
                temperature: Ok(()),
                humidity: Ok(()),
            }
        )
    }
}

/// Samples the sensor and uploads the values, forever.
#[derive(Debug)]
pub struct Agent<'a, S, C, L, K>
where
    S: SensorReader,
    C: Connect,
    L: Link,
    K: Clock,
{
    sensor: S,
    uplink: Uplink<'a, C, L>,
    clock: K,
    temperature_sensor: SensorId,
    humidity_sensor: SensorId,
    interval: Duration,
    retry_delay: Duration,
}

impl<'a, S, C, L, K> Agent<'a, S, C, L, K>
where
    S: SensorReader,
    C: Connect,
    L: Link,
    K: Clock,
{
    pub fn new(config: &Config<'a>, sensor: S, connector: C, link: L, clock: K) -> Self {
        Self {
            sensor,
            uplink: Uplink::new(config, connector, link),
            clock,
            temperature_sensor: config.temperature_sensor,
            humidity_sensor: config.humidity_sensor,
            interval: config.interval,
            retry_delay: config.retry_delay,
        }
    }

    pub fn uplink(&self) -> &Uplink<'a, C, L> {
        &self.uplink
    }

    pub fn sensor(&self) -> &S {
        &self.sensor
    }

    pub fn clock(&self) -> &K {
        &self.clock
    }

    /// Best-effort bring-up: connect the link and log in once.
    ///
    /// Failures are only logged; the first cycle retries both.
    pub fn start(&mut self) {
        if self.uplink.ensure_online().is_err() {
            warn!("link still down at startup");
            return;
        }
        if self.uplink.authenticate().is_err() {
            error!("no session token at startup, check the credentials");
        }
    }

    /// Takes one reading and delivers both values.
    pub fn run_cycle(&mut self) -> Cycle {
        let reading = match self.sensor.read() {
            Ok(reading) if reading.is_valid() => reading,
            Ok(_) => {
                warn!("sensor returned a non-finite reading");
                return Cycle::SensorFailed;
            }
            Err(_) => {
                warn!("sensor read failed");
                return Cycle::SensorFailed;
            }
        };
        info!(
            "temperature {} C, humidity {} %",
            reading.temperature, reading.humidity
        );

        let temperature = self
            .uplink
            .deliver(&Measurement::new(self.temperature_sensor, reading.temperature));
        let humidity = self
            .uplink
            .deliver(&Measurement::new(self.humidity_sensor, reading.humidity));
        Cycle::Sent {
            temperature,
            humidity,
        }
    }

    /// How long to wait after `cycle`.
    pub fn next_delay(&self, cycle: &Cycle) -> Duration {
        if cycle.is_complete() {
            self.interval
        } else {
            self.retry_delay
        }
    }

    /// Runs cycles until power-off.
    pub fn run(&mut self) -> ! {
        self.start();
        loop {
            let cycle = self.run_cycle();
            let delay = self.next_delay(&cycle);
            if !cycle.is_complete() {
                warn!("cycle incomplete, next attempt in {} ms", delay.as_millis() as u64);
            }
            self.clock.sleep(delay);
        }
    }
}
