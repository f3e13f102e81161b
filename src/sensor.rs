//! Sensor collaborator.
//!
//! The agent samples one combined temperature/humidity sensor per cycle (a
//! DHT22, SHT4x or similar). Drivers implement [`SensorReader`]; the agent
//! never talks to the bus itself.

/// One sample from a combined temperature/humidity sensor.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Reading {
    /// Temperature in degrees Celsius.
    pub temperature: f32,
    /// Relative humidity in percent.
    pub humidity: f32,
}

impl Reading {
    /// Whether both values are finite numbers.
    ///
    /// Some drivers report a failed conversion as NaN instead of an error.
    pub fn is_valid(&self) -> bool {
        self.temperature.is_finite() && self.humidity.is_finite()
    }
}

/// A driver that can take a [`Reading`].
pub trait SensorReader {
    /// Driver error type
    type Error: core::fmt::Debug;
    /// Takes one blocking sample.
    fn read(&mut self) -> Result<Reading, Self::Error>;
}
