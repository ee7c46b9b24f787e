use crate::types::{AccelerometerReading, GyroscopeReading};
use core::ops::Deref;

/// A sensor reading together with its timestamp.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Timed<R> {
    /// The sample time, in seconds. All samples of one session share a clock.
    pub time: f64,
    /// The reading.
    pub reading: R,
}

impl<R> Timed<R> {
    /// Initializes a new [`Timed`] instance.
    #[inline(always)]
    pub const fn new(time: f64, reading: R) -> Self {
        Self { time, reading }
    }

    /// Transforms the reading while keeping the timestamp.
    pub fn map<U, F>(self, f: F) -> Timed<U>
    where
        F: FnOnce(R) -> U,
    {
        Timed::new(self.time, f(self.reading))
    }
}

impl<R> Deref for Timed<R> {
    type Target = R;

    #[inline(always)]
    fn deref(&self) -> &Self::Target {
        &self.reading
    }
}

/// A fused platform motion sample: gravity and rotation rate observed at one instant.
#[derive(Debug, Copy, Clone, Default)]
pub struct DeviceMotion {
    /// The gravity direction in the device frame, in meters per second squared.
    pub gravity: AccelerometerReading<f64>,
    /// The rotation rate in the device frame, in radians per second.
    pub rotation_rate: GyroscopeReading<f64>,
}

impl DeviceMotion {
    /// Initializes a new [`DeviceMotion`] instance.
    pub const fn new(gravity: AccelerometerReading<f64>, rotation_rate: GyroscopeReading<f64>) -> Self {
        Self {
            gravity,
            rotation_rate,
        }
    }
}
