use crate::ekf::EkfConfig;
use crate::error::ConfigError;
use core::fmt::{Display, Formatter};

/// How sensor data becomes an orientation. Fixed for the lifetime of a tracker.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TrackingMode {
    /// Separate gyroscope and accelerometer streams feed the filter.
    #[default]
    Ekf,
    /// A combined device-motion stream feeds the filter; gravity is used as
    /// the accelerometer sample, the rotation rate as the gyro sample.
    DeviceMotionEkf,
    /// The platform's own attitude estimate is used without filtering.
    DeviceAttitude,
}

impl TrackingMode {
    /// The sensor streams a [`MotionSource`](crate::MotionSource) must deliver in this mode.
    pub const fn subscription(self) -> SensorSubscription {
        match self {
            TrackingMode::Ekf => SensorSubscription::GyroscopeAndAccelerometer,
            TrackingMode::DeviceMotionEkf => SensorSubscription::DeviceMotion,
            TrackingMode::DeviceAttitude => SensorSubscription::Attitude,
        }
    }

    /// Whether the mode runs the orientation filter.
    pub const fn uses_filter(self) -> bool {
        !matches!(self, TrackingMode::DeviceAttitude)
    }
}

/// A set of sensor streams requested from a [`MotionSource`](crate::MotionSource).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SensorSubscription {
    /// Raw gyroscope and accelerometer samples.
    GyroscopeAndAccelerometer,
    /// Fused gravity and rotation rate samples.
    DeviceMotion,
    /// Platform attitude matrices.
    Attitude,
}

impl Display for SensorSubscription {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            SensorSubscription::GyroscopeAndAccelerometer => "gyroscope and accelerometer",
            SensorSubscription::DeviceMotion => "device motion",
            SensorSubscription::Attitude => "attitude",
        };
        f.write_str(name)
    }
}

/// Offsets of the eyes from the neck pivot, in meters.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct NeckModelConfig {
    /// Height of the eyes above the pivot.
    pub vertical_offset: f64,
    /// Distance of the eyes in front of the pivot.
    pub horizontal_offset: f64,
}

impl Default for NeckModelConfig {
    fn default() -> Self {
        Self {
            vertical_offset: 0.075,
            horizontal_offset: 0.08,
        }
    }
}

impl NeckModelConfig {
    /// Checks both offsets for usable values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        ConfigError::check_non_negative("neck_model.vertical_offset", self.vertical_offset)?;
        ConfigError::check_non_negative("neck_model.horizontal_offset", self.horizontal_offset)
    }
}

/// Configuration of a [`HeadTracker`](crate::HeadTracker).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TrackerConfig {
    /// How sensor data becomes an orientation.
    pub mode: TrackingMode,
    /// Time added on top of the age of the last gyro sample when predicting
    /// the head view, in seconds; typically one display frame.
    pub prediction_horizon: f64,
    /// Number of accelerometer or device-motion samples discarded after each start.
    pub initial_skip_samples: usize,
    /// Whether the neck model offsets are applied.
    pub neck_model_enabled: bool,
    /// The neck model geometry.
    pub neck_model: NeckModelConfig,
    /// The filter tuning.
    pub ekf: EkfConfig,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            mode: TrackingMode::default(),
            prediction_horizon: 1.0 / 30.0,
            initial_skip_samples: 10,
            neck_model_enabled: false,
            neck_model: NeckModelConfig::default(),
            ekf: EkfConfig::default(),
        }
    }
}

impl TrackerConfig {
    /// Checks every nested configuration for usable values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        ConfigError::check_non_negative("prediction_horizon", self.prediction_horizon)?;
        self.neck_model.validate()?;
        self.ekf.validate()
    }
}
