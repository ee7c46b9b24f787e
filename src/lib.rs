//! Head orientation tracking for stereo displays.
//!
//! Gyroscope and accelerometer samples are fused by an extended Kalman filter
//! whose state lives on SO(3); a [`HeadTracker`] turns the filter estimate into
//! a world-to-display transform, predicted ahead to hide rendering latency.

// Ensure forbid(unsafe_code) markers.
#![forbid(unsafe_code)]
// Only enables the `doc_cfg` feature when the `docsrs` configuration attribute is defined.
#![cfg_attr(docsrs, feature(doc_cfg))]

mod macros;

pub mod ekf;
pub mod error;
pub mod head_tracker;
pub mod head_transform;
pub mod so3;
pub mod types;

pub use crate::ekf::{EkfConfig, OrientationEkf, SharedOrientationEkf};
pub use crate::error::{ConfigError, TrackerError, TrackerResult};
pub use crate::head_tracker::{
    HeadTracker, MotionSource, NeckModelConfig, SensorSink, SensorSubscription, TrackerConfig,
    TrackingMode,
};
pub use crate::head_transform::HeadTransform;
pub use crate::types::{
    AccelerometerReading, DeviceMotion, EulerAngles, GyroscopeReading, Matrix3x3, Matrix4,
    Quaternion, Timed, Vector3,
};
