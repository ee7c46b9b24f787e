mod accelerometer_reading;
mod euler_angles;
mod gyroscope_reading;
mod matrix3x3;
mod matrix4;
mod quaternion;
mod timed;
mod vector3;

pub use crate::types::accelerometer_reading::{AccelerometerReading, STANDARD_GRAVITY};
pub use crate::types::euler_angles::EulerAngles;
pub use crate::types::gyroscope_reading::GyroscopeReading;
pub use crate::types::matrix3x3::{Matrix3x3, Matrix3x3d};
pub use crate::types::matrix4::Matrix4;
pub use crate::types::quaternion::Quaternion;
pub use crate::types::timed::{DeviceMotion, Timed};
pub use crate::types::vector3::{Vector3, Vector3d};

