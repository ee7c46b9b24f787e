//! An extended Kalman filter on SO(3) fusing gyroscope and accelerometer samples.

mod accel_noise;
mod filter;
mod shared;
mod timestep;
mod types;

pub use accel_noise::AdaptiveAccelNoise;
pub use filter::OrientationEkf;
pub use shared::SharedOrientationEkf;
pub use timestep::TimestepFilter;
pub use types::{AccelNoiseConfig, EkfConfig, TimestepConfig, GRAVITY};
