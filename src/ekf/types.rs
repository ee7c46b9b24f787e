use crate::error::ConfigError;

/// The gravity magnitude the filter expects at rest, in meters per second squared.
pub const GRAVITY: f64 = 9.81;

/// Tuning of the orientation filter.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EkfConfig {
    /// Diagonal of the initial state covariance, in rad².
    pub initial_covariance: f64,
    /// Diagonal of the process noise, scaled by `dt²` on every gyro step.
    pub process_noise: f64,
    /// The gravity magnitude; the world-down vector is `(0, 0, -gravity)`.
    pub gravity: f64,
    /// Step size of the numerical observation Jacobian, in radians.
    pub jacobian_epsilon: f64,
    /// Gyro timestep smoothing.
    pub timestep: TimestepConfig,
    /// Adaptive accelerometer noise.
    pub accel_noise: AccelNoiseConfig,
}

impl Default for EkfConfig {
    fn default() -> Self {
        Self {
            initial_covariance: 25.0,
            process_noise: 1.0,
            gravity: GRAVITY,
            jacobian_epsilon: 1.0e-7,
            timestep: TimestepConfig::default(),
            accel_noise: AccelNoiseConfig::default(),
        }
    }
}

impl EkfConfig {
    /// Checks every constant for a usable value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        ConfigError::check_positive("initial_covariance", self.initial_covariance)?;
        ConfigError::check_non_negative("process_noise", self.process_noise)?;
        ConfigError::check_positive("gravity", self.gravity)?;
        ConfigError::check_positive("jacobian_epsilon", self.jacobian_epsilon)?;
        self.timestep.validate()?;
        self.accel_noise.validate()
    }
}

/// Smoothing of the gyro sample interval.
///
/// Intervals longer than [`gap_threshold`](Self::gap_threshold), as well as
/// non-increasing timestamps, are replaced by the smoothed interval.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TimestepConfig {
    /// Intervals above this are treated as dropped samples, in seconds.
    pub gap_threshold: f64,
    /// Weight of the previous estimate in the moving average.
    pub smoothing: f64,
    /// Number of intervals the average must have seen before it is trusted.
    pub min_samples: usize,
    /// Interval used in place of an untrusted average, in seconds.
    pub fallback: f64,
}

impl Default for TimestepConfig {
    fn default() -> Self {
        Self {
            gap_threshold: 0.04,
            smoothing: 0.95,
            min_samples: 10,
            fallback: 0.01,
        }
    }
}

impl TimestepConfig {
    /// Checks every constant for a usable value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        ConfigError::check_positive("timestep.gap_threshold", self.gap_threshold)?;
        ConfigError::check_factor("timestep.smoothing", self.smoothing)?;
        ConfigError::check_positive("timestep.fallback", self.fallback)
    }
}

/// Scaling of the accelerometer measurement noise with the volatility of the
/// measured specific-force magnitude.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AccelNoiseConfig {
    /// Weight of the previous average in the moving average of norm changes.
    pub smoothing: f64,
    /// Average norm change at which the noise reaches its maximum, in m/s².
    pub reference_norm_change: f64,
    /// Standard deviation while the device is steady, in m/s².
    pub min_sigma: f64,
    /// Upper bound of the standard deviation, in m/s².
    pub max_sigma: f64,
}

impl Default for AccelNoiseConfig {
    fn default() -> Self {
        Self {
            smoothing: 0.5,
            reference_norm_change: 0.15,
            min_sigma: 0.75,
            max_sigma: 7.0,
        }
    }
}

impl AccelNoiseConfig {
    /// Checks every constant for a usable value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        ConfigError::check_factor("accel_noise.smoothing", self.smoothing)?;
        ConfigError::check_positive("accel_noise.reference_norm_change", self.reference_norm_change)?;
        ConfigError::check_positive("accel_noise.min_sigma", self.min_sigma)?;
        ConfigError::check_positive("accel_noise.max_sigma", self.max_sigma)?;
        if self.min_sigma > self.max_sigma {
            return Err(ConfigError::InvertedRange {
                name: "accel_noise.sigma",
                min: self.min_sigma,
                max: self.max_sigma,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert_eq!(EkfConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_rejects_inverted_sigma() {
        let mut config = EkfConfig::default();
        config.accel_noise.min_sigma = 8.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvertedRange { .. })
        ));
    }

    #[test]
    fn test_rejects_bad_smoothing() {
        let mut config = EkfConfig::default();
        config.timestep.smoothing = 1.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::FactorOutOfRange { .. })
        ));
    }
}
