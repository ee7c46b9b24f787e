//! Error types

use crate::head_tracker::SensorSubscription;
use thiserror::Error;

/// Errors raised while validating a configuration.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A constant that must be strictly positive is not
    #[error("{name} must be finite and positive, got {value}")]
    NotPositive { name: &'static str, value: f64 },

    /// A constant that must not be negative is
    #[error("{name} must be finite and non-negative, got {value}")]
    Negative { name: &'static str, value: f64 },

    /// The lower bound of a range exceeds its upper bound
    #[error("{name} range is inverted: {min} > {max}")]
    InvertedRange {
        name: &'static str,
        min: f64,
        max: f64,
    },

    /// A smoothing factor lies outside `[0, 1)`
    #[error("{name} must lie in [0, 1), got {value}")]
    FactorOutOfRange { name: &'static str, value: f64 },
}

impl ConfigError {
    /// Ensures `value` is finite and strictly positive.
    pub(crate) fn check_positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
        if value.is_finite() && value > 0.0 {
            Ok(())
        } else {
            Err(ConfigError::NotPositive { name, value })
        }
    }

    /// Ensures `value` is finite and not negative.
    pub(crate) fn check_non_negative(name: &'static str, value: f64) -> Result<(), ConfigError> {
        if value.is_finite() && value >= 0.0 {
            Ok(())
        } else {
            Err(ConfigError::Negative { name, value })
        }
    }

    /// Ensures `value` lies in `[0, 1)`.
    pub(crate) fn check_factor(name: &'static str, value: f64) -> Result<(), ConfigError> {
        if (0.0..1.0).contains(&value) {
            Ok(())
        } else {
            Err(ConfigError::FactorOutOfRange { name, value })
        }
    }
}

/// Result type for tracker operations
pub type TrackerResult<T> = Result<T, TrackerError>;

/// Errors that can occur while setting up or starting a tracker
#[derive(Error, Debug)]
pub enum TrackerError {
    /// The configuration was rejected
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// The motion source cannot deliver a required sensor stream
    #[error("Sensor stream unavailable: {0}")]
    SensorUnavailable(SensorSubscription),
}
