use crate::ekf::AccelNoiseConfig;

/// Accelerometer measurement noise that widens while the measured
/// specific-force magnitude fluctuates.
#[derive(Debug, Clone)]
pub struct AdaptiveAccelNoise {
    config: AccelNoiseConfig,
    previous_norm: f64,
    average_change: f64,
    variance: f64,
}

impl AdaptiveAccelNoise {
    /// Initializes a new [`AdaptiveAccelNoise`] at its minimum variance.
    pub fn new(config: AccelNoiseConfig) -> Self {
        let variance = config.min_sigma * config.min_sigma;
        Self {
            config,
            previous_norm: 0.0,
            average_change: 0.0,
            variance,
        }
    }

    /// Restores the state right after construction.
    pub fn reset(&mut self) {
        *self = Self::new(self.config.clone());
    }

    /// The current per-axis variance, in (m/s²)².
    #[inline]
    pub fn variance(&self) -> f64 {
        self.variance
    }

    /// Feeds the norm of a new sample and returns the updated variance.
    pub fn update(&mut self, norm: f64) -> f64 {
        let change = (norm - self.previous_norm).abs();
        self.previous_norm = norm;

        let alpha = self.config.smoothing;
        self.average_change = alpha * self.average_change + (1.0 - alpha) * change;

        let ratio = self.average_change / self.config.reference_norm_change;
        let sigma = self.config.max_sigma.min(
            self.config.min_sigma + ratio * (self.config.max_sigma - self.config.min_sigma),
        );

        self.variance = sigma * sigma;
        self.variance
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_initial_variance() {
        let noise = AdaptiveAccelNoise::new(AccelNoiseConfig::default());
        assert_eq!(noise.variance(), 0.5625);
    }

    #[test]
    fn test_settles_when_steady() {
        let mut noise = AdaptiveAccelNoise::new(AccelNoiseConfig::default());

        // The very first sample is a jump from zero.
        assert_eq!(noise.update(9.81), 49.0);

        for _ in 0..60 {
            noise.update(9.81);
        }
        assert_relative_eq!(noise.variance(), 0.5625, epsilon = 1e-9);
    }

    #[test]
    fn test_widens_when_volatile() {
        let mut noise = AdaptiveAccelNoise::new(AccelNoiseConfig::default());
        for i in 0..20 {
            noise.update(if i % 2 == 0 { 9.81 } else { 12.0 });
        }
        assert_eq!(noise.variance(), 49.0);
    }

    #[test]
    fn test_steady_and_volatile_from_same_start() {
        let mut steady = AdaptiveAccelNoise::new(AccelNoiseConfig::default());
        let mut volatile = steady.clone();

        for i in 0..60 {
            steady.update(9.81);
            volatile.update(if i % 2 == 0 { 9.81 } else { 12.0 });
        }

        assert_relative_eq!(steady.variance(), 0.5625, epsilon = 1e-9);
        assert_eq!(volatile.variance(), 49.0);
        assert!(volatile.variance() > steady.variance());
    }

    #[test]
    fn test_intermediate_change() {
        let mut noise = AdaptiveAccelNoise::new(AccelNoiseConfig::default());
        noise.update(9.81);
        for _ in 0..60 {
            noise.update(9.81);
        }

        // A single change of 0.06 averages to 0.03, a fifth of the reference.
        let variance = noise.update(9.87);
        let sigma = 0.75 + 0.2 * (7.0 - 0.75);
        assert_relative_eq!(variance, sigma * sigma, epsilon = 1e-9);
    }
}
