use crate::ekf::TimestepConfig;

/// Exponential moving average of the gyro sample interval.
#[derive(Debug, Clone)]
pub struct TimestepFilter {
    config: TimestepConfig,
    filtered: f64,
    samples: usize,
}

impl TimestepFilter {
    /// Initializes a new, empty [`TimestepFilter`].
    pub fn new(config: TimestepConfig) -> Self {
        Self {
            config,
            filtered: 0.0,
            samples: 0,
        }
    }

    /// Forgets all observed intervals.
    pub fn reset(&mut self) {
        self.filtered = 0.0;
        self.samples = 0;
    }

    /// Whether enough intervals were observed to trust the average.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.samples >= self.config.min_samples
    }

    /// The smoothed interval, if one was observed yet.
    pub fn nominal(&self) -> Option<f64> {
        (self.samples > 0).then_some(self.filtered)
    }

    /// Returns the interval to integrate over for a raw interval `dt`.
    ///
    /// Regular intervals are returned unchanged and update the average.
    /// Gaps and non-increasing timestamps are replaced by the average, or by
    /// the configured fallback while the average is not yet valid.
    pub fn resolve(&mut self, dt: f64) -> f64 {
        if dt > self.config.gap_threshold || dt <= 0.0 || dt.is_nan() {
            let substitute = if self.is_valid() {
                self.filtered
            } else {
                self.config.fallback
            };
            tracing::debug!(dt, substitute, "Substituting gyro timestep");
            return substitute;
        }

        if self.samples == 0 {
            self.filtered = dt;
        } else {
            let alpha = self.config.smoothing;
            self.filtered = alpha * self.filtered + (1.0 - alpha) * dt;
        }
        self.samples = self.samples.saturating_add(1);
        dt
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_first_value_initializes() {
        let mut filter = TimestepFilter::new(TimestepConfig::default());
        assert_eq!(filter.nominal(), None);
        assert_eq!(filter.resolve(0.01), 0.01);
        assert_eq!(filter.nominal(), Some(0.01));
    }

    #[test]
    fn test_moving_average() {
        let mut filter = TimestepFilter::new(TimestepConfig::default());
        filter.resolve(0.01);
        filter.resolve(0.02);
        assert_relative_eq!(filter.nominal().unwrap_or_default(), 0.0105, epsilon = 1e-15);
    }

    #[test]
    fn test_gap_uses_fallback_until_valid() {
        let mut filter = TimestepFilter::new(TimestepConfig::default());
        for _ in 0..9 {
            filter.resolve(0.005);
        }
        assert!(!filter.is_valid());
        assert_eq!(filter.resolve(0.5), 0.01);

        filter.resolve(0.005);
        assert!(filter.is_valid());
        assert_relative_eq!(filter.resolve(0.5), 0.005, epsilon = 1e-15);
    }

    #[test]
    fn test_non_increasing_timestamps_are_gaps() {
        let mut filter = TimestepFilter::new(TimestepConfig::default());
        assert_eq!(filter.resolve(0.0), 0.01);
        assert_eq!(filter.resolve(-0.003), 0.01);
        assert_eq!(filter.nominal(), None, "gaps do not feed the average");
    }
}
