use crate::ekf::accel_noise::AdaptiveAccelNoise;
use crate::ekf::timestep::TimestepFilter;
use crate::ekf::EkfConfig;
use crate::error::ConfigError;
use crate::so3;
use crate::types::{AccelerometerReading, GyroscopeReading, Matrix3x3d, Matrix4, Vector3d};

/// An extended Kalman filter estimating the rotation from the world frame to
/// the sensor frame.
///
/// The state is a rotation matrix; its uncertainty is a 3×3 covariance over
/// rotation vectors applied on the left. Gyroscope samples drive the
/// prediction, accelerometer samples correct tilt against gravity. The first
/// accelerometer sample after a reset aligns the filter to gravity directly.
#[derive(Debug, Clone)]
pub struct OrientationEkf {
    config: EkfConfig,
    so3_sensor_from_world: Matrix3x3d,
    covariance: Matrix3x3d,
    process_noise: Matrix3x3d,
    accel_noise: AdaptiveAccelNoise,
    timestep: TimestepFilter,
    down: Vector3d,
    last_gyro: Vector3d,
    last_gyro_time: Option<f64>,
    aligned: bool,
}

impl OrientationEkf {
    /// Initializes a new [`OrientationEkf`] in the unaligned state.
    ///
    /// ## Arguments
    /// * `config` - The filter tuning; rejected if any constant is unusable.
    pub fn new(config: EkfConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::with_config(config))
    }

    fn with_config(config: EkfConfig) -> Self {
        Self {
            so3_sensor_from_world: Matrix3x3d::identity(),
            covariance: Matrix3x3d::from_diagonal(config.initial_covariance),
            process_noise: Matrix3x3d::from_diagonal(config.process_noise),
            accel_noise: AdaptiveAccelNoise::new(config.accel_noise.clone()),
            timestep: TimestepFilter::new(config.timestep.clone()),
            down: Vector3d::new(0.0, 0.0, -config.gravity),
            last_gyro: Vector3d::zero(),
            last_gyro_time: None,
            aligned: false,
            config,
        }
    }

    /// Returns the filter to its initial unaligned state.
    pub fn reset(&mut self) {
        self.so3_sensor_from_world = Matrix3x3d::identity();
        self.covariance = Matrix3x3d::from_diagonal(self.config.initial_covariance);
        self.accel_noise.reset();
        self.timestep.reset();
        self.last_gyro = Vector3d::zero();
        self.last_gyro_time = None;
        self.aligned = false;
    }

    /// Gets the configuration the filter was built with.
    pub fn config(&self) -> &EkfConfig {
        &self.config
    }

    /// Whether the filter was aligned to gravity since the last reset.
    #[inline]
    pub fn is_aligned(&self) -> bool {
        self.aligned
    }

    /// The current estimate of the rotation from world to sensor frame.
    #[inline]
    pub fn rotation(&self) -> Matrix3x3d {
        self.so3_sensor_from_world
    }

    /// The state covariance, in rad².
    #[inline]
    pub fn covariance(&self) -> Matrix3x3d {
        self.covariance
    }

    /// The current per-axis accelerometer noise variance.
    #[inline]
    pub fn accel_noise_variance(&self) -> f64 {
        self.accel_noise.variance()
    }

    /// The most recent angular rate, in radians per second.
    #[inline]
    pub fn last_gyro(&self) -> Vector3d {
        self.last_gyro
    }

    /// The timestamp of the most recent gyro sample, if any since the last reset.
    #[inline]
    pub fn last_gyro_time(&self) -> Option<f64> {
        self.last_gyro_time
    }

    /// The smoothed gyro sample interval, if known.
    pub fn nominal_timestep(&self) -> Option<f64> {
        self.timestep.nominal()
    }

    /// Performs a prediction step with an angular rate sample.
    ///
    /// The first sample after a reset only records the rate and timestamp.
    ///
    /// ## Arguments
    /// * `gyro` - The angular rate in the sensor frame.
    /// * `timestamp` - The sample time, in seconds.
    pub fn process_gyro(&mut self, gyro: &GyroscopeReading<f64>, timestamp: f64) {
        let rate = Vector3d::from(gyro);

        if let Some(previous) = self.last_gyro_time {
            let dt = self.timestep.resolve(timestamp - previous);

            let motion = so3::exp(rate * -dt);
            self.so3_sensor_from_world = motion * self.so3_sensor_from_world;
            self.covariance = motion * self.covariance * motion.transpose();
            self.covariance += self.process_noise * (dt * dt);
        }

        self.last_gyro_time = Some(timestamp);
        self.last_gyro = rate;
    }

    /// Performs a correction step with a specific-force sample.
    ///
    /// The measurement noise adapts to the sample's magnitude first. An
    /// unaligned filter snaps to gravity; an aligned one performs the Kalman
    /// update, skipping it if the innovation covariance is singular.
    ///
    /// ## Arguments
    /// * `accel` - The specific force in the sensor frame.
    /// * `timestamp` - The sample time, in seconds.
    pub fn process_acceleration(&mut self, accel: &AccelerometerReading<f64>, timestamp: f64) {
        let z = Vector3d::from(accel);
        let variance = self.accel_noise.update(z.norm());

        if !self.aligned {
            self.so3_sensor_from_world = so3::align_two_vectors(self.down, z);
            self.aligned = true;
            tracing::debug!(timestamp, "Aligned orientation to gravity");
            return;
        }

        let innovation = self.observe(&self.so3_sensor_from_world, z);

        let epsilon = self.config.jacobian_epsilon;
        let mut h = Matrix3x3d::zero();
        for dof in 0..3 {
            let perturbation = so3::exp(Vector3d::unit(dof) * epsilon);
            let perturbed = perturbation * self.so3_sensor_from_world;
            let column = (innovation - self.observe(&perturbed, z)) * epsilon.recip();
            h.set_column(dof, column);
        }

        let h_t = h.transpose();
        let s = h * self.covariance * h_t + Matrix3x3d::from_diagonal(variance);
        let Some(s_inv) = s.invert() else {
            tracing::warn!(timestamp, "Singular innovation covariance, skipping correction");
            return;
        };

        let gain = self.covariance * h_t * s_inv;
        let correction = gain * innovation;
        self.covariance = (Matrix3x3d::identity() - gain * h) * self.covariance;

        let motion = so3::exp(correction);
        self.so3_sensor_from_world = motion * self.so3_sensor_from_world;
        self.covariance = motion * self.covariance * motion.transpose();
    }

    /// Extrapolates the rotation with the most recent angular rate.
    ///
    /// ## Arguments
    /// * `seconds_after_last_gyro` - How far past the last gyro sample to extrapolate.
    pub fn predicted_rotation(&self, seconds_after_last_gyro: f64) -> Matrix3x3d {
        so3::exp(self.last_gyro * -seconds_after_last_gyro) * self.so3_sensor_from_world
    }

    /// The heading in degrees within `[0, 360)`, or zero while the sensor's
    /// z-axis is close to vertical.
    pub fn heading_degrees(&self) -> f64 {
        let x = self.so3_sensor_from_world.get(2, 0);
        let y = self.so3_sensor_from_world.get(2, 1);

        if x.hypot(y) < 0.1 {
            return 0.0;
        }

        let heading = -90.0 - y.atan2(x).to_degrees();
        if heading < 0.0 {
            heading + 360.0
        } else if heading >= 360.0 {
            heading - 360.0
        } else {
            heading
        }
    }

    /// Rotates the estimate about the world's vertical axis so that
    /// [`heading_degrees`](Self::heading_degrees) reports `heading`.
    pub fn set_heading_degrees(&mut self, heading: f64) {
        let delta = (heading - self.heading_degrees()).to_radians();
        let (s, c) = delta.sin_cos();

        let about_vertical = Matrix3x3d::new(c, -s, 0.0, s, c, 0.0, 0.0, 0.0, 1.0);
        self.so3_sensor_from_world = self.so3_sensor_from_world * about_vertical;
    }

    /// The rotation as a homogeneous transform.
    pub fn gl_matrix(&self) -> Matrix4<f64> {
        Matrix4::from_rotation(&self.so3_sensor_from_world)
    }

    /// The extrapolated rotation as a homogeneous transform.
    pub fn predicted_gl_matrix(&self, seconds_after_last_gyro: f64) -> Matrix4<f64> {
        Matrix4::from_rotation(&self.predicted_rotation(seconds_after_last_gyro))
    }

    /// The rotation vector taking the predicted gravity direction onto the measured one.
    fn observe(&self, so3_sensor_from_world: &Matrix3x3d, z: Vector3d) -> Vector3d {
        let predicted = *so3_sensor_from_world * self.down;
        so3::log(&so3::align_two_vectors(predicted, z))
    }
}

impl Default for OrientationEkf {
    fn default() -> Self {
        Self::with_config(EkfConfig::default())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::ekf::TimestepConfig;
    use approx::assert_relative_eq;
    use core::f64::consts::FRAC_PI_2;

    fn upright() -> AccelerometerReading<f64> {
        AccelerometerReading::new(0.0, -9.81, 0.0)
    }

    #[test]
    fn test_initial_state() {
        let ekf = OrientationEkf::default();
        assert!(!ekf.is_aligned());
        assert_eq!(ekf.rotation(), Matrix3x3d::identity());
        assert_eq!(ekf.covariance(), Matrix3x3d::from_diagonal(25.0));
        assert_eq!(ekf.accel_noise_variance(), 0.5625);
        assert_eq!(ekf.last_gyro_time(), None);
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = EkfConfig {
            gravity: -1.0,
            ..EkfConfig::default()
        };
        assert!(OrientationEkf::new(config).is_err());
    }

    #[test]
    fn test_first_acceleration_aligns() {
        let mut ekf = OrientationEkf::default();
        ekf.process_acceleration(&upright(), 0.0);
        assert!(ekf.is_aligned());

        let down = ekf.rotation() * Vector3d::new(0.0, 0.0, -1.0);
        assert_relative_eq!(down.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(down.y, -1.0, epsilon = 1e-12);
        assert_relative_eq!(down.z, 0.0, epsilon = 1e-12);
        assert!(ekf.rotation().is_rotation(1e-12));
    }

    #[test]
    fn test_reset() {
        let mut ekf = OrientationEkf::default();
        ekf.process_acceleration(&upright(), 0.0);
        ekf.process_gyro(&GyroscopeReading::new(0.1, 0.2, 0.3), 0.0);
        ekf.process_gyro(&GyroscopeReading::new(0.1, 0.2, 0.3), 0.01);

        ekf.reset();
        assert!(!ekf.is_aligned());
        assert_eq!(ekf.rotation(), Matrix3x3d::identity());
        assert_eq!(ekf.covariance(), Matrix3x3d::from_diagonal(25.0));
        assert_eq!(ekf.last_gyro_time(), None);
        assert_eq!(ekf.last_gyro(), Vector3d::zero());
    }

    #[test]
    fn test_first_gyro_only_records() {
        let mut ekf = OrientationEkf::default();
        ekf.process_gyro(&GyroscopeReading::new(1.0, 2.0, 3.0), 5.0);
        assert_eq!(ekf.rotation(), Matrix3x3d::identity());
        assert_eq!(ekf.covariance(), Matrix3x3d::from_diagonal(25.0));
        assert_eq!(ekf.last_gyro_time(), Some(5.0));
        assert_eq!(ekf.last_gyro(), Vector3d::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_zero_rate_grows_covariance() {
        let mut ekf = OrientationEkf::default();
        let dt = 1.0 / 128.0;
        for i in 0..=20 {
            ekf.process_gyro(&GyroscopeReading::default(), i as f64 * dt);
        }

        assert_eq!(ekf.rotation(), Matrix3x3d::identity());
        let expected = 25.0 + 20.0 * dt * dt;
        for axis in 0..3 {
            assert_relative_eq!(ekf.covariance().get(axis, axis), expected, epsilon = 1e-12);
        }
        assert_eq!(ekf.covariance().get(0, 1), 0.0);
    }

    #[test]
    fn test_integrates_quarter_turn() {
        let mut ekf = OrientationEkf::default();
        let rate = GyroscopeReading::new(0.0, 0.0, FRAC_PI_2);
        for i in 0..=100 {
            ekf.process_gyro(&rate, i as f64 * 0.01);
        }

        let expected = so3::exp(Vector3d::new(0.0, 0.0, -FRAC_PI_2));
        assert!(so3::geodesic_distance(&ekf.rotation(), &expected) < 1e-9);
        assert!(ekf.rotation().is_rotation(1e-9));
    }

    #[test]
    fn test_gap_uses_substitute_timestep() {
        let config = EkfConfig {
            timestep: TimestepConfig {
                fallback: 0.02,
                ..TimestepConfig::default()
            },
            ..EkfConfig::default()
        };
        let mut ekf = OrientationEkf::new(config).expect("valid config");
        let zero = GyroscopeReading::default();

        ekf.process_gyro(&zero, 0.0);
        ekf.process_gyro(&zero, 0.01);
        let before = ekf.covariance().get(0, 0);

        // One second of silence integrates as the fallback interval.
        ekf.process_gyro(&zero, 1.01);
        assert_relative_eq!(ekf.covariance().get(0, 0) - before, 0.02 * 0.02, epsilon = 1e-12);

        // A timestamp going backwards is treated the same way.
        let before = ekf.covariance().get(0, 0);
        ekf.process_gyro(&zero, 1.0);
        assert_relative_eq!(ekf.covariance().get(0, 0) - before, 0.02 * 0.02, epsilon = 1e-12);
    }

    #[test]
    fn test_gap_after_valid_uses_nominal() {
        let mut ekf = OrientationEkf::default();
        let zero = GyroscopeReading::default();
        let dt = 1.0 / 256.0;
        for i in 0..=12 {
            ekf.process_gyro(&zero, i as f64 * dt);
        }
        let nominal = ekf.nominal_timestep().expect("intervals were observed");
        assert_relative_eq!(nominal, dt, epsilon = 1e-15);

        let before = ekf.covariance().get(1, 1);
        ekf.process_gyro(&zero, 10.0);
        assert_relative_eq!(ekf.covariance().get(1, 1) - before, nominal * nominal, epsilon = 1e-12);
    }

    #[test]
    fn test_adaptive_noise() {
        let mut ekf = OrientationEkf::default();
        for i in 0..60 {
            ekf.process_acceleration(&upright(), i as f64 * 0.01);
        }
        assert_relative_eq!(ekf.accel_noise_variance(), 0.5625, epsilon = 1e-9);

        for i in 0..20 {
            let magnitude = if i % 2 == 0 { 9.81 } else { 12.0 };
            let accel = AccelerometerReading::new(0.0, -magnitude, 0.0);
            ekf.process_acceleration(&accel, 0.6 + i as f64 * 0.01);
        }
        assert_eq!(ekf.accel_noise_variance(), 49.0);
    }

    #[test]
    fn test_adaptive_noise_steady_versus_volatile() {
        let mut steady = OrientationEkf::default();
        let mut volatile = OrientationEkf::default();

        for i in 0..60 {
            let time = i as f64 * 0.01;
            steady.process_acceleration(&upright(), time);

            let magnitude = if i % 2 == 0 { 9.81 } else { 12.0 };
            volatile.process_acceleration(&AccelerometerReading::new(0.0, -magnitude, 0.0), time);
        }

        assert_relative_eq!(steady.accel_noise_variance(), 0.5625, epsilon = 1e-9);
        assert_eq!(volatile.accel_noise_variance(), 49.0);
    }

    #[test]
    fn test_correction_pulls_towards_gravity() {
        let mut ekf = OrientationEkf::default();
        ekf.process_acceleration(&upright(), 0.0);

        // Tilt the estimate away from the measurement.
        ekf.so3_sensor_from_world = so3::exp(Vector3d::new(0.2, 0.0, 0.0)) * ekf.so3_sensor_from_world;
        let tilt = |ekf: &OrientationEkf| {
            let down = ekf.rotation() * Vector3d::new(0.0, 0.0, -9.81);
            so3::log(&so3::align_two_vectors(down, Vector3d::from(upright()))).norm()
        };
        let before = tilt(&ekf);

        for i in 1..50 {
            ekf.process_acceleration(&upright(), i as f64 * 0.01);
        }

        assert!(tilt(&ekf) < before * 0.1);
        assert!(ekf.rotation().is_rotation(1e-9));
        assert!(ekf.covariance().get(0, 0) < 25.0);
    }

    #[test]
    fn test_prediction_is_pure() {
        let mut ekf = OrientationEkf::default();
        let rate = GyroscopeReading::new(0.0, 1.0, 0.0);
        ekf.process_gyro(&rate, 0.0);
        ekf.process_gyro(&rate, 0.01);
        let state = ekf.rotation();

        assert_eq!(ekf.predicted_rotation(0.0), state);

        let predicted = ekf.predicted_rotation(0.05);
        let expected = so3::exp(Vector3d::new(0.0, -0.05, 0.0)) * state;
        assert!(so3::geodesic_distance(&predicted, &expected) < 1e-12);
        assert_eq!(ekf.rotation(), state);
        assert_eq!(ekf.predicted_gl_matrix(0.05).rotation(), predicted);
    }

    #[test]
    fn test_heading() {
        let mut ekf = OrientationEkf::default();
        assert_eq!(ekf.heading_degrees(), 0.0, "vertical z-axis has no heading");

        ekf.so3_sensor_from_world = so3::exp(Vector3d::new(FRAC_PI_2, 0.0, 0.0));
        assert_relative_eq!(ekf.heading_degrees(), 180.0, epsilon = 1e-9);

        ekf.set_heading_degrees(30.0);
        assert_relative_eq!(ekf.heading_degrees(), 30.0, epsilon = 1e-9);
        assert!(ekf.rotation().is_rotation(1e-12));
    }

    #[test]
    fn test_gl_matrix_is_column_major() {
        let mut ekf = OrientationEkf::default();
        ekf.so3_sensor_from_world = so3::exp(Vector3d::new(0.0, 0.0, FRAC_PI_2));
        let gl = ekf.gl_matrix();
        let r = ekf.rotation();
        assert_eq!(gl.as_array()[1], r.get(1, 0));
        assert_eq!(gl.as_array()[4], r.get(0, 1));
        assert_eq!(gl.as_array()[15], 1.0);
    }
}
