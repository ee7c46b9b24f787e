use crate::ekf::{OrientationEkf, SharedOrientationEkf};
use crate::error::{TrackerError, TrackerResult};
use crate::head_tracker::{MotionSource, SensorSink, TrackerConfig, TrackingMode};
use crate::head_transform::HeadTransform;
use crate::types::{Matrix3x3d, Matrix4, Vector3d};

/// Magnitude of the vertical forward component above which the heading is undefined.
const VERTICAL_FORWARD_LIMIT: f64 = 0.99;

/// Produces world-to-display transforms from a [`MotionSource`].
///
/// Sensor samples flow from the source through a [`SensorSink`] into the
/// filter on the source's threads; the render thread reads views from here.
pub struct HeadTracker<S> {
    source: S,
    config: TrackerConfig,
    sink: SensorSink,
    tracking: bool,
    inertial_from_world: Matrix4<f64>,
    corrected_inertial_from_world: Matrix4<f64>,
    display_from_device: Matrix4<f64>,
    neck_translation: Matrix4<f64>,
    heading_correction_computed: bool,
    last_head_view: Matrix4<f64>,
}

impl<S> HeadTracker<S>
where
    S: MotionSource,
{
    /// Initializes a new [`HeadTracker`]. Tracking does not start until
    /// [`start_tracking`](Self::start_tracking) is called.
    ///
    /// ## Arguments
    /// * `source` - The provider of sensor samples.
    /// * `config` - The tracker configuration; rejected if any value is unusable.
    pub fn new(source: S, config: TrackerConfig) -> TrackerResult<Self> {
        config.validate()?;

        let filter = SharedOrientationEkf::new(OrientationEkf::new(config.ekf.clone())?);
        let sink = SensorSink::new(config.mode, filter, config.initial_skip_samples);

        // The filter's world is z-up; the render world is y-up.
        let inertial_from_world = Matrix4::from_euler_degrees(-90.0, 0.0, 90.0);
        let display_from_device = Matrix4::from_euler_degrees(0.0, 0.0, -90.0);

        let neck = &config.neck_model;
        let neck_translation =
            Matrix4::identity().translate(0.0, -neck.vertical_offset, neck.horizontal_offset);

        Ok(Self {
            source,
            config,
            sink,
            tracking: false,
            inertial_from_world,
            corrected_inertial_from_world: inertial_from_world,
            display_from_device,
            neck_translation,
            heading_correction_computed: false,
            last_head_view: Matrix4::identity(),
        })
    }

    /// Gets the configuration.
    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Gets the tracking mode.
    pub fn mode(&self) -> TrackingMode {
        self.config.mode
    }

    /// Gets the sink samples are delivered to.
    pub fn sink(&self) -> &SensorSink {
        &self.sink
    }

    /// Gets the filter; only meaningful in the filtering modes.
    pub fn filter(&self) -> &SharedOrientationEkf {
        self.sink.filter()
    }

    /// Gets the motion source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Gets the motion source mutably.
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Whether samples are currently being delivered.
    pub fn is_tracking(&self) -> bool {
        self.tracking
    }

    /// Resets the session and subscribes to the sensor streams of the tracking mode.
    ///
    /// Does nothing if tracking is already active.
    pub fn start_tracking(&mut self) -> TrackerResult<()> {
        if self.tracking {
            return Ok(());
        }

        self.sink.restart();
        self.heading_correction_computed = false;
        self.corrected_inertial_from_world = self.inertial_from_world;

        let subscription = self.config.mode.subscription();
        self.source.start(subscription, self.sink.clone())?;
        self.tracking = true;

        tracing::info!(mode = ?self.config.mode, %subscription, "Head tracking started");
        Ok(())
    }

    /// Unsubscribes from the sensor streams. Does nothing if tracking is not active.
    pub fn stop_tracking(&mut self) {
        if !self.tracking {
            return;
        }

        self.source.stop(self.config.mode.subscription());
        self.tracking = false;
        tracing::info!(mode = ?self.config.mode, "Head tracking stopped");
    }

    /// Whether an orientation is available.
    pub fn is_ready(&self) -> bool {
        self.sink.is_ready()
    }

    /// The most recently produced head view; identity before the first one.
    pub fn last_head_view(&self) -> Matrix4<f64> {
        self.last_head_view
    }

    /// The most recently produced head view, decomposed.
    pub fn head_transform(&self) -> HeadTransform {
        HeadTransform::new(self.last_head_view)
    }

    /// The head view for the current estimate, without extrapolation.
    pub fn last_orientation(&mut self) -> Matrix4<f64> {
        self.predicted_orientation(0.0)
    }

    /// The head view extrapolated past the last gyro sample.
    ///
    /// Returns the previous head view while the tracker is not ready or the
    /// filter is busy.
    ///
    /// ## Arguments
    /// * `seconds_after_last_gyro` - The extrapolation interval; ignored in attitude mode.
    pub fn predicted_orientation(&mut self, seconds_after_last_gyro: f64) -> Matrix4<f64> {
        if !self.is_ready() {
            return self.last_head_view;
        }

        let device_from_inertial = match self.config.mode {
            TrackingMode::Ekf | TrackingMode::DeviceMotionEkf => self
                .sink
                .filter()
                .try_predicted_rotation(seconds_after_last_gyro),
            TrackingMode::DeviceAttitude => self.sink.attitude().map(|sample| sample.reading),
        };

        match device_from_inertial {
            Some(rotation) => self.compose(&rotation),
            None => {
                tracing::trace!("Filter busy, reusing previous head view");
                self.last_head_view
            }
        }
    }

    /// The head view predicted for the next displayed frame: the age of the
    /// last gyro sample plus the configured prediction horizon.
    pub fn head_view(&mut self) -> Matrix4<f64> {
        let horizon = self.config.prediction_horizon;
        let seconds = match self.sink.last_gyro_time() {
            Some(last) => self.source.now() - last + horizon,
            None => horizon,
        };
        self.predicted_orientation(seconds)
    }

    fn compose(&mut self, device_from_inertial: &Matrix3x3d) -> Matrix4<f64> {
        let device_from_inertial = Matrix4::from_rotation(device_from_inertial);

        if !self.heading_correction_computed {
            self.correct_heading(&device_from_inertial);
        }

        let device_from_world = device_from_inertial * self.corrected_inertial_from_world;
        let mut display_from_world = self.display_from_device * device_from_world;

        if self.config.neck_model_enabled {
            display_from_world = self.neck_translation * display_from_world;
            display_from_world =
                display_from_world.translate(0.0, self.config.neck_model.vertical_offset, 0.0);
        }

        self.last_head_view = display_from_world;
        display_from_world
    }

    /// Rotates the reference frame about the vertical so that the device's
    /// current forward direction becomes the world's forward direction.
    fn correct_heading(&mut self, device_from_inertial: &Matrix4<f64>) {
        let world_from_device = (*device_from_inertial * self.inertial_from_world).transpose();
        let forward = world_from_device.transform_vector3(Vector3d::new(0.0, 0.0, -1.0));

        if forward.y.abs() < VERTICAL_FORWARD_LIMIT {
            let forward = Vector3d::new(forward.x, 0.0, forward.z).normalized();
            let c = -forward.z;
            let s = -forward.x;

            let about_vertical = Matrix4::from_array([
                c, 0.0, -s, 0.0, //
                0.0, 1.0, 0.0, 0.0, //
                s, 0.0, c, 0.0, //
                0.0, 0.0, 0.0, 1.0,
            ]);
            self.corrected_inertial_from_world = self.inertial_from_world * about_vertical;
            tracing::debug!(
                heading_degrees = s.atan2(c).to_degrees(),
                "Heading correction applied"
            );
        } else {
            tracing::debug!("Device faces vertically, heading correction skipped");
        }

        self.heading_correction_computed = true;
    }
}
