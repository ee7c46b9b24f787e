use crate::ekf::SharedOrientationEkf;
use crate::error::TrackerResult;
use crate::head_tracker::{SensorSubscription, TrackingMode};
use crate::types::{AccelerometerReading, DeviceMotion, GyroscopeReading, Matrix3x3d, Timed, Vector3d};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

/// A provider of motion samples, such as a platform sensor API or a recording.
pub trait MotionSource {
    /// The current time, in seconds, on the clock that timestamps the samples.
    fn now(&self) -> f64;

    /// Begins delivering the requested streams to `sink`.
    ///
    /// Samples may be delivered from any thread.
    fn start(&mut self, subscription: SensorSubscription, sink: SensorSink) -> TrackerResult<()>;

    /// Stops delivering the given streams.
    fn stop(&mut self, subscription: SensorSubscription);
}

/// The receiving end of sensor callbacks. Cheap to clone; all clones share state.
#[derive(Debug, Clone)]
pub struct SensorSink {
    inner: Arc<SinkState>,
}

#[derive(Debug)]
struct SinkState {
    mode: TrackingMode,
    filter: SharedOrientationEkf,
    initial_skip_samples: usize,
    sample_count: AtomicUsize,
    last_gyro_time: AtomicU64,
    attitude: Mutex<Option<Timed<Matrix3x3d>>>,
}

impl SensorSink {
    pub(crate) fn new(mode: TrackingMode, filter: SharedOrientationEkf, initial_skip_samples: usize) -> Self {
        Self {
            inner: Arc::new(SinkState {
                mode,
                filter,
                initial_skip_samples,
                sample_count: AtomicUsize::new(0),
                last_gyro_time: AtomicU64::new(f64::NAN.to_bits()),
                attitude: Mutex::new(None),
            }),
        }
    }

    /// The mode samples are interpreted for.
    pub fn mode(&self) -> TrackingMode {
        self.inner.mode
    }

    /// Handles a gyroscope sample.
    ///
    /// Ignored until the initial accelerometer samples were skipped.
    pub fn on_gyroscope(&self, sample: Timed<GyroscopeReading<f64>>) {
        if self.inner.mode != TrackingMode::Ekf {
            tracing::trace!(mode = ?self.inner.mode, "Ignoring gyroscope sample");
            return;
        }

        if self.sample_count() <= self.inner.initial_skip_samples {
            tracing::trace!(time = sample.time, "Skipping initial gyroscope sample");
            return;
        }

        if !is_finite(sample.time, [Vector3d::from(&sample.reading)]) {
            tracing::debug!("Dropping non-finite gyroscope sample");
            return;
        }

        self.inner.filter.process_gyro(&sample.reading, sample.time);
        self.set_last_gyro_time(sample.time);
    }

    /// Handles an accelerometer sample. The first samples after a start are skipped.
    pub fn on_accelerometer(&self, sample: Timed<AccelerometerReading<f64>>) {
        if self.inner.mode != TrackingMode::Ekf {
            tracing::trace!(mode = ?self.inner.mode, "Ignoring accelerometer sample");
            return;
        }

        if !self.admit() {
            tracing::trace!(time = sample.time, "Skipping initial accelerometer sample");
            return;
        }

        if !is_finite(sample.time, [Vector3d::from(&sample.reading)]) {
            tracing::debug!("Dropping non-finite accelerometer sample");
            return;
        }

        self.inner.filter.process_acceleration(&sample.reading, sample.time);
    }

    /// Handles a fused motion sample: gravity corrects, then the rotation rate
    /// predicts, both at the sample's timestamp.
    pub fn on_device_motion(&self, sample: Timed<DeviceMotion>) {
        if self.inner.mode != TrackingMode::DeviceMotionEkf {
            tracing::trace!(mode = ?self.inner.mode, "Ignoring device motion sample");
            return;
        }

        if !self.admit() {
            tracing::trace!(time = sample.time, "Skipping initial device motion sample");
            return;
        }

        let vectors = [
            Vector3d::from(&sample.gravity),
            Vector3d::from(&sample.rotation_rate),
        ];
        if !is_finite(sample.time, vectors) {
            tracing::debug!("Dropping non-finite device motion sample");
            return;
        }

        let filter = &self.inner.filter;
        filter.process_acceleration(&sample.gravity, sample.time);
        filter.process_gyro(&sample.rotation_rate, sample.time);
        self.set_last_gyro_time(sample.time);
    }

    /// Handles a platform attitude: the rotation from the platform's
    /// inertial reference frame to the device frame.
    pub fn on_attitude(&self, sample: Timed<Matrix3x3d>) {
        if self.inner.mode != TrackingMode::DeviceAttitude {
            tracing::trace!(mode = ?self.inner.mode, "Ignoring attitude sample");
            return;
        }

        *self.inner.attitude.lock() = Some(sample);
    }

    /// The number of accelerometer or device-motion samples seen since the last start.
    pub fn sample_count(&self) -> usize {
        self.inner.sample_count.load(Ordering::Acquire)
    }

    /// Whether an orientation is available.
    pub fn is_ready(&self) -> bool {
        match self.inner.mode {
            TrackingMode::Ekf | TrackingMode::DeviceMotionEkf => self.inner.filter.is_aligned(),
            TrackingMode::DeviceAttitude => self.inner.attitude.lock().is_some(),
        }
    }

    /// The timestamp of the last gyro sample handed to the filter.
    pub fn last_gyro_time(&self) -> Option<f64> {
        let time = f64::from_bits(self.inner.last_gyro_time.load(Ordering::Acquire));
        (!time.is_nan()).then_some(time)
    }

    /// The most recent platform attitude.
    pub fn attitude(&self) -> Option<Timed<Matrix3x3d>> {
        *self.inner.attitude.lock()
    }

    /// The filter fed by this sink.
    pub fn filter(&self) -> &SharedOrientationEkf {
        &self.inner.filter
    }

    /// Forgets all session state ahead of a new start.
    pub(crate) fn restart(&self) {
        self.inner.filter.reset();
        self.inner.sample_count.store(0, Ordering::Release);
        self.inner.last_gyro_time.store(f64::NAN.to_bits(), Ordering::Release);
        *self.inner.attitude.lock() = None;
    }

    /// Counts a gating sample and reports whether it passes the initial skip.
    fn admit(&self) -> bool {
        let count = self.inner.sample_count.fetch_add(1, Ordering::AcqRel) + 1;
        count > self.inner.initial_skip_samples
    }

    fn set_last_gyro_time(&self, time: f64) {
        self.inner.last_gyro_time.store(time.to_bits(), Ordering::Release);
    }
}

/// Whether the timestamp and all vectors are free of NaN and infinite values.
fn is_finite<const N: usize>(time: f64, vectors: [Vector3d; N]) -> bool {
    time.is_finite() && vectors.iter().all(Vector3d::is_finite)
}
