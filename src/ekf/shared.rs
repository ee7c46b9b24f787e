use crate::ekf::OrientationEkf;
use crate::types::{AccelerometerReading, GyroscopeReading, Matrix3x3d};
use parking_lot::{Mutex, MutexGuard};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// An [`OrientationEkf`] shared between sensor callbacks and render reads.
///
/// Sample ingestion never blocks: a sample arriving while another thread
/// holds the filter is dropped. Cloning yields another handle to the same filter.
#[derive(Debug, Clone)]
pub struct SharedOrientationEkf {
    inner: Arc<SharedState>,
}

#[derive(Debug)]
struct SharedState {
    filter: Mutex<OrientationEkf>,
    aligned: AtomicBool,
}

impl SharedOrientationEkf {
    /// Wraps a filter for shared use.
    pub fn new(filter: OrientationEkf) -> Self {
        let aligned = filter.is_aligned();
        Self {
            inner: Arc::new(SharedState {
                filter: Mutex::new(filter),
                aligned: AtomicBool::new(aligned),
            }),
        }
    }

    /// Feeds a gyro sample unless the filter is busy.
    ///
    /// Returns `true` if the sample was consumed.
    pub fn process_gyro(&self, gyro: &GyroscopeReading<f64>, timestamp: f64) -> bool {
        let Some(mut filter) = self.inner.filter.try_lock() else {
            tracing::trace!(timestamp, "Filter busy, dropping gyro sample");
            return false;
        };
        filter.process_gyro(gyro, timestamp);
        true
    }

    /// Feeds an accelerometer sample unless the filter is busy.
    ///
    /// Returns `true` if the sample was consumed.
    pub fn process_acceleration(&self, accel: &AccelerometerReading<f64>, timestamp: f64) -> bool {
        let Some(mut filter) = self.inner.filter.try_lock() else {
            tracing::trace!(timestamp, "Filter busy, dropping accelerometer sample");
            return false;
        };
        filter.process_acceleration(accel, timestamp);
        if filter.is_aligned() {
            self.inner.aligned.store(true, Ordering::Release);
        }
        true
    }

    /// Resets the filter, waiting for any in-flight sample to finish.
    pub fn reset(&self) {
        let mut filter = self.inner.filter.lock();
        filter.reset();
        self.inner.aligned.store(false, Ordering::Release);
    }

    /// Whether the filter was aligned to gravity; never blocks.
    #[inline]
    pub fn is_aligned(&self) -> bool {
        self.inner.aligned.load(Ordering::Acquire)
    }

    /// The current rotation, or `None` if the filter is busy.
    pub fn try_rotation(&self) -> Option<Matrix3x3d> {
        self.inner.filter.try_lock().map(|filter| filter.rotation())
    }

    /// The extrapolated rotation, or `None` if the filter is busy.
    pub fn try_predicted_rotation(&self, seconds_after_last_gyro: f64) -> Option<Matrix3x3d> {
        self.inner
            .filter
            .try_lock()
            .map(|filter| filter.predicted_rotation(seconds_after_last_gyro))
    }

    /// Attempts to access the filter without blocking.
    pub fn try_lock(&self) -> Option<MutexGuard<'_, OrientationEkf>> {
        self.inner.filter.try_lock()
    }

    /// Accesses the filter, blocking until it is free.
    ///
    /// The lock is not reentrant; do not call other methods of this handle while holding it.
    pub fn lock(&self) -> MutexGuard<'_, OrientationEkf> {
        self.inner.filter.lock()
    }
}

impl Default for SharedOrientationEkf {
    fn default() -> Self {
        Self::new(OrientationEkf::default())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::thread;

    #[test]
    fn test_alignment_is_mirrored() {
        let shared = SharedOrientationEkf::default();
        assert!(!shared.is_aligned());

        assert!(shared.process_acceleration(&AccelerometerReading::new(0.0, 0.0, -9.81), 0.0));
        assert!(shared.is_aligned());

        shared.reset();
        assert!(!shared.is_aligned());
        assert_eq!(shared.try_rotation(), Some(Matrix3x3d::identity()));
    }

    #[test]
    fn test_samples_dropped_while_locked() {
        let shared = SharedOrientationEkf::default();
        let guard = shared.lock();

        assert!(!shared.process_gyro(&GyroscopeReading::new(1.0, 0.0, 0.0), 0.0));
        assert!(!shared.process_acceleration(&AccelerometerReading::new(0.0, 0.0, -9.81), 0.0));
        assert!(shared.try_predicted_rotation(0.1).is_none());
        assert!(!shared.is_aligned(), "readiness does not block");

        drop(guard);
        assert!(shared.process_gyro(&GyroscopeReading::new(1.0, 0.0, 0.0), 0.0));
        assert_eq!(shared.lock().last_gyro_time(), Some(0.0));
    }

    #[test]
    fn test_concurrent_ingestion() {
        let shared = SharedOrientationEkf::default();
        let consumed = Arc::new(AtomicUsize::new(0));

        let gyro = {
            let shared = shared.clone();
            let consumed = consumed.clone();
            thread::spawn(move || {
                for i in 0..500 {
                    let rate = GyroscopeReading::new(0.0, 0.0, 0.5);
                    if shared.process_gyro(&rate, i as f64 * 0.01) {
                        consumed.fetch_add(1, Ordering::Relaxed);
                    }
                }
            })
        };

        let accel = {
            let shared = shared.clone();
            let consumed = consumed.clone();
            thread::spawn(move || {
                for i in 0..500 {
                    let accel = AccelerometerReading::new(0.0, -9.81, 0.0);
                    if shared.process_acceleration(&accel, i as f64 * 0.01) {
                        consumed.fetch_add(1, Ordering::Relaxed);
                    }
                }
            })
        };

        for _ in 0..200 {
            if let Some(rotation) = shared.try_predicted_rotation(1.0 / 30.0) {
                assert!(rotation.is_rotation(1e-6));
            }
        }

        gyro.join().expect("gyro thread panicked");
        accel.join().expect("accelerometer thread panicked");

        let consumed = consumed.load(Ordering::Relaxed);
        assert!(consumed > 0 && consumed <= 1000);
        assert!(shared.lock().rotation().is_rotation(1e-6));
    }
}
