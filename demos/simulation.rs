use std::error::Error;
use std::f64::consts::TAU;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use head_orientation::{
    AccelerometerReading, GyroscopeReading, HeadTracker, MotionSource, SensorSink,
    SensorSubscription, Timed, TrackerConfig, TrackerError, TrackerResult,
};
use tracing::info;

const SAMPLE_RATE: f64 = 100.0;
const FRAME_RATE: f64 = 60.0;
const RUN_TIME: Duration = Duration::from_secs(6);

/// Amplitude and frequency of the simulated head shake.
const SHAKE_AMPLITUDE: f64 = 0.6;
const SHAKE_FREQUENCY: f64 = 0.25;

/// Synthesizes an upright device turning its head left and right on a sensor thread.
struct SyntheticSource {
    epoch: Instant,
    running: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
}

impl SyntheticSource {
    fn new() -> Self {
        Self {
            epoch: Instant::now(),
            running: Arc::new(AtomicBool::new(false)),
            worker: None,
        }
    }
}

impl MotionSource for SyntheticSource {
    fn now(&self) -> f64 {
        self.epoch.elapsed().as_secs_f64()
    }

    fn start(&mut self, subscription: SensorSubscription, sink: SensorSink) -> TrackerResult<()> {
        if subscription != SensorSubscription::GyroscopeAndAccelerometer {
            return Err(TrackerError::SensorUnavailable(subscription));
        }

        self.running.store(true, Ordering::Release);
        let running = self.running.clone();
        let epoch = self.epoch;

        self.worker = Some(thread::spawn(move || {
            let period = Duration::from_secs_f64(1.0 / SAMPLE_RATE);
            let gravity = AccelerometerReading::new(0.0, -9.81, 0.0);

            while running.load(Ordering::Acquire) {
                let time = epoch.elapsed().as_secs_f64();
                let phase = TAU * SHAKE_FREQUENCY * time;
                let yaw_rate = SHAKE_AMPLITUDE * TAU * SHAKE_FREQUENCY * phase.cos();

                sink.on_accelerometer(Timed::new(time, gravity));
                sink.on_gyroscope(Timed::new(time, GyroscopeReading::new(0.0, yaw_rate, 0.0)));
                thread::sleep(period);
            }
        }));

        Ok(())
    }

    fn stop(&mut self, _subscription: SensorSubscription) {
        self.running.store(false, Ordering::Release);
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                tracing::error!("Sensor thread panicked");
            }
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    // Initialize logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "simulation=info,head_orientation=debug".into()),
        )
        .init();

    let config = TrackerConfig {
        neck_model_enabled: true,
        ..TrackerConfig::default()
    };

    let mut tracker = HeadTracker::new(SyntheticSource::new(), config)?;
    tracker.start_tracking()?;

    let frame = Duration::from_secs_f64(1.0 / FRAME_RATE);
    let started = Instant::now();
    let mut frames = 0_u64;

    while started.elapsed() < RUN_TIME {
        let head_view = tracker.head_view();
        frames += 1;

        if frames % 30 == 0 {
            let transform = tracker.head_transform();
            let angles = transform.euler_angles().to_degrees();
            let forward = transform.forward();
            info!(
                frame = frames,
                ready = tracker.is_ready(),
                yaw = angles.yaw,
                pitch = angles.pitch,
                roll = angles.roll,
                forward = ?(forward.x, forward.y, forward.z),
                translation = ?head_view.translation_vector(),
                "Head view"
            );
        }

        thread::sleep(frame);
    }

    tracker.stop_tracking();
    info!(frames, "Simulation finished");
    Ok(())
}
