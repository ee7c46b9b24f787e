//! Turns sensor callbacks into head views for a renderer.

mod source;
mod tracker;
mod types;

pub use source::{MotionSource, SensorSink};
pub use tracker::HeadTracker;
pub use types::{NeckModelConfig, SensorSubscription, TrackerConfig, TrackingMode};
