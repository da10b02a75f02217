//! romtrack — repetition counting for a range-of-motion exercise.
//!
//! Reduces a noisy vertical position stream, bounded by user-calibrated
//! min/max heights, to a repetition count, and keeps the bounded sample
//! history a display surface plots. Hand tracking and rendering live in the
//! host application; this crate only does the 1-D signal work.

pub mod buffer;
pub mod calibration;
pub mod chart;
pub mod detector;
pub mod error;
pub mod recorder;
pub mod session;
pub mod source;

pub use buffer::{SampleBuffer, DEFAULT_CAPACITY};
pub use calibration::CalibrationBounds;
pub use chart::{ChartFrame, ChartPoint};
pub use detector::{DetectorConfig, DetectorReading, Phase, RepDetector};
pub use error::TrackerError;
pub use recorder::{SessionRecorder, SessionSummary};
pub use session::{
    spawn_session, SessionCommand, SessionConfig, SessionEvent, TrackingSession,
};
pub use source::{ManualSource, PositionSource, SimulatedArm};
