use serde::{Deserialize, Serialize};

use crate::calibration::CalibrationBounds;
use crate::error::TrackerError;

/// Current classification of the tracked motion.
///
/// `MovingDownward` means the bottom bound has been reached and a repetition is
/// in progress; the phase survives the ascent back up until the top bound is
/// reached or the motion stalls. `MovingUpward` is an ascent that never touched
/// the bottom bound, which can never complete a repetition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Idle,
    MovingDownward,
    MovingUpward,
}

impl Default for Phase {
    fn default() -> Self {
        Phase::Idle
    }
}

/// Detector tuning, fixed per instance.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Minimum delta from the last recorded sample to count as real movement
    /// rather than sensor jitter.
    pub movement_threshold: f32,
    /// Slack within which a sample counts as having reached a calibration bound.
    pub boundary_tolerance: f32,
    /// Nominal period between evaluations. Used by the owning sampler to pick
    /// its cadence, not by the detector itself.
    pub sample_interval: f32,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            movement_threshold: 0.05,
            boundary_tolerance: 0.02,
            sample_interval: 0.1,
        }
    }
}

impl DetectorConfig {
    pub fn validate(&self) -> Result<(), TrackerError> {
        if !self.movement_threshold.is_finite() || self.movement_threshold <= 0.0 {
            return Err(TrackerError::InvalidConfig(
                "movement_threshold must be a positive finite value",
            ));
        }
        if !self.boundary_tolerance.is_finite() || self.boundary_tolerance < 0.0 {
            return Err(TrackerError::InvalidConfig(
                "boundary_tolerance must be a non-negative finite value",
            ));
        }
        if !self.sample_interval.is_finite() || self.sample_interval <= 0.0 {
            return Err(TrackerError::InvalidConfig(
                "sample_interval must be a positive finite value",
            ));
        }
        Ok(())
    }
}

/// What the detector reports after each sample.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DetectorReading {
    pub phase: Phase,
    pub reps: u32,
}

/// Reduces a stream of vertical position samples to a repetition count.
///
/// A repetition is one full excursion: descend to the bottom calibration bound,
/// then ascend to the top one. The reverse order never counts. With either
/// bound unset the detector is uncalibrated and every sample is a no-op.
pub struct RepDetector {
    config: DetectorConfig,
    phase: Phase,
    last: f32,
    reps: u32,
}

impl RepDetector {
    pub fn new(config: DetectorConfig) -> Result<Self, TrackerError> {
        config.validate()?;
        Ok(Self {
            config,
            phase: Phase::Idle,
            last: 0.0,
            reps: 0,
        })
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn reps(&self) -> u32 {
        self.reps
    }

    /// Feeds one sample, observing the calibration bounds atomically.
    ///
    /// Samples must arrive in chronological order; the counter never decreases.
    pub fn on_sample(&mut self, value: f32, bounds: CalibrationBounds) -> DetectorReading {
        let delta = (value - self.last).abs();
        if delta <= self.config.movement_threshold {
            // Jitter, or the user stopped mid-rep. A stalled rep is abandoned.
            if self.phase != Phase::Idle {
                log::debug!("motion stalled at {value:.3}; abandoning rep in progress");
                self.phase = Phase::Idle;
            }
            return self.reading();
        }

        let Some((min, max)) = bounds.pair() else {
            // Uncalibrated: real movement, but nothing to measure it against.
            return self.reading();
        };

        if value > self.last {
            match self.phase {
                Phase::MovingDownward if value >= max - self.config.boundary_tolerance => {
                    self.reps += 1;
                    self.phase = Phase::Idle;
                    log::info!("repetition {} complete", self.reps);
                }
                // Bottom already reached; the ascent stays armed until the top.
                Phase::MovingDownward => {}
                _ => self.phase = Phase::MovingUpward,
            }
        } else if value <= min + self.config.boundary_tolerance {
            // Reaching the bottom arms a rep from any phase, silently dropping
            // an ascent that never made it to the top.
            self.phase = Phase::MovingDownward;
        }

        self.last = value;
        self.reading()
    }

    fn reading(&self) -> DetectorReading {
        DetectorReading {
            phase: self.phase,
            reps: self.reps,
        }
    }
}

impl Default for RepDetector {
    fn default() -> Self {
        Self {
            config: DetectorConfig::default(),
            phase: Phase::Idle,
            last: 0.0,
            reps: 0,
        }
    }
}
