use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::TrackerError;

/// Something that can yield the tracked hand's vertical position on demand.
///
/// `Ok(None)` means the feed is exhausted (playback finished, session over).
/// Samples must be produced in chronological order.
pub trait PositionSource {
    fn next_position(&mut self) -> Result<Option<f32>, TrackerError>;
}

/// In-memory source useful for tests and deterministic playback.
pub struct ManualSource {
    queue: VecDeque<f32>,
}

impl ManualSource {
    pub fn new(samples: impl IntoIterator<Item = f32>) -> Self {
        Self {
            queue: samples.into_iter().collect(),
        }
    }
}

impl PositionSource for ManualSource {
    fn next_position(&mut self) -> Result<Option<f32>, TrackerError> {
        Ok(self.queue.pop_front())
    }
}

/// Synthetic arm motion: a steady raise-and-lower between two heights with
/// sensor jitter layered on top. Stands in for the hand-tracking feed when no
/// headset is attached.
pub struct SimulatedArm {
    rng: StdRng,
    low: f32,
    high: f32,
    step: f32,
    jitter: f32,
    value: f32,
    rising: bool,
}

impl SimulatedArm {
    /// `step` is the height change per sample and should comfortably exceed the
    /// detector's movement threshold, or the motion reads as a stall.
    pub fn new(low: f32, high: f32, step: f32, jitter: f32, seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            low,
            high,
            step,
            jitter,
            value: low,
            rising: true,
        }
    }
}

impl PositionSource for SimulatedArm {
    fn next_position(&mut self) -> Result<Option<f32>, TrackerError> {
        if self.rising {
            self.value += self.step;
            if self.value >= self.high {
                self.value = self.high;
                self.rising = false;
            }
        } else {
            self.value -= self.step;
            if self.value <= self.low {
                self.value = self.low;
                self.rising = true;
            }
        }
        let noise = if self.jitter > 0.0 {
            self.rng.gen_range(-self.jitter..self.jitter)
        } else {
            0.0
        };
        Ok(Some(self.value + noise))
    }
}
