use serde::{Deserialize, Serialize};

/// User-set range-of-motion bounds. Either bound may be absent; nothing that
/// depends on the pair runs until both are present.
///
/// No ordering is enforced between the two: the user can mark them in either
/// order, or mark an inverted pair. An inverted pair is tolerated (logged, never
/// fatal) but repetition counting is undefined until it is corrected.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CalibrationBounds {
    min: Option<f32>,
    max: Option<f32>,
}

impl CalibrationBounds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn min(&self) -> Option<f32> {
        self.min
    }

    pub fn max(&self) -> Option<f32> {
        self.max
    }

    pub fn set_min(&mut self, value: f32) {
        self.min = Some(value);
        self.warn_if_inverted();
    }

    pub fn set_max(&mut self, value: f32) {
        self.max = Some(value);
        self.warn_if_inverted();
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_complete(&self) -> bool {
        self.min.is_some() && self.max.is_some()
    }

    /// Both bounds, observed together. `None` until calibration is complete,
    /// so callers get a single uncalibrated branch instead of two null checks.
    pub fn pair(&self) -> Option<(f32, f32)> {
        Some((self.min?, self.max?))
    }

    fn warn_if_inverted(&self) {
        if let Some((min, max)) = self.pair() {
            if min > max {
                log::warn!("calibration bounds inverted (min {min} > max {max}); rep counting is undefined until corrected");
            }
        }
    }
}
