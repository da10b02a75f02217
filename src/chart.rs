use crate::calibration::CalibrationBounds;

/// One plotted point. Time is reconstructed from the sample's position in the
/// history, not from a stored timestamp.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChartPoint {
    pub time: f32,
    pub value: f32,
}

/// Ready-to-plot view of the sample history.
///
/// Carries no rendering concerns; whatever charting surface the host has draws
/// `points` and, when present, pins its y-axis to `y_range`.
#[derive(Clone, Debug)]
pub struct ChartFrame {
    pub sample_interval: f32,
    pub points: Vec<ChartPoint>,
    /// `(min, max)` from the calibration bounds, or `None` while calibration is
    /// incomplete (the display should autoscale instead).
    pub y_range: Option<(f32, f32)>,
}

impl ChartFrame {
    pub fn from_snapshot(
        samples: &[f32],
        sample_interval: f32,
        bounds: CalibrationBounds,
    ) -> Self {
        let points = samples
            .iter()
            .enumerate()
            .map(|(index, &value)| ChartPoint {
                time: index as f32 * sample_interval,
                value,
            })
            .collect();
        Self {
            sample_interval,
            points,
            y_range: bounds.pair(),
        }
    }

    pub fn duration_seconds(&self) -> f32 {
        self.points.len() as f32 * self.sample_interval
    }

    pub fn latest(&self) -> Option<ChartPoint> {
        self.points.last().copied()
    }
}
