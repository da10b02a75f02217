use std::collections::VecDeque;

use crate::error::TrackerError;

/// Capacity used by sessions that do not ask for anything else.
/// Matches the 100-point history the chart attachment displays.
pub const DEFAULT_CAPACITY: usize = 100;

/// Rolling buffer that keeps the most recent position samples.
///
/// Once full, each append evicts exactly the oldest retained sample.
pub struct SampleBuffer {
    data: VecDeque<f32>,
    capacity: usize,
}

impl SampleBuffer {
    pub fn new(capacity: usize) -> Result<Self, TrackerError> {
        if capacity == 0 {
            return Err(TrackerError::InvalidCapacity);
        }
        Ok(Self {
            data: VecDeque::with_capacity(capacity),
            capacity,
        })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Appends one sample, evicting the oldest once the buffer is full.
    pub fn append(&mut self, value: f32) {
        if self.data.len() == self.capacity {
            self.data.pop_front();
        }
        self.data.push_back(value);
    }

    /// Chronological view, oldest first. Length is the number of samples
    /// written so far, capped at the capacity.
    pub fn snapshot(&self) -> Vec<f32> {
        self.data.iter().copied().collect()
    }

    /// Most recently appended sample, if any.
    pub fn latest(&self) -> Option<f32> {
        self.data.back().copied()
    }
}

impl Default for SampleBuffer {
    fn default() -> Self {
        Self {
            data: VecDeque::with_capacity(DEFAULT_CAPACITY),
            capacity: DEFAULT_CAPACITY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_capacity_is_rejected() {
        assert!(SampleBuffer::new(0).is_err());
    }

    #[test]
    fn snapshot_grows_until_capacity() {
        let mut buffer = SampleBuffer::new(3).unwrap();
        assert!(buffer.snapshot().is_empty());
        assert_eq!(buffer.latest(), None);

        buffer.append(1.0);
        buffer.append(2.0);
        assert_eq!(buffer.snapshot(), vec![1.0, 2.0]);
        assert_eq!(buffer.latest(), Some(2.0));
    }

    #[test]
    fn full_buffer_evicts_oldest() {
        let mut buffer = SampleBuffer::new(3).unwrap();
        for v in [1.0, 2.0, 3.0, 4.0] {
            buffer.append(v);
        }
        assert_eq!(buffer.snapshot(), vec![2.0, 3.0, 4.0]);
        assert_eq!(buffer.latest(), Some(4.0));
    }

    #[test]
    fn long_runs_keep_exactly_the_last_capacity_samples() {
        let mut buffer = SampleBuffer::new(5).unwrap();
        for i in 0..37 {
            buffer.append(i as f32);
        }
        let snap = buffer.snapshot();
        assert_eq!(snap.len(), 5);
        assert_eq!(snap, vec![32.0, 33.0, 34.0, 35.0, 36.0]);
    }
}
