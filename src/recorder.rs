use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::SystemTime;

use serde::Serialize;

use crate::calibration::CalibrationBounds;
use crate::detector::Phase;
use crate::error::TrackerError;

/// Optional CSV log of a session, one row per detector evaluation. Useful for
/// reviewing an exercise offline; counting works without it.
pub struct SessionRecorder {
    writer: Option<BufWriter<File>>,
    start_time: SystemTime,
}

impl SessionRecorder {
    pub fn new() -> Self {
        Self {
            writer: None,
            start_time: SystemTime::now(),
        }
    }

    pub fn start(&mut self, label: &str) -> Result<(), TrackerError> {
        let timestamp = SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        let filename = format!("session_{label}_{timestamp}.csv");
        self.start_at(&filename)
    }

    pub fn start_at(&mut self, path: impl AsRef<Path>) -> Result<(), TrackerError> {
        let file = File::create(path.as_ref())?;
        let mut writer = BufWriter::new(file);
        writeln!(writer, "Time,Position,Phase,Reps")?;
        self.writer = Some(writer);
        self.start_time = SystemTime::now();
        log::info!("recording to {}", path.as_ref().display());
        Ok(())
    }

    pub fn stop(&mut self) {
        if let Some(mut writer) = self.writer.take() {
            writer.flush().ok();
            log::info!("recording saved");
        }
    }

    /// Best-effort append; a failed row never interrupts the session.
    pub fn write_record(&mut self, position: f32, phase: Phase, reps: u32) {
        if let Some(writer) = &mut self.writer {
            let t = self.start_time.elapsed().unwrap_or_default().as_secs_f64();
            writeln!(writer, "{t:.4},{position:.4},{phase:?},{reps}").ok();
        }
    }

    pub fn is_recording(&self) -> bool {
        self.writer.is_some()
    }
}

impl Default for SessionRecorder {
    fn default() -> Self {
        Self::new()
    }
}

/// End-of-session digest, written as JSON for whatever tooling wants it.
#[derive(Clone, Debug, Serialize)]
pub struct SessionSummary {
    pub reps: u32,
    pub bounds: CalibrationBounds,
    pub duration_seconds: f64,
}

impl SessionSummary {
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), TrackerError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recorder_writes_header_and_rows() {
        let path = std::env::temp_dir().join("romtrack_recorder_test.csv");
        let mut recorder = SessionRecorder::new();
        assert!(!recorder.is_recording());

        recorder.start_at(&path).unwrap();
        assert!(recorder.is_recording());
        recorder.write_record(0.5, Phase::Idle, 0);
        recorder.write_record(0.9, Phase::MovingDownward, 1);
        recorder.stop();
        assert!(!recorder.is_recording());

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines[0], "Time,Position,Phase,Reps");
        assert_eq!(lines.len(), 3);
        assert!(lines[2].ends_with("MovingDownward,1"));
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn summary_serializes_bounds_and_count() {
        let mut bounds = CalibrationBounds::new();
        bounds.set_min(0.1);
        bounds.set_max(0.9);
        let summary = SessionSummary {
            reps: 12,
            bounds,
            duration_seconds: 61.5,
        };
        let json = serde_json::to_string(&summary).unwrap();
        assert!(json.contains("\"reps\":12"));
        assert!(json.contains("\"min\":0.1"));
    }
}
