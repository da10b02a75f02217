use std::sync::mpsc::{Receiver, Sender, TryRecvError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::buffer::SampleBuffer;
use crate::calibration::CalibrationBounds;
use crate::chart::ChartFrame;
use crate::detector::{DetectorConfig, DetectorReading, Phase, RepDetector};
use crate::error::TrackerError;
use crate::source::PositionSource;

/// Session-level knobs. The buffer and the detector stay independent consumers
/// of the same sample stream; this just builds them together.
#[derive(Clone, Copy, Debug)]
pub struct SessionConfig {
    pub buffer_capacity: usize,
    pub detector: DetectorConfig,
    /// Bounds carried over from an earlier calibration, empty by default.
    pub bounds: CalibrationBounds,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            buffer_capacity: crate::buffer::DEFAULT_CAPACITY,
            detector: DetectorConfig::default(),
            bounds: CalibrationBounds::new(),
        }
    }
}

/// One exercise session: sample history, rep detector, and the calibration
/// bounds both of them read.
///
/// All mutation goes through `&mut self`, so feeding it from one thread (or
/// behind one lock) gives the single-writer discipline the sample stream needs.
pub struct TrackingSession {
    buffer: SampleBuffer,
    detector: RepDetector,
    bounds: CalibrationBounds,
}

impl TrackingSession {
    pub fn new(config: SessionConfig) -> Result<Self, TrackerError> {
        Ok(Self {
            buffer: SampleBuffer::new(config.buffer_capacity)?,
            detector: RepDetector::new(config.detector)?,
            bounds: config.bounds,
        })
    }

    /// Feeds one position sample to the history and the detector, in that
    /// order. Bounds are observed once, at the start of the detector step.
    pub fn ingest(&mut self, value: f32) -> DetectorReading {
        self.buffer.append(value);
        self.detector.on_sample(value, self.bounds)
    }

    /// Pins the lower bound to the most recent sample. Returns the value used,
    /// or `None` when nothing has been sampled yet.
    pub fn mark_min(&mut self) -> Option<f32> {
        match self.buffer.latest() {
            Some(value) => {
                self.bounds.set_min(value);
                log::info!("calibration min set to {value:.3}");
                Some(value)
            }
            None => {
                log::warn!("cannot set min: no samples yet");
                None
            }
        }
    }

    /// Pins the upper bound to the most recent sample.
    pub fn mark_max(&mut self) -> Option<f32> {
        match self.buffer.latest() {
            Some(value) => {
                self.bounds.set_max(value);
                log::info!("calibration max set to {value:.3}");
                Some(value)
            }
            None => {
                log::warn!("cannot set max: no samples yet");
                None
            }
        }
    }

    pub fn bounds(&self) -> CalibrationBounds {
        self.bounds
    }

    pub fn phase(&self) -> Phase {
        self.detector.phase()
    }

    pub fn reps(&self) -> u32 {
        self.detector.reps()
    }

    pub fn latest(&self) -> Option<f32> {
        self.buffer.latest()
    }

    pub fn sample_interval(&self) -> f32 {
        self.detector.config().sample_interval
    }

    pub fn chart_frame(&self) -> ChartFrame {
        ChartFrame::from_snapshot(&self.buffer.snapshot(), self.sample_interval(), self.bounds)
    }
}

/// Commands the host sends into a running session (calibration button presses,
/// shutdown).
#[derive(Clone, Copy, Debug)]
pub enum SessionCommand {
    MarkMin,
    MarkMax,
    Stop,
}

/// Feedback from a running session.
#[derive(Clone, Debug)]
pub enum SessionEvent {
    Sample { value: f32, phase: Phase, reps: u32 },
    RepCompleted(u32),
    MinSet(f32),
    MaxSet(f32),
    Finished { reps: u32 },
}

/// Runs a session on its own thread, ticking at the detector's sample
/// interval: drain pending commands, pull one position, feed it through.
///
/// Commands are applied between ticks, so a detector step never observes a
/// half-updated calibration pair. The loop ends when the source runs dry, a
/// `Stop` arrives, or the event receiver goes away.
pub fn spawn_session<S>(
    source: S,
    config: SessionConfig,
    tx: Sender<SessionEvent>,
    rx_cmd: Receiver<SessionCommand>,
) -> Result<JoinHandle<()>, TrackerError>
where
    S: PositionSource + Send + 'static,
{
    let session = TrackingSession::new(config)?;
    Ok(thread::spawn(move || {
        run_session(source, session, tx, rx_cmd);
    }))
}

fn run_session<S: PositionSource>(
    mut source: S,
    mut session: TrackingSession,
    tx: Sender<SessionEvent>,
    rx_cmd: Receiver<SessionCommand>,
) {
    let tick = Duration::from_secs_f32(session.sample_interval());
    loop {
        // Bounded drain keeps a flood of commands from starving the sampler.
        for _ in 0..10 {
            match rx_cmd.try_recv() {
                Ok(SessionCommand::MarkMin) => {
                    if let Some(value) = session.mark_min() {
                        tx.send(SessionEvent::MinSet(value)).ok();
                    }
                }
                Ok(SessionCommand::MarkMax) => {
                    if let Some(value) = session.mark_max() {
                        tx.send(SessionEvent::MaxSet(value)).ok();
                    }
                }
                Ok(SessionCommand::Stop) => {
                    tx.send(SessionEvent::Finished {
                        reps: session.reps(),
                    })
                    .ok();
                    return;
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => return,
            }
        }

        match source.next_position() {
            Ok(Some(value)) => {
                let before = session.reps();
                let reading = session.ingest(value);
                if tx
                    .send(SessionEvent::Sample {
                        value,
                        phase: reading.phase,
                        reps: reading.reps,
                    })
                    .is_err()
                {
                    return;
                }
                if reading.reps > before {
                    tx.send(SessionEvent::RepCompleted(reading.reps)).ok();
                }
            }
            Ok(None) => {
                tx.send(SessionEvent::Finished {
                    reps: session.reps(),
                })
                .ok();
                return;
            }
            Err(err) => {
                log::error!("tracking source failed: {err}");
                tx.send(SessionEvent::Finished {
                    reps: session.reps(),
                })
                .ok();
                return;
            }
        }

        thread::sleep(tick);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::ManualSource;
    use std::sync::mpsc;

    fn fast_config() -> SessionConfig {
        let mut config = SessionConfig::default();
        config.detector.sample_interval = 0.001;
        config
    }

    fn calibrated(min: f32, max: f32) -> CalibrationBounds {
        let mut bounds = CalibrationBounds::new();
        bounds.set_min(min);
        bounds.set_max(max);
        bounds
    }

    #[test]
    fn marking_bounds_uses_the_latest_sample() {
        let mut session = TrackingSession::new(SessionConfig::default()).unwrap();
        assert_eq!(session.mark_min(), None);

        session.ingest(0.12);
        assert_eq!(session.mark_min(), Some(0.12));

        session.ingest(0.95);
        assert_eq!(session.mark_max(), Some(0.95));
        assert_eq!(session.bounds().pair(), Some((0.12, 0.95)));
    }

    #[test]
    fn session_counts_a_full_cycle() {
        let mut config = SessionConfig::default();
        config.bounds = calibrated(0.0, 1.0);
        let mut session = TrackingSession::new(config).unwrap();

        for v in [0.5, 0.0, 0.5, 0.99] {
            session.ingest(v);
        }
        assert_eq!(session.reps(), 1);
        assert_eq!(session.phase(), Phase::Idle);

        let frame = session.chart_frame();
        assert_eq!(frame.points.len(), 4);
        assert_eq!(frame.y_range, Some((0.0, 1.0)));
    }

    #[test]
    fn runner_reports_samples_reps_and_completion() {
        let mut config = fast_config();
        config.bounds = calibrated(0.0, 1.0);
        let source = ManualSource::new([0.5, 0.0, 0.5, 0.99]);
        let (tx, rx) = mpsc::channel();
        let (_tx_cmd, rx_cmd) = mpsc::channel();

        let handle = spawn_session(source, config, tx, rx_cmd).unwrap();

        let mut samples = 0;
        let mut completed = Vec::new();
        let mut finished = None;
        for event in rx.iter() {
            match event {
                SessionEvent::Sample { .. } => samples += 1,
                SessionEvent::RepCompleted(n) => completed.push(n),
                SessionEvent::Finished { reps } => {
                    finished = Some(reps);
                    break;
                }
                _ => {}
            }
        }
        handle.join().unwrap();

        assert_eq!(samples, 4);
        assert_eq!(completed, vec![1]);
        assert_eq!(finished, Some(1));
    }

    #[test]
    fn stop_command_ends_the_run_before_sampling() {
        let source = ManualSource::new([0.5, 0.6, 0.7]);
        let (tx, rx) = mpsc::channel();
        let (tx_cmd, rx_cmd) = mpsc::channel();
        tx_cmd.send(SessionCommand::Stop).unwrap();

        let handle = spawn_session(source, fast_config(), tx, rx_cmd).unwrap();
        handle.join().unwrap();

        let events: Vec<SessionEvent> = rx.iter().collect();
        assert!(matches!(events.as_slice(), [SessionEvent::Finished { reps: 0 }]));
    }

    #[test]
    fn calibration_commands_are_applied_between_ticks() {
        let source = ManualSource::new([0.42]);
        let (tx, rx) = mpsc::channel();
        let (tx_cmd, rx_cmd) = mpsc::channel();

        // Tick slow enough that the command sent in response to the first
        // sample is waiting when the next drain runs.
        let mut config = SessionConfig::default();
        config.detector.sample_interval = 0.05;
        let handle = spawn_session(source, config, tx, rx_cmd).unwrap();

        // First event is the sample; after it, the command is ready for the
        // next tick's drain.
        let mut saw_min = None;
        for event in rx.iter() {
            match event {
                SessionEvent::Sample { .. } => {
                    tx_cmd.send(SessionCommand::MarkMin).ok();
                }
                SessionEvent::MinSet(v) => saw_min = Some(v),
                SessionEvent::Finished { .. } => break,
                _ => {}
            }
        }
        handle.join().unwrap();
        assert_eq!(saw_min, Some(0.42));
    }
}
