// src/main.rs
// Demo run against the simulated tracking feed: calibrate at the extremes,
// count five repetitions, write the CSV log and a JSON summary.
use std::sync::mpsc;
use std::time::Instant;

use anyhow::Result;

use romtrack::{
    spawn_session, CalibrationBounds, SessionCommand, SessionConfig, SessionEvent,
    SessionRecorder, SessionSummary, SimulatedArm,
};

const TARGET_REPS: u32 = 5;

fn main() -> Result<()> {
    env_logger::init();

    // Raise/lower between 0 and 1 at 0.08 per sample, with a little sensor
    // noise. Tick fast so the demo finishes in a couple of seconds.
    let mut config = SessionConfig::default();
    config.detector.sample_interval = 0.01;
    let source = SimulatedArm::new(0.0, 1.0, 0.08, 0.005, 42);

    let (tx_event, rx_event) = mpsc::channel();
    let (tx_cmd, rx_cmd) = mpsc::channel();
    let handle = spawn_session(source, config, tx_event, rx_cmd)?;

    let mut recorder = SessionRecorder::new();
    recorder.start("demo")?;

    let started = Instant::now();
    let mut bounds = CalibrationBounds::new();
    let mut min_marked = false;
    let mut max_marked = false;
    let mut final_reps = 0;

    for event in rx_event.iter() {
        match event {
            SessionEvent::Sample { value, phase, reps } => {
                recorder.write_record(value, phase, reps);
                // Press the calibration buttons the first time the arm is at
                // either end of its travel.
                if !min_marked && value <= 0.01 {
                    tx_cmd.send(SessionCommand::MarkMin).ok();
                    min_marked = true;
                }
                if !max_marked && value >= 0.99 {
                    tx_cmd.send(SessionCommand::MarkMax).ok();
                    max_marked = true;
                }
            }
            SessionEvent::MinSet(value) => {
                println!("calibrated min at {value:.3}");
                bounds.set_min(value);
            }
            SessionEvent::MaxSet(value) => {
                println!("calibrated max at {value:.3}");
                bounds.set_max(value);
            }
            SessionEvent::RepCompleted(count) => {
                println!("repetition {count}");
                if count >= TARGET_REPS {
                    tx_cmd.send(SessionCommand::Stop).ok();
                }
            }
            SessionEvent::Finished { reps } => {
                final_reps = reps;
                break;
            }
        }
    }
    handle.join().ok();
    recorder.stop();

    let summary = SessionSummary {
        reps: final_reps,
        bounds,
        duration_seconds: started.elapsed().as_secs_f64(),
    };
    summary.save("session_summary.json")?;
    println!(
        "done: {final_reps} repetitions in {:.1}s",
        summary.duration_seconds
    );
    Ok(())
}
