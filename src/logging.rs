// src/logging.rs
//
// Step-level sinks for rollouts.
// - EventSink: trait used by the episode runner
// - NoopSink:  discards all events
// - JsonlSink: writes one JSON object per step for offline analysis

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use crate::env::StepResult;
use crate::types::Action;

/// Abstract sink for per-step rollout telemetry.
pub trait EventSink {
    fn log_step(&mut self, episode: u64, step: u32, action: Action, result: &StepResult);
}

/// Sink that discards all events.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl EventSink for NoopSink {
    fn log_step(&mut self, _episode: u64, _step: u32, _action: Action, _result: &StepResult) {
        // intentionally no-op
    }
}

/// One line of the JSONL step log.
#[derive(Serialize)]
struct StepRecord<'a> {
    episode: u64,
    step: u32,
    action: &'static str,
    reward: f64,
    terminated: bool,
    truncated: bool,
    #[serde(flatten)]
    info: &'a crate::env::StepInfo,
    observation: &'a [f32],
}

/// JSONL file sink: each step is a single JSON object on its own line.
pub struct JsonlSink {
    writer: BufWriter<File>,
}

impl JsonlSink {
    /// Create a new sink writing to `path`.
    pub fn create(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = File::create(path)?;
        Ok(Self {
            writer: BufWriter::new(file),
        })
    }

    /// Flush buffered lines to disk.
    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

impl EventSink for JsonlSink {
    fn log_step(&mut self, episode: u64, step: u32, action: Action, result: &StepResult) {
        let record = StepRecord {
            episode,
            step,
            action: action.as_str(),
            reward: result.reward,
            terminated: result.terminated,
            truncated: result.truncated,
            info: &result.info,
            observation: &result.observation.values,
        };
        // A failed write is reported once per line on stderr rather than
        // aborting the rollout.
        match serde_json::to_string(&record) {
            Ok(line) => {
                if let Err(e) = writeln!(self.writer, "{line}") {
                    eprintln!("jsonl sink write failed: {e}");
                }
            }
            Err(e) => eprintln!("jsonl sink serialize failed: {e}"),
        }
    }
}
