//! Simulation clock and trajectory recorder.

use roboml_types::scene::{RobotState, Timestamp};

/// Monotonic virtual clock plus the append-only pose log.
///
/// Time only moves through [`Recorder::advance`], which always appends one
/// timestamp; the log is never reordered or pruned.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    time: f64,
    timestamps: Vec<Timestamp>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current simulation time in milliseconds.
    pub fn now(&self) -> f64 {
        self.time
    }

    /// Advance the clock by `duration_ms` and record `pose` at the new time.
    ///
    /// Negative durations are clamped to zero.
    pub fn advance(&mut self, duration_ms: f64, pose: RobotState) {
        self.time += duration_ms.max(0.0);
        self.timestamps.push(Timestamp::new(self.time, pose));
    }

    pub fn timestamps(&self) -> &[Timestamp] {
        &self.timestamps
    }

    pub fn into_timestamps(self) -> Vec<Timestamp> {
        self.timestamps
    }
}
