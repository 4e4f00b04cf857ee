//! Stabilization detection.

use serde::{Deserialize, Serialize};

/// What a completed step did to the lattice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepResult {
    /// At least one cell toppled.
    Changed,
    /// No cell toppled; every later step is also a no-op.
    Unchanged,
    /// No step has run yet.
    Unknown,
}

/// Latches onto the first quiescent sweep.
///
/// A sweep with no topples proves the configuration is a fixed point of the
/// rule, so stability is permanent once observed and later sweeps can be
/// skipped entirely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StabilizationTracker {
    last: StepResult,
}

impl StabilizationTracker {
    /// Tracker for a run with no completed steps.
    pub fn new() -> Self {
        Self {
            last: StepResult::Unknown,
        }
    }

    /// Restores a tracker from a recorded step result.
    pub fn resume(last: StepResult) -> Self {
        Self { last }
    }

    /// Records the outcome of one completed sweep.
    pub fn record(&mut self, changed: bool) -> StepResult {
        self.last = if changed {
            StepResult::Changed
        } else {
            StepResult::Unchanged
        };
        self.last
    }

    /// Outcome of the most recent step.
    pub fn current(&self) -> StepResult {
        self.last
    }

    /// True once a quiescent sweep has been observed.
    pub fn is_stable(&self) -> bool {
        self.last == StepResult::Unchanged
    }
}

impl Default for StabilizationTracker {
    fn default() -> Self {
        Self::new()
    }
}
