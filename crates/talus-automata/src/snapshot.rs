//! Self-contained automaton state records.
//!
//! A snapshot carries everything needed to reconstruct an automaton
//! mid-run: configuration, progress counters, and the raw cell values in
//! storage order. The concrete byte formats live in `talus-serde`; this
//! module only defines the serializable shape.

use crate::model::{Scheduling, Symmetry};
use crate::rule::RuleKind;
use crate::tracker::StepResult;
use serde::{Deserialize, Serialize};

/// Format revision written into every snapshot.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Complete serializable state of an automaton.
///
/// `extent` is the storage radius for full grids and the largest canonical
/// coordinate for folded grids; `values` holds the stored cells in the
/// grid's native flat order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot<T> {
    pub version: u32,
    pub dimension: usize,
    pub symmetry: Symmetry,
    pub scheduling: Scheduling,
    pub rule: RuleKind,
    pub step: u64,
    pub last_step: StepResult,
    pub bounds_touched: bool,
    pub initial_value: T,
    pub extent: i64,
    pub values: Vec<T>,
}
