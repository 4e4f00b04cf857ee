//! The format abstraction.

use crate::error::SerdeError;
use talus_automata::{Cell, Snapshot};

/// A byte format for automaton snapshots.
pub trait SnapshotFormat {
    /// Serializes a snapshot to bytes.
    fn serialize<T: Cell>(&self, snapshot: &Snapshot<T>) -> Result<Vec<u8>, SerdeError>;

    /// Deserializes a snapshot from bytes.
    fn deserialize<T: Cell>(&self, bytes: &[u8]) -> Result<Snapshot<T>, SerdeError>;

    /// Human-readable format name.
    fn name(&self) -> &'static str;

    /// Conventional file extension (without the dot).
    fn extension(&self) -> &'static str;
}
