//! Bincode format implementation.

use crate::error::SerdeError;
use crate::format::SnapshotFormat;
use talus_automata::{Cell, Snapshot};

/// Bincode serialization format.
///
/// Compact binary format, faster than JSON but not human-readable.
#[derive(Debug, Clone, Copy, Default)]
pub struct BincodeFormat;

impl BincodeFormat {
    /// Creates a new BincodeFormat.
    pub fn new() -> Self {
        Self
    }
}

impl SnapshotFormat for BincodeFormat {
    fn serialize<T: Cell>(&self, snapshot: &Snapshot<T>) -> Result<Vec<u8>, SerdeError> {
        let bytes = bincode::serde::encode_to_vec(snapshot, bincode::config::standard())?;
        Ok(bytes)
    }

    fn deserialize<T: Cell>(&self, bytes: &[u8]) -> Result<Snapshot<T>, SerdeError> {
        let (snapshot, _) = bincode::serde::decode_from_slice(bytes, bincode::config::standard())?;
        Ok(snapshot)
    }

    fn name(&self) -> &'static str {
        "bincode"
    }

    fn extension(&self) -> &'static str {
        "bin"
    }
}
