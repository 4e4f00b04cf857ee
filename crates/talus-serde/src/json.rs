//! JSON format implementation.

use crate::error::SerdeError;
use crate::format::SnapshotFormat;
use talus_automata::{Cell, Snapshot};

/// JSON serialization format.
///
/// Human-readable, git-diffable, good for debugging.
#[derive(Debug, Clone, Default)]
pub struct JsonFormat {
    /// Whether to pretty-print with indentation.
    pub pretty: bool,
}

impl JsonFormat {
    /// Creates a new JsonFormat with default settings (compact).
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new JsonFormat with pretty-printing enabled.
    pub fn pretty() -> Self {
        Self { pretty: true }
    }
}

impl SnapshotFormat for JsonFormat {
    fn serialize<T: Cell>(&self, snapshot: &Snapshot<T>) -> Result<Vec<u8>, SerdeError> {
        let bytes = if self.pretty {
            serde_json::to_vec_pretty(snapshot)?
        } else {
            serde_json::to_vec(snapshot)?
        };
        Ok(bytes)
    }

    fn deserialize<T: Cell>(&self, bytes: &[u8]) -> Result<Snapshot<T>, SerdeError> {
        Ok(serde_json::from_slice(bytes)?)
    }

    fn name(&self) -> &'static str {
        "JSON"
    }

    fn extension(&self) -> &'static str {
        "json"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use talus_automata::{Automaton, RuleKind, Scheduling, Symmetry};

    fn sample() -> Snapshot<i64> {
        let mut automaton = Automaton::<i64>::new(
            5000,
            2,
            Symmetry::Isotropic,
            Scheduling::Synchronous,
            RuleKind::Aether,
        )
        .unwrap();
        automaton.advance().unwrap();
        automaton.advance().unwrap();
        automaton.snapshot()
    }

    #[test]
    fn test_json_roundtrip() {
        let snapshot = sample();
        let format = JsonFormat::new();
        let bytes = format.serialize(&snapshot).unwrap();
        let loaded: Snapshot<i64> = format.deserialize(&bytes).unwrap();
        assert_eq!(loaded, snapshot);
    }

    #[test]
    fn test_json_pretty() {
        let snapshot = sample();
        let compact = JsonFormat::new();
        let pretty = JsonFormat::pretty();

        let compact_bytes = compact.serialize(&snapshot).unwrap();
        let pretty_bytes = pretty.serialize(&snapshot).unwrap();

        // Pretty format should be larger due to whitespace
        assert!(pretty_bytes.len() > compact_bytes.len());

        let _: Snapshot<i64> = compact.deserialize(&compact_bytes).unwrap();
        let _: Snapshot<i64> = pretty.deserialize(&pretty_bytes).unwrap();
    }

    #[test]
    fn test_json_rejects_garbage() {
        let format = JsonFormat::new();
        let result: Result<Snapshot<i64>, _> = format.deserialize(b"{not json");
        assert!(matches!(result, Err(SerdeError::Json(_))));
    }
}
