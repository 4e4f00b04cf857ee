//! Snapshot serialization for talus automata.
//!
//! Converts [`Snapshot`]s to and from bytes through pluggable formats:
//! [`JsonFormat`] for a readable, diffable representation and
//! [`BincodeFormat`] for compact binary storage. The [`save`] and [`load`]
//! helpers go directly between a live [`Automaton`] and bytes.
//!
//! # Examples
//!
//! ```
//! use talus_automata::{Automaton, RuleKind, Scheduling, Symmetry};
//! use talus_serde::{load, save, JsonFormat};
//!
//! let mut automaton = Automaton::<i64>::new(
//!     500,
//!     2,
//!     Symmetry::Isotropic,
//!     Scheduling::Synchronous,
//!     RuleKind::Aether,
//! )?;
//! automaton.advance()?;
//!
//! let bytes = save(&automaton, &JsonFormat::pretty())?;
//! let restored: Automaton<i64> = load(&bytes, &JsonFormat::new())?;
//! assert_eq!(restored.step(), 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod bincode;
mod error;
mod format;
mod json;

pub use crate::bincode::BincodeFormat;
pub use crate::error::SerdeError;
pub use crate::format::SnapshotFormat;
pub use crate::json::JsonFormat;

use talus_automata::{Automaton, Cell, Snapshot};

/// Serializes an automaton's current state.
pub fn save<T: Cell, F: SnapshotFormat>(
    automaton: &Automaton<T>,
    format: &F,
) -> Result<Vec<u8>, SerdeError> {
    format.serialize(&automaton.snapshot())
}

/// Reconstructs an automaton from serialized state.
pub fn load<T: Cell, F: SnapshotFormat>(
    bytes: &[u8],
    format: &F,
) -> Result<Automaton<T>, SerdeError> {
    let snapshot: Snapshot<T> = format.deserialize(bytes)?;
    Ok(Automaton::from_snapshot(snapshot)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use talus_automata::{RuleKind, Scheduling, StepResult, Symmetry};

    #[test]
    fn test_save_load_continues_identically() {
        let mut original = Automaton::<i64>::new(
            43_210,
            2,
            Symmetry::Full,
            Scheduling::Sequential,
            RuleKind::Simple,
        )
        .unwrap();
        for _ in 0..4 {
            original.advance().unwrap();
        }

        let bytes = save(&original, &BincodeFormat::new()).unwrap();
        let mut restored: Automaton<i64> = load(&bytes, &BincodeFormat::new()).unwrap();

        assert_eq!(restored.step(), original.step());
        assert_eq!(restored.rule(), original.rule());
        for _ in 0..4 {
            assert_eq!(restored.advance().unwrap(), original.advance().unwrap());
        }
        assert_eq!(restored.snapshot(), original.snapshot());
    }

    #[test]
    fn test_load_rejects_tampered_version() {
        let mut automaton = Automaton::<i64>::new(
            100,
            2,
            Symmetry::Isotropic,
            Scheduling::Synchronous,
            RuleKind::Aether,
        )
        .unwrap();
        automaton.advance().unwrap();

        let mut snapshot = automaton.snapshot();
        snapshot.version = 7;
        let bytes = JsonFormat::new().serialize(&snapshot).unwrap();
        let result: Result<Automaton<i64>, _> = load(&bytes, &JsonFormat::new());
        assert!(matches!(result, Err(SerdeError::Model(_))));
    }

    #[test]
    fn test_stability_survives_roundtrip() {
        let mut automaton = Automaton::<i64>::new(
            4,
            2,
            Symmetry::Isotropic,
            Scheduling::Synchronous,
            RuleKind::Aether,
        )
        .unwrap();
        assert_eq!(automaton.advance().unwrap(), StepResult::Unchanged);

        let bytes = save(&automaton, &JsonFormat::new()).unwrap();
        let restored: Automaton<i64> = load(&bytes, &JsonFormat::new()).unwrap();
        assert!(restored.is_stable());
    }
}
