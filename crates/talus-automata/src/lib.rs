//! N-dimensional chip-firing automata.
//!
//! A single integer seed at the origin of an n-dimensional lattice is
//! repeatedly redistributed to axis neighbors under one of a family of
//! toppling rules. The crate provides the rule family, synchronous and
//! sequential step engines over full or symmetry-folded storage, overflow
//! validation, stabilization detection, and self-contained snapshots.
//!
//! # Examples
//!
//! ```
//! use talus_automata::{Automaton, RuleKind, Scheduling, StepResult, Symmetry};
//!
//! let mut automaton = Automaton::<i64>::new(
//!     2024,
//!     2,
//!     Symmetry::Isotropic,
//!     Scheduling::Synchronous,
//!     RuleKind::Aether,
//! )?;
//! while automaton.advance()? == StepResult::Changed {}
//! assert!(automaton.is_stable());
//! assert_eq!(automaton.total_value(), 2024);
//! # Ok::<(), talus_automata::ModelError>(())
//! ```

pub mod cell;
pub mod engine;
pub mod error;
pub mod model;
pub mod rule;
pub mod snapshot;
pub mod tracker;

pub use cell::Cell;
pub use error::ModelError;
pub use model::{Automaton, Scheduling, Symmetry};
pub use rule::{NeighborValue, Rule, RuleKind, Topple};
pub use snapshot::{Snapshot, SNAPSHOT_VERSION};
pub use tracker::{StabilizationTracker, StepResult};
