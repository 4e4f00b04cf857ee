//! The automaton model: configuration, storage selection, and stepping.

use crate::cell::Cell;
use crate::engine::{sweep_folded_sync, sweep_full_sync, sweep_sequential, SweepOutcome};
use crate::error::ModelError;
use crate::rule::{Rule, RuleKind};
use crate::snapshot::{Snapshot, SNAPSHOT_VERSION};
use crate::tracker::{StabilizationTracker, StepResult};
use serde::{Deserialize, Serialize};
use talus_grid::{AxisBounds, CenteredGrid, OrthantGrid, Position};

/// How much lattice symmetry the storage exploits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Symmetry {
    /// One stored cell per permutation/sign-flip orbit. Valid because a
    /// single origin seed keeps the configuration isotropic forever under
    /// synchronous stepping.
    Isotropic,
    /// Every lattice cell within range is stored.
    Full,
}

/// When topples take effect within a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scheduling {
    /// Every cell is evaluated against the pre-step state.
    Synchronous,
    /// Cells are updated in place in scan order; later cells see earlier
    /// topples from the same step.
    Sequential,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Store<T> {
    Folded(OrthantGrid<T>),
    Full(CenteredGrid<T>),
}

/// An n-dimensional chip-firing automaton seeded with a single value at the
/// origin.
///
/// # Examples
///
/// ```
/// use talus_automata::{Automaton, RuleKind, Scheduling, StepResult, Symmetry};
///
/// let mut automaton = Automaton::<i64>::new(
///     100,
///     2,
///     Symmetry::Isotropic,
///     Scheduling::Synchronous,
///     RuleKind::Aether,
/// )?;
/// while automaton.advance()? == StepResult::Changed {}
/// assert_eq!(automaton.total_value(), 100);
/// # Ok::<(), talus_automata::ModelError>(())
/// ```
#[derive(Debug)]
pub struct Automaton<T: Cell> {
    symmetry: Symmetry,
    scheduling: Scheduling,
    kind: RuleKind,
    rule: Box<dyn Rule<T>>,
    store: Store<T>,
    initial_value: T,
    step: u64,
    tracker: StabilizationTracker,
    bounds_touched: bool,
}

/// Initial allocation extent: enough for the seed plus one look-ahead layer.
const INITIAL_EXTENT: i64 = 2;

impl<T: Cell> Automaton<T> {
    /// Creates an automaton with `initial_value` at the origin of an
    /// n-dimensional lattice, all other cells zero.
    ///
    /// Fails if the dimension is zero, if the seed falls outside the cell
    /// type's overflow-safe range, or if sequential scheduling is combined
    /// with folded storage (the in-place scan breaks isotropy, so the fold
    /// would be unsound).
    pub fn new(
        initial_value: T,
        dimension: usize,
        symmetry: Symmetry,
        scheduling: Scheduling,
        rule: RuleKind,
    ) -> Result<Self, ModelError> {
        if dimension == 0 {
            return Err(ModelError::ZeroDimension);
        }
        if scheduling == Scheduling::Sequential && symmetry == Symmetry::Isotropic {
            return Err(ModelError::UnsupportedConfiguration(
                "sequential scheduling requires full storage".into(),
            ));
        }
        if let Some((min, max)) = T::safe_origin_range(dimension) {
            if initial_value < min || initial_value > max {
                return Err(ModelError::InvalidInitialValue {
                    value: initial_value.to_string(),
                    min: min.to_string(),
                    max: max.to_string(),
                    dimension,
                });
            }
        }
        let origin = Position::origin(dimension);
        let store = match symmetry {
            Symmetry::Isotropic => {
                let mut grid = OrthantGrid::new(dimension, INITIAL_EXTENT)?;
                grid.set(&origin, initial_value.clone());
                Store::Folded(grid)
            }
            Symmetry::Full => {
                let mut grid = CenteredGrid::new(dimension, INITIAL_EXTENT)?;
                grid.set(&origin, initial_value.clone());
                Store::Full(grid)
            }
        };
        Ok(Self {
            symmetry,
            scheduling,
            kind: rule,
            rule: rule.instantiate(),
            store,
            initial_value,
            step: 0,
            tracker: StabilizationTracker::new(),
            bounds_touched: false,
        })
    }

    /// Number of lattice axes.
    pub fn dimension(&self) -> usize {
        match &self.store {
            Store::Folded(grid) => grid.dimension(),
            Store::Full(grid) => grid.dimension(),
        }
    }

    /// The configured redistribution rule.
    pub fn rule(&self) -> RuleKind {
        self.kind
    }

    /// The configured storage symmetry.
    pub fn symmetry(&self) -> Symmetry {
        self.symmetry
    }

    /// The configured scheduling.
    pub fn scheduling(&self) -> Scheduling {
        self.scheduling
    }

    /// The origin seed.
    pub fn initial_value(&self) -> &T {
        &self.initial_value
    }

    /// Number of completed steps.
    pub fn step(&self) -> u64 {
        self.step
    }

    /// Outcome of the most recent step.
    pub fn changed(&self) -> StepResult {
        self.tracker.current()
    }

    /// True once a step with no topples has been observed.
    pub fn is_stable(&self) -> bool {
        self.tracker.is_stable()
    }

    /// Runs one whole-lattice sweep.
    ///
    /// If the previous sweep toppled within one layer of the allocation
    /// edge, the storage is grown first, so the sweep itself never writes
    /// out of bounds. Once the automaton is stable this is a cheap no-op.
    pub fn advance(&mut self) -> Result<StepResult, ModelError> {
        if self.tracker.is_stable() {
            return Ok(StepResult::Unchanged);
        }
        if self.bounds_touched {
            self.grow()?;
            self.bounds_touched = false;
        }
        let outcome = self.sweep()?;
        self.step += 1;
        if outcome.bounds_touched {
            self.bounds_touched = true;
        }
        Ok(self.tracker.record(outcome.changed))
    }

    fn sweep(&mut self) -> Result<SweepOutcome, ModelError> {
        match (&mut self.store, self.scheduling) {
            (Store::Folded(grid), Scheduling::Synchronous) => {
                let (next, outcome) = sweep_folded_sync(grid, self.rule.as_ref())?;
                *grid = next;
                Ok(outcome)
            }
            (Store::Full(grid), Scheduling::Synchronous) => {
                let (next, outcome) = sweep_full_sync(grid, self.rule.as_ref())?;
                *grid = next;
                Ok(outcome)
            }
            (Store::Full(grid), Scheduling::Sequential) => {
                Ok(sweep_sequential(grid, self.rule.as_ref()))
            }
            (Store::Folded(_), Scheduling::Sequential) => {
                unreachable!("rejected at construction")
            }
        }
    }

    fn grow(&mut self) -> Result<(), ModelError> {
        match &mut self.store {
            Store::Folded(grid) => {
                let grown = grid.grow()?;
                *grid = grown;
            }
            Store::Full(grid) => {
                let grown = grid.grow()?;
                *grid = grown;
            }
        }
        Ok(())
    }

    /// Value at an arbitrary lattice position, folding into canonical
    /// storage when isotropic. Positions outside the allocation read as
    /// zero.
    ///
    /// # Panics
    /// Panics if `coords` does not match the automaton's dimension.
    pub fn value_at(&self, coords: &[i64]) -> T {
        assert_eq!(
            coords.len(),
            self.dimension(),
            "position has wrong dimension"
        );
        let position = Position::new(coords.to_vec());
        match &self.store {
            Store::Folded(grid) => grid.get(&position.canonical()),
            Store::Full(grid) => grid.get(&position),
        }
    }

    /// Symmetric bounds of one axis over the allocated region.
    pub fn bounds(&self, axis: usize) -> AxisBounds {
        assert!(axis < self.dimension(), "axis {axis} out of range");
        let extent = self.extent();
        AxisBounds::new(-extent, extent)
    }

    /// Bounds of one axis within the stored region, given fixed coordinates
    /// of other axes. For folded storage the region is the canonical
    /// orthant.
    pub fn bound(&self, axis: usize, fixed: &[(usize, i64)]) -> AxisBounds {
        match &self.store {
            Store::Folded(grid) => grid.bound(axis, fixed),
            Store::Full(grid) => grid.bound(axis, fixed),
        }
    }

    /// Sum over the whole (unfolded) lattice; constant across steps for
    /// every rule in the family.
    pub fn total_value(&self) -> T {
        match &self.store {
            Store::Folded(grid) => {
                let mut total = T::zero();
                for (position, value) in grid.positions().zip(grid.flat()) {
                    if !value.is_zero() {
                        total = total.add(&value.mul_u64(position.orbit_weight()));
                    }
                }
                total
            }
            Store::Full(grid) => {
                let mut total = T::zero();
                for value in grid.flat() {
                    total = total.add(value);
                }
                total
            }
        }
    }

    fn extent(&self) -> i64 {
        match &self.store {
            Store::Folded(grid) => grid.max_coord(),
            Store::Full(grid) => grid.radius(),
        }
    }

    /// Captures the complete state for later reconstruction.
    pub fn snapshot(&self) -> Snapshot<T> {
        let values = match &self.store {
            Store::Folded(grid) => grid.flat().to_vec(),
            Store::Full(grid) => grid.flat().to_vec(),
        };
        Snapshot {
            version: SNAPSHOT_VERSION,
            dimension: self.dimension(),
            symmetry: self.symmetry,
            scheduling: self.scheduling,
            rule: self.kind,
            step: self.step,
            last_step: self.tracker.current(),
            bounds_touched: self.bounds_touched,
            initial_value: self.initial_value.clone(),
            extent: self.extent(),
            values,
        }
    }

    /// Reconstructs an automaton mid-run from a snapshot.
    ///
    /// Continuing from the restored state produces the same trajectory as
    /// the run the snapshot was taken from.
    pub fn from_snapshot(snapshot: Snapshot<T>) -> Result<Self, ModelError> {
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(ModelError::UnsupportedSnapshotVersion(snapshot.version));
        }
        if snapshot.dimension == 0 {
            return Err(ModelError::ZeroDimension);
        }
        if snapshot.scheduling == Scheduling::Sequential && snapshot.symmetry == Symmetry::Isotropic
        {
            return Err(ModelError::UnsupportedConfiguration(
                "sequential scheduling requires full storage".into(),
            ));
        }
        if snapshot.extent < 0 {
            return Err(ModelError::MalformedSnapshot(format!(
                "negative extent {}",
                snapshot.extent
            )));
        }
        let store = match snapshot.symmetry {
            Symmetry::Isotropic => Store::Folded(OrthantGrid::from_flat(
                snapshot.dimension,
                snapshot.extent,
                snapshot.values,
            )?),
            Symmetry::Full => Store::Full(CenteredGrid::from_flat(
                snapshot.dimension,
                snapshot.extent,
                snapshot.values,
            )?),
        };
        Ok(Self {
            symmetry: snapshot.symmetry,
            scheduling: snapshot.scheduling,
            kind: snapshot.rule,
            rule: snapshot.rule.instantiate(),
            store,
            initial_value: snapshot.initial_value,
            step: snapshot.step,
            tracker: StabilizationTracker::resume(snapshot.last_step),
            bounds_touched: snapshot.bounds_touched,
        })
    }
}
