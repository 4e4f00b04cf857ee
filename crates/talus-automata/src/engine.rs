//! Whole-lattice sweep engines.
//!
//! A sweep visits every stored cell once and applies the redistribution rule.
//! Synchronous sweeps evaluate every cell against the pre-sweep state and
//! apply all topples together; the sequential sweep mutates in place so each
//! cell sees the effects of cells visited earlier in the same pass.
//!
//! Engines never grow the grid. They report boundary proximity through
//! [`SweepOutcome::bounds_touched`] and the caller grows before the next
//! sweep, so activity is always at least one layer away from the edge of the
//! allocation when a sweep starts.

use crate::cell::Cell;
use crate::rule::{NeighborValue, Rule, Topple};
use std::collections::HashMap;
use talus_grid::{CenteredGrid, GridError, OrthantGrid, Position};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// What a sweep observed about the lattice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepOutcome {
    /// True if any cell toppled.
    pub changed: bool,
    /// True if a topple occurred within one layer of the allocation edge;
    /// the caller must grow before sweeping again.
    pub bounds_touched: bool,
}

fn neighbor_values<T: Cell>(
    position: &Position,
    lookup: impl Fn(&Position) -> T,
) -> Vec<NeighborValue<T>> {
    position
        .neighbors()
        .into_iter()
        .map(|(direction, neighbor)| NeighborValue {
            direction,
            value: lookup(&neighbor),
        })
        .collect()
}

/// Synchronous sweep over full (unfolded) storage.
///
/// Builds the post-sweep grid from scratch: each cell's retained value lands
/// first, then every topple's deltas are routed to the stored neighbors.
pub fn sweep_full_sync<T: Cell>(
    grid: &CenteredGrid<T>,
    rule: &dyn Rule<T>,
) -> Result<(CenteredGrid<T>, SweepOutcome), GridError> {
    let radius = grid.radius();
    let positions: Vec<Position> = grid.positions().collect();

    let evaluate = |position: &Position| -> Topple<T> {
        let value = grid.get(position);
        let neighbors = neighbor_values(position, |q| grid.get(q));
        rule.redistribute(&value, &neighbors)
    };

    #[cfg(feature = "parallel")]
    let topples: Vec<Topple<T>> = positions.par_iter().map(evaluate).collect();
    #[cfg(not(feature = "parallel"))]
    let topples: Vec<Topple<T>> = positions.iter().map(evaluate).collect();

    let mut next = CenteredGrid::new(grid.dimension(), radius)?;
    let mut outcome = SweepOutcome {
        changed: false,
        bounds_touched: false,
    };
    for (position, topple) in positions.iter().zip(topples) {
        if !topple.value.is_zero() {
            next.add(position, topple.value);
        }
        if topple.toppled {
            outcome.changed = true;
            if position.radius() >= radius - 1 {
                outcome.bounds_touched = true;
            }
            for (direction, delta) in topple.deltas {
                next.add(&position.neighbor(direction), delta);
            }
        }
    }
    Ok((next, outcome))
}

/// Synchronous sweep over folded (one cell per symmetry orbit) storage.
///
/// Each canonical cell is evaluated against the canonical images of its
/// neighbors. Outgoing deltas are grouped by canonical target and rescaled by
/// the ratio of orbit sizes, so that the folded total stays equal to the sum
/// the unfolded lattice would hold over the whole orbit.
pub fn sweep_folded_sync<T: Cell>(
    grid: &OrthantGrid<T>,
    rule: &dyn Rule<T>,
) -> Result<(OrthantGrid<T>, SweepOutcome), GridError> {
    let max_coord = grid.max_coord();
    let positions: Vec<Position> = grid.positions().collect();

    let evaluate = |position: &Position| -> Topple<T> {
        let value = grid.get(position);
        let neighbors = neighbor_values(position, |q| grid.get(&q.canonical()));
        rule.redistribute(&value, &neighbors)
    };

    #[cfg(feature = "parallel")]
    let topples: Vec<Topple<T>> = positions.par_iter().map(evaluate).collect();
    #[cfg(not(feature = "parallel"))]
    let topples: Vec<Topple<T>> = positions.iter().map(evaluate).collect();

    let mut next = OrthantGrid::new(grid.dimension(), max_coord)?;
    let mut outcome = SweepOutcome {
        changed: false,
        bounds_touched: false,
    };
    for (position, topple) in positions.iter().zip(topples) {
        if !topple.value.is_zero() {
            next.add(position, topple.value);
        }
        if !topple.toppled {
            continue;
        }
        outcome.changed = true;
        if position.coord(0) >= max_coord - 1 {
            outcome.bounds_touched = true;
        }

        let source_weight = position.orbit_weight();
        let mut grouped: HashMap<Position, T> = HashMap::new();
        for (direction, delta) in topple.deltas {
            let target = position.neighbor(direction).canonical();
            let slot = grouped.entry(target).or_insert_with(T::zero);
            *slot = slot.add(&delta);
        }
        for (target, total) in grouped {
            let scaled = total.mul_u64(source_weight);
            let (share, remainder) = scaled.div_rem_u64(target.orbit_weight());
            // Exact by isotropy: the whole source orbit sends the same total
            // into the target orbit, spread evenly over its members.
            assert!(
                remainder.is_zero(),
                "symmetry fold produced a non-integral share at {:?}",
                target.coords()
            );
            next.add(&target, share);
        }
    }
    Ok((next, outcome))
}

/// Sequential in-place sweep over full storage, in row-major scan order.
///
/// Cells visited later in the pass see the values already deposited by
/// earlier topples; rules that are not order independent produce different
/// trajectories here than under the synchronous engines.
pub fn sweep_sequential<T: Cell>(grid: &mut CenteredGrid<T>, rule: &dyn Rule<T>) -> SweepOutcome {
    let radius = grid.radius();
    let positions: Vec<Position> = grid.positions().collect();
    let mut outcome = SweepOutcome {
        changed: false,
        bounds_touched: false,
    };
    for position in &positions {
        // An in-place cascade can push value onto the outermost layer within
        // this same pass. Those cells wait for the growth the cascade already
        // triggered; firing them now would write outside the allocation.
        if position.radius() >= radius {
            continue;
        }
        let value = grid.get(position);
        let neighbors = neighbor_values(position, |q| grid.get(q));
        let topple = rule.redistribute(&value, &neighbors);
        if !topple.toppled {
            continue;
        }
        outcome.changed = true;
        if position.radius() >= radius - 1 {
            outcome.bounds_touched = true;
        }
        grid.set(position, topple.value);
        for (direction, delta) in topple.deltas {
            grid.add(&position.neighbor(direction), delta);
        }
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::RuleKind;

    fn pos(coords: &[i64]) -> Position {
        Position::new(coords.to_vec())
    }

    fn seeded_full(radius: i64, value: i64) -> CenteredGrid<i64> {
        let mut grid = CenteredGrid::new(2, radius).unwrap();
        grid.set(&Position::origin(2), value);
        grid
    }

    #[test]
    fn test_full_sync_even_split() {
        let grid = seeded_full(2, 100);
        let rule = RuleKind::Aether.instantiate::<i64>();
        let (next, outcome) = sweep_full_sync(&grid, rule.as_ref()).unwrap();
        assert!(outcome.changed);
        assert!(!outcome.bounds_touched);
        assert_eq!(next.get(&pos(&[0, 0])), 20);
        assert_eq!(next.get(&pos(&[1, 0])), 20);
        assert_eq!(next.get(&pos(&[0, -1])), 20);
        assert_eq!(next.get(&pos(&[1, 1])), 0);
    }

    #[test]
    fn test_full_sync_stable_lattice_reports_no_change() {
        let grid = seeded_full(2, 4);
        let rule = RuleKind::Aether.instantiate::<i64>();
        let (next, outcome) = sweep_full_sync(&grid, rule.as_ref()).unwrap();
        assert!(!outcome.changed);
        assert_eq!(next, grid);
    }

    #[test]
    fn test_full_sync_flags_boundary_proximity() {
        let mut grid = CenteredGrid::new(2, 3).unwrap();
        grid.set(&pos(&[2, 0]), 100);
        let rule = RuleKind::Aether.instantiate::<i64>();
        let (_, outcome) = sweep_full_sync(&grid, rule.as_ref()).unwrap();
        assert!(outcome.bounds_touched);
    }

    #[test]
    fn test_folded_sync_matches_full_on_first_sweep() {
        let mut folded = OrthantGrid::new(2, 2).unwrap();
        folded.set(&Position::origin(2), 100);
        let rule = RuleKind::Aether.instantiate::<i64>();
        let (next, outcome) = sweep_folded_sync(&folded, rule.as_ref()).unwrap();
        assert!(outcome.changed);
        // All four unfolded neighbors fold onto (1, 0); its stored value is
        // the per-member value, not the orbit total.
        assert_eq!(next.get(&pos(&[0, 0])), 20);
        assert_eq!(next.get(&pos(&[1, 0])), 20);
    }

    #[test]
    fn test_folded_sync_second_sweep_scales_by_orbit() {
        let mut folded = OrthantGrid::new(2, 3).unwrap();
        folded.set(&Position::origin(2), 100);
        let rule = RuleKind::Aether.instantiate::<i64>();
        let (second, _) = sweep_folded_sync(&folded, rule.as_ref()).unwrap();
        let (third, _) = sweep_folded_sync(&second, rule.as_ref()).unwrap();
        assert_eq!(third.get(&pos(&[0, 0])), 20);
        assert_eq!(third.get(&pos(&[1, 0])), 5);
        assert_eq!(third.get(&pos(&[1, 1])), 10);
        assert_eq!(third.get(&pos(&[2, 0])), 5);
    }

    #[test]
    fn test_sequential_sweep_sees_earlier_topples() {
        // Scan order visits (0,0) after its -x neighbor; under the abelian
        // sandpile the totals still stabilize identically, but within one
        // sweep the in-place engine can cascade where synchronous cannot.
        let mut grid = CenteredGrid::new(1, 3).unwrap();
        grid.set(&pos(&[0]), 2);
        grid.set(&pos(&[1]), 1);
        let rule = RuleKind::Sandpile.instantiate::<i64>();
        let outcome = sweep_sequential(&mut grid, rule.as_ref());
        assert!(outcome.changed);
        // (0) fires first, pushing (1) to 2, which fires in the same pass.
        assert_eq!(grid.get(&pos(&[0])), 1);
        assert_eq!(grid.get(&pos(&[1])), 0);
        assert_eq!(grid.get(&pos(&[2])), 1);
        assert_eq!(grid.get(&pos(&[-1])), 1);
    }

    #[test]
    fn test_sweeps_conserve_total_value() {
        let mut grid = CenteredGrid::new(2, 3).unwrap();
        grid.set(&pos(&[0, 0]), 87);
        grid.set(&pos(&[1, -1]), -13);
        let rule = RuleKind::Aether.instantiate::<i64>();
        let (next, _) = sweep_full_sync(&grid, rule.as_ref()).unwrap();
        let total: i64 = next.flat().iter().sum();
        assert_eq!(total, 87 - 13);
    }
}
