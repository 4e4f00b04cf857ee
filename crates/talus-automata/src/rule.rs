//! The redistribution (toppling) rule family.
//!
//! Every rule is a pure function of a cell's value and the values of its 2n
//! axis neighbors, producing the cell's new value, per-direction deltas, and
//! whether the cell toppled. Rules are injected into the step engines as
//! strategies; the engines never special-case a variant.
//!
//! All rules share two contracts:
//! - conservation: the amount removed from the cell equals the sum of the
//!   emitted deltas (truncation remainders stay at the source), and
//! - determinism: identical inputs produce identical outputs.
//!
//! The close variants (`Aether`, `NearAetherOne`, `NearAetherFive`) differ
//! only in how they walk the distinct neighbor-value levels; the divergence
//! between them under different sweep orders is the property the crate
//! exists to study, so their tie-break details are deliberately not unified.

use crate::cell::Cell;
use serde::{Deserialize, Serialize};
use std::fmt;
use talus_grid::Direction;

/// A neighbor's direction tag and current value, as seen by a rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NeighborValue<T> {
    /// Direction from the toppling cell to this neighbor.
    pub direction: Direction,
    /// The neighbor's value at the time of evaluation.
    pub value: T,
}

/// Result of evaluating a rule at one cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topple<T> {
    /// The cell's new value (one share plus any truncation remainder stays).
    pub value: T,
    /// Nonzero contributions to apply to neighbors, tagged by direction.
    pub deltas: Vec<(Direction, T)>,
    /// True if the cell redistributed anything.
    pub toppled: bool,
}

impl<T: Cell> Topple<T> {
    fn unchanged(value: &T) -> Self {
        Self {
            value: value.clone(),
            deltas: Vec::new(),
            toppled: false,
        }
    }
}

/// Identifies a redistribution rule; selects the strategy at construction
/// and rides along in snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    /// Walk every distinct smaller-neighbor level, largest first; levels
    /// yielding a zero share are skipped but the walk continues.
    Aether,
    /// Like [`RuleKind::Aether`], but neighbor values are bumped by each
    /// credited share, so later divisors and amounts see the shares already
    /// given out; stops at the first zero share.
    NearAetherOne,
    /// Like [`RuleKind::Aether`], but stops the walk entirely at the first
    /// zero share.
    NearAetherFive,
    /// A single division at the smallest active neighbor value, crediting
    /// every active neighbor once.
    Simple,
    /// Classic abelian sandpile: at value 2n and above, send exactly one
    /// grain to each neighbor.
    Sandpile,
    /// Unconditional division by 2n + 1; shares aimed at equal-valued
    /// neighbors stay at the source.
    SpreadIntegerValue,
}

impl RuleKind {
    /// Short stable name, used in messages and serialized forms.
    pub fn name(&self) -> &'static str {
        match self {
            RuleKind::Aether => "aether",
            RuleKind::NearAetherOne => "near_aether_one",
            RuleKind::NearAetherFive => "near_aether_five",
            RuleKind::Simple => "simple",
            RuleKind::Sandpile => "sandpile",
            RuleKind::SpreadIntegerValue => "spread_integer_value",
        }
    }

    /// True for rules whose stable configuration is known to be independent
    /// of the order topplings are applied in. Only these may be compared
    /// across synchronous and sequential runs.
    pub fn is_order_independent(&self) -> bool {
        matches!(self, RuleKind::Sandpile)
    }

    /// Boxes the strategy implementing this rule.
    pub fn instantiate<T: Cell>(&self) -> Box<dyn Rule<T>> {
        match self {
            RuleKind::Aether => Box::new(Aether),
            RuleKind::NearAetherOne => Box::new(NearAetherOne),
            RuleKind::NearAetherFive => Box::new(NearAetherFive),
            RuleKind::Simple => Box::new(Simple),
            RuleKind::Sandpile => Box::new(Sandpile),
            RuleKind::SpreadIntegerValue => Box::new(SpreadIntegerValue),
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A redistribution strategy.
///
/// `neighbors` always carries one entry per direction (2n entries); values of
/// unallocated neighbors are the background zero. Worst-case work is
/// O(neighbor-count^2) due to repeated level extraction.
pub trait Rule<T: Cell>: fmt::Debug + Send + Sync {
    /// Which member of the family this is.
    fn kind(&self) -> RuleKind;

    /// Evaluates the rule at one cell.
    fn redistribute(&self, value: &T, neighbors: &[NeighborValue<T>]) -> Topple<T>;
}

/// Baseline level-walking rule. See [`RuleKind::Aether`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Aether;

impl<T: Cell> Rule<T> for Aether {
    fn kind(&self) -> RuleKind {
        RuleKind::Aether
    }

    fn redistribute(&self, value: &T, neighbors: &[NeighborValue<T>]) -> Topple<T> {
        descend_levels(value, neighbors, false, false)
    }
}

/// Level walk with share feedback and early stop. See
/// [`RuleKind::NearAetherOne`].
#[derive(Debug, Clone, Copy, Default)]
pub struct NearAetherOne;

impl<T: Cell> Rule<T> for NearAetherOne {
    fn kind(&self) -> RuleKind {
        RuleKind::NearAetherOne
    }

    fn redistribute(&self, value: &T, neighbors: &[NeighborValue<T>]) -> Topple<T> {
        descend_levels(value, neighbors, true, true)
    }
}

/// Level walk with early stop. See [`RuleKind::NearAetherFive`].
#[derive(Debug, Clone, Copy, Default)]
pub struct NearAetherFive;

impl<T: Cell> Rule<T> for NearAetherFive {
    fn kind(&self) -> RuleKind {
        RuleKind::NearAetherFive
    }

    fn redistribute(&self, value: &T, neighbors: &[NeighborValue<T>]) -> Topple<T> {
        descend_levels(value, neighbors, true, false)
    }
}

/// One division at the smallest active level. See [`RuleKind::Simple`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Simple;

impl<T: Cell> Rule<T> for Simple {
    fn kind(&self) -> RuleKind {
        RuleKind::Simple
    }

    fn redistribute(&self, value: &T, neighbors: &[NeighborValue<T>]) -> Topple<T> {
        let active: Vec<&NeighborValue<T>> =
            neighbors.iter().filter(|n| n.value < *value).collect();
        let Some(level) = active.iter().map(|n| &n.value).min() else {
            return Topple::unchanged(value);
        };
        let level = (*level).clone();
        let share_count = active.len() as u64 + 1;
        let to_share = value.sub(&level);
        let (share, remainder) = to_share.div_rem_u64(share_count);
        if share.is_zero() {
            return Topple::unchanged(value);
        }
        let deltas = active
            .iter()
            .map(|n| (n.direction, share.clone()))
            .collect();
        Topple {
            value: value.sub(&to_share).add(&remainder).add(&share),
            deltas,
            toppled: true,
        }
    }
}

/// Classic abelian sandpile firing. See [`RuleKind::Sandpile`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Sandpile;

impl<T: Cell> Rule<T> for Sandpile {
    fn kind(&self) -> RuleKind {
        RuleKind::Sandpile
    }

    fn redistribute(&self, value: &T, neighbors: &[NeighborValue<T>]) -> Topple<T> {
        let threshold = T::from_u64(neighbors.len() as u64);
        if *value < threshold {
            return Topple::unchanged(value);
        }
        let grain = T::from_u64(1);
        let deltas = neighbors
            .iter()
            .map(|n| (n.direction, grain.clone()))
            .collect();
        Topple {
            value: value.sub(&threshold),
            deltas,
            toppled: true,
        }
    }
}

/// Unconditional division by 2n + 1. See [`RuleKind::SpreadIntegerValue`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SpreadIntegerValue;

impl<T: Cell> Rule<T> for SpreadIntegerValue {
    fn kind(&self) -> RuleKind {
        RuleKind::SpreadIntegerValue
    }

    fn redistribute(&self, value: &T, neighbors: &[NeighborValue<T>]) -> Topple<T> {
        if neighbors.iter().all(|n| n.value == *value) {
            return Topple::unchanged(value);
        }
        let (share, remainder) = value.div_rem_u64(neighbors.len() as u64 + 1);
        if share.is_zero() {
            return Topple::unchanged(value);
        }
        let mut kept = share.add(&remainder);
        let mut deltas = Vec::with_capacity(neighbors.len());
        for neighbor in neighbors {
            if neighbor.value == *value {
                // The share aimed at an equal neighbor stays home.
                kept = kept.add(&share);
            } else {
                deltas.push((neighbor.direction, share.clone()));
            }
        }
        Topple {
            value: kept,
            deltas,
            toppled: true,
        }
    }
}

/// Shared level walk of the Aether-style rules.
///
/// Active neighbors (value strictly below the cell's) are sorted ascending
/// and their distinct values are visited from the largest downward. At each
/// level the amount above the level is split between the cell and every
/// active neighbor at or below the level; the cell keeps one share plus the
/// truncation remainder.
fn descend_levels<T: Cell>(
    value: &T,
    neighbors: &[NeighborValue<T>],
    early_stop: bool,
    feedback: bool,
) -> Topple<T> {
    let mut active: Vec<NeighborValue<T>> = neighbors
        .iter()
        .filter(|n| n.value < *value)
        .cloned()
        .collect();
    if active.is_empty() {
        return Topple::unchanged(value);
    }
    active.sort_by(|a, b| a.value.cmp(&b.value));

    let mut value = value.clone();
    let mut deltas: Vec<T> = vec![T::zero(); neighbors.len()];
    let mut toppled = false;
    let mut previous: Option<T> = None;

    let mut i = active.len();
    while i > 0 {
        i -= 1;
        let level = active[i].value.clone();
        if previous.as_ref() == Some(&level) {
            // Same level as the one just processed; it was already credited.
            active.truncate(i);
            continue;
        }
        let share_count = i as u64 + 2;
        let to_share = value.sub(&level);
        let (share, remainder) = to_share.div_rem_u64(share_count);
        if share.is_zero() {
            if early_stop {
                break;
            }
            previous = Some(level);
            active.truncate(i);
            continue;
        }
        toppled = true;
        value = value.sub(&to_share).add(&remainder).add(&share);
        for neighbor in active.iter().take(i + 1) {
            let slot = &mut deltas[neighbor.direction.index()];
            *slot = slot.add(&share);
        }
        if feedback {
            for neighbor in active.iter_mut().take(i + 1) {
                neighbor.value = neighbor.value.add(&share);
            }
            previous = Some(level.add(&share));
        } else {
            previous = Some(level);
        }
        active.truncate(i);
    }

    let deltas = deltas
        .into_iter()
        .enumerate()
        .filter(|(_, delta)| !delta.is_zero())
        .map(|(index, delta)| (Direction::from_index(index), delta))
        .collect();
    Topple {
        value,
        deltas,
        toppled,
    }
}
