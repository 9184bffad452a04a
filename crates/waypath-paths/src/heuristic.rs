//! Distance estimates between grid cells, scaled to move costs.

use std::fmt;
use std::str::FromStr;

use waypath_core::Point;

use crate::traits::Estimate;

/// Cost of an orthogonal (up/down/left/right) move.
pub const STRAIGHT_COST: i32 = 10;

/// Cost of a diagonal move, ≈ `STRAIGHT_COST * √2`.
pub const DIAG_COST: i32 = 14;

/// Move costs the heuristics are scaled by.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Costs {
    pub straight: i32,
    pub diagonal: i32,
}

impl Default for Costs {
    fn default() -> Self {
        Self {
            straight: STRAIGHT_COST,
            diagonal: DIAG_COST,
        }
    }
}

/// Axis distances between `a` and `b`, widened so far-apart cells cannot
/// overflow.
#[inline]
fn deltas(a: Point, b: Point) -> (i64, i64) {
    (
        (i64::from(a.x) - i64::from(b.x)).abs(),
        (i64::from(a.y) - i64::from(b.y)).abs(),
    )
}

/// Narrow an estimate back to `i32`, saturating at `i32::MAX`.
#[inline]
fn clamp(v: i64) -> i32 {
    i32::try_from(v.max(0)).unwrap_or(i32::MAX)
}

/// Manhattan (L1) distance × straight cost.
///
/// Like every estimate here, saturates at `i32::MAX` instead of
/// overflowing.
#[inline]
pub fn manhattan_with(costs: Costs, a: Point, b: Point) -> i32 {
    let (dx, dy) = deltas(a, b);
    clamp((dx + dy).saturating_mul(costs.straight.into()))
}

/// Squared Euclidean distance × straight cost.
///
/// Overestimates the true cost as soon as two cells are more than one step
/// apart, so paths found with it may be longer than optimal. The search
/// goes much more greedily toward the goal in exchange.
#[inline]
pub fn euclidean_with(costs: Costs, a: Point, b: Point) -> i32 {
    let (dx, dy) = deltas(a, b);
    let sq = dx.saturating_mul(dx).saturating_add(dy.saturating_mul(dy));
    clamp(sq.saturating_mul(costs.straight.into()))
}

/// Octile distance: diagonal steps for the shorter axis, straight steps
/// for the rest.
#[inline]
pub fn diagonal_with(costs: Costs, a: Point, b: Point) -> i32 {
    let (dx, dy) = deltas(a, b);
    let (short, long) = if dx < dy { (dx, dy) } else { (dy, dx) };
    clamp(
        i64::from(costs.diagonal)
            .saturating_mul(short)
            .saturating_add(i64::from(costs.straight).saturating_mul(long - short)),
    )
}

/// [`manhattan_with`] using the default costs.
#[inline]
pub fn manhattan(a: Point, b: Point) -> i32 {
    manhattan_with(Costs::default(), a, b)
}

/// [`euclidean_with`] using the default costs.
#[inline]
pub fn euclidean(a: Point, b: Point) -> i32 {
    euclidean_with(Costs::default(), a, b)
}

/// [`diagonal_with`] using the default costs.
#[inline]
pub fn diagonal(a: Point, b: Point) -> i32 {
    diagonal_with(Costs::default(), a, b)
}

/// Selectable built-in heuristic.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum HeuristicKind {
    #[default]
    Manhattan,
    Euclidean,
    Diagonal,
}

impl HeuristicKind {
    pub const ALL: [HeuristicKind; 3] = [Self::Manhattan, Self::Euclidean, Self::Diagonal];

    pub fn name(self) -> &'static str {
        match self {
            Self::Manhattan => "manhattan",
            Self::Euclidean => "euclidean",
            Self::Diagonal => "diagonal",
        }
    }
}

impl fmt::Display for HeuristicKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Unrecognised heuristic name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseHeuristicError(pub String);

impl fmt::Display for ParseHeuristicError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown heuristic \u{201c}{}\u{201d} (expected manhattan, euclidean or diagonal)",
            self.0
        )
    }
}

impl std::error::Error for ParseHeuristicError {}

impl FromStr for HeuristicKind {
    type Err = ParseHeuristicError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseHeuristicError(s.to_string()))
    }
}

/// A built-in heuristic bound to a set of move costs.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Heuristic {
    pub kind: HeuristicKind,
    pub costs: Costs,
}

impl Heuristic {
    pub const fn new(kind: HeuristicKind, costs: Costs) -> Self {
        Self { kind, costs }
    }

    pub fn manhattan() -> Self {
        Self::new(HeuristicKind::Manhattan, Costs::default())
    }

    pub fn euclidean() -> Self {
        Self::new(HeuristicKind::Euclidean, Costs::default())
    }

    pub fn diagonal() -> Self {
        Self::new(HeuristicKind::Diagonal, Costs::default())
    }
}

impl Estimate for Heuristic {
    #[inline]
    fn estimate(&self, from: Point, to: Point) -> i32 {
        match self.kind {
            HeuristicKind::Manhattan => manhattan_with(self.costs, from, to),
            HeuristicKind::Euclidean => euclidean_with(self.costs, from, to),
            HeuristicKind::Diagonal => diagonal_with(self.costs, from, to),
        }
    }
}
