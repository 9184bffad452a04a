use waypath_core::Point;

use crate::graph::{Link, NodeId};

/// A graph the A* engine can walk.
///
/// Nodes are identified by dense [`NodeId`]s in `0..node_count()`. The
/// engine never stores anything on the graph itself, so one graph can be
/// shared by several engines at once.
pub trait SearchGraph {
    /// Number of nodes; every valid id is below it.
    fn node_count(&self) -> usize;

    /// Cell coordinate of `node`, fed to the heuristic.
    fn position(&self, node: NodeId) -> Point;

    /// Append the outgoing links of `node` into `buf`. The caller clears
    /// `buf` before calling. Costs must be non-negative.
    fn links(&self, node: NodeId, buf: &mut Vec<Link>);

    fn start(&self) -> Option<NodeId>;

    fn goal(&self) -> Option<NodeId>;
}

/// Heuristic estimate of the remaining cost between two cells.
///
/// Must be non-negative. It must never overestimate (admissible) for A* to
/// return cost-minimal paths, and must satisfy the triangle inequality
/// across links (consistent) for that to hold without reopening expanded
/// nodes, which this engine never does.
pub trait Estimate {
    fn estimate(&self, from: Point, to: Point) -> i32;
}

impl<F> Estimate for F
where
    F: Fn(Point, Point) -> i32,
{
    #[inline]
    fn estimate(&self, from: Point, to: Point) -> i32 {
        self(from, to)
    }
}
