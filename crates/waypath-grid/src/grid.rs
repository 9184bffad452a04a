//! Walkability grid and its conversion into a search graph.

use waypath_core::{Point, Range};
use waypath_paths::{Costs, Graph, Link, NodeId, SearchGraph};

#[cfg(feature = "serde")]
use crate::map::MapError;

/// Which moves link neighbouring cells.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Connectivity {
    /// Orthogonal moves only.
    #[default]
    Four,
    /// Orthogonal and diagonal moves. A diagonal move needs both orthogonal
    /// cells it passes between to be walkable (no corner cutting).
    Eight,
}

/// A rectangular map of walkable and blocked cells.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "GridRepr"))]
pub struct Grid {
    bounds: Range,
    walkable: Vec<bool>,
    start: Option<Point>,
    goal: Option<Point>,
}

/// Unchecked serialized form of a [`Grid`].
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct GridRepr {
    bounds: Range,
    walkable: Vec<bool>,
    start: Option<Point>,
    goal: Option<Point>,
}

#[cfg(feature = "serde")]
impl TryFrom<GridRepr> for Grid {
    type Error = MapError;

    fn try_from(r: GridRepr) -> Result<Self, MapError> {
        if r.walkable.len() != r.bounds.len() {
            return Err(MapError::CellCount {
                expected: r.bounds.len(),
                found: r.walkable.len(),
            });
        }
        for p in [r.start, r.goal].into_iter().flatten() {
            if !r.bounds.contains(p) {
                return Err(MapError::OutOfBounds(p));
            }
        }
        Ok(Self {
            bounds: r.bounds,
            walkable: r.walkable,
            start: r.start,
            goal: r.goal,
        })
    }
}

impl Grid {
    /// Create a fully walkable `width`×`height` grid.
    pub fn new(width: i32, height: i32) -> Self {
        let bounds = Range::new(0, 0, width.max(0), height.max(0));
        Self {
            bounds,
            walkable: vec![true; bounds.len()],
            start: None,
            goal: None,
        }
    }

    pub fn bounds(&self) -> Range {
        self.bounds
    }

    pub fn width(&self) -> i32 {
        self.bounds.width()
    }

    pub fn height(&self) -> i32 {
        self.bounds.height()
    }

    pub fn contains(&self, p: Point) -> bool {
        self.bounds.contains(p)
    }

    /// Whether `p` is inside the grid and walkable.
    pub fn is_walkable(&self, p: Point) -> bool {
        self.bounds.index_of(p).is_some_and(|i| self.walkable[i])
    }

    /// Set the walkability of `p`. Does nothing if out of bounds.
    pub fn set_walkable(&mut self, p: Point, walkable: bool) {
        if let Some(i) = self.bounds.index_of(p) {
            self.walkable[i] = walkable;
        }
    }

    /// Set every cell to `walkable`.
    pub fn fill(&mut self, walkable: bool) {
        self.walkable.fill(walkable);
    }

    /// Number of walkable cells.
    pub fn count_walkable(&self) -> usize {
        self.walkable.iter().filter(|&&w| w).count()
    }

    pub fn start(&self) -> Option<Point> {
        self.start
    }

    pub fn goal(&self) -> Option<Point> {
        self.goal
    }

    /// Mark `p` as the start cell. `None` clears it; out-of-bounds points
    /// are ignored.
    pub fn set_start(&mut self, p: Option<Point>) {
        self.start = p.filter(|&p| self.contains(p));
    }

    /// Mark `p` as the goal cell. `None` clears it; out-of-bounds points
    /// are ignored.
    pub fn set_goal(&mut self, p: Option<Point>) {
        self.goal = p.filter(|&p| self.contains(p));
    }

    /// Build the search graph: one node per cell in row-major order, links
    /// between walkable neighbours per `conn`, priced by `costs`. Blocked
    /// cells become nodes without links, so a start or goal placed on one
    /// is simply unreachable.
    pub fn to_graph(&self, conn: Connectivity, costs: Costs) -> CellGraph {
        let mut graph = Graph::with_capacity(self.bounds.len());
        for p in self.bounds {
            graph.add_node(p);
        }
        for (i, p) in self.bounds.iter().enumerate() {
            if !self.walkable[i] {
                continue;
            }
            let from = NodeId(i);
            for n in p.neighbors_4() {
                if let Some(to) = self.walkable_id(n) {
                    self.add_link(&mut graph, from, to, costs.straight);
                }
            }
            if conn == Connectivity::Eight {
                for n in p.diagonals() {
                    let Some(to) = self.walkable_id(n) else {
                        continue;
                    };
                    if self.is_walkable(Point::new(n.x, p.y)) && self.is_walkable(Point::new(p.x, n.y))
                    {
                        self.add_link(&mut graph, from, to, costs.diagonal);
                    }
                }
            }
        }
        if let Some(id) = self.start.and_then(|p| self.bounds.index_of(p)) {
            if let Err(e) = graph.set_start(NodeId(id)) {
                log::warn!("grid: start not set: {e}");
            }
        }
        if let Some(id) = self.goal.and_then(|p| self.bounds.index_of(p)) {
            if let Err(e) = graph.set_goal(NodeId(id)) {
                log::warn!("grid: goal not set: {e}");
            }
        }
        CellGraph {
            graph,
            bounds: self.bounds,
        }
    }

    /// Render the grid as ASCII art, marking `path` cells with `*`.
    ///
    /// Uses the same runes [`Grid::parse`] accepts.
    pub fn render(&self, path: &[Point]) -> String {
        let mut out = String::with_capacity(self.bounds.len() + self.height() as usize);
        for (i, p) in self.bounds.iter().enumerate() {
            if i > 0 && p.x == self.bounds.min.x {
                out.push('\n');
            }
            let ch = if Some(p) == self.start {
                'S'
            } else if Some(p) == self.goal {
                'G'
            } else if !self.walkable[i] {
                '#'
            } else if path.contains(&p) {
                '*'
            } else {
                '.'
            };
            out.push(ch);
        }
        out
    }

    fn walkable_id(&self, p: Point) -> Option<NodeId> {
        let i = self.bounds.index_of(p)?;
        self.walkable[i].then_some(NodeId(i))
    }

    fn add_link(&self, graph: &mut Graph, from: NodeId, to: NodeId, cost: i32) {
        // Ids come from our own bounds and costs are caller-provided;
        // a negative cost is the only possible failure.
        if let Err(e) = graph.link(from, to, cost) {
            log::warn!("grid: link skipped: {e}");
        }
    }
}

/// A [`Graph`] built from a [`Grid`], with cell ↔ node lookups.
#[derive(Debug, Clone)]
pub struct CellGraph {
    graph: Graph,
    bounds: Range,
}

impl CellGraph {
    /// Node of cell `p`, or `None` if `p` is outside the grid.
    pub fn node(&self, p: Point) -> Option<NodeId> {
        self.bounds.index_of(p).map(NodeId)
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Mutable access, e.g. to move the endpoints or cut links.
    pub fn graph_mut(&mut self) -> &mut Graph {
        &mut self.graph
    }

    pub fn into_graph(self) -> Graph {
        self.graph
    }
}

impl SearchGraph for CellGraph {
    fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    fn position(&self, node: NodeId) -> Point {
        self.graph.position(node)
    }

    fn links(&self, node: NodeId, buf: &mut Vec<Link>) {
        self.graph.links(node, buf)
    }

    fn start(&self) -> Option<NodeId> {
        SearchGraph::start(&self.graph)
    }

    fn goal(&self) -> Option<NodeId> {
        SearchGraph::goal(&self.graph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use waypath_paths::{AStar, DIAG_COST, Heuristic, STRAIGHT_COST};

    #[test]
    fn walkability() {
        let mut g = Grid::new(4, 3);
        assert_eq!(g.count_walkable(), 12);
        g.set_walkable(Point::new(1, 1), false);
        g.set_walkable(Point::new(9, 9), false);
        assert!(!g.is_walkable(Point::new(1, 1)));
        assert!(!g.is_walkable(Point::new(-1, 0)));
        assert_eq!(g.count_walkable(), 11);
        g.fill(false);
        assert_eq!(g.count_walkable(), 0);
    }

    #[test]
    fn endpoints_outside_are_ignored() {
        let mut g = Grid::new(2, 2);
        g.set_start(Some(Point::new(5, 5)));
        assert_eq!(g.start(), None);
        g.set_goal(Some(Point::new(1, 1)));
        assert_eq!(g.goal(), Some(Point::new(1, 1)));
    }

    #[test]
    fn four_way_links() {
        let g = Grid::new(3, 3);
        let cg = g.to_graph(Connectivity::Four, Costs::default());
        let center = cg.node(Point::new(1, 1)).unwrap();
        let corner = cg.node(Point::new(0, 0)).unwrap();
        assert_eq!(cg.graph().links_of(center).len(), 4);
        assert_eq!(cg.graph().links_of(corner).len(), 2);
        assert!(
            cg.graph()
                .links_of(center)
                .iter()
                .all(|l| l.cost == STRAIGHT_COST)
        );
    }

    #[test]
    fn eight_way_no_corner_cutting() {
        let mut g = Grid::new(3, 3);
        g.set_walkable(Point::new(1, 0), false);
        let cg = g.to_graph(Connectivity::Eight, Costs::default());
        let corner = cg.node(Point::new(0, 0)).unwrap();
        let diag = cg.node(Point::new(1, 1)).unwrap();
        // (0,0) -> (1,1) passes between (1,0), which is blocked.
        assert!(!cg.graph().links_of(corner).iter().any(|l| l.to == diag));
        let center_links = cg.graph().links_of(diag);
        assert_eq!(
            center_links.iter().filter(|l| l.cost == DIAG_COST).count(),
            2
        );
    }

    #[test]
    fn walls_have_no_links() {
        let mut g = Grid::new(3, 1);
        g.set_walkable(Point::new(1, 0), false);
        let cg = g.to_graph(Connectivity::Eight, Costs::default());
        for x in 0..3 {
            let n = cg.node(Point::new(x, 0)).unwrap();
            assert!(cg.graph().links_of(n).is_empty());
        }
    }

    #[test]
    fn eight_way_search_uses_diagonals() {
        let mut g = Grid::new(5, 5);
        g.set_start(Some(Point::new(0, 0)));
        g.set_goal(Some(Point::new(4, 4)));
        let cg = g.to_graph(Connectivity::Eight, Costs::default());
        let mut astar = AStar::with_heuristic(Heuristic::diagonal());
        assert_eq!(astar.find_path(&cg), Ok(true));
        assert_eq!(astar.path().len(), 5);
        assert_eq!(astar.path_cost(), Some(4 * DIAG_COST));
    }

    #[test]
    fn render_marks_path() {
        let mut g = Grid::new(3, 2);
        g.set_walkable(Point::new(1, 0), false);
        g.set_start(Some(Point::new(0, 0)));
        g.set_goal(Some(Point::new(2, 0)));
        let path = [
            Point::new(0, 0),
            Point::new(0, 1),
            Point::new(1, 1),
            Point::new(2, 1),
            Point::new(2, 0),
        ];
        assert_eq!(g.render(&path), "S#G\n***");
    }
}
