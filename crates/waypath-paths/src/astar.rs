use waypath_core::Point;

use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::graph::{Link, NodeId};
use crate::heap::IndexedHeap;
use crate::heuristic::Heuristic;
use crate::traits::{Estimate, SearchGraph};

// ---------------------------------------------------------------------------
// Per-node bookkeeping
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, Default)]
struct Scratch {
    g: i32,
    h: i32,
    f: i32,
    parent: Option<NodeId>,
    /// Generation that last wrote this entry. 0 = never.
    stamp: u64,
}

/// Counters for the most recent search pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Nodes whose links were relaxed.
    pub expanded: usize,
    /// Fresh nodes pushed on the open set.
    pub enqueued: usize,
    /// Queued nodes whose key was lowered.
    pub improved: usize,
}

// ---------------------------------------------------------------------------
// AStar
// ---------------------------------------------------------------------------

/// Reusable A* search engine.
///
/// All scratch state (costs, predecessors, generation stamps) lives in the
/// engine, indexed by [`NodeId`]. Each search pass bumps a generation
/// counter so entries written by earlier passes, possibly over another
/// graph, read as unvisited without clearing the table.
///
/// ```
/// use waypath_core::Point;
/// use waypath_paths::{AStar, Graph};
///
/// let mut g = Graph::new();
/// let a = g.add_node(Point::new(0, 0));
/// let b = g.add_node(Point::new(1, 0));
/// g.link_both(a, b, 10).unwrap();
/// g.set_start(a).unwrap();
/// g.set_goal(b).unwrap();
///
/// let mut astar = AStar::new();
/// assert_eq!(astar.find_path(&g), Ok(true));
/// assert_eq!(astar.path(), vec![a, b]);
/// assert_eq!(astar.path_cost(), Some(10));
/// ```
pub struct AStar<H = Heuristic> {
    heuristic: H,
    open: IndexedHeap<NodeId, i32>,
    scratch: Vec<Scratch>,
    generation: u64,
    /// `(start, goal)` of the bound graph.
    bound: Option<(NodeId, NodeId)>,
    path: Vec<NodeId>,
    path_cost: Option<i32>,
    stats: SearchStats,
    lbuf: Vec<Link>,
}

impl AStar<Heuristic> {
    /// Engine using the scaled Manhattan heuristic.
    pub fn new() -> Self {
        Self::with_heuristic(Heuristic::manhattan())
    }

    /// Engine using the heuristic and costs selected by `config`.
    pub fn from_config(config: &SearchConfig) -> Self {
        Self::with_heuristic(config.heuristic())
    }
}

impl Default for AStar<Heuristic> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: Estimate> AStar<H> {
    /// Engine using a custom heuristic, e.g. a `Fn(Point, Point) -> i32`.
    pub fn with_heuristic(heuristic: H) -> Self {
        Self {
            heuristic,
            open: IndexedHeap::new(),
            scratch: Vec::new(),
            generation: 1,
            bound: None,
            path: Vec::new(),
            path_cost: None,
            stats: SearchStats::default(),
            lbuf: Vec::with_capacity(8),
        }
    }

    pub fn heuristic(&self) -> &H {
        &self.heuristic
    }

    /// Generation the next search pass will stamp with. Strictly increases
    /// with every pass and is never reset.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Copy of the last found path, start first. Empty if the last search
    /// failed or after [`clear`](Self::clear).
    pub fn path(&self) -> Vec<NodeId> {
        self.path.clone()
    }

    /// Positions of the last found path in `graph`.
    pub fn path_points<G: SearchGraph + ?Sized>(&self, graph: &G) -> Vec<Point> {
        self.path.iter().map(|&n| graph.position(n)).collect()
    }

    /// Total link cost of the last found path.
    pub fn path_cost(&self) -> Option<i32> {
        self.path_cost
    }

    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    /// Forget the bound start/goal, the open set and the last path. The
    /// generation counter is kept.
    pub fn clear(&mut self) {
        self.bound = None;
        self.open.clear();
        self.path.clear();
        self.path_cost = None;
    }

    /// Search `graph` from its start node to its goal node.
    ///
    /// Returns `Ok(true)` when the goal was reached (see [`path`](Self::path))
    /// and `Ok(false)` when the open set ran out first. Errors are reserved
    /// for malformed input: missing endpoints, ids outside the graph,
    /// negative link costs, or path costs beyond `i32::MAX`.
    pub fn find_path<G: SearchGraph + ?Sized>(&mut self, graph: &G) -> Result<bool, SearchError> {
        if self.bound.is_some() {
            self.clear();
        }
        let start = graph.start().ok_or(SearchError::MissingStart)?;
        let goal = graph.goal().ok_or(SearchError::MissingGoal)?;
        let count = graph.node_count();
        for id in [start, goal] {
            if id.index() >= count {
                return Err(SearchError::UnknownNode(id));
            }
        }
        if self.scratch.len() < count {
            self.scratch.resize(count, Scratch::default());
        }

        self.bound = Some((start, goal));
        self.stats = SearchStats::default();

        let goal_pos = graph.position(goal);
        let h = self.heuristic.estimate(graph.position(start), goal_pos);
        let s = &mut self.scratch[start.index()];
        s.g = 0;
        s.h = h;
        s.f = h;
        s.parent = None;

        let outcome = self.search(graph, start, goal, goal_pos);
        match outcome {
            Ok(true) => {
                self.build_path(start, goal);
                log::debug!(
                    "astar: {start} -> {goal} found, cost {}, {} steps, {} expanded",
                    self.scratch[goal.index()].g,
                    self.path.len(),
                    self.stats.expanded
                );
            }
            Ok(false) => {
                log::debug!(
                    "astar: {start} -> {goal} unreachable after {} expanded",
                    self.stats.expanded
                );
            }
            Err(e) => {
                self.open.clear();
                log::debug!("astar: {start} -> {goal} aborted: {e}");
            }
        }
        // Every pass, successful or not, gets its own generation.
        self.generation += 1;
        outcome
    }

    fn search<G: SearchGraph + ?Sized>(
        &mut self,
        graph: &G,
        start: NodeId,
        goal: NodeId,
        goal_pos: Point,
    ) -> Result<bool, SearchError> {
        let mut links = std::mem::take(&mut self.lbuf);
        let mut current = start;

        let outcome = loop {
            if current == goal {
                break Ok(true);
            }
            if let Err(e) = self.expand(graph, current, goal_pos, &mut links) {
                break Err(e);
            }
            if self.open.is_empty() {
                break Ok(false);
            }
            match self.open.dequeue() {
                Ok((next, _)) => current = next,
                Err(e) => break Err(e.into()),
            }
        };

        self.lbuf = links;
        outcome
    }

    /// Relax every link of `current`, then mark it closed.
    ///
    /// A node counts as visited once stamped with the current generation.
    /// `current` itself is stamped only after its links were relaxed.
    fn expand<G: SearchGraph + ?Sized>(
        &mut self,
        graph: &G,
        current: NodeId,
        goal_pos: Point,
        links: &mut Vec<Link>,
    ) -> Result<(), SearchError> {
        let cur_gen = self.generation;
        let count = graph.node_count();
        let current_g = self.scratch[current.index()].g;

        links.clear();
        graph.links(current, links);
        self.stats.expanded += 1;

        for &Link { to, cost } in links.iter() {
            if cost < 0 {
                return Err(SearchError::NegativeCost {
                    from: current,
                    to,
                    cost,
                });
            }
            if to.index() >= count {
                return Err(SearchError::UnknownNode(to));
            }
            // Self-loops never shorten a path.
            if to == current {
                continue;
            }

            let g = current_g
                .checked_add(cost)
                .ok_or(SearchError::CostOverflow { from: current, to })?;
            let h = self.heuristic.estimate(graph.position(to), goal_pos);
            // `f` only orders the open set; a saturated value still sorts last.
            let f = g.saturating_add(h);

            let n = &mut self.scratch[to.index()];
            if n.stamp == cur_gen {
                if n.f <= f {
                    continue;
                }
                if !self.open.contains(to) {
                    // Already expanded: closed nodes are not reopened.
                    log::trace!("astar: {to} closed, ignoring f {f} < {}", n.f);
                    continue;
                }
                n.g = g;
                n.h = h;
                n.f = f;
                n.parent = Some(current);
                self.open.modify(to, f)?;
                self.stats.improved += 1;
                log::trace!("astar: {to} improved via {current}, f = {f}");
            } else {
                *n = Scratch {
                    g,
                    h,
                    f,
                    parent: Some(current),
                    stamp: cur_gen,
                };
                self.open.enqueue(to, f)?;
                self.stats.enqueued += 1;
            }
        }

        self.scratch[current.index()].stamp = cur_gen;
        Ok(())
    }

    fn build_path(&mut self, start: NodeId, goal: NodeId) {
        self.path.clear();
        let mut node = goal;
        self.path.push(node);
        while node != start {
            match self.scratch[node.index()].parent {
                Some(p) => {
                    node = p;
                    self.path.push(node);
                }
                None => break,
            }
            debug_assert!(
                self.path.len() <= self.scratch.len(),
                "predecessor chain loops"
            );
        }
        self.path.reverse();
        self.path_cost = Some(self.scratch[goal.index()].g);
    }
}
