use std::fmt;

use waypath_core::Point;

use crate::error::GraphError;
use crate::heap::HeapItem;
use crate::traits::SearchGraph;

/// Dense node handle: the index of a node in its graph's node table.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeId(pub usize);

impl NodeId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl HeapItem for NodeId {
    #[inline]
    fn heap_index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A directed, weighted adjacency link.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Link {
    pub to: NodeId,
    pub cost: i32,
}

impl Link {
    #[inline]
    pub const fn new(to: NodeId, cost: i32) -> Self {
        Self { to, cost }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
struct GraphNode {
    pos: Point,
    links: Vec<Link>,
}

/// Adjacency-list graph of cells with a designated start and goal.
///
/// Links are directed; use [`link_both`](Self::link_both) for two-way
/// moves. Costs are validated on insertion.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Graph {
    nodes: Vec<GraphNode>,
    start: Option<NodeId>,
    goal: Option<NodeId>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(nodes: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(nodes),
            start: None,
            goal: None,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Add an unlinked node at `pos` and return its id.
    pub fn add_node(&mut self, pos: Point) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(GraphNode {
            pos,
            links: Vec::new(),
        });
        id
    }

    /// Position of `id`, or `None` if it is not a node of this graph.
    pub fn pos(&self, id: NodeId) -> Option<Point> {
        self.nodes.get(id.0).map(|n| n.pos)
    }

    /// First node placed at `pos`. Linear in the node count.
    pub fn node_at(&self, pos: Point) -> Option<NodeId> {
        self.nodes.iter().position(|n| n.pos == pos).map(NodeId)
    }

    /// Outgoing links of `id`, in insertion order.
    pub fn links_of(&self, id: NodeId) -> &[Link] {
        match self.nodes.get(id.0) {
            Some(n) => &n.links,
            None => &[],
        }
    }

    /// Add a directed link `from -> to`. Replaces the cost of an existing
    /// link between the same pair.
    pub fn link(&mut self, from: NodeId, to: NodeId, cost: i32) -> Result<(), GraphError> {
        self.check(from)?;
        self.check(to)?;
        if cost < 0 {
            return Err(GraphError::NegativeCost { from, to, cost });
        }
        let links = &mut self.nodes[from.0].links;
        match links.iter_mut().find(|l| l.to == to) {
            Some(l) => l.cost = cost,
            None => links.push(Link::new(to, cost)),
        }
        Ok(())
    }

    /// Add links in both directions with the same cost.
    pub fn link_both(&mut self, a: NodeId, b: NodeId, cost: i32) -> Result<(), GraphError> {
        self.link(a, b, cost)?;
        self.link(b, a, cost)
    }

    /// Remove the directed link `from -> to`. Returns whether it existed.
    pub fn unlink(&mut self, from: NodeId, to: NodeId) -> bool {
        let Some(node) = self.nodes.get_mut(from.0) else {
            return false;
        };
        let before = node.links.len();
        node.links.retain(|l| l.to != to);
        node.links.len() != before
    }

    /// Remove every link into and out of `id`, turning it into an obstacle.
    pub fn isolate(&mut self, id: NodeId) -> Result<(), GraphError> {
        self.check(id)?;
        self.nodes[id.0].links.clear();
        for node in &mut self.nodes {
            node.links.retain(|l| l.to != id);
        }
        Ok(())
    }

    pub fn set_start(&mut self, id: NodeId) -> Result<(), GraphError> {
        self.check(id)?;
        self.start = Some(id);
        Ok(())
    }

    pub fn set_goal(&mut self, id: NodeId) -> Result<(), GraphError> {
        self.check(id)?;
        self.goal = Some(id);
        Ok(())
    }

    /// Iterate over `(id, position)` pairs.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, Point)> + '_ {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n.pos))
    }

    fn check(&self, id: NodeId) -> Result<(), GraphError> {
        if id.0 < self.nodes.len() {
            Ok(())
        } else {
            Err(GraphError::UnknownNode(id))
        }
    }
}

impl SearchGraph for Graph {
    #[inline]
    fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    fn position(&self, node: NodeId) -> Point {
        self.nodes[node.0].pos
    }

    #[inline]
    fn links(&self, node: NodeId, buf: &mut Vec<Link>) {
        buf.extend_from_slice(&self.nodes[node.0].links);
    }

    #[inline]
    fn start(&self) -> Option<NodeId> {
        self.start
    }

    #[inline]
    fn goal(&self) -> Option<NodeId> {
        self.goal
    }
}


#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn graph_round_trip() {
        let mut g = Graph::new();
        let a = g.add_node(Point::new(0, 0));
        let b = g.add_node(Point::new(1, 0));
        g.link(a, b, 10).unwrap();
        g.set_start(a).unwrap();
        g.set_goal(b).unwrap();
        let json = serde_json::to_string(&g).unwrap();
        let back: Graph = serde_json::from_str(&json).unwrap();
        assert_eq!(back, g);
    }
}
