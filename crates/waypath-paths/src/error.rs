use std::fmt;

use crate::graph::NodeId;

/// Contract violations reported by [`IndexedHeap`](crate::IndexedHeap).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueError {
    /// `dequeue` was called on an empty heap.
    Empty,
    /// The item is already queued; use `modify` to change its key.
    AlreadyQueued(usize),
    /// The item is not in the heap.
    NotQueued(usize),
}

impl fmt::Display for QueueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "heap: dequeue on empty queue"),
            Self::AlreadyQueued(i) => write!(f, "heap: item {i} is already queued"),
            Self::NotQueued(i) => write!(f, "heap: item {i} is not queued"),
        }
    }
}

impl std::error::Error for QueueError {}

/// Errors raised while building a [`Graph`](crate::Graph).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphError {
    /// The node id does not belong to the graph.
    UnknownNode(NodeId),
    /// Link costs must be non-negative.
    NegativeCost { from: NodeId, to: NodeId, cost: i32 },
}

impl fmt::Display for GraphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownNode(id) => write!(f, "graph: unknown node {id}"),
            Self::NegativeCost { from, to, cost } => {
                write!(f, "graph: negative cost {cost} on link {from} -> {to}")
            }
        }
    }
}

impl std::error::Error for GraphError {}

/// Precondition failures of [`AStar::find_path`](crate::AStar::find_path).
///
/// An unreachable goal is not an error: `find_path` returns `Ok(false)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchError {
    /// The graph has no start node.
    MissingStart,
    /// The graph has no goal node.
    MissingGoal,
    /// A node id at or beyond the graph's node count.
    UnknownNode(NodeId),
    /// A link with a negative cost was met during expansion.
    NegativeCost { from: NodeId, to: NodeId, cost: i32 },
    /// The cost of reaching `to` through `from` does not fit in an `i32`.
    CostOverflow { from: NodeId, to: NodeId },
    /// Internal heap misuse. The search loop never triggers it.
    Queue(QueueError),
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingStart => write!(f, "search: graph has no start node"),
            Self::MissingGoal => write!(f, "search: graph has no goal node"),
            Self::UnknownNode(id) => write!(f, "search: node {id} is outside the graph"),
            Self::NegativeCost { from, to, cost } => {
                write!(f, "search: negative cost {cost} on link {from} -> {to}")
            }
            Self::CostOverflow { from, to } => {
                write!(f, "search: path cost overflows on link {from} -> {to}")
            }
            Self::Queue(e) => write!(f, "search: {e}"),
        }
    }
}

impl std::error::Error for SearchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Queue(e) => Some(e),
            _ => None,
        }
    }
}

impl From<QueueError> for SearchError {
    fn from(e: QueueError) -> Self {
        Self::Queue(e)
    }
}

impl From<GraphError> for SearchError {
    fn from(e: GraphError) -> Self {
        match e {
            GraphError::UnknownNode(id) => Self::UnknownNode(id),
            GraphError::NegativeCost { from, to, cost } => Self::NegativeCost { from, to, cost },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        assert_eq!(QueueError::Empty.to_string(), "heap: dequeue on empty queue");
        let e = SearchError::NegativeCost {
            from: NodeId(1),
            to: NodeId(2),
            cost: -3,
        };
        assert_eq!(e.to_string(), "search: negative cost -3 on link #1 -> #2");
        let e = SearchError::CostOverflow {
            from: NodeId(4),
            to: NodeId(5),
        };
        assert_eq!(e.to_string(), "search: path cost overflows on link #4 -> #5");
    }

    #[test]
    fn queue_error_is_source() {
        use std::error::Error;
        let e = SearchError::from(QueueError::NotQueued(4));
        assert!(e.source().is_some());
        assert!(SearchError::MissingGoal.source().is_none());
    }

    #[test]
    fn graph_error_converts() {
        let e: SearchError = GraphError::UnknownNode(NodeId(9)).into();
        assert_eq!(e, SearchError::UnknownNode(NodeId(9)));
    }
}
