//! A* pathfinding over weighted cell graphs.
//!
//! The crate has two layers:
//!
//! - [`IndexedHeap`]: a binary heap whose items can have their key changed
//!   in place ([`IndexedHeap::modify`]) in O(log n), because the heap tracks
//!   the slot of every queued item.
//! - [`AStar`]: the search engine. It walks any [`SearchGraph`], keeps all
//!   per-node bookkeeping (`g`, `h`, `f`, predecessor, generation stamp) in
//!   its own side table, and reuses that table across searches by bumping a
//!   generation counter instead of clearing it.
//!
//! # Heuristics
//!
//! | Function | Admissible | Consistent on |
//! |---|---|---|
//! | [`manhattan`] | 4-way grids | 4-way grids |
//! | [`diagonal`] | 4- and 8-way grids | 8-way grids |
//! | [`euclidean`] | no | - |
//!
//! [`euclidean`] is the squared distance and overestimates, trading path
//! optimality for fewer expanded nodes.

mod astar;
mod config;
mod error;
mod graph;
mod heap;
mod heuristic;
mod traits;

pub use astar::{AStar, SearchStats};
pub use config::SearchConfig;
pub use error::{GraphError, QueueError, SearchError};
pub use graph::{Graph, Link, NodeId};
pub use heap::{Compare, HeapItem, IndexedHeap, MaxFirst, MinFirst};
pub use heuristic::{
    Costs, DIAG_COST, Heuristic, HeuristicKind, ParseHeuristicError, STRAIGHT_COST, diagonal,
    diagonal_with, euclidean, euclidean_with, manhattan, manhattan_with,
};
pub use traits::{Estimate, SearchGraph};
