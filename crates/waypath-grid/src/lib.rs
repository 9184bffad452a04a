//! Grid-side collaborator for `waypath-paths`.
//!
//! - [`Grid`]: a walkability map with optional start and goal cells,
//!   parsed from ASCII art ([`Grid::parse`]) or carved by [`CaveGen`].
//! - [`CellGraph`]: the node/link graph built from a grid with
//!   [`Grid::to_graph`], one node per cell, ready for [`waypath_paths::AStar`].

pub mod cavegen;
pub mod grid;
pub mod map;

pub use cavegen::{CaveGen, FourDirectionWalker, RandomWalker};
pub use grid::{CellGraph, Connectivity, Grid};
pub use map::MapError;
