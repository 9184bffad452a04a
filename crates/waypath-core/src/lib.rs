//! **waypath-core** — geometry primitives shared by the waypath crates.
//!
//! Cells are addressed by integer [`Point`]s; rectangular maps are described
//! by half-open [`Range`]s, which also provide the row-major flat indexing
//! used by the grid and search caches.

pub mod geom;

pub use geom::{Point, Range, RangeIter};
