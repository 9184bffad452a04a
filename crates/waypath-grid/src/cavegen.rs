//! Random-walk cave carving, used to produce test and demo maps.

use rand::{Rng, RngExt};
use waypath_core::Point;

use crate::grid::Grid;

/// Step rule of a cave-carving walk.
pub trait RandomWalker {
    /// Cell the walk moves to from `p`. May lie outside the grid, in which
    /// case the walk stays where it is for that step.
    fn neighbor(&self, p: Point, rng: &mut impl Rng) -> Point;
}

/// Moves to one of the four orthogonal neighbours, each equally likely.
pub struct FourDirectionWalker;

impl RandomWalker for FourDirectionWalker {
    fn neighbor(&self, p: Point, rng: &mut impl Rng) -> Point {
        p.neighbors_4()[rng.random_range(0..4usize)]
    }
}

/// Cave generator: opens cells of a solid grid by repeated random walks.
pub struct CaveGen<R: Rng> {
    pub rng: R,
    pub grid: Grid,
}

impl<R: Rng> CaveGen<R> {
    /// A `width`×`height` grid with every cell blocked.
    pub fn new(width: i32, height: i32, rng: R) -> Self {
        let mut grid = Grid::new(width, height);
        grid.fill(false);
        Self { rng, grid }
    }

    /// Open cells until `fill_pct` of the grid is walkable or `walks`
    /// walks are spent, and return how many cells were opened.
    ///
    /// All walks leave from the middle cell, so the open area is a single
    /// 4-connected region. A walk gives up after four steps per grid cell.
    pub fn random_walk(&mut self, walker: &impl RandomWalker, fill_pct: f64, walks: usize) -> usize {
        let bounds = self.grid.bounds();
        if bounds.is_empty() {
            return 0;
        }
        let cells = bounds.len();
        let wanted = ((cells as f64 * fill_pct.clamp(0.0, 1.0)) as usize).max(1);
        let origin = bounds.min.shift(bounds.width() / 2, bounds.height() / 2);
        let mut open = self.grid.count_walkable();
        let before = open;

        'walks: for _ in 0..walks {
            let mut at = origin;
            for _ in 0..cells * 4 {
                if open >= wanted {
                    break 'walks;
                }
                if !self.grid.is_walkable(at) {
                    self.grid.set_walkable(at, true);
                    open += 1;
                }
                let to = walker.neighbor(at, &mut self.rng);
                at = if bounds.contains(to) { to } else { at };
            }
        }
        open - before
    }

    /// Place start and goal on two distinct random walkable cells.
    /// Returns `false` if fewer than two cells are walkable.
    pub fn place_endpoints(&mut self) -> bool {
        let open: Vec<Point> = self
            .grid
            .bounds()
            .iter()
            .filter(|&p| self.grid.is_walkable(p))
            .collect();
        if open.len() < 2 {
            return false;
        }
        let s = self.rng.random_range(0..open.len());
        let mut g = self.rng.random_range(0..open.len() - 1);
        if g >= s {
            g += 1;
        }
        self.grid.set_start(Some(open[s]));
        self.grid.set_goal(Some(open[g]));
        true
    }

    pub fn into_grid(self) -> Grid {
        self.grid
    }
}
