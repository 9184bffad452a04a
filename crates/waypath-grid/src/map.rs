//! ASCII map parsing.
//!
//! | Rune | Meaning |
//! |---|---|
//! | `#` | blocked |
//! | `.` | walkable |
//! | `S` | walkable start cell |
//! | `G` | walkable goal cell |
//! | `*` | walkable (path overlay, as produced by [`Grid::render`]) |
//!
//! Lines are separated by `'\n'` (a trailing `'\r'` is dropped) and must
//! all have the same width. Surrounding whitespace of the whole text is
//! trimmed.

use std::fmt;

use waypath_core::Point;

use crate::grid::Grid;

/// Errors that can occur when parsing a map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapError {
    /// The text holds no cells.
    Empty,
    /// Line `line` does not have the width of the first line.
    InconsistentSize { line: i32, expected: i32, found: i32 },
    /// A character outside the map alphabet.
    InvalidRune { ch: char, pos: Point },
    /// `S` or `G` appears more than once.
    DuplicateMarker { ch: char, pos: Point },
    /// A stored grid holds `found` cells for a range of `expected`.
    CellCount { expected: usize, found: usize },
    /// A stored start or goal lies outside the grid.
    OutOfBounds(Point),
}

impl fmt::Display for MapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "map: no cells"),
            Self::InconsistentSize {
                line,
                expected,
                found,
            } => write!(
                f,
                "map: line {line} has width {found}, expected {expected}"
            ),
            Self::InvalidRune { ch, pos } => {
                write!(f, "map contains invalid rune \u{201c}{ch}\u{201d} at {pos}")
            }
            Self::DuplicateMarker { ch, pos } => {
                write!(f, "map: second \u{201c}{ch}\u{201d} marker at {pos}")
            }
            Self::CellCount { expected, found } => {
                write!(f, "map: {found} cells stored, expected {expected}")
            }
            Self::OutOfBounds(p) => write!(f, "map: endpoint {p} outside the grid"),
        }
    }
}

impl std::error::Error for MapError {}

impl Grid {
    /// Parse an ASCII map. See the [module docs](crate::map) for the format.
    pub fn parse(s: &str) -> Result<Grid, MapError> {
        let lines: Vec<&str> = s
            .trim()
            .split('\n')
            .map(|l| l.strip_suffix('\r').unwrap_or(l))
            .collect();
        let width = lines[0].chars().count() as i32;
        if width == 0 {
            return Err(MapError::Empty);
        }
        for (y, line) in lines.iter().enumerate() {
            let found = line.chars().count() as i32;
            if found != width {
                return Err(MapError::InconsistentSize {
                    line: y as i32,
                    expected: width,
                    found,
                });
            }
        }

        let mut grid = Grid::new(width, lines.len() as i32);
        for (y, line) in lines.iter().enumerate() {
            for (x, ch) in line.chars().enumerate() {
                let pos = Point::new(x as i32, y as i32);
                match ch {
                    '.' | '*' => {}
                    '#' => grid.set_walkable(pos, false),
                    'S' => {
                        if grid.start().is_some() {
                            return Err(MapError::DuplicateMarker { ch, pos });
                        }
                        grid.set_start(Some(pos));
                    }
                    'G' => {
                        if grid.goal().is_some() {
                            return Err(MapError::DuplicateMarker { ch, pos });
                        }
                        grid.set_goal(Some(pos));
                    }
                    _ => return Err(MapError::InvalidRune { ch, pos }),
                }
            }
        }
        Ok(grid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Connectivity;
    use waypath_paths::{AStar, Costs};

    const ROOM: &str = "
S..#....
.#.#.##.
.#...#G.
";

    #[test]
    fn parse_room() {
        let g = Grid::parse(ROOM).unwrap();
        assert_eq!(g.width(), 8);
        assert_eq!(g.height(), 3);
        assert_eq!(g.start(), Some(Point::new(0, 0)));
        assert_eq!(g.goal(), Some(Point::new(6, 2)));
        assert!(!g.is_walkable(Point::new(3, 0)));
        assert!(g.is_walkable(Point::new(6, 2)));
        assert_eq!(g.count_walkable(), 24 - 7);
    }

    #[test]
    fn render_round_trip() {
        let g = Grid::parse(ROOM).unwrap();
        assert_eq!(Grid::parse(&g.render(&[])).unwrap(), g);
    }

    #[test]
    fn solve_room() {
        let g = Grid::parse(ROOM).unwrap();
        let cg = g.to_graph(Connectivity::Four, Costs::default());
        let mut astar = AStar::new();
        assert_eq!(astar.find_path(&cg), Ok(true));
        // S(0,0) -> (2,0) -> (2,2) -> (4,2) -> (4,0) -> (7,0) -> (7,2) -> G(6,2)
        assert_eq!(astar.path_cost(), Some(140));
        let points = astar.path_points(&cg);
        assert!(points.iter().all(|&p| g.is_walkable(p)));
    }

    #[test]
    fn crlf_lines() {
        let g = Grid::parse("S.\r\n.G\r\n").unwrap();
        assert_eq!(g.width(), 2);
        assert_eq!(g.goal(), Some(Point::new(1, 1)));
    }

    #[test]
    fn errors() {
        assert_eq!(Grid::parse("  \n "), Err(MapError::Empty));
        assert_eq!(
            Grid::parse("..\n..."),
            Err(MapError::InconsistentSize {
                line: 1,
                expected: 2,
                found: 3
            })
        );
        assert_eq!(
            Grid::parse(".x"),
            Err(MapError::InvalidRune {
                ch: 'x',
                pos: Point::new(1, 0)
            })
        );
        assert_eq!(
            Grid::parse("S.\n.S"),
            Err(MapError::DuplicateMarker {
                ch: 'S',
                pos: Point::new(1, 1)
            })
        );
    }

    #[test]
    fn error_display() {
        let e = MapError::InvalidRune {
            ch: 'x',
            pos: Point::new(1, 0),
        };
        assert_eq!(e.to_string(), "map contains invalid rune \u{201c}x\u{201d} at (1, 0)");
    }
}
