//! Command-line demo: load a map (or carve a cave), run A*, print the
//! path overlay and search counters.

use std::fmt;
use std::path::{Path, PathBuf};

use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;
use waypath_core::Point;
use waypath_grid::{CaveGen, Connectivity, FourDirectionWalker, Grid, MapError};
use waypath_paths::{AStar, HeuristicKind, SearchConfig, SearchError, SearchStats};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Settings loadable from a `--config` JSON file.
#[derive(Debug, Clone, Copy, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    pub connectivity: Connectivity,
    pub search: SearchConfig,
}

impl DemoConfig {
    pub fn load(path: &Path) -> Result<Self, DemoError> {
        let text = std::fs::read_to_string(path).map_err(|source| DemoError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(DemoError::Config)
    }
}

/// Find a path through an ASCII map or a generated cave
///
/// Prints the map with the path drawn as `*`, the path cost and the
/// search counters.
///
/// Examples:
///   findpath demos/maps/room.txt --diagonal
///   findpath --seed 7 --size 40x15 --heuristic euclidean
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "findpath")]
#[command(version)]
#[command(about, long_about = None)]
pub struct Options {
    /// ASCII map file
    ///
    /// Runes: `#` wall, `.` floor, `S` start, `G` goal. A random cave is
    /// carved when omitted.
    #[arg(value_name = "MAP_FILE")]
    pub map: Option<PathBuf>,

    /// JSON settings file (connectivity, search)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Allow 8-way moves
    #[arg(long)]
    pub diagonal: bool,

    /// Distance estimate: manhattan, euclidean or diagonal
    #[arg(long, value_name = "NAME")]
    pub heuristic: Option<HeuristicKind>,

    /// Cave generator seed
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Cave size as WIDTHxHEIGHT
    #[arg(long, value_name = "WxH", default_value = "60x20", value_parser = parse_size)]
    pub size: Point,
}

impl Options {
    /// Merge the command line over the optional config file.
    pub fn resolve(&self) -> Result<DemoConfig, DemoError> {
        let mut cfg = match &self.config {
            Some(path) => DemoConfig::load(path)?,
            None => DemoConfig::default(),
        };
        if self.diagonal {
            cfg.connectivity = Connectivity::Eight;
        }
        if let Some(kind) = self.heuristic {
            cfg.search.heuristic = kind;
        }
        Ok(cfg)
    }
}

fn parse_size(s: &str) -> Result<Point, String> {
    let bad = || format!("bad size {s:?}, expected WxH with both sides at least 2");
    let (w, h) = s.split_once('x').ok_or_else(bad)?;
    let w: i32 = w.parse().map_err(|_| bad())?;
    let h: i32 = h.parse().map_err(|_| bad())?;
    if w < 2 || h < 2 {
        return Err(bad());
    }
    Ok(Point::new(w, h))
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub enum DemoError {
    Io { path: PathBuf, source: std::io::Error },
    Config(serde_json::Error),
    Map(MapError),
    /// The map has no `S` or no `G`.
    NoEndpoints,
    Search(SearchError),
}

impl fmt::Display for DemoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "{}: {source}", path.display()),
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Map(e) => write!(f, "{e}"),
            Self::NoEndpoints => write!(f, "map needs one S and one G cell"),
            Self::Search(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for DemoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Config(e) => Some(e),
            Self::Map(e) => Some(e),
            Self::Search(e) => Some(e),
            Self::NoEndpoints => None,
        }
    }
}

impl From<MapError> for DemoError {
    fn from(e: MapError) -> Self {
        Self::Map(e)
    }
}

impl From<SearchError> for DemoError {
    fn from(e: SearchError) -> Self {
        Self::Search(e)
    }
}

// ---------------------------------------------------------------------------
// Run
// ---------------------------------------------------------------------------

/// Outcome of one demo run.
#[derive(Debug, Clone)]
pub struct Report {
    pub grid: Grid,
    pub config: DemoConfig,
    pub path: Vec<Point>,
    pub cost: Option<i32>,
    pub stats: SearchStats,
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.grid.render(&self.path))?;
        let conn = match self.config.connectivity {
            Connectivity::Four => "4-way",
            Connectivity::Eight => "8-way",
        };
        match self.cost {
            Some(cost) => writeln!(
                f,
                "{conn}, {}: {} steps, cost {cost}",
                self.config.search.heuristic,
                self.path.len().saturating_sub(1)
            )?,
            None => writeln!(f, "{conn}, {}: no path", self.config.search.heuristic)?,
        }
        writeln!(
            f,
            "expanded {}, enqueued {}, improved {}",
            self.stats.expanded, self.stats.enqueued, self.stats.improved
        )
    }
}

/// Load the map named by `opts` or carve a cave from its seed.
pub fn load_grid(opts: &Options) -> Result<Grid, DemoError> {
    if let Some(path) = &opts.map {
        let text = std::fs::read_to_string(path).map_err(|source| DemoError::Io {
            path: path.clone(),
            source,
        })?;
        let grid = Grid::parse(&text)?;
        if grid.start().is_none() || grid.goal().is_none() {
            return Err(DemoError::NoEndpoints);
        }
        return Ok(grid);
    }
    let mut cave = CaveGen::new(opts.size.x, opts.size.y, StdRng::seed_from_u64(opts.seed));
    let carved = cave.random_walk(&FourDirectionWalker, 0.45, 40);
    log::info!("cave {}x{} seed {}: {carved} cells", opts.size.x, opts.size.y, opts.seed);
    if !cave.place_endpoints() {
        return Err(DemoError::NoEndpoints);
    }
    Ok(cave.into_grid())
}

pub fn run(opts: &Options) -> Result<Report, DemoError> {
    let config = opts.resolve()?;
    let grid = load_grid(opts)?;
    let graph = grid.to_graph(config.connectivity, config.search.costs);

    let mut astar = AStar::from_config(&config.search);
    let found = astar.find_path(&graph)?;
    let (path, cost) = if found {
        (astar.path_points(&graph), astar.path_cost())
    } else {
        (Vec::new(), None)
    };
    Ok(Report {
        grid,
        config,
        path,
        cost,
        stats: astar.stats(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Result<Options, clap::Error> {
        Options::try_parse_from(std::iter::once("findpath").chain(line.split_whitespace()))
    }

    fn maps_dir() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("maps")
    }

    #[test]
    fn parse_options() {
        let o = parse("map.txt --diagonal --heuristic euclidean --seed 7 --size 30x10").unwrap();
        assert_eq!(o.map, Some(PathBuf::from("map.txt")));
        assert!(o.diagonal);
        assert_eq!(o.heuristic, Some(HeuristicKind::Euclidean));
        assert_eq!(o.seed, 7);
        assert_eq!(o.size, Point::new(30, 10));
    }

    #[test]
    fn defaults() {
        let o = parse("").unwrap();
        assert_eq!(o.map, None);
        assert!(!o.diagonal);
        assert_eq!(o.heuristic, None);
        assert_eq!(o.seed, 42);
        assert_eq!(o.size, Point::new(60, 20));
    }

    #[test]
    fn bad_options() {
        assert!(parse("--bogus").is_err());
        assert!(parse("--heuristic octile").is_err());
        assert!(parse("--size 10").is_err());
        assert!(parse("--size 1x5").is_err());
        assert!(parse("a.txt b.txt").is_err());
        assert!(parse("--seed").is_err());
    }

    #[test]
    fn command_line_overrides_defaults() {
        let cfg = parse("--diagonal --heuristic diagonal").unwrap().resolve().unwrap();
        assert_eq!(cfg.connectivity, Connectivity::Eight);
        assert_eq!(cfg.search.heuristic, HeuristicKind::Diagonal);
    }

    #[test]
    fn command_line_overrides_config_file() {
        let o = Options {
            config: Some(maps_dir().join("eight.json")),
            ..parse("--heuristic manhattan").unwrap()
        };
        let cfg = o.resolve().unwrap();
        assert_eq!(cfg.connectivity, Connectivity::Eight);
        assert_eq!(cfg.search.heuristic, HeuristicKind::Manhattan);
    }

    #[test]
    fn config_json() {
        let cfg: DemoConfig =
            serde_json::from_str(r#"{"connectivity":"eight","search":{"heuristic":"diagonal"}}"#)
                .unwrap();
        assert_eq!(cfg.connectivity, Connectivity::Eight);
        assert_eq!(cfg.search.heuristic, HeuristicKind::Diagonal);
        assert_eq!(cfg.search.costs.diagonal, 14);
    }

    #[test]
    fn missing_config_file() {
        let o = parse("--config /nonexistent/waypath.json").unwrap();
        assert!(matches!(o.resolve(), Err(DemoError::Io { .. })));
    }

    #[test]
    fn generated_cave_run() {
        let o = parse("--size 30x12 --seed 3").unwrap();
        let report = run(&o).unwrap();
        assert_eq!(report.path.first().copied(), report.grid.start());
        assert_eq!(report.path.last().copied(), report.grid.goal());
        assert!(report.cost.is_some());
        let text = report.to_string();
        assert!(text.contains("4-way, manhattan"));
    }

    #[test]
    fn bundled_maps() {
        let plain = Options {
            map: Some(maps_dir().join("room.txt")),
            ..parse("").unwrap()
        };
        let four = run(&plain).unwrap();
        assert!(four.cost.is_some());

        let eight = Options {
            config: Some(maps_dir().join("eight.json")),
            ..plain
        };
        let eight = run(&eight).unwrap();
        assert_eq!(eight.config.connectivity, Connectivity::Eight);
        assert!(eight.cost.unwrap() <= four.cost.unwrap());
    }
}
