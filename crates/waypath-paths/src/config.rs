use crate::heuristic::{Costs, Heuristic, HeuristicKind};

/// Search settings, loadable from JSON with the `serde` feature.
///
/// Missing fields fall back to their defaults (Manhattan, 10/14).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SearchConfig {
    pub heuristic: HeuristicKind,
    pub costs: Costs,
}

impl SearchConfig {
    /// The heuristic this configuration selects, bound to its costs.
    pub fn heuristic(&self) -> Heuristic {
        Heuristic::new(self.heuristic, self.costs)
    }
}


#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn partial_json_uses_defaults() {
        let cfg: SearchConfig = serde_json::from_str(r#"{"heuristic":"diagonal"}"#).unwrap();
        assert_eq!(cfg.heuristic, HeuristicKind::Diagonal);
        assert_eq!(cfg.costs, Costs::default());

        let cfg: SearchConfig = serde_json::from_str(r#"{"costs":{"straight":2}}"#).unwrap();
        assert_eq!(cfg.costs.straight, 2);
        assert_eq!(cfg.costs.diagonal, 14);
    }

    #[test]
    fn round_trip() {
        let cfg = SearchConfig {
            heuristic: HeuristicKind::Euclidean,
            costs: Costs {
                straight: 3,
                diagonal: 4,
            },
        };
        let json = serde_json::to_string(&cfg).unwrap();
        assert!(json.contains("\"euclidean\""));
        let back: SearchConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cfg);
    }
}
