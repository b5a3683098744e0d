use crate::error::Error;
use indexmap::IndexMap;
use lagoon_graph::{NodeId, NodeMap, Vec2};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Reading direction of the ranks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RankDir {
    #[default]
    #[serde(alias = "tb")]
    TB,
    #[serde(alias = "bt")]
    BT,
    #[serde(alias = "lr")]
    LR,
    #[serde(alias = "rl")]
    RL,
}

impl RankDir {
    pub const ALL: [RankDir; 4] = [RankDir::TB, RankDir::BT, RankDir::LR, RankDir::RL];

    /// `true` when ranks advance along the x axis.
    pub fn is_horizontal(self) -> bool {
        matches!(self, RankDir::LR | RankDir::RL)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RankDir::TB => "TB",
            RankDir::BT => "BT",
            RankDir::LR => "LR",
            RankDir::RL => "RL",
        }
    }
}

impl fmt::Display for RankDir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RankDir {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "TB" | "TD" => Ok(RankDir::TB),
            "BT" => Ok(RankDir::BT),
            "LR" => Ok(RankDir::LR),
            "RL" => Ok(RankDir::RL),
            _ => Err(Error::UnknownDirection {
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayeredOptions {
    pub direction: RankDir,
    /// Gap between neighbouring boxes in one layer.
    pub node_sep: f64,
    /// Gap between consecutive layers.
    pub rank_sep: f64,
    /// Upper bound on barycenter down-sweeps.
    pub crossing_sweeps: usize,
    pub easing_iterations: usize,
    /// Fraction of the distance to the parents' mean x covered per easing round.
    pub easing: f64,
}

impl Default for LayeredOptions {
    fn default() -> Self {
        Self {
            direction: RankDir::TB,
            node_sep: 50.0,
            rank_sep: 50.0,
            crossing_sweeps: 4,
            easing_iterations: 4,
            easing: 0.5,
        }
    }
}

/// Result of [`crate::layout`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayeredLayout {
    /// Node centers, in the requested direction.
    pub positions: IndexMap<NodeId, Vec2>,
    pub ranks: IndexMap<NodeId, usize>,
    /// Node ids per rank, in final left-to-right (or top-to-bottom) order.
    pub layers: Vec<Vec<NodeId>>,
    /// Indices into the input edge list of the edges dropped to break cycles.
    pub removed_edges: Vec<usize>,
    /// Edge crossings between adjacent layers after ordering.
    pub crossings: usize,
}

impl LayeredLayout {
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Writes the computed positions into `nodes` and clears their motion. Nodes the layout does
    /// not know about are left alone.
    pub fn apply_to(&self, nodes: &mut NodeMap) {
        for (id, p) in &self.positions {
            if let Some(n) = nodes.get_mut(id) {
                n.position = *p;
                n.reset_motion();
            }
        }
    }
}
