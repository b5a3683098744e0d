use crate::NodeId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub source: NodeId,
    pub target: NodeId,
    /// Multiplies the spring force.
    #[serde(default = "default_strength")]
    pub strength: f64,
    // Rendering hints. Springs are symmetric regardless of these.
    #[serde(default)]
    pub directed: bool,
    #[serde(default)]
    pub bidirectional: bool,
}

fn default_strength() -> f64 {
    1.0
}

impl Edge {
    pub fn new(source: impl Into<NodeId>, target: impl Into<NodeId>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            strength: default_strength(),
            directed: true,
            bidirectional: false,
        }
    }

    pub fn with_strength(mut self, strength: f64) -> Self {
        self.strength = strength;
        self
    }

    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }
}
