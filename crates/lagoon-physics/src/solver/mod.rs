//! Interchangeable force models.
//!
//! Every solver applies gravity and edge springs; they differ in how repulsion and contact are
//! computed. [`SolverKind::build`] is the factory the engine uses to swap strategies at runtime.

mod adaptive;
mod ranked;
mod rectangular;
mod standard;

pub use adaptive::AdaptiveSolver;
pub use ranked::{RankedSolver, VERTICAL_DAMPING};
pub use rectangular::RectangularSolver;
pub use standard::StandardSolver;

use crate::PhysicsOptions;
use crate::error::Error;
use crate::force::{self, Body, Contact};
use crate::quadtree::QuadTree;
use lagoon_graph::{Edge, NodeId, NodeMap, Vec2, is_finite};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Net force per node for one tick.
pub type ForceMap = FxHashMap<NodeId, Vec2>;

pub trait ForceSolver: Send + Sync + fmt::Debug {
    fn kind(&self) -> SolverKind;

    fn compute_forces(&self, nodes: &NodeMap, edges: &[Edge], options: &PhysicsOptions) -> ForceMap;

    /// Hook applied to every free node's velocity after damping.
    fn constrain_velocity(&self, velocity: Vec2) -> Vec2 {
        velocity
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SolverKind {
    #[default]
    Standard,
    /// Same forces as `Standard`; the engine adds per-node speed modulation.
    Adaptive,
    Rectangular,
    /// Horizontal-only forces within vertical bands (swimlanes).
    Ranked,
}

impl SolverKind {
    pub const ALL: [SolverKind; 4] = [
        SolverKind::Standard,
        SolverKind::Adaptive,
        SolverKind::Rectangular,
        SolverKind::Ranked,
    ];

    pub fn build(self) -> Box<dyn ForceSolver> {
        match self {
            SolverKind::Standard => Box::new(StandardSolver),
            SolverKind::Adaptive => Box::new(AdaptiveSolver),
            SolverKind::Rectangular => Box::new(RectangularSolver),
            SolverKind::Ranked => Box::new(RankedSolver),
        }
    }

    pub fn uses_adaptive_speed(self) -> bool {
        matches!(self, SolverKind::Adaptive)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SolverKind::Standard => "standard",
            SolverKind::Adaptive => "adaptive",
            SolverKind::Rectangular => "rectangular",
            SolverKind::Ranked => "ranked",
        }
    }
}

impl fmt::Display for SolverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SolverKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" | "barnes-hut" => Ok(Self::Standard),
            "adaptive" | "forceatlas2" => Ok(Self::Adaptive),
            "rectangular" | "rect" => Ok(Self::Rectangular),
            "ranked" | "hierarchical" | "swimlane" => Ok(Self::Ranked),
            _ => Err(Error::UnknownSolver {
                name: s.to_string(),
            }),
        }
    }
}

/// Gravity + Barnes–Hut repulsion + springs, shared by the quadtree-backed solvers.
fn barnes_hut_forces(
    nodes: &NodeMap,
    edges: &[Edge],
    options: &PhysicsOptions,
    contact: Contact,
) -> ForceMap {
    let tree = QuadTree::from_nodes(nodes.values());
    let mut forces = ForceMap::with_capacity_and_hasher(nodes.len(), Default::default());
    for n in nodes.values() {
        let mut f = force::gravity(n, options);
        if is_finite(&n.position) {
            f += tree.repulsion(&Body::from_node(n), options.theta, options, contact);
        }
        forces.insert(n.id, f);
    }
    force::accumulate_springs(nodes, edges, options, &mut forces);
    forces
}
