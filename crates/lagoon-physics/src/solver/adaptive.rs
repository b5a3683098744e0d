use super::{ForceMap, ForceSolver, SolverKind, barnes_hut_forces};
use crate::PhysicsOptions;
use crate::force::Contact;
use lagoon_graph::{Edge, NodeMap};

/// ForceAtlas2-style solver. The forces match [`super::StandardSolver`]; the engine reads the
/// kind and scales each node's step by its swinging/traction history.
#[derive(Debug, Clone, Copy, Default)]
pub struct AdaptiveSolver;

impl ForceSolver for AdaptiveSolver {
    fn kind(&self) -> SolverKind {
        SolverKind::Adaptive
    }

    fn compute_forces(&self, nodes: &NodeMap, edges: &[Edge], options: &PhysicsOptions) -> ForceMap {
        barnes_hut_forces(nodes, edges, options, Contact::Circular)
    }
}
