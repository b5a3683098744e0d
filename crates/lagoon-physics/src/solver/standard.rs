use super::{ForceMap, ForceSolver, SolverKind, barnes_hut_forces};
use crate::PhysicsOptions;
use crate::force::Contact;
use lagoon_graph::{Edge, NodeMap};

/// Barnes–Hut repulsion with circular contact.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardSolver;

impl ForceSolver for StandardSolver {
    fn kind(&self) -> SolverKind {
        SolverKind::Standard
    }

    fn compute_forces(&self, nodes: &NodeMap, edges: &[Edge], options: &PhysicsOptions) -> ForceMap {
        barnes_hut_forces(nodes, edges, options, Contact::Circular)
    }
}
