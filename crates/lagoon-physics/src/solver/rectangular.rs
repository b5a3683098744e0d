use super::{ForceMap, ForceSolver, SolverKind, barnes_hut_forces};
use crate::PhysicsOptions;
use crate::force::Contact;
use lagoon_graph::{Edge, NodeMap};

/// Barnes–Hut repulsion where nearby nodes collide as boxes. Overlapping boxes are pushed apart
/// with a constant force along the axis of least penetration.
#[derive(Debug, Clone, Copy, Default)]
pub struct RectangularSolver;

impl ForceSolver for RectangularSolver {
    fn kind(&self) -> SolverKind {
        SolverKind::Rectangular
    }

    fn compute_forces(&self, nodes: &NodeMap, edges: &[Edge], options: &PhysicsOptions) -> ForceMap {
        barnes_hut_forces(nodes, edges, options, Contact::Rectangular)
    }
}
