use super::{ForceMap, ForceSolver, SolverKind};
use crate::PhysicsOptions;
use crate::force::{COINCIDENT_EPSILON, COLLISION_BUFFER, COLLISION_STIFFNESS, axis_sign, ideal_length};
use lagoon_graph::{Edge, Node, NodeMap, Vec2, is_finite};

/// Fraction of vertical velocity kept per tick. Ranks come from upstream (usually the layered
/// layout) and should survive the simulation.
pub const VERTICAL_DAMPING: f64 = 0.05;

/// Swimlane solver: resolves horizontal spacing inside each rank and leaves the vertical axis
/// alone.
///
/// Two nodes interact only when their vertical distance is below `rank_band`. Repulsion,
/// collision, springs and gravity all act on the x axis only. Nodes are swept in y order so each
/// node only meets the neighbours inside its band.
#[derive(Debug, Clone, Copy, Default)]
pub struct RankedSolver;

impl ForceSolver for RankedSolver {
    fn kind(&self) -> SolverKind {
        SolverKind::Ranked
    }

    fn compute_forces(&self, nodes: &NodeMap, edges: &[Edge], options: &PhysicsOptions) -> ForceMap {
        let mut forces: ForceMap = nodes
            .values()
            .map(|n| {
                let gx = -n.position.x * options.gravity * n.mass;
                (n.id, Vec2::new(if gx.is_finite() { gx } else { 0.0 }, 0.0))
            })
            .collect();

        let mut by_y: Vec<&Node> = nodes.values().filter(|n| is_finite(&n.position)).collect();
        by_y.sort_by(|a, b| a.position.y.total_cmp(&b.position.y));

        for (i, a) in by_y.iter().enumerate() {
            for b in &by_y[i + 1..] {
                if b.position.y - a.position.y >= options.rank_band {
                    break;
                }
                let fx = horizontal_repulsion(a, b, options);
                if let Some(f) = forces.get_mut(&a.id) {
                    f.x += fx;
                }
                if let Some(f) = forces.get_mut(&b.id) {
                    f.x -= fx;
                }
            }
        }

        for e in edges {
            if e.is_self_loop() {
                continue;
            }
            let (Some(a), Some(b)) = (nodes.get(&e.source), nodes.get(&e.target)) else {
                continue;
            };
            if (b.position.y - a.position.y).abs() >= options.rank_band {
                continue;
            }
            let dx = b.position.x - a.position.x;
            let d = dx.abs();
            if !d.is_finite() || d < COINCIDENT_EPSILON {
                continue;
            }
            let fx = dx.signum() * (d - ideal_length(a, b)) * options.spring * e.strength;
            if let Some(f) = forces.get_mut(&a.id) {
                f.x += fx;
            }
            if let Some(f) = forces.get_mut(&b.id) {
                f.x -= fx;
            }
        }

        forces
    }

    fn constrain_velocity(&self, velocity: Vec2) -> Vec2 {
        Vec2::new(velocity.x, velocity.y * VERTICAL_DAMPING)
    }
}

/// Horizontal force on `a` from `b` within one band. Boxes closer than their half-widths plus
/// the collision buffer get the contact push on top of the soft term.
fn horizontal_repulsion(a: &Node, b: &Node, options: &PhysicsOptions) -> f64 {
    let dx = a.position.x - b.position.x;
    let dir = axis_sign(dx, a.id, b.id);
    let d = dx.abs();
    let (ha, _) = a.half_extent();
    let (hb, _) = b.half_extent();
    let overlap = (ha + hb + COLLISION_BUFFER - d).max(0.0);
    let soft = options.repulsion * a.mass * b.mass / d.max(options.min_distance);
    dir * (soft + overlap * COLLISION_STIFFNESS)
}

#[cfg(test)]
mod tests {
    use super::horizontal_repulsion;
    use crate::PhysicsOptions;
    use crate::force::COLLISION_STIFFNESS;
    use lagoon_graph::Node;

    #[test]
    fn overlapping_boxes_push_at_least_as_hard_as_free_ones() {
        let options = PhysicsOptions::default();
        let a = Node::new(1, 0.0, 0.0);
        // Default boxes are 120 wide: contact at 60 + 60 + 4.
        for d in [2.0, 10.0, 60.0, 123.0] {
            let b = Node::new(2, d, 0.0);
            let fx = horizontal_repulsion(&a, &b, &options);
            let soft = options.repulsion / d;
            assert!(-fx >= soft, "d = {d}: {fx}");
            assert!((-fx - (soft + (124.0 - d) * COLLISION_STIFFNESS)).abs() < 1e-9);
        }

        let b = Node::new(2, 200.0, 0.0);
        assert!((horizontal_repulsion(&a, &b, &options) + options.repulsion / 200.0).abs() < 1e-9);
    }
}
