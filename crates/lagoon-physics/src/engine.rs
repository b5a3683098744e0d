//! Per-tick integrator with ForceAtlas2-style adaptive speed.

use crate::PhysicsOptions;
use crate::solver::{ForceSolver, SolverKind};
use lagoon_graph::{Edge, NodeMap, Vec2, is_finite};

/// Global speed used when no node is swinging (e.g. the first tick of a settled graph).
pub const FALLBACK_SPEED: f64 = 0.1;
/// Safety range for the global speed.
pub const GLOBAL_SPEED_RANGE: (f64, f64) = (0.01, 1.0);

/// Aggregates computed by the last [`LayoutEngine::tick`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickStats {
    pub global_speed: f64,
    pub global_swinging: f64,
    pub global_traction: f64,
    /// Kinetic energy after integration; see [`energy`].
    pub energy: f64,
    pub free_nodes: usize,
}

/// Drives one force solver over successive node snapshots.
///
/// The engine is stateless between ticks apart from the active solver, the options and the last
/// tick's statistics: all per-node history (velocity, adaptive-speed state) travels with the
/// nodes themselves. Pausing is simply not calling [`LayoutEngine::tick`].
#[derive(Debug)]
pub struct LayoutEngine {
    solver: Box<dyn ForceSolver>,
    options: PhysicsOptions,
    last: TickStats,
}

impl Default for LayoutEngine {
    fn default() -> Self {
        Self::new(SolverKind::default(), PhysicsOptions::default())
    }
}

impl LayoutEngine {
    pub fn new(kind: SolverKind, options: PhysicsOptions) -> Self {
        Self {
            solver: kind.build(),
            options,
            last: TickStats::default(),
        }
    }

    pub fn set_solver(&mut self, kind: SolverKind) {
        if self.solver.kind() != kind {
            tracing::debug!(from = %self.solver.kind(), to = %kind, "switching force solver");
            self.solver = kind.build();
        }
    }

    pub fn solver_kind(&self) -> SolverKind {
        self.solver.kind()
    }

    pub fn set_options(&mut self, options: PhysicsOptions) {
        self.options = options;
    }

    pub fn options(&self) -> &PhysicsOptions {
        &self.options
    }

    pub fn last_stats(&self) -> TickStats {
        self.last
    }

    /// Advances the simulation by one step and returns the new node state.
    ///
    /// `previous` is left untouched so other readers can keep using it. Fixed and locked nodes
    /// come back with zero velocity and their position unchanged.
    pub fn tick(&mut self, previous: &NodeMap, edges: &[Edge]) -> NodeMap {
        let mut next = previous.clone();
        if next.is_empty() {
            self.last = TickStats::default();
            return next;
        }

        let options = &self.options;
        let forces = self.solver.compute_forces(previous, edges, options);
        let applied: Vec<Vec2> = next
            .values()
            .map(|n| {
                forces
                    .get(&n.id)
                    .copied()
                    .filter(is_finite)
                    .unwrap_or_else(Vec2::zeros)
            })
            .collect();

        let mut swinging_sum = 0.0;
        let mut traction_sum = 0.0;
        let mut free_nodes = 0usize;
        for (node, f) in next.values_mut().zip(&applied) {
            if node.is_pinned() {
                continue;
            }
            let last = node.adaptive.last_force;
            node.adaptive.swinging = (f - last).norm();
            node.adaptive.traction = (f + last).norm() / 2.0;
            swinging_sum += node.mass * node.adaptive.swinging;
            traction_sum += node.mass * node.adaptive.traction;
            free_nodes += 1;
        }

        let global = global_speed(options.tolerance, traction_sum, swinging_sum);
        let adaptive = self.solver.kind().uses_adaptive_speed();
        let dt = options.time_step;

        let mut total_energy = 0.0;
        for (node, f) in next.values_mut().zip(&applied) {
            if node.is_pinned() {
                node.reset_motion();
                continue;
            }
            let speed = if adaptive {
                local_speed(global, node.adaptive.swinging)
            } else {
                1.0
            };
            let velocity = self
                .solver
                .constrain_velocity((node.velocity + f / node.mass * dt) * options.damping);
            let position = node.position + velocity * (dt * speed);
            if is_finite(&velocity) && is_finite(&position) {
                node.velocity = velocity;
                node.position = position;
            } else {
                tracing::warn!(node = %node.id, "discarding non-finite integration step");
                node.velocity = Vec2::zeros();
            }
            node.adaptive.last_force = *f;
            total_energy += node.kinetic_energy();
        }

        self.last = TickStats {
            global_speed: global,
            global_swinging: swinging_sum,
            global_traction: traction_sum,
            energy: total_energy,
            free_nodes,
        };
        tracing::debug!(
            solver = %self.solver.kind(),
            nodes = next.len(),
            free_nodes,
            global_speed = global,
            energy = total_energy,
            "tick"
        );
        next
    }
}

/// `tolerance * traction / swinging`, clamped to [`GLOBAL_SPEED_RANGE`].
pub fn global_speed(tolerance: f64, traction: f64, swinging: f64) -> f64 {
    let raw = if swinging > f64::EPSILON {
        tolerance * traction / swinging
    } else {
        FALLBACK_SPEED
    };
    if raw.is_finite() {
        raw.clamp(GLOBAL_SPEED_RANGE.0, GLOBAL_SPEED_RANGE.1)
    } else {
        FALLBACK_SPEED
    }
}

/// Attenuates the global speed for a node that is oscillating.
pub fn local_speed(global: f64, swinging: f64) -> f64 {
    global / (1.0 + global * swinging.sqrt())
}

/// System kinetic energy `Σ ½ m |v|²`. Callers compare it against a threshold to auto-freeze.
pub fn energy(nodes: &NodeMap) -> f64 {
    nodes.values().map(|n| n.kinetic_energy()).sum()
}
