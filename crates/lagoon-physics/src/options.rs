use serde::{Deserialize, Serialize};

/// Tunable constants for one simulation tick.
///
/// The value is read-only to the solvers; callers swap it wholesale between ticks. Every field
/// has a default, so partial JSON such as `{"gravity": 0.0}` deserializes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PhysicsOptions {
    /// Linear pull toward the origin, scaled by node mass.
    pub gravity: f64,
    /// Inverse-distance repulsion constant.
    pub repulsion: f64,
    /// Hooke constant for edge springs.
    pub spring: f64,
    /// Velocity multiplier applied every tick (`0..=1`).
    pub damping: f64,
    /// Distances below this are clamped before dividing.
    pub min_distance: f64,
    /// Barnes-Hut opening threshold. `0` degenerates to the exact pairwise sum.
    pub theta: f64,
    /// Adaptive-speed jitter tolerance.
    pub tolerance: f64,
    pub time_step: f64,
    /// Vertical band treated as "same rank" by the rank-constrained solver.
    pub rank_band: f64,
}

impl Default for PhysicsOptions {
    fn default() -> Self {
        Self {
            gravity: 0.02,
            repulsion: 2000.0,
            spring: 0.05,
            damping: 0.85,
            min_distance: 1.0,
            theta: 0.8,
            tolerance: 1.0,
            time_step: 1.0,
            rank_band: 30.0,
        }
    }
}
