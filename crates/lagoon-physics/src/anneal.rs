//! Fruchterman–Reingold static layout with box-aware collision and linear cooling.
//!
//! The layout is exposed as a lazy, finite iterator of frames so callers can animate the
//! convergence. Cancellation is cooperative: the [`CancelToken`] is checked before every frame.

use indexmap::IndexMap;
use lagoon_graph::{Graph, NodeId, Vec2};
use serde::{Deserialize, Serialize};
use std::iter::FusedIterator;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Padding added to each node box when estimating the layout area.
pub const NODE_PADDING: f64 = 40.0;
/// Multiplies the hard push applied to overlapping boxes.
pub const HARD_COLLISION_GAIN: f64 = 5.0;
/// Converts accumulated force into displacement before the cooling cap.
pub const STEP_SCALE: f64 = 0.1;
const MIN_DISTANCE: f64 = 0.01;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnnealOptions {
    pub iterations: usize,
    /// Scales the area estimate, and with it the ideal distance `k`.
    pub area_scale: f64,
    pub gravity: f64,
}

impl Default for AnnealOptions {
    fn default() -> Self {
        Self {
            iterations: 300,
            area_scale: 1.0,
            gravity: 0.1,
        }
    }
}

/// Shared cancellation flag. Clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnnealFrame {
    /// Zero-based iteration that produced this frame.
    pub iteration: usize,
    /// Cooling factor used for this iteration, from `1.0` on the first down to `0.0` on the last.
    pub cooling: f64,
    /// Largest displacement applied to any node in this iteration.
    pub max_displacement: f64,
    pub positions: IndexMap<NodeId, Vec2>,
}

/// Starts an annealed layout over `graph`. Input positions are ignored: nodes are seeded on a
/// phyllotaxis spiral.
pub fn anneal(graph: &Graph, options: &AnnealOptions, cancel: CancelToken) -> AnnealFrames {
    let state = (!graph.is_empty() && options.iterations > 0)
        .then(|| AnnealState::new(graph, options));
    AnnealFrames { state, cancel }
}

/// Frame sequence returned by [`anneal`]. Finite, not restartable, and fused once exhausted or
/// cancelled.
#[derive(Debug)]
pub struct AnnealFrames {
    state: Option<AnnealState>,
    cancel: CancelToken,
}

impl AnnealFrames {
    /// Ideal pairwise distance `k`, or `None` for an empty run.
    pub fn ideal_distance(&self) -> Option<f64> {
        self.state.as_ref().map(|s| s.k)
    }

    pub fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }
}

impl Iterator for AnnealFrames {
    type Item = AnnealFrame;

    fn next(&mut self) -> Option<Self::Item> {
        let state = self.state.as_mut()?;
        if self.cancel.is_cancelled() || state.iteration >= state.iterations {
            self.state = None;
            return None;
        }
        Some(state.step())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self
            .state
            .as_ref()
            .map_or(0, |s| s.iterations - s.iteration);
        (0, Some(remaining))
    }
}

impl FusedIterator for AnnealFrames {}

#[derive(Debug)]
struct AnnealState {
    ids: Vec<NodeId>,
    half: Vec<(f64, f64)>,
    positions: Vec<Vec2>,
    edges: Vec<(usize, usize)>,
    k: f64,
    gravity: f64,
    iteration: usize,
    iterations: usize,
}

impl AnnealState {
    fn new(graph: &Graph, options: &AnnealOptions) -> Self {
        let n = graph.node_count();
        let ids: Vec<NodeId> = graph.nodes.keys().copied().collect();
        let half: Vec<(f64, f64)> = graph.nodes.values().map(|n| n.half_extent()).collect();

        let area: f64 = options.area_scale
            * graph
                .nodes
                .values()
                .map(|node| {
                    let (w, h) = node.extent();
                    (w + NODE_PADDING) * (h + NODE_PADDING)
                })
                .sum::<f64>();
        let k = (area / n as f64).sqrt().max(1.0);

        let golden_angle = std::f64::consts::PI * (3.0 - 5f64.sqrt());
        let positions = (0..n)
            .map(|i| {
                let r = k * (i as f64 + 0.5).sqrt();
                let a = i as f64 * golden_angle;
                Vec2::new(r * a.cos(), r * a.sin())
            })
            .collect();

        let edges = graph
            .edges
            .iter()
            .filter(|e| !e.is_self_loop())
            .filter_map(|e| {
                Some((
                    graph.nodes.get_index_of(&e.source)?,
                    graph.nodes.get_index_of(&e.target)?,
                ))
            })
            .collect();

        Self {
            ids,
            half,
            positions,
            edges,
            k,
            gravity: options.gravity,
            iteration: 0,
            iterations: options.iterations,
        }
    }

    fn step(&mut self) -> AnnealFrame {
        let n = self.positions.len();
        let k = self.k;
        let cooling = cooling_at(self.iteration, self.iterations);
        let cap = k * cooling;
        let mut disp = vec![Vec2::zeros(); n];

        for a in 0..n {
            for b in (a + 1)..n {
                let push = self.repulsion(a, b);
                disp[a] += push;
                disp[b] -= push;
            }
        }

        for &(a, b) in &self.edges {
            let delta = self.positions[b] - self.positions[a];
            let d = delta.norm();
            if d > 0.0 {
                let f = delta / d * (d * d / k);
                disp[a] += f;
                disp[b] -= f;
            }
        }

        let mut max_displacement: f64 = 0.0;
        for (p, d) in self.positions.iter_mut().zip(disp.iter_mut()) {
            *d -= *p * self.gravity;
            let len = d.norm();
            if len > 0.0 && len.is_finite() {
                let step = (len * STEP_SCALE).min(cap);
                *p += *d / len * step;
                max_displacement = max_displacement.max(step);
            }
        }

        let frame = AnnealFrame {
            iteration: self.iteration,
            cooling,
            max_displacement,
            positions: self
                .ids
                .iter()
                .copied()
                .zip(self.positions.iter().copied())
                .collect(),
        };
        self.iteration += 1;
        frame
    }

    /// Displacement of `a` caused by `b` (the opposite applies to `b`).
    fn repulsion(&self, a: usize, b: usize) -> Vec2 {
        let delta = self.positions[a] - self.positions[b];
        let pen_x = (self.half[a].0 + self.half[b].0) - delta.x.abs();
        let pen_y = (self.half[a].1 + self.half[b].1) - delta.y.abs();
        if pen_x > 0.0 && pen_y > 0.0 {
            // Boxes overlap: push apart along the cheaper axis.
            return if pen_x < pen_y {
                Vec2::new(tie_break_sign(delta.x) * pen_x, 0.0)
            } else {
                Vec2::new(0.0, tie_break_sign(delta.y) * pen_y)
            } * HARD_COLLISION_GAIN;
        }
        let d = delta.norm().max(MIN_DISTANCE);
        delta / d * (self.k * self.k / d)
    }
}

// `a` always has the lower index, so a zero delta pushes it toward the negative side.
fn tie_break_sign(delta: f64) -> f64 {
    if delta > 0.0 { 1.0 } else { -1.0 }
}

/// Linear cooling from `1.0` on the first iteration to `0.0` on the last. A single-iteration run
/// stays at `1.0`.
fn cooling_at(iteration: usize, iterations: usize) -> f64 {
    if iterations <= 1 {
        return 1.0;
    }
    1.0 - iteration as f64 / (iterations - 1) as f64
}
