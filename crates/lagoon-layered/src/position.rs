//! Coordinate assignment inside and across layers.
//!
//! Works in the top-to-bottom frame: x runs along a layer, y across layers. Sizes are expected
//! to be already adjusted for the requested direction (see [`crate::coordinate_system`]).

use crate::LayeredOptions;
use crate::acyclic::Dag;

/// Node extents as `(along the layer, across the layer)`.
pub type Sizes = [(f64, f64)];

/// Packs each layer, then eases nodes toward their parents.
///
/// Each layer is reordered by final x, so `layers` leaves this function in left-to-right order.
pub fn assign_x(
    dag: &Dag,
    layers: &mut [Vec<usize>],
    sizes: &Sizes,
    options: &LayeredOptions,
) -> Vec<f64> {
    let mut x = vec![0.0; dag.len()];
    for layer in layers.iter() {
        pack(layer, sizes, options.node_sep, &mut x);
    }

    for _ in 0..options.easing_iterations {
        for layer in layers.iter_mut().skip(1) {
            for &v in layer.iter() {
                let parents = dag.predecessors(v);
                if parents.is_empty() {
                    continue;
                }
                let mean = parents.iter().map(|&p| x[p]).sum::<f64>() / parents.len() as f64;
                x[v] += (mean - x[v]) * options.easing;
            }
            layer.sort_by(|&a, &b| x[a].total_cmp(&x[b]));
            separate(layer, sizes, options.node_sep, &mut x);
        }
    }
    x
}

/// Centers of a left-to-right packing with `sep` between boxes, centered on 0.
fn pack(layer: &[usize], sizes: &Sizes, sep: f64, x: &mut [f64]) {
    let total: f64 = layer.iter().map(|&v| sizes[v].0).sum::<f64>()
        + sep * layer.len().saturating_sub(1) as f64;
    let mut left = -total / 2.0;
    for &v in layer {
        let w = sizes[v].0;
        x[v] = left + w / 2.0;
        left += w + sep;
    }
}

/// Pushes right-hand neighbours right until every pair is at least half-widths plus `sep`
/// apart.
fn separate(layer: &[usize], sizes: &Sizes, sep: f64, x: &mut [f64]) {
    for pair in layer.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        let min = (sizes[a].0 + sizes[b].0) / 2.0 + sep;
        if x[b] - x[a] < min {
            x[b] = x[a] + min;
        }
    }
}

/// Layer `r` spans from the sum of the previous layers' tallest box plus `rank_sep`; nodes are
/// centered in their layer's band.
pub fn assign_y(dag: &Dag, layers: &[Vec<usize>], sizes: &Sizes, rank_sep: f64) -> Vec<f64> {
    let mut y = vec![0.0; dag.len()];
    let mut top = 0.0;
    for layer in layers {
        let height = layer.iter().map(|&v| sizes[v].1).fold(0.0, f64::max);
        for &v in layer {
            y[v] = top + height / 2.0;
        }
        top += height + rank_sep;
    }
    y
}
