#![forbid(unsafe_code)]

//! Deterministic layered (Sugiyama-style) layout.
//!
//! The pipeline runs cycle removal, longest-path ranking, barycenter crossing minimization,
//! coordinate assignment and a final direction transform. It reads node sizes and edges from a
//! [`lagoon_graph::Graph`] and ignores any physics state.

pub mod acyclic;
pub mod coordinate_system;
pub mod error;
mod model;
pub mod order;
pub mod position;
pub mod rank;

pub use error::{Error, Result};
pub use model::{LayeredLayout, LayeredOptions, RankDir};

use lagoon_graph::{Graph, Vec2};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn layout(graph: &Graph, options: &LayeredOptions) -> LayeredLayout {
    let timing_enabled = std::env::var("LAGOON_LAYERED_TIMING")
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);
    let total_start = timing_enabled.then(std::time::Instant::now);

    if graph.is_empty() {
        return LayeredLayout::default();
    }

    let acyclic_start = timing_enabled.then(std::time::Instant::now);
    let acyclic::Acyclic { dag, removed_edges } = acyclic::run(graph);
    let acyclic_time = acyclic_start.map(|s| s.elapsed());

    let rank_start = timing_enabled.then(std::time::Instant::now);
    let ranks = rank::longest_path(&dag);
    let mut layers = rank::layers(&ranks);
    let rank_time = rank_start.map(|s| s.elapsed());

    let order_start = timing_enabled.then(std::time::Instant::now);
    let ordered = order::minimize_crossings(&dag, &mut layers, options.crossing_sweeps);
    let order_time = order_start.map(|s| s.elapsed());

    let position_start = timing_enabled.then(std::time::Instant::now);
    let mut sizes: Vec<(f64, f64)> = graph.nodes.values().map(|n| n.extent()).collect();
    coordinate_system::adjust(options.direction, &mut sizes);
    let x = position::assign_x(&dag, &mut layers, &sizes, options);
    let y = position::assign_y(&dag, &layers, &sizes, options.rank_sep);
    let position_time = position_start.map(|s| s.elapsed());
    // Easing may reorder a layer, so count again on the final order.
    let crossings = order::crossings(&dag, &layers);

    tracing::debug!(
        nodes = dag.len(),
        edges = dag.edge_count(),
        removed = removed_edges.len(),
        layers = layers.len(),
        ordered,
        crossings,
        direction = %options.direction,
        "layered layout"
    );

    let out = LayeredLayout {
        positions: (0..dag.len())
            .map(|v| {
                let p = coordinate_system::undo(options.direction, Vec2::new(x[v], y[v]));
                (dag.id(v), p)
            })
            .collect(),
        ranks: (0..dag.len()).map(|v| (dag.id(v), ranks[v])).collect(),
        layers: layers
            .iter()
            .map(|layer| layer.iter().map(|&v| dag.id(v)).collect())
            .collect(),
        removed_edges,
        crossings,
    };

    if let Some(s) = total_start {
        eprintln!(
            "[lagoon-timing] layered nodes={} edges={} total={:?} acyclic={:?} rank={:?} order={:?} position={:?}",
            dag.len(),
            graph.edges.len(),
            s.elapsed(),
            acyclic_time.unwrap_or_default(),
            rank_time.unwrap_or_default(),
            order_time.unwrap_or_default(),
            position_time.unwrap_or_default(),
        );
    }
    out
}
