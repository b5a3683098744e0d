#![forbid(unsafe_code)]

//! Graph entity model for the `lagoon` layout engine.
//!
//! Nodes live in an arena keyed by [`NodeId`] ([`NodeMap`]); edges refer to their endpoints by
//! id only, so no ownership cycle exists between the two. The records carry no behavior beyond
//! validation and a few geometric helpers.

mod edge;
pub mod error;
mod graph;
mod node;

pub use edge::Edge;
pub use error::{Error, Result};
pub use graph::{Graph, NodeMap};
pub use node::{AdaptiveState, Node, NodeId};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// 2-D float vector used for positions, velocities and forces.
pub type Vec2 = nalgebra::Vector2<f64>;

/// Fallback width for nodes whose size has not been measured yet.
pub const DEFAULT_NODE_WIDTH: f64 = 120.0;
/// Fallback height for nodes whose size has not been measured yet.
pub const DEFAULT_NODE_HEIGHT: f64 = 40.0;
pub const DEFAULT_NODE_RADIUS: f64 = 20.0;

pub fn is_finite(v: &Vec2) -> bool {
    v.x.is_finite() && v.y.is_finite()
}
