#![forbid(unsafe_code)]

//! `lagoon` computes 2-D positions for the nodes of an interactively edited graph.
//!
//! Three layouts are available:
//! - a force-directed simulation ticked by the caller through a [`Session`], with four
//!   interchangeable force models ([`SolverKind`]);
//! - a deterministic layered layout ([`lagoon_layered::layout`]);
//! - an annealed static layout ([`lagoon_physics::anneal`]).
//!
//! The one-shot layouts can also run on a worker thread; see [`worker`].

pub mod config;
pub mod error;
pub mod session;
pub mod worker;

pub use config::LayoutConfig;
pub use error::{Error, Result};
pub use session::{Session, TickOutcome};
pub use worker::{AnnealStream, LayeredTask, spawn_anneal, spawn_layered};

pub use lagoon_graph::{Edge, Graph, Node, NodeId, NodeMap, Vec2};
pub use lagoon_layered::{LayeredLayout, LayeredOptions, RankDir};
pub use lagoon_physics::{
    AnnealFrame, AnnealFrames, AnnealOptions, CancelToken, LayoutEngine, PhysicsOptions,
    SolverKind, TickStats, anneal,
};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
