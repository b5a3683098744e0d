#![forbid(unsafe_code)]

//! Force-directed simulation for `lagoon`.
//!
//! The crate is headless and synchronous: [`LayoutEngine::tick`] advances one snapshot by one
//! step using a [`ForceSolver`] backed by a Barnes–Hut [`QuadTree`], and [`anneal`] produces a
//! static Fruchterman–Reingold layout as a lazy sequence of frames.

pub mod anneal;
pub mod engine;
pub mod error;
pub mod force;
pub mod options;
pub mod quadtree;
mod rng;
pub mod solver;

pub use anneal::{AnnealFrame, AnnealFrames, AnnealOptions, CancelToken, anneal};
pub use engine::{LayoutEngine, TickStats, energy};
pub use error::{Error, Result};
pub use force::{Body, Contact};
pub use options::PhysicsOptions;
pub use quadtree::{Bounds, Insertion, QuadTree};
pub use solver::{ForceMap, ForceSolver, SolverKind};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
