use crate::{DEFAULT_NODE_HEIGHT, DEFAULT_NODE_RADIUS, DEFAULT_NODE_WIDTH, Vec2};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for NodeId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// Per-node adaptive-speed bookkeeping. Recomputed every tick by the layout engine and never
/// persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdaptiveState {
    /// Net force applied on the previous tick.
    pub last_force: Vec2,
    /// How much the force direction changed since the previous tick.
    pub swinging: f64,
    /// How much of the force persisted since the previous tick.
    pub traction: f64,
}

impl Default for AdaptiveState {
    fn default() -> Self {
        Self {
            last_force: Vec2::zeros(),
            swinging: 0.0,
            traction: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Node {
    pub id: NodeId,
    /// Taxonomy tag; cosmetic only.
    pub label: Option<String>,
    pub position: Vec2,
    pub velocity: Vec2,
    pub mass: f64,
    /// Used for circular collision and as part of the spring rest length.
    pub radius: f64,
    /// Measured box size. `0.0` means "not measured"; see [`Node::extent`].
    pub width: f64,
    pub height: f64,
    /// Set while the user drags the node; cleared on release.
    pub fixed: bool,
    /// User pin that survives across ticks.
    pub locked: bool,
    #[serde(skip)]
    pub adaptive: AdaptiveState,
}

impl Default for Node {
    fn default() -> Self {
        Self {
            id: NodeId::default(),
            label: None,
            position: Vec2::zeros(),
            velocity: Vec2::zeros(),
            mass: 1.0,
            radius: DEFAULT_NODE_RADIUS,
            width: 0.0,
            height: 0.0,
            fixed: false,
            locked: false,
            adaptive: AdaptiveState::default(),
        }
    }
}

impl Node {
    pub fn new(id: impl Into<NodeId>, x: f64, y: f64) -> Self {
        Self {
            id: id.into(),
            position: Vec2::new(x, y),
            ..Default::default()
        }
    }

    pub fn with_mass(mut self, mass: f64) -> Self {
        self.mass = mass;
        self
    }

    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = radius;
        self
    }

    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_velocity(mut self, vx: f64, vy: f64) -> Self {
        self.velocity = Vec2::new(vx, vy);
        self
    }

    pub fn locked(mut self) -> Self {
        self.locked = true;
        self
    }

    /// `true` when integration must leave the node where it is.
    pub fn is_pinned(&self) -> bool {
        self.fixed || self.locked
    }

    /// Box size with unmeasured dimensions replaced by the defaults.
    pub fn extent(&self) -> (f64, f64) {
        let w = if self.width > 0.0 {
            self.width
        } else {
            DEFAULT_NODE_WIDTH
        };
        let h = if self.height > 0.0 {
            self.height
        } else {
            DEFAULT_NODE_HEIGHT
        };
        (w, h)
    }

    pub fn half_extent(&self) -> (f64, f64) {
        let (w, h) = self.extent();
        (w / 2.0, h / 2.0)
    }

    /// Kinetic energy `½ m |v|²`.
    pub fn kinetic_energy(&self) -> f64 {
        0.5 * self.mass * self.velocity.norm_squared()
    }

    /// Drops velocity and adaptive-speed history, as for a node that just entered a simulation.
    pub fn reset_motion(&mut self) {
        self.velocity = Vec2::zeros();
        self.adaptive = AdaptiveState::default();
    }
}
