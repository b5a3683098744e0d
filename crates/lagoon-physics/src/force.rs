//! Pairwise force primitives shared by the quadtree query and the solvers.

use crate::PhysicsOptions;
use crate::solver::ForceMap;
use lagoon_graph::{Edge, Node, NodeId, NodeMap, Vec2};

/// Gap kept between node surfaces before the hard collision regime kicks in.
pub const COLLISION_BUFFER: f64 = 4.0;
/// Extra push per unit of overlap depth.
pub const COLLISION_STIFFNESS: f64 = 0.5;
/// Added to the endpoint radii to get a spring's rest length.
pub const SPRING_BUFFER: f64 = 60.0;
/// Constant push applied to overlapping boxes by rectangular contact.
pub const RECT_COLLISION_FORCE: f64 = 25.0;
/// Positions closer than this are treated as coincident.
pub const COINCIDENT_EPSILON: f64 = 1e-6;

/// How two nearby bodies are tested for contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    /// Discs of `radius`.
    Circular,
    /// Axis-aligned boxes of `width` x `height`.
    Rectangular,
}

/// The slice of a node the force model needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub id: NodeId,
    pub position: Vec2,
    pub mass: f64,
    pub radius: f64,
    pub half_width: f64,
    pub half_height: f64,
}

impl Body {
    pub fn from_node(node: &Node) -> Self {
        let (half_width, half_height) = node.half_extent();
        Self {
            id: node.id,
            position: node.position,
            mass: node.mass,
            radius: node.radius,
            half_width,
            half_height,
        }
    }
}

/// Soft repulsion felt at `target` from a mass at `other`: `repulsion * m1 * m2 / d`, pointing
/// away from `other`. Coincident points produce no force; callers break that tie themselves.
pub fn soft_repulsion(
    target: Vec2,
    target_mass: f64,
    other: Vec2,
    other_mass: f64,
    options: &PhysicsOptions,
) -> Vec2 {
    let delta = target - other;
    let d = delta.norm();
    if d < COINCIDENT_EPSILON {
        return Vec2::zeros();
    }
    let magnitude = options.repulsion * target_mass * other_mass / d.max(options.min_distance);
    delta / d * magnitude
}

/// Direct force on `target` from `other` under the given contact model.
pub fn pairwise(target: &Body, other: &Body, options: &PhysicsOptions, contact: Contact) -> Vec2 {
    match contact {
        Contact::Circular => circular(target, other, options),
        Contact::Rectangular => rectangular(target, other, options),
    }
}

fn circular(target: &Body, other: &Body, options: &PhysicsOptions) -> Vec2 {
    let delta = target.position - other.position;
    let d = delta.norm();
    let contact_distance = target.radius + other.radius + COLLISION_BUFFER;
    let gap = d - contact_distance;
    if gap >= 0.0 {
        return soft_repulsion(target.position, target.mass, other.position, other.mass, options);
    }

    // Overlap: the soft term at the actual distance plus a linear push on the overlap depth, so
    // colliding bodies are never pushed less than free ones at the same distance.
    let dir = away_direction(target, other);
    let soft = options.repulsion * target.mass * other.mass / d.max(options.min_distance);
    dir * (soft + (-gap) * COLLISION_STIFFNESS)
}

fn rectangular(target: &Body, other: &Body, options: &PhysicsOptions) -> Vec2 {
    let dx = target.position.x - other.position.x;
    let dy = target.position.y - other.position.y;
    let pen_x = (target.half_width + other.half_width) - dx.abs();
    let pen_y = (target.half_height + other.half_height) - dy.abs();
    if pen_x <= 0.0 || pen_y <= 0.0 {
        return soft_repulsion(target.position, target.mass, other.position, other.mass, options);
    }

    // Resolve along whichever axis needs the smaller displacement.
    if pen_x < pen_y {
        Vec2::new(axis_sign(dx, target.id, other.id) * RECT_COLLISION_FORCE, 0.0)
    } else {
        Vec2::new(0.0, axis_sign(dy, target.id, other.id) * RECT_COLLISION_FORCE)
    }
}

/// Unit vector from `other` toward `target`. Coincident centers fall back to a horizontal
/// direction picked by id order so the two nodes get opposite pushes.
pub(crate) fn away_direction(target: &Body, other: &Body) -> Vec2 {
    let delta = target.position - other.position;
    let d = delta.norm();
    if d > COINCIDENT_EPSILON {
        delta / d
    } else {
        Vec2::new(axis_sign(0.0, target.id, other.id), 0.0)
    }
}

pub(crate) fn axis_sign(delta: f64, target: NodeId, other: NodeId) -> f64 {
    if delta > 0.0 {
        1.0
    } else if delta < 0.0 || target < other {
        -1.0
    } else {
        1.0
    }
}

/// Linear pull toward the origin.
pub fn gravity(node: &Node, options: &PhysicsOptions) -> Vec2 {
    -node.position * (options.gravity * node.mass)
}

/// Rest length of the spring between two nodes.
pub fn ideal_length(a: &Node, b: &Node) -> f64 {
    a.radius + b.radius + SPRING_BUFFER
}

/// Adds Hookean edge springs to `forces`. Self-loops and edges with a missing endpoint are
/// skipped.
pub fn accumulate_springs(
    nodes: &NodeMap,
    edges: &[Edge],
    options: &PhysicsOptions,
    forces: &mut ForceMap,
) {
    for e in edges {
        if e.is_self_loop() {
            continue;
        }
        let (Some(a), Some(b)) = (nodes.get(&e.source), nodes.get(&e.target)) else {
            continue;
        };
        let delta = b.position - a.position;
        let d = delta.norm();
        if !d.is_finite() || d < COINCIDENT_EPSILON {
            continue;
        }
        let magnitude = (d - ideal_length(a, b)) * options.spring * e.strength;
        let f = delta / d * magnitude;
        *forces.entry(a.id).or_insert_with(Vec2::zeros) += f;
        *forces.entry(b.id).or_insert_with(Vec2::zeros) -= f;
    }
}
