//! Barnes–Hut quadtree.
//!
//! Cells live in a flat arena and refer to their children by index, so the tree is dropped in one
//! deallocation and never needs reference counting. The tree is rebuilt from scratch every tick.

use crate::PhysicsOptions;
use crate::force::{self, Body, COINCIDENT_EPSILON, Contact};
use crate::rng::XorShift64Star;
use lagoon_graph::{Node, Vec2, is_finite};

/// Recursion cap for insertion. Bodies that reach a leaf at this depth are stored in it without
/// further subdivision.
pub const MAX_DEPTH: usize = 30;
/// Relative growth of the root square around the node bounding box.
pub const BOUNDS_PADDING: f64 = 0.2;
/// Absolute margin added on every side of the root square.
pub const BOUNDS_MARGIN: f64 = 10.0;

/// Maximum per-axis offset applied to a body that lands on an occupied position.
const JITTER: f64 = 1e-2;
const JITTER_SEED: u64 = 0x5EED_1A60;

/// Square region described by its center and half side length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub center: Vec2,
    pub half: f64,
}

impl Bounds {
    pub fn new(center: Vec2, half: f64) -> Self {
        Self { center, half }
    }

    /// Padded square that contains every finite point. Non-finite points are ignored; an empty
    /// input yields a small square around the origin.
    pub fn enclosing<'a>(points: impl IntoIterator<Item = &'a Vec2>) -> Self {
        let mut min = Vec2::new(f64::INFINITY, f64::INFINITY);
        let mut max = Vec2::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
        let mut any = false;
        for p in points.into_iter().filter(|p| is_finite(p)) {
            min = min.inf(p);
            max = max.sup(p);
            any = true;
        }
        if !any {
            return Self::new(Vec2::zeros(), BOUNDS_MARGIN);
        }
        let side = (max.x - min.x).max(max.y - min.y);
        Self::new(
            (min + max) / 2.0,
            side * (1.0 + BOUNDS_PADDING) / 2.0 + BOUNDS_MARGIN,
        )
    }

    pub fn width(&self) -> f64 {
        self.half * 2.0
    }

    pub fn contains(&self, p: &Vec2) -> bool {
        (p.x - self.center.x).abs() <= self.half && (p.y - self.center.y).abs() <= self.half
    }

    fn clamp(&self, p: Vec2) -> Vec2 {
        Vec2::new(
            p.x.clamp(self.center.x - self.half, self.center.x + self.half),
            p.y.clamp(self.center.y - self.half, self.center.y + self.half),
        )
    }

    fn quadrant_of(&self, p: &Vec2) -> usize {
        let east = usize::from(p.x >= self.center.x);
        let south = usize::from(p.y >= self.center.y);
        east | (south << 1)
    }

    fn quadrant(&self, q: usize) -> Self {
        let h = self.half / 2.0;
        let dx = if q & 1 == 1 { h } else { -h };
        let dy = if q & 2 == 2 { h } else { -h };
        Self::new(self.center + Vec2::new(dx, dy), h)
    }
}

/// What happened to a body handed to [`QuadTree::insert`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Insertion {
    Stored,
    /// Reached the depth cap and was added to an existing leaf.
    Absorbed,
    NonFinite,
    OutOfBounds,
}

impl Insertion {
    pub fn is_accepted(self) -> bool {
        matches!(self, Self::Stored | Self::Absorbed)
    }
}

#[derive(Debug, Clone)]
struct Cell {
    bounds: Bounds,
    mass: f64,
    center_of_mass: Vec2,
    // One body for ordinary leaves; more only at the depth cap.
    bodies: Vec<Body>,
    children: Option<[u32; 4]>,
}

impl Cell {
    fn new(bounds: Bounds) -> Self {
        Self {
            bounds,
            mass: 0.0,
            center_of_mass: Vec2::zeros(),
            bodies: Vec::new(),
            children: None,
        }
    }

    fn accumulate(&mut self, body: &Body) {
        let total = self.mass + body.mass;
        if total > 0.0 {
            self.center_of_mass = (self.center_of_mass * self.mass + body.position * body.mass) / total;
        }
        self.mass = total;
    }
}

#[derive(Debug, Clone)]
pub struct QuadTree {
    cells: Vec<Cell>,
    rng: XorShift64Star,
    len: usize,
    depth: usize,
}

impl QuadTree {
    pub fn new(bounds: Bounds) -> Self {
        Self {
            cells: vec![Cell::new(bounds)],
            rng: XorShift64Star::new(JITTER_SEED),
            len: 0,
            depth: 0,
        }
    }

    /// Builds a tree over the padded bounds of `nodes`, skipping any node the tree rejects.
    pub fn from_nodes<'a>(nodes: impl IntoIterator<Item = &'a Node> + Clone) -> Self {
        let bounds = Bounds::enclosing(nodes.clone().into_iter().map(|n| &n.position));
        let mut tree = Self::new(bounds);
        for n in nodes {
            let outcome = tree.insert(Body::from_node(n));
            if !outcome.is_accepted() {
                tracing::trace!(node = %n.id, ?outcome, "quadtree skipped node");
            }
        }
        tree
    }

    pub fn insert(&mut self, body: Body) -> Insertion {
        if !is_finite(&body.position) {
            return Insertion::NonFinite;
        }
        if !self.cells[0].bounds.contains(&body.position) {
            return Insertion::OutOfBounds;
        }
        self.len += 1;
        let body = self.separate_coincident(body);
        self.insert_at(0, body, 0)
    }

    /// Offsets `body` when it would land on a resident at the same position. Coincident points
    /// would otherwise keep landing in the same quadrant all the way down. The offset is chosen
    /// before descending so every cell on the path accumulates the same position.
    fn separate_coincident(&mut self, mut body: Body) -> Body {
        let mut idx = 0;
        let mut depth = 0;
        while let Some(children) = self.cells[idx].children {
            idx = children[self.cells[idx].bounds.quadrant_of(&body.position)] as usize;
            depth += 1;
        }
        let leaf = &self.cells[idx];
        let coincident = leaf
            .bodies
            .first()
            .is_some_and(|r| (r.position - body.position).norm() < COINCIDENT_EPSILON);
        if depth < MAX_DEPTH && coincident {
            let bounds = leaf.bounds;
            let jitter = Vec2::new(
                self.rng.next_f64_signed() * JITTER,
                self.rng.next_f64_signed() * JITTER,
            );
            body.position = bounds.clamp(body.position + jitter);
        }
        body
    }

    fn insert_at(&mut self, idx: usize, body: Body, depth: usize) -> Insertion {
        self.depth = self.depth.max(depth);

        if let Some(children) = self.cells[idx].children {
            self.cells[idx].accumulate(&body);
            let q = self.cells[idx].bounds.quadrant_of(&body.position);
            return self.insert_at(children[q] as usize, body, depth + 1);
        }

        if self.cells[idx].bodies.is_empty() {
            self.cells[idx].accumulate(&body);
            self.cells[idx].bodies.push(body);
            return Insertion::Stored;
        }

        if depth >= MAX_DEPTH {
            self.cells[idx].accumulate(&body);
            self.cells[idx].bodies.push(body);
            return Insertion::Absorbed;
        }

        // Occupied leaf: split it.
        self.cells[idx].accumulate(&body);
        let residents = std::mem::take(&mut self.cells[idx].bodies);
        let children = self.subdivide(idx);
        for r in residents {
            let q = self.cells[idx].bounds.quadrant_of(&r.position);
            self.insert_at(children[q] as usize, r, depth + 1);
        }
        let q = self.cells[idx].bounds.quadrant_of(&body.position);
        self.insert_at(children[q] as usize, body, depth + 1)
    }

    fn subdivide(&mut self, idx: usize) -> [u32; 4] {
        let bounds = self.cells[idx].bounds;
        let first = self.cells.len() as u32;
        for q in 0..4 {
            self.cells.push(Cell::new(bounds.quadrant(q)));
        }
        let children = [first, first + 1, first + 2, first + 3];
        self.cells[idx].children = Some(children);
        children
    }

    /// Net repulsion on `target` from every other body in the tree.
    ///
    /// A cell that does not contain the target and whose width-to-distance ratio is below
    /// `theta` is replaced by a single body at its center of mass. `theta = 0` visits every leaf
    /// and yields the exact pairwise sum.
    pub fn repulsion(
        &self,
        target: &Body,
        theta: f64,
        options: &PhysicsOptions,
        contact: Contact,
    ) -> Vec2 {
        let mut out = Vec2::zeros();
        self.accumulate_force(0, target, theta, options, contact, &mut out);
        out
    }

    fn accumulate_force(
        &self,
        idx: usize,
        target: &Body,
        theta: f64,
        options: &PhysicsOptions,
        contact: Contact,
        out: &mut Vec2,
    ) {
        let cell = &self.cells[idx];
        if cell.mass <= 0.0 {
            return;
        }
        let Some(children) = cell.children else {
            for b in cell.bodies.iter().filter(|b| b.id != target.id) {
                *out += force::pairwise(target, b, options, contact);
            }
            return;
        };

        let d = (target.position - cell.center_of_mass).norm();
        if !cell.bounds.contains(&target.position) && d > 0.0 && cell.bounds.width() / d < theta {
            *out += force::soft_repulsion(
                target.position,
                target.mass,
                cell.center_of_mass,
                cell.mass,
                options,
            );
            return;
        }
        for c in children {
            self.accumulate_force(c as usize, target, theta, options, contact, out);
        }
    }

    pub fn bounds(&self) -> Bounds {
        self.cells[0].bounds
    }

    pub fn total_mass(&self) -> f64 {
        self.cells[0].mass
    }

    pub fn center_of_mass(&self) -> Vec2 {
        self.cells[0].center_of_mass
    }

    /// Number of accepted bodies.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Deepest level any insertion reached.
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }
}
