//! Long-lived simulation state for one interactively edited graph.

use crate::{Error, LayoutConfig, Result};
use indexmap::IndexMap;
use lagoon_graph::{Edge, Graph, Node, NodeId, NodeMap, Vec2, is_finite};
use lagoon_layered::LayeredLayout;
use lagoon_physics::{LayoutEngine, PhysicsOptions, SolverKind, TickStats, energy};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickOutcome {
    pub stats: TickStats,
    /// `true` once the system energy dropped below the configured freeze threshold. Callers
    /// usually stop scheduling ticks at that point.
    pub frozen: bool,
}

/// Owns the layout engine and the current node state between ticks.
///
/// The caller's store stays the source of truth for which nodes exist: [`Session::sync`] takes a
/// fresh snapshot and carries simulation state over for ids it already knows.
#[derive(Debug)]
pub struct Session {
    engine: LayoutEngine,
    config: LayoutConfig,
    nodes: NodeMap,
    edges: Vec<Edge>,
    ticks: u64,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(LayoutConfig::default())
    }
}

impl Session {
    pub fn new(config: LayoutConfig) -> Self {
        Self {
            engine: LayoutEngine::new(config.solver, config.physics.clone()),
            config,
            nodes: NodeMap::new(),
            edges: Vec::new(),
            ticks: 0,
        }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Replaces the node set with `graph`.
    ///
    /// Known ids keep their simulated position, velocity, drag state and adaptive-speed history
    /// and take every other field from the snapshot. New ids start at rest. Ids missing from the
    /// snapshot are dropped.
    pub fn sync(&mut self, graph: &Graph) -> Result<()> {
        graph.validate()?;
        let mut next = NodeMap::with_capacity(graph.node_count());
        let mut added = 0usize;
        for incoming in graph.nodes.values() {
            let node = match self.nodes.get(&incoming.id) {
                Some(current) => Node {
                    position: current.position,
                    velocity: current.velocity,
                    fixed: current.fixed,
                    adaptive: current.adaptive,
                    ..incoming.clone()
                },
                None => {
                    added += 1;
                    let mut node = incoming.clone();
                    node.reset_motion();
                    node
                }
            };
            next.insert(node.id, node);
        }
        let removed = self.nodes.keys().filter(|id| !next.contains_key(*id)).count();
        tracing::debug!(nodes = next.len(), added, removed, "session sync");
        self.nodes = next;
        self.edges = graph.edges.clone();
        Ok(())
    }

    pub fn tick(&mut self) -> TickOutcome {
        self.nodes = self.engine.tick(&self.nodes, &self.edges);
        self.ticks += 1;
        let stats = self.engine.last_stats();
        TickOutcome {
            stats,
            frozen: stats.energy < self.config.freeze_energy,
        }
    }

    /// Ticks until the simulation freezes or `max_ticks` is reached. Returns the number of ticks
    /// run.
    pub fn run_until_frozen(&mut self, max_ticks: usize) -> usize {
        for i in 0..max_ticks {
            if self.tick().frozen {
                return i + 1;
            }
        }
        max_ticks
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn solver(&self) -> SolverKind {
        self.engine.solver_kind()
    }

    pub fn set_solver(&mut self, kind: SolverKind) {
        self.config.solver = kind;
        self.engine.set_solver(kind);
    }

    pub fn set_options(&mut self, options: PhysicsOptions) {
        self.config.physics = options.clone();
        self.engine.set_options(options);
    }

    /// Pins `id` for the duration of a pointer drag.
    pub fn begin_drag(&mut self, id: NodeId) -> Result<()> {
        let node = self.node_mut(id)?;
        node.fixed = true;
        node.reset_motion();
        Ok(())
    }

    pub fn drag_to(&mut self, id: NodeId, position: Vec2) -> Result<()> {
        if !is_finite(&position) {
            return Err(lagoon_graph::Error::NonFinite {
                id,
                field: "position",
            }
            .into());
        }
        let node = self.node_mut(id)?;
        node.fixed = true;
        node.position = position;
        Ok(())
    }

    pub fn end_drag(&mut self, id: NodeId) -> Result<()> {
        let node = self.node_mut(id)?;
        node.fixed = false;
        node.reset_motion();
        Ok(())
    }

    pub fn set_locked(&mut self, id: NodeId, locked: bool) -> Result<()> {
        let node = self.node_mut(id)?;
        node.locked = locked;
        node.reset_motion();
        Ok(())
    }

    /// Snaps every node to the layered layout of the current graph.
    ///
    /// For top-to-bottom and bottom-to-top layouts the session also switches to the ranked
    /// solver so further ticks only resolve horizontal spacing inside each layer.
    pub fn apply_layered(&mut self) -> LayeredLayout {
        let out = lagoon_layered::layout(&self.graph(), &self.config.layered);
        out.apply_to(&mut self.nodes);
        if !self.config.layered.direction.is_horizontal() {
            self.set_solver(SolverKind::Ranked);
        }
        out
    }

    pub fn nodes(&self) -> &NodeMap {
        &self.nodes
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Current state as an owned snapshot.
    pub fn graph(&self) -> Graph {
        Graph {
            nodes: self.nodes.clone(),
            edges: self.edges.clone(),
        }
    }

    pub fn positions(&self) -> IndexMap<NodeId, Vec2> {
        self.nodes.values().map(|n| (n.id, n.position)).collect()
    }

    pub fn energy(&self) -> f64 {
        energy(&self.nodes)
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node> {
        self.nodes.get_mut(&id).ok_or(Error::UnknownNode { id })
    }
}
