use crate::error::{Error, Result};
use crate::{Edge, Node, NodeId, is_finite};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Node arena keyed by id. Iteration follows insertion order, which keeps every layout pass
/// deterministic for a given snapshot.
pub type NodeMap = IndexMap<NodeId, Node>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Snapshot", into = "Snapshot")]
pub struct Graph {
    pub nodes: NodeMap,
    pub edges: Vec<Edge>,
}

/// Wire form: nodes as a plain list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Snapshot {
    #[serde(default)]
    nodes: Vec<Node>,
    #[serde(default)]
    edges: Vec<Edge>,
}

impl TryFrom<Snapshot> for Graph {
    type Error = Error;

    fn try_from(value: Snapshot) -> Result<Self> {
        Graph::from_parts(value.nodes, value.edges)
    }
}

impl From<Graph> for Snapshot {
    fn from(value: Graph) -> Self {
        Self {
            nodes: value.nodes.into_values().collect(),
            edges: value.edges,
        }
    }
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a graph from a node list, rejecting duplicate ids.
    pub fn from_parts(nodes: Vec<Node>, edges: Vec<Edge>) -> Result<Self> {
        let mut map = NodeMap::with_capacity(nodes.len());
        for n in nodes {
            let id = n.id;
            if map.insert(id, n).is_some() {
                return Err(Error::DuplicateNode { id });
            }
        }
        Ok(Self { nodes: map, edges })
    }

    /// Inserts or replaces a node by id.
    pub fn insert_node(&mut self, node: Node) -> Option<Node> {
        self.nodes.insert(node.id, node)
    }

    pub fn add_edge(&mut self, edge: Edge) {
        self.edges.push(edge);
    }

    /// Convenience for tests and fixtures: adds edges along a path of ids.
    pub fn set_path(&mut self, ids: &[u64]) {
        for pair in ids.windows(2) {
            self.edges.push(Edge::new(pair[0], pair[1]));
        }
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&id)
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Checks the boundary invariants: finite positions and velocities, positive mass,
    /// non-negative sizes, and edges that only reference known nodes.
    pub fn validate(&self) -> Result<()> {
        for n in self.nodes.values() {
            if !is_finite(&n.position) {
                return Err(Error::NonFinite {
                    id: n.id,
                    field: "position",
                });
            }
            if !is_finite(&n.velocity) {
                return Err(Error::NonFinite {
                    id: n.id,
                    field: "velocity",
                });
            }
            if !(n.mass.is_finite() && n.mass > 0.0) {
                return Err(Error::InvalidMass {
                    id: n.id,
                    mass: n.mass,
                });
            }
            for (field, value) in [("radius", n.radius), ("width", n.width), ("height", n.height)] {
                if !(value.is_finite() && value >= 0.0) {
                    return Err(Error::InvalidDimension {
                        id: n.id,
                        field,
                        value,
                    });
                }
            }
        }
        for (index, e) in self.edges.iter().enumerate() {
            if !self.nodes.contains_key(&e.source) || !self.nodes.contains_key(&e.target) {
                return Err(Error::MissingEndpoint {
                    index,
                    from: e.source,
                    to: e.target,
                });
            }
        }
        Ok(())
    }
}
