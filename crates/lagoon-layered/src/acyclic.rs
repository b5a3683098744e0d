//! Break cycles by dropping DFS back edges.
//!
//! The input edge list is never mutated: the result is a separate adjacency view over node
//! indices plus the list of edges that were left out of it.

use lagoon_graph::{Graph, NodeId};

/// Acyclic adjacency view over the nodes of a [`Graph`], indexed in node map order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dag {
    ids: Vec<NodeId>,
    successors: Vec<Vec<usize>>,
    predecessors: Vec<Vec<usize>>,
}

impl Dag {
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn id(&self, v: usize) -> NodeId {
        self.ids[v]
    }

    pub fn ids(&self) -> &[NodeId] {
        &self.ids
    }

    /// Targets of the kept out-edges of `v`. Parallel edges appear once per edge.
    pub fn successors(&self, v: usize) -> &[usize] {
        &self.successors[v]
    }

    pub fn predecessors(&self, v: usize) -> &[usize] {
        &self.predecessors[v]
    }

    pub fn edge_count(&self) -> usize {
        self.successors.iter().map(Vec::len).sum()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Acyclic {
    pub dag: Dag,
    /// Indices into `graph.edges`, ascending.
    pub removed_edges: Vec<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Visit {
    New,
    OnStack,
    Done,
}

/// Runs a depth-first search from every unvisited node in map order and drops every edge that
/// points at a node still on the search stack. Self-loops are always dropped. Edges with an
/// unknown endpoint are ignored and not reported.
pub fn run(graph: &Graph) -> Acyclic {
    let n = graph.node_count();
    let mut out: Vec<Vec<(usize, usize)>> = vec![Vec::new(); n];
    for (index, e) in graph.edges.iter().enumerate() {
        let (Some(s), Some(t)) = (
            graph.nodes.get_index_of(&e.source),
            graph.nodes.get_index_of(&e.target),
        ) else {
            continue;
        };
        out[s].push((index, t));
    }

    let mut back = vec![false; graph.edges.len()];
    let mut state = vec![Visit::New; n];
    // (node, next out-edge to look at)
    let mut stack: Vec<(usize, usize)> = Vec::new();
    for root in 0..n {
        if state[root] != Visit::New {
            continue;
        }
        state[root] = Visit::OnStack;
        stack.push((root, 0));
        while let Some(top) = stack.last_mut() {
            let (v, cursor) = *top;
            let Some(&(index, w)) = out[v].get(cursor) else {
                state[v] = Visit::Done;
                stack.pop();
                continue;
            };
            top.1 += 1;
            match state[w] {
                Visit::New => {
                    state[w] = Visit::OnStack;
                    stack.push((w, 0));
                }
                Visit::OnStack => back[index] = true,
                Visit::Done => {}
            }
        }
    }

    let mut successors = vec![Vec::new(); n];
    let mut predecessors = vec![Vec::new(); n];
    for (v, edges) in out.iter().enumerate() {
        for &(index, w) in edges {
            if !back[index] {
                successors[v].push(w);
                predecessors[w].push(v);
            }
        }
    }

    Acyclic {
        dag: Dag {
            ids: graph.nodes.keys().copied().collect(),
            successors,
            predecessors,
        },
        removed_edges: back
            .iter()
            .enumerate()
            .filter_map(|(i, &b)| b.then_some(i))
            .collect(),
    }
}
