//! Longest-path ranking.

use crate::acyclic::Dag;
use std::collections::VecDeque;

/// Assigns every node `max(rank(parent)) + 1`, or `0` without parents, processing nodes in
/// Kahn order. Nodes become ready in index order, so the result is deterministic.
pub fn longest_path(dag: &Dag) -> Vec<usize> {
    let n = dag.len();
    let mut rank = vec![0usize; n];
    let mut indegree: Vec<usize> = (0..n).map(|v| dag.predecessors(v).len()).collect();
    let mut ready: VecDeque<usize> = (0..n).filter(|&v| indegree[v] == 0).collect();

    while let Some(v) = ready.pop_front() {
        for &w in dag.successors(v) {
            rank[w] = rank[w].max(rank[v] + 1);
            indegree[w] -= 1;
            if indegree[w] == 0 {
                ready.push_back(w);
            }
        }
    }
    rank
}

/// Buckets node indices by rank, keeping index order inside each bucket.
pub fn layers(ranks: &[usize]) -> Vec<Vec<usize>> {
    let count = ranks.iter().max().map_or(0, |&r| r + 1);
    let mut layers = vec![Vec::new(); count];
    for (v, &r) in ranks.iter().enumerate() {
        layers[r].push(v);
    }
    layers
}
