//! Crossing minimization with the barycenter heuristic.

use crate::acyclic::Dag;

/// Runs up to `sweeps` down-sweeps over `layers` and keeps the ordering with the fewest
/// crossings (the later one on ties). Returns that crossing count.
pub fn minimize_crossings(dag: &Dag, layers: &mut [Vec<usize>], sweeps: usize) -> usize {
    let mut best = crossings(dag, layers);
    let mut best_layers = layers.to_vec();
    for sweep in 0..sweeps {
        if best == 0 {
            break;
        }
        sweep_down(dag, layers);
        let cc = crossings(dag, layers);
        tracing::trace!(sweep, crossings = cc, "barycenter sweep");
        if cc <= best {
            best = cc;
            best_layers.clone_from_slice(layers);
        }
    }
    layers.clone_from_slice(&best_layers);
    best
}

/// Re-sorts every layer from rank 1 by the mean slot of each node's predecessors in the layer
/// above. Nodes without such predecessors keep their slot; the others are stably sorted into
/// the remaining slots.
pub fn sweep_down(dag: &Dag, layers: &mut [Vec<usize>]) {
    let mut slot = vec![usize::MAX; dag.len()];
    let Some(first) = layers.first() else {
        return;
    };
    for (i, &v) in first.iter().enumerate() {
        slot[v] = i;
    }

    for r in 1..layers.len() {
        let (above, below) = layers.split_at_mut(r);
        let north = &above[r - 1];
        let layer = &mut below[0];

        let mut movable: Vec<(f64, usize)> = Vec::new();
        let mut open_slots: Vec<usize> = Vec::new();
        for (i, &v) in layer.iter().enumerate() {
            let (sum, count) = dag
                .predecessors(v)
                .iter()
                .filter(|&&u| slot[u] < north.len() && north[slot[u]] == u)
                .fold((0.0, 0usize), |(s, c), &u| (s + slot[u] as f64, c + 1));
            if count > 0 {
                movable.push((sum / count as f64, v));
                open_slots.push(i);
            }
        }
        movable.sort_by(|a, b| a.0.total_cmp(&b.0));
        for (i, (_, v)) in open_slots.into_iter().zip(movable) {
            layer[i] = v;
        }

        for (i, &v) in layer.iter().enumerate() {
            slot[v] = i;
        }
    }
}

/// Total crossings between adjacent layers. Only edges that join consecutive layers count.
pub fn crossings(dag: &Dag, layers: &[Vec<usize>]) -> usize {
    let mut slot = vec![usize::MAX; dag.len()];
    let mut layer_of = vec![usize::MAX; dag.len()];
    for (r, layer) in layers.iter().enumerate() {
        for (i, &v) in layer.iter().enumerate() {
            slot[v] = i;
            layer_of[v] = r;
        }
    }

    layers
        .windows(2)
        .enumerate()
        .map(|(r, pair)| {
            let south_entries = pair[0].iter().flat_map(|&v| {
                let mut targets: Vec<usize> = dag
                    .successors(v)
                    .iter()
                    .filter(|&&w| layer_of[w] == r + 1)
                    .map(|&w| slot[w])
                    .collect();
                targets.sort_unstable();
                targets
            });
            two_layer_crossings(pair[1].len(), south_entries)
        })
        .sum()
}

/// Counts inversions among edge endpoints in the south layer with an accumulator tree. Entries
/// must be grouped by north slot in ascending order and sorted by south slot within a group.
fn two_layer_crossings(south_len: usize, south_entries: impl Iterator<Item = usize>) -> usize {
    if south_len == 0 {
        return 0;
    }
    let mut first_index = south_len.next_power_of_two();
    let tree_size = 2 * first_index - 1;
    first_index -= 1;
    let mut tree = vec![0usize; tree_size];

    let mut cc = 0;
    for pos in south_entries {
        let mut index = pos + first_index;
        tree[index] += 1;
        let mut weight_sum = 0;
        while index > 0 {
            if index % 2 == 1 {
                weight_sum += tree[index + 1];
            }
            index = (index - 1) >> 1;
            tree[index] += 1;
        }
        cc += weight_sum;
    }
    cc
}
