use super::traits::CommunityDetection;
use crate::core::graph::error_graph::ErrorGraph;
use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use tracing::trace;

/// Gains below this margin are treated as ties so that rounding noise cannot
/// keep nodes oscillating between communities.
const GAIN_TOLERANCE: f64 = 1e-10;

const DEFAULT_MAX_LEVELS: usize = 64;

/// Leiden community detection with the Constant Potts Model objective.
///
/// Each vertex carries unit weight. One iteration runs the usual three phases
/// (queue-based local moving, refinement into well-connected sub-communities,
/// aggregation of the refined partition) until a level leaves every node in its
/// own community. Iterations repeat, seeded with the previous result, until the
/// partition no longer changes. A partition that reappears after an earlier
/// iteration also ends the loop, so detection always terminates.
///
/// Refinement merges greedily instead of sampling, which makes the whole
/// algorithm deterministic for a given graph.
#[derive(Debug, Clone)]
pub struct Leiden {
    max_iterations: Option<usize>,
    max_levels: usize,
}

impl Default for Leiden {
    fn default() -> Self {
        Self {
            max_iterations: None,
            max_levels: DEFAULT_MAX_LEVELS,
        }
    }
}

impl Leiden {
    pub fn new() -> Self {
        Self::default()
    }

    /// Caps the number of full Leiden iterations (at least one is always run).
    /// Without a cap, iterations continue until the partition is stable.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = Some(max_iterations.max(1));
        self
    }

    fn run_iteration(&self, base: &Network, initial: &[usize], gamma: f64) -> Vec<usize> {
        let mut network = base.clone();
        let mut membership = initial.to_vec();
        renumber(&mut membership);
        let mut node_of_vertex: Vec<usize> = (0..base.len()).collect();

        for level in 0..self.max_levels {
            let moves = move_nodes_fast(&network, &mut membership, gamma);
            let communities = renumber(&mut membership);
            trace!(
                level,
                nodes = network.len(),
                communities,
                moves,
                "Leiden local moving finished."
            );
            if communities == network.len() {
                break;
            }

            let mut refined = refine_partition(&network, &membership, gamma);
            let refined_count = renumber(&mut refined);

            let mut aggregate_membership = vec![0; refined_count];
            for (node, &r) in refined.iter().enumerate() {
                aggregate_membership[r] = membership[node];
            }
            for node in node_of_vertex.iter_mut() {
                *node = refined[*node];
            }
            membership = aggregate_membership;

            if refined_count == network.len() {
                break;
            }
            network = network.aggregate(&refined, refined_count);
        }

        let mut assignment: Vec<usize> = node_of_vertex.iter().map(|&n| membership[n]).collect();
        renumber(&mut assignment);
        assignment
    }
}

impl CommunityDetection for Leiden {
    fn detect(&self, graph: &ErrorGraph, resolution: f64) -> Vec<usize> {
        let network = Network::from_graph(graph);
        if network.is_empty() {
            return Vec::new();
        }

        let mut assignment: Vec<usize> = (0..network.len()).collect();
        let mut seen: HashSet<Vec<usize>> = HashSet::new();
        let mut iteration = 0;
        loop {
            iteration += 1;
            let next = self.run_iteration(&network, &assignment, resolution);
            if next == assignment {
                trace!(iteration, "Leiden partition is stable.");
                break;
            }
            if !seen.insert(next.clone()) {
                trace!(iteration, "Leiden partition repeated an earlier iteration.");
                assignment = next;
                break;
            }
            assignment = next;
            if self.max_iterations.is_some_and(|max| iteration >= max) {
                trace!(iteration, "Leiden iteration cap reached.");
                break;
            }
        }
        assignment
    }
}

/// Weighted adjacency used internally by the optimizer.
///
/// Parallel edges are merged and self loops dropped; neither changes CPM move gains.
#[derive(Debug, Clone)]
struct Network {
    node_weights: Vec<f64>,
    adjacency: Vec<Vec<(usize, f64)>>,
}

impl Network {
    fn from_graph(graph: &ErrorGraph) -> Self {
        let n = graph.vertex_count();
        let mut merged: Vec<BTreeMap<usize, f64>> = vec![BTreeMap::new(); n];
        for (i, j, w) in graph.edges() {
            if i == j {
                continue;
            }
            *merged[i].entry(j).or_insert(0.0) += w;
            *merged[j].entry(i).or_insert(0.0) += w;
        }
        Self {
            node_weights: vec![1.0; n],
            adjacency: merged.into_iter().map(|m| m.into_iter().collect()).collect(),
        }
    }

    fn len(&self) -> usize {
        self.node_weights.len()
    }

    fn is_empty(&self) -> bool {
        self.node_weights.is_empty()
    }

    /// Contracts every community of `partition` (ids `0..count`) into one node.
    fn aggregate(&self, partition: &[usize], count: usize) -> Self {
        let mut node_weights = vec![0.0; count];
        let mut merged: Vec<BTreeMap<usize, f64>> = vec![BTreeMap::new(); count];
        for (node, neighbors) in self.adjacency.iter().enumerate() {
            let a = partition[node];
            node_weights[a] += self.node_weights[node];
            for &(other, w) in neighbors {
                let b = partition[other];
                if a != b {
                    *merged[a].entry(b).or_insert(0.0) += w;
                }
            }
        }
        Self {
            node_weights,
            adjacency: merged.into_iter().map(|m| m.into_iter().collect()).collect(),
        }
    }
}

/// Scratch space accumulating edge weight from one node to neighbouring communities.
struct NeighborWeights {
    weights: Vec<f64>,
    seen: Vec<bool>,
    touched: Vec<usize>,
}

impl NeighborWeights {
    fn new(size: usize) -> Self {
        Self {
            weights: vec![0.0; size],
            seen: vec![false; size],
            touched: Vec::new(),
        }
    }

    fn add(&mut self, community: usize, weight: f64) {
        if !self.seen[community] {
            self.seen[community] = true;
            self.touched.push(community);
        }
        self.weights[community] += weight;
    }

    fn get(&self, community: usize) -> f64 {
        self.weights[community]
    }

    fn clear(&mut self) {
        for &c in &self.touched {
            self.weights[c] = 0.0;
            self.seen[c] = false;
        }
        self.touched.clear();
    }
}

/// Queue-based local moving. Community ids in `membership` must be `< network.len()`.
///
/// Returns the number of moves performed.
fn move_nodes_fast(network: &Network, membership: &mut [usize], gamma: f64) -> usize {
    let n = network.len();
    let mut community_weights = vec![0.0; n];
    for (node, &c) in membership.iter().enumerate() {
        community_weights[c] += network.node_weights[node];
    }
    let mut empty: Vec<usize> = (0..n).rev().filter(|&c| community_weights[c] == 0.0).collect();

    let mut queue: VecDeque<usize> = (0..n).collect();
    let mut in_queue = vec![true; n];
    let mut neighbor_weights = NeighborWeights::new(n);
    let mut moves = 0;

    while let Some(node) = queue.pop_front() {
        in_queue[node] = false;
        let node_weight = network.node_weights[node];
        let current = membership[node];

        for &(other, w) in &network.adjacency[node] {
            neighbor_weights.add(membership[other], w);
        }

        community_weights[current] -= node_weight;
        let mut best = current;
        let mut best_gain =
            neighbor_weights.get(current) - gamma * node_weight * community_weights[current];
        for &candidate in &neighbor_weights.touched {
            if candidate == current {
                continue;
            }
            let gain =
                neighbor_weights.get(candidate) - gamma * node_weight * community_weights[candidate];
            if gain > best_gain + GAIN_TOLERANCE {
                best = candidate;
                best_gain = gain;
            }
        }
        if best_gain < -GAIN_TOLERANCE {
            // Standing alone in an empty community is worth exactly zero.
            if let Some(fresh) = empty.pop() {
                best = fresh;
            }
        }
        community_weights[best] += node_weight;
        neighbor_weights.clear();

        if best != current {
            if community_weights[current] == 0.0 {
                empty.push(current);
            }
            membership[node] = best;
            moves += 1;
            for &(other, _) in &network.adjacency[node] {
                if !in_queue[other] && membership[other] != best {
                    in_queue[other] = true;
                    queue.push_back(other);
                }
            }
        }
    }
    moves
}

/// Splits every community of `membership` into well-connected sub-communities.
///
/// Starts from singletons and greedily merges each still-singleton node into the
/// best well-connected sub-community of its own community.
fn refine_partition(network: &Network, membership: &[usize], gamma: f64) -> Vec<usize> {
    let n = network.len();
    let mut community_weights = vec![0.0; n];
    for (node, &c) in membership.iter().enumerate() {
        community_weights[c] += network.node_weights[node];
    }

    let mut refined: Vec<usize> = (0..n).collect();
    let mut refined_weights = network.node_weights.clone();
    let mut singleton = vec![true; n];
    let mut external: Vec<f64> = (0..n)
        .map(|node| {
            network.adjacency[node]
                .iter()
                .filter(|(other, _)| membership[*other] == membership[node])
                .map(|(_, w)| w)
                .sum()
        })
        .collect();
    let mut neighbor_weights = NeighborWeights::new(n);

    let well_connected = |external: f64, weight: f64, community_weight: f64| {
        external >= gamma * weight * (community_weight - weight) - GAIN_TOLERANCE
    };

    for node in 0..n {
        if !singleton[node] {
            continue;
        }
        let community = membership[node];
        let node_weight = network.node_weights[node];
        let own = refined[node];
        if !well_connected(external[own], node_weight, community_weights[community]) {
            continue;
        }

        for &(other, w) in &network.adjacency[node] {
            if membership[other] == community {
                neighbor_weights.add(refined[other], w);
            }
        }

        refined_weights[own] -= node_weight;
        let mut best = own;
        let mut best_gain = 0.0;
        for &candidate in &neighbor_weights.touched {
            if candidate == own {
                continue;
            }
            if !well_connected(
                external[candidate],
                refined_weights[candidate],
                community_weights[community],
            ) {
                continue;
            }
            let gain =
                neighbor_weights.get(candidate) - gamma * node_weight * refined_weights[candidate];
            if gain > best_gain + GAIN_TOLERANCE {
                best = candidate;
                best_gain = gain;
            }
        }
        refined_weights[best] += node_weight;

        if best != own {
            external[best] += external[own] - 2.0 * neighbor_weights.get(best);
            external[own] = 0.0;
            refined[node] = best;
            singleton[node] = false;
            singleton[best] = false;
        }
        neighbor_weights.clear();
    }
    refined
}

/// Relabels ids to `0..k` in order of first appearance and returns `k`.
fn renumber(labels: &mut [usize]) -> usize {
    let mut mapping: HashMap<usize, usize> = HashMap::new();
    for label in labels.iter_mut() {
        let next = mapping.len();
        *label = *mapping.entry(*label).or_insert(next);
    }
    mapping.len()
}
