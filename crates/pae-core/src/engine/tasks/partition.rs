use crate::core::community::CommunityDetection;
use crate::core::graph::error_graph::ErrorGraph;
use crate::engine::config::ClusteringConfig;
use crate::engine::progress::{Progress, ProgressReporter};
use std::collections::HashMap;
use tracing::{debug, info, instrument};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    /// Every community, largest first, members ascending.
    pub clusters: Vec<Vec<usize>>,
    min_cluster_size: usize,
}

impl Partition {
    /// A prefix of `clusters`, since those are sorted by size.
    pub fn retained(&self) -> &[Vec<usize>] {
        let kept = self
            .clusters
            .iter()
            .take_while(|c| c.len() >= self.min_cluster_size)
            .count();
        &self.clusters[..kept]
    }
}

#[instrument(skip_all, name = "partition_task")]
pub fn run(
    graph: &ErrorGraph,
    detector: &impl CommunityDetection,
    config: &ClusteringConfig,
    reporter: &ProgressReporter,
) -> Partition {
    let resolution = config.native_resolution();
    info!(
        vertices = graph.vertex_count(),
        edges = graph.edge_count(),
        resolution,
        "Partitioning residue graph."
    );

    let assignment = detector.detect(graph, resolution);
    let clusters = group_by_community(&assignment);

    let partition = Partition {
        clusters,
        min_cluster_size: config.min_cluster_size,
    };
    debug!(
        clusters = partition.clusters.len(),
        retained = partition.retained().len(),
        "Partitioning finished."
    );
    reporter.report(Progress::Message(format!(
        "{} clusters, {} with at least {} residues",
        partition.clusters.len(),
        partition.retained().len(),
        config.min_cluster_size
    )));
    partition
}

/// Largest cluster first; ties keep first-appearance order.
pub fn group_by_community(assignment: &[usize]) -> Vec<Vec<usize>> {
    let mut slot_of: HashMap<usize, usize> = HashMap::new();
    let mut clusters: Vec<Vec<usize>> = Vec::new();
    for (vertex, &community) in assignment.iter().enumerate() {
        let slot = *slot_of.entry(community).or_insert_with(|| {
            clusters.push(Vec::new());
            clusters.len() - 1
        });
        clusters[slot].push(vertex);
    }
    // Stable sort keeps first-appearance order among ties.
    clusters.sort_by(|a, b| b.len().cmp(&a.len()));
    clusters
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::community::Leiden;
    use crate::core::graph::error_graph::EdgeWeighting;
    use crate::core::models::matrix::ErrorMatrix;

    struct FixedAssignment(Vec<usize>);

    impl CommunityDetection for FixedAssignment {
        fn detect(&self, _graph: &ErrorGraph, _resolution: f64) -> Vec<usize> {
            self.0.clone()
        }
    }

    struct ResolutionRecorder(std::sync::Mutex<f64>);

    impl CommunityDetection for ResolutionRecorder {
        fn detect(&self, graph: &ErrorGraph, resolution: f64) -> Vec<usize> {
            *self.0.lock().unwrap() = resolution;
            vec![0; graph.vertex_count()]
        }
    }

    fn graph(n: usize) -> ErrorGraph {
        let rows = vec![vec![1.0; n]; n];
        ErrorGraph::from_matrix(
            &ErrorMatrix::from_rows(&rows).unwrap(),
            &EdgeWeighting {
                power: 1.0,
                cutoff: 10.0,
                epsilon: 1e-6,
            },
        )
    }

    fn clustering(min_cluster_size: usize) -> ClusteringConfig {
        ClusteringConfig {
            resolution: 1.0,
            min_cluster_size,
        }
    }

    #[test]
    fn groups_sort_by_size_then_first_appearance() {
        let clusters = group_by_community(&[7, 3, 3, 9, 7, 9, 3]);
        assert_eq!(clusters, vec![vec![1, 2, 6], vec![0, 4], vec![3, 5]]);
    }

    #[test]
    fn empty_assignment_has_no_clusters() {
        assert!(group_by_community(&[]).is_empty());
    }

    #[test]
    fn retained_drops_clusters_below_minimum_size() {
        let detector = FixedAssignment(vec![0, 0, 0, 1, 1, 2, 0, 1]);
        let partition = run(&graph(8), &detector, &clustering(3), &ProgressReporter::new());
        assert_eq!(partition.clusters.len(), 3);
        assert_eq!(partition.retained(), &[vec![0, 1, 2, 6], vec![3, 4, 7]]);
    }

    #[test]
    fn nothing_retained_when_all_clusters_are_small() {
        let detector = FixedAssignment(vec![0, 1, 2]);
        let partition = run(&graph(3), &detector, &clustering(5), &ProgressReporter::new());
        assert!(partition.retained().is_empty());
    }

    #[test]
    fn detector_receives_scaled_resolution() {
        let recorder = ResolutionRecorder(std::sync::Mutex::new(0.0));
        let config = ClusteringConfig {
            resolution: 2.5,
            min_cluster_size: 1,
        };
        run(&graph(2), &recorder, &config, &ProgressReporter::new());
        assert!((*recorder.0.lock().unwrap() - 0.025).abs() < 1e-12);
    }

    #[test]
    fn leiden_partition_covers_every_vertex() {
        let partition = run(&graph(6), &Leiden::new(), &clustering(1), &ProgressReporter::new());
        let mut members: Vec<usize> = partition.clusters.concat();
        members.sort_unstable();
        assert_eq!(members, (0..6).collect::<Vec<_>>());
    }
}
