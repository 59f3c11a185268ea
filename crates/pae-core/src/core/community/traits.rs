use crate::core::graph::error_graph::ErrorGraph;

/// A graph-clustering primitive.
///
/// Implementors return one community id per vertex. Every vertex is assigned,
/// including isolated ones. Ids are opaque: two runs may number the same
/// partition differently.
pub trait CommunityDetection {
    /// Partitions the vertices of `graph` at the given native `resolution`.
    fn detect(&self, graph: &ErrorGraph, resolution: f64) -> Vec<usize>;
}
