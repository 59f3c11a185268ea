use crate::core::models::matrix::ErrorMatrix;
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use tracing::debug;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Parameters turning a predicted error into an edge weight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeWeighting {
    /// Edges are weighted as `1 / (error + epsilon)^power`.
    pub power: f64,
    /// Only pairs with `error < cutoff` become edges.
    pub cutoff: f64,
    pub epsilon: f64,
}

impl EdgeWeighting {
    #[inline]
    pub fn weight(&self, error: f64) -> f64 {
        1.0 / (error + self.epsilon).powf(self.power)
    }

    #[inline]
    pub fn admits(&self, error: f64) -> bool {
        error < self.cutoff
    }
}

/// An undirected graph over the residues of an [`ErrorMatrix`].
///
/// Every ordered pair `(i, j)` with `i != j` whose error is below the cutoff
/// contributes one edge, so a symmetric matrix produces two parallel edges per
/// residue pair. Self pairs never produce edges.
#[derive(Debug, Clone)]
pub struct ErrorGraph {
    graph: UnGraph<(), f64>,
}

impl ErrorGraph {
    pub fn from_matrix(matrix: &ErrorMatrix, weighting: &EdgeWeighting) -> Self {
        let n = matrix.size();

        #[cfg(not(feature = "parallel"))]
        let iterator = 0..n;

        #[cfg(feature = "parallel")]
        let iterator = (0..n).into_par_iter();

        let rows: Vec<Vec<(usize, f64)>> = iterator
            .map(|i| {
                (0..n)
                    .filter(|&j| j != i)
                    .filter_map(|j| {
                        let error = matrix.get(i, j);
                        weighting
                            .admits(error)
                            .then(|| (j, weighting.weight(error)))
                    })
                    .collect()
            })
            .collect();

        let edge_total: usize = rows.iter().map(Vec::len).sum();
        let mut graph = UnGraph::with_capacity(n, edge_total);
        for _ in 0..n {
            graph.add_node(());
        }
        for (i, row) in rows.into_iter().enumerate() {
            for (j, weight) in row {
                graph.add_edge(NodeIndex::new(i), NodeIndex::new(j), weight);
            }
        }

        debug!(
            vertices = n,
            edges = edge_total,
            cutoff = weighting.cutoff,
            power = weighting.power,
            "Built error graph."
        );
        Self { graph }
    }

    pub fn vertex_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Edges as `(source, target, weight)` in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        self.graph
            .edge_references()
            .map(|e| (e.source().index(), e.target().index(), *e.weight()))
    }

    pub fn has_incident_edge(&self, vertex: usize) -> bool {
        self.graph
            .neighbors(NodeIndex::new(vertex))
            .next()
            .is_some()
    }

    pub fn as_petgraph(&self) -> &UnGraph<(), f64> {
        &self.graph
    }
}
