//! Weighted residue graphs derived from predicted aligned error matrices.
//!
//! Residues become vertices; every sufficiently confident residue pair becomes an
//! edge whose weight grows as the predicted error shrinks. The graph is the input
//! of the community-detection step in [`crate::core::community`].

pub mod error_graph;
