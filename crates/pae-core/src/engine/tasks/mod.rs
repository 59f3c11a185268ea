//! Stages of the rigid-domain decomposition.
//!
//! Each submodule implements one step between the residue graph and the final
//! list of rigid bodies: partitioning the graph into clusters, cutting clusters
//! into contiguous regions, classifying regions by model confidence, and
//! widening gaps between neighbouring domains.

pub mod classification;
pub mod gap_resolution;
pub mod partition;
pub mod segmentation;
