//! Community detection on weighted residue graphs.
//!
//! Given an [`ErrorGraph`](crate::core::graph::error_graph::ErrorGraph), find groups
//! of residues whose mutual predicted errors are low, i.e. residues that move
//! together as a rigid unit.
//!
//! ## The Constant Potts Model
//!
//! The shipped algorithm optimizes the Constant Potts Model (CPM) quality
//!
//! ```text
//! H = Σ_c [ e_c − γ · n_c² / 2 ]
//! ```
//!
//! where `e_c` is the total edge weight inside community `c`, `n_c` its vertex
//! count and `γ` the resolution. Unlike modularity, CPM has no resolution limit:
//! `γ` acts as a density threshold that a community's internal edges must beat.
//! Higher values give smaller communities.
//!
//! ## Algorithms
//!
//! - [`Leiden`] (Traag, Waltman & van Eck 2019): local moving, refinement into
//!   well-connected sub-communities, aggregation, repeated until stable.
//!
//! Any other algorithm can be plugged in through the [`CommunityDetection`] trait;
//! callers only rely on the partition structure, never on community ids.

mod leiden;
mod traits;

pub use leiden::Leiden;
pub use traits::CommunityDetection;
