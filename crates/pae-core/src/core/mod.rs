//! # Core Module
//!
//! Fundamental building blocks for PAE-driven rigid-body decomposition.
//!
//! ## Architecture
//!
//! - **Data Models** ([`models`]) - Error matrices, residue tables, rigid domains and bodies
//! - **Error Graph** ([`graph`]) - Weighted residue graph derived from a PAE matrix
//! - **Community Detection** ([`community`]) - Graph clustering primitives (Leiden/CPM)
//! - **File I/O** ([`io`]) - PAE JSON and CRD readers, cluster table and constraint writers

pub mod community;
pub mod graph;
pub mod io;
pub mod models;
