//! # PAEConst Core Library
//!
//! A library for decomposing a predicted biomolecular structure into rigid bodies,
//! driven by the predicted aligned error (PAE) matrix of a structure-prediction model,
//! and for expressing the result as a CHARMM constraint script for rigid-body
//! refinement and docking.
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer architecture with a clear separation of concerns.
//!
//! - **[`core`]: The Foundation.** Stateless data models (`ErrorMatrix`, `ResidueTable`,
//!   `RigidBody`), the weighted error graph, the community-detection primitive, and the
//!   readers and writers for PAE JSON, CRD coordinates, cluster tables and constraint files.
//!
//! - **[`engine`]: The Logic Core.** Configuration, error types, progress reporting and the
//!   individual decomposition tasks: partitioning, region segmentation, confidence
//!   classification and gap resolution.
//!
//! - **[`workflows`]: The Public API.** Ties `engine` and `core` together into the complete
//!   decomposition pipeline, from an error matrix and a residue table to a constraint document.

pub mod core;
pub mod engine;
pub mod workflows;
