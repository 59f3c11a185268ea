//! # Workflows Module
//!
//! High-level entry points that run the complete decomposition pipeline.
//!
//! - **Decomposition Workflow** ([`decompose`]) - From a PAE matrix and a
//!   coordinate table to clusters, rigid bodies and a constraint document. Each
//!   phase is reported through the
//!   [`ProgressReporter`](crate::engine::progress::ProgressReporter) and logged
//!   with `tracing`.

pub mod decompose;
