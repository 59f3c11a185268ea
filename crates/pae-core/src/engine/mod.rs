//! # Engine Module
//!
//! Configuration, error types, progress reporting and the individual stages that
//! turn a predicted aligned error matrix into rigid bodies.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Graph weighting, clustering resolution,
//!   confidence threshold and gap parameters, validated by a builder
//! - **Error Handling** ([`error`]) - Engine-wide error type
//! - **Progress Monitoring** ([`progress`]) - Callback-based progress events for
//!   front ends
//! - **Tasks** ([`tasks`]) - Partitioning, segmentation, classification and gap
//!   resolution
//!
//! The stages are wired together by [`crate::workflows::decompose`].

pub mod config;
pub mod error;
pub mod progress;
pub mod tasks;
