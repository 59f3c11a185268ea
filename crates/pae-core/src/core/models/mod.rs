//! Data models shared by every stage of the decomposition pipeline.

pub mod domain;
pub mod matrix;
pub mod residue;
