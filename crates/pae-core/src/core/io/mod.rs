//! Input/output for the files the decomposition pipeline consumes and produces.
//!
//! Readers implement the [`traits::InputFile`] interface: PAE matrices in JSON
//! ([`pae`]) and CHARMM coordinate files ([`crd`]). Writers produce the cluster
//! export table ([`clusters`]) and the CHARMM constraint script ([`constraints`]).

pub mod clusters;
pub mod constraints;
pub mod crd;
pub mod pae;
pub mod traits;
