use super::config::ConfigError;
use crate::core::io::crd::CrdError;
use crate::core::io::pae::PaeError;
use crate::core::models::matrix::MatrixError;
use crate::core::models::residue::ResidueLookupError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("Cannot read input '{path}': {source}", path = path.display())]
    MissingInput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl From<MatrixError> for EngineError {
    fn from(e: MatrixError) -> Self {
        EngineError::InvalidFormat(e.to_string())
    }
}

impl From<ResidueLookupError> for EngineError {
    fn from(e: ResidueLookupError) -> Self {
        EngineError::InvalidFormat(e.to_string())
    }
}

impl From<PaeError> for EngineError {
    fn from(e: PaeError) -> Self {
        match e {
            PaeError::Io(source) => EngineError::Io(source),
            other => EngineError::InvalidFormat(format!("PAE file: {}", other)),
        }
    }
}

impl From<CrdError> for EngineError {
    fn from(e: CrdError) -> Self {
        match e {
            CrdError::Io(source) => EngineError::Io(source),
            other => EngineError::InvalidFormat(format!("CRD file: {}", other)),
        }
    }
}
