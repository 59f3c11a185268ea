use crate::core::io::traits::InputFile;
use crate::core::models::matrix::{ErrorMatrix, MatrixError};
use serde::Deserialize;
use std::io::{self, BufRead};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PaeError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Top-level JSON array is empty")]
    EmptyDocument,
    #[error(
        "No PAE matrix found (expected 'pae', 'predicted_aligned_error', or legacy 'residue1' + 'distance')"
    )]
    MissingMatrix,
    #[error("Legacy 'residue1'/'distance' arrays are inconsistent: {0}")]
    LegacyLayout(String),
    #[error("Residue window {first}..={last} does not fit a {size}x{size} PAE matrix")]
    ResidueWindow { first: i64, last: i64, size: usize },
    #[error(transparent)]
    Matrix(#[from] MatrixError),
}

/// PAE files come either as a bare object or wrapped in a one-element array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PaeDocument {
    Object(PaeRecord),
    Wrapped(Vec<PaeRecord>),
}

#[derive(Debug, Default, Deserialize)]
struct PaeRecord {
    pae: Option<Vec<Vec<f64>>>,
    predicted_aligned_error: Option<Vec<Vec<f64>>>,
    residue1: Option<Vec<usize>>,
    distance: Option<Vec<f64>>,
}

impl PaeRecord {
    fn into_matrix(self) -> Result<ErrorMatrix, PaeError> {
        if let Some(rows) = self.pae.or(self.predicted_aligned_error) {
            return Ok(ErrorMatrix::from_rows(&rows)?);
        }
        match (self.residue1, self.distance) {
            (Some(residue1), Some(distance)) => {
                let size = residue1.iter().copied().max().unwrap_or(0);
                if size.checked_mul(size) != Some(distance.len()) {
                    return Err(PaeError::LegacyLayout(format!(
                        "{} distances for {} residues",
                        distance.len(),
                        size
                    )));
                }
                Ok(ErrorMatrix::from_row_major(size, &distance)?)
            }
            _ => Err(PaeError::MissingMatrix),
        }
    }
}

/// Reader for predicted aligned error matrices in JSON.
///
/// Accepted keys, in order of preference: `pae` (AlphaFold 3),
/// `predicted_aligned_error` (AlphaFold 2 / ColabFold), and the legacy pair of
/// `residue1` and `distance` arrays holding the matrix row by row.
pub struct PaeFile;

impl InputFile for PaeFile {
    type Output = ErrorMatrix;
    type Error = PaeError;

    fn read_from(reader: &mut impl BufRead) -> Result<Self::Output, Self::Error> {
        let document: PaeDocument = serde_json::from_reader(reader).map_err(|e| {
            if e.is_io() {
                PaeError::Io(e.into())
            } else {
                PaeError::Json(e)
            }
        })?;
        let record = match document {
            PaeDocument::Object(record) => record,
            PaeDocument::Wrapped(records) => records
                .into_iter()
                .next()
                .ok_or(PaeError::EmptyDocument)?,
        };
        record.into_matrix()
    }
}

/// Crops a full-model PAE matrix to the residues `first..=last` (1-based residue numbers).
///
/// Index 0 of the result corresponds to residue `first`.
pub fn crop_to_residues(matrix: &ErrorMatrix, first: i64, last: i64) -> Result<ErrorMatrix, PaeError> {
    let window_error = || PaeError::ResidueWindow {
        first,
        last,
        size: matrix.size(),
    };
    let start = usize::try_from(first - 1).map_err(|_| window_error())?;
    let end = usize::try_from(last - 1).map_err(|_| window_error())?;
    matrix.window(start, end).map_err(|_| window_error())
}
