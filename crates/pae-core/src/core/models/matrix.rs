use nalgebra::DMatrix;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum MatrixError {
    #[error("Matrix is empty")]
    Empty,
    #[error("Matrix must be square: row {row} has {columns} columns, expected {expected}")]
    NotSquare {
        row: usize,
        columns: usize,
        expected: usize,
    },
    #[error("Expected {expected} values for a {size}x{size} matrix, found {found}")]
    WrongLength {
        size: usize,
        expected: usize,
        found: usize,
    },
    #[error("A {size}x{size} matrix is too large to address")]
    TooLarge { size: usize },
    #[error("Invalid error value {value} at ({row}, {column}): must be finite and non-negative")]
    InvalidValue { row: usize, column: usize, value: f64 },
    #[error("Residue window {start}..={end} lies outside a {size}x{size} matrix")]
    WindowOutOfBounds {
        start: usize,
        end: usize,
        size: usize,
    },
}

/// A square matrix of predicted aligned errors between residue pairs.
///
/// Row and column `i` both refer to the `i`-th residue of the selected window.
/// Lower values mean higher confidence in the relative placement of the pair.
/// The diagonal carries no meaning for the decomposition.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorMatrix {
    values: DMatrix<f64>,
}

impl ErrorMatrix {
    /// Builds a matrix from nested rows, rejecting ragged, empty or non-square input.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self, MatrixError> {
        let size = rows.len();
        if size == 0 {
            return Err(MatrixError::Empty);
        }
        for (row_idx, row) in rows.iter().enumerate() {
            if row.len() != size {
                return Err(MatrixError::NotSquare {
                    row: row_idx,
                    columns: row.len(),
                    expected: size,
                });
            }
        }
        let values = DMatrix::from_fn(size, size, |i, j| rows[i][j]);
        Self::validated(values)
    }

    /// Builds a `size`x`size` matrix from values laid out row by row.
    pub fn from_row_major(size: usize, values: &[f64]) -> Result<Self, MatrixError> {
        if size == 0 {
            return Err(MatrixError::Empty);
        }
        let expected = size
            .checked_mul(size)
            .ok_or(MatrixError::TooLarge { size })?;
        if values.len() != expected {
            return Err(MatrixError::WrongLength {
                size,
                expected,
                found: values.len(),
            });
        }
        Self::validated(DMatrix::from_row_slice(size, size, values))
    }

    fn validated(values: DMatrix<f64>) -> Result<Self, MatrixError> {
        for i in 0..values.nrows() {
            for j in 0..values.ncols() {
                let value = values[(i, j)];
                if !value.is_finite() || value < 0.0 {
                    return Err(MatrixError::InvalidValue {
                        row: i,
                        column: j,
                        value,
                    });
                }
            }
        }
        Ok(Self { values })
    }

    pub fn size(&self) -> usize {
        self.values.nrows()
    }

    #[inline]
    pub fn get(&self, row: usize, column: usize) -> f64 {
        self.values[(row, column)]
    }

    pub fn as_matrix(&self) -> &DMatrix<f64> {
        &self.values
    }

    /// Crops the matrix to the inclusive index window `start..=end` on both axes.
    ///
    /// The returned matrix is re-indexed so that `start` becomes index 0.
    pub fn window(&self, start: usize, end: usize) -> Result<Self, MatrixError> {
        let size = self.size();
        if start > end || end >= size {
            return Err(MatrixError::WindowOutOfBounds { start, end, size });
        }
        let len = end - start + 1;
        Ok(Self {
            values: self.values.view((start, start), (len, len)).into_owned(),
        })
    }
}
