//! Matrix data types.

use serde::{Deserialize, Serialize};

/// Row-major grid of integers.
///
/// Serializes as a bare JSON array of arrays. Rows are not required to have
/// equal length here; rectangularity is checked by
/// [`validate_rectangular`](super::validate_rectangular).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Matrix(Vec<Vec<i64>>);

impl Matrix {
    /// Create a matrix from its rows.
    pub fn new(rows: Vec<Vec<i64>>) -> Self {
        Self(rows)
    }

    /// Borrow the rows.
    pub fn rows(&self) -> &[Vec<i64>] {
        &self.0
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.0.len()
    }

    /// Check if the matrix has no rows.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consume the matrix, returning its rows.
    pub fn into_rows(self) -> Vec<Vec<i64>> {
        self.0
    }
}

impl From<Vec<Vec<i64>>> for Matrix {
    fn from(rows: Vec<Vec<i64>>) -> Self {
        Self(rows)
    }
}

/// Validated shape of a rectangular matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Dimensions {
    /// Number of rows (M).
    pub rows: usize,
    /// Number of columns (N).
    pub cols: usize,
}

impl Dimensions {
    /// Shape after a quarter turn.
    pub fn transposed(self) -> Self {
        Self {
            rows: self.cols,
            cols: self.rows,
        }
    }
}
