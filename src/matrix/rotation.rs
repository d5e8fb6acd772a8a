//! Quarter-turn rotation with rectangularity validation.
//!
//! For an M×N input the clockwise rotation is the N×M matrix where
//!
//! ```text
//! output[j][M - 1 - i] = input[i][j]
//!
//! 1 2 3        4 1
//! 4 5 6   ->   5 2
//!              6 3
//! ```
//!
//! The first input row becomes the last output column and the last input
//! row becomes the first output column, both read top to bottom.

use super::types::{Dimensions, Matrix};
use crate::error::MatrixError;

/// Check that `matrix` has at least one row and that every row has the
/// length of row 0.
///
/// Returns the first offending row on failure.
pub fn validate_rectangular(matrix: &Matrix) -> Result<Dimensions, MatrixError> {
    let rows = matrix.rows();
    let first = rows.first().ok_or(MatrixError::EmptyMatrix)?;
    let expected = first.len();

    if let Some((row, r)) = rows.iter().enumerate().find(|(_, r)| r.len() != expected) {
        return Err(MatrixError::NonRectangularMatrix {
            row,
            len: r.len(),
            expected,
        });
    }

    Ok(Dimensions {
        rows: rows.len(),
        cols: expected,
    })
}

/// Rotate `input` 90 degrees clockwise.
///
/// The input is only borrowed; the result is a freshly allocated N×M matrix.
pub fn rotate_clockwise(input: &Matrix) -> Result<Matrix, MatrixError> {
    let Dimensions { rows: m, cols: n } = validate_rectangular(input)?;

    let mut rotated = vec![vec![0i64; m]; n];
    for (i, row) in input.rows().iter().enumerate() {
        for (j, &value) in row.iter().enumerate() {
            rotated[j][m - 1 - i] = value;
        }
    }

    Ok(Matrix::new(rotated))
}
