/* ************************************************************************ **
** This file is part of portmat, and is licensed under EITHER the MIT       **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use ::std::fmt;

pub type Result<T> = ::std::result::Result<T, MatrixError>;

/// Row and column counts, printed as `RxC`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Dims(pub usize, pub usize);

impl fmt::Display for Dims {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.0, self.1)
    }
}

/// Every failure the kernel can report.
///
/// Errors are raised at the point of detection; no partially computed
/// result ever accompanies them.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MatrixError {
    #[error("matrix must have at least one row and one column")]
    Empty,

    #[error("ragged input: row {row} has {got} columns, expected {expected}")]
    RaggedRows { row: usize, expected: usize, got: usize },

    #[error("data length mismatch: expected {expected}, got {got}")]
    InvalidData { expected: usize, got: usize },

    #[error("matrix is not square: {rows}x{cols}")]
    NotSquare { rows: usize, cols: usize },

    #[error("matrix is not a vector: {rows}x{cols}")]
    NotVector { rows: usize, cols: usize },

    #[error("incompatible dimensions in {operation}: expected {expected}, got {got}")]
    DimensionMismatch { operation: &'static str, expected: Dims, got: Dims },

    #[error("index ({row}, {col}) out of bounds for a {dims} matrix")]
    IndexOutOfBounds { row: usize, col: usize, dims: Dims },

    #[error("matrix is not symmetric (eps = {eps:e})")]
    NotSymmetric { eps: f64 },

    #[error("matrix is not definite positive (pivot {index})")]
    NotPositiveDefinite { index: usize },

    #[error("matrix is not semi-definite positive (pivot {index})")]
    NotPositiveSemiDefinite { index: usize },

    #[error("matrix is not unit diagonal (eps = {eps:e})")]
    NotUnitDiagonal { eps: f64 },

    #[error("matrix diagonal is not strictly positive")]
    NotPositiveDiagonal,

    #[error("matrix is not invertible (zero pivot at {index})")]
    Singular { index: usize },

    #[error("maximum number of iterations reached: {max_iter} ({algorithm})")]
    MaxIterations { algorithm: &'static str, max_iter: u32 },

    #[error("unsupported {option}: {value:?}")]
    UnsupportedOption { option: &'static str, value: String },

    #[error("invalid argument: {reason}")]
    InvalidArgument { reason: String },
}

/// Coarse classification of a [`MatrixError`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Shape,
    AlgebraicProperty,
    Singular,
    Convergence,
    UnsupportedOption,
    InvalidArgument,
}

impl MatrixError {
    pub fn kind(&self) -> ErrorKind {
        use self::MatrixError::*;

        match self {
            Empty | RaggedRows { .. } | InvalidData { .. } | NotSquare { .. } |
            NotVector { .. } | DimensionMismatch { .. } | IndexOutOfBounds { .. } => ErrorKind::Shape,

            NotSymmetric { .. } | NotPositiveDefinite { .. } | NotPositiveSemiDefinite { .. } |
            NotUnitDiagonal { .. } | NotPositiveDiagonal => ErrorKind::AlgebraicProperty,

            Singular { .. } => ErrorKind::Singular,
            MaxIterations { .. } => ErrorKind::Convergence,
            UnsupportedOption { .. } => ErrorKind::UnsupportedOption,
            InvalidArgument { .. } => ErrorKind::InvalidArgument,
        }
    }

    pub fn mismatch(operation: &'static str, expected: (usize, usize), got: (usize, usize)) -> Self {
        MatrixError::DimensionMismatch {
            operation,
            expected: Dims(expected.0, expected.1),
            got: Dims(got.0, got.1),
        }
    }

    pub fn invalid_argument(reason: impl Into<String>) -> Self {
        MatrixError::InvalidArgument { reason: reason.into() }
    }

    pub fn max_iterations(algorithm: &'static str, max_iter: u32) -> Self {
        MatrixError::MaxIterations { algorithm, max_iter }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_keep_their_wording() {
        let e = MatrixError::NotPositiveDefinite { index: 2 };
        assert!(e.to_string().starts_with("matrix is not definite positive"));

        let e = MatrixError::Singular { index: 0 };
        assert!(e.to_string().starts_with("matrix is not invertible"));

        let e = MatrixError::max_iterations("jacobi eigenvalue", 100);
        assert!(e.to_string().starts_with("maximum number of iterations reached: 100"));
        assert_eq!(e.kind(), ErrorKind::Convergence);

        let e = MatrixError::mismatch("xy", (2, 3), (4, 3));
        assert_eq!(e.to_string(), "incompatible dimensions in xy: expected 2x3, got 4x3");
        assert_eq!(e.kind(), ErrorKind::Shape);
    }
}
