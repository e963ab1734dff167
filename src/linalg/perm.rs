/* ************************************************************************ **
** This file is part of portmat, and is licensed under EITHER the MIT       **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use crate::error::{MatrixError, Result};
use crate::matrix::Matrix;

use ::serde::{Deserialize, Serialize};

/// Which of a matrix's axes a permutation reorders.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Axis {
    /// The matrix form `P` has `P[i, perm[i]] = 1`, so `P·X` has row `i` equal to row `perm[i]` of `X`.
    Rows,
    /// The matrix form `Q` has `Q[perm[j], j] = 1`, so `X·Q` has column `j` equal to column `perm[j]` of `X`.
    Columns,
}

/// Requested representation of a permutation.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PermutationForm {
    /// A full `n x n` permutation matrix.
    Matrix,
    /// An `n x 1` column of (0-based) indices.
    Vector,
}

/// A validated reordering of `0..n`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Permutation {
    // invariant: contains every element of 0..indices.len() exactly once
    indices: Vec<usize>,
    axis: Axis,
}

impl Permutation {
    pub fn eye(n: usize, axis: Axis) -> Permutation
    { Permutation { indices: (0..n).collect(), axis } }

    /// This performs O(n log n) validation on the data.
    pub fn from_vec(indices: Vec<usize>, axis: Axis) -> Result<Permutation>
    {
        if !Self::validate_data(&indices) {
            return Err(MatrixError::invalid_argument(format!("not a permutation: {:?}", indices)));
        }
        Ok(Permutation { indices, axis })
    }

    // Crate-internal constructor for data built by swapping an identity.
    pub(crate) fn from_vec_unchecked(indices: Vec<usize>, axis: Axis) -> Permutation
    {
        debug_assert!(Self::validate_data(&indices));
        Permutation { indices, axis }
    }

    #[must_use = "doesn't assert"]
    fn validate_data(xs: &[usize]) -> bool
    {
        let mut vec = xs.to_vec();
        vec.sort_unstable();
        vec.into_iter().eq(0..xs.len())
    }

    pub fn len(&self) -> usize { self.indices.len() }
    pub fn is_empty(&self) -> bool { self.indices.is_empty() }
    pub fn axis(&self) -> Axis { self.axis }
    pub fn indices(&self) -> &[usize] { &self.indices }
    pub fn into_vec(self) -> Vec<usize> { self.indices }

    /// The permutation whose matrix form is the transpose of this one's.
    #[must_use = "not an in-place operation"]
    pub fn inverted(&self) -> Permutation
    {
        let mut inv = vec![::std::usize::MAX; self.indices.len()];
        for (i, &x) in self.indices.iter().enumerate() {
            inv[x] = i;
        }
        Permutation::from_vec_unchecked(inv, self.axis)
    }

    /// Parity of the permutation: `1.0` if even, `-1.0` if odd.
    ///
    /// This is also the determinant of the matrix form.
    pub fn sign(&self) -> f64
    {
        let mut seen = vec![false; self.len()];
        let mut transpositions = 0;
        for start in 0..self.len() {
            if seen[start] {
                continue;
            }
            let mut cycle_len = 0;
            let mut i = start;
            while !seen[i] {
                seen[i] = true;
                i = self.indices[i];
                cycle_len += 1;
            }
            transpositions += cycle_len - 1;
        }
        if transpositions % 2 == 0 { 1.0 } else { -1.0 }
    }

    pub fn to_form(&self, form: PermutationForm) -> Matrix
    {
        match form {
            PermutationForm::Matrix => self.to_matrix(),
            PermutationForm::Vector => self.to_vector(),
        }
    }

    pub fn to_matrix(&self) -> Matrix
    {
        let n = self.len();
        let mut out = Matrix::zeros(n, n);
        for (i, &x) in self.indices.iter().enumerate() {
            match self.axis {
                Axis::Rows => out[(i, x)] = 1.0,
                Axis::Columns => out[(x, i)] = 1.0,
            }
        }
        out
    }

    pub fn to_vector(&self) -> Matrix
    {
        let n = self.len();
        Matrix::fill(n, 1, |i, _| self.indices[i] as f64)
    }

    /// Reorder the rows (or columns) of `x` without forming the matrix.
    ///
    /// Equivalent to `P·x` for a row permutation and `x·Q` for a column permutation.
    pub fn apply_to(&self, x: &Matrix) -> Result<Matrix>
    {
        let (rows, cols) = x.dims();
        match self.axis {
            Axis::Rows => {
                if rows != self.len() {
                    return Err(MatrixError::mismatch("permute rows", (self.len(), cols), x.dims()));
                }
                Ok(Matrix::fill(rows, cols, |i, j| x[(self.indices[i], j)]))
            },
            Axis::Columns => {
                if cols != self.len() {
                    return Err(MatrixError::mismatch("permute columns", (rows, self.len()), x.dims()));
                }
                Ok(Matrix::fill(rows, cols, |i, j| x[(i, self.indices[j])]))
            },
        }
    }
}
