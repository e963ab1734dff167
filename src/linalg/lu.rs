/* ************************************************************************ **
** This file is part of portmat, and is licensed under EITHER the MIT       **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! LU decomposition with complete pivoting.

use crate::error::Result;
use crate::matrix::Matrix;
use crate::perm::{Axis, Permutation};

/// `P·A·Q = L·U`.
///
/// `l` is unit lower triangular with entries bounded by 1 in magnitude,
/// `u` is upper triangular, `p` reorders rows and `q` reorders columns.
#[derive(Debug, Clone, PartialEq)]
pub struct Lu {
    pub l: Matrix,
    pub u: Matrix,
    pub p: Permutation,
    pub q: Permutation,
}

impl Lu {
    /// Whether a zero pivot ended up on the diagonal of `U`.
    pub fn is_singular(&self) -> bool {
        (0..self.u.num_rows()).any(|i| self.u[(i, i)] == 0.0)
    }

    /// `det(A)`, from the diagonal of `U` and the parities of both permutations.
    pub fn determinant(&self) -> f64 {
        let diag: f64 = (0..self.u.num_rows()).map(|i| self.u[(i, i)]).product();
        self.p.sign() * self.q.sign() * diag
    }
}

pub fn lu_decomposition(a: &Matrix) -> Result<Lu> {
    a.check_square()?;
    let n = a.num_rows();
    let mut l = Matrix::zeros(n, n);
    let mut u = a.clone();
    let (p, q) = eliminate(&mut l, &mut u)?;
    Ok(Lu { l, u, p, q })
}

/// Writes `L` and `U` into the given buffers and returns `(p, q)`.
pub fn lu_decomposition_into(a: &Matrix, l_out: &mut Matrix, u_out: &mut Matrix) -> Result<(Permutation, Permutation)> {
    a.check_square()?;
    l_out.check_dims("lu_decomposition", a.dims())?;
    u_out.check_dims("lu_decomposition", a.dims())?;

    u_out.row_major_data_mut().copy_from_slice(a.row_major_data());
    for x in l_out.row_major_data_mut() {
        *x = 0.0;
    }
    eliminate(l_out, u_out)
}

/// `det(A)` of a square matrix.
pub fn determinant(a: &Matrix) -> Result<f64> {
    Ok(lu_decomposition(a)?.determinant())
}

// Gaussian elimination on `u` in place; `l` must start zeroed.
fn eliminate(l: &mut Matrix, u: &mut Matrix) -> Result<(Permutation, Permutation)> {
    let n = u.num_rows();
    let mut p: Vec<usize> = (0..n).collect();
    let mut q: Vec<usize> = (0..n).collect();

    for k in 0..n.saturating_sub(1) {
        let (pi, pj) = find_pivot(u, k);

        u.swap_rows_mut(k, pi)?;
        l.swap_rows_mut(k, pi)?;
        p.swap(k, pi);
        u.swap_columns_mut(k, pj)?;
        q.swap(k, pj);

        let pivot = u[(k, k)];
        if pivot == 0.0 {
            // the trailing block is entirely zero
            trace!("lu: zero pivot at step {}", k);
            continue;
        }

        for i in k + 1..n {
            let factor = u[(i, k)] / pivot;
            l[(i, k)] = factor;
            u[(i, k)] = 0.0;
            for j in k + 1..n {
                let ukj = u[(k, j)];
                u[(i, j)] -= factor * ukj;
            }
        }
    }
    for i in 0..n {
        l[(i, i)] = 1.0;
    }

    Ok((Permutation::from_vec_unchecked(p, Axis::Rows), Permutation::from_vec_unchecked(q, Axis::Columns)))
}

// Largest absolute entry of the trailing block starting at (k, k).
fn find_pivot(u: &Matrix, k: usize) -> (usize, usize) {
    let n = u.num_rows();
    let mut best = (k, k);
    let mut best_abs = -1.0;
    for (i, j) in iproduct!(k..n, k..n) {
        let x = u[(i, j)].abs();
        if x > best_abs {
            best_abs = x;
            best = (i, j);
        }
    }
    best
}
