/* ************************************************************************ **
** This file is part of portmat, and is licensed under EITHER the MIT       **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Cholesky factorizations of symmetric matrices.

use crate::error::{MatrixError, Result};
use crate::matrix::Matrix;
use crate::perm::{Axis, Permutation};
use crate::settings::{CholeskySettings, Pivoting};

#[derive(Debug, Clone, PartialEq)]
pub enum Cholesky {
    /// `A = G·Gᵗ`, with `G` lower triangular.
    Plain { g: Matrix },
    /// `Pᵗ·A·P = L·Diag(D)·Lᵗ`, with `L` unit lower triangular and
    /// `D` a non-increasing, non-negative column vector.
    Pivoted { l: Matrix, d: Matrix, p: Permutation },
}

impl Cholesky {
    pub fn pivoting(&self) -> Pivoting {
        match self {
            Cholesky::Plain { .. } => Pivoting::None,
            Cholesky::Pivoted { .. } => Pivoting::Complete,
        }
    }

    /// Empty output buffers of the right shape for an `n x n` input.
    pub fn buffers(n: usize, pivoting: Pivoting) -> Cholesky {
        match pivoting {
            Pivoting::None => Cholesky::Plain { g: Matrix::zeros(n, n) },
            Pivoting::Complete => Cholesky::Pivoted {
                l: Matrix::zeros(n, n),
                d: Matrix::zeros(n, 1),
                p: Permutation::eye(n, Axis::Columns),
            },
        }
    }
}

pub fn cholesky_decomposition(a: &Matrix, settings: &CholeskySettings) -> Result<Cholesky> {
    let mut out = Cholesky::buffers(a.num_rows(), settings.pivoting);
    cholesky_decomposition_into(a, settings, &mut out)?;
    Ok(out)
}

/// Factorize into buffers previously made by [`Cholesky::buffers`].
///
/// The variant of `out` must agree with `settings.pivoting`.
pub fn cholesky_decomposition_into(a: &Matrix, settings: &CholeskySettings, out: &mut Cholesky) -> Result<()> {
    a.check_square()?;
    if !a.is_symmetric(settings.eps_symmetric) {
        return Err(MatrixError::NotSymmetric { eps: settings.eps_symmetric });
    }
    if out.pivoting() != settings.pivoting {
        return Err(MatrixError::invalid_argument("output buffers do not match the pivoting mode"));
    }

    let n = a.num_rows();
    match out {
        Cholesky::Plain { g } => {
            g.check_dims("cholesky_decomposition", (n, n))?;
            plain(a, g)
        },
        Cholesky::Pivoted { l, d, p } => {
            l.check_dims("cholesky_decomposition", (n, n))?;
            d.check_dims("cholesky_decomposition", (n, 1))?;
            *p = pivoted(a, settings.eps_sdp_for(n), l, d)?;
            Ok(())
        },
    }
}

// Column-oriented outer product elimination on the lower triangle.
fn plain(a: &Matrix, g: &mut Matrix) -> Result<()> {
    let n = a.num_rows();
    g.row_major_data_mut().copy_from_slice(a.row_major_data());

    for k in 0..n {
        let pivot = g[(k, k)];
        if !(pivot > 0.0) {
            return Err(MatrixError::NotPositiveDefinite { index: k });
        }
        let root = pivot.sqrt();
        g[(k, k)] = root;
        for i in k + 1..n {
            g[(i, k)] /= root;
        }
        for j in k + 1..n {
            let gjk = g[(j, k)];
            for i in j..n {
                let gik = g[(i, k)];
                g[(i, j)] -= gik * gjk;
            }
        }
    }

    for i in 0..n {
        for j in i + 1..n {
            g[(i, j)] = 0.0;
        }
    }
    Ok(())
}

// LDLᵗ with symmetric (diagonal) pivoting.
fn pivoted(a: &Matrix, eps_sdp: f64, l: &mut Matrix, d: &mut Matrix) -> Result<Permutation> {
    let n = a.num_rows();
    let mut work = a.clone();
    let mut perm: Vec<usize> = (0..n).collect();
    for x in l.row_major_data_mut() {
        *x = 0.0;
    }
    for x in d.row_major_data_mut() {
        *x = 0.0;
    }

    let mut first = 0.0;
    for k in 0..n {
        let p = (k..n).fold(k, |best, i| if work[(i, i)] > work[(best, best)] { i } else { best });
        if p != k {
            work.swap_rows_mut(k, p)?;
            work.swap_columns_mut(k, p)?;
            // columns k.. of l are still zero in both rows
            l.swap_rows_mut(k, p)?;
            perm.swap(k, p);
        }

        let pivot = work[(k, k)];
        if k == 0 {
            first = pivot;
            if pivot < 0.0 {
                return Err(MatrixError::NotPositiveSemiDefinite { index: 0 });
            }
        }
        if pivot <= eps_sdp * first {
            let tol = eps_sdp * first.abs();
            if pivot < -tol {
                return Err(MatrixError::NotPositiveSemiDefinite { index: k });
            }
            // the whole trailing block must vanish, not only its largest diagonal entry
            let bad = iproduct!(k..n, k..n).find(|&(i, j)| j <= i && work[(i, j)].abs() > tol);
            if let Some((i, _)) = bad {
                return Err(MatrixError::NotPositiveSemiDefinite { index: i });
            }
            debug!("cholesky: remaining {} pivots treated as zero after {} steps", n - k, k);
            break;
        }

        d[(k, 0)] = pivot;
        for i in k + 1..n {
            l[(i, k)] = work[(i, k)] / pivot;
        }
        for i in k + 1..n {
            let wik = work[(i, k)];
            for j in k + 1..n {
                let wkj = work[(k, j)];
                work[(i, j)] -= wik * wkj / pivot;
            }
        }
    }

    for i in 0..n {
        l[(i, i)] = 1.0;
    }
    Ok(Permutation::from_vec_unchecked(perm, Axis::Columns))
}
