/* ************************************************************************ **
** This file is part of portmat, and is licensed under EITHER the MIT       **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Row-oriented triangular solves.

use crate::error::{MatrixError, Result};
use crate::matrix::{dot, Matrix};

fn check_system(operation: &'static str, a: &Matrix, b: &Matrix) -> Result<()> {
    a.check_square()?;
    b.check_vector()?;
    let n = a.num_rows();
    if b.num_rows() != n {
        return Err(MatrixError::mismatch(operation, (n, 1), b.dims()));
    }
    Ok(())
}

/// Solve `U·x = b` for upper triangular `U`.
///
/// Entries below the diagonal of `U` are ignored.
pub fn back_substitution(u: &Matrix, b: &Matrix) -> Result<Matrix> {
    let mut x = Matrix::zeros(u.num_rows(), 1);
    back_substitution_into(u, b, &mut x)?;
    Ok(x)
}

pub fn back_substitution_into(u: &Matrix, b: &Matrix, x: &mut Matrix) -> Result<()> {
    check_system("back_substitution", u, b)?;
    let n = u.num_rows();
    x.check_dims("back_substitution", (n, 1))?;

    let x = x.row_major_data_mut();
    for i in (0..n).rev() {
        let diag = u[(i, i)];
        if diag == 0.0 {
            return Err(MatrixError::Singular { index: i });
        }
        let row = u.row_slice(i);
        x[i] = (b[(i, 0)] - dot(&row[i + 1..], &x[i + 1..])) / diag;
    }
    Ok(())
}

/// Solve `L·x = b` for lower triangular `L`.
///
/// Entries above the diagonal of `L` are ignored.
pub fn forward_substitution(l: &Matrix, b: &Matrix) -> Result<Matrix> {
    let mut x = Matrix::zeros(l.num_rows(), 1);
    forward_substitution_into(l, b, &mut x)?;
    Ok(x)
}

pub fn forward_substitution_into(l: &Matrix, b: &Matrix, x: &mut Matrix) -> Result<()> {
    check_system("forward_substitution", l, b)?;
    let n = l.num_rows();
    x.check_dims("forward_substitution", (n, 1))?;

    let x = x.row_major_data_mut();
    for i in 0..n {
        let diag = l[(i, i)];
        if diag == 0.0 {
            return Err(MatrixError::Singular { index: i });
        }
        let row = l.row_slice(i);
        x[i] = (b[(i, 0)] - dot(&row[..i], &x[..i])) / diag;
    }
    Ok(())
}
