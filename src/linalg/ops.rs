/* ************************************************************************ **
** This file is part of portmat, and is licensed under EITHER the MIT       **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Linear combinations and products.
//!
//! Every function comes in two flavors: one that allocates its result, and
//! an `_into` variant that writes into a caller-owned buffer of the right shape.

use crate::error::{MatrixError, Result};
use crate::matrix::{dot, Matrix};

fn check_same_dims(operation: &'static str, x: &Matrix, y: &Matrix) -> Result<()> {
    match x.dims() == y.dims() {
        true => Ok(()),
        false => Err(MatrixError::mismatch(operation, x.dims(), y.dims())),
    }
}

fn zeros_like(dims: (usize, usize)) -> Matrix {
    Matrix::zeros(dims.0, dims.1)
}

// ----------------------------------------------------------------------------

/// `X + Y`
pub fn xpy(x: &Matrix, y: &Matrix) -> Result<Matrix> {
    axpby(1.0, x, 1.0, y)
}

pub fn xpy_into(x: &Matrix, y: &Matrix, out: &mut Matrix) -> Result<()> {
    axpby_into(1.0, x, 1.0, y, out)
}

/// `X - Y`
pub fn xmy(x: &Matrix, y: &Matrix) -> Result<Matrix> {
    axpby(1.0, x, -1.0, y)
}

pub fn xmy_into(x: &Matrix, y: &Matrix, out: &mut Matrix) -> Result<()> {
    axpby_into(1.0, x, -1.0, y, out)
}

/// `a·X + b·Y`
pub fn axpby(a: f64, x: &Matrix, b: f64, y: &Matrix) -> Result<Matrix> {
    let mut out = zeros_like(x.dims());
    axpby_into(a, x, b, y, &mut out)?;
    Ok(out)
}

pub fn axpby_into(a: f64, x: &Matrix, b: f64, y: &Matrix, out: &mut Matrix) -> Result<()> {
    check_same_dims("axpby", x, y)?;
    out.check_dims("axpby", x.dims())?;

    let (xs, ys) = (x.row_major_data(), y.row_major_data());
    for (k, o) in out.row_major_data_mut().iter_mut().enumerate() {
        *o = a * xs[k] + b * ys[k];
    }
    Ok(())
}

/// `a·X`
pub fn ax(a: f64, x: &Matrix) -> Matrix {
    x.elem_map(|v, _, _| a * v)
}

pub fn ax_into(a: f64, x: &Matrix, out: &mut Matrix) -> Result<()> {
    out.check_dims("ax", x.dims())?;
    for (o, &v) in out.row_major_data_mut().iter_mut().zip(x.row_major_data()) {
        *o = a * v;
    }
    Ok(())
}

/// Elementwise product, with broadcasting of vectors.
///
/// * `y` of the same shape as `X`: the Hadamard product.
/// * `y` a `1 x cols` row: `X·Diag(y)`, scaling each column.
/// * `y` a `rows x 1` column: `Diag(y)·X`, scaling each row.
pub fn elementwise_product(x: &Matrix, y: &Matrix) -> Result<Matrix> {
    let mut out = zeros_like(x.dims());
    elementwise_product_into(x, y, &mut out)?;
    Ok(out)
}

pub fn elementwise_product_into(x: &Matrix, y: &Matrix, out: &mut Matrix) -> Result<()> {
    let (rows, cols) = x.dims();
    let factor: Box<dyn Fn(usize, usize) -> f64 + '_> = match y.dims() {
        d if d == (rows, cols) => Box::new(|i, j| y[(i, j)]),
        (1, c) if c == cols => Box::new(|_, j| y[(0, j)]),
        (r, 1) if r == rows => Box::new(|i, _| y[(i, 0)]),
        other => return Err(MatrixError::mismatch("elementwise_product", (rows, cols), other)),
    };
    out.check_dims("elementwise_product", (rows, cols))?;

    for i in 0..rows {
        for j in 0..cols {
            out[(i, j)] = x[(i, j)] * factor(i, j);
        }
    }
    Ok(())
}

// ----------------------------------------------------------------------------

/// `X·Y`
pub fn xy(x: &Matrix, y: &Matrix) -> Result<Matrix> {
    axy(1.0, x, y)
}

pub fn xy_into(x: &Matrix, y: &Matrix, out: &mut Matrix) -> Result<()> {
    axy_into(1.0, x, y, out)
}

/// `a·X·Y`
pub fn axy(a: f64, x: &Matrix, y: &Matrix) -> Result<Matrix> {
    let mut out = zeros_like((x.num_rows(), y.num_cols()));
    axy_into(a, x, y, &mut out)?;
    Ok(out)
}

pub fn axy_into(a: f64, x: &Matrix, y: &Matrix, out: &mut Matrix) -> Result<()> {
    let (m, k) = x.dims();
    let n = y.num_cols();
    if y.num_rows() != k {
        return Err(MatrixError::mismatch("xy", (k, n), y.dims()));
    }
    out.check_dims("xy", (m, n))?;

    // i-k-j order so the inner loop runs along rows of both Y and the output
    for i in 0..m {
        let out_row = out.row_slice_mut(i);
        for o in out_row.iter_mut() {
            *o = 0.0;
        }
        for l in 0..k {
            let s = a * x[(i, l)];
            if s == 0.0 {
                continue;
            }
            for (o, &yv) in out_row.iter_mut().zip(y.row_slice(l)) {
                *o += s * yv;
            }
        }
    }
    Ok(())
}

/// `Xᵗ·Y`
pub fn txy(x: &Matrix, y: &Matrix) -> Result<Matrix> {
    atxy(1.0, x, y)
}

pub fn txy_into(x: &Matrix, y: &Matrix, out: &mut Matrix) -> Result<()> {
    atxy_into(1.0, x, y, out)
}

/// `a·Xᵗ·Y`
pub fn atxy(a: f64, x: &Matrix, y: &Matrix) -> Result<Matrix> {
    let mut out = zeros_like((x.num_cols(), y.num_cols()));
    atxy_into(a, x, y, &mut out)?;
    Ok(out)
}

pub fn atxy_into(a: f64, x: &Matrix, y: &Matrix, out: &mut Matrix) -> Result<()> {
    let (k, m) = x.dims();
    let n = y.num_cols();
    if y.num_rows() != k {
        return Err(MatrixError::mismatch("txy", (k, n), y.dims()));
    }
    out.check_dims("txy", (m, n))?;

    let (xs, ys) = (x.row_major_data(), y.row_major_data());
    for i in 0..m {
        for j in 0..n {
            let mut acc = 0.0;
            for l in 0..k {
                acc += xs[l * m + i] * ys[l * n + j];
            }
            out[(i, j)] = a * acc;
        }
    }
    Ok(())
}

/// `a·X·Yᵗ`
pub fn axty(a: f64, x: &Matrix, y: &Matrix) -> Result<Matrix> {
    let mut out = zeros_like((x.num_rows(), y.num_rows()));
    axty_into(a, x, y, &mut out)?;
    Ok(out)
}

pub fn axty_into(a: f64, x: &Matrix, y: &Matrix, out: &mut Matrix) -> Result<()> {
    let (m, k) = x.dims();
    let n = y.num_rows();
    if y.num_cols() != k {
        return Err(MatrixError::mismatch("xty", (n, k), y.dims()));
    }
    out.check_dims("xty", (m, n))?;

    for i in 0..m {
        for j in 0..n {
            out[(i, j)] = a * dot(x.row_slice(i), y.row_slice(j));
        }
    }
    Ok(())
}
