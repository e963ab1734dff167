/* ************************************************************************ **
** This file is part of portmat, and is licensed under EITHER the MIT       **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! QR decomposition by Givens rotations.

use crate::error::{MatrixError, Result};
use crate::matrix::Matrix;

/// `A = Q·R` with `Q` orthogonal (`rows x rows`) and `R` upper triangular (`rows x cols`).
#[derive(Debug, Clone, PartialEq)]
pub struct Qr {
    pub q: Matrix,
    pub r: Matrix,
}

impl Qr {
    pub fn into_parts(self) -> (Matrix, Matrix) { (self.q, self.r) }
}

/// A plane rotation `(c, s)` mapping `[a; b]` to `[r; 0]` with `r >= 0`.
///
/// The rotation acts as `x' = c·x - s·y`, `y' = s·x + c·y`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Givens {
    pub c: f64,
    pub s: f64,
    pub r: f64,
}

fn sign(x: f64) -> f64 {
    if x >= 0.0 { 1.0 } else { -1.0 }
}

impl Givens {
    /// Continuous Givens coefficients.
    pub fn new(a: f64, b: f64) -> Givens {
        if b == 0.0 {
            Givens { c: sign(a), s: 0.0, r: a.abs() }
        } else if a == 0.0 {
            Givens { c: 0.0, s: -sign(b), r: b.abs() }
        } else if a.abs() > b.abs() {
            let t = b / a;
            let u = sign(a) * (1.0 + t * t).sqrt();
            let c = 1.0 / u;
            Givens { c, s: -c * t, r: a * u }
        } else {
            let t = a / b;
            let u = sign(b) * (1.0 + t * t).sqrt();
            Givens { c: t / u, s: -1.0 / u, r: b * u }
        }
    }

    /// The rotation with `s / c == t`. `r` is left at zero.
    pub fn from_tangent(t: f64) -> Givens {
        let c = 1.0 / (1.0 + t * t).sqrt();
        Givens { c, s: c * t, r: 0.0 }
    }

    #[inline(always)]
    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        (self.c * x - self.s * y, self.s * x + self.c * y)
    }

    /// Rotate rows `i` and `k`, starting from column `start`.
    pub fn rotate_rows(&self, m: &mut Matrix, i: usize, k: usize, start: usize) {
        for col in start..m.num_cols() {
            let (x, y) = self.apply(m[(i, col)], m[(k, col)]);
            m[(i, col)] = x;
            m[(k, col)] = y;
        }
    }

    /// Rotate columns `j` and `k`.
    pub fn rotate_columns(&self, m: &mut Matrix, j: usize, k: usize) {
        for row in m.rows_mut() {
            let (x, y) = self.apply(row[j], row[k]);
            row[j] = x;
            row[k] = y;
        }
    }
}

fn check_shape(a: &Matrix) -> Result<()> {
    let (rows, cols) = a.dims();
    if rows < cols {
        // at least as many rows as columns
        return Err(MatrixError::mismatch("qr_decomposition", (cols, cols), (rows, cols)));
    }
    Ok(())
}

// Zeroes the subdiagonal of `r` column by column, from the bottom up.
fn triangularize(r: &mut Matrix, mut q: Option<&mut Matrix>) {
    let (rows, cols) = r.dims();
    for j in 0..cols {
        for i in (j + 1..rows).rev() {
            let b = r[(i, j)];
            if b == 0.0 {
                continue;
            }
            let rot = Givens::new(r[(i - 1, j)], b);
            rot.rotate_rows(r, i - 1, i, j + 1);
            r[(i - 1, j)] = rot.r;
            r[(i, j)] = 0.0;

            if let Some(q) = q.as_mut() {
                rot.rotate_columns(q, i - 1, i);
            }
        }
    }
}

pub fn qr_decomposition(a: &Matrix) -> Result<Qr> {
    check_shape(a)?;
    let mut q = Matrix::identity(a.num_rows());
    let mut r = a.clone();
    triangularize(&mut r, Some(&mut q));
    Ok(Qr { q, r })
}

pub fn qr_decomposition_into(a: &Matrix, q_out: &mut Matrix, r_out: &mut Matrix) -> Result<()> {
    check_shape(a)?;
    let rows = a.num_rows();
    q_out.check_dims("qr_decomposition", (rows, rows))?;
    r_out.check_dims("qr_decomposition", a.dims())?;

    r_out.row_major_data_mut().copy_from_slice(a.row_major_data());
    for (k, x) in q_out.row_major_data_mut().iter_mut().enumerate() {
        *x = if k / rows == k % rows { 1.0 } else { 0.0 };
    }
    triangularize(r_out, Some(q_out));
    Ok(())
}

/// Only the `R` factor, skipping the accumulation of `Q`.
pub fn qr_r(a: &Matrix) -> Result<Matrix> {
    check_shape(a)?;
    let mut r = a.clone();
    triangularize(&mut r, None);
    Ok(r)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::{txy, xy};

    fn sample() -> Matrix {
        Matrix::from_rows(&[
            [1.0, 2.0, 0.0],
            [1.0, 1.0, 1.0],
            [2.0, 1.0, 0.0],
        ]).unwrap()
    }

    #[test]
    fn givens_zeroes_second_component() {
        for &(a, b) in &[(3.0, 4.0), (-3.0, 4.0), (4.0, -3.0), (0.0, -2.0), (-5.0, 0.0), (1e-300, 1e300)] {
            let rot = Givens::new(a, b);
            let (x, y) = rot.apply(a, b);
            assert!(rot.r >= 0.0);
            assert_close!(rel=1e-14, x, rot.r);
            assert_close!(abs=1e-14 * rot.r, y, 0.0);
            assert_close!(rel=1e-15, rot.c * rot.c + rot.s * rot.s, 1.0);
        }
    }

    #[test]
    fn known_r_factor() {
        let Qr { q, r } = qr_decomposition(&sample()).unwrap();
        let expected = Matrix::from_rows(&[
            [2.449489742783178, 2.041241452319315, 0.408248290463863],
            [0.0, 1.3540064007726602, 0.12309149097933275],
            [0.0, 0.0, 0.9045340337332908],
        ]).unwrap();
        assert_close!(abs=1e-12, r, expected);
        assert_close!(abs=1e-12, xy(&q, &r).unwrap(), sample());
        assert_close!(abs=1e-12, txy(&q, &q).unwrap(), Matrix::identity(3));
    }

    #[test]
    fn tall_input() {
        let a = Matrix::fill(5, 3, |i, j| ((i + 1) * (j + 2)) as f64 + if i == j { 1.0 } else { 0.0 });
        let Qr { q, r } = qr_decomposition(&a).unwrap();
        assert_eq!(q.dims(), (5, 5));
        assert_eq!(r.dims(), (5, 3));
        for i in 0..5 {
            for j in 0..i.min(3) {
                assert_eq!(r[(i, j)], 0.0);
            }
        }
        assert_close!(abs=1e-12, xy(&q, &r).unwrap(), a);
        assert_close!(abs=1e-12, txy(&q, &q).unwrap(), Matrix::identity(5));

        // RᵗR = AᵗA
        assert_close!(abs=1e-10, txy(&r, &r).unwrap(), txy(&a, &a).unwrap());
        assert_close!(abs=1e-12, qr_r(&a).unwrap(), r);
    }

    #[test]
    fn into_matches_allocating_form() {
        let a = sample();
        let mut q = Matrix::zeros(3, 3);
        let mut r = Matrix::zeros(3, 3);
        qr_decomposition_into(&a, &mut q, &mut r).unwrap();
        assert_eq!(Qr { q, r }, qr_decomposition(&a).unwrap());

        let mut bad = Matrix::zeros(2, 3);
        let mut q = Matrix::zeros(3, 3);
        assert!(qr_decomposition_into(&a, &mut q, &mut bad).is_err());
    }

    #[test]
    fn wide_input_is_rejected() {
        let a = Matrix::zeros(2, 3);
        assert_eq!(qr_decomposition(&a).unwrap_err().kind(), crate::ErrorKind::Shape);
    }
}
