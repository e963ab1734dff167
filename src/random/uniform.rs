/* ************************************************************************ **
** This file is part of portmat, and is licensed under EITHER the MIT       **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use ::portmat_linalg::{Matrix, MatrixError, Result};
use ::rand::Rng;

/// A sample from `[0, 1)`.
pub fn uniform<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    rng.gen::<f64>()
}

pub fn uniform_matrix<R: Rng + ?Sized>(rows: usize, cols: usize, rng: &mut R) -> Matrix {
    Matrix::fill(rows, cols, |_, _| uniform(rng))
}

/// A uniform sample from the probability simplex `{x >= 0, Σx = 1}` of
/// dimension `n`, as the spacings of `n - 1` sorted uniforms.
pub fn simplex_sample<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Result<Vec<f64>> {
    if n == 0 {
        return Err(MatrixError::invalid_argument("simplex of dimension 0"));
    }
    let mut cuts: Vec<f64> = (0..n - 1).map(|_| uniform(rng)).collect();
    cuts.sort_by(|a, b| a.total_cmp(b));

    let mut out = Vec::with_capacity(n);
    let mut prev = 0.0;
    for &cut in cuts.iter().chain(Some(&1.0)) {
        out.push(cut - prev);
        prev = cut;
    }
    Ok(out)
}
