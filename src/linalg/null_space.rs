/* ************************************************************************ **
** This file is part of portmat, and is licensed under EITHER the MIT       **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use crate::error::Result;
use crate::matrix::Matrix;
use crate::settings::{NullSpaceSettings, SvdForm, SvdSettings};
use crate::svd::{complete_basis, svd_decomposition};

/// Distance from `x` to the next larger `f64`.
fn spacing(x: f64) -> f64 {
    let x = x.abs();
    if !x.is_finite() {
        return ::std::f64::NAN;
    }
    f64::from_bits(x.to_bits() + 1) - x
}

fn default_eps(dims: (usize, usize), sigma_max: f64) -> f64 {
    dims.0.max(dims.1) as f64 * spacing(sigma_max)
}

/// Orthonormal basis of `{x : A·x = 0}`, one vector per column.
///
/// A matrix of full column rank yields a single `cols x 1` zero vector.
pub fn null_space(a: &Matrix, settings: &NullSpaceSettings) -> Result<Matrix> {
    let (rows, cols) = a.dims();
    let svd_settings = SvdSettings { form: SvdForm::Thin, ..settings.svd.clone() };

    let basis: Vec<Vec<f64>> = if rows >= cols {
        let svd = svd_decomposition(a, &svd_settings)?;
        let sigma = svd.singular_values();
        let eps = settings.eps.unwrap_or_else(|| default_eps(a.dims(), sigma[0]));

        (0..cols)
            .filter(|&j| sigma[j] <= eps)
            .map(|j| (0..cols).map(|i| svd.v[(i, j)]).collect())
            .collect()
    } else {
        // the row space of A is the column space of Aᵗ
        let svd = svd_decomposition(&a.transpose(), &svd_settings)?;
        let sigma = svd.singular_values();
        let eps = settings.eps.unwrap_or_else(|| default_eps(a.dims(), sigma[0]));
        let rank = sigma.iter().filter(|&&x| x > eps).count();

        let mut u = Matrix::zeros(cols, cols);
        for i in 0..cols {
            for j in 0..rank {
                u[(i, j)] = svd.u[(i, j)];
            }
        }
        complete_basis(&mut u, rank)?;
        (rank..cols).map(|j| (0..cols).map(|i| u[(i, j)]).collect()).collect()
    };

    debug!("null_space: dimension {} for a {}x{} matrix", basis.len(), rows, cols);
    if basis.is_empty() {
        return Ok(Matrix::zeros(cols, 1));
    }
    Ok(Matrix::fill(cols, basis.len(), |i, j| basis[j][i]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::{txy, xy};

    fn check_basis(a: &Matrix, basis: &Matrix, dim: usize) {
        assert_eq!(basis.dims(), (a.num_cols(), dim));
        assert_close!(abs=1e-12, xy(a, basis).unwrap(), Matrix::zeros(a.num_rows(), dim));
        assert_close!(abs=1e-12, txy(basis, basis).unwrap(), Matrix::identity(dim));
    }

    #[test]
    fn tall_rank_deficient() {
        let a = Matrix::from_rows(&[
            [1.0, 2.0, 3.0],
            [2.0, 4.0, 6.0],
            [1.0, 1.0, 1.0],
            [0.0, 1.0, 2.0],
        ]).unwrap();
        let basis = null_space(&a, &Default::default()).unwrap();
        check_basis(&a, &basis, 1);

        // proportional to [1, -2, 1]
        let scale = basis[(0, 0)];
        assert_close!(abs=1e-12, basis.to_array(), vec![scale, -2.0 * scale, scale]);
    }

    #[test]
    fn wide_input() {
        let a = Matrix::from_rows(&[
            [1.0, 0.0, 1.0, 2.0],
            [0.0, 1.0, 1.0, -1.0],
        ]).unwrap();
        let basis = null_space(&a, &Default::default()).unwrap();
        check_basis(&a, &basis, 2);

        let zero = Matrix::zeros(1, 3);
        let basis = null_space(&zero, &Default::default()).unwrap();
        check_basis(&zero, &basis, 3);
    }

    #[test]
    fn full_rank_gives_zero_vector() {
        let a = Matrix::from_rows(&[[2.0, 1.0], [1.0, 3.0], [0.0, 1.0]]).unwrap();
        assert_eq!(null_space(&a, &Default::default()).unwrap(), Matrix::zeros(2, 1));
    }

    #[test]
    fn explicit_tolerance() {
        let a = Matrix::from_diagonal_values(&[1.0, 1e-6]);
        assert_eq!(null_space(&a, &Default::default()).unwrap(), Matrix::zeros(2, 1));

        let loose = NullSpaceSettings { eps: Some(1e-5), ..Default::default() };
        let basis = null_space(&a, &loose).unwrap();
        assert_close!(abs=1e-15, basis.to_array(), vec![0.0, 1.0]);
    }

    #[test]
    fn spacing_of_one_is_epsilon() {
        assert_eq!(spacing(1.0), ::std::f64::EPSILON);
        assert!(spacing(0.0) > 0.0);
    }
}
