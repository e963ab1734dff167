/* ************************************************************************ **
** This file is part of portmat, and is licensed under EITHER the MIT       **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Singular value decomposition by one-sided Jacobi rotations.

use crate::error::{MatrixError, Result};
use crate::matrix::Matrix;
use crate::norms::frobenius_norm;
use crate::qr::{qr_decomposition, Givens};
use crate::settings::{check_iterations, SvdForm, SvdSettings};

use ::std::cmp::Ordering;

/// `A = U·S·Vᵗ`, with singular values in non-increasing order on the diagonal of `s`.
#[derive(Debug, Clone, PartialEq)]
pub struct Svd {
    pub u: Matrix,
    pub s: Matrix,
    pub v: Matrix,
}

impl Svd {
    pub fn singular_values(&self) -> Vec<f64> {
        let (rows, cols) = self.s.dims();
        (0..rows.min(cols)).map(|i| self.s[(i, i)]).collect()
    }

    /// Number of singular values strictly greater than `tol`.
    pub fn rank(&self, tol: f64) -> usize {
        self.singular_values().into_iter().filter(|&x| x > tol).count()
    }

    pub fn into_parts(self) -> (Matrix, Matrix, Matrix) { (self.u, self.s, self.v) }
}

fn output_dims((rows, cols): (usize, usize), form: SvdForm) -> ((usize, usize), (usize, usize)) {
    match form {
        SvdForm::Thin => ((rows, cols), (cols, cols)),
        SvdForm::Full => ((rows, rows), (rows, cols)),
    }
}

pub fn svd_decomposition(a: &Matrix, settings: &SvdSettings) -> Result<Svd> {
    let (u_dims, s_dims) = output_dims(a.dims(), settings.form);
    let n = a.num_cols();
    let mut svd = Svd {
        u: Matrix::zeros(u_dims.0, u_dims.1),
        s: Matrix::zeros(s_dims.0, s_dims.1),
        v: Matrix::zeros(n, n),
    };
    svd_decomposition_into(a, settings, &mut svd.u, &mut svd.s, &mut svd.v)?;
    Ok(svd)
}

pub fn svd_decomposition_into(
    a: &Matrix,
    settings: &SvdSettings,
    u_out: &mut Matrix,
    s_out: &mut Matrix,
    v_out: &mut Matrix,
) -> Result<()> {
    let (rows, cols) = a.dims();
    if rows < cols {
        return Err(MatrixError::mismatch("svd_decomposition", (cols, cols), (rows, cols)));
    }
    let (u_dims, s_dims) = output_dims(a.dims(), settings.form);
    u_out.check_dims("svd_decomposition", u_dims)?;
    s_out.check_dims("svd_decomposition", s_dims)?;
    v_out.check_dims("svd_decomposition", (cols, cols))?;

    // work holds U·S until the end
    let mut work = a.clone();
    let mut v = Matrix::identity(cols);
    let sweeps = orthogonalize_columns(&mut work, &mut v, settings)?;
    debug!("one-sided jacobi: converged after {} sweeps ({}x{})", sweeps, rows, cols);

    let sigma: Vec<f64> = (0..cols).map(|j| column_norm(&work, j)).collect();
    let mut order: Vec<usize> = (0..cols).collect();
    order.sort_by(|&i, &j| sigma[j].partial_cmp(&sigma[i]).unwrap_or(Ordering::Equal));

    let negligible = settings.eps * frobenius_norm(a);
    let rank = order.iter().take_while(|&&j| sigma[j] > negligible).count();

    // thin U in its leading columns
    let mut u = Matrix::zeros(rows, rows);
    for (new, &old) in order.iter().enumerate().take(rank) {
        for i in 0..rows {
            u[(i, new)] = work[(i, old)] / sigma[old];
        }
    }
    for (new, &old) in order.iter().enumerate() {
        for i in 0..cols {
            v_out[(i, new)] = v[(i, old)];
        }
    }

    complete_basis(&mut u, rank)?;

    for x in s_out.row_major_data_mut() {
        *x = 0.0;
    }
    // negligible columns are exactly rank deficient
    for (new, &old) in order.iter().enumerate().take(rank) {
        s_out[(new, new)] = sigma[old];
    }
    for i in 0..rows {
        for j in 0..u_dims.1 {
            u_out[(i, j)] = u[(i, j)];
        }
    }
    Ok(())
}

fn column_norm(m: &Matrix, j: usize) -> f64 {
    (0..m.num_rows()).map(|i| m[(i, j)] * m[(i, j)]).sum::<f64>().sqrt()
}

fn column_dot(m: &Matrix, j: usize, k: usize) -> f64 {
    m.rows().map(|row| row[j] * row[k]).sum()
}

// Rotates pairs of columns of `work` (and of `v`) until they are mutually
// orthogonal. Returns the number of sweeps.
fn orthogonalize_columns(work: &mut Matrix, v: &mut Matrix, settings: &SvdSettings) -> Result<u32> {
    let (rows, cols) = work.dims();
    let eps = settings.eps;
    let negligible = eps * frobenius_norm(work);
    let tol = eps * (rows as f64).sqrt();

    let mut sweep = 0;
    loop {
        sweep += 1;
        check_iterations("one-sided jacobi", sweep, settings.max_iter)?;

        // squared norms are refreshed every sweep to limit drift
        let mut norms: Vec<f64> = (0..cols).map(|j| column_dot(work, j, j)).collect();
        let mut rotated = 0;
        for j in 0..cols {
            for k in j + 1..cols {
                let (alpha, beta) = (norms[j], norms[k]);
                if alpha.sqrt() <= negligible || beta.sqrt() <= negligible {
                    continue;
                }
                let gamma = column_dot(work, j, k);
                if gamma.abs() <= tol * alpha.sqrt() * beta.sqrt() {
                    continue;
                }

                let zeta = (beta - alpha) / (2.0 * gamma);
                let sign = if zeta >= 0.0 { 1.0 } else { -1.0 };
                let t = sign / (zeta.abs() + (1.0 + zeta * zeta).sqrt());
                let rot = Givens::from_tangent(t);

                rot.rotate_columns(work, j, k);
                rot.rotate_columns(v, j, k);
                norms[j] = alpha - t * gamma;
                norms[k] = beta + t * gamma;
                rotated += 1;
            }
        }
        trace!("one-sided jacobi: sweep {}, {} rotations", sweep, rotated);
        if rotated == 0 {
            return Ok(sweep);
        }
    }
}

/// Replace columns `rank..` of `u` with an orthonormal completion of its
/// leading `rank` (already orthonormal) columns.
pub(crate) fn complete_basis(u: &mut Matrix, rank: usize) -> Result<()> {
    let rows = u.num_rows();
    if rank == rows {
        return Ok(());
    }
    let q = match rank {
        0 => Matrix::identity(rows),
        _ => {
            let leading: Vec<usize> = (0..rank).collect();
            let all_rows: Vec<usize> = (0..rows).collect();
            qr_decomposition(&u.submatrix(&all_rows, &leading)?)?.q
        },
    };
    for j in rank..u.num_cols() {
        for i in 0..rows {
            u[(i, j)] = q[(i, j)];
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::{axty, txy, xy};

    fn tall() -> Matrix {
        Matrix::from_rows(&[
            [0.3, -0.9, 0.5],
            [0.8, 0.1, -0.4],
            [-0.2, 0.6, 0.9],
            [0.7, 0.7, 0.1],
            [-0.5, 0.2, -0.3],
        ]).unwrap()
    }

    fn rank_deficient() -> Matrix {
        Matrix::from_rows(&[
            [1.0, 2.0, 3.0],
            [2.0, 4.0, 6.0],
            [1.0, 1.0, 1.0],
            [0.0, 1.0, 2.0],
        ]).unwrap()
    }

    fn check(a: &Matrix, svd: &Svd) {
        let (rows, cols) = a.dims();
        let us = xy(&svd.u, &svd.s).unwrap();
        assert_close!(abs=1e-12, axty(1.0, &us, &svd.v).unwrap(), a.clone());
        let ucols = svd.u.num_cols();
        assert_close!(abs=1e-12, txy(&svd.u, &svd.u).unwrap(), Matrix::identity(ucols));
        assert_close!(abs=1e-12, txy(&svd.v, &svd.v).unwrap(), Matrix::identity(cols));

        let sv = svd.singular_values();
        assert_eq!(sv.len(), cols.min(rows));
        for k in 1..sv.len() {
            assert!(sv[k] <= sv[k - 1]);
        }
        assert!(sv.iter().all(|&x| x >= 0.0));
    }

    #[test]
    fn thin_and_full() {
        let a = tall();
        let thin = svd_decomposition(&a, &Default::default()).unwrap();
        assert_eq!((thin.u.dims(), thin.s.dims(), thin.v.dims()), ((5, 3), (3, 3), (3, 3)));
        check(&a, &thin);

        let settings = SvdSettings { form: SvdForm::Full, ..Default::default() };
        let full = svd_decomposition(&a, &settings).unwrap();
        assert_eq!((full.u.dims(), full.s.dims(), full.v.dims()), ((5, 5), (5, 3), (3, 3)));
        check(&a, &full);
        assert_close!(abs=1e-14, full.singular_values(), thin.singular_values());
    }

    #[test]
    fn singular_values_match_eigenvalues_of_gram_matrix() {
        use crate::eig::eigen_decomposition;
        use crate::settings::{EigenSettings, EigenvalueOrder};

        let a = tall();
        let gram = txy(&a, &a).unwrap();
        let settings = EigenSettings { order: EigenvalueOrder::Descending, ..Default::default() };
        let eigenvalues = eigen_decomposition(&gram, &settings).unwrap().d.to_array();
        let squares: Vec<f64> = svd_decomposition(&a, &Default::default()).unwrap()
            .singular_values().into_iter().map(|x| x * x).collect();
        assert_close!(abs=1e-12, squares, eigenvalues);
    }

    #[test]
    fn rank_deficient_input_keeps_orthonormal_u() {
        let a = rank_deficient();
        let svd = svd_decomposition(&a, &Default::default()).unwrap();
        check(&a, &svd);
        assert_eq!(svd.rank(1e-10), 2);

        let zero = Matrix::zeros(3, 2);
        let svd = svd_decomposition(&zero, &Default::default()).unwrap();
        check(&zero, &svd);
        assert_eq!(svd.rank(0.0), 0);

        // the second column is below eps·‖A‖_F, so it counts as zero
        let tiny = Matrix::from_rows(&[[1.0, 1e-17], [0.0, 0.0], [0.0, 0.0]]).unwrap();
        let svd = svd_decomposition(&tiny, &Default::default()).unwrap();
        assert_eq!(svd.singular_values(), vec![1.0, 0.0]);
        assert_eq!(svd.rank(0.0), 1);
        check(&tiny, &svd);
    }

    #[test]
    fn square_and_single_column() {
        let a = Matrix::from_rows(&[[2.0, 0.0], [0.0, -3.0]]).unwrap();
        let svd = svd_decomposition(&a, &Default::default()).unwrap();
        assert_close!(abs=1e-15, svd.singular_values(), vec![3.0, 2.0]);
        check(&a, &svd);

        let col = Matrix::from_vector(&[3.0, 4.0]).unwrap();
        let svd = svd_decomposition(&col, &SvdSettings { form: SvdForm::Full, ..Default::default() }).unwrap();
        assert_close!(abs=1e-15, svd.singular_values(), vec![5.0]);
        check(&col, &svd);
    }

    #[test]
    fn rejects_wide_input_and_bad_buffers() {
        let wide = Matrix::zeros(2, 3);
        assert_eq!(svd_decomposition(&wide, &Default::default()).unwrap_err().kind(), crate::ErrorKind::Shape);

        let mut u = Matrix::zeros(5, 5);
        let mut s = Matrix::zeros(3, 3);
        let mut v = Matrix::zeros(3, 3);
        assert!(svd_decomposition_into(&tall(), &Default::default(), &mut u, &mut s, &mut v).is_err());
    }

    #[test]
    fn iteration_limit() {
        let settings = SvdSettings { max_iter: Some(1), ..Default::default() };
        assert_eq!(
            svd_decomposition(&tall(), &settings).unwrap_err(),
            MatrixError::max_iterations("one-sided jacobi", 1),
        );
    }
}
