/* ************************************************************************ **
** This file is part of portmat, and is licensed under EITHER the MIT       **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Symmetric eigendecomposition by the cyclic Jacobi method.

use crate::error::{MatrixError, Result};
use crate::matrix::Matrix;
use crate::settings::{check_iterations, EigenSettings, EigenvalueOrder};

use ::std::cmp::Ordering;

/// `A = V·Diag(D)·Vᵗ`, with orthonormal eigenvectors in the columns of `v`.
#[derive(Debug, Clone, PartialEq)]
pub struct Eigen {
    pub v: Matrix,
    /// Eigenvalues, as a column vector.
    pub d: Matrix,
}

impl Eigen {
    pub fn eigenvalues(&self) -> &[f64] { self.d.row_major_data() }

    pub fn min_eigenvalue(&self) -> f64 { self.d.min() }

    pub fn max_eigenvalue(&self) -> f64 { self.d.max() }

    pub fn into_parts(self) -> (Matrix, Matrix) { (self.v, self.d) }
}

pub fn eigen_decomposition(a: &Matrix, settings: &EigenSettings) -> Result<Eigen> {
    let n = a.num_rows();
    let mut v = Matrix::zeros(n, n);
    let mut d = Matrix::zeros(n, 1);
    eigen_decomposition_into(a, settings, &mut v, &mut d)?;
    Ok(Eigen { v, d })
}

pub fn eigen_decomposition_into(a: &Matrix, settings: &EigenSettings, v_out: &mut Matrix, d_out: &mut Matrix) -> Result<()> {
    a.check_square()?;
    if !a.is_symmetric(settings.eps_symmetric) {
        return Err(MatrixError::NotSymmetric { eps: settings.eps_symmetric });
    }
    let n = a.num_rows();
    v_out.check_dims("eigen_decomposition", (n, n))?;
    d_out.check_dims("eigen_decomposition", (n, 1))?;

    let sweeps = jacobi(a, settings, v_out, d_out.row_major_data_mut())?;
    debug!("jacobi eigenvalue: converged after {} sweeps (n = {})", sweeps, n);

    sort_pairs(v_out, d_out, settings.order);
    Ok(())
}

fn off_diagonal_sum(a: &Matrix) -> f64 {
    let n = a.num_rows();
    let mut sum = 0.0;
    for p in 0..n {
        for q in p + 1..n {
            sum += a[(p, q)].abs();
        }
    }
    sum
}

#[inline(always)]
fn rotate(m: &mut Matrix, s: f64, tau: f64, (i, j): (usize, usize), (k, l): (usize, usize)) {
    let g = m[(i, j)];
    let h = m[(k, l)];
    m[(i, j)] = g - s * (h + g * tau);
    m[(k, l)] = h + s * (g - h * tau);
}

// Works on the upper triangle of a copy of `a`. Returns the number of sweeps.
fn jacobi(a: &Matrix, settings: &EigenSettings, v: &mut Matrix, d: &mut [f64]) -> Result<u32> {
    let n = a.num_rows();
    let mut a = a.clone();

    for (k, x) in v.row_major_data_mut().iter_mut().enumerate() {
        *x = if k / n == k % n { 1.0 } else { 0.0 };
    }
    for (p, x) in d.iter_mut().enumerate() {
        *x = a[(p, p)];
    }
    // b holds the diagonal as of the last sweep, z the updates since then
    let mut b = d.to_vec();
    let mut z = vec![0.0; n];

    let mut sweep = 0;
    loop {
        let off = off_diagonal_sum(&a);
        if off == 0.0 {
            return Ok(sweep);
        }
        sweep += 1;
        check_iterations("jacobi eigenvalue", sweep, settings.max_iter)?;
        trace!("jacobi eigenvalue: sweep {}, off-diagonal sum {:e}", sweep, off);

        let thresh = if sweep < 4 { 0.2 * off / (n * n) as f64 } else { 0.0 };

        for p in 0..n {
            for q in p + 1..n {
                let apq = a[(p, q)];
                let g = 100.0 * apq.abs();

                if sweep > 4 && d[p].abs() + g == d[p].abs() && d[q].abs() + g == d[q].abs() {
                    a[(p, q)] = 0.0;
                    continue;
                }
                if apq.abs() <= thresh {
                    continue;
                }

                let h = d[q] - d[p];
                let t = if h.abs() + g == h.abs() {
                    apq / h
                } else {
                    let theta = 0.5 * h / apq;
                    let t = 1.0 / (theta.abs() + (1.0 + theta * theta).sqrt());
                    if theta < 0.0 { -t } else { t }
                };
                let c = 1.0 / (1.0 + t * t).sqrt();
                let s = t * c;
                let tau = s / (1.0 + c);
                let h = t * apq;

                z[p] -= h;
                z[q] += h;
                d[p] -= h;
                d[q] += h;
                a[(p, q)] = 0.0;

                for j in 0..p {
                    rotate(&mut a, s, tau, (j, p), (j, q));
                }
                for j in p + 1..q {
                    rotate(&mut a, s, tau, (p, j), (j, q));
                }
                for j in q + 1..n {
                    rotate(&mut a, s, tau, (p, j), (q, j));
                }
                for j in 0..n {
                    rotate(v, s, tau, (j, p), (j, q));
                }
            }
        }

        for p in 0..n {
            b[p] += z[p];
            d[p] = b[p];
            z[p] = 0.0;
        }
    }
}

fn sort_pairs(v: &mut Matrix, d: &mut Matrix, order: EigenvalueOrder) {
    let n = d.num_rows();
    let mut indices: Vec<usize> = (0..n).collect();
    let values = d.to_array();
    let cmp = |a: &usize, b: &usize| values[*a].partial_cmp(&values[*b]).unwrap_or(Ordering::Equal);
    match order {
        EigenvalueOrder::Unsorted => return,
        EigenvalueOrder::Ascending => indices.sort_by(cmp),
        EigenvalueOrder::Descending => indices.sort_by(|a, b| cmp(b, a)),
    }

    let old_v = v.clone();
    for (new, &old) in indices.iter().enumerate() {
        d[(new, 0)] = values[old];
        for i in 0..n {
            v[(i, new)] = old_v[(i, old)];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::{axty, txy, xy};

    fn check_decomposition(a: &Matrix, eigen: &Eigen, tol: f64) {
        let n = a.num_rows();
        let vd = xy(&eigen.v, &Matrix::from_diagonal(&eigen.d).unwrap()).unwrap();
        assert_close!(abs=tol, axty(1.0, &vd, &eigen.v).unwrap(), a.clone());
        assert_close!(abs=tol, txy(&eigen.v, &eigen.v).unwrap(), Matrix::identity(n));
    }

    #[test]
    fn tridiagonal() {
        let a = Matrix::from_rows(&[
            [2.0, -1.0, 0.0],
            [-1.0, 2.0, -1.0],
            [0.0, -1.0, 2.0],
        ]).unwrap();
        let settings = EigenSettings { order: EigenvalueOrder::Ascending, ..Default::default() };
        let eigen = eigen_decomposition(&a, &settings).unwrap();
        let root2 = 2f64.sqrt();
        assert_close!(abs=1e-14, eigen.d.to_array(), vec![2.0 - root2, 2.0, 2.0 + root2]);
        check_decomposition(&a, &eigen, 1e-14);
        assert_close!(abs=1e-14, eigen.min_eigenvalue(), 2.0 - root2);
    }

    #[test]
    fn random_symmetric() {
        crate::init_logger();
        let n = 8;
        let a = Matrix::fill_symmetric(n, |i, j| ((i * 7 + j * 3) % 5) as f64 - 2.0 + 0.1 * (i + j) as f64);

        let eigen = eigen_decomposition(&a, &Default::default()).unwrap();
        check_decomposition(&a, &eigen, 1e-12);

        let sorted = eigen_decomposition(&a, &EigenSettings {
            order: EigenvalueOrder::Descending,
            ..Default::default()
        }).unwrap();
        check_decomposition(&a, &sorted, 1e-12);
        for k in 1..n {
            assert!(sorted.d[(k, 0)] <= sorted.d[(k - 1, 0)]);
        }
        assert_eq!(sorted.max_eigenvalue(), sorted.d[(0, 0)]);
    }

    #[test]
    fn diagonal_input_needs_no_sweeps() {
        let a = Matrix::from_diagonal_values(&[3.0, -1.0, 2.0]);
        let eigen = eigen_decomposition(&a, &EigenSettings { max_iter: Some(0), ..Default::default() }).unwrap();
        assert_eq!(eigen.d.to_array(), vec![3.0, -1.0, 2.0]);
        assert_eq!(eigen.v, Matrix::identity(3));
    }

    #[test]
    fn iteration_limit() {
        let a = Matrix::fill_symmetric(6, |i, j| 1.0 / (1 + i + j) as f64);
        let settings = EigenSettings { max_iter: Some(1), ..Default::default() };
        assert_eq!(
            eigen_decomposition(&a, &settings).unwrap_err(),
            MatrixError::max_iterations("jacobi eigenvalue", 1),
        );
        let unbounded = EigenSettings { max_iter: None, ..Default::default() };
        check_decomposition(&a, &eigen_decomposition(&a, &unbounded).unwrap(), 1e-12);
    }

    #[test]
    fn rejects_asymmetric_input() {
        let a = Matrix::from_rows(&[[1.0, 2.0], [3.0, 4.0]]).unwrap();
        assert_eq!(
            eigen_decomposition(&a, &Default::default()).unwrap_err(),
            MatrixError::NotSymmetric { eps: 0.0 },
        );
        assert!(eigen_decomposition(&Matrix::zeros(2, 3), &Default::default()).is_err());
    }
}
