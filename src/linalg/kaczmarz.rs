/* ************************************************************************ **
** This file is part of portmat, and is licensed under EITHER the MIT       **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Extended Kaczmarz solvers for arbitrary linear systems.
//!
//! Both variants converge to the minimum-norm least-squares solution of
//! `A·x = b`. An auxiliary vector `z` (initially `b`) is projected onto the
//! orthogonal complement of the column space of `A`, and the iterate `x` is
//! projected onto the hyperplanes of the consistent system `A·x = b - z`.

use crate::error::{MatrixError, Result};
use crate::matrix::{dot, Matrix};
use crate::norms::hypot_n;
use crate::settings::{check_iterations, KaczmarzSettings};

use ::rand::distributions::{Distribution, WeightedError, WeightedIndex};
use ::rand::Rng;

pub fn linsolve_extended_kaczmarz(a: &Matrix, b: &Matrix, settings: &KaczmarzSettings) -> Result<Matrix> {
    linsolve_extended_kaczmarz_with_rng(a, b, settings, &mut ::rand::thread_rng())
}

/// As [`linsolve_extended_kaczmarz`], drawing samples for the randomized variant from `rng`.
pub fn linsolve_extended_kaczmarz_with_rng<R: Rng + ?Sized>(
    a: &Matrix,
    b: &Matrix,
    settings: &KaczmarzSettings,
    rng: &mut R,
) -> Result<Matrix> {
    let mut x = Matrix::zeros(a.num_cols(), 1);
    linsolve_extended_kaczmarz_into(a, b, settings, rng, &mut x)?;
    Ok(x)
}

pub fn linsolve_extended_kaczmarz_into<R: Rng + ?Sized>(
    a: &Matrix,
    b: &Matrix,
    settings: &KaczmarzSettings,
    rng: &mut R,
    x_out: &mut Matrix,
) -> Result<()> {
    let (rows, cols) = a.dims();
    b.check_vector()?;
    if b.num_rows() != rows {
        return Err(MatrixError::mismatch("linsolve_extended_kaczmarz", (rows, 1), b.dims()));
    }
    x_out.check_dims("linsolve_extended_kaczmarz", (cols, 1))?;

    let mut solver = Solver::new(a, b, settings.eps);
    for x in x_out.row_major_data_mut() {
        *x = 0.0;
    }
    if solver.fro_norm == 0.0 {
        // every x solves the least-squares problem; zero has minimum norm
        return Ok(());
    }

    let iterations = match settings.randomized {
        false => solver.run_cyclic(settings, x_out.row_major_data_mut())?,
        true => solver.run_randomized(settings, rng, x_out.row_major_data_mut())?,
    };
    debug!(
        "extended kaczmarz ({}): converged after {} iterations",
        if settings.randomized { "randomized" } else { "cyclic" },
        iterations,
    );
    Ok(())
}

struct Solver<'a> {
    a: &'a Matrix,
    b: &'a [f64],
    z: Vec<f64>,
    // each column of A, stored contiguously
    columns: Vec<Vec<f64>>,
    row_norms_sq: Vec<f64>,
    col_norms_sq: Vec<f64>,
    fro_norm: f64,
    eps: f64,
}

impl<'a> Solver<'a> {
    fn new(a: &'a Matrix, b: &'a Matrix, eps: f64) -> Self {
        let (rows, cols) = a.dims();
        let columns: Vec<Vec<f64>> = (0..cols).map(|j| (0..rows).map(|i| a[(i, j)]).collect()).collect();
        let row_norms_sq = a.rows().map(|row| dot(row, row)).collect();
        let col_norms_sq = columns.iter().map(|col| dot(col, col)).collect();
        Solver {
            a,
            b: b.row_major_data(),
            z: b.to_array(),
            columns,
            row_norms_sq,
            col_norms_sq,
            fro_norm: hypot_n(a.row_major_data().iter().cloned()),
            eps,
        }
    }

    // z -= <A_j, z> / |A_j|² · A_j
    fn project_column(&mut self, j: usize) {
        let norm_sq = self.col_norms_sq[j];
        if norm_sq == 0.0 {
            return;
        }
        let col = &self.columns[j];
        let scale = dot(col, &self.z) / norm_sq;
        for (z, &c) in self.z.iter_mut().zip(col) {
            *z -= scale * c;
        }
    }

    // x += (b_i - z_i - <A_i, x>) / |A_i|² · A_i
    fn project_row(&self, i: usize, x: &mut [f64]) {
        let norm_sq = self.row_norms_sq[i];
        if norm_sq == 0.0 {
            return;
        }
        let row = self.a.row_slice(i);
        let scale = (self.b[i] - self.z[i] - dot(row, x)) / norm_sq;
        for (x, &r) in x.iter_mut().zip(row) {
            *x += scale * r;
        }
    }

    fn has_converged(&self, x: &[f64]) -> bool {
        let x_norm = hypot_n(x.iter().cloned());
        let residual = hypot_n((0..self.b.len()).map(|i| dot(self.a.row_slice(i), x) - (self.b[i] - self.z[i])));
        let atz = hypot_n(self.columns.iter().map(|col| dot(col, &self.z)));

        residual <= self.eps * self.fro_norm * x_norm
            && atz <= self.eps * self.fro_norm * self.fro_norm * x_norm
    }

    fn run_cyclic(&mut self, settings: &KaczmarzSettings, x: &mut [f64]) -> Result<u32> {
        let (rows, cols) = self.a.dims();
        let mut iter = 0;
        loop {
            iter += 1;
            check_iterations("extended kaczmarz", iter, settings.max_iter)?;
            for j in 0..cols {
                self.project_column(j);
            }
            for i in 0..rows {
                self.project_row(i, x);
            }
            if self.has_converged(x) {
                return Ok(iter);
            }
        }
    }

    fn run_randomized<R: Rng + ?Sized>(&mut self, settings: &KaczmarzSettings, rng: &mut R, x: &mut [f64]) -> Result<u32> {
        let (rows, cols) = self.a.dims();
        let bad_weights = |e: WeightedError| MatrixError::invalid_argument(format!("cannot sample rows or columns: {}", e));
        let row_dist = WeightedIndex::new(&self.row_norms_sq).map_err(bad_weights)?;
        let col_dist = WeightedIndex::new(&self.col_norms_sq).map_err(bad_weights)?;
        let check_every = 8 * rows.min(cols) as u32;

        let mut iter = 0;
        loop {
            iter += 1;
            check_iterations("extended kaczmarz", iter, settings.max_iter)?;
            let j = col_dist.sample(rng);
            self.project_column(j);
            let i = row_dist.sample(rng);
            self.project_row(i, x);

            if iter % check_every == 0 && self.has_converged(x) {
                return Ok(iter);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::{txy, xy};
    use ::rand::rngs::StdRng;
    use ::rand::SeedableRng;

    fn vector(xs: &[f64]) -> Matrix {
        Matrix::from_vector(xs).unwrap()
    }

    #[test]
    fn square_system() {
        crate::init_logger();
        let a = Matrix::from_rows(&[
            [3.0, 2.0, -1.0],
            [2.0, -2.0, 4.0],
            [-1.0, 0.5, -1.0],
        ]).unwrap();
        let b = vector(&[1.0, -2.0, 0.0]);
        let x = linsolve_extended_kaczmarz(&a, &b, &Default::default()).unwrap();
        assert_close!(abs=1e-6, x, vector(&[1.0, -2.0, -2.0]));
    }

    #[test]
    fn least_squares_and_minimum_norm() {
        // inconsistent: least squares solution is (AᵗA)⁻¹Aᵗb
        let a = Matrix::from_rows(&[[1.0, 0.0], [0.0, 1.0], [1.0, 1.0]]).unwrap();
        let b = vector(&[1.0, 1.0, 0.0]);
        let x = linsolve_extended_kaczmarz(&a, &b, &Default::default()).unwrap();
        assert_close!(abs=1e-8, x, vector(&[1.0 / 3.0, 1.0 / 3.0]));

        // underdetermined: minimum norm solution
        let a = Matrix::from_rows(&[[1.0, 1.0]]).unwrap();
        let x = linsolve_extended_kaczmarz(&a, &vector(&[2.0]), &Default::default()).unwrap();
        assert_close!(abs=1e-12, x, vector(&[1.0, 1.0]));

        // normal equations hold
        let a = Matrix::from_rows(&[[1.0, 2.0], [3.0, 4.0], [5.0, 6.0], [7.0, 8.5]]).unwrap();
        let b = vector(&[1.0, 0.0, -1.0, 2.0]);
        let x = linsolve_extended_kaczmarz(&a, &b, &Default::default()).unwrap();
        let ax = xy(&a, &x).unwrap();
        let lhs = txy(&a, &ax).unwrap();
        let rhs = txy(&a, &b).unwrap();
        assert_close!(abs=1e-6, lhs, rhs);
    }

    #[test]
    fn randomized_is_reproducible() {
        let a = Matrix::from_rows(&[
            [4.0, 1.0, 0.0],
            [1.0, 3.0, 1.0],
            [0.0, 1.0, 2.0],
        ]).unwrap();
        let x_true = vector(&[1.0, -1.0, 0.5]);
        let b = xy(&a, &x_true).unwrap();
        let settings = KaczmarzSettings { randomized: true, ..Default::default() };

        let x1 = linsolve_extended_kaczmarz_with_rng(&a, &b, &settings, &mut StdRng::seed_from_u64(7)).unwrap();
        let x2 = linsolve_extended_kaczmarz_with_rng(&a, &b, &settings, &mut StdRng::seed_from_u64(7)).unwrap();
        assert_eq!(x1, x2);
        assert_close!(abs=1e-7, x1, x_true);
    }

    #[test]
    fn randomized_least_squares_agrees_with_cyclic() {
        let randomized = KaczmarzSettings { randomized: true, ..Default::default() };
        let cases = vec![
            // rank deficient and inconsistent
            (vec![[1.0, 2.0, 3.0], [2.0, 4.0, 6.0], [1.0, 1.0, 1.0]], vec![1.0, 0.0, 2.0]),
            // rank deficient and consistent
            (vec![[1.0, 2.0, 3.0], [2.0, 4.0, 6.0], [1.0, 1.0, 1.0]], vec![1.0, 2.0, 0.5]),
        ];
        for (rows, rhs) in cases {
            let a = Matrix::from_rows(&rows).unwrap();
            let b = vector(&rhs);
            let cyclic = linsolve_extended_kaczmarz(&a, &b, &Default::default()).unwrap();
            let sampled = linsolve_extended_kaczmarz_with_rng(&a, &b, &randomized, &mut StdRng::seed_from_u64(3)).unwrap();
            assert_close!(abs=1e-7, sampled, cyclic);
        }

        // tall and inconsistent
        let a = Matrix::from_rows(&[[1.0, 0.0], [0.0, 1.0], [1.0, 1.0]]).unwrap();
        let b = vector(&[1.0, 1.0, 0.0]);
        let x = linsolve_extended_kaczmarz_with_rng(&a, &b, &randomized, &mut StdRng::seed_from_u64(11)).unwrap();
        assert_close!(abs=1e-7, x, vector(&[1.0 / 3.0, 1.0 / 3.0]));

        // zero right-hand side
        let x = linsolve_extended_kaczmarz_with_rng(&a, &vector(&[0.0; 3]), &randomized, &mut StdRng::seed_from_u64(1)).unwrap();
        assert_eq!(x, Matrix::zeros(2, 1));
    }

    #[test]
    fn randomized_iteration_limit() {
        let a = Matrix::from_rows(&[[1.0, 0.99], [0.99, 1.0]]).unwrap();
        // convergence is first tested after 8·min(rows, cols) steps
        let settings = KaczmarzSettings { randomized: true, max_iter: Some(5), ..Default::default() };
        assert_eq!(
            linsolve_extended_kaczmarz_with_rng(&a, &vector(&[1.0, -1.0]), &settings, &mut StdRng::seed_from_u64(0)).unwrap_err(),
            MatrixError::max_iterations("extended kaczmarz", 5),
        );
    }

    #[test]
    fn degenerate_inputs() {
        let zero = Matrix::zeros(2, 3);
        let x = linsolve_extended_kaczmarz(&zero, &vector(&[1.0, 2.0]), &Default::default()).unwrap();
        assert_eq!(x, Matrix::zeros(3, 1));

        let a = Matrix::identity(2);
        assert!(linsolve_extended_kaczmarz(&a, &vector(&[1.0, 2.0, 3.0]), &Default::default()).is_err());
        assert!(linsolve_extended_kaczmarz(&a, &Matrix::ones(2, 2), &Default::default()).is_err());
    }

    #[test]
    fn iteration_limit() {
        let a = Matrix::from_rows(&[[1.0, 0.99], [0.99, 1.0]]).unwrap();
        let settings = KaczmarzSettings { max_iter: Some(2), ..Default::default() };
        assert_eq!(
            linsolve_extended_kaczmarz(&a, &vector(&[1.0, -1.0]), &settings).unwrap_err(),
            MatrixError::max_iterations("extended kaczmarz", 2),
        );
    }
}
