/* ************************************************************************ **
** This file is part of portmat, and is licensed under EITHER the MIT       **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Random correlation matrices with a given spectrum.
//!
//! A symmetric matrix `U·Diag(λ)·Uᵗ` with trace `n` is brought to unit
//! diagonal by plane rotations, which preserve the spectrum. Each rotation
//! fixes one more diagonal entry to 1, so `n - 1` rotations suffice.

use crate::orthogonal::random_orthogonal;
use crate::uniform::simplex_sample;

use ::portmat_linalg::{axty, Givens, Matrix, MatrixError, Result};
use ::rand::Rng;
use ::serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize)]
#[derive(Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct RandomCorrelationSettings {
    /// Spectrum of the result: `n` non-negative values summing to `n`.
    /// When absent, a uniform point of the simplex is scaled to sum to `n`.
    #[serde(default)]
    pub eigenvalues: Option<Vec<f64>>,
}

fn check_spectrum(n: usize, eigenvalues: &[f64]) -> Result<()> {
    if eigenvalues.len() != n {
        return Err(MatrixError::invalid_argument(format!(
            "expected {} eigenvalues, got {}", n, eigenvalues.len(),
        )));
    }
    if eigenvalues.iter().any(|&x| !(x >= 0.0)) {
        return Err(MatrixError::invalid_argument("eigenvalues must be non-negative"));
    }
    let sum: f64 = eigenvalues.iter().sum();
    if (sum - n as f64).abs() > 1e-8 * n as f64 {
        return Err(MatrixError::invalid_argument(format!(
            "eigenvalues sum to {} instead of {}", sum, n,
        )));
    }
    Ok(())
}

/// A random `n x n` correlation matrix.
pub fn random_correlation<R: Rng + ?Sized>(
    n: usize,
    settings: &RandomCorrelationSettings,
    rng: &mut R,
) -> Result<Matrix> {
    if n == 0 {
        return Err(MatrixError::invalid_argument("correlation matrix of size 0"));
    }
    let eigenvalues = match &settings.eigenvalues {
        Some(values) => {
            check_spectrum(n, values)?;
            values.clone()
        },
        None => simplex_sample(n, rng)?.into_iter().map(|x| x * n as f64).collect(),
    };

    let u = random_orthogonal(n, rng)?;
    let scaled = u.elem_map(|x, _, j| x * eigenvalues[j]);
    let mut a = axty(1.0, &scaled, &u)?;

    let rotations = rotate_to_unit_diagonal(&mut a);
    debug!("random_correlation: n = {}, {} rotations", n, rotations);
    polish(&mut a);
    Ok(a)
}

fn rotate_to_unit_diagonal(a: &mut Matrix) -> usize {
    let n = a.num_rows();
    let tol = n as f64 * ::std::f64::EPSILON;

    for step in 0..n.saturating_sub(1) {
        let dev: Vec<f64> = (0..n).map(|k| a[(k, k)] - 1.0).collect();
        let i = match farthest(&dev, |_| true) {
            Some(i) if dev[i].abs() > tol => i,
            _ => return step,
        };
        let j = match farthest(&dev, |d| d * dev[i] < 0.0) {
            Some(j) => j,
            None => {
                warn!("random_correlation: no rotation partner for diagonal entry {} ({:e} from one)", i, dev[i]);
                return step;
            },
        };

        let aij = a[(i, j)];
        let sign = if aij >= 0.0 { 1.0 } else { -1.0 };
        let t = dev[i] / (aij + sign * (aij * aij - dev[i] * dev[j]).sqrt());
        let rot = Givens::from_tangent(t);
        rot.rotate_columns(a, i, j);
        rot.rotate_rows(a, i, j, 0);
        trace!("random_correlation: rotated ({}, {}), a_ii - 1 = {:e}", i, j, a[(i, i)] - 1.0);
    }
    n.saturating_sub(1)
}

// Index of the largest |d| among the deviations accepted by `pred`.
fn farthest(dev: &[f64], pred: impl Fn(f64) -> bool) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (k, &d) in dev.iter().enumerate() {
        if pred(d) && best.map_or(true, |b| d.abs() > dev[b].abs()) {
            best = Some(k);
        }
    }
    best
}

// Clamp to [-1, 1], mirror the upper triangle and set the diagonal to one.
fn polish(a: &mut Matrix) {
    let n = a.num_rows();
    for i in 0..n {
        a[(i, i)] = 1.0;
        for j in i + 1..n {
            let x = a[(i, j)].max(-1.0).min(1.0);
            a[(i, j)] = x;
            a[(j, i)] = x;
        }
    }
}
