/* ************************************************************************ **
** This file is part of portmat, and is licensed under EITHER the MIT       **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Covariance and correlation matrices of return series.

use crate::moments;

use ::portmat_linalg::{Matrix, MatrixError, Result};

fn series_columns(series: &Matrix) -> Vec<Vec<f64>> {
    (0..series.num_cols())
        .map(|j| (0..series.num_rows()).map(|i| series[(i, j)]).collect())
        .collect()
}

fn build(series: &Matrix, cov: fn(&[f64], &[f64]) -> Result<f64>) -> Result<Matrix> {
    let columns = series_columns(series);
    let n = columns.len();
    let mut out = Matrix::zeros(n, n);
    for i in 0..n {
        for j in 0..=i {
            let c = cov(&columns[i], &columns[j])?;
            out[(i, j)] = c;
            out[(j, i)] = c;
        }
    }
    Ok(out)
}

/// Population covariance matrix of `series`, which holds one series per column
/// and one observation per row.
pub fn covariance_matrix(series: &Matrix) -> Result<Matrix> {
    build(series, moments::covariance)
}

pub fn sample_covariance_matrix(series: &Matrix) -> Result<Matrix> {
    build(series, moments::sample_covariance)
}

/// `C_ij / sqrt(C_ii C_jj)`, with an exact unit diagonal and entries clamped to `[-1, 1]`.
pub fn to_correlation_matrix(cov: &Matrix) -> Result<Matrix> {
    let sd: Vec<f64> = variances(cov)?.row_major_data().iter().map(|v| v.sqrt()).collect();
    if sd.iter().any(|&s| !(s > 0.0)) {
        return Err(MatrixError::NotPositiveDiagonal);
    }

    let n = sd.len();
    let mut out = Matrix::zeros(n, n);
    for (i, j) in iproduct!(0..n, 0..n) {
        out[(i, j)] = match i == j {
            true => 1.0,
            false => (cov[(i, j)] / (sd[i] * sd[j])).max(-1.0).min(1.0),
        };
    }
    Ok(out)
}

/// The diagonal of a covariance matrix, as a column vector.
pub fn variances(cov: &Matrix) -> Result<Matrix> {
    cov.diagonal()
}
