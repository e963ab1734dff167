/* ************************************************************************ **
** This file is part of portmat, and is licensed under EITHER the MIT       **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Two-pass moments.
//!
//! The second pass computes a correction term from the deviations, which
//! cancels most of the roundoff in the first-pass mean.

use ::portmat_linalg::{MatrixError, Result};

fn require_len(xs: &[f64], min: usize, what: &str) -> Result<()> {
    if xs.len() < min {
        return Err(MatrixError::invalid_argument(format!(
            "{} requires at least {} values, got {}", what, min, xs.len(),
        )));
    }
    Ok(())
}

fn require_same_len(xs: &[f64], ys: &[f64]) -> Result<()> {
    if xs.len() != ys.len() {
        return Err(MatrixError::mismatch("covariance", (xs.len(), 1), (ys.len(), 1)));
    }
    Ok(())
}

pub fn mean(xs: &[f64]) -> Result<f64> {
    require_len(xs, 1, "mean")?;
    let n = xs.len() as f64;
    let naive = xs.iter().sum::<f64>() / n;
    let correction = xs.iter().map(|x| x - naive).sum::<f64>() / n;
    Ok(naive + correction)
}

// Σ(x - m)² - (Σ(x - m))² / n, about the corrected mean.
fn sum_sq_deviations(xs: &[f64]) -> Result<f64> {
    let m = mean(xs)?;
    let n = xs.len() as f64;
    let (sum_sq, sum) = xs.iter().fold((0.0, 0.0), |(sq, s), &x| {
        let d = x - m;
        (sq + d * d, s + d)
    });
    Ok(sum_sq - sum * sum / n)
}

/// Population variance.
pub fn variance(xs: &[f64]) -> Result<f64> {
    Ok(sum_sq_deviations(xs)? / xs.len() as f64)
}

pub fn sample_variance(xs: &[f64]) -> Result<f64> {
    require_len(xs, 2, "sample variance")?;
    Ok(sum_sq_deviations(xs)? / (xs.len() - 1) as f64)
}

pub fn stddev(xs: &[f64]) -> Result<f64> {
    Ok(variance(xs)?.sqrt())
}

pub fn sample_stddev(xs: &[f64]) -> Result<f64> {
    Ok(sample_variance(xs)?.sqrt())
}

fn sum_cross_deviations(xs: &[f64], ys: &[f64]) -> Result<f64> {
    require_same_len(xs, ys)?;
    let (mx, my) = (mean(xs)?, mean(ys)?);
    Ok(xs.iter().zip(ys).map(|(x, y)| (x - mx) * (y - my)).sum())
}

/// Population covariance of two equally long series.
pub fn covariance(xs: &[f64], ys: &[f64]) -> Result<f64> {
    Ok(sum_cross_deviations(xs, ys)? / xs.len() as f64)
}

pub fn sample_covariance(xs: &[f64], ys: &[f64]) -> Result<f64> {
    require_len(xs, 2, "sample covariance")?;
    Ok(sum_cross_deviations(xs, ys)? / (xs.len() - 1) as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DATA: &[f64] = &[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];

    #[test]
    fn textbook_values() {
        assert_eq!(mean(DATA), Ok(5.0));
        assert_eq!(variance(DATA), Ok(4.0));
        assert_eq!(stddev(DATA), Ok(2.0));
        assert_close!(abs=1e-14, sample_variance(DATA).unwrap(), 32.0 / 7.0);
        assert_close!(abs=1e-14, sample_stddev(DATA).unwrap(), (32.0f64 / 7.0).sqrt());
    }

    #[test]
    fn offset_data_keeps_precision() {
        // naive one-pass formulas lose everything here
        let shifted: Vec<f64> = DATA.iter().map(|x| x + 1e9).collect();
        assert_close!(abs=1e-6, variance(&shifted).unwrap(), 4.0);
        assert_close!(abs=1e-6, mean(&shifted).unwrap(), 1e9 + 5.0);
    }

    #[test]
    fn covariances() {
        let xs = [1.0, 2.0, 3.0, 4.0];
        let ys = [2.0, 4.0, 6.0, 8.0];
        assert_close!(abs=1e-14, covariance(&xs, &ys).unwrap(), 2.5);
        assert_close!(abs=1e-14, sample_covariance(&xs, &ys).unwrap(), 10.0 / 3.0);
        assert_close!(abs=1e-14, covariance(&xs, &xs).unwrap(), variance(&xs).unwrap());
        assert!(covariance(&xs, &ys[..3]).is_err());
    }

    #[test]
    fn too_few_values() {
        assert!(mean(&[]).is_err());
        assert!(variance(&[]).is_err());
        assert_eq!(variance(&[3.0]), Ok(0.0));
        assert!(sample_variance(&[3.0]).is_err());
        assert!(sample_covariance(&[1.0], &[2.0]).is_err());
    }
}
