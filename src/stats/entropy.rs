/* ************************************************************************ **
** This file is part of portmat, and is licensed under EITHER the MIT       **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Permutation entropy of Bandt and Pompe.

use ::portmat_linalg::{MatrixError, Result};
use ::std::collections::HashMap;

fn check_order(xs: &[f64], m: usize) -> Result<()> {
    if m < 2 {
        return Err(MatrixError::invalid_argument(format!("embedding dimension {} is less than 2", m)));
    }
    if xs.len() < m {
        return Err(MatrixError::invalid_argument(format!(
            "series of length {} is shorter than the embedding dimension {}", xs.len(), m,
        )));
    }
    Ok(())
}

// Indices of the window in ascending order of value. Ties keep their order of
// appearance.
fn ordinal_pattern(window: &[f64]) -> Vec<usize> {
    let mut pattern: Vec<usize> = (0..window.len()).collect();
    pattern.sort_by(|&a, &b| {
        window[a].partial_cmp(&window[b])
            .unwrap_or(::std::cmp::Ordering::Equal)
    });
    pattern
}

/// Shannon entropy (natural log) of the distribution of ordinal patterns
/// of order `m` and delay 1.
pub fn permutation_entropy(xs: &[f64], m: usize) -> Result<f64> {
    check_order(xs, m)?;
    let mut counts = HashMap::<Vec<usize>, usize>::new();
    for window in xs.windows(m) {
        *counts.entry(ordinal_pattern(window)).or_insert(0) += 1;
    }

    let total = (xs.len() - m + 1) as f64;
    trace!("permutation entropy: {} distinct patterns among {} windows", counts.len(), total);
    Ok(counts.values().map(|&c| {
        let p = c as f64 / total;
        -p * p.ln()
    }).sum())
}

/// [`permutation_entropy`] divided by its maximum `ln(m!)`, so it lies in `[0, 1]`.
pub fn normalized_permutation_entropy(xs: &[f64], m: usize) -> Result<f64> {
    let h = permutation_entropy(xs, m)?;
    let ln_factorial: f64 = (2..=m).map(|k| (k as f64).ln()).sum();
    Ok(h / ln_factorial)
}
