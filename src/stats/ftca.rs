/* ************************************************************************ **
** This file is part of portmat, and is licensed under EITHER the MIT       **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Fast Threshold Clustering Algorithm.
//!
//! Groups the elements of a correlation matrix into clusters whose members are
//! correlated above a threshold. Every round removes one or two clusters from
//! the set of unassigned elements, so at most `n` rounds are needed.

#![allow(non_snake_case)]

use ::portmat_linalg::{Matrix, Result};
use ::serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize)]
#[derive(Debug, Clone, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct FtcaSettings {
    /// Correlation above which two elements belong together.
    #[serde(default = "ftca__threshold")]
    pub threshold: f64,
}
fn ftca__threshold() -> f64 { 0.5 }

impl Default for FtcaSettings {
    fn default() -> Self { FtcaSettings { threshold: ftca__threshold() } }
}

/// Clusters as lists of element indices, each sorted ascending, in the order
/// they were formed. Together they partition `0..n`.
pub fn ftca(corr: &Matrix, settings: &FtcaSettings) -> Result<Vec<Vec<usize>>> {
    corr.check_square()?;
    let threshold = settings.threshold;
    let mut unassigned: Vec<usize> = (0..corr.num_rows()).collect();
    let mut clusters = vec![];

    while !unassigned.is_empty() {
        if unassigned.len() == 1 {
            clusters.push(unassigned.split_off(0));
            break;
        }

        let avg = |i: usize| {
            let sum: f64 = unassigned.iter().filter(|&&j| j != i).map(|&j| corr[(i, j)]).sum();
            sum / (unassigned.len() - 1) as f64
        };
        let averages: Vec<f64> = unassigned.iter().map(|&i| avg(i)).collect();
        let HC = unassigned[argmax(&averages)];
        let LC = {
            let others: Vec<(usize, f64)> = unassigned.iter().cloned()
                .zip(averages.iter().cloned())
                .filter(|&(i, _)| i != HC)
                .collect();
            let lows: Vec<f64> = others.iter().map(|&(_, a)| a).collect();
            others[argmin(&lows)].0
        };
        trace!("ftca: {} unassigned, HC = {}, LC = {}", unassigned.len(), HC, LC);

        if corr[(HC, LC)] > threshold {
            let cluster = take_where(&mut unassigned, |j| {
                j == HC || j == LC || (corr[(j, HC)] + corr[(j, LC)]) / 2.0 > threshold
            });
            clusters.push(cluster);
        } else {
            let around_hc = take_where(&mut unassigned, |j| {
                j == HC || (j != LC && corr[(j, HC)] > threshold)
            });
            let around_lc = take_where(&mut unassigned, |j| {
                j == LC || corr[(j, LC)] > threshold
            });
            clusters.push(around_hc);
            clusters.push(around_lc);
        }
    }

    debug!("ftca: {} clusters at threshold {}", clusters.len(), threshold);
    Ok(clusters)
}

// Removes and returns the matching elements. `pool` stays sorted, so the
// result is sorted.
fn take_where(pool: &mut Vec<usize>, mut pred: impl FnMut(usize) -> bool) -> Vec<usize> {
    let (taken, kept) = pool.iter().cloned().partition(|&j| pred(j));
    *pool = kept;
    taken
}

// First index of the largest value.
fn argmax(xs: &[f64]) -> usize {
    let mut best = 0;
    for (i, &x) in xs.iter().enumerate().skip(1) {
        if x > xs[best] {
            best = i;
        }
    }
    best
}

fn argmin(xs: &[f64]) -> usize {
    let mut best = 0;
    for (i, &x) in xs.iter().enumerate().skip(1) {
        if x < xs[best] {
            best = i;
        }
    }
    best
}
