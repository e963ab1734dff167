/* ************************************************************************ **
** This file is part of portmat, and is licensed under EITHER the MIT       **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Statistics of return series: moments, order statistics, ranks,
//! permutation entropy and threshold clustering of correlation matrices.

#[macro_use]
extern crate log;
#[macro_use]
extern crate itertools;
#[cfg(test)]
#[macro_use]
extern crate portmat_assert_close;
#[cfg(test)]
#[macro_use]
extern crate portmat_util_macros;

pub use crate::moments::{
    covariance, mean, sample_covariance, sample_stddev, sample_variance, stddev, variance,
};
pub mod moments;

pub use crate::correlation::{covariance_matrix, sample_covariance_matrix, to_correlation_matrix, variances};
mod correlation;

pub use crate::order::{median, quantile, select};
mod order;

pub use crate::rank::{rank, RankOrder};
mod rank;

pub use crate::entropy::{normalized_permutation_entropy, permutation_entropy};
mod entropy;

pub use crate::ftca::{ftca, FtcaSettings};
mod ftca;
