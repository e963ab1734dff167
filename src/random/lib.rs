/* ************************************************************************ **
** This file is part of portmat, and is licensed under EITHER the MIT       **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Random scalars and matrices for simulation: normal deviates by inversion,
//! points of the probability simplex, Haar orthogonal matrices and random
//! correlation matrices.
//!
//! Every sampler takes the generator explicitly, so seeding an `StdRng`
//! makes results reproducible.

#[macro_use]
extern crate log;
#[cfg(test)]
#[macro_use]
extern crate portmat_assert_close;
#[cfg(test)]
#[macro_use]
extern crate portmat_util_macros;

pub use crate::normal::{norminv, normrnd, normrnd_matrix};
mod normal;

pub use crate::uniform::{simplex_sample, uniform, uniform_matrix};
mod uniform;

pub use crate::orthogonal::random_orthogonal;
mod orthogonal;

pub use crate::correlation::{random_correlation, RandomCorrelationSettings};
mod correlation;

#[cfg(test)]
pub(crate) fn init_logger() {
    let _ = ::env_logger::try_init();
}
