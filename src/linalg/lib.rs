/* ************************************************************************ **
** This file is part of portmat, and is licensed under EITHER the MIT       **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Dense row-major matrices of `f64`, with the classical decompositions and
//! solvers built on them.
//!
//! Indices are 0-based throughout. Every decomposition and solver has an
//! allocating form and an `_into` form that writes into caller-owned buffers
//! of the right shape.

#[macro_use]
extern crate log;
#[macro_use]
extern crate itertools;
#[cfg_attr(test, macro_use)]
extern crate portmat_assert_close;
#[cfg(test)]
#[macro_use]
extern crate portmat_util_macros;

pub use crate::error::{Dims, ErrorKind, MatrixError, Result};
mod error;

pub use crate::matrix::{are_equal, Matrix};
mod matrix;

pub use crate::norms::{frobenius_norm, hypot_n, matrix_norm, vector_norm, MatrixNorm, VectorNorm, VectorSelection};
mod norms;

pub use crate::ops::{
    atxy, atxy_into, ax, ax_into, axpby, axpby_into, axty, axty_into, axy, axy_into,
    elementwise_product, elementwise_product_into, txy, txy_into, xmy, xmy_into, xpy, xpy_into, xy, xy_into,
};
pub mod ops;

pub use crate::perm::{Axis, Permutation, PermutationForm};
mod perm;

pub use crate::settings::{
    CholeskySettings, EigenSettings, EigenvalueOrder, KaczmarzSettings, MaxIter, NullSpaceSettings,
    Pivoting, PropertySettings, SvdForm, SvdSettings,
};
mod settings;

pub use crate::qr::{qr_decomposition, qr_decomposition_into, qr_r, Givens, Qr};
mod qr;

pub use crate::lu::{determinant, lu_decomposition, lu_decomposition_into, Lu};
mod lu;

pub use crate::cholesky::{cholesky_decomposition, cholesky_decomposition_into, Cholesky};
mod cholesky;

pub use crate::eig::{eigen_decomposition, eigen_decomposition_into, Eigen};
mod eig;

pub use crate::svd::{svd_decomposition, svd_decomposition_into, Svd};
mod svd;

pub use crate::null_space::null_space;
mod null_space;

pub use crate::triangular::{back_substitution, back_substitution_into, forward_substitution, forward_substitution_into};
mod triangular;

pub use crate::kaczmarz::{
    linsolve_extended_kaczmarz, linsolve_extended_kaczmarz_into, linsolve_extended_kaczmarz_with_rng,
};
mod kaczmarz;

pub use crate::properties::{
    check_correlation_matrix, check_covariance_matrix, is_correlation_matrix, is_covariance_matrix,
};
mod properties;

#[cfg(test)]
pub(crate) fn init_logger() {
    let _ = ::env_logger::try_init();
}
