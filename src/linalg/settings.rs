/* ************************************************************************ **
** This file is part of portmat, and is licensed under EITHER the MIT       **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Option records for the decompositions and solvers.
//!
//! Every field has a default, so `Default::default()` and an empty YAML
//! mapping produce the same record.

// fn names like `eigen__max_iter` mirror the field paths they provide defaults for
#![allow(non_snake_case)]

use crate::error::{MatrixError, Result};

use ::serde::{Deserialize, Serialize};
use ::std::str::FromStr;

/// Iteration bound; `None` means unbounded.
pub type MaxIter = Option<u32>;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EigenvalueOrder {
    Unsorted,
    Descending,
    Ascending,
}

impl Default for EigenvalueOrder {
    fn default() -> Self { EigenvalueOrder::Unsorted }
}

#[derive(Serialize, Deserialize)]
#[derive(Debug, Clone, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct EigenSettings {
    /// Tolerance of the symmetry check on the input.
    #[serde(default)]
    pub eps_symmetric: f64,

    /// Maximum number of Jacobi sweeps.
    #[serde(default = "eigen__max_iter")]
    pub max_iter: MaxIter,

    #[serde(default)]
    pub order: EigenvalueOrder,
}
fn eigen__max_iter() -> MaxIter { Some(100) }

impl Default for EigenSettings {
    fn default() -> Self {
        EigenSettings {
            eps_symmetric: 0.0,
            max_iter: eigen__max_iter(),
            order: EigenvalueOrder::default(),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SvdForm {
    /// `U` is `rows x cols`, `S` is `cols x cols`.
    Thin,
    /// `U` is `rows x rows`, `S` is `rows x cols`.
    Full,
}

impl Default for SvdForm {
    fn default() -> Self { SvdForm::Thin }
}

impl FromStr for SvdForm {
    type Err = MatrixError;

    fn from_str(s: &str) -> Result<SvdForm> {
        match s {
            "thin" => Ok(SvdForm::Thin),
            "full" => Ok(SvdForm::Full),
            _ => Err(MatrixError::UnsupportedOption { option: "svd form", value: s.to_string() }),
        }
    }
}

#[derive(Serialize, Deserialize)]
#[derive(Debug, Clone, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct SvdSettings {
    #[serde(default)]
    pub form: SvdForm,

    /// Relative tolerance of the column orthogonality test.
    #[serde(default = "svd__eps")]
    pub eps: f64,

    /// Maximum number of sweeps over all column pairs.
    #[serde(default = "svd__max_iter")]
    pub max_iter: MaxIter,
}
fn svd__eps() -> f64 { ::std::f64::EPSILON }
fn svd__max_iter() -> MaxIter { Some(100) }

impl Default for SvdSettings {
    fn default() -> Self {
        SvdSettings {
            form: SvdForm::default(),
            eps: svd__eps(),
            max_iter: svd__max_iter(),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Pivoting {
    /// Plain `G·Gᵗ` factorization of a positive definite matrix.
    None,
    /// `L·D·Lᵗ` with diagonal pivoting, for semi-definite matrices.
    Complete,
}

impl Default for Pivoting {
    fn default() -> Self { Pivoting::None }
}

impl FromStr for Pivoting {
    type Err = MatrixError;

    fn from_str(s: &str) -> Result<Pivoting> {
        match s {
            "none" => Ok(Pivoting::None),
            "complete" => Ok(Pivoting::Complete),
            _ => Err(MatrixError::UnsupportedOption { option: "pivoting", value: s.to_string() }),
        }
    }
}

#[derive(Serialize, Deserialize)]
#[derive(Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "kebab-case")]
pub struct CholeskySettings {
    #[serde(default)]
    pub pivoting: Pivoting,

    #[serde(default)]
    pub eps_symmetric: f64,

    /// Relative threshold below which the remaining pivots of a complete
    /// pivoting factorization are treated as zero.
    ///
    /// Defaults to `n * 1e-16` for an `n x n` input.
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eps_sdp: Option<f64>,
}

impl CholeskySettings {
    pub fn eps_sdp_for(&self, n: usize) -> f64 {
        self.eps_sdp.unwrap_or(n as f64 * 1e-16)
    }
}

#[derive(Serialize, Deserialize)]
#[derive(Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "kebab-case")]
pub struct NullSpaceSettings {
    /// Singular values at or below this are treated as zero.
    ///
    /// Defaults to `max(rows, cols)` times the spacing of `f64` above the
    /// largest singular value.
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eps: Option<f64>,

    #[serde(default)]
    pub svd: SvdSettings,
}

#[derive(Serialize, Deserialize)]
#[derive(Debug, Clone, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct KaczmarzSettings {
    /// Relative tolerance of the residual tests.
    #[serde(default = "kaczmarz__eps")]
    pub eps: f64,

    /// Maximum number of sweeps (deterministic) or of single steps (randomized).
    #[serde(default = "kaczmarz__max_iter")]
    pub max_iter: MaxIter,

    /// Sample rows and columns instead of sweeping over them.
    #[serde(default)]
    pub randomized: bool,
}
fn kaczmarz__eps() -> f64 { 1e-10 }
fn kaczmarz__max_iter() -> MaxIter { Some(100_000) }

impl Default for KaczmarzSettings {
    fn default() -> Self {
        KaczmarzSettings {
            eps: kaczmarz__eps(),
            max_iter: kaczmarz__max_iter(),
            randomized: false,
        }
    }
}

/// Tolerances of the correlation and covariance matrix predicates.
#[derive(Serialize, Deserialize)]
#[derive(Debug, Clone, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct PropertySettings {
    #[serde(default)]
    pub eps_symmetric: f64,

    /// Tolerance of the unit diagonal check.
    #[serde(default)]
    pub eps_diagonal: f64,

    /// Eigenvalues down to `-eps_eigenvalue` count as non-negative.
    #[serde(default)]
    pub eps_eigenvalue: f64,

    /// Bound on the eigendecomposition used for the semi-definiteness check.
    #[serde(default = "property__eigen_max_iter")]
    pub eigen_max_iter: MaxIter,
}
fn property__eigen_max_iter() -> MaxIter { eigen__max_iter() }

impl Default for PropertySettings {
    fn default() -> Self {
        PropertySettings {
            eps_symmetric: 0.0,
            eps_diagonal: 0.0,
            eps_eigenvalue: 0.0,
            eigen_max_iter: property__eigen_max_iter(),
        }
    }
}

/// Check that an iteration count is within bounds.
pub(crate) fn check_iterations(algorithm: &'static str, iter: u32, max_iter: MaxIter) -> Result<()> {
    match max_iter {
        Some(max) if iter > max => Err(MatrixError::max_iterations(algorithm, max)),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_mapping_gives_defaults() {
        let eigen: EigenSettings = from_json!({});
        assert_eq!(eigen, EigenSettings::default());
        let svd: SvdSettings = from_json!({});
        assert_eq!(svd, SvdSettings::default());
        let kaczmarz: KaczmarzSettings = from_json!({});
        assert_eq!(kaczmarz, KaczmarzSettings::default());
        let props: PropertySettings = from_json!({});
        assert_eq!(props, PropertySettings::default());
    }

    #[test]
    fn kebab_case_fields() {
        let settings: CholeskySettings = from_json!({
            "pivoting": "complete",
            "eps-sdp": 1e-12,
        });
        assert_eq!(settings.pivoting, Pivoting::Complete);
        assert_eq!(settings.eps_sdp_for(4), 1e-12);
        assert_eq!(CholeskySettings::default().eps_sdp_for(4), 4e-16);

        let eigen: EigenSettings = from_json!({"max-iter": null, "order": "descending"});
        assert_eq!(eigen.max_iter, None);
        assert_eq!(eigen.order, EigenvalueOrder::Descending);
    }

    #[test]
    fn parse_option_names() {
        assert_eq!("complete".parse(), Ok(Pivoting::Complete));
        assert_eq!("full".parse(), Ok(SvdForm::Full));
        assert_eq!(
            "partial".parse::<Pivoting>(),
            Err(MatrixError::UnsupportedOption { option: "pivoting", value: "partial".to_string() }),
        );
    }

    #[test]
    fn iteration_bounds() {
        assert!(check_iterations("x", 100, Some(100)).is_ok());
        assert!(check_iterations("x", 101, Some(100)).is_err());
        assert!(check_iterations("x", ::std::u32::MAX, None).is_ok());
    }
}
