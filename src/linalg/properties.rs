/* ************************************************************************ **
** This file is part of portmat, and is licensed under EITHER the MIT       **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Correlation and covariance matrix predicates.
//!
//! Each predicate comes as an `is_*` form answering `bool`, and a `check_*`
//! form reporting which property failed.

use crate::eig::eigen_decomposition;
use crate::error::{MatrixError, Result};
use crate::matrix::Matrix;
use crate::settings::{EigenSettings, PropertySettings};

use ::std::cmp::Ordering;

fn check_symmetric(a: &Matrix, settings: &PropertySettings) -> Result<()> {
    a.check_square()?;
    match a.is_symmetric(settings.eps_symmetric) {
        true => Ok(()),
        false => Err(MatrixError::NotSymmetric { eps: settings.eps_symmetric }),
    }
}

fn check_semi_definite(a: &Matrix, settings: &PropertySettings) -> Result<()> {
    let eigen_settings = EigenSettings {
        eps_symmetric: settings.eps_symmetric,
        max_iter: settings.eigen_max_iter,
        ..Default::default()
    };
    let eigen = eigen_decomposition(a, &eigen_settings)?;
    let (index, &min) = eigen.eigenvalues()
        .iter()
        .enumerate()
        .min_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(Ordering::Equal))
        .ok_or(MatrixError::Empty)?;

    if min < -settings.eps_eigenvalue || min.is_nan() {
        trace!("semi-definiteness check failed: eigenvalue {:e}", min);
        return Err(MatrixError::NotPositiveSemiDefinite { index });
    }
    Ok(())
}

/// Symmetric, unit diagonal and positive semi-definite.
pub fn check_correlation_matrix(a: &Matrix, settings: &PropertySettings) -> Result<()> {
    check_symmetric(a, settings)?;
    if !a.is_unit_diagonal(settings.eps_diagonal) {
        return Err(MatrixError::NotUnitDiagonal { eps: settings.eps_diagonal });
    }
    check_semi_definite(a, settings)
}

/// Symmetric, strictly positive diagonal and positive semi-definite.
pub fn check_covariance_matrix(a: &Matrix, settings: &PropertySettings) -> Result<()> {
    check_symmetric(a, settings)?;
    if !(0..a.num_rows()).all(|i| a[(i, i)] > 0.0) {
        return Err(MatrixError::NotPositiveDiagonal);
    }
    check_semi_definite(a, settings)
}

pub fn is_correlation_matrix(a: &Matrix, settings: &PropertySettings) -> bool {
    check_correlation_matrix(a, settings).is_ok()
}

pub fn is_covariance_matrix(a: &Matrix, settings: &PropertySettings) -> bool {
    check_covariance_matrix(a, settings).is_ok()
}

/// # Predicates using the default tolerances
impl Matrix {
    pub fn is_correlation_matrix(&self) -> bool {
        is_correlation_matrix(self, &PropertySettings::default())
    }

    pub fn is_covariance_matrix(&self) -> bool {
        is_covariance_matrix(self, &PropertySettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn correlation() -> Matrix {
        Matrix::from_rows(&[
            [1.0, 0.5, 0.2],
            [0.5, 1.0, -0.3],
            [0.2, -0.3, 1.0],
        ]).unwrap()
    }

    #[test]
    fn accepts_valid_matrices() {
        assert!(correlation().is_correlation_matrix());
        assert!(correlation().is_covariance_matrix());

        let cov = Matrix::from_rows(&[[4.0, 1.0], [1.0, 0.5]]).unwrap();
        assert!(cov.is_covariance_matrix());
        assert!(!cov.is_correlation_matrix());
        assert_eq!(
            check_correlation_matrix(&cov, &Default::default()),
            Err(MatrixError::NotUnitDiagonal { eps: 0.0 }),
        );
    }

    #[test]
    fn distinguishes_failures() {
        let settings = PropertySettings::default();
        assert_eq!(
            check_correlation_matrix(&Matrix::ones(2, 3), &settings),
            Err(MatrixError::NotSquare { rows: 2, cols: 3 }),
        );

        let mut asym = correlation();
        asym[(0, 1)] = 0.4;
        assert_eq!(check_correlation_matrix(&asym, &settings), Err(MatrixError::NotSymmetric { eps: 0.0 }));

        let mut zero_diag = correlation();
        zero_diag[(2, 2)] = 0.0;
        assert_eq!(check_covariance_matrix(&zero_diag, &settings), Err(MatrixError::NotPositiveDiagonal));

        // unit diagonal, symmetric, but indefinite
        let indefinite = Matrix::from_rows(&[
            [1.0, 0.9, -0.9],
            [0.9, 1.0, 0.9],
            [-0.9, 0.9, 1.0],
        ]).unwrap();
        let err = check_correlation_matrix(&indefinite, &settings).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::AlgebraicProperty);
        assert!(err.to_string().contains("semi-definite"));
        assert!(!indefinite.is_correlation_matrix());
    }

    #[test]
    fn tolerances_are_configurable() {
        let mut nearly = correlation();
        nearly[(1, 1)] = 1.0 + 1e-12;
        assert!(!nearly.is_correlation_matrix());
        let relaxed = PropertySettings { eps_diagonal: 1e-10, ..Default::default() };
        assert!(is_correlation_matrix(&nearly, &relaxed));

        // rank one, so the smallest eigenvalues are zero up to roundoff
        let ones = Matrix::ones(3, 3);
        let relaxed = PropertySettings { eps_eigenvalue: 1e-12, ..Default::default() };
        assert!(is_correlation_matrix(&ones, &relaxed));
    }
}
