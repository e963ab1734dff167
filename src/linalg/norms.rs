/* ************************************************************************ **
** This file is part of portmat, and is licensed under EITHER the MIT       **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use crate::error::{MatrixError, Result};
use crate::matrix::Matrix;

use ::serde::{Deserialize, Serialize};
use ::std::str::FromStr;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatrixNorm {
    /// Maximum absolute column sum.
    One,
    /// Maximum absolute row sum.
    Infinity,
    Frobenius,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VectorNorm {
    One,
    Two,
    Infinity,
}

/// Which elements of a matrix a vector norm is taken over.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum VectorSelection {
    /// Every element, as if the data were one long vector.
    All,
    Row(usize),
    Column(usize),
}

impl FromStr for MatrixNorm {
    type Err = MatrixError;

    fn from_str(s: &str) -> Result<MatrixNorm> {
        match s {
            "one" | "1" => Ok(MatrixNorm::One),
            "infinity" | "inf" => Ok(MatrixNorm::Infinity),
            "frobenius" | "fro" => Ok(MatrixNorm::Frobenius),
            _ => Err(MatrixError::UnsupportedOption { option: "matrix norm", value: s.to_string() }),
        }
    }
}

impl FromStr for VectorNorm {
    type Err = MatrixError;

    fn from_str(s: &str) -> Result<VectorNorm> {
        match s {
            "one" | "1" => Ok(VectorNorm::One),
            "two" | "2" => Ok(VectorNorm::Two),
            "infinity" | "inf" => Ok(VectorNorm::Infinity),
            _ => Err(MatrixError::UnsupportedOption { option: "vector norm", value: s.to_string() }),
        }
    }
}

/// Euclidean norm of a sequence, scaled to avoid destructive underflow and overflow.
///
/// Keeps a running scale (the largest magnitude so far) and a sum of squares
/// relative to it.
pub fn hypot_n(values: impl IntoIterator<Item = f64>) -> f64 {
    let mut scale = 0.0;
    let mut ssq = 1.0;
    for x in values {
        if x != 0.0 {
            let absx = x.abs();
            if scale < absx {
                ssq = 1.0 + ssq * (scale / absx) * (scale / absx);
                scale = absx;
            } else {
                ssq += (absx / scale) * (absx / scale);
            }
        }
    }
    scale * ssq.sqrt()
}

pub fn matrix_norm(a: &Matrix, norm: MatrixNorm) -> f64 {
    let (rows, cols) = a.dims();
    match norm {
        MatrixNorm::One => {
            (0..cols)
                .map(|j| (0..rows).map(|i| a[(i, j)].abs()).sum::<f64>())
                .fold(0.0, f64::max)
        },
        MatrixNorm::Infinity => {
            a.rows()
                .map(|row| row.iter().map(|x| x.abs()).sum::<f64>())
                .fold(0.0, f64::max)
        },
        MatrixNorm::Frobenius => hypot_n(a.row_major_data().iter().cloned()),
    }
}

pub fn vector_norm(a: &Matrix, norm: VectorNorm, selection: VectorSelection) -> Result<f64> {
    let values: Vec<f64> = match selection {
        VectorSelection::All => a.to_array(),
        VectorSelection::Row(i) => a.row(i)?.into_row_major_data(),
        VectorSelection::Column(j) => a.column(j)?.into_row_major_data(),
    };
    Ok(match norm {
        VectorNorm::One => values.iter().map(|x| x.abs()).sum(),
        VectorNorm::Two => hypot_n(values),
        VectorNorm::Infinity => values.iter().fold(0.0, |acc, x| f64::max(acc, x.abs())),
    })
}

/// Shorthand for the Frobenius norm.
pub fn frobenius_norm(a: &Matrix) -> f64 {
    matrix_norm(a, MatrixNorm::Frobenius)
}
