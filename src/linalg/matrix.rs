/* ************************************************************************ **
** This file is part of portmat, and is licensed under EITHER the MIT       **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use crate::error::{Dims, MatrixError, Result};

use ::portmat_assert_close::{CheckClose, CheckCloseError, Tolerances};
use ::serde::de::{Deserialize, Deserializer, Error as _};
use ::serde::ser::{Serialize, Serializer};
use ::std::fmt;
use ::std::ops::{Index, IndexMut};

/// Owned dense matrix of `f64` with C layout.
///
/// Vectors are matrices with a single column; functions that need one
/// validate the shape rather than relying on a separate type.
// please resist the urge to go generic
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    // c-contiguous, row-contiguous data
    data: Vec<f64>,
    // invariant: rows * cols == data.len()
    // invariant: rows > 0 && cols > 0
    rows: usize,
    cols: usize,
}

pub type ContiguousRows<'a> = ::std::slice::Chunks<'a, f64>;
pub type ContiguousRowsMut<'a> = ::std::slice::ChunksMut<'a, f64>;

/// # Construction
impl Matrix {
    /// Build from nested rows, which must be non-empty and rectangular.
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> Result<Matrix> {
        let width = match rows.first() {
            None => return Err(MatrixError::Empty),
            Some(row) => row.as_ref().len(),
        };
        if width == 0 {
            return Err(MatrixError::Empty);
        }

        let mut data = Vec::with_capacity(rows.len() * width);
        for (row, values) in rows.iter().enumerate() {
            let values = values.as_ref();
            if values.len() != width {
                return Err(MatrixError::RaggedRows { row, expected: width, got: values.len() });
            }
            data.extend_from_slice(values);
        }
        Ok(Matrix { data, rows: rows.len(), cols: width })
    }

    /// Build a column vector.
    pub fn from_vector(values: &[f64]) -> Result<Matrix> {
        Matrix::from_row_major_data((values.len(), 1), values.to_vec())
    }

    pub fn from_row_major_data((rows, cols): (usize, usize), data: Vec<f64>) -> Result<Matrix> {
        if rows == 0 || cols == 0 {
            return Err(MatrixError::Empty);
        }
        if data.len() != rows * cols {
            return Err(MatrixError::InvalidData { expected: rows * cols, got: data.len() });
        }
        Ok(Matrix { data, rows, cols })
    }

    /// Build a matrix from a function of `(row, col)`.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    pub fn fill(rows: usize, cols: usize, mut func: impl FnMut(usize, usize) -> f64) -> Matrix {
        assert!(rows > 0 && cols > 0, "matrix dimensions must be nonzero");

        let mut data = Vec::with_capacity(rows * cols);
        for i in 0..rows {
            for j in 0..cols {
                data.push(func(i, j));
            }
        }
        Matrix { data, rows, cols }
    }

    /// Build a symmetric `n x n` matrix, calling `func(i, j)` only for `j <= i`.
    ///
    /// # Panics
    ///
    /// Panics if `n` is zero.
    pub fn fill_symmetric(n: usize, mut func: impl FnMut(usize, usize) -> f64) -> Matrix {
        let mut out = Matrix::zeros(n, n);
        for i in 0..n {
            for j in 0..=i {
                let x = func(i, j);
                out[(i, j)] = x;
                out[(j, i)] = x;
            }
        }
        out
    }

    pub fn zeros(rows: usize, cols: usize) -> Matrix {
        Matrix::fill(rows, cols, |_, _| 0.0)
    }

    pub fn ones(rows: usize, cols: usize) -> Matrix {
        Matrix::fill(rows, cols, |_, _| 1.0)
    }

    pub fn identity(n: usize) -> Matrix {
        Matrix::fill(n, n, |i, j| if i == j { 1.0 } else { 0.0 })
    }

    /// Square matrix with the entries of a vector on its diagonal.
    pub fn from_diagonal(vector: &Matrix) -> Result<Matrix> {
        vector.check_vector()?;
        Ok(Matrix::from_diagonal_values(&vector.data))
    }

    /// # Panics
    ///
    /// Panics if `values` is empty.
    pub fn from_diagonal_values(values: &[f64]) -> Matrix {
        let n = values.len();
        let mut out = Matrix::zeros(n, n);
        for (i, &x) in values.iter().enumerate() {
            out[(i, i)] = x;
        }
        out
    }
}

/// # Shape and raw data
impl Matrix {
    pub fn dims(&self) -> (usize, usize) { (self.rows, self.cols) }
    pub fn num_rows(&self) -> usize { self.rows }
    pub fn num_cols(&self) -> usize { self.cols }
    pub fn size(&self) -> usize { self.data.len() }
    pub fn is_square(&self) -> bool { self.rows == self.cols }
    pub fn is_vector(&self) -> bool { self.cols == 1 }

    pub fn row_major_data(&self) -> &[f64] { &self.data }
    pub fn row_major_data_mut(&mut self) -> &mut [f64] { &mut self.data }
    pub fn into_row_major_data(self) -> Vec<f64> { self.data }

    pub fn rows(&self) -> ContiguousRows<'_> { self.data.chunks(self.cols) }
    pub fn rows_mut(&mut self) -> ContiguousRowsMut<'_> { self.data.chunks_mut(self.cols) }

    #[inline(always)]
    pub fn row_slice(&self, i: usize) -> &[f64] {
        &self.data[i * self.cols..(i + 1) * self.cols]
    }

    #[inline(always)]
    pub fn row_slice_mut(&mut self, i: usize) -> &mut [f64] {
        let cols = self.cols;
        &mut self.data[i * cols..(i + 1) * cols]
    }

    pub fn check_square(&self) -> Result<()> {
        match self.is_square() {
            true => Ok(()),
            false => Err(MatrixError::NotSquare { rows: self.rows, cols: self.cols }),
        }
    }

    pub fn check_vector(&self) -> Result<()> {
        match self.is_vector() {
            true => Ok(()),
            false => Err(MatrixError::NotVector { rows: self.rows, cols: self.cols }),
        }
    }

    pub(crate) fn check_dims(&self, operation: &'static str, expected: (usize, usize)) -> Result<()> {
        match self.dims() == expected {
            true => Ok(()),
            false => Err(MatrixError::mismatch(operation, expected, self.dims())),
        }
    }

    fn check_index(&self, i: usize, j: usize) -> Result<()> {
        match i < self.rows && j < self.cols {
            true => Ok(()),
            false => Err(MatrixError::IndexOutOfBounds { row: i, col: j, dims: Dims(self.rows, self.cols) }),
        }
    }
}

/// # Element access
///
/// `value`/`set_value` (and indexing) are meant for inner loops and only
/// check bounds in debug builds beyond what slice indexing does;
/// `get_value_at`/`set_value_at` report out-of-range indices as errors.
impl Matrix {
    #[inline(always)]
    pub fn value(&self, i: usize, j: usize) -> f64 {
        debug_assert!(i < self.rows && j < self.cols);
        self.data[i * self.cols + j]
    }

    #[inline(always)]
    pub fn set_value(&mut self, i: usize, j: usize, x: f64) {
        debug_assert!(i < self.rows && j < self.cols);
        self.data[i * self.cols + j] = x;
    }

    pub fn get_value_at(&self, i: usize, j: usize) -> Result<f64> {
        self.check_index(i, j)?;
        Ok(self.value(i, j))
    }

    pub fn set_value_at(&mut self, i: usize, j: usize, x: f64) -> Result<()> {
        self.check_index(i, j)?;
        self.set_value(i, j, x);
        Ok(())
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = f64;

    #[inline(always)] // inlining should often remove bounds checks
    fn index(&self, (i, j): (usize, usize)) -> &f64 {
        debug_assert!(i < self.rows && j < self.cols);
        &self.data[i * self.cols + j]
    }
}

impl IndexMut<(usize, usize)> for Matrix {
    #[inline(always)]
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut f64 {
        debug_assert!(i < self.rows && j < self.cols);
        &mut self.data[i * self.cols + j]
    }
}

/// # Extraction and structural operations
impl Matrix {
    /// Row-major copy of the data.
    pub fn to_array(&self) -> Vec<f64> { self.data.clone() }

    /// Row-major copy of the elements for which `pred(i, j, value)` holds.
    pub fn to_array_filtered(&self, mut pred: impl FnMut(usize, usize, f64) -> bool) -> Vec<f64> {
        let mut out = vec![];
        for (i, row) in self.rows().enumerate() {
            out.extend(row.iter().enumerate().filter(|&(j, &x)| pred(i, j, x)).map(|(_, &x)| x));
        }
        out
    }

    pub fn to_row_array(&self) -> Vec<Vec<f64>> {
        self.rows().map(|row| row.to_vec()).collect()
    }

    pub fn transpose(&self) -> Matrix {
        let mut data = Vec::with_capacity(self.data.len());
        for j in 0..self.cols {
            for i in 0..self.rows {
                data.push(self[(i, j)]);
            }
        }
        Matrix { data, rows: self.cols, cols: self.rows }
    }

    /// The diagonal of a square matrix, as a column vector.
    pub fn diagonal(&self) -> Result<Matrix> {
        self.check_square()?;
        let data = (0..self.rows).map(|i| self[(i, i)]).collect();
        Ok(Matrix { data, rows: self.rows, cols: 1 })
    }

    /// Row `i`, as a column vector.
    pub fn row(&self, i: usize) -> Result<Matrix> {
        self.check_index(i, 0)?;
        Ok(Matrix { data: self.row_slice(i).to_vec(), rows: self.cols, cols: 1 })
    }

    /// Column `j`, as a column vector.
    pub fn column(&self, j: usize) -> Result<Matrix> {
        self.check_index(0, j)?;
        let data = (0..self.rows).map(|i| self[(i, j)]).collect();
        Ok(Matrix { data, rows: self.rows, cols: 1 })
    }

    /// The submatrix at the intersection of the given rows and columns.
    ///
    /// Both index lists must be non-empty and strictly increasing.
    pub fn submatrix(&self, row_indices: &[usize], col_indices: &[usize]) -> Result<Matrix> {
        fn validate(indices: &[usize], bound: usize, what: &str) -> Result<()> {
            if indices.is_empty() {
                return Err(MatrixError::Empty);
            }
            if indices.windows(2).any(|w| w[0] >= w[1]) {
                return Err(MatrixError::invalid_argument(format!("{} indices must be strictly increasing", what)));
            }
            match indices.last() {
                Some(&last) if last >= bound => {
                    Err(MatrixError::invalid_argument(format!("{} index {} out of range 0..{}", what, last, bound)))
                },
                _ => Ok(()),
            }
        }
        validate(row_indices, self.rows, "row")?;
        validate(col_indices, self.cols, "column")?;

        let mut data = Vec::with_capacity(row_indices.len() * col_indices.len());
        for &i in row_indices {
            let row = self.row_slice(i);
            data.extend(col_indices.iter().map(|&j| row[j]));
        }
        Ok(Matrix { data, rows: row_indices.len(), cols: col_indices.len() })
    }

    /// Apply `func(value, i, j)` to every element.
    pub fn elem_map(&self, mut func: impl FnMut(f64, usize, usize) -> f64) -> Matrix {
        let mut out = self.clone();
        out.elem_map_mut(|x, i, j| func(x, i, j));
        out
    }

    pub fn elem_map_mut(&mut self, mut func: impl FnMut(f64, usize, usize) -> f64) {
        let cols = self.cols;
        for (k, x) in self.data.iter_mut().enumerate() {
            *x = func(*x, k / cols, k % cols);
        }
    }

    pub fn swap_rows(&self, i: usize, j: usize) -> Result<Matrix> {
        let mut out = self.clone();
        out.swap_rows_mut(i, j)?;
        Ok(out)
    }

    pub fn swap_rows_mut(&mut self, i: usize, j: usize) -> Result<()> {
        self.check_index(i.max(j), 0)?;
        if i != j {
            let cols = self.cols;
            for k in 0..cols {
                self.data.swap(i * cols + k, j * cols + k);
            }
        }
        Ok(())
    }

    pub fn swap_columns(&self, i: usize, j: usize) -> Result<Matrix> {
        let mut out = self.clone();
        out.swap_columns_mut(i, j)?;
        Ok(out)
    }

    pub fn swap_columns_mut(&mut self, i: usize, j: usize) -> Result<()> {
        self.check_index(0, i.max(j))?;
        if i != j {
            for row in self.rows_mut() {
                row.swap(i, j);
            }
        }
        Ok(())
    }
}

/// # Reductions
impl Matrix {
    pub fn sum(&self) -> f64 { self.data.iter().sum() }

    pub fn min(&self) -> f64 { self.data.iter().cloned().fold(::std::f64::INFINITY, f64::min) }

    pub fn max(&self) -> f64 { self.data.iter().cloned().fold(::std::f64::NEG_INFINITY, f64::max) }

    /// Divide every element by the sum of all elements.
    pub fn normalize(&self) -> Result<Matrix> {
        let sum = self.sum();
        if sum == 0.0 {
            return Err(MatrixError::invalid_argument("cannot normalize a matrix whose elements sum to zero"));
        }
        Ok(self.elem_map(|x, _, _| x / sum))
    }

    /// Dot product of two vectors of equal length.
    pub fn vector_dot_product(&self, other: &Matrix) -> Result<f64> {
        self.check_vector()?;
        other.check_vector()?;
        other.check_dims("vector_dot_product", self.dims())?;
        Ok(dot(&self.data, &other.data))
    }
}

#[inline(always)]
pub(crate) fn dot(a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), b.len());
    a.iter().zip(b).map(|(&a, &b)| a * b).sum()
}

/// # Predicates
impl Matrix {
    pub fn is_symmetric(&self, eps: f64) -> bool {
        if !self.is_square() {
            return false;
        }
        for i in 0..self.rows {
            for j in 0..i {
                if (self[(i, j)] - self[(j, i)]).abs() > eps {
                    return false;
                }
            }
        }
        true
    }

    pub fn is_unit_diagonal(&self, eps: f64) -> bool {
        self.is_square() && (0..self.rows).all(|i| (self[(i, i)] - 1.0).abs() <= eps)
    }

    pub fn is_non_negative(&self) -> bool { self.data.iter().all(|&x| x >= 0.0) }
    pub fn is_positive(&self) -> bool { self.data.iter().all(|&x| x > 0.0) }
    pub fn is_non_positive(&self) -> bool { self.data.iter().all(|&x| x <= 0.0) }
    pub fn is_negative(&self) -> bool { self.data.iter().all(|&x| x < 0.0) }
}

/// Elementwise comparison with absolute tolerance `eps`.
///
/// Matrices of different shapes are never equal.
pub fn are_equal(x: &Matrix, y: &Matrix, eps: f64) -> bool {
    x.dims() == y.dims() && x.data.iter().zip(&y.data).all(|(a, b)| (a - b).abs() <= eps)
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            write!(f, "[")?;
            for (j, x) in row.iter().enumerate() {
                if j > 0 {
                    write!(f, " ")?;
                }
                match f.precision() {
                    Some(prec) => write!(f, "{:.*}", prec, x)?,
                    None => write!(f, "{}", x)?,
                }
            }
            writeln!(f, "]")?;
        }
        Ok(())
    }
}

impl Serialize for Matrix {
    fn serialize<S: Serializer>(&self, serializer: S) -> ::std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(self.rows())
    }
}

impl<'de> Deserialize<'de> for Matrix {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> ::std::result::Result<Self, D::Error> {
        let rows = Vec::<Vec<f64>>::deserialize(deserializer)?;
        Matrix::from_rows(&rows).map_err(D::Error::custom)
    }
}

impl CheckClose for Matrix {
    type Scalar = f64;

    fn check_close(&self, other: &Matrix, tol: Tolerances) -> ::std::result::Result<(), CheckCloseError<f64>> {
        assert_eq!(self.dims(), other.dims(), "shape mismatch in assert_close");
        self.data.check_close(&other.data, tol)
    }
}
