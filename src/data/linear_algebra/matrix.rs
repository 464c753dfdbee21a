//! # Dense matrices
//!
//! Problems solved by this crate are small and dense, so a row major `Vec<Vec<F>>` is all that is
//! needed. Dimensions are fixed at creation.
use std::fmt::{Display, Formatter, Result as FormatResult};
use std::slice::Iter;

use num_traits::Float;

/// Uses a `Vec<Vec<F>>` as underlying data structure, one inner `Vec` per row.
#[derive(Clone, Debug, PartialEq)]
pub struct Matrix<F> {
    data: Vec<Vec<F>>,
    nr_rows: usize,
    nr_columns: usize,
}

impl<F: Float> Matrix<F> {
    /// Create a `Matrix` from row major data.
    ///
    /// # Arguments
    ///
    /// * `data`: Rows of the matrix.
    /// * `nr_columns`: Width of each row. Needed because `data` may not contain any rows.
    ///
    /// # Return value
    ///
    /// `None` if not all rows have length `nr_columns`.
    pub fn from_rows(data: Vec<Vec<F>>, nr_columns: usize) -> Option<Self> {
        if data.iter().any(|row| row.len() != nr_columns) {
            return None;
        }

        let nr_rows = data.len();
        Some(Self { data, nr_rows, nr_columns })
    }

    /// Create a dense matrix of zero's of dimension `rows` x `columns`.
    pub fn zeros(nr_rows: usize, nr_columns: usize) -> Self {
        Self {
            data: vec![vec![F::zero(); nr_columns]; nr_rows],
            nr_rows,
            nr_columns,
        }
    }

    /// Create a dense square identity matrix of size `len`.
    pub fn identity(len: usize) -> Self {
        let mut matrix = Self::zeros(len, len);
        for i in 0..len {
            matrix.data[i][i] = F::one();
        }

        matrix
    }

    /// Get the value at coordinate (`i`, `j`).
    pub fn get(&self, i: usize, j: usize) -> F {
        debug_assert!(i < self.nr_rows);
        debug_assert!(j < self.nr_columns);

        self.data[i][j]
    }

    /// Set the value at coordinate (`i`, `j`).
    pub fn set(&mut self, i: usize, j: usize, value: F) {
        debug_assert!(i < self.nr_rows);
        debug_assert!(j < self.nr_columns);

        self.data[i][j] = value;
    }

    /// Get all values in row `i` of this matrix.
    pub fn row(&self, i: usize) -> Iter<'_, F> {
        debug_assert!(i < self.nr_rows);

        self.data[i].iter()
    }

    /// Get all values in column `j` of this matrix.
    pub fn column(&self, j: usize) -> Vec<F> {
        debug_assert!(j < self.nr_columns);

        self.data.iter().map(|row| row[j]).collect()
    }

    /// Iterate over all rows.
    pub fn rows(&self) -> Iter<'_, Vec<F>> {
        self.data.iter()
    }

    /// Multiply row `i` with a factor `factor`.
    pub fn multiply_row(&mut self, i: usize, factor: F) {
        debug_assert!(i < self.nr_rows);

        for value in &mut self.data[i] {
            *value = *value * factor;
        }
    }

    /// Collect a selection of columns, in the order given, into a new matrix.
    ///
    /// Used to build the basis matrix `B = A[:, basis]`.
    pub fn select_columns(&self, columns: &[usize]) -> Self {
        debug_assert!(columns.iter().all(|&j| j < self.nr_columns));

        let data = self.data.iter()
            .map(|row| columns.iter().map(|&j| row[j]).collect())
            .collect();

        Self { data, nr_rows: self.nr_rows, nr_columns: columns.len() }
    }

    /// Copy of this matrix without the rows at the given (sorted, unique) indices.
    pub fn without_rows(&self, rows: &[usize]) -> Self {
        let data = self.data.iter()
            .enumerate()
            .filter(|(i, _)| rows.binary_search(i).is_err())
            .map(|(_, row)| row.clone())
            .collect::<Vec<_>>();

        Self { nr_rows: data.len(), data, nr_columns: self.nr_columns }
    }

    /// Append the columns of `other` to the right of this matrix.
    pub fn append_columns(&self, other: &Self) -> Self {
        debug_assert_eq!(self.nr_rows, other.nr_rows);

        let data = self.data.iter().zip(&other.data)
            .map(|(left, right)| left.iter().chain(right).copied().collect())
            .collect();

        Self { data, nr_rows: self.nr_rows, nr_columns: self.nr_columns + other.nr_columns }
    }

    /// Compute `Ax`.
    pub fn mul_vector(&self, x: &[F]) -> Vec<F> {
        debug_assert_eq!(x.len(), self.nr_columns);

        self.data.iter().map(|row| inner_product(row, x)).collect()
    }

    /// Compute `A^T y`, without materializing the transpose.
    pub fn transpose_mul_vector(&self, y: &[F]) -> Vec<F> {
        debug_assert_eq!(y.len(), self.nr_rows);

        let mut result = vec![F::zero(); self.nr_columns];
        for (row, &factor) in self.data.iter().zip(y) {
            for (total, &value) in result.iter_mut().zip(row) {
                *total = *total + factor * value;
            }
        }

        result
    }

    /// Largest absolute value in the matrix, zero if empty.
    pub fn max_abs(&self) -> F {
        max_abs(self.data.iter().flatten())
    }

    /// Whether all values are finite.
    pub fn is_finite(&self) -> bool {
        self.data.iter().flatten().all(|v| v.is_finite())
    }

    /// Number of rows.
    pub fn nr_rows(&self) -> usize {
        self.nr_rows
    }

    /// Number of columns.
    pub fn nr_columns(&self) -> usize {
        self.nr_columns
    }
}

/// Inner product of two equally long slices.
pub fn inner_product<F: Float>(left: &[F], right: &[F]) -> F {
    debug_assert_eq!(left.len(), right.len());

    left.iter().zip(right).fold(F::zero(), |total, (&l, &r)| total + l * r)
}

/// Largest absolute value among the items, zero if there are none.
pub fn max_abs<'a, F: Float + 'a>(values: impl IntoIterator<Item = &'a F>) -> F {
    values.into_iter().fold(F::zero(), |max, v| max.max(v.abs()))
}

impl<F: Float + Display> Display for Matrix<F> {
    fn fmt(&self, f: &mut Formatter) -> FormatResult {
        for row in &self.data {
            for value in row {
                write!(f, "{:>10.4}", value)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
