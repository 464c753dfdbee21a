//! # LU Decomposition
//!
//! Dense factorization `PB = LU` of a square basis matrix using partial pivoting. The basis is
//! factorized from scratch each iteration, which costs O(m^3) per iteration but keeps rounding
//! errors from accumulating over basis changes.
use num_traits::Float;

use crate::data::linear_algebra::matrix::Matrix;

/// Lower and upper triangular factors, stored together in one square array.
///
/// Below the diagonal are the multipliers of `L` (which has an implicit unit diagonal), on and
/// above the diagonal are the values of `U`.
#[derive(Clone, Debug, PartialEq)]
pub struct LUDecomposition<F> {
    factors: Vec<Vec<F>>,
    /// Original row index for each row of `PB`.
    row_permutation: Vec<usize>,
}

impl<F: Float> LUDecomposition<F> {
    /// Compute the factorization `PB = LU`.
    ///
    /// # Arguments
    ///
    /// * `matrix`: Square matrix to factorize.
    /// * `pivot_tolerance`: Pivots with an absolute value at or below this value are treated as
    /// zero.
    ///
    /// # Return value
    ///
    /// `None` if the matrix is (numerically) singular.
    pub fn decompose(matrix: &Matrix<F>, pivot_tolerance: F) -> Option<Self> {
        debug_assert_eq!(matrix.nr_rows(), matrix.nr_columns());

        let m = matrix.nr_rows();
        let mut factors = matrix.rows().cloned().collect::<Vec<_>>();
        let mut row_permutation = (0..m).collect::<Vec<_>>();

        for k in 0..m {
            // Partial pivoting: largest absolute value in column k, at or below the diagonal
            let (pivot_row, pivot_value) = (k..m)
                .map(|i| (i, factors[i][k].abs()))
                .fold((k, F::zero()), |best, candidate| {
                    if candidate.1 > best.1 { candidate } else { best }
                });
            if pivot_value <= pivot_tolerance {
                return None;
            }

            factors.swap(k, pivot_row);
            row_permutation.swap(k, pivot_row);

            let pivot = factors[k][k];
            let (upper, lower) = factors.split_at_mut(k + 1);
            let pivot_row = &upper[k];
            for row in lower {
                let multiplier = row[k] / pivot;
                row[k] = multiplier;
                if multiplier.is_zero() {
                    continue;
                }
                for j in (k + 1)..m {
                    row[j] = row[j] - multiplier * pivot_row[j];
                }
            }
        }

        Some(Self { factors, row_permutation })
    }

    /// Solve `Bx = b`.
    pub fn solve(&self, b: &[F]) -> Vec<F> {
        let m = self.len();
        debug_assert_eq!(b.len(), m);

        // Ly = Pb
        let mut x = self.row_permutation.iter().map(|&i| b[i]).collect::<Vec<_>>();
        for i in 0..m {
            for j in 0..i {
                x[i] = x[i] - self.factors[i][j] * x[j];
            }
        }
        // Ux = y
        for i in (0..m).rev() {
            for j in (i + 1)..m {
                x[i] = x[i] - self.factors[i][j] * x[j];
            }
            x[i] = x[i] / self.factors[i][i];
        }

        x
    }

    /// Solve `B^T y = c`.
    ///
    /// Because `B^T = U^T L^T P`, this is a forward substitution with `U^T`, a backward
    /// substitution with `L^T` and a permutation.
    pub fn solve_transpose(&self, c: &[F]) -> Vec<F> {
        let m = self.len();
        debug_assert_eq!(c.len(), m);

        let mut w = c.to_vec();
        for i in 0..m {
            for j in 0..i {
                w[i] = w[i] - self.factors[j][i] * w[j];
            }
            w[i] = w[i] / self.factors[i][i];
        }
        for i in (0..m).rev() {
            for j in (i + 1)..m {
                w[i] = w[i] - self.factors[j][i] * w[j];
            }
        }

        let mut y = vec![F::zero(); m];
        for (i, &original) in self.row_permutation.iter().enumerate() {
            y[original] = w[i];
        }

        y
    }

    /// Size of the factorized matrix.
    pub fn len(&self) -> usize {
        self.row_permutation.len()
    }

    /// Whether the factorized matrix has no rows.
    pub fn is_empty(&self) -> bool {
        self.row_permutation.is_empty()
    }
}

#[cfg(test)]
mod test {
    use approx::assert_abs_diff_eq;

    use crate::data::linear_algebra::lower_upper::LUDecomposition;
    use crate::data::linear_algebra::matrix::Matrix;

    fn matrix() -> Matrix<f64> {
        Matrix::from_rows(vec![
            vec![0f64, 2f64, 1f64],
            vec![1f64, 1f64, 0f64],
            vec![4f64, 0f64, 3f64],
        ], 3).unwrap()
    }

    #[test]
    fn solve() {
        let m = matrix();
        let lu = LUDecomposition::decompose(&m, 1e-12).unwrap();
        let b = [3f64, 2f64, 7f64];
        let x = lu.solve(&b);
        for (computed, expected) in m.mul_vector(&x).into_iter().zip(b) {
            assert_abs_diff_eq!(computed, expected, epsilon = 1e-12);
        }
    }

    #[test]
    fn solve_transpose() {
        let m = matrix();
        let lu = LUDecomposition::decompose(&m, 1e-12).unwrap();
        let c = [1f64, -2f64, 0.5f64];
        let y = lu.solve_transpose(&c);
        for (computed, expected) in m.transpose_mul_vector(&y).into_iter().zip(c) {
            assert_abs_diff_eq!(computed, expected, epsilon = 1e-12);
        }
    }

    #[test]
    fn singular() {
        let m = Matrix::from_rows(vec![
            vec![1f64, 2f64],
            vec![2f64, 4f64],
        ], 2).unwrap();
        assert!(LUDecomposition::decompose(&m, 1e-12).is_none());
    }

    #[test]
    fn empty() {
        let lu = LUDecomposition::<f64>::decompose(&Matrix::zeros(0, 0), 1e-12).unwrap();
        assert!(lu.is_empty());
        assert!(lu.solve(&[]).is_empty());
    }
}
