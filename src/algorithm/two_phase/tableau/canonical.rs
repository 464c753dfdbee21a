//! # Canonical form with respect to a basis
//!
//! The problem rewritten such that the basic variables have unit columns and zero relative cost.
//! It is always derived from the original coefficients and a basis, never updated incrementally.
use std::fmt::{Display, Formatter, Result as FormatResult};

use crate::data::linear_algebra::lower_upper::LUDecomposition;
use crate::data::linear_algebra::matrix::{inner_product, Matrix};
use crate::data::linear_program::equality_form::{format_terms, LinearProgram};
use crate::data::number_types::tolerance::Tolerance;
use crate::error::SolveError;

/// A maximization problem expressed relative to a basis `B`.
///
/// With `y` solving `B^T y = c_B`, this holds `A' = B^-1 A`, `b' = B^-1 b`, `c' = c - A^T y` and
/// `constant' = constant + y^T b`. The objective value of the basic solution is `constant'`.
#[derive(Clone, Debug, PartialEq)]
pub struct CanonicalForm {
    /// `B^-1 A`, `m x n`.
    pub constraints: Matrix<f64>,
    /// `B^-1 b`, the values of the basic variables ordered by basis position.
    pub b: Vec<f64>,
    /// Relative costs, zero for basic columns.
    pub cost: Vec<f64>,
    /// Objective value of the basic solution.
    pub constant: f64,
    /// Dual values `y`.
    pub dual: Vec<f64>,
}

impl CanonicalForm {
    /// Rewrite a maximization problem relative to a basis.
    ///
    /// # Arguments
    ///
    /// * `program`: Maximization problem with original coefficients.
    /// * `basis`: Column indices, one per row, with no duplicates.
    /// * `tolerance`: Used to decide whether the basis matrix is singular.
    ///
    /// # Errors
    ///
    /// `SingularBasis` if the basis columns are (numerically) linearly dependent.
    pub fn compute(
        program: &LinearProgram,
        basis: &[usize],
        tolerance: &Tolerance<f64>,
    ) -> Result<Self, SolveError> {
        debug_assert_eq!(basis.len(), program.nr_rows());

        let a = program.constraints();
        let lu = LUDecomposition::decompose(&a.select_columns(basis), tolerance.epsilon())
            .ok_or_else(|| SolveError::SingularBasis(basis.to_vec()))?;

        let basis_cost = basis.iter().map(|&j| program.cost()[j]).collect::<Vec<_>>();
        let dual = lu.solve_transpose(&basis_cost);

        let mut cost = program.cost().iter()
            .zip(a.transpose_mul_vector(&dual))
            .map(|(c, ya)| c - ya)
            .collect::<Vec<_>>();
        let constant = program.constant() + inner_product(&dual, program.b());

        let columns = (0..a.nr_columns())
            .map(|j| lu.solve(&a.column(j)))
            .collect::<Vec<_>>();
        let mut constraints = Matrix::zeros(a.nr_rows(), a.nr_columns());
        for (j, column) in columns.iter().enumerate() {
            for (i, &value) in column.iter().enumerate() {
                constraints.set(i, j, value);
            }
        }

        // Basic columns are unit vectors with zero cost by construction, remove the rounding noise
        for (i, &j) in basis.iter().enumerate() {
            for k in 0..basis.len() {
                constraints.set(k, j, if k == i { 1f64 } else { 0f64 });
            }
            cost[j] = 0f64;
        }

        let b = lu.solve(program.b());

        Ok(Self { constraints, b, cost, constant, dual })
    }

    /// Column `j` of `A'`.
    pub fn column(&self, j: usize) -> Vec<f64> {
        self.constraints.column(j)
    }
}

impl Display for CanonicalForm {
    fn fmt(&self, f: &mut Formatter) -> FormatResult {
        writeln!(f, "Maximize: {} + {:.2}", format_terms(self.cost.iter().copied()), self.constant)?;
        writeln!(f, "Subject to:")?;
        for (row, rhs) in self.constraints.rows().zip(&self.b) {
            writeln!(f, "{} = {:.2}", format_terms(row.iter().copied()), rhs)?;
        }
        Ok(())
    }
}
