//! # Linear programs in equality form
//!
//! A linear program `max/min c^T x + constant` subject to `Ax = b`, `x >= 0`. This is the only form
//! the two phase method accepts; conversion from inequalities happens elsewhere.
use std::fmt::{Display, Formatter, Result as FormatResult};

use itertools::Itertools;

use crate::algorithm::utilities::remove_indices;
use crate::data::linear_algebra::matrix::{inner_product, max_abs, Matrix};
use crate::data::linear_program::elements::{ConstraintType, Objective};
use crate::error::SolveError;

/// An equality constrained linear program over nonnegative variables.
///
/// Dimensions are validated at construction and can't change afterwards, apart from removing
/// redundant rows into a new value.
#[derive(Clone, Debug, PartialEq)]
pub struct LinearProgram {
    /// All coefficients, `m x n`.
    constraints: Matrix<f64>,
    /// Right hand side, length `m`.
    b: Vec<f64>,
    /// Cost vector, length `n`.
    cost: Vec<f64>,
    objective: Objective,
    /// Added to `c^T x` to get the objective value.
    constant: f64,
    /// The equation type of all rows, ordered by index.
    constraint_types: Vec<ConstraintType>,
}

impl LinearProgram {
    /// Create a new linear program, validating its dimensions.
    ///
    /// # Errors
    ///
    /// * `Shape` if the dimensions don't agree or if there are more rows than columns.
    /// * `NonFiniteCoefficient` for infinite or NaN values.
    /// * `UnsupportedConstraint` for any constraint that is not an equality.
    pub fn new(
        constraints: Matrix<f64>,
        b: Vec<f64>,
        cost: Vec<f64>,
        objective: Objective,
        constant: f64,
        constraint_types: Vec<ConstraintType>,
    ) -> Result<Self, SolveError> {
        let (m, n) = (constraints.nr_rows(), constraints.nr_columns());
        if b.len() != m {
            return Err(SolveError::Shape(format!("A has {} rows but b has length {}", m, b.len())));
        }
        if cost.len() != n {
            return Err(SolveError::Shape(format!("A has {} columns but c has length {}", n, cost.len())));
        }
        if constraint_types.len() != m {
            return Err(SolveError::Shape(format!(
                "A has {} rows but {} constraint types are given", m, constraint_types.len(),
            )));
        }
        if m > n {
            return Err(SolveError::Shape(format!("more rows ({}) than columns ({})", m, n)));
        }

        if !constraints.is_finite() {
            return Err(SolveError::NonFiniteCoefficient("in A".into()));
        }
        if let Some(i) = b.iter().position(|v| !v.is_finite()) {
            return Err(SolveError::NonFiniteCoefficient(format!("b[{}]", i)));
        }
        if let Some(j) = cost.iter().position(|v| !v.is_finite()) {
            return Err(SolveError::NonFiniteCoefficient(format!("c[{}]", j)));
        }
        if !constant.is_finite() {
            return Err(SolveError::NonFiniteCoefficient("constant".into()));
        }

        if let Some((row, &constraint_type)) = constraint_types.iter()
            .find_position(|&&constraint_type| constraint_type != ConstraintType::Equal) {
            return Err(SolveError::UnsupportedConstraint { row, constraint_type });
        }

        Ok(Self { constraints, b, cost, objective, constant, constraint_types })
    }

    /// Create a linear program with only equality constraints from row major data.
    ///
    /// # Errors
    ///
    /// See `new`; rows that don't match the length of `cost` are a `Shape` error.
    pub fn from_rows(
        rows: Vec<Vec<f64>>,
        b: Vec<f64>,
        cost: Vec<f64>,
        objective: Objective,
        constant: f64,
    ) -> Result<Self, SolveError> {
        let nr_rows = rows.len();
        let constraints = Matrix::from_rows(rows, cost.len())
            .ok_or_else(|| SolveError::Shape(format!("not all rows of A have length {}", cost.len())))?;

        Self::new(constraints, b, cost, objective, constant, vec![ConstraintType::Equal; nr_rows])
    }

    /// Make this a maximization problem by negating the cost and the constant if it is a
    /// minimization problem.
    ///
    /// Idempotent: calling it on a maximization problem does nothing.
    pub fn normalize_to_max(&mut self) {
        if self.objective == Objective::Minimize {
            for value in &mut self.cost {
                *value = -*value;
            }
            self.constant = -self.constant;
            self.objective = Objective::Maximize;
        }
    }

    /// Make sure `b >= 0` by negating each row with a negative right hand side.
    ///
    /// # Return value
    ///
    /// The sorted indices of the rows that were negated.
    pub fn row_normalize(&mut self) -> Vec<usize> {
        let negated = self.b.iter()
            .positions(|&value| value < 0f64)
            .collect::<Vec<_>>();

        for &row in &negated {
            self.constraints.multiply_row(row, -1f64);
            self.b[row] = -self.b[row];
        }

        negated
    }

    /// Copy of this program without the given rows.
    ///
    /// # Arguments
    ///
    /// * `rows`: Sorted, unique row indices.
    pub fn without_rows(&self, rows: &[usize]) -> Self {
        debug_assert!(rows.iter().tuple_windows().all(|(a, b)| a < b));
        debug_assert!(rows.iter().all(|&i| i < self.nr_rows()));

        let mut b = self.b.clone();
        remove_indices(&mut b, rows);
        let mut constraint_types = self.constraint_types.clone();
        remove_indices(&mut constraint_types, rows);

        Self {
            constraints: self.constraints.without_rows(rows),
            b,
            cost: self.cost.clone(),
            objective: self.objective,
            constant: self.constant,
            constraint_types,
        }
    }

    /// Objective value `c^T x + constant` in the direction of this program.
    pub fn objective_value(&self, x: &[f64]) -> f64 {
        inner_product(&self.cost, x) + self.constant
    }

    /// The cost vector as it would be after `normalize_to_max`.
    pub fn maximization_cost(&self) -> Vec<f64> {
        match self.objective {
            Objective::Maximize => self.cost.clone(),
            Objective::Minimize => self.cost.iter().map(|v| -v).collect(),
        }
    }

    /// Largest absolute value among all coefficients in `A`, `b` and `c`.
    ///
    /// Used to scale tolerances.
    pub fn largest_magnitude(&self) -> f64 {
        self.constraints.max_abs()
            .max(max_abs(&self.b))
            .max(max_abs(&self.cost))
    }

    /// The constraint matrix `A`.
    pub fn constraints(&self) -> &Matrix<f64> {
        &self.constraints
    }

    /// The right hand side `b`.
    pub fn b(&self) -> &[f64] {
        &self.b
    }

    /// The cost vector `c`.
    pub fn cost(&self) -> &[f64] {
        &self.cost
    }

    /// Direction of optimization.
    pub fn objective(&self) -> Objective {
        self.objective
    }

    /// Constant term of the objective function.
    pub fn constant(&self) -> f64 {
        self.constant
    }

    /// Type of each row, all `Equal` for a solvable problem.
    pub fn constraint_types(&self) -> &[ConstraintType] {
        &self.constraint_types
    }

    /// Number of constraints `m`.
    pub fn nr_rows(&self) -> usize {
        self.constraints.nr_rows()
    }

    /// Number of variables `n`.
    pub fn nr_columns(&self) -> usize {
        self.constraints.nr_columns()
    }

    /// Number of variables in any basis, equal to the number of rows.
    pub fn basis_size(&self) -> usize {
        self.nr_rows()
    }
}

/// Format a linear combination like `3.00x1 + -2.00x2`, using one-based variable names.
pub(crate) fn format_terms(coefficients: impl IntoIterator<Item = f64>) -> String {
    coefficients.into_iter()
        .enumerate()
        .map(|(j, value)| format!("{:.2}x{}", value, j + 1))
        .join(" + ")
}

impl Display for LinearProgram {
    fn fmt(&self, f: &mut Formatter) -> FormatResult {
        write!(f, "{}: {}", self.objective, format_terms(self.cost.iter().copied()))?;
        if self.constant != 0f64 {
            write!(f, " + {:.2}", self.constant)?;
        }
        writeln!(f)?;
        writeln!(f, "Subject to:")?;
        for ((row, constraint_type), rhs) in self.constraints.rows().zip(&self.constraint_types).zip(&self.b) {
            writeln!(f, "{} {} {:.2}", format_terms(row.iter().copied()), constraint_type, rhs)?;
        }
        write!(f, "x >= 0")
    }
}
