//! # Algorithms
use std::fmt::{Display, Formatter, Result as FormatResult};

use itertools::Itertools;

use crate::algorithm::options::SolverOptions;
use crate::algorithm::two_phase::TwoPhase;
use crate::data::linear_program::equality_form::LinearProgram;
use crate::error::SolveError;

pub mod two_phase;
pub mod certificate;
pub mod options;
pub mod utilities;

/// A problem formulation that can be solved.
pub trait Solve {
    /// Solve this problem.
    ///
    /// # Return value
    ///
    /// Whether the problem is feasible, and if so, a solution if the problem is bounded.
    fn solve(&self, options: &SolverOptions) -> OptimizationResult;
}

impl Solve for LinearProgram {
    fn solve(&self, options: &SolverOptions) -> OptimizationResult {
        TwoPhase::new(self, options.clone()).solve()
    }
}

/// A linear program is either infeasible, unbounded or has a finite optimum.
///
/// This is determined as the result of an algorithm. The non optimal verdicts come with a witness
/// that can be checked independently with the functions in `certificate`.
#[derive(Clone, Debug, PartialEq)]
pub enum OptimizationResult {
    /// A finite optimum.
    Optimal {
        /// Optimal basic feasible solution.
        solution: Vec<f64>,
        /// Objective value of `solution` in the direction of the problem, constant included.
        objective_value: f64,
        /// Columns in the final basis. Has fewer elements than the problem has rows if rows were
        /// removed as redundant.
        basis: Vec<usize>,
        /// Basis changes in both phases together.
        iterations: u32,
    },
    /// No nonnegative solution of `Ax = b` exists.
    Infeasible {
        /// Vector `y` with `A^T y >= 0` and `b^T y < 0`.
        dual_certificate: Vec<f64>,
    },
    /// The objective can be improved without bound.
    Unbounded {
        /// A feasible point `x_bar` and a nonnegative ray `r` with `A r = 0` along which the
        /// objective improves.
        witness: (Vec<f64>, Vec<f64>),
    },
    /// The solve did not complete.
    Failed {
        /// Why the solve stopped.
        reason: SolveError,
    },
}

impl Display for OptimizationResult {
    fn fmt(&self, f: &mut Formatter) -> FormatResult {
        let format_vector = |values: &[f64]| values.iter().map(|v| format!("{}", v)).join(", ");

        match self {
            OptimizationResult::Optimal { solution, objective_value, basis, iterations } => {
                writeln!(f, "Optimal after {} iterations", iterations)?;
                writeln!(f, "Objective value: {}", objective_value)?;
                writeln!(f, "Solution: [{}]", format_vector(solution))?;
                write!(f, "Basis: {:?}", basis)
            },
            OptimizationResult::Infeasible { dual_certificate } => {
                writeln!(f, "Infeasible")?;
                write!(f, "Certificate y: [{}]", format_vector(dual_certificate))
            },
            OptimizationResult::Unbounded { witness: (point, direction) } => {
                writeln!(f, "Unbounded")?;
                writeln!(f, "Feasible point: [{}]", format_vector(point))?;
                write!(f, "Direction: [{}]", format_vector(direction))
            },
            OptimizationResult::Failed { reason } => write!(f, "Failed: {}", reason),
        }
    }
}
