//! # Errors
//!
//! Everything that can go wrong while setting up or running the two phase method. Genuine
//! properties of a linear program (infeasibility, unboundedness) are not errors; those are
//! reported through `OptimizationResult`.
use thiserror::Error;

use crate::data::linear_program::elements::ConstraintType;

/// Reasons a solve can't start or can't finish.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolveError {
    /// The dimensions of the constraint matrix, right hand side, cost vector and constraint types
    /// don't agree, or there are more rows than columns.
    #[error("inconsistent dimensions: {0}")]
    Shape(String),
    /// A coefficient is infinite or not a number.
    #[error("coefficient {0} is not finite")]
    NonFiniteCoefficient(String),
    /// Only equality constraints can be solved.
    #[error("constraint {row} has type {constraint_type:?}, only equality constraints are supported")]
    UnsupportedConstraint {
        /// Index of the offending row.
        row: usize,
        /// Type the row was given.
        constraint_type: ConstraintType,
    },
    /// The columns selected as the basis don't form an invertible matrix.
    ///
    /// This indicates a bug in basis selection; it is never expected during a well formed solve.
    #[error("basis {0:?} is singular")]
    SingularBasis(Vec<usize>),
    /// A basis has the wrong length, repeats a column or refers to a column that doesn't exist, or
    /// its basic solution isn't feasible.
    #[error("invalid basis {basis:?}: {reason}")]
    InvalidBasis {
        /// Column index for each row, as supplied.
        basis: Vec<usize>,
        /// What is wrong with it.
        reason: String,
    },
    /// A supplied solution isn't the basic solution belonging to the supplied basis.
    #[error("solution is not the basic solution of basis {0:?}")]
    InconsistentSolution(Vec<usize>),
    /// No column has a positive relative cost. The current basis is optimal.
    #[error("no entering variable, the current basis is optimal")]
    NoEnteringVariable,
    /// The pivot cap was reached before the method terminated.
    #[error("no optimal basis found within {0} iterations")]
    IterationLimitExceeded(u32),
    /// The auxiliary problem of the first phase was found to be unbounded, which is impossible for
    /// a correctly built auxiliary problem.
    #[error("auxiliary problem is unbounded")]
    UnboundedAuxiliary,
    /// A solver option is out of range.
    #[error("invalid parameter {parameter}: {message}")]
    InvalidParameter {
        /// Name of the option.
        parameter: &'static str,
        /// Why the value was rejected.
        message: String,
    },
    /// The method terminated, but the claim it makes about the problem doesn't hold when checked
    /// against the problem data with the working tolerance.
    ///
    /// Usually a sign that the tolerance is too tight for the magnitudes involved.
    #[error("{0:?} certificate could not be confirmed")]
    UnconfirmedCertificate(CertificateKind),
}

/// The claims a solve can end with, each of which is checked independently before it is returned.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CertificateKind {
    /// The basis is primal feasible and no relative cost is positive.
    Optimality,
    /// The dual vector proves that `Ax = b, x >= 0` has no solution.
    Infeasibility,
    /// The point is feasible and the direction improves the objective without bound.
    Unboundedness,
}
