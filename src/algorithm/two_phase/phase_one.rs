//! # Phase one
//!
//! Computing a basic feasible solution by solving an auxiliary problem in which every row has an
//! artificial variable.
use log::{debug, info, warn};

use crate::algorithm::certificate::certify_infeasibility;
use crate::algorithm::options::SolverOptions;
use crate::algorithm::two_phase::iteration::{IterationObserver, Phase};
use crate::algorithm::two_phase::simplex::{SimplexEngine, Terminal};
use crate::algorithm::two_phase::strategy::pivot_rule::PivotRule;
use crate::data::linear_algebra::matrix::Matrix;
use crate::data::linear_program::elements::{ConstraintType, Objective};
use crate::data::linear_program::equality_form::LinearProgram;
use crate::error::{CertificateKind, SolveError};

/// The problem `min 1^T x_a` subject to `Ax + I x_a = b`, `x, x_a >= 0`.
///
/// It is stored in maximization form. The artificial variables `x_a` are the last `m` columns;
/// the artificial variable of row `i` has column index `n + i`.
#[derive(Clone, Debug, PartialEq)]
pub struct AuxiliaryProgram {
    program: LinearProgram,
    nr_original_columns: usize,
}

impl AuxiliaryProgram {
    /// Append an artificial variable to each row.
    ///
    /// # Arguments
    ///
    /// * `program`: Problem with a nonnegative right hand side, see `LinearProgram::row_normalize`.
    pub fn build(program: &LinearProgram) -> Result<Self, SolveError> {
        debug_assert!(program.b().iter().all(|&v| v >= 0f64));

        let (m, n) = (program.nr_rows(), program.nr_columns());
        let constraints = program.constraints().append_columns(&Matrix::identity(m));
        let cost = vec![0f64; n].into_iter()
            .chain(vec![1f64; m])
            .collect();

        let mut auxiliary = LinearProgram::new(
            constraints,
            program.b().to_vec(),
            cost,
            Objective::Minimize,
            0f64,
            vec![ConstraintType::Equal; m],
        )?;
        auxiliary.normalize_to_max();

        Ok(Self { program: auxiliary, nr_original_columns: n })
    }

    /// The artificial columns, the basic solution is `x_a = b`.
    pub fn initial_basis(&self) -> Vec<usize> {
        (self.nr_original_columns..self.program.nr_columns()).collect()
    }

    /// Whether a column of the auxiliary problem is an artificial variable.
    pub fn is_artificial(&self, j: usize) -> bool {
        debug_assert!(j < self.program.nr_columns());

        j >= self.nr_original_columns
    }

    /// The auxiliary problem itself, in maximization form.
    pub fn program(&self) -> &LinearProgram {
        &self.program
    }

    /// Number of columns before the artificial variables were appended.
    pub fn nr_original_columns(&self) -> usize {
        self.nr_original_columns
    }
}

/// LP's can be either feasible (allowing at least one solution) or infeasible (allowing no
/// solutions).
///
/// If the problem is feasible, it can either have full rank, or be rank deficient.
#[derive(Clone, Debug, PartialEq)]
pub enum FeasibilityResult {
    /// The problem is feasible.
    Feasible {
        /// Columns of the original problem forming a feasible basis, one for each row that is kept.
        basis: Vec<usize>,
        /// Whether the problem needs rows to be removed.
        rank: Rank,
        /// Basis changes, including those that drive artificial variables out of the basis.
        iterations: u32,
    },
    /// The problem is not feasible.
    Infeasible {
        /// Vector `y` with `A^T y >= 0` and `b^T y < 0`.
        dual: Vec<f64>,
        /// Basis changes made by the first phase.
        iterations: u32,
    },
}

/// A matrix or linear program either has full rank, or be rank deficient.
///
/// In case it is rank deficient, a sorted, deduplicated list of (row)indices should be provided,
/// that when removed, makes the matrix or linear program full rank.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Rank {
    /// The matrix is full rank, no rows need to be removed.
    Full,
    /// The `Vec<usize>` is sorted and contains no duplicate values.
    Deficient(Vec<usize>),
}

/// Reduces the artificial cost of the basic feasible solution to zero, if possible. In doing so, a
/// basic feasible solution to the standard form linear program is found.
///
/// # Arguments
///
/// * `program`: Problem with a nonnegative right hand side.
/// * `options`: Tolerance, pivot cap.
/// * `observer`: Receives a record of each basis change.
///
/// # Return value
///
/// A feasible basis for the problem with redundant rows removed, or a certificate of
/// infeasibility.
pub(crate) fn primal<PR: PivotRule>(
    program: &LinearProgram,
    options: &SolverOptions,
    observer: &mut dyn IterationObserver,
) -> Result<FeasibilityResult, SolveError> {
    let auxiliary = AuxiliaryProgram::build(program)?;
    let mut engine = SimplexEngine::<PR>::new(auxiliary.program(), auxiliary.initial_basis(), options)?
        .in_phase(Phase::One);

    match engine.run(observer)? {
        Terminal::Unbounded(_) => Err(SolveError::UnboundedAuxiliary),
        Terminal::Optimal { objective_value, .. } => {
            let tolerance = *engine.tableau().tolerance();
            // Minus the sum of the artificial variables
            if tolerance.is_zero(objective_value) {
                let rows_to_remove = remove_artificial_basis_variables(&mut engine, &auxiliary, observer)?;
                let basis = engine.tableau().basis().iter()
                    .copied()
                    .filter(|&j| !auxiliary.is_artificial(j))
                    .collect();
                let rank = if rows_to_remove.is_empty() {
                    Rank::Full
                } else {
                    Rank::Deficient(rows_to_remove)
                };
                info!("Phase one found a feasible basis after {} iterations, rank {:?}", engine.iterations(), rank);

                Ok(FeasibilityResult::Feasible { basis, rank, iterations: engine.iterations() })
            } else {
                // The auxiliary problem is optimal, so `c' = c - A^T y <= 0` for the original
                // columns which have cost zero. That gives `A^T y >= 0` and `b^T y < 0`.
                let dual = engine.tableau().dual().to_vec();
                info!("Phase one ended with artificial cost {}, problem is infeasible", objective_value);
                if !certify_infeasibility(program, &dual, &tolerance) {
                    warn!("Dual vector {:?} could not be confirmed as a certificate of infeasibility", dual);
                    return Err(SolveError::UnconfirmedCertificate(CertificateKind::Infeasibility));
                }

                Ok(FeasibilityResult::Infeasible { dual, iterations: engine.iterations() })
            }
        },
    }
}

/// Removes all artificial variables from the tableau by making a basis change "at zero level", or
/// without change of cost of the current solution.
///
/// # Arguments
///
/// * `engine`: Engine at an optimum of the auxiliary problem with cost zero.
/// * `auxiliary`: Problem the engine is solving.
/// * `observer`: Receives a record of each basis change.
///
/// # Return value
///
/// A `Vec` with indices of rows that are redundant. Is sorted as a side effect of the algorithm.
///
/// An artificial variable that can't leave the basis has a canonical row without nonzeros in the
/// original columns. That row is a linear combination of the other rows in which the row of the
/// artificial variable itself has a nonzero coefficient, so that row can be removed.
fn remove_artificial_basis_variables<PR: PivotRule>(
    engine: &mut SimplexEngine<PR>,
    auxiliary: &AuxiliaryProgram,
    observer: &mut dyn IterationObserver,
) -> Result<Vec<usize>, SolveError> {
    // (artificial column, row it is basic in), pivots on other rows don't change these pairs
    let mut artificial_basis_positions = engine.tableau().basis().iter()
        .enumerate()
        .filter(|&(_, &j)| auxiliary.is_artificial(j))
        .map(|(row, &j)| (j, row))
        .collect::<Vec<_>>();
    artificial_basis_positions.sort_unstable();
    let mut rows_to_remove = Vec::new();

    for (artificial, pivot_row) in artificial_basis_positions {
        let tableau = engine.tableau();
        let pivot_column = (0..auxiliary.nr_original_columns())
            .filter(|&j| !tableau.is_in_basis(j))
            .find(|&j| !tableau.tolerance().is_zero(tableau.generate_element(pivot_row, j)));

        if let Some(pivot_column) = pivot_column {
            let record = engine.pivot(pivot_column, pivot_row, observer.wants_snapshots())?;
            observer.observe(&record);
        } else {
            let row = artificial - auxiliary.nr_original_columns();
            debug!("Row {} is redundant", row);
            rows_to_remove.push(row);
        }
    }

    debug_assert!(rows_to_remove.windows(2).all(|pair| pair[0] < pair[1]));
    Ok(rows_to_remove)
}
