//! # Phase two
//!
//! Optimizing the original problem, starting from the basic feasible solution found in phase one.
use std::borrow::Cow;

use log::info;

use crate::algorithm::options::SolverOptions;
use crate::algorithm::two_phase::iteration::{IterationObserver, Phase};
use crate::algorithm::two_phase::phase_one::Rank;
use crate::algorithm::two_phase::simplex::{SimplexEngine, Terminal};
use crate::algorithm::two_phase::strategy::pivot_rule::PivotRule;
use crate::data::linear_program::equality_form::LinearProgram;
use crate::error::SolveError;

/// Final state of the second phase.
#[derive(Clone, Debug, PartialEq)]
pub struct Outcome {
    /// How the pivoting loop ended.
    pub terminal: Terminal,
    /// Basis when the phase ended, one column for each row that was kept.
    pub basis: Vec<usize>,
    /// Basis changes made by the second phase.
    pub iterations: u32,
}

/// Reduces the cost of the basic feasible solution to the minimum.
///
/// While calling this method, a number of requirements should be satisfied:
/// - There should be a valid basis (not necessarily optimal <=> dual feasible <=> c >= 0)
/// - All constraint values need to be positive (primary feasibility)
///
/// # Arguments
///
/// * `program`: Problem in the direction the caller stated it.
/// * `basis`: Feasible basis from phase one, with one column for each row that is not redundant.
/// * `rank`: Rows to remove before the basis fits.
///
/// # Return value
///
/// The optimum or a direction of unboundedness. The problem can't be infeasible, as a feasible
/// solution is needed to start using this method. Because the removed rows are implied by the
/// others, both are also valid for `program` itself.
pub(crate) fn primal<PR: PivotRule>(
    program: &LinearProgram,
    basis: Vec<usize>,
    rank: &Rank,
    options: &SolverOptions,
    observer: &mut dyn IterationObserver,
) -> Result<Outcome, SolveError> {
    let program = match rank {
        Rank::Full => Cow::Borrowed(program),
        Rank::Deficient(rows_to_remove) => Cow::Owned(program.without_rows(rows_to_remove)),
    };
    info!("Phase two: {} rows, {} columns", program.nr_rows(), program.nr_columns());

    let mut engine = SimplexEngine::<PR>::new(&program, basis, options)?.in_phase(Phase::Two);
    let terminal = engine.run(observer)?;

    let iterations = engine.iterations();
    let basis = engine.into_tableau().into_basis_and_solution().0;
    Ok(Outcome { terminal, basis, iterations })
}

#[cfg(test)]
mod test {
    use approx::assert_abs_diff_eq;

    use crate::algorithm::options::SolverOptions;
    use crate::algorithm::two_phase::iteration::Silent;
    use crate::algorithm::two_phase::phase_one::Rank;
    use crate::algorithm::two_phase::phase_two::primal;
    use crate::algorithm::two_phase::simplex::Terminal;
    use crate::algorithm::two_phase::strategy::pivot_rule::Bland;
    use crate::data::linear_program::elements::Objective;
    use crate::data::linear_program::equality_form::LinearProgram;

    #[test]
    fn with_redundant_row() {
        let lp = LinearProgram::from_rows(
            vec![vec![1f64, 1f64], vec![2f64, 2f64]],
            vec![1f64, 2f64],
            vec![1f64, 0f64],
            Objective::Maximize,
            0f64,
        ).unwrap();
        let outcome = primal::<Bland>(&lp, vec![1], &Rank::Deficient(vec![1]), &SolverOptions::default(), &mut Silent)
            .unwrap();

        assert_eq!(outcome.basis, vec![0]);
        assert_eq!(outcome.iterations, 1);
        match outcome.terminal {
            Terminal::Optimal { solution, objective_value } => {
                assert_abs_diff_eq!(objective_value, 1f64, epsilon = 1e-9);
                assert_eq!(solution, vec![1f64, 0f64]);
            },
            Terminal::Unbounded(_) => panic!("problem is bounded"),
        }
    }

    #[test]
    fn basis_mismatch() {
        let lp = LinearProgram::from_rows(
            vec![vec![1f64, 1f64], vec![2f64, 2f64]],
            vec![1f64, 2f64],
            vec![1f64, 0f64],
            Objective::Maximize,
            0f64,
        ).unwrap();
        assert!(primal::<Bland>(&lp, vec![1], &Rank::Full, &SolverOptions::default(), &mut Silent).is_err());
    }
}
