//! # The Simplex algorithm
//!
//! This module contains all data structures and logic specific to the simplex algorithm. The
//! algorithm is implemented as described in chapters 2 and 4 of Combinatorial Optimization, a book
//! by Christos H. Papadimitriou and Kenneth Steiglitz.
//!
//! The first phase finds a basic feasible solution by minimizing the sum of artificial variables,
//! the second phase optimizes the original objective from there.
use log::{info, warn};

use crate::algorithm::certificate::{certify_infeasibility, certify_unboundedness};
use crate::algorithm::OptimizationResult;
use crate::algorithm::options::SolverOptions;
use crate::algorithm::two_phase::iteration::{IterationObserver, IterationRecord, Silent, WithSnapshots};
use crate::algorithm::two_phase::phase_one::{FeasibilityResult, Rank};
use crate::algorithm::two_phase::simplex::Terminal;
use crate::algorithm::two_phase::strategy::pivot_rule::{Bland, LargestCoefficient, PivotRule, PivotRuleKind};
use crate::data::linear_program::equality_form::LinearProgram;
use crate::error::{CertificateKind, SolveError};

pub mod tableau;
pub mod strategy;
pub mod simplex;
pub mod iteration;
pub mod phase_one;
pub mod phase_two;

/// Solves a linear program in equality form with the two phase method.
pub struct TwoPhase<'a> {
    program: &'a LinearProgram,
    options: SolverOptions,
}

impl<'a> TwoPhase<'a> {
    /// Prepare a solve, nothing is computed until one of the `solve` methods is called.
    pub fn new(program: &'a LinearProgram, options: SolverOptions) -> Self {
        Self { program, options }
    }

    /// Solve the problem.
    ///
    /// # Return value
    ///
    /// Optimum, or a certificate of infeasibility or unboundedness. Errors during the solve are
    /// reported as `OptimizationResult::Failed`.
    pub fn solve(&self) -> OptimizationResult {
        self.solve_with(&mut Silent)
    }

    /// Solve the problem and keep a record of every basis change in both phases.
    ///
    /// The records contain snapshots of the canonical form if the options ask for it.
    pub fn solve_recording(&self) -> (OptimizationResult, Vec<IterationRecord>) {
        if self.options.record_iterations() {
            let mut observer = WithSnapshots::default();
            let result = self.solve_with(&mut observer);
            (result, observer.0)
        } else {
            let mut records: Vec<IterationRecord> = Vec::new();
            let result = self.solve_with(&mut records);
            (result, records)
        }
    }

    /// Solve the problem, passing a record of every basis change to `observer`.
    pub fn solve_with(&self, observer: &mut dyn IterationObserver) -> OptimizationResult {
        let result = match self.options.pivot_rule() {
            PivotRuleKind::Bland => self.try_solve::<Bland>(observer),
            PivotRuleKind::LargestCoefficient => self.try_solve::<LargestCoefficient>(observer),
        };

        result.unwrap_or_else(|reason| {
            warn!("Solve failed: {}", reason);
            OptimizationResult::Failed { reason }
        })
    }

    fn try_solve<PR: PivotRule>(
        &self,
        observer: &mut dyn IterationObserver,
    ) -> Result<OptimizationResult, SolveError> {
        let mut normalized = self.program.clone();
        let negated_rows = normalized.row_normalize();
        info!(
            "Phase one: {} rows, {} columns, {} rows negated",
            normalized.nr_rows(), normalized.nr_columns(), negated_rows.len(),
        );

        let tolerance = self.options.tolerance_for(self.program);
        match phase_one::primal::<PR>(&normalized, &self.options, observer)? {
            FeasibilityResult::Infeasible { mut dual, .. } => {
                // `y` proves infeasibility of the normalized rows, flip it back for the original
                for &row in &negated_rows {
                    dual[row] = -dual[row];
                }
                if !certify_infeasibility(self.program, &dual, &tolerance) {
                    warn!("Certificate of infeasibility doesn't hold for the original rows");
                    return Err(SolveError::UnconfirmedCertificate(CertificateKind::Infeasibility));
                }

                Ok(OptimizationResult::Infeasible { dual_certificate: dual })
            },
            FeasibilityResult::Feasible { basis, rank, iterations: phase_one_iterations } => {
                if let Rank::Deficient(rows) = &rank {
                    info!("Removing redundant rows {:?}", rows);
                }
                let outcome = phase_two::primal::<PR>(&normalized, basis, &rank, &self.options, observer)?;
                let iterations = phase_one_iterations + outcome.iterations;

                match outcome.terminal {
                    Terminal::Optimal { solution, objective_value } => {
                        info!("Optimal after {} iterations, objective value {}", iterations, objective_value);
                        Ok(OptimizationResult::Optimal { solution, objective_value, basis: outcome.basis, iterations })
                    },
                    Terminal::Unbounded(witness) => {
                        info!("Unbounded after {} iterations", iterations);
                        if !certify_unboundedness(self.program, &witness.point, &witness.direction, &tolerance) {
                            warn!("Direction of unboundedness doesn't hold for the original problem");
                            return Err(SolveError::UnconfirmedCertificate(CertificateKind::Unboundedness));
                        }

                        Ok(OptimizationResult::Unbounded { witness: (witness.point, witness.direction) })
                    },
                }
            },
        }
    }
}

#[cfg(test)]
mod test {
    use approx::assert_abs_diff_eq;

    use crate::algorithm::OptimizationResult;
    use crate::algorithm::options::SolverOptions;
    use crate::algorithm::two_phase::iteration::Phase;
    use crate::algorithm::two_phase::strategy::pivot_rule::PivotRuleKind;
    use crate::algorithm::two_phase::TwoPhase;
    use crate::data::linear_program::elements::Objective;
    use crate::data::linear_program::equality_form::LinearProgram;
    use crate::error::{CertificateKind, SolveError};

    fn program() -> LinearProgram {
        // x1 + x2 + x3 = 4, x1 + 2 x2 + x4 = 6, maximize x1 + 3 x2
        LinearProgram::from_rows(
            vec![
                vec![1f64, 1f64, 1f64, 0f64],
                vec![1f64, 2f64, 0f64, 1f64],
            ],
            vec![4f64, 6f64],
            vec![1f64, 3f64, 0f64, 0f64],
            Objective::Maximize,
            0f64,
        ).unwrap()
    }

    #[test]
    fn optimal() {
        let lp = program();
        for pivot_rule in [PivotRuleKind::Bland, PivotRuleKind::LargestCoefficient] {
            let options = SolverOptions::builder().pivot_rule(pivot_rule).build().unwrap();
            match TwoPhase::new(&lp, options).solve() {
                OptimizationResult::Optimal { solution, objective_value, basis, .. } => {
                    // x1 = 0, x2 = 3
                    assert_abs_diff_eq!(objective_value, 9f64, epsilon = 1e-9);
                    assert_abs_diff_eq!(lp.objective_value(&solution), 9f64, epsilon = 1e-9);
                    assert_eq!(basis.len(), 2);
                },
                other => panic!("expected an optimum, got {:?}", other),
            }
        }
    }

    #[test]
    fn recording() {
        let lp = program();
        let options = SolverOptions::builder().record_iterations(true).build().unwrap();
        let (result, records) = TwoPhase::new(&lp, options).solve_recording();
        let iterations = match result {
            OptimizationResult::Optimal { iterations, .. } => iterations,
            other => panic!("expected an optimum, got {:?}", other),
        };
        assert_eq!(records.len(), iterations as usize);
        assert!(records.iter().all(|record| record.canonical.is_some()));
        assert_eq!(records[0].phase, Phase::One);
        assert!(records.windows(2).all(|pair| pair[0].phase == Phase::One || pair[1].phase == Phase::Two));

        let (_, records) = TwoPhase::new(&lp, SolverOptions::default()).solve_recording();
        assert!(records.iter().all(|record| record.canonical.is_none()));
    }

    #[test]
    fn iteration_limit() {
        let lp = program();
        let options = SolverOptions::builder().max_iterations(1).build().unwrap();
        assert_eq!(
            TwoPhase::new(&lp, options).solve(),
            OptimizationResult::Failed { reason: SolveError::IterationLimitExceeded(1) },
        );
    }

    #[test]
    fn unconfirmed_certificate() {
        // Unbounded along x1, but 49 * (1 / 49) doesn't round to exactly 1
        let lp = LinearProgram::from_rows(
            vec![vec![-1f64, 49f64]],
            vec![49f64],
            vec![1f64, 0f64],
            Objective::Maximize,
            0f64,
        ).unwrap();
        let options = SolverOptions::builder().tolerance(1e-300).build().unwrap();
        assert_eq!(
            TwoPhase::new(&lp, options).solve(),
            OptimizationResult::Failed {
                reason: SolveError::UnconfirmedCertificate(CertificateKind::Unboundedness),
            },
        );
        assert!(matches!(
            TwoPhase::new(&lp, SolverOptions::default()).solve(),
            OptimizationResult::Unbounded { .. },
        ));
    }
}
