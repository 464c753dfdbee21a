//! # The pivoting loop
//!
//! Runs the primal simplex method from a feasible basis until the basis is optimal, or a direction
//! of unboundedness is found.
use log::{debug, trace, warn};

use crate::algorithm::certificate::{certify_unboundedness, check_optimality};
use crate::algorithm::options::SolverOptions;
use crate::algorithm::two_phase::iteration::{IterationObserver, IterationRecord, Phase};
use crate::algorithm::two_phase::strategy::pivot_rule::{Bland, PivotRule};
use crate::algorithm::two_phase::tableau::{debug_assert_in_basic_feasible_solution_state, Tableau};
use crate::data::linear_program::elements::Objective;
use crate::data::linear_program::equality_form::LinearProgram;
use crate::error::{CertificateKind, SolveError};

/// Executes simplex iterations on a single problem.
///
/// The engine borrows the problem and owns the basis and solution. It starts from a feasible basis
/// supplied by the caller and only ever moves to adjacent feasible bases.
pub struct SimplexEngine<'a, PR: PivotRule = Bland> {
    tableau: Tableau<'a>,
    rule: PR,
    phase: Phase,
    /// Basis changes so far.
    iterations: u32,
    max_iterations: u32,
    /// Direction of the problem as the caller stated it.
    objective: Objective,
}

/// Result of a single call to `SimplexEngine::step`.
#[derive(Clone, Debug, PartialEq)]
pub enum Step {
    /// The basis changed.
    Pivoted(IterationRecord),
    /// The current basis is optimal, nothing changed.
    Optimal,
    /// The objective can be increased without bound, nothing changed.
    Unbounded(UnboundedWitness),
}

/// A feasible point and a ray along which the objective improves without bound.
///
/// All points `point + t * direction` with `t >= 0` are feasible.
#[derive(Clone, Debug, PartialEq)]
pub struct UnboundedWitness {
    /// Basic feasible solution at which the unboundedness was detected.
    pub point: Vec<f64>,
    /// Nonnegative direction in the null space of `A`.
    pub direction: Vec<f64>,
}

/// How a run of the engine ended.
#[derive(Clone, Debug, PartialEq)]
pub enum Terminal {
    /// An optimal basic feasible solution.
    Optimal {
        /// Value of every column, basic or not.
        solution: Vec<f64>,
        /// Objective value in the direction of the problem as given to the engine, constant
        /// included.
        objective_value: f64,
    },
    /// The objective is unbounded along the witness.
    Unbounded(UnboundedWitness),
}

impl<'a, PR: PivotRule> SimplexEngine<'a, PR> {
    /// Create an engine for a feasible basis.
    ///
    /// # Arguments
    ///
    /// * `program`: Problem to optimize. Minimization problems are solved as the maximization of
    /// the negated objective.
    /// * `basis`: Column index for each row. Its basic solution should be nonnegative.
    /// * `options`: Tolerance, pivot cap. The pivot rule is fixed by the type parameter.
    ///
    /// # Errors
    ///
    /// `InvalidBasis` or `SingularBasis` if the basis can't be used to start.
    pub fn new(
        program: &'a LinearProgram,
        basis: Vec<usize>,
        options: &SolverOptions,
    ) -> Result<Self, SolveError> {
        let tolerance = options.tolerance_for(program);
        let tableau = Tableau::new(program, basis, tolerance)?;

        Ok(Self {
            tableau,
            rule: PR::new(),
            phase: Phase::Two,
            iterations: 0,
            max_iterations: options.max_iterations(),
            objective: program.objective(),
        })
    }

    /// Create an engine for a feasible basis and its basic solution.
    ///
    /// # Errors
    ///
    /// Those of `new`, and `InconsistentSolution` if `solution` is not the basic solution of
    /// `basis`.
    pub fn with_solution(
        program: &'a LinearProgram,
        basis: Vec<usize>,
        solution: &[f64],
        options: &SolverOptions,
    ) -> Result<Self, SolveError> {
        let engine = Self::new(program, basis, options)?;

        let tolerance = engine.tableau.tolerance();
        let computed = engine.tableau.solution();
        if solution.len() != computed.len()
            || solution.iter().zip(computed).any(|(&given, &computed)| !tolerance.eq(given, computed)) {
            return Err(SolveError::InconsistentSolution(engine.tableau.basis().to_vec()));
        }

        Ok(engine)
    }

    /// Label the records produced from now on.
    pub(crate) fn in_phase(mut self, phase: Phase) -> Self {
        self.phase = phase;
        self
    }

    /// Choose the column to bring into the basis.
    ///
    /// # Errors
    ///
    /// `NoEnteringVariable` if no relative cost is positive, the basis is then optimal.
    pub fn select_entering(&mut self) -> Result<(usize, f64), SolveError> {
        self.rule.select_primal_pivot_column(&self.tableau)
            .ok_or(SolveError::NoEnteringVariable)
    }

    /// Do a single iteration.
    ///
    /// # Arguments
    ///
    /// * `with_snapshot`: Whether the record should contain a copy of the canonical form.
    ///
    /// # Errors
    ///
    /// `IterationLimitExceeded` if a pivot is needed but the cap is reached. `SingularBasis` if
    /// the new basis can't be factorized, which indicates a numerical problem.
    /// `UnconfirmedCertificate` if the basis looks optimal or the column looks unbounded, but
    /// checking that against the problem data fails.
    pub fn step(&mut self, with_snapshot: bool) -> Result<Step, SolveError> {
        if cfg!(debug_assertions) {
            debug_assert_in_basic_feasible_solution_state(&self.tableau);
        }
        trace!("{:?} basis {:?}, canonical form:\n{}", self.phase, self.tableau.basis(), self.tableau.canonical());

        let (entering, cost) = match self.select_entering() {
            Ok(choice) => choice,
            Err(SolveError::NoEnteringVariable) => {
                self.confirm_optimal()?;
                return Ok(Step::Optimal);
            },
            Err(error) => return Err(error),
        };

        let column = self.tableau.generate_column(entering);
        match self.tableau.select_primal_pivot_row(&column) {
            Some((row, ratio)) => {
                debug!("x{} enters with relative cost {}, row {} has minimum ratio {}", entering + 1, cost, row, ratio);
                self.pivot_and_record(entering, row, ratio, with_snapshot).map(Step::Pivoted)
            },
            None => {
                let witness = self.unbounded_witness(entering, &column)?;
                debug!("x{} enters with relative cost {} but is unbounded", entering + 1, cost);
                Ok(Step::Unbounded(witness))
            },
        }
    }

    /// Iterate until the basis is optimal or unboundedness is detected.
    ///
    /// # Arguments
    ///
    /// * `observer`: Receives a record of every basis change.
    pub fn run(&mut self, observer: &mut dyn IterationObserver) -> Result<Terminal, SolveError> {
        let with_snapshots = observer.wants_snapshots();
        loop {
            match self.step(with_snapshots)? {
                Step::Pivoted(record) => observer.observe(&record),
                Step::Optimal => break Ok(Terminal::Optimal {
                    solution: self.tableau.solution().to_vec(),
                    objective_value: self.objective_value(),
                }),
                Step::Unbounded(witness) => break Ok(Terminal::Unbounded(witness)),
            }
        }
    }

    /// Bring a specific column into the basis, bypassing the pivot rule.
    ///
    /// Used to exchange a basic variable at zero level, for which the ratio test doesn't apply.
    pub(crate) fn pivot(
        &mut self,
        entering: usize,
        row: usize,
        with_snapshot: bool,
    ) -> Result<IterationRecord, SolveError> {
        let step_length = self.tableau.canonical().b[row] / self.tableau.generate_element(row, entering);
        debug!("x{} enters at row {} without ratio test", entering + 1, row);
        self.pivot_and_record(entering, row, step_length, with_snapshot)
    }

    fn pivot_and_record(
        &mut self,
        entering: usize,
        row: usize,
        step_length: f64,
        with_snapshot: bool,
    ) -> Result<IterationRecord, SolveError> {
        if self.iterations >= self.max_iterations {
            warn!("{:?}: iteration limit of {} reached", self.phase, self.max_iterations);
            return Err(SolveError::IterationLimitExceeded(self.max_iterations));
        }

        let basis_before = self.tableau.basis().to_vec();
        let objective_before = self.tableau.objective_function_value();
        let canonical = if with_snapshot { Some(self.tableau.canonical().clone()) } else { None };

        let leaving = self.tableau.bring_into_basis(entering, row)?;
        self.iterations += 1;

        let record = IterationRecord {
            phase: self.phase,
            iteration: self.iterations,
            basis_before,
            basis_after: self.tableau.basis().to_vec(),
            entering,
            leaving,
            leaving_row: row,
            step_length,
            objective_before,
            objective_after: self.tableau.objective_function_value(),
            canonical,
        };
        debug!("{}", record);

        Ok(record)
    }

    /// Build the ray along which the entering column can increase indefinitely.
    ///
    /// # Arguments
    ///
    /// * `entering`: Column with positive relative cost.
    /// * `column`: That column relative to the current basis, without positive entries.
    fn unbounded_witness(&self, entering: usize, column: &[f64]) -> Result<UnboundedWitness, SolveError> {
        let tolerance = self.tableau.tolerance();

        let mut direction = vec![0f64; self.tableau.nr_columns()];
        direction[entering] = 1f64;
        for (&j, &value) in self.tableau.basis().iter().zip(column) {
            direction[j] = tolerance.snap_to_zero(-value);
        }
        let point = self.tableau.solution().to_vec();

        if !certify_unboundedness(self.tableau.program(), &point, &direction, tolerance) {
            warn!("direction of unboundedness through x{} could not be confirmed", entering + 1);
            return Err(SolveError::UnconfirmedCertificate(CertificateKind::Unboundedness));
        }

        Ok(UnboundedWitness { point, direction })
    }

    fn confirm_optimal(&self) -> Result<(), SolveError> {
        let optimal = check_optimality(
            self.tableau.program(),
            self.tableau.basis(),
            self.tableau.solution(),
            self.tableau.tolerance(),
        )?;
        if !optimal {
            warn!("basis {:?} could not be confirmed optimal", self.tableau.basis());
            return Err(SolveError::UnconfirmedCertificate(CertificateKind::Optimality));
        }

        Ok(())
    }

    /// Objective value of the current solution in the direction of the problem as it was given.
    pub fn objective_value(&self) -> f64 {
        match self.objective {
            Objective::Maximize => self.tableau.objective_function_value(),
            Objective::Minimize => -self.tableau.objective_function_value(),
        }
    }

    /// Current state of the engine.
    pub fn tableau(&self) -> &Tableau<'a> {
        &self.tableau
    }

    /// Number of basis changes so far.
    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    /// Give up the engine, keeping its final state.
    pub fn into_tableau(self) -> Tableau<'a> {
        self.tableau
    }
}

#[cfg(test)]
mod test {
    use approx::assert_abs_diff_eq;

    use crate::algorithm::certificate::{certify_unboundedness, check_optimality};
    use crate::algorithm::options::SolverOptions;
    use crate::algorithm::two_phase::iteration::{IterationRecord, Phase, Silent, WithSnapshots};
    use crate::algorithm::two_phase::simplex::{SimplexEngine, Step, Terminal};
    use crate::algorithm::two_phase::strategy::pivot_rule::{Bland, LargestCoefficient};
    use crate::data::linear_program::elements::Objective;
    use crate::data::linear_program::equality_form::LinearProgram;
    use crate::data::number_types::tolerance::Tolerance;
    use crate::error::{CertificateKind, SolveError};

    fn program() -> LinearProgram {
        LinearProgram::from_rows(
            vec![
                vec![3f64, 2f64, 1f64, 0f64],
                vec![1f64, 1f64, 0f64, 1f64],
            ],
            vec![2f64, 1f64],
            vec![4f64, 3f64, 0f64, 0f64],
            Objective::Maximize,
            7f64,
        ).unwrap()
    }

    #[test]
    fn optimal_from_slack_basis() {
        let lp = program();
        let options = SolverOptions::default();
        let mut engine = SimplexEngine::<Bland>::with_solution(
            &lp, vec![2, 3], &[0f64, 0f64, 2f64, 1f64], &options,
        ).unwrap();
        let mut records: Vec<IterationRecord> = Vec::new();
        let terminal = engine.run(&mut records).unwrap();

        match terminal {
            Terminal::Optimal { solution, objective_value } => {
                assert_abs_diff_eq!(objective_value, 10f64, epsilon = 1e-9);
                for (computed, expected) in solution.iter().zip([0f64, 1f64, 0f64, 0f64]) {
                    assert_abs_diff_eq!(*computed, expected, epsilon = 1e-9);
                }
            },
            Terminal::Unbounded(_) => panic!("problem is bounded"),
        }
        assert_eq!(engine.iterations(), 2);
        assert_eq!(engine.tableau().basis(), &[1, 3]);

        assert_eq!(records.len(), 2);
        assert_eq!((records[0].entering, records[0].leaving, records[0].leaving_row), (0, 2, 0));
        assert_eq!((records[1].entering, records[1].leaving, records[1].leaving_row), (1, 0, 0));
        assert_eq!(records[0].phase, Phase::Two);
        assert_eq!(records[1].basis_after, vec![1, 3]);
        assert!(records.iter().all(|record| record.objective_after >= record.objective_before));
        assert!(records.iter().all(|record| record.canonical.is_none()));

        let tableau = engine.tableau();
        assert_eq!(
            check_optimality(&lp, tableau.basis(), tableau.solution(), &Tolerance::absolute(1e-9)),
            Ok(true),
        );
    }

    #[test]
    fn stepwise() {
        let lp = program();
        let mut engine = SimplexEngine::<Bland>::new(&lp, vec![2, 3], &SolverOptions::default()).unwrap();
        assert!(matches!(engine.step(true), Ok(Step::Pivoted(record)) if record.canonical.is_some()));
        assert!(matches!(engine.step(false), Ok(Step::Pivoted(_))));
        assert_eq!(engine.step(false), Ok(Step::Optimal));
        assert_eq!(engine.select_entering(), Err(SolveError::NoEnteringVariable));
        // Stepping an optimal engine changes nothing
        assert_eq!(engine.step(false), Ok(Step::Optimal));
        assert_eq!(engine.iterations(), 2);
    }

    #[test]
    fn snapshots() {
        let lp = program();
        let mut engine = SimplexEngine::<Bland>::new(&lp, vec![2, 3], &SolverOptions::default()).unwrap();
        let mut observer = WithSnapshots::default();
        engine.run(&mut observer).unwrap();
        let first = observer.0[0].canonical.as_ref().unwrap();
        assert_eq!(first.cost, vec![4f64, 3f64, 0f64, 0f64]);
        assert_eq!(first.b, vec![2f64, 1f64]);
    }

    #[test]
    fn minimization() {
        let lp = LinearProgram::from_rows(
            vec![
                vec![3f64, 2f64, 1f64, 0f64],
                vec![1f64, 1f64, 0f64, 1f64],
            ],
            vec![2f64, 1f64],
            vec![-4f64, -3f64, 0f64, 0f64],
            Objective::Minimize,
            -7f64,
        ).unwrap();
        let mut engine = SimplexEngine::<Bland>::new(&lp, vec![2, 3], &SolverOptions::default()).unwrap();
        match engine.run(&mut Silent).unwrap() {
            Terminal::Optimal { objective_value, .. } => assert_abs_diff_eq!(objective_value, -10f64, epsilon = 1e-9),
            Terminal::Unbounded(_) => panic!("problem is bounded"),
        }
    }

    #[test]
    fn unbounded() {
        let lp = LinearProgram::from_rows(
            vec![
                vec![1f64, -1f64, 1f64, 0f64],
                vec![0f64, -1f64, 0f64, 1f64],
            ],
            vec![1f64, 2f64],
            vec![0f64, 1f64, 0f64, 0f64],
            Objective::Maximize,
            0f64,
        ).unwrap();
        let mut engine = SimplexEngine::<Bland>::new(&lp, vec![2, 3], &SolverOptions::default()).unwrap();
        match engine.run(&mut Silent).unwrap() {
            Terminal::Unbounded(witness) => {
                assert_eq!(witness.point, vec![0f64, 0f64, 1f64, 2f64]);
                assert_eq!(witness.direction, vec![0f64, 1f64, 1f64, 1f64]);
                assert!(certify_unboundedness(&lp, &witness.point, &witness.direction, &Tolerance::absolute(1e-9)));
            },
            Terminal::Optimal { .. } => panic!("problem is unbounded"),
        }
        assert_eq!(engine.iterations(), 0);
    }

    #[test]
    fn iteration_limit() {
        let lp = program();
        let options = SolverOptions::builder().max_iterations(1).build().unwrap();
        let mut engine = SimplexEngine::<Bland>::new(&lp, vec![2, 3], &options).unwrap();
        assert_eq!(engine.run(&mut Silent), Err(SolveError::IterationLimitExceeded(1)));
        assert_eq!(engine.iterations(), 1);
    }

    #[test]
    fn largest_coefficient() {
        let lp = program();
        let mut engine = SimplexEngine::<LargestCoefficient>::new(&lp, vec![2, 3], &SolverOptions::default()).unwrap();
        match engine.run(&mut Silent).unwrap() {
            Terminal::Optimal { objective_value, .. } => assert_abs_diff_eq!(objective_value, 10f64, epsilon = 1e-9),
            Terminal::Unbounded(_) => panic!("problem is bounded"),
        }
    }

    #[test]
    fn inconsistent_solution() {
        let lp = program();
        let options = SolverOptions::default();
        assert_eq!(
            SimplexEngine::<Bland>::with_solution(&lp, vec![2, 3], &[0f64, 0f64, 1f64, 1f64], &options).err(),
            Some(SolveError::InconsistentSolution(vec![2, 3])),
        );
        assert!(matches!(
            SimplexEngine::<Bland>::new(&lp, vec![2, 0], &options),
            Err(SolveError::InvalidBasis { .. }),
        ));
    }

    #[test]
    fn mixed_magnitudes() {
        // x1 + x3 = 1 + 9e-7 and 1000 x1 + x4 = 1000 have nearly equal ratios for x1
        let lp = LinearProgram::from_rows(
            vec![vec![1f64, 0f64, 1f64, 0f64], vec![1000f64, 0f64, 0f64, 1f64]],
            vec![1f64 + 9e-7, 1000f64],
            vec![1f64, 0f64, 0f64, 0f64],
            Objective::Maximize,
            0f64,
        ).unwrap();
        let mut engine = SimplexEngine::<Bland>::new(&lp, vec![2, 3], &SolverOptions::default()).unwrap();
        match engine.run(&mut Silent).unwrap() {
            Terminal::Optimal { solution, objective_value } => {
                assert_abs_diff_eq!(objective_value, 1f64, epsilon = 1e-9);
                assert!(solution.iter().all(|&v| v >= 0f64));
            },
            Terminal::Unbounded(_) => panic!("problem is bounded"),
        }
        assert_eq!(engine.tableau().basis(), &[2, 0]);
    }

    #[test]
    fn unconfirmed_unboundedness() {
        // x2 = 1 is basic, the column of x1 relative to it is -1/49 which doesn't cancel exactly
        let lp = LinearProgram::from_rows(
            vec![vec![-1f64, 49f64]],
            vec![49f64],
            vec![1f64, 0f64],
            Objective::Maximize,
            0f64,
        ).unwrap();

        let options = SolverOptions::builder().tolerance(1e-300).build().unwrap();
        let mut engine = SimplexEngine::<Bland>::new(&lp, vec![1], &options).unwrap();
        assert_eq!(
            engine.run(&mut Silent),
            Err(SolveError::UnconfirmedCertificate(CertificateKind::Unboundedness)),
        );

        let mut engine = SimplexEngine::<Bland>::new(&lp, vec![1], &SolverOptions::default()).unwrap();
        assert!(matches!(engine.run(&mut Silent), Ok(Terminal::Unbounded(_))));
    }
}
