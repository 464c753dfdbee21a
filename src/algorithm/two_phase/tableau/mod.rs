//! # Data structures for Simplex
//!
//! Contains the simplex tableau and logic for elementary operations which can be performed upon it.
use std::borrow::Cow;
use std::collections::HashSet;

use crate::algorithm::two_phase::tableau::canonical::CanonicalForm;
use crate::data::linear_program::elements::Objective;
use crate::data::linear_program::equality_form::LinearProgram;
use crate::data::number_types::tolerance::Tolerance;
use crate::error::SolveError;

pub mod canonical;

/// The simplex tableau: a basis, its basic solution and the problem in canonical form relative to
/// that basis.
///
/// It holds only a reference to the (immutable) problem it solves, unless that problem is a
/// minimization problem; then it owns a maximization copy. The canonical form is recomputed from
/// the original coefficients after each basis change.
#[derive(Clone, Debug, PartialEq)]
pub struct Tableau<'a> {
    /// Maximization problem with the original coefficients.
    program: Cow<'a, LinearProgram>,
    /// Column index of the basic variable for each row.
    basis: Vec<usize>,
    /// All columns currently in the basis.
    ///
    /// Could also be derived from `basis`, but is here for faster reading.
    basis_columns: HashSet<usize>,
    /// Dense, length `n`. Non basic entries are exactly zero.
    solution: Vec<f64>,
    /// Derived from `program` and `basis`.
    canonical: CanonicalForm,
    tolerance: Tolerance<f64>,
}

impl<'a> Tableau<'a> {
    /// Create a tableau from a basis.
    ///
    /// # Arguments
    ///
    /// * `program`: Problem to solve. Minimization problems are converted to maximization problems.
    /// * `basis`: Column index for each row, the basic solution should be feasible.
    /// * `tolerance`: Absolute tolerance for all comparisons.
    ///
    /// # Errors
    ///
    /// * `InvalidBasis` if the basis has the wrong length, duplicates, out of range indices, or its
    /// basic solution is negative.
    /// * `SingularBasis` if the basis columns are linearly dependent.
    pub fn new(
        program: &'a LinearProgram,
        basis: Vec<usize>,
        tolerance: Tolerance<f64>,
    ) -> Result<Self, SolveError> {
        let program = match program.objective() {
            Objective::Maximize => Cow::Borrowed(program),
            Objective::Minimize => {
                let mut copy = program.clone();
                copy.normalize_to_max();
                Cow::Owned(copy)
            },
        };

        let basis_columns = validate_basis(&program, &basis)?;
        let canonical = CanonicalForm::compute(&program, &basis, &tolerance)?;
        if let Some(row) = canonical.b.iter().position(|&v| tolerance.is_negative(v)) {
            return Err(SolveError::InvalidBasis {
                reason: format!(
                    "basic variable {} has negative value {}", basis[row], canonical.b[row],
                ),
                basis,
            });
        }
        let solution = basic_solution(&canonical, &basis, program.nr_columns(), &tolerance);

        Ok(Self { program, basis, basis_columns, solution, canonical, tolerance })
    }

    /// Brings a column into the basis, replacing the basic variable of a row.
    ///
    /// The canonical form and solution are recomputed from scratch for the new basis, the
    /// previous values are not used.
    ///
    /// # Arguments
    ///
    /// * `pivot_column_index`: Non basic column to bring into the basis.
    /// * `pivot_row_index`: Row of the basic variable that leaves.
    ///
    /// # Return value
    ///
    /// Index of the column that left the basis.
    pub fn bring_into_basis(
        &mut self,
        pivot_column_index: usize,
        pivot_row_index: usize,
    ) -> Result<usize, SolveError> {
        debug_assert!(pivot_column_index < self.nr_columns());
        debug_assert!(pivot_row_index < self.nr_rows());
        debug_assert!(!self.is_in_basis(pivot_column_index));

        let mut basis = self.basis.clone();
        let leaving_column = basis[pivot_row_index];
        basis[pivot_row_index] = pivot_column_index;

        let canonical = CanonicalForm::compute(&self.program, &basis, &self.tolerance)?;
        self.solution = basic_solution(&canonical, &basis, self.nr_columns(), &self.tolerance);
        self.canonical = canonical;
        self.basis = basis;

        let was_there = self.basis_columns.remove(&leaving_column);
        debug_assert!(was_there);
        let was_not_there = self.basis_columns.insert(pivot_column_index);
        debug_assert!(was_not_there);

        Ok(leaving_column)
    }

    /// Determine the row to pivot on.
    ///
    /// Determine the row to pivot on, given the column. This is the row with the positive but
    /// minimal ratio between the current constraint vector and the column.
    ///
    /// When there are multiple choices for the pivot row, Bland's anti cycling algorithm
    /// is used to avoid cycles: the row whose basic variable has the lowest index is chosen.
    /// Ratios count as tied only when stepping by the larger one moves no basic variable more
    /// than the tolerance below zero, so the basis after the pivot is still feasible.
    ///
    /// # Arguments
    ///
    /// * `column`: Problem column with respect to the current basis with length `m`.
    ///
    /// # Return value
    ///
    /// Index of the row to pivot on and its ratio. If not found, the problem is unbounded in the
    /// direction of the column.
    pub fn select_primal_pivot_row(&self, column: &[f64]) -> Option<(usize, f64)> {
        debug_assert_eq!(column.len(), self.nr_rows());

        // (row index, ratio) for each row that bounds the step
        let bounding_rows = column.iter()
            .enumerate()
            .filter(|&(_, &xij)| self.tolerance.is_positive(xij))
            .map(|(row, &xij)| (row, self.canonical.b[row].max(0f64) / xij))
            .collect::<Vec<_>>();
        let min_ratio = bounding_rows.iter().map(|&(_, ratio)| ratio).reduce(f64::min)?;
        // Stepping `delta` past the minimum ratio lowers row `k` by at most `delta * x_kj`
        let largest_xij = bounding_rows.iter().map(|&(row, _)| column[row]).fold(0f64, f64::max);

        // Bland's anti cycling algorithm
        bounding_rows.into_iter()
            .filter(|&(_, ratio)| self.tolerance.is_zero((ratio - min_ratio) * largest_xij))
            .min_by_key(|&(row, _)| self.basis[row])
    }

    /// Relative cost of a column with respect to the current basis.
    ///
    /// Zero for basis columns.
    pub fn relative_cost(&self, j: usize) -> f64 {
        debug_assert!(j < self.nr_columns());

        self.canonical.cost[j]
    }

    /// Column of the original problem with respect to the current basis, `B^-1 A_j`.
    pub fn generate_column(&self, j: usize) -> Vec<f64> {
        debug_assert!(j < self.nr_columns());

        self.canonical.column(j)
    }

    /// Single element of `B^-1 A`.
    pub fn generate_element(&self, i: usize, j: usize) -> f64 {
        debug_assert!(i < self.nr_rows());
        debug_assert!(j < self.nr_columns());

        self.canonical.constraints.get(i, j)
    }

    /// Whether a column is in the basis.
    pub fn is_in_basis(&self, column: usize) -> bool {
        debug_assert!(column < self.nr_columns());

        self.basis_columns.contains(&column)
    }

    /// Value of the objective function of the maximization problem at the current solution.
    pub fn objective_function_value(&self) -> f64 {
        self.canonical.constant
    }

    /// Dual values `y` solving `B^T y = c_B`.
    pub fn dual(&self) -> &[f64] {
        &self.canonical.dual
    }

    /// Column indices of the basic variables, ordered by row.
    pub fn basis(&self) -> &[usize] {
        &self.basis
    }

    /// The current basic feasible solution.
    pub fn solution(&self) -> &[f64] {
        &self.solution
    }

    /// The problem rewritten relative to the current basis.
    pub fn canonical(&self) -> &CanonicalForm {
        &self.canonical
    }

    /// The maximization problem being solved.
    pub fn program(&self) -> &LinearProgram {
        &self.program
    }

    /// Absolute tolerance used for all comparisons.
    pub fn tolerance(&self) -> &Tolerance<f64> {
        &self.tolerance
    }

    /// Number of rows in the tableau.
    pub fn nr_rows(&self) -> usize {
        self.program.nr_rows()
    }

    /// Number of variables in the problem.
    pub fn nr_columns(&self) -> usize {
        self.program.nr_columns()
    }

    /// Take the basis and solution out of the tableau.
    pub fn into_basis_and_solution(self) -> (Vec<usize>, Vec<f64>) {
        (self.basis, self.solution)
    }
}

/// Check that a basis has one column per row, no duplicates and only existing columns.
///
/// # Return value
///
/// The basis as a set.
pub(crate) fn validate_basis(
    program: &LinearProgram,
    basis: &[usize],
) -> Result<HashSet<usize>, SolveError> {
    let invalid = |reason: String| SolveError::InvalidBasis { basis: basis.to_vec(), reason };

    if basis.len() != program.nr_rows() {
        return Err(invalid(format!("expected {} columns, got {}", program.nr_rows(), basis.len())));
    }
    if let Some(&j) = basis.iter().find(|&&j| j >= program.nr_columns()) {
        return Err(invalid(format!("column {} doesn't exist", j)));
    }
    let basis_columns = basis.iter().copied().collect::<HashSet<_>>();
    if basis_columns.len() != basis.len() {
        return Err(invalid("duplicate columns".into()));
    }

    Ok(basis_columns)
}

/// Expand the basic variable values to a dense solution with zeros for non basic variables.
fn basic_solution(
    canonical: &CanonicalForm,
    basis: &[usize],
    nr_columns: usize,
    tolerance: &Tolerance<f64>,
) -> Vec<f64> {
    let mut solution = vec![0f64; nr_columns];
    for (&j, &value) in basis.iter().zip(&canonical.b) {
        solution[j] = tolerance.snap_to_zero(value);
    }

    debug_assert!(
        solution.iter().all(|&v| tolerance.is_nonnegative(v)),
        "basic solution is not feasible: {:?}", solution,
    );
    solution
}

/// Check whether the tableau currently has a valid basic feasible solution.
///
/// Only used for debug purposes.
pub fn debug_assert_in_basic_feasible_solution_state(tableau: &Tableau) {
    let tolerance = tableau.tolerance();
    let program = tableau.program();

    // Correct number of basis columns (uniqueness is implied because it's a set)
    debug_assert_eq!(tableau.basis_columns.len(), tableau.nr_rows());

    // `Ax = b`
    for (i, (computed, &expected)) in program.constraints().mul_vector(tableau.solution())
        .into_iter().zip(program.b()).enumerate() {
        debug_assert!(
            tolerance.eq(computed, expected),
            "row {} is violated: {} != {}", i, computed, expected,
        );
    }

    // Non basic variables are zero, all are nonnegative
    for (j, &value) in tableau.solution().iter().enumerate() {
        debug_assert!(tableau.is_in_basis(j) || value == 0f64, "non basic x{} = {}", j, value);
        debug_assert!(value >= 0f64, "x{} = {} < 0", j, value);
    }

    // Basis columns have zero relative cost
    for &j in tableau.basis() {
        debug_assert_eq!(tableau.relative_cost(j), 0f64, "relative cost of column {} is not zero", j);
    }
}

#[cfg(test)]
mod test {
    use approx::assert_abs_diff_eq;

    use crate::algorithm::two_phase::tableau::{debug_assert_in_basic_feasible_solution_state, Tableau};
    use crate::data::linear_program::elements::Objective;
    use crate::data::linear_program::equality_form::LinearProgram;
    use crate::data::number_types::tolerance::Tolerance;
    use crate::error::SolveError;

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

    fn tolerance() -> Tolerance<f64> {
        Tolerance::absolute(1e-9)
    }

    #[test]
    fn create_tableau() {
        let lp = program();
        let tableau = Tableau::new(&lp, vec![2, 3], tolerance()).unwrap();
        assert_eq!(tableau.solution(), &[0f64, 0f64, 2f64, 1f64]);
        assert_eq!(tableau.objective_function_value(), 7f64);
        assert!(tableau.is_in_basis(2));
        assert!(!tableau.is_in_basis(0));
        debug_assert_in_basic_feasible_solution_state(&tableau);
    }

    #[test]
    fn invalid_basis() {
        let lp = program();
        assert!(matches!(Tableau::new(&lp, vec![2], tolerance()), Err(SolveError::InvalidBasis { .. })));
        assert!(matches!(Tableau::new(&lp, vec![2, 2], tolerance()), Err(SolveError::InvalidBasis { .. })));
        assert!(matches!(Tableau::new(&lp, vec![2, 9], tolerance()), Err(SolveError::InvalidBasis { .. })));
        // x2 = 1, x4 = 0 is degenerate but fine, x1 = 1, x3 = -1 is not
        assert!(Tableau::new(&lp, vec![1, 3], tolerance()).is_ok());
        assert!(matches!(Tableau::new(&lp, vec![2, 0], tolerance()), Err(SolveError::InvalidBasis { .. })));
    }

    #[test]
    fn select_pivot_row_bland_tie() {
        let lp = program();
        let mut tableau = Tableau::new(&lp, vec![2, 3], tolerance()).unwrap();
        assert_eq!(tableau.select_primal_pivot_row(&tableau.generate_column(0)), Some((0, 2f64 / 3f64)));
        tableau.bring_into_basis(0, 0).unwrap();

        // Both ratios are 1, row 0 has basic variable 0 which is lower than 3
        let (row, ratio) = tableau.select_primal_pivot_row(&tableau.generate_column(1)).unwrap();
        assert_eq!(row, 0);
        assert_abs_diff_eq!(ratio, 1f64, epsilon = 1e-12);
    }

    #[test]
    fn select_pivot_row_mixed_magnitudes() {
        // The ratios 1 + 9e-7 and 1 differ by less than the tolerance, but stepping 9e-7 too far
        // in the second row would make x4 = -9e-4
        let lp = LinearProgram::from_rows(
            vec![
                vec![1f64, 0f64, 1f64, 0f64],
                vec![1000f64, 0f64, 0f64, 1f64],
            ],
            vec![1f64 + 9e-7, 1000f64],
            vec![1f64, 0f64, 0f64, 0f64],
            Objective::Maximize,
            0f64,
        ).unwrap();
        let mut tableau = Tableau::new(&lp, vec![2, 3], Tolerance::absolute(1e-6)).unwrap();
        assert_eq!(tableau.select_primal_pivot_row(&tableau.generate_column(0)), Some((1, 1f64)));

        tableau.bring_into_basis(0, 1).unwrap();
        assert!(tableau.solution().iter().all(|&v| v >= 0f64));
        assert_eq!(tableau.basis(), &[2, 0]);
        assert_eq!(tableau.solution()[0], 1f64);
        debug_assert_in_basic_feasible_solution_state(&tableau);
    }

    #[test]
    fn unbounded_column() {
        let lp = program();
        let tableau = Tableau::new(&lp, vec![2, 3], tolerance()).unwrap();
        assert_eq!(tableau.select_primal_pivot_row(&[-1f64, 0f64]), None);
    }

    #[test]
    fn bring_into_basis() {
        let lp = program();
        let mut tableau = Tableau::new(&lp, vec![2, 3], tolerance()).unwrap();
        assert_eq!(tableau.bring_into_basis(0, 0), Ok(2));
        assert_eq!(tableau.basis(), &[0, 3]);
        assert_abs_diff_eq!(tableau.solution()[0], 2f64 / 3f64, epsilon = 1e-12);
        assert_abs_diff_eq!(tableau.solution()[3], 1f64 / 3f64, epsilon = 1e-12);
        assert_eq!(tableau.solution()[2], 0f64);
        assert_abs_diff_eq!(tableau.objective_function_value(), 7f64 + 8f64 / 3f64, epsilon = 1e-12);
        assert_abs_diff_eq!(tableau.relative_cost(1), 1f64 / 3f64, epsilon = 1e-12);
        debug_assert_in_basic_feasible_solution_state(&tableau);
    }

    #[test]
    fn minimization_is_normalized() {
        let min = LinearProgram::from_rows(
            vec![
                vec![3f64, 2f64, 1f64, 0f64],
                vec![1f64, 1f64, 0f64, 1f64],
            ],
            vec![2f64, 1f64],
            vec![-4f64, -3f64, 0f64, 0f64],
            Objective::Minimize,
            -7f64,
        ).unwrap();
        let tableau = Tableau::new(&min, vec![2, 3], tolerance()).unwrap();
        assert_eq!(tableau.program(), &program());
        assert_eq!(tableau.relative_cost(0), 4f64);
    }
}
