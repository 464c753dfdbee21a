//! # Certificates
//!
//! Independent checks of the verdicts of the simplex method. Each function only verifies a given
//! witness; finding the witness is the job of the solver.
//!
//! All checks work on the problem as the caller states it: minimization problems are compared as
//! their maximization counterpart, and no row normalization is assumed.
use std::borrow::Cow;

use crate::algorithm::two_phase::tableau::canonical::CanonicalForm;
use crate::algorithm::two_phase::tableau::validate_basis;
use crate::data::linear_algebra::matrix::inner_product;
use crate::data::linear_program::elements::Objective;
use crate::data::linear_program::equality_form::LinearProgram;
use crate::data::number_types::tolerance::Tolerance;
use crate::error::SolveError;

/// Whether `solution` is an optimal basic feasible solution with basis `basis`.
///
/// The problem is brought in canonical form relative to `basis`. The solution is optimal if it is
/// the (feasible) basic solution of that basis and no relative cost is positive.
///
/// # Errors
///
/// * `InvalidBasis` if the basis has the wrong shape.
/// * `SingularBasis` if the basis columns are linearly dependent.
pub fn check_optimality(
    program: &LinearProgram,
    basis: &[usize],
    solution: &[f64],
    tolerance: &Tolerance<f64>,
) -> Result<bool, SolveError> {
    let program = match program.objective() {
        Objective::Maximize => Cow::Borrowed(program),
        Objective::Minimize => {
            let mut copy = program.clone();
            copy.normalize_to_max();
            Cow::Owned(copy)
        },
    };

    let basis_columns = validate_basis(&program, basis)?;
    let canonical = CanonicalForm::compute(&program, basis, tolerance)?;

    if solution.len() != program.nr_columns() {
        return Ok(false);
    }
    let is_basic_solution = solution.iter().enumerate()
        .all(|(j, &v)| basis_columns.contains(&j) || tolerance.is_zero(v));
    let is_basis_value = basis.iter().zip(&canonical.b)
        .all(|(&j, &value)| tolerance.eq(solution[j], value));
    let is_feasible = solution.iter().all(|&v| tolerance.is_nonnegative(v));

    Ok(is_basic_solution && is_basis_value && is_feasible
        && canonical.cost.iter().all(|&cost| tolerance.is_nonpositive(cost)))
}

/// Whether `y` proves that `Ax = b, x >= 0` has no solution.
///
/// By Farkas' lemma for equality systems, this is the case if `A^T y >= 0` and `b^T y < 0`: any
/// nonnegative `x` with `Ax = b` would give `0 <= x^T A^T y = b^T y < 0`.
pub fn certify_infeasibility(program: &LinearProgram, y: &[f64], tolerance: &Tolerance<f64>) -> bool {
    if y.len() != program.nr_rows() {
        return false;
    }

    program.constraints().transpose_mul_vector(y).into_iter()
        .all(|value| tolerance.is_nonnegative(value))
        && tolerance.is_negative(inner_product(program.b(), y))
}

/// Whether the pair `(x_bar, r)` proves that the problem is unbounded.
///
/// This is the case if `x_bar >= 0`, `r >= 0`, `A x_bar = b`, `A r = 0` and the objective strictly
/// improves along `r`: `c^T r > 0` for maximization, `c^T r < 0` for minimization. Then
/// `x_bar + t r` is feasible for all `t >= 0` with an objective value that grows without bound.
pub fn certify_unboundedness(
    program: &LinearProgram,
    x_bar: &[f64],
    r: &[f64],
    tolerance: &Tolerance<f64>,
) -> bool {
    let n = program.nr_columns();
    if x_bar.len() != n || r.len() != n {
        return false;
    }

    let a = program.constraints();
    x_bar.iter().all(|&v| tolerance.is_nonnegative(v))
        && r.iter().all(|&v| tolerance.is_nonnegative(v))
        && a.mul_vector(x_bar).into_iter().zip(program.b()).all(|(ax, &b)| tolerance.eq(ax, b))
        && a.mul_vector(r).into_iter().all(|ar| tolerance.is_zero(ar))
        && tolerance.is_positive(inner_product(&program.maximization_cost(), r))
}
