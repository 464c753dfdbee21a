//! # Integration tests that require a look inside the crate.
//!
//! Convention for function names:
//!
//! * `fn program()`: the problem of a scenario
//! * `fn expected_*()`: values computed by hand
use itertools::Itertools;

use crate::data::linear_algebra::lower_upper::LUDecomposition;
use crate::data::linear_program::elements::Objective;
use crate::data::linear_program::equality_form::LinearProgram;
use crate::data::number_types::tolerance::Tolerance;


/// Show the solver logs when running with `RUST_LOG` set.
pub fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Tolerance for comparing results computed in different ways.
pub fn tolerance() -> Tolerance<f64> {
    Tolerance::absolute(1e-6)
}

/// Whether `x` satisfies `Ax = b` and `x >= 0`.
pub fn is_feasible(program: &LinearProgram, x: &[f64]) -> bool {
    let tolerance = tolerance();

    x.iter().all(|&v| tolerance.is_nonnegative(v))
        && program.constraints().mul_vector(x).into_iter()
            .zip(program.b())
            .all(|(ax, &b)| tolerance.eq(ax, b))
}

/// Best objective value over all basic feasible solutions, computed by trying every basis.
///
/// # Return value
///
/// `None` if no basis is both invertible and feasible, which is the case for infeasible problems
/// and for problems whose rows are not linearly independent.
pub fn vertex_enumeration(program: &LinearProgram) -> Option<f64> {
    let tolerance = Tolerance::absolute(1e-9);
    let a = program.constraints();

    (0..program.nr_columns())
        .combinations(program.nr_rows())
        .filter_map(|basis| {
            let lu = LUDecomposition::decompose(&a.select_columns(&basis), tolerance.epsilon())?;
            let values = lu.solve(program.b());
            if values.iter().any(|&v| tolerance.is_negative(v)) {
                return None;
            }

            let mut x = vec![0f64; program.nr_columns()];
            for (&j, value) in basis.iter().zip(values) {
                x[j] = value;
            }
            Some(program.objective_value(&x))
        })
        .fold(None, |best, value| match (best, program.objective()) {
            (None, _) => Some(value),
            (Some(best), Objective::Maximize) => Some(value.max(best)),
            (Some(best), Objective::Minimize) => Some(value.min(best)),
        })
}
