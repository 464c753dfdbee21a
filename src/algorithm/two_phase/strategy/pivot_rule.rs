//! # Pivot rules
//!
//! Strategies for choosing the column that enters the basis.
use serde::{Deserialize, Serialize};

use crate::algorithm::two_phase::tableau::Tableau;

/// Deciding how to pivot.
///
/// During the Simplex method, one needs to decide how to move from basic solution to basic
/// solution. The pivot rule describes that behavior.
///
/// Once the column has been selected, a row needs to be found. That decision is made independent
/// of the strategy, always using Bland's lowest index rule for ties, see
/// `Tableau::select_primal_pivot_row`.
pub trait PivotRule {
    /// Create a new instance.
    fn new() -> Self;

    /// Column selection rule for the primal Simplex method.
    ///
    /// # Return value
    ///
    /// Index of a non basic column with a positive relative cost and that cost, or `None` if there
    /// is no such column (and the current basis is optimal).
    fn select_primal_pivot_column(&mut self, tableau: &Tableau) -> Option<(usize, f64)>;
}

/// Bland's rule: pivot on the column with the lowest index that has a positive relative cost.
///
/// Together with the lowest index tie break in the row selection, this guarantees termination,
/// also on degenerate problems.
pub struct Bland;
impl PivotRule for Bland {
    fn new() -> Self {
        Self
    }

    fn select_primal_pivot_column(&mut self, tableau: &Tableau) -> Option<(usize, f64)> {
        (0..tableau.nr_columns())
            .filter(|&column| !tableau.is_in_basis(column))
            .map(|column| (column, tableau.relative_cost(column)))
            .find(|&(_, cost)| tableau.tolerance().is_positive(cost))
    }
}

/// Dantzig's rule: pivot on the column with the largest relative cost, lowest index among ties.
///
/// Often needs fewer iterations than `Bland`, but may cycle on degenerate problems. The iteration
/// limit catches that.
pub struct LargestCoefficient;
impl PivotRule for LargestCoefficient {
    fn new() -> Self {
        Self
    }

    fn select_primal_pivot_column(&mut self, tableau: &Tableau) -> Option<(usize, f64)> {
        let mut largest: Option<(usize, f64)> = None;
        for (j, cost) in (0..tableau.nr_columns())
            .filter(|&column| !tableau.is_in_basis(column))
            .map(|column| (column, tableau.relative_cost(column)))
            .filter(|&(_, cost)| tableau.tolerance().is_positive(cost)) {
            if let Some((existing_j, existing_cost)) = largest.as_mut() {
                if cost > *existing_cost {
                    *existing_j = j;
                    *existing_cost = cost;
                }
            } else { largest = Some((j, cost)) }
        }

        largest
    }
}

/// Pivot rule choice, used to configure a solve.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub enum PivotRuleKind {
    /// See `Bland`.
    #[default]
    Bland,
    /// See `LargestCoefficient`.
    LargestCoefficient,
}
