//! # Iteration records
//!
//! Structured description of each basis change, for display and testing. Observing iterations
//! doesn't influence the solve.
use std::fmt::{Display, Formatter, Result as FormatResult};

use crate::algorithm::two_phase::tableau::canonical::CanonicalForm;

/// The phase of the two phase method an iteration belongs to.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Phase {
    /// Solving the auxiliary problem to find a basic feasible solution.
    One,
    /// Optimizing the original problem.
    Two,
}

/// A single basis change.
///
/// Objective values are those of the maximization problem that is actually being solved, so they
/// never decrease.
#[derive(Clone, Debug, PartialEq)]
pub struct IterationRecord {
    /// Phase the pivot belongs to.
    pub phase: Phase,
    /// Number of this basis change within its phase, starting at one.
    pub iteration: u32,
    /// Basis before the pivot.
    pub basis_before: Vec<usize>,
    /// Basis after the pivot.
    pub basis_after: Vec<usize>,
    /// Column that entered the basis.
    pub entering: usize,
    /// Column that left the basis.
    pub leaving: usize,
    /// Row of the pivot.
    pub leaving_row: usize,
    /// Value of the entering variable after the pivot, the minimum ratio.
    pub step_length: f64,
    /// Objective value of the maximization problem before the pivot.
    pub objective_before: f64,
    /// Objective value of the maximization problem after the pivot.
    pub objective_after: f64,
    /// Canonical form before the pivot, only present when snapshots are requested.
    pub canonical: Option<CanonicalForm>,
}

impl Display for IterationRecord {
    fn fmt(&self, f: &mut Formatter) -> FormatResult {
        write!(
            f,
            "phase {:?} iteration {}: x{} enters, x{} leaves (row {}), step {:.4}, objective {:.4} -> {:.4}",
            self.phase, self.iteration, self.entering + 1, self.leaving + 1, self.leaving_row,
            self.step_length, self.objective_before, self.objective_after,
        )
    }
}

/// Receives a record for each basis change.
pub trait IterationObserver {
    /// Called after each basis change.
    fn observe(&mut self, record: &IterationRecord);

    /// Whether records should contain a snapshot of the canonical form.
    ///
    /// Copying the canonical form is relatively expensive, so it's only done when asked for.
    fn wants_snapshots(&self) -> bool {
        false
    }
}

/// Ignores all records.
pub struct Silent;
impl IterationObserver for Silent {
    fn observe(&mut self, _record: &IterationRecord) {
    }
}

/// Keeps all records.
impl IterationObserver for Vec<IterationRecord> {
    fn observe(&mut self, record: &IterationRecord) {
        self.push(record.clone());
    }
}

/// Keeps all records, including snapshots of the canonical form.
#[derive(Default, Debug)]
pub struct WithSnapshots(pub Vec<IterationRecord>);
impl IterationObserver for WithSnapshots {
    fn observe(&mut self, record: &IterationRecord) {
        self.0.push(record.clone());
    }

    fn wants_snapshots(&self) -> bool {
        true
    }
}
