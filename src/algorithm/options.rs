//! # Solver options
//!
//! Settings shared by both phases of a solve.
use crate::algorithm::two_phase::strategy::pivot_rule::PivotRuleKind;
use crate::data::linear_program::equality_form::LinearProgram;
use crate::data::number_types::tolerance::Tolerance;
use crate::error::SolveError;

/// Validated settings for a solve.
///
/// Construct the default with `SolverOptions::default()`, or customize through
/// `SolverOptions::builder()`.
#[derive(Clone, Debug, PartialEq)]
pub struct SolverOptions {
    tolerance: f64,
    max_iterations: u32,
    pivot_rule: PivotRuleKind,
    record_iterations: bool,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            tolerance: 1e-9,
            max_iterations: 10_000,
            pivot_rule: PivotRuleKind::Bland,
            record_iterations: false,
        }
    }
}

impl SolverOptions {
    /// Start customizing from the default settings.
    pub fn builder() -> SolverOptionsBuilder {
        SolverOptionsBuilder { options: Self::default() }
    }

    /// Absolute tolerance for a specific problem.
    ///
    /// The relative tolerance is scaled with the largest coefficient of the problem.
    pub fn tolerance_for(&self, program: &LinearProgram) -> Tolerance<f64> {
        Tolerance::relative(self.tolerance, program.largest_magnitude())
    }

    /// Relative tolerance.
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Maximum number of basis changes per phase.
    pub fn max_iterations(&self) -> u32 {
        self.max_iterations
    }

    /// Rule used to select the entering column.
    pub fn pivot_rule(&self) -> PivotRuleKind {
        self.pivot_rule
    }

    /// Whether recorded iterations contain a snapshot of the canonical form.
    pub fn record_iterations(&self) -> bool {
        self.record_iterations
    }
}

/// Builder struct to customize `SolverOptions`.
///
/// Call `build` to validate the customized settings.
pub struct SolverOptionsBuilder {
    options: SolverOptions,
}

impl SolverOptionsBuilder {
    /// Set the relative tolerance. It is scaled with the magnitude of the problem data and then
    /// used for all sign and equality tests. Should be a small positive value.
    pub fn tolerance(mut self, tolerance: f64) -> Self {
        self.options.tolerance = tolerance;
        self
    }

    /// Maximum number of basis changes per phase before giving up.
    pub fn max_iterations(mut self, max_iterations: u32) -> Self {
        self.options.max_iterations = max_iterations;
        self
    }

    /// Rule used to select the entering column.
    pub fn pivot_rule(mut self, pivot_rule: PivotRuleKind) -> Self {
        self.options.pivot_rule = pivot_rule;
        self
    }

    /// Keep a copy of the canonical form in every iteration record.
    pub fn record_iterations(mut self, record_iterations: bool) -> Self {
        self.options.record_iterations = record_iterations;
        self
    }

    /// Validate the settings.
    ///
    /// # Errors
    ///
    /// `InvalidParameter` if the tolerance is not a positive finite number or the iteration limit
    /// is zero.
    pub fn build(self) -> Result<SolverOptions, SolveError> {
        let tolerance = self.options.tolerance;
        if !tolerance.is_finite() || tolerance <= 0f64 {
            return Err(SolveError::InvalidParameter {
                parameter: "tolerance",
                message: format!("should be positive and finite, got {}", tolerance),
            });
        }
        if self.options.max_iterations == 0 {
            return Err(SolveError::InvalidParameter {
                parameter: "max_iterations",
                message: "should be at least one".into(),
            });
        }

        Ok(self.options)
    }
}
