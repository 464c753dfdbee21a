//! Comparisons of floating point values that allow for rounding errors.
use num_traits::Float;

/// Absolute epsilon used for all sign tests and equality checks during a solve.
///
/// The epsilon is derived from a relative tolerance and the magnitude of the problem data, such
/// that rescaling all coefficients of a problem doesn't change the decisions taken.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Tolerance<F> {
    epsilon: F,
}

impl<F: Float> Tolerance<F> {
    /// Use `epsilon` as is.
    pub fn absolute(epsilon: F) -> Self {
        debug_assert!(epsilon >= F::zero());

        Self { epsilon }
    }

    /// Scale a relative tolerance by the largest absolute value in the problem.
    ///
    /// The scale is at least one, such that problems with tiny coefficients still get a sensible
    /// threshold.
    pub fn relative(relative: F, largest_magnitude: F) -> Self {
        Self::absolute(relative * largest_magnitude.max(F::one()))
    }

    /// The absolute threshold.
    pub fn epsilon(&self) -> F {
        self.epsilon
    }

    /// Within the tolerance of zero.
    pub fn is_zero(&self, value: F) -> bool {
        value.abs() <= self.epsilon
    }

    /// Larger than the tolerance.
    pub fn is_positive(&self, value: F) -> bool {
        value > self.epsilon
    }

    /// Smaller than minus the tolerance.
    pub fn is_negative(&self, value: F) -> bool {
        value < -self.epsilon
    }

    /// Not negative, so either approximately zero or positive.
    pub fn is_nonnegative(&self, value: F) -> bool {
        !self.is_negative(value)
    }

    /// Not positive, so either approximately zero or negative.
    pub fn is_nonpositive(&self, value: F) -> bool {
        !self.is_positive(value)
    }

    /// Whether the values differ by at most the tolerance.
    pub fn eq(&self, left: F, right: F) -> bool {
        self.is_zero(left - right)
    }

    /// Replace values that are approximately zero with an exact zero.
    pub fn snap_to_zero(&self, value: F) -> F {
        if self.is_zero(value) { F::zero() } else { value }
    }
}
