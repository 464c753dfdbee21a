//! # Strategies
//!
//! Choices made during the Simplex method that don't influence its correctness.
pub mod pivot_rule;
