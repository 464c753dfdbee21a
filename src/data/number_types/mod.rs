//! # Number types
//!
//! The algorithms work with floating point numbers. All comparisons between them go through a
//! tolerance that scales with the problem.
pub mod tolerance;
