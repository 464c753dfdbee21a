//! # Linear algebra primitives
//!
//! Dense matrices and the factorization used to solve with a basis matrix.

pub mod matrix;
pub mod lower_upper;
