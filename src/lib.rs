//! # A linear program solver with certificates
//!
//! Linear programs in equality form are solved using the two phase Simplex Method as described in
//! the book Combinatorial Optimization by Christos H. Papadimitriou and Kenneth Steiglitz.
//!
//! Every verdict comes with a witness: an optimal basis, a Farkas vector proving infeasibility or
//! a feasible point and ray proving unboundedness. The functions in `algorithm::certificate`
//! check these witnesses independently of the solver.
#![warn(missing_docs)]

pub mod algorithm;
pub mod data;
pub mod error;

#[cfg(test)]
mod tests;
