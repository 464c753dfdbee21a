//! # Representing linear programs
//!
//! Linear programs in equality form, and the elements they are built from.
pub mod elements;
pub mod equality_form;
