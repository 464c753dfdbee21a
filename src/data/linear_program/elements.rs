//! # Building blocks to describe linear programs.
use std::fmt::{Display, Formatter, Result as FormatResult};

use serde::{Deserialize, Serialize};

/// A `Constraint` is a type of (in)equality.
///
/// Only `Equal` can be solved; the other variants exist such that problem builders can describe
/// what they have and get a clear rejection.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum ConstraintType {
    /// `a^T x = b`
    #[serde(rename = "=")]
    Equal,
    /// `a^T x >= b`
    #[serde(rename = ">=")]
    Greater,
    /// `a^T x <= b`
    #[serde(rename = "<=")]
    Less,
}

impl Display for ConstraintType {
    fn fmt(&self, f: &mut Formatter) -> FormatResult {
        f.write_str(match self {
            ConstraintType::Equal => "=",
            ConstraintType::Greater => ">=",
            ConstraintType::Less => "<=",
        })
    }
}

/// Direction of optimization.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Objective {
    /// Find the largest objective value.
    #[serde(alias = "max")]
    Maximize,
    /// Find the smallest objective value.
    #[serde(alias = "min")]
    Minimize,
}

impl Default for Objective {
    fn default() -> Self {
        Objective::Maximize
    }
}

impl Display for Objective {
    fn fmt(&self, f: &mut Formatter) -> FormatResult {
        f.write_str(match self {
            Objective::Maximize => "Maximize",
            Objective::Minimize => "Minimize",
        })
    }
}
