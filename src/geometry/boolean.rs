// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Boolean operations and the additive/subtractive sign they impose

use serde::{Deserialize, Serialize};
use std::fmt;

/// Operation combining sibling nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BooleanOp {
    Union,
    Difference,
    Intersection,
    MinkowskiSum,
}

impl BooleanOp {
    /// Module name in the generated program
    pub fn module_name(&self) -> &'static str {
        match self {
            BooleanOp::Union => "union",
            BooleanOp::Difference => "difference",
            BooleanOp::Intersection => "intersection",
            BooleanOp::MinkowskiSum => "minkowski",
        }
    }
}

impl fmt::Display for BooleanOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.module_name())
    }
}

/// Whether geometry currently adds material or carves it away
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Operation {
    #[default]
    Addition,
    Subtraction,
}

impl Operation {
    pub fn inverted(self) -> Self {
        match self {
            Operation::Addition => Operation::Subtraction,
            Operation::Subtraction => Operation::Addition,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_inversion() {
        assert_eq!(Operation::default(), Operation::Addition);
        assert_eq!(Operation::Addition.inverted(), Operation::Subtraction);
        assert_eq!(Operation::Subtraction.inverted().inverted(), Operation::Subtraction);
    }

    #[test]
    fn test_module_names() {
        assert_eq!(BooleanOp::MinkowskiSum.to_string(), "minkowski");
        assert_eq!(BooleanOp::Difference.module_name(), "difference");
    }
}
