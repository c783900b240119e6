// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Per-node evaluation result: code, boundary, anchors and elements

mod anchor;
mod code;
mod element;

pub use anchor::{Anchor, AnchorTable};
pub use code::{format_number, quote, Call, CodeFragment, Param};
pub use element::{ElementValue, PartNames, ResultElement, ResultElements};

use crate::geometry::{AffineTransform, BooleanOp, Boundary, BoundaryMerge, BoundingBox, Dimension, Transform3D};

/// Output of evaluating one node, expressed in that node's local frame
#[derive(Debug, Clone)]
pub struct Output<D: Dimension> {
    pub code: CodeFragment,
    pub boundary: Boundary<D>,
    pub anchors: AnchorTable,
    pub elements: ResultElements,
}

impl<D: Dimension> Output<D> {
    pub fn new(code: CodeFragment, boundary: Boundary<D>) -> Self {
        Self {
            code,
            boundary,
            anchors: AnchorTable::new(),
            elements: ResultElements::new(),
        }
    }

    /// No code and no extent
    pub fn empty() -> Self {
        Self::new(CodeFragment::Empty, Boundary::empty())
    }

    /// Merge sibling outputs under a boolean operation
    ///
    /// A difference without a minuend, or an intersection with an empty
    /// operand, produces no code and no extent. Anchors and elements are
    /// still merged.
    pub fn combining(outputs: Vec<Output<D>>, op: BooleanOp, merge: &BoundaryMerge<D>) -> Self {
        let anchors = AnchorTable::merge(outputs.iter().map(|o| &o.anchors));
        let elements = ResultElements::combine(outputs.iter().map(|o| &o.elements), op);

        let annihilated = match op {
            BooleanOp::Difference => outputs.first().map_or(true, |o| o.code.is_empty()),
            BooleanOp::Intersection => outputs.iter().any(|o| o.code.is_empty()),
            BooleanOp::Union | BooleanOp::MinkowskiSum => false,
        };
        if annihilated {
            return Self {
                anchors,
                elements,
                ..Self::empty()
            };
        }

        let boundaries: Vec<Boundary<D>> = outputs.iter().map(|o| o.boundary.clone()).collect();
        let boundary = Boundary::merge(&boundaries, merge);
        let code = CodeFragment::call(op.module_name()).children(outputs.into_iter().map(|o| o.code));

        Self {
            code,
            boundary,
            anchors,
            elements,
        }
    }

    /// Apply `transform` to code, boundary and anchors
    pub fn transformed(self, transform: &D::Transform) -> Self {
        if transform.is_identity() {
            return self;
        }
        let spatial = D::to_3d(transform);
        Self {
            code: self
                .code
                .wrapped(CodeFragment::call("multmatrix").param("m", spatial)),
            boundary: self.boundary.transformed(transform),
            anchors: self.anchors.transformed(&spatial),
            elements: self.elements,
        }
    }

    pub fn map_code(mut self, f: impl FnOnce(CodeFragment) -> CodeFragment) -> Self {
        self.code = f(self.code);
        self
    }

    pub fn with_boundary(mut self, boundary: Boundary<D>) -> Self {
        self.boundary = boundary;
        self
    }

    pub fn defining_anchor(mut self, anchor: Anchor, transform: Transform3D) -> Self {
        self.anchors.define(anchor, transform);
        self
    }

    pub fn with_element(mut self, value: ElementValue) -> Self {
        self.elements.insert(value);
        self
    }

    pub fn bounding_box(&self) -> Option<BoundingBox<D>> {
        self.boundary.bounding_box()
    }

    pub fn anchor(&self, anchor: &Anchor) -> Option<Transform3D> {
        self.anchors.get(anchor).copied()
    }

    pub fn element<T: ResultElement>(&self) -> Option<&T> {
        self.elements.get::<T>()
    }
}
