// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Polyframe code generator
//!
//! Build OpenSCAD models as declarative geometry trees in Rust. Evaluating a
//! tree produces the OpenSCAD program text together with an approximate
//! boundary, named anchors and typed metadata for every subtree.
//!
//! Contexts are passed explicitly through [`Node::evaluate`]. Helpers that
//! would rather read an ambient "current" context can opt into
//! [`context::scope::ContextStack`], usually created inside a
//! [`Node::deferred`] closure and entered with the context it receives.

pub mod ast;
pub mod config;
pub mod context;
pub mod error;
pub mod geometry;
pub mod output;

pub use ast::{Alignment, Evaluator, Geometry2D, Geometry3D, Node, Rendered, TreeDimension};
pub use config::EvaluationConfig;
pub use context::{Color, Context, ContextKey, FacetPolicy};
pub use error::{Error, Result};
pub use geometry::{
    AffineTransform, BezierCurve, BezierPath, BooleanOp, Boundary, BoundaryMerge, BoundingBox,
    Circle, Cube, Cylinder, Polygon, Rectangle, Sphere, Transform2D, Transform3D, Vec2, Vec3, D2,
    D3,
};
pub use output::{Anchor, Output, PartNames, ResultElement};

/// Render a tree with the default configuration
pub fn render<D: TreeDimension>(node: &Node<D>) -> Result<Rendered<D>> {
    Evaluator::new().render(node)
}
