// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Geometry tree module
//!
//! Declarative trees of shapes, boolean operations, transforms and
//! environment wrappers, and their evaluation into OpenSCAD code.

mod builders;
mod evaluator;
mod extrusion;
mod node;

pub use builders::Alignment;
pub use evaluator::{Evaluator, Rendered};
pub use extrusion::{Extrusion, Projection};
pub use node::{Deferred, Environment, Geometry2D, Geometry3D, Modifier, Node, TreeDimension};
