// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Geometry module - transforms, boundaries, curves and primitive shapes

mod bbox;
mod bezier;
mod boolean;
mod boundary;
mod dimension;
mod primitives;
mod transform;
mod transform2d;

pub use bbox::BoundingBox;
pub use bezier::{BezierCurve, BezierPath, Segmentation};
pub use boolean::{BooleanOp, Operation};
pub use boundary::{Boundary, BoundaryMerge};
pub use dimension::{Coordinate, Dimension, Vec2, Vec3, D2, D3};
pub use primitives::{Circle, Cube, Cylinder, Polygon, Rectangle, Shape, Sphere};
pub use transform::{AffineTransform, Transform3D};
pub use transform2d::Transform2D;
