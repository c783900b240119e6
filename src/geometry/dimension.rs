// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Dimensionality markers shared by boundaries, transforms and nodes

use super::{AffineTransform, Transform2D, Transform3D};
use nalgebra::{Vector2, Vector3};
use std::fmt::Debug;
use std::ops::{Add, Mul, Sub};

/// 2D vector type alias
pub type Vec2 = Vector2<f64>;

/// 3D vector type alias
pub type Vec3 = Vector3<f64>;

/// A point or offset in 2- or 3-dimensional space
pub trait Coordinate:
    Copy
    + Debug
    + PartialEq
    + Send
    + Sync
    + 'static
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<f64, Output = Self>
{
    /// Number of axes
    const AXES: usize;

    fn zero() -> Self;

    fn component(&self, axis: usize) -> f64;

    /// Build a coordinate from a per-axis function
    fn from_fn(f: impl FnMut(usize) -> f64) -> Self;

    fn distance(&self, other: &Self) -> f64;

    fn lerp(&self, other: &Self, t: f64) -> Self {
        *self + (*other - *self) * t
    }
}

impl Coordinate for Vec2 {
    const AXES: usize = 2;

    fn zero() -> Self {
        Vector2::zeros()
    }

    fn component(&self, axis: usize) -> f64 {
        self[axis]
    }

    fn from_fn(mut f: impl FnMut(usize) -> f64) -> Self {
        Vector2::new(f(0), f(1))
    }

    fn distance(&self, other: &Self) -> f64 {
        (self - other).norm()
    }
}

impl Coordinate for Vec3 {
    const AXES: usize = 3;

    fn zero() -> Self {
        Vector3::zeros()
    }

    fn component(&self, axis: usize) -> f64 {
        self[axis]
    }

    fn from_fn(mut f: impl FnMut(usize) -> f64) -> Self {
        Vector3::new(f(0), f(1), f(2))
    }

    fn distance(&self, other: &Self) -> f64 {
        (self - other).norm()
    }
}

/// Marker trait tying a vector type to its affine transform type
pub trait Dimension: Copy + Debug + Default + PartialEq + Send + Sync + 'static {
    type Vector: Coordinate;
    type Transform: AffineTransform<Vector = Self::Vector>;

    const NAME: &'static str;

    /// Embed a transform of this dimensionality in 3D space
    fn to_3d(transform: &Self::Transform) -> Transform3D;

    /// Restrict a 3D transform to this dimensionality
    fn from_3d(transform: &Transform3D) -> Self::Transform;
}

/// Two-dimensional geometry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct D2;

/// Three-dimensional geometry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct D3;

impl Dimension for D2 {
    type Vector = Vec2;
    type Transform = Transform2D;

    const NAME: &'static str = "2D";

    fn to_3d(transform: &Transform2D) -> Transform3D {
        transform.to_3d()
    }

    fn from_3d(transform: &Transform3D) -> Transform2D {
        let m = transform.matrix();
        Transform2D::from_matrix(nalgebra::Matrix3::new(
            m[(0, 0)], m[(0, 1)], m[(0, 3)],
            m[(1, 0)], m[(1, 1)], m[(1, 3)],
            0.0, 0.0, 1.0,
        ))
    }
}

impl Dimension for D3 {
    type Vector = Vec3;
    type Transform = Transform3D;

    const NAME: &'static str = "3D";

    fn to_3d(transform: &Transform3D) -> Transform3D {
        *transform
    }

    fn from_3d(transform: &Transform3D) -> Transform3D {
        *transform
    }
}
