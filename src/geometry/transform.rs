// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! 3D affine transforms and the transform trait shared with 2D

use super::{Coordinate, Vec3};
use nalgebra::{Matrix4, Point3, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Affine transform over a coordinate type
///
/// `a.concatenated(&b)` applies `b` first and then `a`, so
/// `a.concatenated(&b).apply(p) == a.apply(b.apply(p))`.
pub trait AffineTransform: Copy + Debug + PartialEq + Send + Sync + 'static {
    type Vector: Coordinate;

    fn identity() -> Self;

    fn translation(offset: Self::Vector) -> Self;

    fn scaling(factors: Self::Vector) -> Self;

    fn concatenated(&self, other: &Self) -> Self;

    /// Inverse transform; a singular transform is returned unchanged
    fn inverse(&self) -> Self;

    fn apply(&self, point: Self::Vector) -> Self::Vector;

    /// Element-wise interpolation between two matrices
    fn interpolated(&self, other: &Self, factor: f64) -> Self;

    fn is_identity(&self) -> bool;

    /// Translation component of the transform
    fn offset(&self) -> Self::Vector {
        self.apply(Self::Vector::zero())
    }
}

/// 3D affine transform backed by a homogeneous 4x4 matrix
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform3D {
    matrix: Matrix4<f64>,
}

impl Transform3D {
    pub fn from_matrix(matrix: Matrix4<f64>) -> Self {
        Self { matrix }
    }

    pub fn matrix(&self) -> &Matrix4<f64> {
        &self.matrix
    }

    /// Rotation by Euler angles in degrees, applied X then Y then Z
    pub fn rotation(x: f64, y: f64, z: f64) -> Self {
        let rx = UnitQuaternion::from_axis_angle(&Vector3::x_axis(), x.to_radians());
        let ry = UnitQuaternion::from_axis_angle(&Vector3::y_axis(), y.to_radians());
        let rz = UnitQuaternion::from_axis_angle(&Vector3::z_axis(), z.to_radians());
        Self::from_matrix((rz * ry * rx).to_homogeneous())
    }

    /// Rotation in degrees around an arbitrary axis through the origin
    pub fn rotation_about(axis: Vec3, degrees: f64) -> Self {
        if axis.norm() == 0.0 {
            return Self::identity();
        }
        let axis = nalgebra::Unit::new_normalize(axis);
        Self::from_matrix(UnitQuaternion::from_axis_angle(&axis, degrees.to_radians()).to_homogeneous())
    }

    /// Reflection across the plane through the origin with the given normal
    pub fn mirror(normal: Vec3) -> Self {
        let length = normal.norm();
        if length == 0.0 {
            return Self::identity();
        }
        let n = normal / length;
        let reflection = nalgebra::Matrix3::identity() - (n * n.transpose()) * 2.0;
        Self::from_matrix(reflection.to_homogeneous())
    }

    /// Shear where `x` grows with `y` by the given factor
    pub fn shearing_xy(factor: f64) -> Self {
        let mut matrix = Matrix4::identity();
        matrix[(0, 1)] = factor;
        Self::from_matrix(matrix)
    }

    /// Approximate equality with absolute tolerance on every matrix entry
    pub fn approx_eq(&self, other: &Transform3D, tolerance: f64) -> bool {
        self.matrix
            .iter()
            .zip(other.matrix.iter())
            .all(|(a, b)| (a - b).abs() <= tolerance)
    }

    /// Row-major entries, the layout `multmatrix` expects
    pub fn rows(&self) -> [[f64; 4]; 4] {
        let mut rows = [[0.0; 4]; 4];
        for (r, row) in rows.iter_mut().enumerate() {
            for (c, value) in row.iter_mut().enumerate() {
                *value = self.matrix[(r, c)];
            }
        }
        rows
    }
}

impl AffineTransform for Transform3D {
    type Vector = Vec3;

    fn identity() -> Self {
        Self::from_matrix(Matrix4::identity())
    }

    fn translation(offset: Vec3) -> Self {
        Self::from_matrix(Matrix4::new_translation(&offset))
    }

    fn scaling(factors: Vec3) -> Self {
        Self::from_matrix(Matrix4::new_nonuniform_scaling(&factors))
    }

    fn concatenated(&self, other: &Self) -> Self {
        Self::from_matrix(self.matrix * other.matrix)
    }

    fn inverse(&self) -> Self {
        match self.matrix.try_inverse() {
            Some(inverse) if inverse.iter().all(|v| v.is_finite()) => Self::from_matrix(inverse),
            _ => {
                log::warn!("singular 3D transform has no inverse; keeping it unchanged");
                *self
            }
        }
    }

    fn apply(&self, point: Vec3) -> Vec3 {
        self.matrix.transform_point(&Point3::from(point)).coords
    }

    fn interpolated(&self, other: &Self, factor: f64) -> Self {
        Self::from_matrix(self.matrix + (other.matrix - self.matrix) * factor)
    }

    fn is_identity(&self) -> bool {
        self.matrix == Matrix4::identity()
    }
}

impl Default for Transform3D {
    fn default() -> Self {
        Self::identity()
    }
}
