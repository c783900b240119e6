// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! 2D affine transforms

use super::{AffineTransform, Transform3D, Vec2};
use nalgebra::{Matrix3, Matrix4, Point2, Rotation2};
use serde::{Deserialize, Serialize};

/// 2D affine transform backed by a homogeneous 3x3 matrix
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform2D {
    matrix: Matrix3<f64>,
}

impl Transform2D {
    pub fn from_matrix(matrix: Matrix3<f64>) -> Self {
        Self { matrix }
    }

    pub fn matrix(&self) -> &Matrix3<f64> {
        &self.matrix
    }

    /// Counter-clockwise rotation in degrees
    pub fn rotation(degrees: f64) -> Self {
        Self::from_matrix(Rotation2::new(degrees.to_radians()).to_homogeneous())
    }

    /// Reflection across the line through the origin with the given normal
    pub fn mirror(normal: Vec2) -> Self {
        let length = normal.norm();
        if length == 0.0 {
            return Self::identity();
        }
        let n = normal / length;
        let reflection = nalgebra::Matrix2::identity() - (n * n.transpose()) * 2.0;
        Self::from_matrix(reflection.to_homogeneous())
    }

    /// Embed in 3D, acting on the XY plane and leaving Z untouched
    pub fn to_3d(&self) -> Transform3D {
        let m = &self.matrix;
        let mut embedded = Matrix4::identity();
        embedded[(0, 0)] = m[(0, 0)];
        embedded[(0, 1)] = m[(0, 1)];
        embedded[(1, 0)] = m[(1, 0)];
        embedded[(1, 1)] = m[(1, 1)];
        embedded[(0, 3)] = m[(0, 2)];
        embedded[(1, 3)] = m[(1, 2)];
        Transform3D::from_matrix(embedded)
    }
}

impl AffineTransform for Transform2D {
    type Vector = Vec2;

    fn identity() -> Self {
        Self::from_matrix(Matrix3::identity())
    }

    fn translation(offset: Vec2) -> Self {
        Self::from_matrix(Matrix3::new_translation(&offset))
    }

    fn scaling(factors: Vec2) -> Self {
        Self::from_matrix(Matrix3::new_nonuniform_scaling(&factors))
    }

    fn concatenated(&self, other: &Self) -> Self {
        Self::from_matrix(self.matrix * other.matrix)
    }

    fn inverse(&self) -> Self {
        match self.matrix.try_inverse() {
            Some(inverse) if inverse.iter().all(|v| v.is_finite()) => Self::from_matrix(inverse),
            _ => {
                log::warn!("singular 2D transform has no inverse; keeping it unchanged");
                *self
            }
        }
    }

    fn apply(&self, point: Vec2) -> Vec2 {
        self.matrix.transform_point(&Point2::from(point)).coords
    }

    fn interpolated(&self, other: &Self, factor: f64) -> Self {
        Self::from_matrix(self.matrix + (other.matrix - self.matrix) * factor)
    }

    fn is_identity(&self) -> bool {
        self.matrix == Matrix3::identity()
    }
}

impl Default for Transform2D {
    fn default() -> Self {
        Self::identity()
    }
}

impl From<Transform2D> for Transform3D {
    fn from(transform: Transform2D) -> Self {
        transform.to_3d()
    }
}
