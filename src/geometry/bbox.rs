// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Bounding box utilities

use super::{Coordinate, Dimension};
use serde::Serialize;

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(bound(serialize = "D::Vector: Serialize"))]
pub struct BoundingBox<D: Dimension> {
    pub min: D::Vector,
    pub max: D::Vector,
}

impl<D: Dimension> BoundingBox<D> {
    pub fn new(min: D::Vector, max: D::Vector) -> Self {
        Self { min, max }
    }

    /// Smallest box containing every point, or `None` for no points
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a D::Vector>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = *points.next()?;
        let mut bbox = Self::new(first, first);
        for point in points {
            bbox.expand_to_include(point);
        }
        Some(bbox)
    }

    pub fn expand_to_include(&mut self, point: &D::Vector) {
        self.min = D::Vector::from_fn(|axis| self.min.component(axis).min(point.component(axis)));
        self.max = D::Vector::from_fn(|axis| self.max.component(axis).max(point.component(axis)));
    }

    pub fn union(&self, other: &BoundingBox<D>) -> Self {
        let mut bbox = *self;
        bbox.expand_to_include(&other.min);
        bbox.expand_to_include(&other.max);
        bbox
    }

    pub fn center(&self) -> D::Vector {
        self.min.lerp(&self.max, 0.5)
    }

    pub fn size(&self) -> D::Vector {
        self.max - self.min
    }

    /// Area in 2D, volume in 3D
    pub fn measure(&self) -> f64 {
        let size = self.size();
        (0..D::Vector::AXES).map(|axis| size.component(axis)).product()
    }

    pub fn contains(&self, point: &D::Vector) -> bool {
        (0..D::Vector::AXES).all(|axis| {
            let v = point.component(axis);
            v >= self.min.component(axis) && v <= self.max.component(axis)
        })
    }

    /// All 2^N corners of the box
    pub fn corners(&self) -> Vec<D::Vector> {
        let axes = D::Vector::AXES;
        (0..1usize << axes)
            .map(|bits| {
                D::Vector::from_fn(|axis| {
                    if bits & (1 << axis) == 0 {
                        self.min.component(axis)
                    } else {
                        self.max.component(axis)
                    }
                })
            })
            .collect()
    }

    /// Check if two bounding boxes are approximately equal within tolerance
    pub fn approx_eq(&self, other: &BoundingBox<D>, tolerance: f64) -> bool {
        (0..D::Vector::AXES).all(|axis| {
            (self.min.component(axis) - other.min.component(axis)).abs() < tolerance
                && (self.max.component(axis) - other.max.component(axis)).abs() < tolerance
        })
    }
}
