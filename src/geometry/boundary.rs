// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Boundary: a reduced set of extreme points approximating a shape's extent

use super::{AffineTransform, BooleanOp, BoundingBox, Coordinate, Dimension, Vec2, Vec3, D2, D3};
use std::fmt;
use std::sync::Arc;

/// Extreme points of a shape
///
/// An empty boundary means "no extent" and is the identity of union merging.
#[derive(Clone, PartialEq)]
pub struct Boundary<D: Dimension> {
    points: Vec<D::Vector>,
}

/// Strategy used to combine the boundaries of sibling nodes
#[derive(Clone)]
pub enum BoundaryMerge<D: Dimension> {
    /// Concatenate every child's points
    Union,
    /// Keep the first child's boundary
    First,
    /// Pairwise sums of the children's points
    MinkowskiSum,
    /// Arbitrary combination of all child boundaries
    Custom(Arc<dyn Fn(&[Boundary<D>]) -> Boundary<D> + Send + Sync>),
}

impl<D: Dimension> BoundaryMerge<D> {
    /// Default strategy for a boolean operation
    pub fn for_operation(op: BooleanOp) -> Self {
        match op {
            BooleanOp::Union | BooleanOp::Intersection => Self::Union,
            BooleanOp::Difference => Self::First,
            BooleanOp::MinkowskiSum => Self::MinkowskiSum,
        }
    }
}

impl<D: Dimension> fmt::Debug for BoundaryMerge<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Union => f.write_str("Union"),
            Self::First => f.write_str("First"),
            Self::MinkowskiSum => f.write_str("MinkowskiSum"),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl<D: Dimension> Boundary<D> {
    pub fn new(points: Vec<D::Vector>) -> Self {
        Self { points }
    }

    pub fn empty() -> Self {
        Self { points: Vec::new() }
    }

    /// Boundary made of the corners of a box
    pub fn from_bounding_box(bbox: &BoundingBox<D>) -> Self {
        Self::new(bbox.corners())
    }

    pub fn points(&self) -> &[D::Vector] {
        &self.points
    }

    pub fn into_points(self) -> Vec<D::Vector> {
        self.points
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn map(&self, f: impl FnMut(&D::Vector) -> D::Vector) -> Self {
        Self::new(self.points.iter().map(f).collect())
    }

    pub fn translated(&self, offset: D::Vector) -> Self {
        self.map(|p| *p + offset)
    }

    pub fn transformed(&self, transform: &D::Transform) -> Self {
        if transform.is_identity() {
            return self.clone();
        }
        self.map(|p| transform.apply(*p))
    }

    pub fn min(&self, axis: usize) -> Option<f64> {
        self.points
            .iter()
            .map(|p| p.component(axis))
            .reduce(f64::min)
    }

    pub fn max(&self, axis: usize) -> Option<f64> {
        self.points
            .iter()
            .map(|p| p.component(axis))
            .reduce(f64::max)
    }

    pub fn bounding_box(&self) -> Option<BoundingBox<D>> {
        BoundingBox::from_points(&self.points)
    }

    /// Concatenation of all points; empty boundaries contribute nothing
    pub fn union<'a>(boundaries: impl IntoIterator<Item = &'a Boundary<D>>) -> Self {
        Self::new(
            boundaries
                .into_iter()
                .flat_map(|b| b.points.iter().copied())
                .collect(),
        )
    }

    /// Pairwise sums of every point in `self` with every point in `other`
    pub fn minkowski_sum(&self, other: &Boundary<D>) -> Self {
        Self::new(
            self.points
                .iter()
                .flat_map(|a| other.points.iter().map(move |b| *a + *b))
                .collect(),
        )
    }

    /// Combine child boundaries with the given strategy
    pub fn merge(boundaries: &[Boundary<D>], strategy: &BoundaryMerge<D>) -> Self {
        match strategy {
            BoundaryMerge::Union => Self::union(boundaries),
            BoundaryMerge::First => boundaries.first().cloned().unwrap_or_else(Self::empty),
            BoundaryMerge::MinkowskiSum => boundaries
                .iter()
                .filter(|b| !b.is_empty())
                .cloned()
                .reduce(|acc, b| acc.minkowski_sum(&b))
                .unwrap_or_else(Self::empty),
            BoundaryMerge::Custom(combine) => combine(boundaries),
        }
    }
}

impl<D: Dimension> Default for Boundary<D> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<D: Dimension> fmt::Debug for Boundary<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Boundary")
            .field("dimension", &D::NAME)
            .field("points", &self.points)
            .finish()
    }
}

impl<D: Dimension> FromIterator<D::Vector> for Boundary<D> {
    fn from_iter<I: IntoIterator<Item = D::Vector>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Evenly spaced angles in degrees covering `[0, sweep]`, both ends included
fn sweep_angles(sweep: f64, steps: usize) -> impl Iterator<Item = f64> {
    let steps = steps.max(1);
    (0..=steps).map(move |i| sweep * i as f64 / steps as f64)
}

impl Boundary<D2> {
    /// Regular polygon approximation of a circle
    pub fn circle(radius: f64, segments: usize) -> Self {
        let segments = segments.max(3);
        (0..segments)
            .map(|i| {
                let angle = std::f64::consts::TAU * i as f64 / segments as f64;
                Vec2::new(radius * angle.cos(), radius * angle.sin())
            })
            .collect()
    }

    /// Lift into the XY plane of 3D space
    pub fn lifted(&self, z: f64) -> Boundary<D3> {
        self.points.iter().map(|p| Vec3::new(p.x, p.y, z)).collect()
    }

    /// Sweep along +Z, scaling towards `top_scale` and twisting clockwise by
    /// `twist` degrees over the full height
    pub fn extruded(&self, height: f64, twist: f64, top_scale: Vec2, steps: usize) -> Boundary<D3> {
        if self.is_empty() {
            return Boundary::empty();
        }
        let steps = if twist == 0.0 { 1 } else { steps.max(1) };
        (0..=steps)
            .flat_map(|i| {
                let t = i as f64 / steps as f64;
                let (sin, cos) = (-twist * t).to_radians().sin_cos();
                let scale = Vec2::new(1.0, 1.0).lerp(&top_scale, t);
                self.points.iter().map(move |p| {
                    let x = p.x * scale.x;
                    let y = p.y * scale.y;
                    Vec3::new(x * cos - y * sin, x * sin + y * cos, height * t)
                })
            })
            .collect()
    }

    /// Revolve around the Z axis, X becoming the radius and Y becoming Z
    pub fn revolved(&self, angle: f64, steps: usize) -> Boundary<D3> {
        if self.is_empty() {
            return Boundary::empty();
        }
        sweep_angles(angle, steps)
            .flat_map(|degrees| {
                let (sin, cos) = degrees.to_radians().sin_cos();
                self.points
                    .iter()
                    .map(move |p| Vec3::new(p.x * cos, p.x * sin, p.y))
            })
            .collect()
    }
}

impl Boundary<D3> {
    /// Drop the Z axis
    pub fn projected(&self) -> Boundary<D2> {
        self.points.iter().map(|p| Vec2::new(p.x, p.y)).collect()
    }

    /// Circles at the bottom and top of a (possibly conical) cylinder
    pub fn cylinder(bottom_radius: f64, top_radius: f64, height: f64, segments: usize) -> Self {
        let bottom = Boundary::<D2>::circle(bottom_radius, segments).lifted(0.0);
        let top = Boundary::<D2>::circle(top_radius, segments).lifted(height);
        Self::union([&bottom, &top])
    }

    /// Rings of a UV sphere including both poles
    pub fn sphere(radius: f64, segments: usize) -> Self {
        let segments = segments.max(3);
        let rings = (segments / 2).max(1);
        let mut points = vec![Vec3::new(0.0, 0.0, radius), Vec3::new(0.0, 0.0, -radius)];
        for ring in 1..rings {
            let phi = std::f64::consts::PI * ring as f64 / rings as f64;
            let z = radius * phi.cos();
            let ring_radius = radius * phi.sin();
            points.extend(Boundary::<D2>::circle(ring_radius, segments).lifted(z).into_points());
        }
        Self::new(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Transform3D;
    use approx::assert_relative_eq;

    fn unit_cube(size: f64) -> Boundary<D3> {
        Boundary::from_bounding_box(&BoundingBox::new(Vec3::zeros(), Vec3::new(size, size, size)))
    }

    #[test]
    fn test_empty_is_union_identity() {
        let cube = unit_cube(10.0);
        let merged = Boundary::union([&Boundary::empty(), &cube, &Boundary::empty()]);
        assert_eq!(merged, cube);
    }

    #[test]
    fn test_empty_stays_empty_through_transforms() {
        let empty = Boundary::<D3>::empty();
        let moved = empty.transformed(&Transform3D::translation(Vec3::new(1.0, 2.0, 3.0)));
        assert!(moved.is_empty());
        assert!(moved.bounding_box().is_none());
    }

    #[test]
    fn test_first_merge() {
        let a = unit_cube(10.0);
        let b = unit_cube(50.0);
        assert_eq!(Boundary::merge(&[a.clone(), b], &BoundaryMerge::First), a);
    }

    #[test]
    fn test_minkowski_is_pairwise() {
        let a = Boundary::<D2>::new(vec![Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0)]);
        let b = Boundary::<D2>::new(vec![Vec2::new(0.0, 2.0), Vec2::new(0.0, 3.0)]);
        let sum = Boundary::merge(&[a, b], &BoundaryMerge::MinkowskiSum);
        assert_eq!(
            sum.points(),
            &[
                Vec2::new(0.0, 2.0),
                Vec2::new(0.0, 3.0),
                Vec2::new(1.0, 2.0),
                Vec2::new(1.0, 3.0)
            ]
        );
    }

    #[test]
    fn test_custom_merge() {
        let keep_last = BoundaryMerge::<D3>::Custom(Arc::new(|all: &[Boundary<D3>]| {
            all.last().cloned().unwrap_or_default()
        }));
        let b = unit_cube(3.0);
        assert_eq!(Boundary::merge(&[unit_cube(1.0), b.clone()], &keep_last), b);
    }

    #[test]
    fn test_extrusion_with_scale() {
        let square = Boundary::<D2>::new(vec![Vec2::new(-1.0, -1.0), Vec2::new(1.0, 1.0)]);
        let solid = square.extruded(10.0, 0.0, Vec2::new(2.0, 2.0), 8);
        let bbox = solid.bounding_box().unwrap();
        assert_eq!(solid.len(), 4);
        assert_relative_eq!(bbox.min, Vec3::new(-2.0, -2.0, 0.0));
        assert_relative_eq!(bbox.max, Vec3::new(2.0, 2.0, 10.0));
    }

    #[test]
    fn test_revolve_covers_full_turn() {
        let profile = Boundary::<D2>::new(vec![Vec2::new(5.0, 0.0), Vec2::new(5.0, 2.0)]);
        let ring = profile.revolved(360.0, 36);
        let bbox = ring.bounding_box().unwrap();
        assert_relative_eq!(bbox.min.x, -5.0, epsilon = 1e-9);
        assert_relative_eq!(bbox.max.y, 5.0, epsilon = 1e-9);
        assert_relative_eq!(bbox.max.z, 2.0);
    }

    #[test]
    fn test_projection_drops_z() {
        let projected = unit_cube(4.0).projected();
        let bbox = projected.bounding_box().unwrap();
        assert_eq!(bbox.max, Vec2::new(4.0, 4.0));
    }
}
