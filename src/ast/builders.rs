// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Fluent constructors for geometry trees

use super::{Deferred, Environment, Extrusion, Modifier, Node, Projection, TreeDimension};
use crate::context::{keys, Color, Context, ContextKey, FacetPolicy};
use crate::error::{Error, Result};
use crate::geometry::{
    AffineTransform, BooleanOp, Boundary, BoundaryMerge, BoundingBox, Circle, Coordinate, Cube,
    Cylinder, Polygon, Rectangle, Shape, Sphere, Transform2D, Transform3D, Vec2, Vec3, D2, D3,
};
use crate::output::{Anchor, ElementValue, PartNames, ResultElement};
use std::sync::Arc;

/// Where a measured extent is moved to along one axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Alignment {
    /// Lower edge at the origin
    Min,
    Center,
    /// Upper edge at the origin
    Max,
}

impl Alignment {
    fn offset<D: TreeDimension>(&self, bbox: &BoundingBox<D>, axis: usize) -> f64 {
        match self {
            Alignment::Min => -bbox.min.component(axis),
            Alignment::Center => -bbox.center().component(axis),
            Alignment::Max => -bbox.max.component(axis),
        }
    }
}

impl<D: TreeDimension> Node<D> {
    pub fn shape(shape: impl Shape<D> + 'static) -> Self {
        Node::Shape(Arc::new(shape))
    }

    // Boolean operations

    /// Combine children with `op`, merging boundaries the default way for it
    pub fn combined(op: BooleanOp, children: impl IntoIterator<Item = Node<D>>) -> Self {
        Self::combined_with(op, BoundaryMerge::for_operation(op), children)
    }

    pub fn combined_with(
        op: BooleanOp,
        merge: BoundaryMerge<D>,
        children: impl IntoIterator<Item = Node<D>>,
    ) -> Self {
        Node::Combine {
            op,
            merge,
            children: children.into_iter().collect(),
        }
    }

    pub fn union(children: impl IntoIterator<Item = Node<D>>) -> Self {
        Self::combined(BooleanOp::Union, children)
    }

    /// The first child minus all the others
    pub fn difference(children: impl IntoIterator<Item = Node<D>>) -> Self {
        Self::combined(BooleanOp::Difference, children)
    }

    pub fn intersection(children: impl IntoIterator<Item = Node<D>>) -> Self {
        Self::combined(BooleanOp::Intersection, children)
    }

    pub fn minkowski(children: impl IntoIterator<Item = Node<D>>) -> Self {
        Self::combined(BooleanOp::MinkowskiSum, children)
    }

    pub fn adding(self, other: Node<D>) -> Self {
        Self::union([self, other])
    }

    pub fn subtracting(self, other: Node<D>) -> Self {
        Self::difference([self, other])
    }

    pub fn intersecting(self, other: Node<D>) -> Self {
        Self::intersection([self, other])
    }

    // Transforms

    pub fn transformed(self, transform: D::Transform) -> Self {
        Node::Transform {
            transform,
            child: Arc::new(self),
        }
    }

    pub fn translated(self, offset: D::Vector) -> Self {
        self.transformed(D::Transform::translation(offset))
    }

    pub fn scaled(self, factors: D::Vector) -> Self {
        self.transformed(D::Transform::scaling(factors))
    }

    pub fn scaled_uniformly(self, factor: f64) -> Self {
        self.scaled(D::Vector::from_fn(|_| factor))
    }

    // Environment

    /// Set an arbitrary context entry for this subtree
    pub fn with_value<T: std::any::Any + Send + Sync>(self, key: ContextKey, value: T) -> Self {
        self.with_environment(Environment::new().with(key, value))
    }

    pub fn with_environment(self, environment: Environment) -> Self {
        Node::Environment {
            environment,
            child: Arc::new(self),
        }
    }

    pub fn with_facets(self, facets: FacetPolicy) -> Self {
        self.with_value(keys::FACETS, facets)
    }

    pub fn with_tolerance(self, tolerance: f64) -> Self {
        self.with_value(keys::TOLERANCE, tolerance)
    }

    pub fn colored(self, color: Color) -> Self {
        Node::Color {
            color,
            child: Arc::new(self),
        }
    }

    // Debug modifiers

    fn modified(self, modifier: Modifier) -> Self {
        Node::Modifier {
            modifier,
            child: Arc::new(self),
        }
    }

    pub fn highlighted(self) -> Self {
        self.modified(Modifier::Highlighted)
    }

    pub fn background(self) -> Self {
        self.modified(Modifier::Background)
    }

    pub fn disabled(self) -> Self {
        self.modified(Modifier::Disabled)
    }

    pub fn only(self) -> Self {
        self.modified(Modifier::Only)
    }

    /// Report `boundary` as this subtree's extent instead of the computed one
    pub fn with_bounds(self, boundary: Boundary<D>) -> Self {
        Node::Bounds {
            boundary,
            child: Arc::new(self),
        }
    }

    // Anchors and elements

    /// Define `anchor` at `transform` relative to this subtree's frame
    pub fn defining_anchor(self, anchor: &Anchor, transform: Transform3D) -> Self {
        Node::Anchor {
            anchor: anchor.clone(),
            transform,
            child: Arc::new(self),
        }
    }

    /// Move this subtree so that `anchor` lands on the origin
    ///
    /// Evaluation fails with [`Error::UndefinedAnchor`] if the subtree never
    /// defines `anchor`.
    pub fn anchored(self, anchor: &Anchor) -> Self {
        Node::Anchored {
            anchor: anchor.clone(),
            child: Arc::new(self),
        }
    }

    pub fn with_element<E: ResultElement>(self, element: E) -> Self {
        Node::Element {
            value: ElementValue::new(element),
            child: Arc::new(self),
        }
    }

    /// Tag this subtree with a part name
    pub fn named(self, name: impl Into<String>) -> Self {
        self.with_element(PartNames::single(name))
    }

    // Deferred construction

    /// Node built from the evaluation context when evaluated
    pub fn deferred(build: impl Fn(&Context) -> Result<Node<D>> + Send + Sync + 'static) -> Self {
        Node::Deferred(Deferred::new(build))
    }

    /// Build a node from this subtree and its evaluated bounding box
    pub fn measuring(
        self,
        build: impl Fn(Node<D>, Option<BoundingBox<D>>) -> Node<D> + Send + Sync + 'static,
    ) -> Self {
        Self::deferred(move |ctx| {
            let bounds = self.evaluate(ctx)?.bounding_box();
            Ok(build(self.clone(), bounds))
        })
    }

    /// Build a node from this subtree and its evaluated element of type `E`
    pub fn reading_element<E: ResultElement>(
        self,
        build: impl Fn(Node<D>, Option<&E>) -> Node<D> + Send + Sync + 'static,
    ) -> Self {
        Self::deferred(move |ctx| {
            let out = self.evaluate(ctx)?;
            Ok(build(self.clone(), out.element::<E>()))
        })
    }

    /// Translate so that the measured extent sits at the origin as requested
    /// on each listed axis
    pub fn aligned(self, alignments: &[(usize, Alignment)]) -> Self {
        let alignments = alignments.to_vec();
        self.measuring(move |node, bounds| {
            let Some(bbox) = bounds else {
                return node;
            };
            let offset = D::Vector::from_fn(|axis| {
                alignments
                    .iter()
                    .rev()
                    .find(|(a, _)| *a == axis)
                    .map_or(0.0, |(_, alignment)| alignment.offset(&bbox, axis))
            });
            node.translated(offset)
        })
    }
}

impl Node<D3> {
    /// Euler rotation in degrees, applied X then Y then Z
    pub fn rotated(self, x: f64, y: f64, z: f64) -> Self {
        self.transformed(Transform3D::rotation(x, y, z))
    }

    pub fn rotated_about(self, axis: Vec3, degrees: f64) -> Self {
        self.transformed(Transform3D::rotation_about(axis, degrees))
    }

    /// Reflect across the plane through the origin with the given normal
    pub fn mirrored(self, normal: Vec3) -> Self {
        self.transformed(Transform3D::mirror(normal))
    }

    /// Flatten onto the XY plane
    pub fn projected(self) -> Node<D2> {
        Node::Change(Arc::new(Projection { child: self }))
    }
}

impl Node<D2> {
    pub fn rotated(self, degrees: f64) -> Self {
        self.transformed(Transform2D::rotation(degrees))
    }

    pub fn mirrored(self, normal: Vec2) -> Self {
        self.transformed(Transform2D::mirror(normal))
    }

    pub fn extruded(self, height: f64) -> Result<Node<D3>> {
        self.extruded_twisting(height, 0.0, Vec2::new(1.0, 1.0))
    }

    /// Linear extrusion twisting clockwise by `twist` degrees and scaling the
    /// top face by `top_scale`
    pub fn extruded_twisting(self, height: f64, twist: f64, top_scale: Vec2) -> Result<Node<D3>> {
        if !height.is_finite() || height <= 0.0 {
            return Err(Error::invalid("linear_extrude", format!("height must be positive, got {height}")));
        }
        if !twist.is_finite() {
            return Err(Error::invalid("linear_extrude", "twist must be finite"));
        }
        if top_scale.iter().any(|s| !s.is_finite() || *s < 0.0) {
            return Err(Error::invalid("linear_extrude", "top scale must be finite and non-negative"));
        }
        Ok(Node::Change(Arc::new(Extrusion::Linear {
            child: self,
            height,
            twist,
            top_scale,
        })))
    }

    /// Revolve around the Z axis; X becomes the radius and Y the height
    pub fn revolved(self, angle: f64) -> Result<Node<D3>> {
        if !angle.is_finite() || angle <= 0.0 || angle > 360.0 {
            return Err(Error::invalid("rotate_extrude", format!("angle must be in (0, 360], got {angle}")));
        }
        Ok(Node::Change(Arc::new(Extrusion::Rotational { child: self, angle })))
    }
}

impl From<Cube> for Node<D3> {
    fn from(cube: Cube) -> Self {
        Node::shape(cube)
    }
}

impl From<Sphere> for Node<D3> {
    fn from(sphere: Sphere) -> Self {
        Node::shape(sphere)
    }
}

impl From<Cylinder> for Node<D3> {
    fn from(cylinder: Cylinder) -> Self {
        Node::shape(cylinder)
    }
}

impl From<Rectangle> for Node<D2> {
    fn from(rectangle: Rectangle) -> Self {
        Node::shape(rectangle)
    }
}

impl From<Circle> for Node<D2> {
    fn from(circle: Circle) -> Self {
        Node::shape(circle)
    }
}

impl From<Polygon> for Node<D2> {
    fn from(polygon: Polygon) -> Self {
        Node::shape(polygon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::Output;

    fn cube(x: f64, y: f64, z: f64) -> Node<D3> {
        Cube::new(Vec3::new(x, y, z), false).unwrap().into()
    }

    fn eval<D: TreeDimension>(node: &Node<D>) -> Output<D> {
        node.evaluate(&Context::new()).unwrap()
    }

    #[test]
    fn test_aligned_centers_and_drops() {
        let node = cube(10.0, 4.0, 2.0)
            .translated(Vec3::new(5.0, 5.0, 5.0))
            .aligned(&[(0, Alignment::Center), (2, Alignment::Max)]);
        let bbox = eval(&node).bounding_box().unwrap();
        assert_eq!(bbox.min, Vec3::new(-5.0, 5.0, -2.0));
        assert_eq!(bbox.max, Vec3::new(5.0, 9.0, 0.0));
    }

    #[test]
    fn test_aligned_empty_is_unchanged() {
        let node = Node::<D2>::Empty.aligned(&[(0, Alignment::Min)]);
        assert!(eval(&node).bounding_box().is_none());
    }

    #[test]
    fn test_measuring_sees_bounds() {
        let node = cube(3.0, 3.0, 3.0).measuring(|node, bounds| {
            let size = bounds.map_or(0.0, |b| b.size().x);
            node.adding(cube(size, 1.0, 1.0).translated(Vec3::new(0.0, 0.0, 10.0)))
        });
        let bbox = eval(&node).bounding_box().unwrap();
        assert_eq!(bbox.max, Vec3::new(3.0, 3.0, 11.0));
    }

    #[test]
    fn test_reading_element() {
        let node = cube(1.0, 1.0, 1.0)
            .named("lid")
            .reading_element::<PartNames>(|node, names| {
                let lid = names.is_some_and(|n| n.contains("lid"));
                if lid { node.colored(Color::rgb(1.0, 0.0, 0.0)) } else { node }
            });
        assert!(eval(&node).code.render().starts_with("color(c=[1.000000, 0.000000, 0.000000, 1.000000]) cube("));
    }

    #[test]
    fn test_environment_builders_reach_leaves() {
        let node = Node::from(Sphere::new(10.0).unwrap()).with_facets(FacetPolicy::Fixed { count: 9 });
        assert!(eval(&node).code.render().ends_with("$fn=9);"));

        let probe = Node::<D3>::deferred(|ctx| {
            assert_eq!(ctx.tolerance(), 0.25);
            assert_eq!(ctx.get::<&str>(&ContextKey::custom("material")), Some(&"pla"));
            Ok(Node::Empty)
        });
        let node = probe
            .with_tolerance(0.25)
            .with_value(ContextKey::custom("material"), "pla");
        eval(&node);
    }

    #[test]
    fn test_invalid_extrusions() {
        let square = || Node::from(Rectangle::new(Vec2::new(1.0, 1.0), false).unwrap());
        assert!(square().extruded(0.0).is_err());
        assert!(square().extruded_twisting(1.0, f64::INFINITY, Vec2::new(1.0, 1.0)).is_err());
        assert!(square().revolved(400.0).is_err());
        assert!(square().revolved(-10.0).is_err());
        assert!(square().revolved(180.0).is_ok());
    }

    #[test]
    fn test_with_bounds_overrides_extent() {
        let bounds = Boundary::from_bounding_box(&BoundingBox::new(Vec3::zeros(), Vec3::new(1.0, 1.0, 1.0)));
        let out = eval(&cube(5.0, 5.0, 5.0).with_bounds(bounds));
        assert_eq!(out.bounding_box().unwrap().max, Vec3::new(1.0, 1.0, 1.0));
        assert!(out.code.render().contains("5.000000"));
    }

    #[test]
    fn test_mirrored_and_rotated_2d() {
        let square = Node::from(Rectangle::new(Vec2::new(2.0, 1.0), false).unwrap());
        let bbox = eval(&square.clone().mirrored(Vec2::new(1.0, 0.0))).bounding_box().unwrap();
        assert_eq!(bbox.min.x, -2.0);
        let bbox = eval(&square.rotated(90.0)).bounding_box().unwrap();
        approx::assert_relative_eq!(bbox.min.x, -1.0, epsilon = 1e-9);
        approx::assert_relative_eq!(bbox.max.y, 2.0, epsilon = 1e-9);
    }

    fn doubled<D: TreeDimension>(node: &Node<D>) -> Node<D> {
        Node::union([node.clone(), node.clone().measuring(|node, _| node)])
    }

    #[test]
    fn test_generic_clone_across_dimension_changes() {
        let profile = Node::from(Rectangle::new(Vec2::new(2.0, 1.0), false).unwrap());
        let flat = eval(&doubled(&profile)).bounding_box().unwrap();
        assert_eq!(flat.max, Vec2::new(2.0, 1.0));

        let solid = doubled(&profile.extruded(4.0).unwrap());
        let out = eval(&solid);
        assert_eq!(out.bounding_box().unwrap().max, Vec3::new(2.0, 1.0, 4.0));
        assert_eq!(out.code.render().matches("linear_extrude(").count(), 2);
    }
}
