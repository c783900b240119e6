// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Primitive shapes: leaves of the geometry tree

use super::{BezierPath, Boundary, BoundingBox, Dimension, Vec2, Vec3, D2, D3};
use crate::context::Context;
use crate::error::{Error, Result};
use crate::output::{CodeFragment, Param};
use std::fmt::Debug;

/// A leaf shape: emits a module call and reports its extreme points
pub trait Shape<D: Dimension>: Debug + Send + Sync {
    fn code(&self, ctx: &Context) -> CodeFragment;

    fn boundary(&self, ctx: &Context) -> Boundary<D>;
}

fn check_size(shape: &'static str, name: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(Error::invalid(shape, format!("{name} must be finite and non-negative, got {value}")));
    }
    Ok(())
}

fn check_positive(shape: &'static str, name: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(Error::invalid(shape, format!("{name} must be positive, got {value}")));
    }
    Ok(())
}

fn centered_box<D: Dimension>(size: D::Vector, center: bool) -> BoundingBox<D> {
    let max = if center { size * 0.5 } else { size };
    BoundingBox::new(max - size, max)
}

/// Axis-aligned box, `cube()` in the generated program
#[derive(Debug, Clone, PartialEq)]
pub struct Cube {
    pub size: Vec3,
    pub center: bool,
}

impl Cube {
    pub fn new(size: Vec3, center: bool) -> Result<Self> {
        for (axis, value) in size.iter().enumerate() {
            check_size("cube", ["x", "y", "z"][axis], *value)?;
        }
        Ok(Self { size, center })
    }
}

impl Shape<D3> for Cube {
    fn code(&self, _ctx: &Context) -> CodeFragment {
        CodeFragment::call("cube")
            .param("size", self.size)
            .param("center", self.center)
    }

    fn boundary(&self, _ctx: &Context) -> Boundary<D3> {
        Boundary::from_bounding_box(&centered_box::<D3>(self.size, self.center))
    }
}

/// Sphere centered on the origin
#[derive(Debug, Clone, PartialEq)]
pub struct Sphere {
    pub radius: f64,
}

impl Sphere {
    pub fn new(radius: f64) -> Result<Self> {
        check_positive("sphere", "radius", radius)?;
        Ok(Self { radius })
    }
}

impl Shape<D3> for Sphere {
    fn code(&self, ctx: &Context) -> CodeFragment {
        CodeFragment::call("sphere")
            .param("r", self.radius)
            .param("$fn", ctx.facets().facet_count(self.radius))
    }

    fn boundary(&self, ctx: &Context) -> Boundary<D3> {
        Boundary::sphere(self.radius, ctx.facets().facet_count(self.radius))
    }
}

/// Cylinder or truncated cone standing on the XY plane
#[derive(Debug, Clone, PartialEq)]
pub struct Cylinder {
    pub height: f64,
    pub bottom_radius: f64,
    pub top_radius: f64,
    pub center: bool,
}

impl Cylinder {
    pub fn new(height: f64, radius: f64) -> Result<Self> {
        check_positive("cylinder", "radius", radius)?;
        Self::cone(height, radius, radius)
    }

    pub fn cone(height: f64, bottom_radius: f64, top_radius: f64) -> Result<Self> {
        check_positive("cylinder", "height", height)?;
        check_size("cylinder", "bottom radius", bottom_radius)?;
        check_size("cylinder", "top radius", top_radius)?;
        if bottom_radius == 0.0 && top_radius == 0.0 {
            return Err(Error::invalid("cylinder", "at least one radius must be positive"));
        }
        Ok(Self {
            height,
            bottom_radius,
            top_radius,
            center: false,
        })
    }

    pub fn centered(mut self) -> Self {
        self.center = true;
        self
    }

    fn segments(&self, ctx: &Context) -> usize {
        ctx.facets()
            .facet_count(self.bottom_radius.max(self.top_radius))
    }
}

impl Shape<D3> for Cylinder {
    fn code(&self, ctx: &Context) -> CodeFragment {
        CodeFragment::call("cylinder")
            .param("h", self.height)
            .param("r1", self.bottom_radius)
            .param("r2", self.top_radius)
            .param("center", self.center)
            .param("$fn", self.segments(ctx))
    }

    fn boundary(&self, ctx: &Context) -> Boundary<D3> {
        let boundary = Boundary::cylinder(self.bottom_radius, self.top_radius, self.height, self.segments(ctx));
        if self.center {
            boundary.translated(Vec3::new(0.0, 0.0, -self.height / 2.0))
        } else {
            boundary
        }
    }
}

/// Axis-aligned rectangle, `square()` in the generated program
#[derive(Debug, Clone, PartialEq)]
pub struct Rectangle {
    pub size: Vec2,
    pub center: bool,
}

impl Rectangle {
    pub fn new(size: Vec2, center: bool) -> Result<Self> {
        check_size("rectangle", "width", size.x)?;
        check_size("rectangle", "height", size.y)?;
        Ok(Self { size, center })
    }
}

impl Shape<D2> for Rectangle {
    fn code(&self, _ctx: &Context) -> CodeFragment {
        CodeFragment::call("square")
            .param("size", self.size)
            .param("center", self.center)
    }

    fn boundary(&self, _ctx: &Context) -> Boundary<D2> {
        Boundary::from_bounding_box(&centered_box::<D2>(self.size, self.center))
    }
}

/// Circle centered on the origin
#[derive(Debug, Clone, PartialEq)]
pub struct Circle {
    pub radius: f64,
}

impl Circle {
    pub fn new(radius: f64) -> Result<Self> {
        check_positive("circle", "radius", radius)?;
        Ok(Self { radius })
    }
}

impl Shape<D2> for Circle {
    fn code(&self, ctx: &Context) -> CodeFragment {
        CodeFragment::call("circle")
            .param("r", self.radius)
            .param("$fn", ctx.facets().facet_count(self.radius))
    }

    fn boundary(&self, ctx: &Context) -> Boundary<D2> {
        Boundary::circle(self.radius, ctx.facets().facet_count(self.radius))
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Outline {
    Points(Vec<Vec2>),
    Path(BezierPath<Vec2>),
}

/// Polygon from explicit points or from a Bezier path sampled at evaluation
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    outline: Outline,
}

impl Polygon {
    pub fn new(points: Vec<Vec2>) -> Result<Self> {
        if points.len() < 3 {
            return Err(Error::invalid(
                "polygon",
                format!("needs at least 3 points, got {}", points.len()),
            ));
        }
        if points.iter().any(|p| !p.x.is_finite() || !p.y.is_finite()) {
            return Err(Error::invalid("polygon", "points must be finite"));
        }
        Ok(Self {
            outline: Outline::Points(points),
        })
    }

    /// Polygon whose outline is `path`, segmented per the context's facet policy
    pub fn from_path(path: BezierPath<Vec2>) -> Result<Self> {
        if path.is_empty() {
            return Err(Error::invalid("polygon", "path has no curves"));
        }
        Ok(Self {
            outline: Outline::Path(path),
        })
    }

    /// Outline points as evaluated in `ctx`
    pub fn points(&self, ctx: &Context) -> Vec<Vec2> {
        match &self.outline {
            Outline::Points(points) => points.clone(),
            Outline::Path(path) => {
                let mut points = path.points(ctx.segmentation());
                if points.len() > 1 && points.first() == points.last() {
                    points.pop();
                }
                points
            }
        }
    }
}

impl Shape<D2> for Polygon {
    fn code(&self, ctx: &Context) -> CodeFragment {
        let points: Vec<Param> = self.points(ctx).into_iter().map(Param::from).collect();
        CodeFragment::call("polygon").param("points", Param::Vector(points))
    }

    fn boundary(&self, ctx: &Context) -> Boundary<D2> {
        Boundary::new(self.points(ctx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::FacetPolicy;

    #[test]
    fn test_cube_boundary() {
        let ctx = Context::new();
        let cube = Cube::new(Vec3::new(10.0, 20.0, 30.0), false).unwrap();
        let bbox = cube.boundary(&ctx).bounding_box().unwrap();
        assert_eq!(bbox.min, Vec3::zeros());
        assert_eq!(bbox.max, Vec3::new(10.0, 20.0, 30.0));

        let centered = Cube::new(Vec3::new(10.0, 20.0, 30.0), true).unwrap();
        let bbox = centered.boundary(&ctx).bounding_box().unwrap();
        assert_eq!(bbox.min, Vec3::new(-5.0, -10.0, -15.0));
    }

    #[test]
    fn test_invalid_parameters_are_rejected() {
        assert!(Cube::new(Vec3::new(1.0, -1.0, 1.0), false).is_err());
        assert!(Sphere::new(0.0).is_err());
        assert!(Circle::new(f64::NAN).is_err());
        assert!(Cylinder::cone(5.0, 0.0, 0.0).is_err());
        assert!(Cylinder::new(-1.0, 2.0).is_err());
        assert!(Polygon::new(vec![Vec2::zeros(), Vec2::x()]).is_err());
    }

    #[test]
    fn test_facets_follow_context() {
        let ctx = Context::new().with_facets(FacetPolicy::Fixed { count: 12 });
        let circle = Circle::new(3.0).unwrap();
        assert_eq!(circle.code(&ctx).render(), "circle(r=3.000000, $fn=12);");
        assert_eq!(circle.boundary(&ctx).len(), 12);
    }

    #[test]
    fn test_cylinder_centered_boundary() {
        let ctx = Context::new().with_facets(FacetPolicy::Fixed { count: 8 });
        let cylinder = Cylinder::new(10.0, 2.0).unwrap().centered();
        let bbox = cylinder.boundary(&ctx).bounding_box().unwrap();
        assert_eq!(bbox.min.z, -5.0);
        assert_eq!(bbox.max.z, 5.0);
        assert_eq!(bbox.max.x, 2.0);
    }

    #[test]
    fn test_path_polygon_uses_segmentation() {
        let path = BezierPath::new(Vec2::new(0.0, 0.0))
            .line_to(Vec2::new(10.0, 0.0))
            .quadratic_to(Vec2::new(10.0, 10.0), Vec2::new(0.0, 10.0))
            .line_to(Vec2::new(0.0, 0.0));
        let polygon = Polygon::from_path(path).unwrap();

        let coarse = Context::new().with_facets(FacetPolicy::Fixed { count: 2 });
        // start, line end, 2 quadratic segments, closing point dropped
        assert_eq!(polygon.points(&coarse).len(), 4);

        let fine = Context::new().with_facets(FacetPolicy::Fixed { count: 16 });
        assert_eq!(polygon.points(&fine).len(), 18);
    }

    #[test]
    fn test_sphere_boundary_reaches_poles() {
        let ctx = Context::new().with_facets(FacetPolicy::Fixed { count: 16 });
        let bbox = Sphere::new(4.0).unwrap().boundary(&ctx).bounding_box().unwrap();
        assert_eq!(bbox.max.z, 4.0);
        assert_eq!(bbox.min.z, -4.0);
        assert_eq!(bbox.max.x, 4.0);
    }
}
