// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Nodes that change dimensionality: extrusion into 3D, projection into 2D

use super::{Geometry2D, Geometry3D, TreeDimension};
use crate::context::Context;
use crate::error::Result;
use crate::geometry::{AffineTransform, Transform3D, Vec2, Vec3, D2, D3};
use crate::output::{CodeFragment, Output};

/// Sweep of a 2D tree into 3D
#[derive(Debug, Clone)]
pub enum Extrusion {
    /// Along +Z, optionally twisting (degrees, clockwise) and scaling the top
    Linear {
        child: Geometry2D,
        height: f64,
        twist: f64,
        top_scale: Vec2,
    },
    /// Around the Z axis by `angle` degrees
    Rotational { child: Geometry2D, angle: f64 },
}

/// Flattening of a 3D tree onto the XY plane
#[derive(Debug, Clone)]
pub struct Projection {
    pub child: Geometry3D,
}

/// Largest distance of a 2D boundary from the Z axis
fn sweep_radius(output: &Output<D2>) -> f64 {
    output
        .boundary
        .points()
        .iter()
        .map(|p| p.norm())
        .fold(0.0, f64::max)
}

fn largest_x(output: &Output<D2>) -> f64 {
    output
        .boundary
        .points()
        .iter()
        .map(|p| p.x.abs())
        .fold(0.0, f64::max)
}

impl TreeDimension for D3 {
    type Change = Extrusion;

    fn evaluate_change(change: &Extrusion, ctx: &Context) -> Result<Output<D3>> {
        match change {
            Extrusion::Linear {
                child,
                height,
                twist,
                top_scale,
            } => {
                let inner = child.evaluate(ctx)?;
                let steps = if *twist == 0.0 {
                    1
                } else {
                    ctx.facets().facet_count_for_arc(sweep_radius(&inner), *twist)
                };
                let code = CodeFragment::call("linear_extrude")
                    .param("height", *height)
                    .param("twist", *twist)
                    .param("scale", *top_scale)
                    .param("slices", steps);
                Ok(Output {
                    code: inner.code.wrapped(code),
                    boundary: inner.boundary.extruded(*height, *twist, *top_scale, steps),
                    anchors: inner.anchors,
                    elements: inner.elements,
                })
            }
            Extrusion::Rotational { child, angle } => {
                let inner = child.evaluate(ctx)?;
                let steps = ctx.facets().facet_count_for_arc(largest_x(&inner), *angle);
                let code = CodeFragment::call("rotate_extrude")
                    .param("angle", *angle)
                    .param("$fn", ctx.facets().facet_count(largest_x(&inner)));
                Ok(Output {
                    code: inner.code.wrapped(code),
                    boundary: inner.boundary.revolved(*angle, steps),
                    anchors: inner.anchors,
                    elements: inner.elements,
                })
            }
        }
    }
}

impl TreeDimension for D2 {
    type Change = Projection;

    fn evaluate_change(change: &Projection, ctx: &Context) -> Result<Output<D2>> {
        let flatten = Transform3D::scaling(Vec3::new(1.0, 1.0, 0.0));
        let inner = change.child.evaluate(&ctx.concatenating_transform(&flatten))?;
        Ok(Output {
            code: inner.code.wrapped(CodeFragment::call("projection")),
            boundary: inner.boundary.projected(),
            anchors: inner.anchors,
            elements: inner.elements,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::FacetPolicy;
    use crate::geometry::{Circle, Cube, Rectangle};
    use approx::assert_relative_eq;

    #[test]
    fn test_linear_extrusion_bounds() {
        let square = Geometry2D::from(Rectangle::new(Vec2::new(4.0, 2.0), false).unwrap());
        let solid = square.extruded(10.0).unwrap();
        let out = solid.evaluate(&Context::new()).unwrap();
        let bbox = out.bounding_box().unwrap();
        assert_eq!(bbox.min, Vec3::zeros());
        assert_eq!(bbox.max, Vec3::new(4.0, 2.0, 10.0));
        assert!(out.code.render().starts_with("linear_extrude(height=10.000000, twist=0.000000"));
    }

    #[test]
    fn test_twisted_extrusion_uses_facets() {
        let ctx = Context::new().with_facets(FacetPolicy::Fixed { count: 8 });
        let square = Geometry2D::from(Rectangle::new(Vec2::new(2.0, 2.0), true).unwrap());
        let solid = square.extruded_twisting(5.0, 90.0, Vec2::new(1.0, 1.0)).unwrap();
        let out = solid.evaluate(&ctx).unwrap();
        // quarter turn of an 8-facet circle: 2 slices, 3 layers of 4 corners
        assert_eq!(out.boundary.len(), 12);
        assert!(out.code.render().contains("slices=2"));
    }

    #[test]
    fn test_revolution_sweeps_profile() {
        let ctx = Context::new().with_facets(FacetPolicy::Fixed { count: 4 });
        let profile = Geometry2D::from(Circle::new(1.0).unwrap()).translated(Vec2::new(5.0, 0.0));
        let out = profile.revolved(360.0).unwrap().evaluate(&ctx).unwrap();
        let bbox = out.bounding_box().unwrap();
        assert_relative_eq!(bbox.max.x, 6.0, epsilon = 1e-9);
        assert_relative_eq!(bbox.min.y, -6.0, epsilon = 1e-9);
        assert_relative_eq!(bbox.max.z, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_projection_flattens_context_transform() {
        let cube = Geometry3D::from(Cube::new(Vec3::new(2.0, 3.0, 4.0), false).unwrap());
        let probe = Geometry3D::deferred(move |ctx| {
            assert_eq!(ctx.transform().apply(Vec3::new(0.0, 0.0, 1.0)).z, 0.0);
            Ok(cube.clone())
        });
        let out = probe.projected().evaluate(&Context::new()).unwrap();
        let bbox = out.bounding_box().unwrap();
        assert_eq!(bbox.max, Vec2::new(2.0, 3.0));
        assert_eq!(
            out.code.render(),
            "projection() cube(size=[2.000000, 3.000000, 4.000000], center=false);"
        );
    }
}
