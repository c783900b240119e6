// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Bezier curves and paths with adaptive polyline subdivision

use super::Coordinate;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Absolute distance below which subdivision always stops
const MIN_DISTANCE: f64 = 1e-9;

/// Hard recursion limit for adaptive subdivision
const MAX_DEPTH: u32 = 24;

/// How finely a curve is turned into a polyline
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Segmentation {
    /// Uniformly spaced parameters, `count` segments per curve
    Fixed(usize),
    /// Midpoint refinement until the chord deviation drops below `tolerance`
    Adaptive { tolerance: f64 },
}

/// A Bezier curve of arbitrary degree
#[derive(Debug, Clone, PartialEq)]
pub struct BezierCurve<V: Coordinate> {
    control_points: Vec<V>,
}

impl<V: Coordinate> BezierCurve<V> {
    pub fn new(control_points: Vec<V>) -> Result<Self> {
        if control_points.len() < 2 {
            return Err(Error::invalid(
                "bezier curve",
                format!("needs at least 2 control points, got {}", control_points.len()),
            ));
        }
        Ok(Self { control_points })
    }

    pub fn line(start: V, end: V) -> Self {
        Self {
            control_points: vec![start, end],
        }
    }

    pub fn control_points(&self) -> &[V] {
        &self.control_points
    }

    pub fn start(&self) -> V {
        self.control_points[0]
    }

    pub fn end(&self) -> V {
        self.control_points[self.control_points.len() - 1]
    }

    pub fn is_straight(&self) -> bool {
        self.control_points.len() == 2
    }

    /// Evaluate the curve at parameter `t` (de Casteljau)
    pub fn point_at(&self, t: f64) -> V {
        let mut points = self.control_points.clone();
        for level in (1..points.len()).rev() {
            for i in 0..level {
                points[i] = points[i].lerp(&points[i + 1], t);
            }
        }
        points[0]
    }

    /// Length of the control polygon, an upper bound of the arc length
    pub fn control_length(&self) -> f64 {
        self.control_points
            .windows(2)
            .map(|pair| pair[0].distance(&pair[1]))
            .sum()
    }

    pub fn map(&self, f: impl FnMut(&V) -> V) -> Self {
        Self {
            control_points: self.control_points.iter().map(f).collect(),
        }
    }

    pub fn points(&self, segmentation: Segmentation) -> Vec<V> {
        match segmentation {
            Segmentation::Fixed(count) => self.points_fixed(count),
            Segmentation::Adaptive { tolerance } => self.points_adaptive(tolerance),
        }
    }

    /// `count` uniform segments; straight curves yield their two endpoints
    pub fn points_fixed(&self, count: usize) -> Vec<V> {
        if self.is_straight() {
            return vec![self.start(), self.end()];
        }
        let count = count.max(1);
        (0..=count)
            .map(|i| self.point_at(i as f64 / count as f64))
            .collect()
    }

    /// Recursive midpoint refinement; straight curves yield their two endpoints
    pub fn points_adaptive(&self, tolerance: f64) -> Vec<V> {
        let start = self.start();
        let end = self.end();
        if self.is_straight() {
            return vec![start, end];
        }

        let mut points = vec![start];
        self.subdivide(0.0, start, 1.0, end, tolerance.max(MIN_DISTANCE), 0, &mut points);
        points.push(end);
        log::trace!(
            "subdivided degree {} curve into {} points",
            self.control_points.len() - 1,
            points.len()
        );
        points
    }

    /// Appends interior points of `(t0, t1)`; the endpoints are the caller's
    #[allow(clippy::too_many_arguments)]
    fn subdivide(&self, t0: f64, p0: V, t1: f64, p1: V, tolerance: f64, depth: u32, out: &mut Vec<V>) {
        let tm = (t0 + t1) / 2.0;
        let pm = self.point_at(tm);
        let deviation = pm.distance(&p0.lerp(&p1, 0.5));

        // Always split at the top level
        if depth >= MAX_DEPTH || (depth > 0 && deviation < tolerance) {
            return;
        }
        if depth > 0 && p0.distance(&p1) < MIN_DISTANCE && deviation < MIN_DISTANCE {
            return;
        }

        self.subdivide(t0, p0, tm, pm, tolerance, depth + 1, out);
        out.push(pm);
        self.subdivide(tm, pm, t1, p1, tolerance, depth + 1, out);
    }
}

/// A start point followed by curves, each continuing from the previous end
#[derive(Debug, Clone, PartialEq)]
pub struct BezierPath<V: Coordinate> {
    start: V,
    curves: Vec<BezierCurve<V>>,
}

impl<V: Coordinate> BezierPath<V> {
    pub fn new(start: V) -> Self {
        Self {
            start,
            curves: Vec::new(),
        }
    }

    pub fn start_point(&self) -> V {
        self.start
    }

    pub fn end_point(&self) -> V {
        self.curves.last().map(|c| c.end()).unwrap_or(self.start)
    }

    pub fn curves(&self) -> &[BezierCurve<V>] {
        &self.curves
    }

    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }

    pub fn line_to(mut self, point: V) -> Self {
        let from = self.end_point();
        self.curves.push(BezierCurve::line(from, point));
        self
    }

    pub fn quadratic_to(mut self, control: V, point: V) -> Self {
        let from = self.end_point();
        self.curves.push(BezierCurve {
            control_points: vec![from, control, point],
        });
        self
    }

    pub fn cubic_to(mut self, control1: V, control2: V, point: V) -> Self {
        let from = self.end_point();
        self.curves.push(BezierCurve {
            control_points: vec![from, control1, control2, point],
        });
        self
    }

    /// Append a curve of any degree given its control points after the current end
    pub fn curve_to(mut self, controls: Vec<V>) -> Result<Self> {
        let mut control_points = Vec::with_capacity(controls.len() + 1);
        control_points.push(self.end_point());
        control_points.extend(controls);
        self.curves.push(BezierCurve::new(control_points)?);
        Ok(self)
    }

    pub fn map(&self, mut f: impl FnMut(&V) -> V) -> Self {
        Self {
            start: f(&self.start),
            curves: self.curves.iter().map(|c| c.map(&mut f)).collect(),
        }
    }

    /// Polyline through the whole path, joints emitted once
    pub fn points(&self, segmentation: Segmentation) -> Vec<V> {
        let mut points = vec![self.start];
        for curve in &self.curves {
            points.extend(curve.points(segmentation).into_iter().skip(1));
        }
        points
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Vec2, Vec3};
    use approx::assert_relative_eq;

    #[test]
    fn test_straight_curve_short_circuits() {
        let line = BezierCurve::line(Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0));
        let expected = vec![Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0)];
        assert_eq!(line.points_fixed(50), expected);
        assert_eq!(line.points_adaptive(1e-12), expected);
        assert_eq!(line.points(Segmentation::Fixed(0)), expected);
    }

    #[test]
    fn test_fixed_count_is_uniform() {
        let curve = BezierCurve::new(vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(5.0, 10.0),
            Vec2::new(10.0, 0.0),
        ])
        .unwrap();
        let points = curve.points_fixed(4);
        assert_eq!(points.len(), 5);
        assert_relative_eq!(points[2], Vec2::new(5.0, 5.0));
        assert_eq!(points[4], Vec2::new(10.0, 0.0));
    }

    #[test]
    fn test_adaptive_respects_tolerance() {
        let curve = BezierCurve::new(vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(0.0, 10.0),
            Vec2::new(10.0, 10.0),
            Vec2::new(10.0, 0.0),
        ])
        .unwrap();
        let coarse = curve.points_adaptive(1.0);
        let fine = curve.points_adaptive(0.01);
        assert!(fine.len() > coarse.len());
        assert_eq!(fine.first(), Some(&Vec2::new(0.0, 0.0)));
        assert_eq!(fine.last(), Some(&Vec2::new(10.0, 0.0)));
    }

    #[test]
    fn test_symmetric_s_curve_is_refined() {
        let curve = BezierCurve::new(vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(5.0, 10.0),
            Vec2::new(5.0, -10.0),
            Vec2::new(10.0, 0.0),
        ])
        .unwrap();
        assert!(curve.points_adaptive(0.1).len() > 3);
    }

    #[test]
    fn test_degenerate_curve_terminates() {
        let p = Vec3::new(1.0, 1.0, 1.0);
        let curve = BezierCurve::new(vec![p, p, p, p]).unwrap();
        let points = curve.points_adaptive(0.0);
        assert_eq!(points.first(), Some(&p));
        assert!(points.len() <= 3);
    }

    #[test]
    fn test_rejects_single_control_point() {
        assert!(BezierCurve::new(vec![Vec2::new(1.0, 1.0)]).is_err());
    }

    #[test]
    fn test_path_end_point() {
        let empty = BezierPath::new(Vec2::new(1.0, 2.0));
        assert_eq!(empty.end_point(), Vec2::new(1.0, 2.0));

        let path = empty
            .line_to(Vec2::new(10.0, 0.0))
            .quadratic_to(Vec2::new(10.0, 10.0), Vec2::new(0.0, 10.0));
        assert_eq!(path.end_point(), Vec2::new(0.0, 10.0));

        let points = path.points(Segmentation::Fixed(4));
        assert_eq!(points.len(), 1 + 1 + 4);
        assert_eq!(points.last(), Some(&Vec2::new(0.0, 10.0)));
    }
}
