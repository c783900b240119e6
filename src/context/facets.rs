// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Facet policy: how many segments approximate a round shape

use crate::geometry::Segmentation;
use serde::{Deserialize, Serialize};

/// Radii below this produce the minimum facet count
const GRID_FINE: f64 = 1e-6;

/// Minimum facet angle (degrees) of the default dynamic policy
pub const DEFAULT_MIN_ANGLE: f64 = 12.0;

/// Minimum facet edge length of the default dynamic policy
pub const DEFAULT_MIN_SIZE: f64 = 2.0;

/// Tessellation strategy carried in the evaluation context
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum FacetPolicy {
    /// Always use the same number of facets for a full circle
    Fixed { count: usize },
    /// Facets limited by a minimum angle (degrees) and minimum edge length
    Dynamic { min_angle: f64, min_size: f64 },
}

impl Default for FacetPolicy {
    fn default() -> Self {
        FacetPolicy::Dynamic {
            min_angle: DEFAULT_MIN_ANGLE,
            min_size: DEFAULT_MIN_SIZE,
        }
    }
}

impl FacetPolicy {
    /// Facets for a full circle of the given radius
    pub fn facet_count(&self, radius: f64) -> usize {
        match *self {
            FacetPolicy::Fixed { count } => count.max(3),
            FacetPolicy::Dynamic { min_angle, min_size } => {
                if radius < GRID_FINE {
                    return 3;
                }
                let by_angle = 360.0 / min_angle.max(f64::EPSILON);
                let by_size = radius * std::f64::consts::TAU / min_size.max(f64::EPSILON);
                by_angle.min(by_size).ceil().max(5.0) as usize
            }
        }
    }

    /// Segments for an open arc or sweep of the given length
    pub fn facet_count_for_length(&self, length: f64) -> usize {
        match *self {
            FacetPolicy::Fixed { count } => count.max(1),
            FacetPolicy::Dynamic { min_size, .. } => {
                (length.abs() / min_size.max(f64::EPSILON)).ceil().max(1.0) as usize
            }
        }
    }

    /// Segments for an arc of `degrees` on a circle of `radius`
    pub fn facet_count_for_arc(&self, radius: f64, degrees: f64) -> usize {
        let fraction = (degrees.abs() / 360.0).min(1.0);
        ((self.facet_count(radius) as f64 * fraction).ceil() as usize).max(1)
    }

    /// Curve segmentation implied by this policy; `tolerance` feeds the adaptive mode
    pub fn segmentation(&self, tolerance: f64) -> Segmentation {
        match *self {
            FacetPolicy::Fixed { count } => Segmentation::Fixed(count.max(1)),
            FacetPolicy::Dynamic { .. } => Segmentation::Adaptive { tolerance },
        }
    }
}
