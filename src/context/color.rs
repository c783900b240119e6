// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! RGBA colour carried through the context

use serde::{Deserialize, Serialize};

/// Colour with components in `0.0..=1.0`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    #[serde(default = "opaque")]
    pub alpha: f64,
}

fn opaque() -> f64 {
    1.0
}

impl Color {
    pub fn rgb(red: f64, green: f64, blue: f64) -> Self {
        Self::rgba(red, green, blue, 1.0)
    }

    pub fn rgba(red: f64, green: f64, blue: f64, alpha: f64) -> Self {
        let clamp = |v: f64| v.clamp(0.0, 1.0);
        Self {
            red: clamp(red),
            green: clamp(green),
            blue: clamp(blue),
            alpha: clamp(alpha),
        }
    }

    pub fn with_alpha(self, alpha: f64) -> Self {
        Self::rgba(self.red, self.green, self.blue, alpha)
    }

    pub fn components(&self) -> [f64; 4] {
        [self.red, self.green, self.blue, self.alpha]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_components_are_clamped() {
        let c = Color::rgba(1.5, -0.2, 0.5, 2.0);
        assert_eq!(c.components(), [1.0, 0.0, 0.5, 1.0]);
    }
}
