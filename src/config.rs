// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Evaluation configuration system

use crate::context::{
    Color, Context, FacetPolicy, DEFAULT_MIN_ANGLE, DEFAULT_MIN_SIZE, DEFAULT_TOLERANCE,
};
use anyhow::{Context as _, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File read by [`EvaluationConfig::load`] when present in the working directory
pub const CONFIG_FILE: &str = "polyframe.toml";

/// Root settings for evaluating geometry trees
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationConfig {
    /// Maximum deviation of adaptive curve subdivision
    pub tolerance: f64,
    /// Evaluate boolean operands on the rayon thread pool
    pub parallel: bool,
    /// Facet policy for round shapes and curves
    pub facets: FacetPolicy,
    /// Colour applied to the whole tree
    pub color: Option<Color>,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            parallel: false,
            facets: FacetPolicy::default(),
            color: None,
        }
    }
}

impl EvaluationConfig {
    /// Load configuration from file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;
        let config: EvaluationConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path.as_ref()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with environment variable overrides
    pub fn load() -> Result<Self> {
        let mut config = if PathBuf::from(CONFIG_FILE).exists() {
            Self::from_file(CONFIG_FILE)?
        } else {
            Self::default()
        };
        config.apply_overrides(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    /// Apply `POLYFRAME_*` overrides looked up through `var`
    ///
    /// `POLYFRAME_FN` selects a fixed facet count; `POLYFRAME_FA` and
    /// `POLYFRAME_FS` adjust the dynamic policy.
    pub fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) -> Result<()> {
        let parse = |name: &str| -> Result<Option<f64>> {
            var(name)
                .map(|value| {
                    value
                        .trim()
                        .parse::<f64>()
                        .with_context(|| format!("Invalid value for {name}: {value:?}"))
                })
                .transpose()
        };

        let (min_angle, min_size) = match self.facets {
            FacetPolicy::Dynamic { min_angle, min_size } => (min_angle, min_size),
            FacetPolicy::Fixed { .. } => (DEFAULT_MIN_ANGLE, DEFAULT_MIN_SIZE),
        };
        let fa = parse("POLYFRAME_FA")?;
        let fs = parse("POLYFRAME_FS")?;
        if fa.is_some() || fs.is_some() {
            self.facets = FacetPolicy::Dynamic {
                min_angle: fa.unwrap_or(min_angle),
                min_size: fs.unwrap_or(min_size),
            };
        }

        if let Some(count) = var("POLYFRAME_FN") {
            let count: usize = count
                .trim()
                .parse()
                .with_context(|| format!("Invalid value for POLYFRAME_FN: {count:?}"))?;
            if count > 0 {
                self.facets = FacetPolicy::Fixed { count };
            }
        }

        if let Some(tolerance) = parse("POLYFRAME_TOLERANCE")? {
            self.tolerance = tolerance;
        }

        if let Some(parallel) = var("POLYFRAME_PARALLEL") {
            self.parallel = matches!(parallel.trim(), "1" | "true" | "yes" | "on");
        }

        self.validate()
    }

    /// Save configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path.as_ref(), content)
            .with_context(|| format!("Failed to write config file: {:?}", path.as_ref()))?;
        Ok(())
    }

    /// Root context every evaluation starts from
    pub fn root_context(&self) -> Context {
        let ctx = Context::new()
            .with_facets(self.facets)
            .with_tolerance(self.tolerance)
            .with_parallel(self.parallel);
        match self.color {
            Some(color) => ctx.with_color(color),
            None => ctx,
        }
    }

    fn validate(&self) -> Result<()> {
        if !self.tolerance.is_finite() || self.tolerance <= 0.0 {
            return Err(crate::Error::Config(format!(
                "tolerance must be positive, got {}",
                self.tolerance
            ))
            .into());
        }
        if let FacetPolicy::Dynamic { min_angle, min_size } = self.facets {
            if !(min_angle > 0.0 && min_size > 0.0) {
                return Err(crate::Error::Config(format!(
                    "facet angle and size must be positive, got {min_angle} and {min_size}"
                ))
                .into());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(entries: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = EvaluationConfig::default();
        assert_eq!(config.tolerance, DEFAULT_TOLERANCE);
        assert!(!config.parallel);
        assert_eq!(config.root_context().facets(), FacetPolicy::default());
    }

    #[test]
    fn test_fixed_facet_override() {
        let mut config = EvaluationConfig::default();
        config
            .apply_overrides(vars(&[("POLYFRAME_FN", "32"), ("POLYFRAME_PARALLEL", "true")]))
            .unwrap();
        assert_eq!(config.facets, FacetPolicy::Fixed { count: 32 });
        assert!(config.parallel);
        assert!(config.root_context().parallel());
    }

    #[test]
    fn test_dynamic_overrides() {
        let mut config = EvaluationConfig::default();
        config
            .apply_overrides(vars(&[("POLYFRAME_FA", "6"), ("POLYFRAME_TOLERANCE", "0.001")]))
            .unwrap();
        assert_eq!(
            config.facets,
            FacetPolicy::Dynamic {
                min_angle: 6.0,
                min_size: 2.0
            }
        );
        assert_eq!(config.tolerance, 0.001);
    }

    #[test]
    fn test_invalid_overrides() {
        let mut config = EvaluationConfig::default();
        assert!(config.apply_overrides(vars(&[("POLYFRAME_FN", "many")])).is_err());
        assert!(config.apply_overrides(vars(&[("POLYFRAME_TOLERANCE", "-1")])).is_err());
    }

    #[test]
    fn test_partial_toml() {
        let config: EvaluationConfig = toml::from_str("parallel = true\n").unwrap();
        assert!(config.parallel);
        assert_eq!(config.tolerance, DEFAULT_TOLERANCE);
    }

    #[test]
    fn test_color_in_root_context() {
        let config = EvaluationConfig {
            color: Some(Color::rgb(0.0, 0.5, 1.0)),
            ..Default::default()
        };
        assert_eq!(config.root_context().color(), Some(Color::rgb(0.0, 0.5, 1.0)));
    }
}
