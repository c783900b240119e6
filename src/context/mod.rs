// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Configuration context
//!
//! An immutable key/value store threaded down the tree during evaluation.
//! Every `set` returns a new context; the original is never modified, so
//! siblings evaluated from the same parent always observe the same values.

mod color;
mod facets;
pub mod scope;

pub use color::Color;
pub use facets::{FacetPolicy, DEFAULT_MIN_ANGLE, DEFAULT_MIN_SIZE};

use crate::geometry::{AffineTransform, Operation, Segmentation, Transform3D};
use ahash::AHashMap;
use std::any::Any;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

/// Curve deviation tolerance used when none is configured
pub const DEFAULT_TOLERANCE: f64 = 0.01;

/// Name of a context entry
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContextKey(Cow<'static, str>);

impl ContextKey {
    pub const fn new(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    pub fn custom(name: impl Into<String>) -> Self {
        Self(Cow::Owned(name.into()))
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContextKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for ContextKey {
    fn from(name: &'static str) -> Self {
        Self::new(name)
    }
}

pub mod keys {
    //! Keys the engine itself reads

    use super::ContextKey;

    pub const FACETS: ContextKey = ContextKey::new("facets");
    pub const TRANSFORM: ContextKey = ContextKey::new("transform");
    pub const OPERATION: ContextKey = ContextKey::new("operation");
    pub const COLOR: ContextKey = ContextKey::new("color");
    pub const TOLERANCE: ContextKey = ContextKey::new("tolerance");
    pub const PARALLEL: ContextKey = ContextKey::new("parallel");
}

/// Type-erased context value
pub type ContextValue = Arc<dyn Any + Send + Sync>;

/// Immutable, copy-on-write evaluation context
#[derive(Clone, Default)]
pub struct Context {
    values: Arc<AHashMap<ContextKey, ContextValue>>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get<T: Any>(&self, key: &ContextKey) -> Option<&T> {
        self.values.get(key).and_then(|value| value.downcast_ref::<T>())
    }

    pub fn get_value(&self, key: &ContextKey) -> Option<ContextValue> {
        self.values.get(key).cloned()
    }

    pub fn contains(&self, key: &ContextKey) -> bool {
        self.values.contains_key(key)
    }

    /// New context with `key` set; entries are shared with `self`
    pub fn set<T: Any + Send + Sync>(&self, key: ContextKey, value: T) -> Context {
        self.set_many([(key, Arc::new(value) as ContextValue)])
    }

    pub fn set_many(&self, entries: impl IntoIterator<Item = (ContextKey, ContextValue)>) -> Context {
        let mut values = (*self.values).clone();
        values.extend(entries);
        Context {
            values: Arc::new(values),
        }
    }

    pub fn remove(&self, key: &ContextKey) -> Context {
        if !self.contains(key) {
            return self.clone();
        }
        let mut values = (*self.values).clone();
        values.remove(key);
        Context {
            values: Arc::new(values),
        }
    }

    pub fn keys(&self) -> Vec<&ContextKey> {
        let mut keys: Vec<_> = self.values.keys().collect();
        keys.sort();
        keys
    }

    pub fn facets(&self) -> FacetPolicy {
        self.get::<FacetPolicy>(&keys::FACETS)
            .copied()
            .unwrap_or_default()
    }

    pub fn with_facets(&self, facets: FacetPolicy) -> Context {
        self.set(keys::FACETS, facets)
    }

    /// Transform accumulated from the root down to the current node
    pub fn transform(&self) -> Transform3D {
        self.get::<Transform3D>(&keys::TRANSFORM)
            .copied()
            .unwrap_or_else(Transform3D::identity)
    }

    /// Apply `local` beneath the accumulated transform
    pub fn concatenating_transform(&self, local: &Transform3D) -> Context {
        self.set(keys::TRANSFORM, self.transform().concatenated(local))
    }

    pub fn operation(&self) -> Operation {
        self.get::<Operation>(&keys::OPERATION)
            .copied()
            .unwrap_or_default()
    }

    pub fn with_operation(&self, operation: Operation) -> Context {
        self.set(keys::OPERATION, operation)
    }

    pub fn color(&self) -> Option<Color> {
        self.get::<Color>(&keys::COLOR).copied()
    }

    pub fn with_color(&self, color: Color) -> Context {
        self.set(keys::COLOR, color)
    }

    pub fn tolerance(&self) -> f64 {
        self.get::<f64>(&keys::TOLERANCE)
            .copied()
            .unwrap_or(DEFAULT_TOLERANCE)
    }

    pub fn with_tolerance(&self, tolerance: f64) -> Context {
        self.set(keys::TOLERANCE, tolerance)
    }

    pub fn segmentation(&self) -> Segmentation {
        self.facets().segmentation(self.tolerance())
    }

    pub fn parallel(&self) -> bool {
        self.get::<bool>(&keys::PARALLEL).copied().unwrap_or(false)
    }

    pub fn with_parallel(&self, parallel: bool) -> Context {
        self.set(keys::PARALLEL, parallel)
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context").field("keys", &self.keys()).finish()
    }
}
