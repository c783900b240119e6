// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Anchors: opaque reference frames attached to a subtree

use crate::geometry::{AffineTransform, Transform3D};
use ahash::AHashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

static NEXT_ANCHOR_ID: AtomicU64 = AtomicU64::new(1);

/// Opaque handle; two anchors are equal only if one is a clone of the other
#[derive(Clone)]
pub struct Anchor {
    id: u64,
    label: Option<Arc<str>>,
}

impl Anchor {
    pub fn new() -> Self {
        Self {
            id: NEXT_ANCHOR_ID.fetch_add(1, Ordering::Relaxed),
            label: None,
        }
    }

    /// New anchor with a label used only for diagnostics
    pub fn named(label: impl Into<Arc<str>>) -> Self {
        Self {
            label: Some(label.into()),
            ..Self::new()
        }
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}

impl Default for Anchor {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for Anchor {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Anchor {}

impl Hash for Anchor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.label {
            Some(label) => write!(f, "Anchor(#{} {label:?})", self.id),
            None => write!(f, "Anchor(#{})", self.id),
        }
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.label {
            Some(label) => write!(f, "{label}"),
            None => write!(f, "#{}", self.id),
        }
    }
}

/// Anchors exposed by a node, relative to that node's local frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnchorTable {
    entries: AHashMap<Anchor, Transform3D>,
}

impl AnchorTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach `anchor` at `transform`, replacing any previous definition
    pub fn define(&mut self, anchor: Anchor, transform: Transform3D) {
        self.entries.insert(anchor, transform);
    }

    pub fn get(&self, anchor: &Anchor) -> Option<&Transform3D> {
        self.entries.get(anchor)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Anchor, &Transform3D)> {
        self.entries.iter()
    }

    /// Re-express every anchor in the frame of a parent applying `transform`
    pub fn transformed(&self, transform: &Transform3D) -> Self {
        if transform.is_identity() {
            return self.clone();
        }
        Self {
            entries: self
                .entries
                .iter()
                .map(|(anchor, local)| (anchor.clone(), transform.concatenated(local)))
                .collect(),
        }
    }

    /// Union of tables; a later table wins on collision
    pub fn merge<'a>(tables: impl IntoIterator<Item = &'a AnchorTable>) -> Self {
        let mut merged = Self::new();
        for table in tables {
            for (anchor, transform) in &table.entries {
                merged.entries.insert(anchor.clone(), *transform);
            }
        }
        merged
    }
}
