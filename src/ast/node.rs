// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Geometry tree node definitions

use crate::context::{Color, Context, ContextKey, ContextValue};
use crate::error::Result;
use crate::geometry::{BooleanOp, Boundary, BoundaryMerge, Dimension, Shape, Transform3D, D2, D3};
use crate::output::{Anchor, ElementValue, Output};
use std::fmt;
use std::sync::Arc;

/// A dimension geometry trees can be built in
///
/// `Change` holds the node kinds that produce geometry of this dimension
/// from geometry of the other one.
pub trait TreeDimension: Dimension {
    type Change: fmt::Debug + Clone + Send + Sync + 'static;

    fn evaluate_change(change: &Self::Change, ctx: &Context) -> Result<Output<Self>>;
}

/// 2D geometry tree
pub type Geometry2D = Node<D2>;

/// 3D geometry tree
pub type Geometry3D = Node<D3>;

/// Node of a declarative geometry tree
#[derive(Debug, Clone)]
pub enum Node<D: TreeDimension> {
    Empty,

    Shape(Arc<dyn Shape<D>>),

    // Boolean operations
    Combine {
        op: BooleanOp,
        merge: BoundaryMerge<D>,
        children: Vec<Node<D>>,
    },

    // Unary wrappers
    Transform {
        transform: D::Transform,
        child: Arc<Node<D>>,
    },
    Environment {
        environment: Environment,
        child: Arc<Node<D>>,
    },
    Color {
        color: Color,
        child: Arc<Node<D>>,
    },
    Modifier {
        modifier: Modifier,
        child: Arc<Node<D>>,
    },
    Bounds {
        boundary: Boundary<D>,
        child: Arc<Node<D>>,
    },

    // Metadata
    Anchor {
        anchor: Anchor,
        transform: Transform3D,
        child: Arc<Node<D>>,
    },
    Anchored {
        anchor: Anchor,
        child: Arc<Node<D>>,
    },
    Element {
        value: ElementValue,
        child: Arc<Node<D>>,
    },

    Deferred(Deferred<D>),

    // Dimensionality changes
    Change(Arc<D::Change>),
}

impl<D: TreeDimension> Default for Node<D> {
    fn default() -> Self {
        Node::Empty
    }
}

/// OpenSCAD debug modifier prefixed to a subtree's code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Modifier {
    /// `#`: rendered and highlighted
    Highlighted,
    /// `%`: drawn transparent, excluded from the result
    Background,
    /// `*`: ignored entirely
    Disabled,
    /// `!`: rendered as the only geometry
    Only,
}

impl Modifier {
    pub fn symbol(&self) -> char {
        match self {
            Modifier::Highlighted => '#',
            Modifier::Background => '%',
            Modifier::Disabled => '*',
            Modifier::Only => '!',
        }
    }

    /// Whether the modified subtree still contributes to its parent's extent
    pub fn keeps_bounds(&self) -> bool {
        matches!(self, Modifier::Highlighted | Modifier::Only)
    }
}

/// Context entries set for a subtree
#[derive(Clone, Default)]
pub struct Environment {
    entries: Vec<(ContextKey, ContextValue)>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<T: std::any::Any + Send + Sync>(mut self, key: ContextKey, value: T) -> Self {
        self.entries.push((key, Arc::new(value)));
        self
    }

    pub fn apply(&self, ctx: &Context) -> Context {
        ctx.set_many(self.entries.iter().cloned())
    }
}

impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|(key, _)| key))
            .finish()
    }
}

type Builder<D> = dyn Fn(&Context) -> Result<Node<D>> + Send + Sync;

/// A subtree built from the evaluation context at evaluation time
#[derive(Clone)]
pub struct Deferred<D: TreeDimension>(Arc<Builder<D>>);

impl<D: TreeDimension> Deferred<D> {
    pub fn new(build: impl Fn(&Context) -> Result<Node<D>> + Send + Sync + 'static) -> Self {
        Self(Arc::new(build))
    }

    pub fn build(&self, ctx: &Context) -> Result<Node<D>> {
        (self.0)(ctx)
    }
}

impl<D: TreeDimension> fmt::Debug for Deferred<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Deferred(..)")
    }
}
