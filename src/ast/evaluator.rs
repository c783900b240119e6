// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Tree evaluator - turns a geometry tree into code, boundary and metadata

use super::{Node, TreeDimension};
use crate::config::EvaluationConfig;
use crate::context::Context;
use crate::error::{Error, Result};
use crate::geometry::{AffineTransform, BooleanOp, Boundary, BoundaryMerge, BoundingBox, Dimension};
use crate::output::{CodeFragment, Output};
use rayon::prelude::*;
use serde::Serialize;

impl<D: TreeDimension> Node<D> {
    /// Evaluate this node in `ctx`
    ///
    /// Evaluation is a pure function of the node and the context.
    pub fn evaluate(&self, ctx: &Context) -> Result<Output<D>> {
        match self {
            Node::Empty => Ok(Output::empty()),

            Node::Shape(shape) => Ok(Output::new(shape.code(ctx), shape.boundary(ctx))),

            Node::Combine {
                op,
                merge,
                children,
            } => evaluate_combination(children, *op, merge, ctx),

            Node::Transform { transform, child } => {
                let ctx = ctx.concatenating_transform(&D::to_3d(transform));
                Ok(child.evaluate(&ctx)?.transformed(transform))
            }

            Node::Environment { environment, child } => child.evaluate(&environment.apply(ctx)),

            Node::Color { color, child } => {
                let out = child.evaluate(&ctx.with_color(*color))?;
                let [r, g, b, a] = color.components();
                Ok(out.map_code(|code| {
                    code.wrapped(CodeFragment::call("color").param("c", [r, g, b, a]))
                }))
            }

            Node::Modifier { modifier, child } => {
                let out = child
                    .evaluate(ctx)?
                    .map_code(|code| code.with_modifier(modifier.symbol()));
                if modifier.keeps_bounds() {
                    Ok(out)
                } else {
                    Ok(out.with_boundary(Boundary::empty()))
                }
            }

            Node::Bounds { boundary, child } => Ok(child.evaluate(ctx)?.with_boundary(boundary.clone())),

            Node::Anchor {
                anchor,
                transform,
                child,
            } => Ok(child.evaluate(ctx)?.defining_anchor(anchor.clone(), *transform)),

            Node::Anchored { anchor, child } => {
                let Some(placement) = child.evaluate(ctx)?.anchor(anchor) else {
                    return Err(Error::UndefinedAnchor(anchor.to_string()));
                };
                log::debug!("resolved {anchor} in {} subtree", D::NAME);
                // Re-evaluate beneath the inverse placement
                let inverse = D::from_3d(&placement.inverse());
                let ctx = ctx.concatenating_transform(&D::to_3d(&inverse));
                Ok(child.evaluate(&ctx)?.transformed(&inverse))
            }

            Node::Element { value, child } => Ok(child.evaluate(ctx)?.with_element(value.clone())),

            Node::Deferred(deferred) => deferred.build(ctx)?.evaluate(ctx),

            Node::Change(change) => D::evaluate_change(change, ctx),
        }
    }
}

fn evaluate_combination<D: TreeDimension>(
    children: &[Node<D>],
    op: BooleanOp,
    merge: &BoundaryMerge<D>,
    ctx: &Context,
) -> Result<Output<D>> {
    if children.is_empty() {
        return Ok(Output::empty());
    }

    // Operands after the first of a difference are subtracted
    let subtracted = ctx.with_operation(ctx.operation().inverted());
    let evaluate = |(index, child): (usize, &Node<D>)| {
        if op == BooleanOp::Difference && index > 0 {
            child.evaluate(&subtracted)
        } else {
            child.evaluate(ctx)
        }
    };

    let outputs: Vec<Output<D>> = if ctx.parallel() && children.len() > 1 {
        log::debug!("evaluating {} {op} operands in parallel", children.len());
        children
            .par_iter()
            .enumerate()
            .map(evaluate)
            .collect::<Result<_>>()?
    } else {
        children
            .iter()
            .enumerate()
            .map(evaluate)
            .collect::<Result<_>>()?
    };

    Ok(Output::combining(outputs, op, merge))
}

/// Result of rendering a tree from the root context
#[derive(Debug, Clone, Serialize)]
#[serde(bound(serialize = "D::Vector: Serialize"))]
pub struct Rendered<D: Dimension> {
    pub code: String,
    pub bounding_box: Option<BoundingBox<D>>,
}

impl<D: Dimension> Rendered<D>
where
    D::Vector: Serialize,
{
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Evaluates trees from a root context built out of an [`EvaluationConfig`]
#[derive(Debug, Clone, Default)]
pub struct Evaluator {
    config: EvaluationConfig,
}

impl Evaluator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: EvaluationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EvaluationConfig {
        &self.config
    }

    pub fn evaluate<D: TreeDimension>(&self, node: &Node<D>) -> Result<Output<D>> {
        let ctx = self.config.root_context();
        log::debug!("evaluating {} tree with {:?}", D::NAME, self.config.facets);
        node.evaluate(&ctx)
    }

    pub fn render<D: TreeDimension>(&self, node: &Node<D>) -> Result<Rendered<D>> {
        let out = self.evaluate(node)?;
        Ok(Rendered {
            code: out.code.render(),
            bounding_box: out.bounding_box(),
        })
    }
}
