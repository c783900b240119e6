// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Result elements: typed metadata riding along evaluation
//!
//! Each element type decides how several instances combine when their
//! nodes are merged by a boolean operation.

use crate::geometry::BooleanOp;
use ahash::AHashMap;
use std::any::{Any, TypeId};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

/// Metadata attached to a node's output
pub trait ResultElement: Any + Clone + fmt::Debug + Send + Sync {
    /// Combine two or more instances under `operation`.
    ///
    /// Returning `None` means the type has no rule for this operation; the
    /// registry then retries with [`BooleanOp::Union`] and, failing that,
    /// keeps the first instance.
    fn combine(elements: &[Self], operation: BooleanOp) -> Option<Self>;
}

trait ErasedElement: Any + fmt::Debug + Send + Sync {
    fn as_any(&self) -> &dyn Any;

    fn type_name(&self) -> &'static str;

    fn combine_all(&self, all: &[Arc<dyn ErasedElement>], operation: BooleanOp) -> Arc<dyn ErasedElement>;
}

impl<T: ResultElement> ErasedElement for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }

    fn combine_all(&self, all: &[Arc<dyn ErasedElement>], operation: BooleanOp) -> Arc<dyn ErasedElement> {
        let values: Vec<T> = all
            .iter()
            .filter_map(|e| e.as_any().downcast_ref::<T>().cloned())
            .collect();

        if let Some(combined) = T::combine(&values, operation) {
            return Arc::new(combined);
        }
        log::warn!(
            "{} defines no combination for {operation}; combining as union",
            self.type_name()
        );
        if let Some(combined) = T::combine(&values, BooleanOp::Union) {
            return Arc::new(combined);
        }
        log::warn!("{} defines no union combination; keeping the first instance", self.type_name());
        Arc::new(values.into_iter().next().unwrap_or_else(|| self.clone()))
    }
}

/// A type-erased element value, ready to attach to a node
#[derive(Clone)]
pub struct ElementValue {
    type_id: TypeId,
    value: Arc<dyn ErasedElement>,
}

impl ElementValue {
    pub fn new<T: ResultElement>(value: T) -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            value: Arc::new(value),
        }
    }

    pub fn downcast_ref<T: ResultElement>(&self) -> Option<&T> {
        self.value.as_any().downcast_ref::<T>()
    }
}

impl fmt::Debug for ElementValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.value, f)
    }
}

/// Element values keyed by their type
#[derive(Clone, Default)]
pub struct ResultElements {
    elements: AHashMap<TypeId, Arc<dyn ErasedElement>>,
}

impl ResultElements {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get<T: ResultElement>(&self) -> Option<&T> {
        self.elements
            .get(&TypeId::of::<T>())
            .and_then(|e| e.as_any().downcast_ref::<T>())
    }

    pub fn contains<T: ResultElement>(&self) -> bool {
        self.elements.contains_key(&TypeId::of::<T>())
    }

    /// Set the value for `T`, replacing any existing one
    pub fn set<T: ResultElement>(&mut self, value: T) {
        self.insert(ElementValue::new(value));
    }

    pub fn insert(&mut self, value: ElementValue) {
        self.elements.insert(value.type_id, value.value);
    }

    pub fn remove<T: ResultElement>(&mut self) -> Option<T> {
        self.elements
            .remove(&TypeId::of::<T>())
            .and_then(|e| e.as_any().downcast_ref::<T>().cloned())
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Merge the elements of sibling outputs combined by `operation`.
    ///
    /// Types present in only one child pass through unchanged; the rest are
    /// combined by their own rule.
    pub fn combine<'a>(children: impl IntoIterator<Item = &'a ResultElements>, operation: BooleanOp) -> Self {
        let mut order: Vec<TypeId> = Vec::new();
        let mut grouped: AHashMap<TypeId, Vec<Arc<dyn ErasedElement>>> = AHashMap::new();
        for child in children {
            for (type_id, element) in &child.elements {
                grouped
                    .entry(*type_id)
                    .or_insert_with(|| {
                        order.push(*type_id);
                        Vec::new()
                    })
                    .push(element.clone());
            }
        }

        let mut combined = Self::new();
        for type_id in order {
            let Some(instances) = grouped.remove(&type_id) else {
                continue;
            };
            let element = match instances.as_slice() {
                [single] => single.clone(),
                [first, ..] => first.combine_all(&instances, operation),
                [] => continue,
            };
            combined.elements.insert(type_id, element);
        }
        combined
    }
}

impl fmt::Debug for ResultElements {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.elements.values()).finish()
    }
}

/// Names of tagged sub-geometry; merged by set union under every operation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartNames(pub BTreeSet<String>);

impl PartNames {
    pub fn single(name: impl Into<String>) -> Self {
        Self(BTreeSet::from([name.into()]))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }
}

impl ResultElement for PartNames {
    fn combine(elements: &[Self], _operation: BooleanOp) -> Option<Self> {
        Some(Self(elements.iter().flat_map(|e| e.0.iter().cloned()).collect()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Count(i64);

    impl ResultElement for Count {
        fn combine(elements: &[Self], operation: BooleanOp) -> Option<Self> {
            match operation {
                BooleanOp::Union | BooleanOp::Intersection => {
                    Some(Count(elements.iter().map(|c| c.0).sum()))
                }
                BooleanOp::Difference => {
                    let (first, rest) = elements.split_first()?;
                    Some(Count(first.0 - rest.iter().map(|c| c.0).sum::<i64>()))
                }
                BooleanOp::MinkowskiSum => None,
            }
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    struct Opaque(u8);

    impl ResultElement for Opaque {
        fn combine(_elements: &[Self], _operation: BooleanOp) -> Option<Self> {
            None
        }
    }

    fn with<T: ResultElement>(value: T) -> ResultElements {
        let mut elements = ResultElements::new();
        elements.set(value);
        elements
    }

    #[test]
    fn test_single_instance_passes_through() {
        let a = with(Count(7));
        let b = ResultElements::new();
        let merged = ResultElements::combine([&a, &b], BooleanOp::Difference);
        assert_eq!(merged.get::<Count>(), Some(&Count(7)));
    }

    #[test]
    fn test_operation_specific_rules() {
        let a = with(Count(10));
        let b = with(Count(3));
        let union = ResultElements::combine([&a, &b], BooleanOp::Union);
        let difference = ResultElements::combine([&a, &b], BooleanOp::Difference);
        assert_eq!(union.get::<Count>(), Some(&Count(13)));
        assert_eq!(difference.get::<Count>(), Some(&Count(7)));
    }

    #[test]
    fn test_missing_rule_falls_back_to_union() {
        let a = with(Count(1));
        let b = with(Count(2));
        let merged = ResultElements::combine([&a, &b], BooleanOp::MinkowskiSum);
        assert_eq!(merged.get::<Count>(), Some(&Count(3)));
    }

    #[test]
    fn test_no_rule_keeps_first() {
        let merged = ResultElements::combine([&with(Opaque(4)), &with(Opaque(9))], BooleanOp::Union);
        assert_eq!(merged.get::<Opaque>(), Some(&Opaque(4)));
    }

    #[test]
    fn test_types_are_independent() {
        let mut a = with(Count(1));
        a.set(PartNames::single("bracket"));
        let b = with(PartNames::single("bolt"));
        let merged = ResultElements::combine([&a, &b], BooleanOp::Difference);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged.get::<Count>(), Some(&Count(1)));
        let names = merged.get::<PartNames>().unwrap();
        assert!(names.contains("bracket") && names.contains("bolt"));
    }

    #[test]
    fn test_remove() {
        let mut elements = with(Count(5));
        assert_eq!(elements.remove::<Count>(), Some(Count(5)));
        assert!(elements.is_empty());
    }
}
