// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Scoped access to the "current" context for helpers that are not handed
//! one explicitly.
//!
//! The stack is owned by the caller and passed by reference. It is neither
//! `Send` nor `Sync`, so only the thread that pushed a context can read it,
//! and every push is popped by the guard it returns.

use super::Context;
use std::cell::RefCell;
use std::marker::PhantomData;
use std::rc::Rc;

/// Stack of contexts with strictly balanced push/pop
#[derive(Debug, Default)]
pub struct ContextStack {
    stack: RefCell<Vec<Context>>,
    // Keeps the stack confined to the creating thread
    _not_send: PhantomData<Rc<()>>,
}

/// Pops its context when dropped
#[derive(Debug)]
pub struct ScopeGuard<'a> {
    owner: &'a ContextStack,
    depth: usize,
}

impl ContextStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `context` current until the returned guard is dropped
    pub fn enter(&self, context: Context) -> ScopeGuard<'_> {
        let mut stack = self.stack.borrow_mut();
        stack.push(context);
        ScopeGuard {
            owner: self,
            depth: stack.len(),
        }
    }

    /// Innermost context, if any scope is active
    pub fn current(&self) -> Option<Context> {
        self.stack.borrow().last().cloned()
    }

    pub fn depth(&self) -> usize {
        self.stack.borrow().len()
    }

    /// Run `f` with `context` as the current context
    pub fn with<R>(&self, context: Context, f: impl FnOnce(&Self) -> R) -> R {
        let _guard = self.enter(context);
        f(self)
    }
}

impl Drop for ScopeGuard<'_> {
    fn drop(&mut self) {
        let mut stack = self.owner.stack.borrow_mut();
        debug_assert_eq!(stack.len(), self.depth, "context scopes must be released in LIFO order");
        stack.truncate(self.depth - 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ContextKey;

    #[test]
    fn test_nested_scopes_are_balanced() {
        let stack = ContextStack::new();
        assert!(stack.current().is_none());

        let outer = Context::new().set(ContextKey::new("level"), 1_u8);
        let inner = outer.set(ContextKey::new("level"), 2_u8);

        {
            let _outer = stack.enter(outer);
            assert_eq!(stack.depth(), 1);
            {
                let _inner = stack.enter(inner);
                let current = stack.current().unwrap();
                assert_eq!(current.get::<u8>(&ContextKey::new("level")), Some(&2));
            }
            let current = stack.current().unwrap();
            assert_eq!(current.get::<u8>(&ContextKey::new("level")), Some(&1));
        }
        assert_eq!(stack.depth(), 0);
    }

    #[test]
    fn test_with_pops_on_return() {
        let stack = ContextStack::new();
        let depth = stack.with(Context::new(), |s| s.depth());
        assert_eq!(depth, 1);
        assert_eq!(stack.depth(), 0);
    }
}
