//! Cycle-safe traversal over graph nodes.
//!
//! Both walks carry an identity set of record pointers scoped to a single
//! top-level invocation: a record already visited during the current walk is
//! not traversed again. Membership is by `Rc` pointer, never by value, so
//! distinct-but-equal objects are never mistaken for a cycle.

use std::collections::HashSet;
use std::rc::Rc;

use tracing::trace;
use valdiff_types::Value;

use crate::node::GraphNode;

/// Identity set over record values.
#[derive(Debug, Default)]
pub struct VisitGuard {
    seen: HashSet<usize>,
}

impl VisitGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Try to enter `value`. Returns `false` when the value is a record that
    /// was already visited during this walk. Non-record values cannot form
    /// cycles and always enter.
    pub fn enter(&mut self, value: &Value) -> bool {
        match value {
            Value::Record(rec) => self.seen.insert(Rc::as_ptr(rec) as usize),
            _ => true,
        }
    }
}

impl GraphNode {
    /// Pair this node's children with `other`'s children by label and drive
    /// `callback` over the pairs.
    ///
    /// `callback(self_child, other_child, depth)` runs for every matched
    /// pair; its boolean result controls whether the walk recurses into that
    /// pair. After all matched pairs, `other`'s children with no counterpart
    /// on this side are reported as `callback(None, other_child, depth - 1)`
    /// unless the criteria ignores extra members.
    pub fn map_fields<F>(&self, other: &GraphNode, depth: usize, callback: &mut F)
    where
        F: FnMut(Option<&GraphNode>, &GraphNode, usize) -> bool,
    {
        let mut guard = VisitGuard::new();
        self.map_fields_guarded(other, depth, callback, &mut guard);
    }

    fn map_fields_guarded<F>(
        &self,
        other: &GraphNode,
        depth: usize,
        callback: &mut F,
        guard: &mut VisitGuard,
    ) where
        F: FnMut(Option<&GraphNode>, &GraphNode, usize) -> bool,
    {
        if !guard.enter(&self.value) {
            trace!(path = %self.path, "cycle detected, stopping walk");
            return;
        }

        let mine = self.children();
        let theirs = other.children();
        let mut matched = vec![false; theirs.len()];

        for child in &mine {
            let found = theirs
                .iter()
                .enumerate()
                .find(|(j, t)| !matched[*j] && t.label == child.label);
            if let Some((j, their_child)) = found {
                matched[j] = true;
                if callback(Some(child), their_child, depth) {
                    child.map_fields_guarded(their_child, depth + 1, callback, guard);
                }
            }
        }

        if !self.criteria.ignore_extra_members {
            for (j, their_child) in theirs.iter().enumerate() {
                if !matched[j] {
                    callback(None, their_child, depth.saturating_sub(1));
                }
            }
        }
    }

    /// Walk this node's own subtree.
    ///
    /// `callback(child, depth)` runs for every child; returning `true`
    /// recurses into that child. Shares the walk-scoped cycle guard with
    /// [`map_fields`](Self::map_fields).
    pub fn scan_fields<F>(&self, depth: usize, callback: &mut F)
    where
        F: FnMut(&GraphNode, usize) -> bool,
    {
        let mut guard = VisitGuard::new();
        self.scan_fields_guarded(depth, callback, &mut guard);
    }

    fn scan_fields_guarded<F>(&self, depth: usize, callback: &mut F, guard: &mut VisitGuard)
    where
        F: FnMut(&GraphNode, usize) -> bool,
    {
        if !guard.enter(&self.value) {
            trace!(path = %self.path, "cycle detected, stopping scan");
            return;
        }
        for child in self.children() {
            if callback(&child, depth) {
                child.scan_fields_guarded(depth + 1, callback, guard);
            }
        }
    }
}
