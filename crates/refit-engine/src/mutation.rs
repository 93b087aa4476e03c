//! Pending edits proposed by rules.
//!
//! Rules never touch the tree. They return [`Mutation`] values, the engine
//! collects them into a [`MutationSet`] during traversal, and only after the
//! traversal finishes is the set conflict-resolved and applied.

use refit_ast::{NodeId, Slot, SourceSpan, Tree};
use rustc_hash::FxHashSet;

use crate::diagnostics::Diagnostic;
use crate::rewrite::RewriteError;

/// Where an insertion goes relative to the covered range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Before,
    After,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Remove,
    Replace(String),
    Insert { text: String, anchor: Anchor },
}

/// One edit against one node.
///
/// With `slot` set, the mutation covers the contents of that slot rather
/// than the whole node. For a list slot that is the range from the first
/// element to the last, so removing `TYPE_ARGUMENTS` of `ArrayList<String>`
/// leaves `ArrayList<>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mutation {
    pub target: NodeId,
    pub slot: Option<Slot>,
    pub operation: Operation,
    /// Name of the rule that proposed it.
    pub rule: &'static str,
}

impl Mutation {
    pub fn remove(rule: &'static str, target: NodeId) -> Self {
        Self {
            target,
            slot: None,
            operation: Operation::Remove,
            rule,
        }
    }

    pub fn remove_slot(rule: &'static str, target: NodeId, slot: Slot) -> Self {
        Self {
            target,
            slot: Some(slot),
            operation: Operation::Remove,
            rule,
        }
    }

    pub fn replace(rule: &'static str, target: NodeId, text: impl Into<String>) -> Self {
        Self {
            target,
            slot: None,
            operation: Operation::Replace(text.into()),
            rule,
        }
    }

    pub fn insert(
        rule: &'static str,
        target: NodeId,
        anchor: Anchor,
        text: impl Into<String>,
    ) -> Self {
        Self {
            target,
            slot: None,
            operation: Operation::Insert {
                text: text.into(),
                anchor,
            },
            rule,
        }
    }

    /// Source range this mutation rewrites. Insertions are zero-width.
    pub fn range(&self, tree: &Tree) -> Result<SourceSpan, RewriteError> {
        let node = tree
            .get(self.target)
            .ok_or(RewriteError::UnknownTarget(self.target))?;

        let covered = match self.slot {
            None => node.span(),
            Some(slot) => {
                let empty = RewriteError::EmptySlot {
                    target: self.target,
                    slot,
                };
                let ids = node.slot(slot).ok_or_else(|| empty.clone())?.ids();
                let (Some(first), Some(last)) = (ids.first(), ids.last()) else {
                    return Err(empty);
                };
                let first = tree.get(*first).ok_or(RewriteError::UnknownTarget(*first))?;
                let last = tree.get(*last).ok_or(RewriteError::UnknownTarget(*last))?;
                first.span().merge(&last.span())
            }
        };

        Ok(match &self.operation {
            Operation::Remove | Operation::Replace(_) => covered,
            Operation::Insert {
                anchor: Anchor::Before,
                ..
            } => SourceSpan::empty(covered.start),
            Operation::Insert {
                anchor: Anchor::After,
                ..
            } => SourceSpan::empty(covered.end),
        })
    }

    /// Text that ends up in place of [`Mutation::range`].
    pub fn replacement(&self) -> &str {
        match &self.operation {
            Operation::Remove => "",
            Operation::Replace(text) | Operation::Insert { text, .. } => text,
        }
    }
}

/// Mutations collected over one run, in enqueue order.
#[derive(Debug, Default)]
pub struct MutationSet {
    mutations: Vec<Mutation>,
    targets: FxHashSet<NodeId>,
    diagnostics: Vec<Diagnostic>,
}

/// Outcome of [`MutationSet::resolve`].
#[derive(Debug, Default)]
pub struct Resolution {
    /// Pairwise non-overlapping mutations, in enqueue order.
    pub mutations: Vec<Mutation>,
    pub diagnostics: Vec<Diagnostic>,
}

impl MutationSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue `mutation`. A node already targeted keeps its first mutation;
    /// the newcomer is dropped, reported, and `false` is returned.
    pub fn push(&mut self, mutation: Mutation) -> bool {
        if !self.targets.insert(mutation.target) {
            tracing::warn!(
                rule = mutation.rule,
                target = %mutation.target,
                "Dropping second mutation for the same node"
            );
            self.diagnostics.push(Diagnostic::duplicate_target(&mutation));
            return false;
        }
        self.mutations.push(mutation);
        true
    }

    pub fn len(&self) -> usize {
        self.mutations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mutations.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Mutation> {
        self.mutations.iter()
    }

    /// Diagnostics raised while enqueuing.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Drop every mutation overlapping an earlier-enqueued one.
    ///
    /// Mutations whose range cannot be computed are dropped as faults of the
    /// rule that proposed them.
    pub fn resolve(self, tree: &Tree) -> Resolution {
        let mut diagnostics = self.diagnostics;
        let mut accepted: Vec<(Mutation, SourceSpan)> = Vec::with_capacity(self.mutations.len());

        for mutation in self.mutations {
            let span = match mutation.range(tree) {
                Ok(span) => span,
                Err(err) => {
                    tracing::warn!(
                        rule = mutation.rule,
                        error = %err,
                        "Dropping unusable mutation"
                    );
                    diagnostics.push(Diagnostic::invalid_mutation(&mutation, &err));
                    continue;
                }
            };

            let overlapping = accepted.iter().find(|(_, kept)| kept.overlaps(&span));
            if let Some((kept, kept_span)) = overlapping {
                tracing::warn!(
                    rule = mutation.rule,
                    kept_rule = kept.rule,
                    span = %span,
                    "Dropping overlapping mutation"
                );
                diagnostics.push(Diagnostic::conflict(kept, *kept_span, &mutation, span));
                continue;
            }

            accepted.push((mutation, span));
        }

        Resolution {
            mutations: accepted.into_iter().map(|(mutation, _)| mutation).collect(),
            diagnostics,
        }
    }
}
