//! Bottom-up construction of [`Tree`]s.
//!
//! The parser that feeds this builder lives outside refit. Children are
//! created before their parents, so a finished tree can never contain a
//! cycle; [`TreeBuilder::finish`] checks the remaining structural invariants.

use std::sync::Arc;

use indexmap::IndexMap;
use thiserror::Error;

use crate::kind::{Cardinality, NodeKind, Slot};
use crate::span::SourceSpan;
use crate::tree::{NodeData, NodeId, SlotValue, Tree};

/// Structural problem detected while building a tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("unknown node {0}")]
    UnknownNode(NodeId),

    #[error("node {child} is already attached to {parent}")]
    AlreadyAttached { child: NodeId, parent: NodeId },

    #[error("node {child} is listed more than once under one parent")]
    DuplicateChild { child: NodeId },

    #[error("{kind} does not declare slot {slot}")]
    SlotNotDeclared { kind: NodeKind, slot: Slot },

    #[error("slot {slot} expects {expected:?} content")]
    CardinalityMismatch { slot: Slot, expected: Cardinality },

    #[error("slot {slot} was filled twice")]
    DuplicateSlot { slot: Slot },

    #[error("span {span} exceeds source length {len}")]
    SpanOutOfBounds { span: SourceSpan, len: usize },

    #[error("child {child} at {child_span} lies outside its parent span {parent_span}")]
    ChildOutsideParent {
        child: NodeId,
        child_span: SourceSpan,
        parent_span: SourceSpan,
    },

    #[error("node {0} has no parent and is not the root")]
    Orphan(NodeId),

    #[error("root {0} is attached to a parent")]
    RootHasParent(NodeId),
}

/// Incrementally assembles the nodes of one tree.
#[derive(Debug)]
pub struct TreeBuilder {
    source: Arc<str>,
    nodes: Vec<NodeData>,
}

impl TreeBuilder {
    pub fn new(source: impl Into<Arc<str>>) -> Self {
        Self {
            source: source.into(),
            nodes: Vec::new(),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Create a node without children.
    pub fn leaf(&mut self, kind: NodeKind, span: SourceSpan) -> Result<NodeId, TreeError> {
        self.node(kind, span).build()
    }

    /// Start a node; attach children with [`NodeDraft::child`] and
    /// [`NodeDraft::list`], then call [`NodeDraft::build`].
    pub fn node(&mut self, kind: NodeKind, span: SourceSpan) -> NodeDraft<'_> {
        NodeDraft {
            builder: self,
            kind,
            span,
            slots: Vec::new(),
        }
    }

    /// Validate and seal the tree rooted at `root`.
    pub fn finish(self, root: NodeId) -> Result<Tree, TreeError> {
        let root_data = self
            .nodes
            .get(root.index())
            .ok_or(TreeError::UnknownNode(root))?;
        if root_data.parent.is_some() {
            return Err(TreeError::RootHasParent(root));
        }

        if let Some(index) = self
            .nodes
            .iter()
            .enumerate()
            .position(|(index, data)| index != root.index() && data.parent.is_none())
        {
            return Err(TreeError::Orphan(NodeId::new(index)));
        }

        Ok(Tree::from_parts(self.source, self.nodes, root))
    }

    fn insert(
        &mut self,
        kind: NodeKind,
        span: SourceSpan,
        mut slots: Vec<(Slot, SlotValue)>,
    ) -> Result<NodeId, TreeError> {
        if span.end as usize > self.source.len() || span.start > span.end {
            return Err(TreeError::SpanOutOfBounds {
                span,
                len: self.source.len(),
            });
        }

        for (index, (slot, value)) in slots.iter().enumerate() {
            if !kind.declares(*slot) {
                return Err(TreeError::SlotNotDeclared { kind, slot: *slot });
            }
            if slots[..index].iter().any(|(seen, _)| seen == slot) {
                return Err(TreeError::DuplicateSlot { slot: *slot });
            }
            let matches = matches!(
                (slot.cardinality(), value),
                (Cardinality::Single, SlotValue::Child(_)) | (Cardinality::List, SlotValue::List(_))
            );
            if !matches {
                return Err(TreeError::CardinalityMismatch {
                    slot: *slot,
                    expected: slot.cardinality(),
                });
            }
            for child in value.ids() {
                self.check_attachable(*child, span)?;
            }
        }

        // Reject a child listed twice within the same parent.
        let mut claimed: Vec<NodeId> = Vec::new();
        for child in slots.iter().flat_map(|(_, value)| value.ids()) {
            if claimed.contains(child) {
                return Err(TreeError::DuplicateChild { child: *child });
            }
            claimed.push(*child);
        }

        slots.sort_by_key(|(slot, _)| kind.slot_index(*slot));

        let id = NodeId::new(self.nodes.len());
        for (slot, value) in &slots {
            for child in value.ids() {
                self.nodes[child.index()].parent = Some((id, *slot));
            }
        }

        self.nodes.push(NodeData {
            kind,
            span,
            parent: None,
            slots: slots.into_iter().collect::<IndexMap<_, _>>(),
        });
        Ok(id)
    }

    fn check_attachable(&self, child: NodeId, parent_span: SourceSpan) -> Result<(), TreeError> {
        let data = self
            .nodes
            .get(child.index())
            .ok_or(TreeError::UnknownNode(child))?;
        if let Some((parent, _)) = data.parent {
            return Err(TreeError::AlreadyAttached { child, parent });
        }
        if !parent_span.encloses(&data.span) {
            return Err(TreeError::ChildOutsideParent {
                child,
                child_span: data.span,
                parent_span,
            });
        }
        Ok(())
    }
}

/// A node under construction.
#[must_use = "a draft does nothing until `build` is called"]
pub struct NodeDraft<'b> {
    builder: &'b mut TreeBuilder,
    kind: NodeKind,
    span: SourceSpan,
    slots: Vec<(Slot, SlotValue)>,
}

impl NodeDraft<'_> {
    pub fn child(mut self, slot: Slot, child: NodeId) -> Self {
        self.slots.push((slot, SlotValue::Child(child)));
        self
    }

    /// Attach `child` when present.
    pub fn maybe_child(self, slot: Slot, child: Option<NodeId>) -> Self {
        match child {
            Some(child) => self.child(slot, child),
            None => self,
        }
    }

    pub fn list(mut self, slot: Slot, children: impl IntoIterator<Item = NodeId>) -> Self {
        self.slots
            .push((slot, SlotValue::List(children.into_iter().collect())));
        self
    }

    pub fn build(self) -> Result<NodeId, TreeError> {
        self.builder.insert(self.kind, self.span, self.slots)
    }
}
