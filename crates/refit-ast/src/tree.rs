//! Arena-backed, immutable syntax tree.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::kind::{NodeKind, Slot};
use crate::span::SourceSpan;

/// Index of a node inside its [`Tree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(u32);

impl NodeId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index as u32)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Contents of one slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotValue {
    Child(NodeId),
    List(Vec<NodeId>),
}

impl SlotValue {
    /// Child ids held by the slot, in order.
    pub fn ids(&self) -> &[NodeId] {
        match self {
            SlotValue::Child(id) => std::slice::from_ref(id),
            SlotValue::List(ids) => ids,
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct NodeData {
    pub(crate) kind: NodeKind,
    pub(crate) span: SourceSpan,
    pub(crate) parent: Option<(NodeId, Slot)>,
    pub(crate) slots: IndexMap<Slot, SlotValue>,
}

/// A fully linked syntax tree over one source text.
///
/// Trees are produced once by [`crate::TreeBuilder`] and never change
/// afterwards, so any number of readers may hold [`NodeRef`]s into them.
#[derive(Debug, Clone)]
pub struct Tree {
    source: Arc<str>,
    nodes: Vec<NodeData>,
    root: NodeId,
}

impl Tree {
    pub(crate) fn from_parts(source: Arc<str>, nodes: Vec<NodeData>, root: NodeId) -> Self {
        Self {
            source,
            nodes,
            root,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn root(&self) -> NodeRef<'_> {
        NodeRef {
            tree: self,
            id: self.root,
        }
    }

    /// Look up a node by id.
    pub fn get(&self, id: NodeId) -> Option<NodeRef<'_>> {
        (id.index() < self.nodes.len()).then_some(NodeRef { tree: self, id })
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Every node of the given kind, in arena order.
    pub fn nodes_of_kind(&self, kind: NodeKind) -> impl Iterator<Item = NodeRef<'_>> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter(move |(_, data)| data.kind == kind)
            .map(move |(index, _)| NodeRef {
                tree: self,
                id: NodeId::new(index),
            })
    }

    fn data(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.index()]
    }
}

/// Borrowed handle to one node of a [`Tree`].
#[derive(Clone, Copy)]
pub struct NodeRef<'t> {
    tree: &'t Tree,
    id: NodeId,
}

impl<'t> NodeRef<'t> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn tree(&self) -> &'t Tree {
        self.tree
    }

    pub fn kind(&self) -> NodeKind {
        self.tree.data(self.id).kind
    }

    pub fn span(&self) -> SourceSpan {
        self.tree.data(self.id).span
    }

    /// Source text covered by this node.
    pub fn text(&self) -> &'t str {
        self.span().source_text(self.tree.source()).unwrap_or_default()
    }

    pub fn parent(&self) -> Option<NodeRef<'t>> {
        self.tree
            .data(self.id)
            .parent
            .map(|(id, _)| NodeRef { tree: self.tree, id })
    }

    /// Slot through which the parent holds this node.
    pub fn slot_in_parent(&self) -> Option<Slot> {
        self.tree.data(self.id).parent.map(|(_, slot)| slot)
    }

    pub fn is(&self, kind: NodeKind) -> bool {
        self.kind() == kind
    }

    pub fn slot(&self, slot: Slot) -> Option<&'t SlotValue> {
        self.tree.data(self.id).slots.get(&slot)
    }

    /// Child held by a single-valued slot.
    pub fn child(&self, slot: Slot) -> Option<NodeRef<'t>> {
        match self.slot(slot)? {
            SlotValue::Child(id) => Some(NodeRef {
                tree: self.tree,
                id: *id,
            }),
            SlotValue::List(_) => None,
        }
    }

    /// Children held by a list slot; empty when the slot is absent.
    pub fn list(&self, slot: Slot) -> impl ExactSizeIterator<Item = NodeRef<'t>> + 't {
        let tree = self.tree;
        let ids: &'t [NodeId] = match self.slot(slot) {
            Some(SlotValue::List(ids)) => ids,
            _ => &[],
        };
        ids.iter().map(move |id| NodeRef { tree, id: *id })
    }

    /// Occupied slots in declaration order.
    pub fn slots(&self) -> impl Iterator<Item = (Slot, &'t SlotValue)> + 't {
        self.tree
            .data(self.id)
            .slots
            .iter()
            .map(|(slot, value)| (*slot, value))
    }

    /// All direct children, slot by slot in declaration order.
    pub fn children(&self) -> impl Iterator<Item = NodeRef<'t>> + 't {
        let tree = self.tree;
        self.slots()
            .flat_map(|(_, value)| value.ids().iter())
            .map(move |id| NodeRef { tree, id: *id })
    }
}

impl PartialEq for NodeRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.id == other.id
    }
}

impl Eq for NodeRef<'_> {}

impl fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}@{}", self.kind(), self.id, self.span())
    }
}
