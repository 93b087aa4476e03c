//! Context analysis over parent links.
//!
//! Rules rarely care about a node's immediate parent when that parent is only
//! a wrapper. Every query here takes a set of *transparent* kinds that are
//! stepped over while looking for the node's meaningful context.

use crate::kind::{NodeKind, Slot};
use crate::tree::NodeRef;

/// Wrapper kinds that do not change an expression's meaning.
pub const PARENTHESES: &[NodeKind] = &[NodeKind::ParenthesizedExpression];

/// Where a node sits once transparent wrappers are stepped over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Enclosing<'t> {
    /// The outermost transparent wrapper around the node, or the node itself.
    pub anchor: NodeRef<'t>,
    /// First ancestor whose kind is not transparent.
    pub parent: NodeRef<'t>,
    /// Slot through which `parent` holds `anchor`.
    pub slot: Slot,
}

/// Ancestors from the immediate parent up to the root.
pub fn ancestors<'t>(node: NodeRef<'t>) -> impl Iterator<Item = NodeRef<'t>> {
    std::iter::successors(node.parent(), |current| current.parent())
}

/// Role by which the immediate parent holds `node`.
pub fn slot_of(node: NodeRef<'_>) -> Option<Slot> {
    node.slot_in_parent()
}

/// Nearest ancestor of `kind`. Transparent ancestors are never returned.
pub fn nearest_ancestor_of_kind<'t>(
    node: NodeRef<'t>,
    kind: NodeKind,
    transparent: &[NodeKind],
) -> Option<NodeRef<'t>> {
    nearest_ancestor_matching(node, |candidate| candidate.is(kind), transparent)
}

/// Nearest ancestor satisfying `predicate`, skipping transparent ancestors.
pub fn nearest_ancestor_matching<'t>(
    node: NodeRef<'t>,
    mut predicate: impl FnMut(NodeRef<'t>) -> bool,
    transparent: &[NodeKind],
) -> Option<NodeRef<'t>> {
    ancestors(node)
        .filter(|ancestor| !transparent.contains(&ancestor.kind()))
        .find(|ancestor| predicate(*ancestor))
}

/// Climb through transparent wrappers and report the meaningful parent.
///
/// Returns `None` when `node` (or its outermost wrapper) is the root: the
/// node then has no context to reason about.
pub fn enclosing<'t>(node: NodeRef<'t>, transparent: &[NodeKind]) -> Option<Enclosing<'t>> {
    let mut anchor = node;
    loop {
        let parent = anchor.parent()?;
        if transparent.contains(&parent.kind()) {
            anchor = parent;
            continue;
        }
        let slot = anchor.slot_in_parent()?;
        return Some(Enclosing {
            anchor,
            parent,
            slot,
        });
    }
}
