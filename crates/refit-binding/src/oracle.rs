//! The binding oracle seam and an in-memory implementation.

use std::fmt;
use std::sync::Arc;

use refit_ast::{NodeId, NodeRef};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::methods::MethodBinding;
use crate::types::TypeBinding;

/// Which question was asked of the oracle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BindingQuery {
    Type,
    Constructor,
}

impl fmt::Display for BindingQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindingQuery::Type => f.write_str("type binding"),
            BindingQuery::Constructor => f.write_str("constructor binding"),
        }
    }
}

/// Type facts about the nodes of one tree, supplied by a type checker.
///
/// Every query may answer `None` when resolution failed (malformed or
/// partial input). Callers must treat `None` as "unknown", never as an
/// error.
pub trait BindingOracle {
    /// Type of an expression or type node.
    fn resolve_type_binding(&self, node: NodeRef<'_>) -> Option<Arc<TypeBinding>>;

    /// Constructor invoked by a class instance creation.
    fn resolve_constructor_binding(&self, node: NodeRef<'_>) -> Option<Arc<MethodBinding>>;

    /// Force any lazy resolution for `node` ahead of the queries above.
    ///
    /// Oracles that resolve eagerly keep the default no-op.
    fn ensure_resolved(&self, node: NodeRef<'_>) {
        let _ = node;
    }
}

impl<O: BindingOracle + ?Sized> BindingOracle for &O {
    fn resolve_type_binding(&self, node: NodeRef<'_>) -> Option<Arc<TypeBinding>> {
        (**self).resolve_type_binding(node)
    }

    fn resolve_constructor_binding(&self, node: NodeRef<'_>) -> Option<Arc<MethodBinding>> {
        (**self).resolve_constructor_binding(node)
    }

    fn ensure_resolved(&self, node: NodeRef<'_>) {
        (**self).ensure_resolved(node)
    }
}

impl<O: BindingOracle + ?Sized> BindingOracle for Arc<O> {
    fn resolve_type_binding(&self, node: NodeRef<'_>) -> Option<Arc<TypeBinding>> {
        (**self).resolve_type_binding(node)
    }

    fn resolve_constructor_binding(&self, node: NodeRef<'_>) -> Option<Arc<MethodBinding>> {
        (**self).resolve_constructor_binding(node)
    }

    fn ensure_resolved(&self, node: NodeRef<'_>) {
        (**self).ensure_resolved(node)
    }
}

/// Oracle backed by precomputed per-node bindings.
///
/// Useful when a type checker has already run and exported its results, and
/// for tests.
#[derive(Debug, Default, Clone)]
pub struct BindingTable {
    types: FxHashMap<NodeId, Arc<TypeBinding>>,
    constructors: FxHashMap<NodeId, Arc<MethodBinding>>,
}

impl BindingTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind_type(&mut self, node: NodeId, binding: Arc<TypeBinding>) -> &mut Self {
        self.types.insert(node, binding);
        self
    }

    pub fn bind_constructor(&mut self, node: NodeId, binding: Arc<MethodBinding>) -> &mut Self {
        self.constructors.insert(node, binding);
        self
    }

    pub fn len(&self) -> usize {
        self.types.len() + self.constructors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty() && self.constructors.is_empty()
    }
}

impl BindingOracle for BindingTable {
    fn resolve_type_binding(&self, node: NodeRef<'_>) -> Option<Arc<TypeBinding>> {
        self.types.get(&node.id()).cloned()
    }

    fn resolve_constructor_binding(&self, node: NodeRef<'_>) -> Option<Arc<MethodBinding>> {
        self.constructors.get(&node.id()).cloned()
    }
}
