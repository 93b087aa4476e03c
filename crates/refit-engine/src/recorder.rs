use std::cell::RefCell;
use std::sync::Arc;

use refit_ast::{NodeId, NodeRef};
use refit_binding::{BindingOracle, BindingQuery, MethodBinding, TypeBinding};
use rustc_hash::{FxHashMap, FxHashSet};

/// Per-run memo in front of the caller's oracle.
///
/// Every (node, query) pair reaches the underlying oracle at most once, and
/// the first `None` for a pair is queued as an unknown binding for the engine
/// to report.
pub(crate) struct BindingRecorder<'o> {
    oracle: &'o dyn BindingOracle,
    types: RefCell<FxHashMap<NodeId, Option<Arc<TypeBinding>>>>,
    constructors: RefCell<FxHashMap<NodeId, Option<Arc<MethodBinding>>>>,
    forced: RefCell<FxHashSet<NodeId>>,
    unknown: RefCell<Vec<(NodeId, BindingQuery)>>,
}

impl<'o> BindingRecorder<'o> {
    pub(crate) fn new(oracle: &'o dyn BindingOracle) -> Self {
        Self {
            oracle,
            types: RefCell::default(),
            constructors: RefCell::default(),
            forced: RefCell::default(),
            unknown: RefCell::default(),
        }
    }

    /// Unknown bindings recorded since the last call.
    pub(crate) fn take_unknown(&self) -> Vec<(NodeId, BindingQuery)> {
        std::mem::take(&mut *self.unknown.borrow_mut())
    }

    fn memoized<T>(
        &self,
        cache: &RefCell<FxHashMap<NodeId, Option<Arc<T>>>>,
        node: NodeRef<'_>,
        query: BindingQuery,
        resolve: impl FnOnce() -> Option<Arc<T>>,
    ) -> Option<Arc<T>> {
        if let Some(hit) = cache.borrow().get(&node.id()) {
            return hit.clone();
        }

        let resolved = resolve();
        if resolved.is_none() {
            tracing::trace!(node = %node.id(), query = %query, "Binding unresolved");
            self.unknown.borrow_mut().push((node.id(), query));
        }
        cache.borrow_mut().insert(node.id(), resolved.clone());
        resolved
    }
}

impl BindingOracle for BindingRecorder<'_> {
    fn resolve_type_binding(&self, node: NodeRef<'_>) -> Option<Arc<TypeBinding>> {
        self.memoized(&self.types, node, BindingQuery::Type, || {
            self.oracle.resolve_type_binding(node)
        })
    }

    fn resolve_constructor_binding(&self, node: NodeRef<'_>) -> Option<Arc<MethodBinding>> {
        self.memoized(&self.constructors, node, BindingQuery::Constructor, || {
            self.oracle.resolve_constructor_binding(node)
        })
    }

    fn ensure_resolved(&self, node: NodeRef<'_>) {
        if self.forced.borrow_mut().insert(node.id()) {
            self.oracle.ensure_resolved(node);
        }
    }
}
