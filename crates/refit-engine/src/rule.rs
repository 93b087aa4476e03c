//! The contract between the engine and individual rules.

use std::fmt;

use refit_ast::{NodeKind, NodeRef, Tree};
use refit_binding::BindingOracle;

use crate::mutation::Mutation;
use crate::version::LanguageVersion;

/// Whether the engine should descend into the evaluated node's children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Traversal {
    #[default]
    ContinueIntoSubtree,
    SkipSubtree,
}

/// Why a rule declined a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Reason {
    /// The node has no enclosing context to reason about.
    MissingContext,
    /// The oracle could not resolve a binding the rule needs.
    UnknownBinding,
    /// The node sits in a context the rule does not handle.
    UnsupportedContext,
    /// The node sits in a handled context, but in the wrong slot.
    WrongSlot,
    NotParameterized,
    AnonymousClass,
    /// The constructor is a copy of a generic method, not of a method
    /// declared in a generic type.
    GenericMethodReference,
    /// The enclosing generic type declares more than one type parameter.
    MultipleTypeParameters,
    /// A constructor argument's type variable does not match the type's own.
    TypeVariableMismatch,
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Reason::MissingContext => "no enclosing context",
            Reason::UnknownBinding => "binding could not be resolved",
            Reason::UnsupportedContext => "unsupported context",
            Reason::WrongSlot => "wrong slot in parent",
            Reason::NotParameterized => "type is not parameterized",
            Reason::AnonymousClass => "creates an anonymous class",
            Reason::GenericMethodReference => "constructor refers to a generic method",
            Reason::MultipleTypeParameters => "type declares several type parameters",
            Reason::TypeVariableMismatch => "argument type variable differs from the type's",
        };
        f.write_str(text)
    }
}

/// Cases a rule knowingly leaves alone even though some of them are safe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gap {
    /// Inference in argument position needs the invoked method's formal
    /// parameter type, which is not resolved.
    MethodArgument,
}

impl fmt::Display for Gap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gap::MethodArgument => f.write_str("method argument position"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Applicability {
    Applicable,
    NotApplicable(Reason),
    NotSupported(Gap),
}

impl Applicability {
    pub fn is_applicable(&self) -> bool {
        matches!(self, Applicability::Applicable)
    }
}

/// What a rule decided for one node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    pub applicability: Applicability,
    pub traversal: Traversal,
    pub mutation: Option<Mutation>,
}

impl Evaluation {
    /// Declined: no mutation, keep descending.
    pub fn skip(applicability: Applicability) -> Self {
        Self {
            applicability,
            traversal: Traversal::ContinueIntoSubtree,
            mutation: None,
        }
    }

    /// Applicable with nothing to change.
    pub fn unchanged() -> Self {
        Self::skip(Applicability::Applicable)
    }

    /// Applicable, rewriting the node with `mutation`.
    pub fn rewrite(mutation: Mutation, traversal: Traversal) -> Self {
        Self {
            applicability: Applicability::Applicable,
            traversal,
            mutation: Some(mutation),
        }
    }
}

/// Everything a rule can consult while evaluating a node.
///
/// The tree and bindings are shared by every rule of a run and never change
/// during it.
pub struct RuleContext<'r> {
    tree: &'r Tree,
    bindings: &'r dyn BindingOracle,
    target_version: LanguageVersion,
}

impl<'r> RuleContext<'r> {
    pub fn new(
        tree: &'r Tree,
        bindings: &'r dyn BindingOracle,
        target_version: LanguageVersion,
    ) -> Self {
        Self {
            tree,
            bindings,
            target_version,
        }
    }

    pub fn tree(&self) -> &'r Tree {
        self.tree
    }

    pub fn bindings(&self) -> &'r dyn BindingOracle {
        self.bindings
    }

    pub fn target_version(&self) -> LanguageVersion {
        self.target_version
    }
}

/// A semantics-preserving rewrite.
///
/// Rules are stateless: the engine may evaluate one rule over many trees,
/// and from several threads when an outer driver shares the engine.
///
/// # Example
///
/// ```rust
/// use refit_ast::{NodeKind, NodeRef};
/// use refit_engine::{Evaluation, LanguageVersion, Rule, RuleContext};
///
/// struct CountReturns;
///
/// impl Rule for CountReturns {
///     fn name(&self) -> &'static str {
///         "count-returns"
///     }
///
///     fn description(&self) -> &'static str {
///         "Visits return statements without changing them."
///     }
///
///     fn min_language_version(&self) -> LanguageVersion {
///         LanguageVersion::new(1, 0, 0)
///     }
///
///     fn node_kinds(&self) -> &'static [NodeKind] {
///         &[NodeKind::ReturnStatement]
///     }
///
///     fn evaluate(
///         &self,
///         _node: NodeRef<'_>,
///         _cx: &RuleContext<'_>,
///     ) -> anyhow::Result<Evaluation> {
///         Ok(Evaluation::unchanged())
///     }
/// }
/// ```
pub trait Rule: Send + Sync {
    /// Unique, human-readable name. Configuration refers to rules by it.
    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    /// Oldest target version this rule's output is valid for.
    fn min_language_version(&self) -> LanguageVersion;

    /// Kinds of node the rule is evaluated on.
    fn node_kinds(&self) -> &'static [NodeKind];

    /// Decide about `node`, which always has one of [`Rule::node_kinds`].
    ///
    /// An `Err` is isolated to this (rule, node) pair and reported as a
    /// fault. It never aborts the run.
    fn evaluate(&self, node: NodeRef<'_>, cx: &RuleContext<'_>) -> anyhow::Result<Evaluation>;
}
