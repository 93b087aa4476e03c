//! Diagnostics collected during a run.
//!
//! Nothing reported here is fatal. A run always finishes with a (possibly
//! empty) mutation list plus these records, in a serializable form suitable
//! for reporting.

use std::fmt;

use refit_ast::{NodeId, NodeRef, SourceSpan};
use refit_binding::BindingQuery;
use serde::{Deserialize, Serialize};

use crate::mutation::Mutation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// The binding oracle could not answer a query.
    UnknownBinding,
    /// An expected ancestor or slot was absent.
    MissingContext,
    /// A rule returned an error, panicked, or produced an unusable mutation.
    RuleFault,
    /// A mutation overlapped an earlier one and was dropped.
    MutationConflict,
    /// A second mutation targeted an already mutated node and was dropped.
    DuplicateTarget,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DiagnosticKind::UnknownBinding => "unknown_binding",
            DiagnosticKind::MissingContext => "missing_context",
            DiagnosticKind::RuleFault => "rule_fault",
            DiagnosticKind::MutationConflict => "mutation_conflict",
            DiagnosticKind::DuplicateTarget => "duplicate_target",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticSeverity {
    Error,
    Warning,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub severity: DiagnosticSeverity,
    pub message: String,
    /// Rule that was running, if any.
    pub rule: Option<String>,
    pub node: Option<NodeId>,
    pub span: Option<SourceSpan>,
}

impl Diagnostic {
    fn at(
        kind: DiagnosticKind,
        severity: DiagnosticSeverity,
        message: String,
        rule: &str,
        node: Option<NodeRef<'_>>,
    ) -> Self {
        Self {
            kind,
            severity,
            message,
            rule: Some(rule.to_string()),
            node: node.map(|n| n.id()),
            span: node.map(|n| n.span()),
        }
    }

    pub fn unknown_binding(rule: &str, node: NodeRef<'_>, query: BindingQuery) -> Self {
        Self::at(
            DiagnosticKind::UnknownBinding,
            DiagnosticSeverity::Info,
            format!("no {query} for {} `{}`", node.kind(), node.text()),
            rule,
            Some(node),
        )
    }

    pub fn missing_context(rule: &str, node: NodeRef<'_>) -> Self {
        Self::at(
            DiagnosticKind::MissingContext,
            DiagnosticSeverity::Info,
            format!("{} has no enclosing context", node.kind()),
            rule,
            Some(node),
        )
    }

    /// `error` is rendered with its full context chain.
    pub fn rule_fault(rule: &str, node: NodeRef<'_>, error: &anyhow::Error) -> Self {
        Self::at(
            DiagnosticKind::RuleFault,
            DiagnosticSeverity::Error,
            format!("{error:#}"),
            rule,
            Some(node),
        )
    }

    /// A mutation whose range cannot be computed against the tree.
    pub fn invalid_mutation(mutation: &Mutation, reason: impl fmt::Display) -> Self {
        Self {
            kind: DiagnosticKind::RuleFault,
            severity: DiagnosticSeverity::Error,
            message: format!("unusable mutation on {}: {reason}", mutation.target),
            rule: Some(mutation.rule.to_string()),
            node: Some(mutation.target),
            span: None,
        }
    }

    pub fn conflict(
        kept: &Mutation,
        kept_span: SourceSpan,
        dropped: &Mutation,
        span: SourceSpan,
    ) -> Self {
        Self {
            kind: DiagnosticKind::MutationConflict,
            severity: DiagnosticSeverity::Warning,
            message: format!(
                "mutation on {} at {span} overlaps mutation on {} at {kept_span} \
                 (from `{}`) and was dropped",
                dropped.target, kept.target, kept.rule
            ),
            rule: Some(dropped.rule.to_string()),
            node: Some(dropped.target),
            span: Some(span),
        }
    }

    pub fn duplicate_target(dropped: &Mutation) -> Self {
        Self {
            kind: DiagnosticKind::DuplicateTarget,
            severity: DiagnosticSeverity::Warning,
            message: format!("{} already has a pending mutation", dropped.target),
            rule: Some(dropped.rule.to_string()),
            node: Some(dropped.target),
            span: None,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.kind)?;
        if let Some(rule) = &self.rule {
            write!(f, " {rule}:")?;
        }
        write!(f, " {}", self.message)?;
        if let Some(span) = self.span {
            write!(f, " ({span})")?;
        }
        Ok(())
    }
}
