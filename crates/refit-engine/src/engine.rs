//! Rule registry, kind dispatch and the traversal driving a run.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use refit_ast::{NodeKind, NodeRef, Tree};
use refit_binding::BindingOracle;
use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::config::EngineConfig;
use crate::diagnostics::{Diagnostic, DiagnosticKind};
use crate::mutation::{Mutation, MutationSet};
use crate::recorder::BindingRecorder;
use crate::rewrite::{RewriteError, apply_to_text};
use crate::rule::{Applicability, Evaluation, Reason, Rule, RuleContext, Traversal};
use crate::rules::UseDiamondOperator;

/// Rules in registration order.
#[derive(Default)]
pub struct RuleRegistry {
    rules: Vec<Box<dyn Rule>>,
}

impl RuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every built-in rule.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(UseDiamondOperator);
        registry
    }

    pub fn register(&mut self, rule: impl Rule + 'static) -> &mut Self {
        self.rules.push(Box::new(rule));
        self
    }

    pub fn get(&self, index: usize) -> Option<&dyn Rule> {
        self.rules.get(index).map(|rule| rule.as_ref())
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Rule> {
        self.rules.iter().map(|rule| rule.as_ref())
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|rule| rule.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl std::fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleRegistry")
            .field("rules", &self.names())
            .finish()
    }
}

/// Node kind to the indices of the rules evaluated on it.
#[derive(Debug, Default, Clone)]
pub struct DispatchTable {
    by_kind: FxHashMap<NodeKind, Vec<usize>>,
}

impl DispatchTable {
    /// Rules that are disabled, or that need a newer version than the
    /// target, never enter the table.
    pub fn build(registry: &RuleRegistry, config: &EngineConfig) -> Self {
        let mut by_kind: FxHashMap<NodeKind, Vec<usize>> = FxHashMap::default();

        for (index, rule) in registry.iter().enumerate() {
            if config.is_disabled(rule.name()) {
                tracing::debug!(rule = rule.name(), "Rule disabled by configuration");
                continue;
            }
            let required = rule.min_language_version();
            if !config.target_version.is_compatible_with(&required) {
                tracing::debug!(
                    rule = rule.name(),
                    required = %required,
                    target = %config.target_version,
                    "Rule gated by target version"
                );
                continue;
            }
            for kind in rule.node_kinds() {
                let indices = by_kind.entry(*kind).or_default();
                if !indices.contains(&index) {
                    indices.push(index);
                }
            }
        }

        Self { by_kind }
    }

    pub fn rules_for(&self, kind: NodeKind) -> &[usize] {
        self.by_kind.get(&kind).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.by_kind.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunStats {
    pub nodes_visited: usize,
    pub rule_invocations: usize,
    pub subtrees_skipped: usize,
    pub faults: usize,
    pub mutations_proposed: usize,
    pub mutations_accepted: usize,
}

/// Everything one run produced.
#[derive(Debug, Default)]
pub struct RunReport {
    /// Conflict-free mutations in enqueue order.
    pub mutations: Vec<Mutation>,
    pub diagnostics: Vec<Diagnostic>,
    pub stats: RunStats,
}

impl RunReport {
    pub fn diagnostics_of(&self, kind: DiagnosticKind) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(move |d| d.kind == kind)
    }
}

/// A run plus its mutations applied to the source text.
#[derive(Debug)]
pub struct Refactored {
    pub source: String,
    pub report: RunReport,
}

pub struct Engine {
    registry: RuleRegistry,
    dispatch: DispatchTable,
    config: EngineConfig,
}

impl Engine {
    pub fn new(registry: RuleRegistry, config: EngineConfig) -> Self {
        for name in &config.disabled_rules {
            if !registry.names().contains(&name.as_str()) {
                tracing::warn!(rule = %name, "Disabled rule is not registered");
            }
        }
        let dispatch = DispatchTable::build(&registry, &config);
        Self {
            registry,
            dispatch,
            config,
        }
    }

    /// Built-in rules under `config`.
    pub fn with_defaults(config: EngineConfig) -> Self {
        Self::new(RuleRegistry::with_defaults(), config)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    pub fn dispatch(&self) -> &DispatchTable {
        &self.dispatch
    }

    /// Traverse `tree` once and collect the resolved mutation set.
    pub fn run(&self, tree: &Tree, oracle: &dyn BindingOracle) -> RunReport {
        let recorder = BindingRecorder::new(oracle);
        let cx = RuleContext::new(tree, &recorder, self.config.target_version);
        let mut set = MutationSet::new();
        let mut diagnostics = Vec::new();
        let mut stats = RunStats::default();

        let mut stack = vec![tree.root()];
        while let Some(node) = stack.pop() {
            stats.nodes_visited += 1;
            let mut skip = false;

            for &index in self.dispatch.rules_for(node.kind()) {
                let Some(rule) = self.registry.get(index) else {
                    continue;
                };
                stats.rule_invocations += 1;
                let outcome = evaluate_isolated(rule, node, &cx);

                for (id, query) in recorder.take_unknown() {
                    if let Some(queried) = tree.get(id) {
                        diagnostics.push(Diagnostic::unknown_binding(rule.name(), queried, query));
                    }
                }

                match outcome {
                    Ok(evaluation) => {
                        skip |= self.record(
                            rule,
                            node,
                            evaluation,
                            &mut set,
                            &mut diagnostics,
                            &mut stats,
                        );
                    }
                    Err(error) => {
                        let message = format!("{error:#}");
                        tracing::warn!(
                            rule = rule.name(),
                            node = %node.id(),
                            error = %message,
                            "Rule faulted"
                        );
                        stats.faults += 1;
                        diagnostics.push(Diagnostic::rule_fault(rule.name(), node, &error));
                        skip |= self.config.skip_subtree_on_fault;
                    }
                }
            }

            if skip {
                stats.subtrees_skipped += 1;
                continue;
            }
            let children: Vec<NodeRef<'_>> = node.children().collect();
            stack.extend(children.into_iter().rev());
        }

        let resolution = set.resolve(tree);
        diagnostics.extend(resolution.diagnostics);
        stats.mutations_accepted = resolution.mutations.len();

        tracing::debug!(
            nodes = stats.nodes_visited,
            invocations = stats.rule_invocations,
            proposed = stats.mutations_proposed,
            accepted = stats.mutations_accepted,
            faults = stats.faults,
            diagnostics = diagnostics.len(),
            "Run complete"
        );

        RunReport {
            mutations: resolution.mutations,
            diagnostics,
            stats,
        }
    }

    /// [`Engine::run`], then apply the mutations to the tree's source text.
    pub fn refactor(
        &self,
        tree: &Tree,
        oracle: &dyn BindingOracle,
    ) -> Result<Refactored, RewriteError> {
        let report = self.run(tree, oracle);
        let source = apply_to_text(tree, &report.mutations)?;
        Ok(Refactored { source, report })
    }

    /// Fold one evaluation into the run. Returns whether to skip the subtree.
    fn record(
        &self,
        rule: &dyn Rule,
        node: NodeRef<'_>,
        evaluation: Evaluation,
        set: &mut MutationSet,
        diagnostics: &mut Vec<Diagnostic>,
        stats: &mut RunStats,
    ) -> bool {
        match evaluation.applicability {
            Applicability::NotApplicable(Reason::MissingContext) => {
                diagnostics.push(Diagnostic::missing_context(rule.name(), node));
            }
            Applicability::NotApplicable(reason) => {
                tracing::trace!(
                    rule = rule.name(),
                    node = %node.id(),
                    reason = %reason,
                    "Not applicable"
                );
            }
            Applicability::NotSupported(gap) => {
                tracing::trace!(rule = rule.name(), node = %node.id(), gap = %gap, "Not supported");
            }
            Applicability::Applicable => {}
        }

        if let Some(mutation) = evaluation.mutation {
            tracing::debug!(rule = rule.name(), node = %node.id(), "Mutation proposed");
            stats.mutations_proposed += 1;
            set.push(mutation);
        }

        evaluation.traversal == Traversal::SkipSubtree
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("registry", &self.registry)
            .field("config", &self.config)
            .finish()
    }
}

/// Run `rule` on `node`, turning a panic into an error.
fn evaluate_isolated(
    rule: &dyn Rule,
    node: NodeRef<'_>,
    cx: &RuleContext<'_>,
) -> anyhow::Result<Evaluation> {
    match panic::catch_unwind(AssertUnwindSafe(|| rule.evaluate(node, cx))) {
        Ok(result) => result.map_err(|error| {
            error.context(format!("`{}` failed on {} {}", rule.name(), node.kind(), node.id()))
        }),
        Err(payload) => Err(anyhow::anyhow!(
            "`{}` panicked on {} {}: {}",
            rule.name(),
            node.kind(),
            node.id(),
            panic_message(payload.as_ref())
        )),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        *message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "non-string panic payload"
    }
}
