//! # refit-engine
//!
//! Drives semantics-preserving rewrites over a [`refit_ast::Tree`].
//!
//! An [`Engine`] walks the tree once in pre-order and evaluates every
//! [`Rule`] registered for a node's kind. Rules consult the tree's context
//! helpers and a [`refit_binding::BindingOracle`], then return a verdict and
//! at most one [`Mutation`]. After the walk the mutations are
//! conflict-resolved and can be applied to the source text.
//!
//! ## Quick start
//!
//! ```rust
//! use refit_ast::{NodeKind, Slot, SourceSpan, TreeBuilder};
//! use refit_binding::BindingTable;
//! use refit_engine::{Engine, EngineConfig};
//!
//! // `return new ArrayList<String>();`
//! let mut b = TreeBuilder::new("return new ArrayList<String>();");
//! let base_name = b.leaf(NodeKind::SimpleName, SourceSpan::new(11, 20)).unwrap();
//! let base = b
//!     .node(NodeKind::SimpleType, SourceSpan::new(11, 20))
//!     .child(Slot::Name, base_name)
//!     .build()
//!     .unwrap();
//! let arg_name = b.leaf(NodeKind::SimpleName, SourceSpan::new(21, 27)).unwrap();
//! let arg = b
//!     .node(NodeKind::SimpleType, SourceSpan::new(21, 27))
//!     .child(Slot::Name, arg_name)
//!     .build()
//!     .unwrap();
//! let ty = b
//!     .node(NodeKind::ParameterizedType, SourceSpan::new(11, 28))
//!     .child(Slot::Type, base)
//!     .list(Slot::TypeArguments, [arg])
//!     .build()
//!     .unwrap();
//! let call = b
//!     .node(NodeKind::ClassInstanceCreation, SourceSpan::new(7, 30))
//!     .child(Slot::Type, ty)
//!     .build()
//!     .unwrap();
//! let ret = b
//!     .node(NodeKind::ReturnStatement, SourceSpan::new(0, 31))
//!     .child(Slot::Expression, call)
//!     .build()
//!     .unwrap();
//! let tree = b.finish(ret).unwrap();
//!
//! let engine = Engine::with_defaults(EngineConfig::default());
//! let refactored = engine.refactor(&tree, &BindingTable::new()).unwrap();
//! assert_eq!(refactored.source, "return new ArrayList<>();");
//! ```

mod config;
mod diagnostics;
mod engine;
mod mutation;
mod recorder;
mod rewrite;
mod rule;
pub mod rules;
mod version;

pub use config::{CONFIG_FILE, ConfigError, EngineConfig};
pub use diagnostics::{Diagnostic, DiagnosticKind, DiagnosticSeverity};
pub use engine::{DispatchTable, Engine, Refactored, RuleRegistry, RunReport, RunStats};
pub use mutation::{Anchor, Mutation, MutationSet, Operation, Resolution};
pub use rewrite::{Edit, RewriteError, apply_edits, apply_to_text};
pub use rule::{Applicability, Evaluation, Gap, Reason, Rule, RuleContext, Traversal};
pub use version::{LanguageVersion, VersionError};
