//! # refit-ast
//!
//! Read-only syntax trees for refit's rewrite rules.
//!
//! Trees are built once by an external parser through [`TreeBuilder`] and
//! are immutable afterwards. Each node has a [`NodeKind`], a back link to its
//! parent and a set of named [`Slot`]s holding its children. The
//! [`context`] module answers the structural questions rules ask about a
//! node's position.
//!
//! ```text
//!  Assignment ── LEFT_HAND_SIDE ──▶ SimpleName "l"
//!      │
//!      └──────── RIGHT_HAND_SIDE ─▶ ParenthesizedExpression
//!                                      └─ EXPRESSION ─▶ ClassInstanceCreation
//! ```
//!
//! ## Example
//!
//! ```rust
//! use refit_ast::{NodeKind, Slot, SourceSpan, TreeBuilder, context};
//!
//! # fn main() -> Result<(), refit_ast::TreeError> {
//! let mut b = TreeBuilder::new("return x;");
//! let x = b.leaf(NodeKind::SimpleName, SourceSpan::new(7, 8))?;
//! let ret = b
//!     .node(NodeKind::ReturnStatement, SourceSpan::new(0, 9))
//!     .child(Slot::Expression, x)
//!     .build()?;
//! let tree = b.finish(ret)?;
//!
//! let name = tree.get(x).unwrap();
//! assert_eq!(context::slot_of(name), Some(Slot::Expression));
//! # Ok(())
//! # }
//! ```

mod builder;
pub mod context;
mod kind;
mod span;
mod tree;

pub use builder::{NodeDraft, TreeBuilder, TreeError};
pub use context::Enclosing;
pub use kind::{Cardinality, NodeKind, Slot};
pub use span::SourceSpan;
pub use tree::{NodeId, NodeRef, SlotValue, Tree};
