//! # refit-binding
//!
//! Type-binding facts for refit rules.
//!
//! refit never resolves types itself. A type checker answers questions about
//! individual nodes through the [`BindingOracle`] trait, and rules reason over
//! the returned [`TypeBinding`]s and [`MethodBinding`]s. [`BindingTable`] is
//! an oracle over precomputed answers.
//!
//! ```rust
//! use refit_binding::{TypeBinding, TypeKind};
//!
//! let array_list = TypeBinding::generic("java.util.ArrayList", TypeKind::Class, &["E"]);
//! let string = TypeBinding::class("java.lang.String");
//! let strings = TypeBinding::parameterize(&array_list, vec![string]).unwrap();
//!
//! assert!(strings.is_parameterized());
//! assert!(strings.type_declaration().is_same(&array_list));
//! ```

mod methods;
mod oracle;
mod types;

pub use methods::{MethodBinding, MethodForm};
pub use oracle::{BindingOracle, BindingQuery, BindingTable};
pub use types::{BindingKey, TypeBinding, TypeKind};

/// Errors raised while constructing bindings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BindingError {
    #[error("{name} is not a generic declaration")]
    NotGeneric { name: String },

    #[error("{name} declares {expected} type parameter(s) but {found} argument(s) were given")]
    ArityMismatch {
        name: String,
        expected: usize,
        found: usize,
    },
}
