//! Method and constructor bindings.

use std::sync::Arc;

use bon::Builder;
use serde::{Deserialize, Serialize};

use crate::types::{BindingKey, TypeBinding};

/// Which flavour of method binding this is.
///
/// Exactly one form holds at a time. It replaces a pair of
/// `is_parameterized`/`is_raw` flags whose combinations had to be decoded
/// together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MethodForm {
    /// Declaration of a generic method (it owns type parameters).
    GenericDeclaration,
    /// Reference to a generic method with its type arguments substituted.
    Parameterized,
    /// Reference to a generic method with its type arguments erased.
    Raw,
    /// Non-generic method, possibly a copy made for a parameterized
    /// declaring type.
    #[default]
    Plain,
}

/// A resolved method or constructor.
#[derive(Debug, Clone, Builder)]
pub struct MethodBinding {
    #[builder(into)]
    key: BindingKey,
    #[builder(into)]
    name: String,
    declaring_type: Arc<TypeBinding>,
    #[builder(default)]
    parameter_types: Vec<Arc<TypeBinding>>,
    #[builder(default)]
    type_arguments: Vec<Arc<TypeBinding>>,
    #[builder(default)]
    form: MethodForm,
    #[builder(default)]
    constructor: bool,
    /// The declaration this binding is a substituted copy of.
    declaration: Option<Arc<MethodBinding>>,
}

impl MethodBinding {
    /// Constructor declared directly by `declaring_type`.
    pub fn constructor(
        declaring_type: &Arc<TypeBinding>,
        parameter_types: Vec<Arc<TypeBinding>>,
    ) -> Arc<Self> {
        Arc::new(
            Self::builder()
                .key(constructor_key(declaring_type, &parameter_types))
                .name("<init>")
                .declaring_type(Arc::clone(declaring_type))
                .parameter_types(parameter_types)
                .constructor(true)
                .build(),
        )
    }

    /// Copy of `declaration` as seen through a parameterized declaring type,
    /// e.g. `ArrayList<String>()` made from `ArrayList<E>()`.
    pub fn substituted(
        declaration: &Arc<MethodBinding>,
        declaring_type: &Arc<TypeBinding>,
        parameter_types: Vec<Arc<TypeBinding>>,
    ) -> Arc<Self> {
        Arc::new(Self {
            key: constructor_key(declaring_type, &parameter_types).into(),
            name: declaration.name.clone(),
            declaring_type: Arc::clone(declaring_type),
            parameter_types,
            type_arguments: Vec::new(),
            form: MethodForm::Plain,
            constructor: declaration.constructor,
            declaration: Some(Arc::clone(declaration)),
        })
    }

    pub fn key(&self) -> &BindingKey {
        &self.key
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn declaring_type(&self) -> &Arc<TypeBinding> {
        &self.declaring_type
    }

    pub fn parameter_types(&self) -> &[Arc<TypeBinding>] {
        &self.parameter_types
    }

    pub fn type_arguments(&self) -> &[Arc<TypeBinding>] {
        &self.type_arguments
    }

    pub fn form(&self) -> MethodForm {
        self.form
    }

    pub fn is_constructor(&self) -> bool {
        self.constructor
    }

    pub fn is_parameterized_method(&self) -> bool {
        self.form == MethodForm::Parameterized
    }

    pub fn is_raw_method(&self) -> bool {
        self.form == MethodForm::Raw
    }

    /// The declaration this binding was derived from, or itself.
    pub fn method_declaration(&self) -> &MethodBinding {
        self.declaration.as_deref().unwrap_or(self)
    }

    /// A method of a generic type, copied with the type's parameters
    /// substituted: no type arguments, neither parameterized nor raw.
    pub fn is_declared_in_generic_type(&self) -> bool {
        self.type_arguments.is_empty() && !self.is_parameterized_method() && !self.is_raw_method()
    }

    /// A reference to a generic method with the method's own type parameters
    /// substituted or erased.
    pub fn is_reference_to_generic_method(&self) -> bool {
        self.type_arguments.is_empty() && (self.is_parameterized_method() || self.is_raw_method())
    }
}

fn constructor_key(declaring_type: &TypeBinding, parameter_types: &[Arc<TypeBinding>]) -> String {
    let parameters: Vec<&str> = parameter_types.iter().map(|p| p.key().as_str()).collect();
    format!("{}.<init>({})", declaring_type.key(), parameters.join(","))
}
