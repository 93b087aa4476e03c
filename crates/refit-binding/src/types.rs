//! Type bindings: declarations, type variables and their instantiations.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::BindingError;

/// Stable identity of a binding.
///
/// Two bindings denote the same entity exactly when their keys are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BindingKey(Arc<str>);

impl BindingKey {
    pub fn new(key: impl Into<Arc<str>>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BindingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for BindingKey {
    fn from(key: String) -> Self {
        BindingKey::new(key)
    }
}

impl From<&str> for BindingKey {
    fn from(key: &str) -> Self {
        BindingKey::new(key)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    Class,
    Interface,
    TypeVariable,
    Wildcard,
    Primitive,
}

/// A resolved type.
///
/// A generic declaration such as `ArrayList<E>` owns its type parameters.
/// Instantiations (`ArrayList<String>`, raw `ArrayList`) point back at that
/// declaration and carry no type parameters of their own.
#[derive(Debug, Clone)]
pub struct TypeBinding {
    key: BindingKey,
    name: String,
    kind: TypeKind,
    type_parameters: Vec<Arc<TypeBinding>>,
    type_arguments: Vec<Arc<TypeBinding>>,
    declaration: Option<Arc<TypeBinding>>,
    raw: bool,
}

impl TypeBinding {
    fn declared(name: &str, kind: TypeKind) -> Self {
        Self {
            key: BindingKey::new(name),
            name: name.to_string(),
            kind,
            type_parameters: Vec::new(),
            type_arguments: Vec::new(),
            declaration: None,
            raw: false,
        }
    }

    /// Non-generic class, e.g. `java.lang.String`.
    pub fn class(name: &str) -> Arc<Self> {
        Arc::new(Self::declared(name, TypeKind::Class))
    }

    pub fn interface(name: &str) -> Arc<Self> {
        Arc::new(Self::declared(name, TypeKind::Interface))
    }

    pub fn primitive(name: &str) -> Arc<Self> {
        Arc::new(Self::declared(name, TypeKind::Primitive))
    }

    /// Generic declaration whose type variables are owned by `name`.
    ///
    /// `TypeBinding::generic("java.util.ArrayList", TypeKind::Class, &["E"])`
    /// declares `ArrayList<E>` with the variable keyed `java.util.ArrayList:E`.
    pub fn generic(name: &str, kind: TypeKind, parameters: &[&str]) -> Arc<Self> {
        let mut declaration = Self::declared(name, kind);
        declaration.type_parameters = parameters
            .iter()
            .map(|parameter| Self::type_variable(name, parameter))
            .collect();
        Arc::new(declaration)
    }

    /// Type variable `name` declared by `owner`.
    pub fn type_variable(owner: &str, name: &str) -> Arc<Self> {
        Arc::new(Self {
            key: BindingKey::new(format!("{owner}:{name}")),
            name: name.to_string(),
            kind: TypeKind::TypeVariable,
            type_parameters: Vec::new(),
            type_arguments: Vec::new(),
            declaration: None,
            raw: false,
        })
    }

    /// Wildcard `?`, `? extends bound`.
    pub fn wildcard(bound: Option<Arc<TypeBinding>>) -> Arc<Self> {
        let (key, name) = match &bound {
            Some(bound) => (
                format!("? extends {}", bound.key),
                format!("? extends {}", bound.name),
            ),
            None => ("?".to_string(), "?".to_string()),
        };
        Arc::new(Self {
            key: BindingKey::new(key),
            name,
            kind: TypeKind::Wildcard,
            type_parameters: Vec::new(),
            type_arguments: bound.into_iter().collect(),
            declaration: None,
            raw: false,
        })
    }

    /// Instantiate a generic declaration with concrete arguments.
    pub fn parameterize(
        declaration: &Arc<TypeBinding>,
        arguments: Vec<Arc<TypeBinding>>,
    ) -> Result<Arc<Self>, BindingError> {
        if !declaration.is_generic() {
            return Err(BindingError::NotGeneric {
                name: declaration.name.clone(),
            });
        }
        if arguments.len() != declaration.type_parameters.len() {
            return Err(BindingError::ArityMismatch {
                name: declaration.name.clone(),
                expected: declaration.type_parameters.len(),
                found: arguments.len(),
            });
        }

        let keys: Vec<&str> = arguments.iter().map(|a| a.key.as_str()).collect();
        let names: Vec<&str> = arguments.iter().map(|a| a.name.as_str()).collect();
        let key = format!("{}<{}>", declaration.key, keys.join(","));
        let name = format!("{}<{}>", declaration.name, names.join(","));

        Ok(Arc::new(Self {
            key: BindingKey::new(key),
            name,
            kind: declaration.kind,
            type_parameters: Vec::new(),
            type_arguments: arguments,
            declaration: Some(Arc::clone(declaration)),
            raw: false,
        }))
    }

    /// Raw use of a generic declaration, with its type arguments erased.
    pub fn raw(declaration: &Arc<TypeBinding>) -> Result<Arc<Self>, BindingError> {
        if !declaration.is_generic() {
            return Err(BindingError::NotGeneric {
                name: declaration.name.clone(),
            });
        }

        Ok(Arc::new(Self {
            key: BindingKey::new(format!("{}#raw", declaration.key)),
            name: declaration.name.clone(),
            kind: declaration.kind,
            type_parameters: Vec::new(),
            type_arguments: Vec::new(),
            declaration: Some(Arc::clone(declaration)),
            raw: true,
        }))
    }

    pub fn key(&self) -> &BindingKey {
        &self.key
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    pub fn is_parameterized(&self) -> bool {
        self.declaration.is_some() && !self.raw
    }

    pub fn is_raw(&self) -> bool {
        self.raw
    }

    /// Whether this is a generic declaration (it owns type parameters).
    pub fn is_generic(&self) -> bool {
        !self.type_parameters.is_empty()
    }

    pub fn is_type_variable(&self) -> bool {
        self.kind == TypeKind::TypeVariable
    }

    pub fn type_parameters(&self) -> &[Arc<TypeBinding>] {
        &self.type_parameters
    }

    pub fn type_arguments(&self) -> &[Arc<TypeBinding>] {
        &self.type_arguments
    }

    /// The generic declaration this binding instantiates, or itself.
    pub fn type_declaration(&self) -> &TypeBinding {
        self.declaration.as_deref().unwrap_or(self)
    }

    /// Identity comparison by key.
    pub fn is_same(&self, other: &TypeBinding) -> bool {
        self.key == other.key
    }
}

impl PartialEq for TypeBinding {
    fn eq(&self, other: &Self) -> bool {
        self.is_same(other)
    }
}

impl Eq for TypeBinding {}

impl fmt::Display for TypeBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
