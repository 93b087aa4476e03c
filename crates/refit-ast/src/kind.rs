//! Syntax categories and the structural slots each category declares.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Syntax category of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    CompilationUnit,
    TypeDeclaration,
    FieldDeclaration,
    MethodDeclaration,
    SingleVariableDeclaration,
    AnonymousClassDeclaration,

    Block,
    ExpressionStatement,
    ReturnStatement,
    VariableDeclarationStatement,
    VariableDeclarationFragment,

    Assignment,
    ClassInstanceCreation,
    MethodInvocation,
    ParenthesizedExpression,
    CastExpression,
    ConditionalExpression,
    SimpleName,
    QualifiedName,
    StringLiteral,
    NumberLiteral,
    NullLiteral,
    ThisExpression,

    SimpleType,
    ParameterizedType,
    WildcardType,
}

impl NodeKind {
    /// Slots this kind declares, in declaration order.
    ///
    /// Children are always visited in this order, whatever order the tree
    /// builder received them in.
    pub fn slots(self) -> &'static [Slot] {
        use Slot::*;

        match self {
            NodeKind::CompilationUnit => &[Types],
            NodeKind::TypeDeclaration => &[Name, BodyDeclarations],
            NodeKind::FieldDeclaration => &[Type, Fragments],
            NodeKind::MethodDeclaration => &[ReturnType, Name, Parameters, Body],
            NodeKind::SingleVariableDeclaration => &[Type, Name],
            NodeKind::AnonymousClassDeclaration => &[BodyDeclarations],
            NodeKind::Block => &[Statements],
            NodeKind::ExpressionStatement | NodeKind::ReturnStatement => &[Expression],
            NodeKind::VariableDeclarationStatement => &[Type, Fragments],
            NodeKind::VariableDeclarationFragment => &[Name, Initializer],
            NodeKind::Assignment => &[LeftHandSide, RightHandSide],
            NodeKind::ClassInstanceCreation => {
                &[Expression, Type, Arguments, AnonymousClassDeclaration]
            }
            NodeKind::MethodInvocation => &[Expression, TypeArguments, Name, Arguments],
            NodeKind::ParenthesizedExpression => &[Expression],
            NodeKind::CastExpression => &[Type, Expression],
            NodeKind::ConditionalExpression => &[Expression, ThenExpression, ElseExpression],
            NodeKind::QualifiedName => &[Qualifier, Name],
            NodeKind::SimpleType => &[Name],
            NodeKind::ParameterizedType => &[Type, TypeArguments],
            NodeKind::WildcardType => &[Bound],
            NodeKind::SimpleName
            | NodeKind::StringLiteral
            | NodeKind::NumberLiteral
            | NodeKind::NullLiteral
            | NodeKind::ThisExpression => &[],
        }
    }

    /// Whether this kind declares `slot`.
    pub fn declares(self, slot: Slot) -> bool {
        self.slots().contains(&slot)
    }

    /// Position of `slot` in this kind's declaration order.
    pub fn slot_index(self, slot: Slot) -> Option<usize> {
        self.slots().iter().position(|s| *s == slot)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Whether a slot holds a single child or an ordered child list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cardinality {
    Single,
    List,
}

/// Named structural role through which a parent holds its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Slot {
    AnonymousClassDeclaration,
    Arguments,
    Body,
    BodyDeclarations,
    Bound,
    ElseExpression,
    Expression,
    Fragments,
    Initializer,
    LeftHandSide,
    Name,
    Parameters,
    Qualifier,
    ReturnType,
    RightHandSide,
    Statements,
    ThenExpression,
    Type,
    TypeArguments,
    Types,
}

impl Slot {
    pub fn cardinality(self) -> Cardinality {
        match self {
            Slot::Arguments
            | Slot::BodyDeclarations
            | Slot::Fragments
            | Slot::Parameters
            | Slot::Statements
            | Slot::TypeArguments
            | Slot::Types => Cardinality::List,
            _ => Cardinality::Single,
        }
    }

    pub fn is_list(self) -> bool {
        self.cardinality() == Cardinality::List
    }

    /// Role name as written in property descriptors, e.g. `RIGHT_HAND_SIDE`.
    pub fn as_str(self) -> &'static str {
        match self {
            Slot::AnonymousClassDeclaration => "ANONYMOUS_CLASS_DECLARATION",
            Slot::Arguments => "ARGUMENTS",
            Slot::Body => "BODY",
            Slot::BodyDeclarations => "BODY_DECLARATIONS",
            Slot::Bound => "BOUND",
            Slot::ElseExpression => "ELSE_EXPRESSION",
            Slot::Expression => "EXPRESSION",
            Slot::Fragments => "FRAGMENTS",
            Slot::Initializer => "INITIALIZER",
            Slot::LeftHandSide => "LEFT_HAND_SIDE",
            Slot::Name => "NAME",
            Slot::Parameters => "PARAMETERS",
            Slot::Qualifier => "QUALIFIER",
            Slot::ReturnType => "RETURN_TYPE",
            Slot::RightHandSide => "RIGHT_HAND_SIDE",
            Slot::Statements => "STATEMENTS",
            Slot::ThenExpression => "THEN_EXPRESSION",
            Slot::Type => "TYPE",
            Slot::TypeArguments => "TYPE_ARGUMENTS",
            Slot::Types => "TYPES",
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
