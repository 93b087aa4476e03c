//! Diamond operator: drop explicit type arguments from a constructor call
//! where the target type already determines them.
//!
//! `List<String> l = new ArrayList<String>();` becomes
//! `List<String> l = new ArrayList<>();`.

use refit_ast::context::{self, PARENTHESES};
use refit_ast::{NodeKind, NodeRef, Slot};

use crate::mutation::Mutation;
use crate::rule::{Applicability, Evaluation, Gap, Reason, Rule, RuleContext, Traversal};
use crate::version::LanguageVersion;

#[derive(Debug, Clone, Copy, Default)]
pub struct UseDiamondOperator;

impl UseDiamondOperator {
    pub const NAME: &'static str = "Diamond operator";
}

impl Rule for UseDiamondOperator {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn description(&self) -> &'static str {
        "Refactors class instance creations to use the diamond operator wherever possible."
    }

    fn min_language_version(&self) -> LanguageVersion {
        LanguageVersion::JAVA_7
    }

    fn node_kinds(&self) -> &'static [NodeKind] {
        &[NodeKind::ClassInstanceCreation]
    }

    fn evaluate(&self, call: NodeRef<'_>, cx: &RuleContext<'_>) -> anyhow::Result<Evaluation> {
        let applicability = applicability(call, cx);
        if !applicability.is_applicable() {
            return Ok(Evaluation::skip(applicability));
        }

        let Some(ty) = call.child(Slot::Type) else {
            return Ok(Evaluation::skip(Applicability::NotApplicable(Reason::NotParameterized)));
        };
        if ty.list(Slot::TypeArguments).next().is_none() {
            // Already `new C<>()`.
            return Ok(Evaluation::unchanged());
        }

        Ok(Evaluation::rewrite(
            Mutation::remove_slot(Self::NAME, ty.id(), Slot::TypeArguments),
            Traversal::SkipSubtree,
        ))
    }
}

/// Whether the type arguments of `call` may be inferred instead.
pub fn applicability(call: NodeRef<'_>, cx: &RuleContext<'_>) -> Applicability {
    let parameterized = call
        .child(Slot::Type)
        .is_some_and(|ty| ty.is(NodeKind::ParameterizedType));
    if !parameterized {
        return Applicability::NotApplicable(Reason::NotParameterized);
    }
    if call.child(Slot::AnonymousClassDeclaration).is_some() {
        return Applicability::NotApplicable(Reason::AnonymousClass);
    }

    let Some(enclosing) = context::enclosing(call, PARENTHESES) else {
        return Applicability::NotApplicable(Reason::MissingContext);
    };

    match enclosing.parent.kind() {
        NodeKind::Assignment => in_slot(enclosing.slot, Slot::RightHandSide),
        NodeKind::ReturnStatement => in_slot(enclosing.slot, Slot::Expression),
        NodeKind::MethodInvocation if enclosing.slot == Slot::Arguments => {
            Applicability::NotSupported(Gap::MethodArgument)
        }
        NodeKind::MethodInvocation => Applicability::NotApplicable(Reason::WrongSlot),
        NodeKind::VariableDeclarationFragment => match initializer_bindings(call, cx) {
            Applicability::Applicable => in_slot(enclosing.slot, Slot::Initializer),
            declined => declined,
        },
        _ => Applicability::NotApplicable(Reason::UnsupportedContext),
    }
}

fn in_slot(actual: Slot, required: Slot) -> Applicability {
    if actual == required {
        Applicability::Applicable
    } else {
        Applicability::NotApplicable(Reason::WrongSlot)
    }
}

/// Binding checks for a call initializing a declared variable.
fn initializer_bindings(call: NodeRef<'_>, cx: &RuleContext<'_>) -> Applicability {
    let bindings = cx.bindings();
    bindings.ensure_resolved(call);

    let (Some(constructor), Some(ty)) = (
        bindings.resolve_constructor_binding(call),
        bindings.resolve_type_binding(call),
    ) else {
        return Applicability::NotApplicable(Reason::UnknownBinding);
    };

    if !ty.is_parameterized() {
        return Applicability::NotApplicable(Reason::NotParameterized);
    }
    if !constructor.is_declared_in_generic_type() {
        return Applicability::NotApplicable(Reason::GenericMethodReference);
    }

    let declaration = ty.type_declaration();
    let has_arguments = call.list(Slot::Arguments).next().is_some();
    let formal = constructor
        .method_declaration()
        .parameter_types()
        .first()
        .filter(|formal| formal.is_parameterized());

    if let (true, true, Some(formal)) = (declaration.is_generic(), has_arguments, formal) {
        let [parameter] = declaration.type_parameters() else {
            return Applicability::NotApplicable(Reason::MultipleTypeParameters);
        };
        let matches = formal
            .type_declaration()
            .type_parameters()
            .first()
            .is_some_and(|variable| variable.is_type_variable() && variable.is_same(parameter));
        if !matches {
            return Applicability::NotApplicable(Reason::TypeVariableMismatch);
        }
    }

    Applicability::Applicable
}
