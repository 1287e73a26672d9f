//! Policies shared by the declaration rewrites

use crate::ast::*;
use crate::builders as b;
use crate::scope::{Binding, BindingKind, ScopeId, ScopeTree};

use super::TransformState;

/// Prop flag bits passed to `$.prop`
pub const PROPS_IS_IMMUTABLE: u32 = 1;
pub const PROPS_IS_RUNES: u32 = 1 << 1;
pub const PROPS_IS_UPDATED: u32 = 1 << 2;
pub const PROPS_IS_BINDABLE: u32 = 1 << 3;
pub const PROPS_IS_LAZY_INITIAL: u32 = 1 << 4;

/// Expressions that are cheap and side-effect free to evaluate eagerly
pub fn is_simple_expression(expr: &Expression) -> bool {
    match expr {
        Expression::NumberLiteral(_)
        | Expression::StringLiteral(_)
        | Expression::BooleanLiteral(_)
        | Expression::NullLiteral(_)
        | Expression::Identifier(_)
        | Expression::Arrow(_)
        | Expression::Function(_) => true,
        Expression::Conditional(cond) => {
            is_simple_expression(&cond.test)
                && is_simple_expression(&cond.consequent)
                && is_simple_expression(&cond.alternate)
        }
        Expression::Binary(binary) => is_simple_expression(&binary.left) && is_simple_expression(&binary.right),
        Expression::Logical(logical) => is_simple_expression(&logical.left) && is_simple_expression(&logical.right),
        Expression::Parenthesized(paren) => is_simple_expression(&paren.expression),
        _ => false,
    }
}

/// Whether a value stored in state should be wrapped in `$.proxy` (or
/// `$.freeze`) first.
///
/// Primitives, functions and values that are already wrapped are left alone.
/// An identifier bound to a never-reassigned binding is judged by its initial
/// value; `scope` is `None` for that nested check.
pub fn should_proxy_or_freeze(expr: &Expression, scope: Option<(&ScopeTree, ScopeId)>) -> bool {
    match expr {
        Expression::Parenthesized(paren) => should_proxy_or_freeze(&paren.expression, scope),
        Expression::NumberLiteral(_)
        | Expression::StringLiteral(_)
        | Expression::BooleanLiteral(_)
        | Expression::NullLiteral(_)
        | Expression::TemplateLiteral(_)
        | Expression::Arrow(_)
        | Expression::Function(_)
        | Expression::Unary(_)
        | Expression::Binary(_) => false,
        Expression::Call(call) => !matches!(
            crate::scope::runes::get_global_keypath(&call.callee),
            Some((_, path)) if path == "$.proxy" || path == "$.freeze"
        ),
        Expression::Identifier(id) => {
            let binding = scope.and_then(|(scopes, scope)| scopes.get(scope, &id.name));
            match binding {
                Some(binding) if !binding.reassigned => match &binding.initial {
                    Some(initial) => should_proxy_or_freeze(initial, None),
                    None => true,
                },
                Some(_) => true,
                None => id.name != "undefined",
            }
        }
        _ => true,
    }
}

/// A top-level function expression that captures no instance state
pub fn is_hoistable_function(expr: &Expression) -> bool {
    match expr {
        Expression::Arrow(func) => func.metadata.hoistable,
        Expression::Function(func) => func.metadata.hoistable,
        _ => false,
    }
}

/// Whether a state binding needs a runtime cell at all.
///
/// Under `immutable`, state that is never reassigned can be stored bare.
pub fn is_state_source(binding: &Binding, state: &TransformState<'_>) -> bool {
    matches!(binding.kind, BindingKind::State | BindingKind::FrozenState)
        && (!state.options.immutable || binding.reassigned || state.options.accessors)
}

/// Whether a prop binding is read through a `$.prop` source
pub fn is_prop_source(binding: &Binding) -> bool {
    binding.kind == BindingKind::BindableProp
}

/// `$.prop($$props, name, flags[, initial])`
pub fn get_prop_source(
    binding: &Binding,
    state: &TransformState<'_>,
    name: &str,
    initial: Option<Expression>,
) -> Expression {
    let options = state.options;
    let runes = state.analysis.runes;
    let mut flags = 0;

    if options.immutable {
        flags |= PROPS_IS_IMMUTABLE;
    }
    if runes {
        flags |= PROPS_IS_RUNES;
    }
    let updated = if options.immutable {
        binding.reassigned || (runes && binding.mutated)
    } else {
        binding.mutated
    };
    if options.accessors || updated {
        flags |= PROPS_IS_UPDATED;
    }
    if binding.kind == BindingKind::BindableProp {
        flags |= PROPS_IS_BINDABLE;
    }

    let initial = initial.map(|initial| {
        if is_simple_expression(&initial) {
            initial
        } else {
            flags |= PROPS_IS_LAZY_INITIAL;
            b::thunk(initial)
        }
    });

    let mut args = vec![b::id_expr("$$props"), b::string(name)];
    if flags != 0 || initial.is_some() {
        args.push(b::number(flags as f64));
    }
    args.extend(initial);
    b::call("$.prop", args)
}
