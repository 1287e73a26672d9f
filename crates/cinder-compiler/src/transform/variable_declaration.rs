//! Lowering of variable declarations
//!
//! Each declarator is rewritten on its own, in source order, into zero or
//! more output declarators. Runes declarations dispatch on the rune that
//! initializes them; legacy declarations dispatch on the kinds analysis
//! assigned to their bindings.

use tracing::{debug, trace};

use super::paths::extract_paths;
use super::utils::{get_prop_source, is_hoistable_function, is_prop_source, is_state_source, should_proxy_or_freeze};
use super::ClientTransform;
use crate::ast::*;
use crate::builders as b;
use crate::error::{TransformError, TransformResult};
use crate::scope::{get_rune, BindingKind, Rune};

/// Lower one declaration.
///
/// Returns the rebuilt declaration, or an empty statement when every
/// declarator was hoisted away.
pub fn variable_declaration(decl: VariableDecl, t: &mut ClientTransform<'_>) -> TransformResult<Statement> {
    let VariableDecl {
        kind,
        declarations: declarators,
        span,
    } = decl;

    let mut declarations = Vec::with_capacity(declarators.len());
    for declarator in declarators {
        if t.state.analysis.runes {
            lower_runes_declarator(declarator, t, &mut declarations)?;
        } else {
            lower_legacy_declarator(declarator, t, &mut declarations)?;
        }
    }

    if declarations.is_empty() {
        return Ok(Statement::Empty(span));
    }
    for declarator in &declarations {
        trace!(kind = kind.as_str(), declarator = %declarator.pretty_print(), "emit");
    }

    Ok(Statement::VariableDecl(VariableDecl {
        kind,
        declarations,
        span,
    }))
}

fn lower_runes_declarator(
    declarator: VariableDeclarator,
    t: &mut ClientTransform<'_>,
    out: &mut Vec<VariableDeclarator>,
) -> TransformResult<()> {
    let rune = get_rune(declarator.initializer.as_ref(), &*t.state.scopes, t.state.scope);
    debug!(dialect = "runes", rune = rune.map(Rune::name), "lowering declarator");

    let rune = match rune {
        Some(rune) if rune.is_lowered() => rune,
        _ => return lower_plain(declarator, t, out),
    };

    if rune == Rune::Props {
        return lower_props(declarator, t, out);
    }

    let VariableDeclarator {
        pattern,
        initializer,
        span,
    } = declarator;

    let argument = match initializer {
        Some(Expression::Call(call)) => call.arguments.into_iter().next(),
        _ => None,
    };
    let value = match argument {
        Some(argument) => t.fold_expression(argument)?,
        None => b::undefined(),
    };

    if matches!(rune, Rune::State | Rune::StateFrozen) {
        lower_state(rune, pattern, value, t, out)
    } else {
        lower_derived(rune, pattern, value, span, t, out)
    }
}

/// No reactive role: hoist a capture-free function, otherwise rewrite the
/// declarator's children in place
fn lower_plain(
    declarator: VariableDeclarator,
    t: &mut ClientTransform<'_>,
    out: &mut Vec<VariableDeclarator>,
) -> TransformResult<()> {
    match declarator.initializer {
        Some(init) if is_hoistable_function(&init) => {
            let function = t.fold_expression(init)?;
            trace!(pattern = %declarator.pattern.pretty_print(), "hoisting function");
            t.state.hoisted.push(b::const_decl(declarator.pattern, Some(function)));
        }
        initializer => {
            let declarator = VariableDeclarator {
                initializer,
                ..declarator
            };
            out.push(t.fold_variable_declarator(declarator)?);
        }
    }
    Ok(())
}

/// `$.rest_props($$props, [seen...][, name])`
fn rest_props(seen: &[String], name: &str, dev: bool) -> Expression {
    let mut args = vec![
        b::id_expr("$$props"),
        b::array(seen.iter().map(|name| b::string(name)).collect()),
    ];
    if dev {
        args.push(b::string(name));
    }
    b::call("$.rest_props", args)
}

fn lower_props(
    declarator: VariableDeclarator,
    t: &mut ClientTransform<'_>,
    out: &mut Vec<VariableDeclarator>,
) -> TransformResult<()> {
    let dev = t.state.options.dev;
    let mut seen: Vec<String> = ["$$slots", "$$events", "$$legacy"].map(String::from).to_vec();
    if t.state.options.custom_element {
        seen.push("$$host".to_string());
    }

    let object = match declarator.pattern {
        Pattern::Identifier(id) => {
            let init = rest_props(&seen, &id.name, dev);
            out.push(b::declarator(id, Some(init)));
            return Ok(());
        }
        Pattern::Object(object) => object,
        pattern => {
            return Err(TransformError::UnexpectedPattern {
                expected: "identifier or object pattern",
                found: pattern.kind_name(),
                span: *pattern.span(),
            })
        }
    };

    for property in object.properties {
        let Some(key) = property.key.static_name() else {
            return Err(TransformError::UnexpectedPattern {
                expected: "static property key",
                found: "computed key",
                span: property.span,
            });
        };
        seen.push(key.clone());

        let id = match property.value {
            Pattern::Identifier(id) => id,
            other => {
                return Err(TransformError::UnexpectedPattern {
                    expected: "identifier",
                    found: other.kind_name(),
                    span: *other.span(),
                })
            }
        };

        let binding = t.state.binding(&id)?;
        let mut initial = binding.initial.clone().map(|initial| t.fold_expression(initial)).transpose()?;
        if binding.kind == BindingKind::BindableProp {
            initial = initial.map(|initial| {
                if should_proxy_or_freeze(&initial, Some((&*t.state.scopes, t.state.scope))) {
                    b::call("$.proxy", vec![initial])
                } else {
                    initial
                }
            });
        }

        if is_prop_source(&binding) {
            let source = get_prop_source(&binding, &t.state, &key, initial);
            out.push(b::declarator(id, Some(source)));
        }
    }

    if let Some(rest) = object.rest {
        let init = rest_props(&seen, &rest.name, dev);
        out.push(b::declarator(rest, Some(init)));
    }
    Ok(())
}

/// `$.proxy(value)` for `$state`, `$.freeze(value)` for `$state.frozen`,
/// when the value can hold nested mutable data
fn proxy_or_freeze(rune: Rune, value: Expression, t: &ClientTransform<'_>) -> Expression {
    if !should_proxy_or_freeze(&value, Some((&*t.state.scopes, t.state.scope))) {
        return value;
    }
    let wrapper = if rune == Rune::State { "$.proxy" } else { "$.freeze" };
    b::call(wrapper, vec![value])
}

/// Wrap a state value: proxy or freeze first, then the source cell
fn create_state_value(rune: Rune, id: &Identifier, value: Expression, t: &ClientTransform<'_>) -> TransformResult<Expression> {
    let binding = t.state.binding(id)?;
    let mut value = proxy_or_freeze(rune, value, t);
    if is_state_source(&binding, &t.state) {
        value = b::call("$.source", vec![value]);
    }
    Ok(value)
}

fn lower_state(
    rune: Rune,
    pattern: Pattern,
    value: Expression,
    t: &mut ClientTransform<'_>,
    out: &mut Vec<VariableDeclarator>,
) -> TransformResult<()> {
    if let Pattern::Identifier(id) = pattern {
        let value = create_state_value(rune, &id, value, t)?;
        out.push(b::declarator(id, Some(value)));
        return Ok(());
    }

    // The whole value is wrapped once; each leaf then gets its own cell
    let tmp = t.state.generate("tmp");
    let value = proxy_or_freeze(rune, value, t);
    out.push(b::declarator(tmp.clone(), Some(value)));

    for path in extract_paths(&pattern) {
        let binding = t.state.binding(&path.node)?;
        let value = path.accessor.apply(Expression::Identifier(tmp.clone()));
        let value = if is_state_source(&binding, &t.state) {
            b::call("$.source", vec![value])
        } else {
            value
        };
        out.push(b::declarator(path.node, Some(value)));
    }
    Ok(())
}

fn lower_derived(
    rune: Rune,
    pattern: Pattern,
    value: Expression,
    span: Span,
    t: &mut ClientTransform<'_>,
    out: &mut Vec<VariableDeclarator>,
) -> TransformResult<()> {
    let thunk = if rune == Rune::DerivedBy { value } else { b::thunk(value) };

    if let Pattern::Identifier(id) = pattern {
        out.push(b::declarator(id, Some(b::call("$.derived", vec![thunk]))));
        return Ok(());
    }

    let leaves: Vec<Identifier> = pattern.identifiers().into_iter().cloned().collect();
    for leaf in &leaves {
        t.state.binding(leaf)?;
    }

    let object_id = t.state.generate("derived_object");
    let values_id = t.state.generate("derived_values");

    out.push(b::declarator(object_id.clone(), Some(b::call("$.derived", vec![thunk]))));

    // let <pattern> = $.get(derived_object); return [leaves];
    let body = b::block(vec![
        Statement::VariableDecl(VariableDecl {
            kind: VariableKind::Let,
            declarations: vec![b::declarator(
                pattern,
                Some(b::call("$.get", vec![Expression::Identifier(object_id)])),
            )],
            span,
        }),
        b::return_stmt(Some(b::array(leaves.iter().cloned().map(Expression::Identifier).collect()))),
    ]);
    out.push(b::declarator(
        values_id.clone(),
        Some(b::call("$.derived", vec![b::arrow_block(vec![], body)])),
    ));

    for (i, leaf) in leaves.into_iter().enumerate() {
        let read = b::member_computed(
            b::call("$.get", vec![Expression::Identifier(values_id.clone())]),
            b::number(i as f64),
        );
        out.push(b::declarator(leaf, Some(b::call("$.derived", vec![b::thunk(read)]))));
    }
    Ok(())
}

fn lower_legacy_declarator(
    declarator: VariableDeclarator,
    t: &mut ClientTransform<'_>,
    out: &mut Vec<VariableDeclarator>,
) -> TransformResult<()> {
    let bindings: Vec<_> = t
        .state
        .scopes
        .get_bindings(t.state.scope, &declarator)?
        .into_iter()
        .cloned()
        .collect();
    let has_state = bindings.iter().any(|binding| binding.kind == BindingKind::State);
    let has_props = bindings.iter().any(|binding| binding.kind == BindingKind::BindableProp);
    debug!(dialect = "legacy", has_state, has_props, "lowering declarator");

    if !has_state && !has_props {
        return lower_plain(declarator, t, out);
    }

    let VariableDeclarator {
        pattern,
        initializer,
        span,
    } = declarator;
    let value = initializer.map(|init| t.fold_expression(init)).transpose()?;

    if has_props {
        return lower_legacy_props(pattern, value, span, t, out);
    }
    lower_legacy_state(pattern, value, span, t, out)
}

/// `export let` bindings read through prop sources; the leaves of a
/// destructured export are the prop names
fn lower_legacy_props(
    pattern: Pattern,
    value: Option<Expression>,
    span: Span,
    t: &mut ClientTransform<'_>,
    out: &mut Vec<VariableDeclarator>,
) -> TransformResult<()> {
    if let Pattern::Identifier(id) = pattern {
        let binding = t.state.binding(&id)?;
        let name = binding.prop_alias.clone().unwrap_or_else(|| id.name.clone());
        let source = get_prop_source(&binding, &t.state, &name, value);
        out.push(b::declarator(id, Some(source)));
        return Ok(());
    }

    let value = value.ok_or(TransformError::MissingInitializer {
        rune: "Destructured export",
        span,
    })?;
    let tmp = t.state.generate("tmp");
    out.push(b::declarator(tmp.clone(), Some(value)));

    for path in extract_paths(&pattern) {
        let binding = t.state.binding(&path.node)?;
        let value = path.accessor.apply(Expression::Identifier(tmp.clone()));
        let value = if binding.kind == BindingKind::BindableProp {
            let name = binding.prop_alias.clone().unwrap_or_else(|| path.node.name.clone());
            get_prop_source(&binding, &t.state, &name, Some(value))
        } else {
            value
        };
        out.push(b::declarator(path.node, Some(value)));
    }
    Ok(())
}

/// Written top-level bindings become mutable sources
fn lower_legacy_state(
    pattern: Pattern,
    value: Option<Expression>,
    span: Span,
    t: &mut ClientTransform<'_>,
    out: &mut Vec<VariableDeclarator>,
) -> TransformResult<()> {
    if let Pattern::Identifier(id) = pattern {
        out.push(b::declarator(id, Some(b::call("$.mutable_source", value.into_iter().collect()))));
        return Ok(());
    }

    let value = value.ok_or(TransformError::MissingInitializer {
        rune: "Destructured declaration",
        span,
    })?;
    let tmp = t.state.generate("tmp");
    out.push(b::declarator(tmp.clone(), Some(value)));

    for path in extract_paths(&pattern) {
        let kind = t.state.binding(&path.node)?.kind;
        let value = path.accessor.apply(Expression::Identifier(tmp.clone()));
        let value = if kind == BindingKind::State {
            b::call("$.mutable_source", vec![value])
        } else {
            value
        };
        out.push(b::declarator(path.node, Some(value)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::CompileOptions;
    use crate::scope::analyze_script;
    use crate::transform::transform_script;

    fn lower(mut statements: Vec<Statement>, options: CompileOptions) -> (String, String) {
        let (mut scopes, analysis) = analyze_script(&mut statements, &options).unwrap();
        let out = transform_script(statements, &mut scopes, &analysis, &options).unwrap();
        (out.body.pretty_print(), out.hoisted.pretty_print())
    }

    fn runes() -> CompileOptions {
        CompileOptions::default().with_runes(true)
    }

    fn legacy() -> CompileOptions {
        CompileOptions::default().with_runes(false)
    }

    #[test]
    fn test_state_identifier() {
        let (body, _) = lower(vec![b::let_decl(b::id("count"), Some(b::call("$state", vec![b::number(0.0)])))], runes());
        assert_eq!(body, "let count = $.source(0);");
    }

    #[test]
    fn test_state_without_argument() {
        let (body, _) = lower(vec![b::let_decl(b::id("value"), Some(b::call("$state", vec![])))], runes());
        assert_eq!(body, "let value = $.source(undefined);");
    }

    #[test]
    fn test_state_object_is_proxied_before_source() {
        let (body, _) = lower(
            vec![b::let_decl(
                b::id("user"),
                Some(b::call("$state", vec![b::object(vec![("name", b::string("a"))])])),
            )],
            runes(),
        );
        assert_eq!(body, "let user = $.source($.proxy({ name: 'a' }));");
    }

    #[test]
    fn test_frozen_state_is_frozen() {
        let (body, _) = lower(
            vec![b::let_decl(b::id("list"), Some(b::call("$state.frozen", vec![b::array(vec![])])))],
            runes(),
        );
        assert_eq!(body, "let list = $.source($.freeze([]));");
    }

    #[test]
    fn test_immutable_state_never_reassigned_is_bare() {
        let (body, _) = lower(
            vec![b::let_decl(b::id("count"), Some(b::call("$state", vec![b::number(0.0)])))],
            runes().with_immutable(true),
        );
        assert_eq!(body, "let count = 0;");
    }

    #[test]
    fn test_state_destructure_uses_one_temporary() {
        let pattern = b::object_pattern(
            vec![b::prop_pattern("a", b::id("a"), None), b::prop_pattern("b", b::id("b"), None)],
            None,
        );
        let (body, _) = lower(
            vec![b::let_decl(
                pattern,
                Some(b::call("$state", vec![b::object(vec![("a", b::number(1.0)), ("b", b::number(2.0))])])),
            )],
            runes(),
        );
        assert_eq!(
            body,
            "let tmp = $.proxy({ a: 1, b: 2 }), a = $.source(tmp.a), b = $.source(tmp.b);"
        );
    }

    #[test]
    fn test_derived_identifier() {
        let statements = vec![
            b::let_decl(b::id("count"), Some(b::call("$state", vec![b::number(0.0)]))),
            b::let_decl(
                b::id("double"),
                Some(b::call(
                    "$derived",
                    vec![b::binary(BinaryOperator::Multiply, b::id_expr("count"), b::number(2.0))],
                )),
            ),
        ];
        let (body, _) = lower(statements, runes());
        assert_eq!(body, "let count = $.source(0);\nlet double = $.derived(() => count * 2);");
    }

    #[test]
    fn test_derived_by_passes_function_through() {
        let (body, _) = lower(
            vec![b::let_decl(
                b::id("total"),
                Some(b::call("$derived.by", vec![b::arrow(vec![], b::number(1.0))])),
            )],
            runes(),
        );
        assert_eq!(body, "let total = $.derived(() => 1);");
    }

    #[test]
    fn test_derived_destructure_shares_work() {
        let pattern = b::array_pattern(
            vec![Some(b::element(b::id("x"), None)), Some(b::element(b::id("y"), None))],
            None,
        );
        let (body, _) = lower(
            vec![b::let_decl(pattern, Some(b::call("$derived", vec![b::call("point", vec![b::number(1.0)])])))],
            runes(),
        );
        assert_eq!(
            body,
            "let derived_object = $.derived(() => point(1)), \
             derived_values = $.derived(() => {\n\tlet [x, y] = $.get(derived_object);\n\treturn [x, y];\n}), \
             x = $.derived(() => $.get(derived_values)[0]), \
             y = $.derived(() => $.get(derived_values)[1]);"
        );
    }

    #[test]
    fn test_props_identifier() {
        let (body, _) = lower(vec![b::let_decl(b::id("props"), Some(b::call("$props", vec![])))], runes());
        assert_eq!(body, "let props = $.rest_props($$props, ['$$slots', '$$events', '$$legacy']);");
    }

    #[test]
    fn test_props_destructure() {
        // let { value = $bindable(0), label = 'x', ...rest } = $props();
        let pattern = b::object_pattern(
            vec![
                b::prop_pattern("value", b::id("value"), Some(b::call("$bindable", vec![b::number(0.0)]))),
                b::prop_pattern("label", b::id("label"), Some(b::string("x"))),
            ],
            Some(b::id("rest")),
        );
        let (body, _) = lower(vec![b::let_decl(pattern, Some(b::call("$props", vec![])))], runes());
        assert_eq!(
            body,
            "let value = $.prop($$props, 'value', 10, 0), \
             rest = $.rest_props($$props, ['$$slots', '$$events', '$$legacy', 'value', 'label']);"
        );
    }

    #[test]
    fn test_props_array_pattern_is_rejected() {
        let mut statements = vec![b::let_decl(
            b::array_pattern(vec![Some(b::element(b::id("a"), None))], None),
            Some(b::call("$props", vec![])),
        )];
        let options = runes();
        let (mut scopes, analysis) = analyze_script(&mut statements, &options).unwrap();
        let err = transform_script(statements, &mut scopes, &analysis, &options).unwrap_err();
        assert!(matches!(
            err,
            TransformError::UnexpectedPattern {
                found: "array pattern",
                ..
            }
        ));
    }

    #[test]
    fn test_inert_rune_is_left_alone() {
        let (body, _) = lower(
            vec![b::const_decl(b::id("snap"), Some(b::call("$state.snapshot", vec![b::id_expr("snap_src")])))],
            runes(),
        );
        assert_eq!(body, "const snap = $state.snapshot(snap_src);");
    }

    #[test]
    fn test_hoistable_function_is_moved() {
        let (body, hoisted) = lower(
            vec![b::const_decl(
                b::id("greet"),
                Some(b::arrow(vec![b::parameter(b::id("name"))], b::id_expr("name"))),
            )],
            runes(),
        );
        assert_eq!(body, "");
        assert_eq!(hoisted, "const greet = (name) => name;");
    }

    #[test]
    fn test_legacy_plain_declaration() {
        let (body, _) = lower(vec![b::let_decl(b::id("x"), Some(b::number(1.0)))], legacy());
        assert_eq!(body, "let x = 1;");
    }

    #[test]
    fn test_legacy_written_binding_becomes_mutable_source() {
        let statements = vec![
            b::let_decl(b::id("count"), Some(b::number(0.0))),
            b::expr_stmt(b::assign(b::id_expr("count"), b::number(1.0))),
        ];
        let (body, _) = lower(statements, legacy());
        assert_eq!(body, "let count = $.mutable_source(0);\ncount = 1;");
    }

    #[test]
    fn test_legacy_export_becomes_prop() {
        let (body, _) = lower(vec![b::export(b::let_decl(b::id("name"), Some(b::string("world"))))], legacy());
        assert_eq!(body, "let name = $.prop($$props, 'name', 8, 'world');");
    }
}
