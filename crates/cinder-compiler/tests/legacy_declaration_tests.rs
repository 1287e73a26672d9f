//! End-to-end tests for lowering legacy (non-runes) declarations
//!
//! Tests cover:
//! - Top-level bindings that are written becoming mutable sources
//! - `export let` props, renamed exports and destructured exports
//! - Plain declarations and hoisting
//! - Structural errors

use cinder_compiler::ast::*;
use cinder_compiler::builders as b;
use cinder_compiler::{compile_script, CompileError, CompileOptions, TransformError};

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

fn legacy() -> CompileOptions {
    CompileOptions::default().with_runes(false)
}

fn compile_with(statements: Vec<Statement>, options: &CompileOptions) -> (String, String) {
    let output = compile_script(statements, options).unwrap();
    (output.body.pretty_print(), output.hoisted.pretty_print())
}

fn body(statements: Vec<Statement>) -> String {
    compile_with(statements, &legacy()).0
}

// =============================================================================
// STATE
// =============================================================================

#[test]
fn test_unwritten_binding_is_plain() {
    let out = body(vec![b::let_decl(b::id("x"), Some(b::number(1.0)))]);
    assert_eq!(out, "let x = 1;");
}

#[test]
fn test_reassigned_in_function_becomes_mutable_source() {
    // let count = 0; function inc() { count += 1; }
    let out = body(vec![
        b::let_decl(b::id("count"), Some(b::number(0.0))),
        b::function_decl(
            "inc",
            vec![],
            b::block(vec![b::expr_stmt(b::assign_op(
                AssignmentOperator::AddAssign,
                b::id_expr("count"),
                b::number(1.0),
            ))]),
        ),
    ]);
    assert_eq!(out, "let count = $.mutable_source(0);\nfunction inc() {\n\tcount += 1;\n}");
}

#[test]
fn test_mutated_object_becomes_mutable_source() {
    let out = body(vec![
        b::let_decl(b::id("user"), Some(b::object(vec![("name", b::string("a"))]))),
        b::expr_stmt(b::assign(b::member(b::id_expr("user"), "name"), b::string("b"))),
    ]);
    assert_eq!(out, "let user = $.mutable_source({ name: 'a' });\nuser.name = 'b';");
}

#[test]
fn test_uninitialized_state_has_no_argument() {
    let out = body(vec![
        b::let_decl(b::id("y"), None),
        b::expr_stmt(b::assign(b::id_expr("y"), b::number(2.0))),
    ]);
    assert_eq!(out, "let y = $.mutable_source();\ny = 2;");
}

#[test]
fn test_update_expression_detected_without_runes_option() {
    let statements = vec![
        b::let_decl(b::id("n"), Some(b::number(0.0))),
        b::expr_stmt(b::unary(UnaryOperator::PostfixIncrement, b::id_expr("n"))),
    ];
    let (out, _) = compile_with(statements, &CompileOptions::default());
    assert_eq!(out, "let n = $.mutable_source(0);\nn++;");
}

#[test]
fn test_destructured_state_wraps_written_leaves_only() {
    // let { a, b } = obj; a = 2;
    let pattern = b::object_pattern(
        vec![b::prop_pattern("a", b::id("a"), None), b::prop_pattern("b", b::id("b"), None)],
        None,
    );
    let out = body(vec![
        b::let_decl(pattern, Some(b::id_expr("obj"))),
        b::expr_stmt(b::assign(b::id_expr("a"), b::number(2.0))),
    ]);
    assert_eq!(out, "let tmp = obj, a = $.mutable_source(tmp.a), b = tmp.b;\na = 2;");
}

#[test]
fn test_const_is_never_state() {
    let out = body(vec![
        b::const_decl(b::id("list"), Some(b::array(vec![]))),
        b::expr_stmt(b::assign(b::member_computed(b::id_expr("list"), b::number(0.0)), b::number(1.0))),
    ]);
    assert_eq!(out, "const list = [];\nlist[0] = 1;");
}

// =============================================================================
// PROPS
// =============================================================================

#[test]
fn test_export_let_without_initializer() {
    let out = body(vec![b::export(b::let_decl(b::id("name"), None))]);
    assert_eq!(out, "let name = $.prop($$props, 'name', 8);");
}

#[test]
fn test_export_list_alias_names_the_prop() {
    let out = body(vec![
        b::let_decl(b::id("a"), Some(b::number(1.0))),
        b::export_list(vec![("a", "b")]),
    ]);
    assert_eq!(out, "let a = $.prop($$props, 'b', 8, 1);");
}

#[test]
fn test_immutable_reassigned_export_flags() {
    let (out, _) = compile_with(
        vec![
            b::export(b::let_decl(b::id("value"), Some(b::number(0.0)))),
            b::expr_stmt(b::assign(b::id_expr("value"), b::number(1.0))),
        ],
        &legacy().with_immutable(true),
    );
    assert_eq!(out, "let value = $.prop($$props, 'value', 13, 0);\nvalue = 1;");
}

#[test]
fn test_export_with_lazy_default() {
    let out = body(vec![b::export(b::let_decl(b::id("items"), Some(b::array(vec![]))))]);
    assert_eq!(out, "let items = $.prop($$props, 'items', 24, () => []);");
}

#[test]
fn test_destructured_export_leaves_are_props() {
    // export let { a, b: [c] } = source;
    let pattern = b::object_pattern(
        vec![
            b::prop_pattern("a", b::id("a"), None),
            b::prop_pattern("b", b::array_pattern(vec![Some(b::element(b::id("c"), None))], None), None),
        ],
        None,
    );
    let out = body(vec![b::export(b::let_decl(pattern, Some(b::id_expr("source"))))]);
    assert_eq!(
        out,
        "let tmp = source, a = $.prop($$props, 'a', 24, () => tmp.a), c = $.prop($$props, 'c', 24, () => tmp.b[0]);"
    );
}

#[test]
fn test_destructured_export_without_initializer_fails() {
    let pattern = b::object_pattern(vec![b::prop_pattern("a", b::id("a"), None)], None);
    let err = compile_script(vec![b::export(b::let_decl(pattern, None))], &legacy()).unwrap_err();
    assert!(matches!(
        err,
        CompileError::Transform(TransformError::MissingInitializer { .. })
    ));
}

// =============================================================================
// HOISTING
// =============================================================================

#[test]
fn test_pure_function_is_hoisted() {
    let (out, hoisted) = compile_with(
        vec![
            b::const_decl(
                b::id("format"),
                Some(b::arrow(vec![b::parameter(b::id("v"))], b::call("String", vec![b::id_expr("v")]))),
            ),
            b::expr_stmt(b::call("format", vec![b::number(1.0)])),
        ],
        &legacy(),
    );
    assert_eq!(out, "format(1);");
    assert_eq!(hoisted, "const format = (v) => String(v);");
}

#[test]
fn test_nested_declarations_are_untouched() {
    // function f() { let local = 0; local = 1; }
    let out = body(vec![b::function_decl(
        "f",
        vec![],
        b::block(vec![
            b::let_decl(b::id("local"), Some(b::number(0.0))),
            b::expr_stmt(b::assign(b::id_expr("local"), b::number(1.0))),
        ]),
    )]);
    assert_eq!(out, "function f() {\n\tlet local = 0;\n\tlocal = 1;\n}");
}
