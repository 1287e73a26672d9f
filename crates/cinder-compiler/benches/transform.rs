use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use cinder_compiler::ast::*;
use cinder_compiler::builders as b;
use cinder_compiler::{compile_script, CompileOptions};

/// `n` blocks of state, derived and props declarations
fn runes_script(n: usize) -> Vec<Statement> {
    let mut statements = vec![b::let_decl(
        b::object_pattern(
            vec![b::prop_pattern("value", b::id("value"), Some(b::call("$bindable", vec![b::number(0.0)])))],
            Some(b::id("rest")),
        ),
        Some(b::call("$props", vec![])),
    )];
    for i in 0..n {
        let count = format!("count{}", i);
        let double = format!("double{}", i);
        statements.push(b::let_decl(b::id(&count), Some(b::call("$state", vec![b::number(i as f64)]))));
        statements.push(b::let_decl(
            b::id(&double),
            Some(b::call(
                "$derived",
                vec![b::binary(BinaryOperator::Multiply, b::id_expr(&count), b::number(2.0))],
            )),
        ));
        statements.push(b::let_decl(
            b::array_pattern(
                vec![
                    Some(b::element(b::id(&format!("x{}", i)), None)),
                    Some(b::element(b::id(&format!("y{}", i)), Some(b::number(0.0)))),
                ],
                None,
            ),
            Some(b::call("$derived", vec![b::call("point", vec![b::id_expr(&double)])])),
        ));
    }
    statements
}

/// `n` written top-level bindings plus one export each
fn legacy_script(n: usize) -> Vec<Statement> {
    let mut statements = Vec::with_capacity(n * 3);
    for i in 0..n {
        let name = format!("value{}", i);
        statements.push(b::let_decl(b::id(&name), Some(b::object(vec![("n", b::number(i as f64))]))));
        statements.push(b::expr_stmt(b::assign(b::member(b::id_expr(&name), "n"), b::number(1.0))));
        statements.push(b::export(b::let_decl(b::id(&format!("prop{}", i)), Some(b::number(0.0)))));
    }
    statements
}

fn bench_runes(c: &mut Criterion) {
    let mut group = c.benchmark_group("runes");
    let options = CompileOptions::default().with_runes(true);

    for n in [10, 100] {
        let script = runes_script(n);
        group.bench_with_input(BenchmarkId::new("compile", n), &script, |bench, script| {
            bench.iter(|| compile_script(black_box(script.clone()), &options).unwrap());
        });
    }

    group.finish();
}

fn bench_legacy(c: &mut Criterion) {
    let mut group = c.benchmark_group("legacy");
    let options = CompileOptions::default().with_runes(false);

    for n in [10, 100] {
        let script = legacy_script(n);
        group.bench_with_input(BenchmarkId::new("compile", n), &script, |bench, script| {
            bench.iter(|| compile_script(black_box(script.clone()), &options).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_runes, bench_legacy);
criterion_main!(benches);
