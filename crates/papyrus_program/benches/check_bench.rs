//! Benchmark harness for the type checker.
//!
//! Uses criterion for reliable benchmarking.
//! Run with: cargo bench -p papyrus_program

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use papyrus_ast::{AssignmentOperator, BinaryOperator, LanguageFlags, SyntaxTree, TreeBuilder};
use papyrus_options::ProjectConfig;
use papyrus_program::Program;

/// A base script plus `num_scripts` scripts extending it, each with
/// `num_functions` functions doing arithmetic, member access and calls.
fn generate_tree(num_scripts: usize, num_functions: usize) -> SyntaxTree {
    let b = TreeBuilder::new();

    let health = b.property("float", "Health", LanguageFlags::AUTO);
    let amount = b.parameter("float", "afAmount");
    let damage_body = b.compound_assign(
        b.ident("Health"),
        AssignmentOperator::Subtract,
        b.ident("afAmount"),
    );
    let damage = b.function(None, "Damage", vec![amount], LanguageFlags::NONE, vec![damage_body]);
    b.script("Base", None, LanguageFlags::NONE, vec![], vec![health, damage]);

    for i in 0..num_scripts {
        let mut definitions = Vec::with_capacity(num_functions + 1);
        definitions.push(b.property("int", "Counter", LanguageFlags::AUTO));

        for j in 0..num_functions {
            let other = b.parameter("Base", "akOther");
            let total = b.declare(
                "float",
                "total",
                Some(b.binary(b.ident("Counter"), BinaryOperator::Multiply, b.float(1.5))),
            );
            let values = b.declare("int[]", "values", Some(b.new_array("int", b.int(8))));
            let add = b.expression_statement(b.member(
                b.ident("values"),
                b.call("Add", vec![b.ident("Counter")]),
            ));
            let hit = b.expression_statement(b.member(
                b.ident("akOther"),
                b.call("Damage", vec![b.ident("total")]),
            ));
            let bump = b.compound_assign(b.ident("Counter"), AssignmentOperator::Add, b.int(1));
            definitions.push(b.function(
                Some("float"),
                &format!("Step{}", j),
                vec![other],
                LanguageFlags::NONE,
                vec![total, values, add, hit, bump, b.return_statement(Some(b.ident("total")))],
            ));
        }

        b.script(
            &format!("Script{}", i),
            Some("Base"),
            LanguageFlags::NONE,
            vec![],
            definitions,
        );
    }

    b.finish()
}

// ============================================================================
// Binding
// ============================================================================

fn bench_bind(c: &mut Criterion) {
    let mut group = c.benchmark_group("bind");

    for (scripts, functions) in [(1, 10), (20, 20)] {
        let tree = generate_tree(scripts, functions);
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}x{}", scripts, functions)),
            &tree,
            |b, tree| {
                b.iter(|| black_box(Program::new(ProjectConfig::default(), tree.clone())));
            },
        );
    }

    group.finish();
}

// ============================================================================
// Checking
// ============================================================================

fn bench_check(c: &mut Criterion) {
    let mut group = c.benchmark_group("check");

    let small = Program::new(ProjectConfig::default(), generate_tree(1, 10));
    group.bench_function("one_script", |b| {
        b.iter(|| black_box(small.check_script("Script0")));
    });

    for (scripts, functions) in [(20, 20), (100, 10)] {
        let program = Program::new(ProjectConfig::default(), generate_tree(scripts, functions));
        group.bench_with_input(
            BenchmarkId::new("all", format!("{}x{}", scripts, functions)),
            &program,
            |b, program| {
                b.iter(|| black_box(program.check_all()));
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_bind, bench_check);
criterion_main!(benches);
