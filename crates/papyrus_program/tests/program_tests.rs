//! Program integration tests.
//!
//! Build a multi-script tree, bind it into a program and check one or all
//! scripts.

use papyrus_ast::{LanguageFlags, SyntaxTree, TreeBuilder};
use papyrus_checker::ScriptResolver;
use papyrus_options::{parse_project_config, ProjectConfig};
use papyrus_program::Program;

fn program(build: impl FnOnce(&TreeBuilder)) -> Program {
    let builder = TreeBuilder::new();
    build(&builder);
    Program::new(ProjectConfig::default(), builder.finish())
}

/// Diagnostics of a full check as `file: message` lines.
fn check_all(program: &Program) -> Vec<String> {
    program
        .check_all()
        .diagnostics()
        .iter()
        .map(|d| format!("{}: {}", d.file.as_deref().unwrap_or("?"), d.message_text))
        .collect()
}

/// `Actor` with a health property, `Companion` extending it.
fn actor_scripts(b: &TreeBuilder) {
    let health = b.property("float", "Health", LanguageFlags::AUTO);
    let damage = {
        let amount = b.parameter("float", "afAmount");
        let body = b.compound_assign(
            b.ident("Health"),
            papyrus_ast::AssignmentOperator::Subtract,
            b.ident("afAmount"),
        );
        b.function(None, "Damage", vec![amount], LanguageFlags::NONE, vec![body])
    };
    b.script("Actor", None, LanguageFlags::NONE, vec![], vec![health, damage]);

    let heal = {
        let body = b.assign(b.ident("Health"), b.float(100.0));
        b.function(None, "Heal", vec![], LanguageFlags::NONE, vec![body])
    };
    b.script("Quests:Companion", Some("Actor"), LanguageFlags::NONE, vec![], vec![heal]);
}

// ============================================================================
// Script index
// ============================================================================

#[test]
fn test_scripts_are_indexed() {
    let program = program(actor_scripts);

    let names: Vec<&str> = program.scripts().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Actor", "Quests:Companion"]);

    let companion = program.script("quests:companion").expect("indexed");
    assert_eq!(companion.file_name, "Quests/Companion.psc");
    assert_eq!(program.script_symbol("ACTOR"), program.script("Actor").map(|s| s.symbol));
    assert_eq!(program.script_symbol("Missing"), None);
    assert_eq!(program.script_names(), vec!["Actor", "Quests:Companion"]);
}

#[test]
fn test_duplicate_script_keeps_first() {
    let program = program(|b| {
        let first = b.function(None, "First", vec![], LanguageFlags::NONE, vec![]);
        b.script("Shared", None, LanguageFlags::NONE, vec![], vec![first]);
        b.script("shared", None, LanguageFlags::NONE, vec![], vec![]);
    });

    assert_eq!(program.scripts().count(), 1);
    let entry = program.script("SHARED").expect("indexed");
    assert_eq!(entry.root, program.tree().scripts()[0]);
}

// ============================================================================
// Checking
// ============================================================================

#[test]
fn test_clean_program() {
    let program = program(actor_scripts);
    assert!(check_all(&program).is_empty());
    assert!(program.bind_diagnostics().is_empty());
}

#[test]
fn test_check_unknown_script() {
    let program = program(actor_scripts);
    assert!(program.check_script("Nobody").is_none());
}

#[test]
fn test_check_one_script() {
    let program = program(|b| {
        actor_scripts(b);
        let bad = b.declare("Actor", "akActor", Some(b.float(1.0)));
        let f = b.function(None, "F", vec![], LanguageFlags::NONE, vec![bad]);
        b.script("Broken", None, LanguageFlags::NONE, vec![], vec![f]);
    });

    let clean = program.check_script("Actor").expect("known script");
    assert!(clean.is_empty());

    let diagnostics = program.check_script("broken").expect("known script");
    assert_eq!(
        diagnostics.messages(),
        vec!["Type 'float' is not assignable to type 'Actor'."]
    );
    assert_eq!(diagnostics.diagnostics()[0].file.as_deref(), Some("Broken.psc"));
}

#[test]
fn test_check_all_merges_and_sorts() {
    let program = program(|b| {
        let first = b.declare("int", "x", Some(b.int(1)));
        let second = b.declare("int", "x", Some(b.int(2)));
        let f = b.function(None, "F", vec![], LanguageFlags::NONE, vec![first, second]);
        b.script("Beta", None, LanguageFlags::NONE, vec![], vec![f]);

        let missing = b.declare("int", "y", Some(b.ident("Missing")));
        let g = b.function(None, "G", vec![], LanguageFlags::NONE, vec![missing]);
        b.script("Alpha", None, LanguageFlags::NONE, vec![], vec![g]);
    });

    assert_eq!(
        check_all(&program),
        vec![
            "Alpha.psc: Cannot find name 'Missing'",
            "Beta.psc: Cannot redeclare x.",
        ]
    );
}

#[test]
fn test_check_all_is_deterministic() {
    let build = |b: &TreeBuilder| {
        for i in 0..8 {
            let local = b.declare("float", "f", Some(b.ident(&format!("Missing{}", i))));
            let f = b.function(None, "F", vec![], LanguageFlags::NONE, vec![local]);
            b.script(&format!("Script{}", i), None, LanguageFlags::NONE, vec![], vec![f]);
        }
    };
    let program = program(build);

    let first = check_all(&program);
    assert_eq!(first.len(), 8);
    assert_eq!(first[0], "Script0.psc: Cannot find name 'Missing0'");
    for _ in 0..4 {
        assert_eq!(check_all(&program), first);
    }
}

#[test]
fn test_cross_script_resolution() {
    let program = program(|b| {
        actor_scripts(b);
        let companion = b.parameter("Quests:Companion", "akCompanion");
        let as_actor = b.declare("Actor", "akActor", Some(b.ident("akCompanion")));
        let heal = b.expression_statement(b.member(b.ident("akCompanion"), b.call("Heal", vec![])));
        let damage = b.expression_statement(b.member(
            b.ident("akActor"),
            b.call("Damage", vec![b.float(5.0)]),
        ));
        let f = b.function(
            None,
            "F",
            vec![companion],
            LanguageFlags::NONE,
            vec![as_actor, heal, damage],
        );
        b.script("Director", None, LanguageFlags::NONE, vec![], vec![f]);
    });

    assert!(check_all(&program).is_empty());
}

// ============================================================================
// Queries
// ============================================================================

#[test]
fn test_type_checker_session() {
    let program = program(actor_scripts);
    let mut checker = program.type_checker();

    let companion = checker.resolve_type("quests:companion", &[]).expect("script type");
    let chain: Vec<String> = checker
        .script_hierarchy(companion)
        .into_iter()
        .map(|t| checker.type_name(t).to_string())
        .collect();
    assert_eq!(chain, vec!["Quests:Companion", "Actor"]);
}

#[test]
fn test_program_owns_config() {
    let config = parse_project_config(r#"{ "output": "Out", "imports": ["Base"] }"#).unwrap();
    let program = Program::new(config, SyntaxTree::new());
    assert_eq!(program.config.output.as_deref(), Some("Out"));
    assert_eq!(program.config.imports, vec!["Base"]);
    assert!(program.check_all().is_empty());
}
