//! Binder integration tests.
//!
//! Builds script trees and verifies the symbols, member lists and local
//! tables the binder produces.

use papyrus_ast::{LanguageFlags, LiteralValue, NodeId, SyntaxTree, TreeBuilder};
use papyrus_binder::{Binder, SymbolKind, SymbolTable};

/// Helper: bind a tree, returning the table and the diagnostic messages.
fn bind(tree: &SyntaxTree) -> (SymbolTable, Vec<String>) {
    let mut binder = Binder::new();
    binder.bind_tree(tree);
    let diagnostics = binder.take_diagnostics().messages();
    (binder.into_symbol_table(), diagnostics)
}

fn member_names(table: &SymbolTable, script: &str) -> Vec<String> {
    let id = table.script(script).expect("script is bound");
    table
        .get(id)
        .expect("symbol exists")
        .members
        .iter()
        .filter_map(|m| table.get(*m))
        .map(|m| m.name.clone())
        .collect()
}

// ============================================================================
// Scripts
// ============================================================================

#[test]
fn test_bind_script_members_in_order() {
    let b = TreeBuilder::new();
    b.script(
        "Quest:Main",
        None,
        LanguageFlags::NONE,
        vec![],
        vec![
            b.variable("int", "count", LanguageFlags::NONE, None),
            b.group(
                "Settings",
                LanguageFlags::NONE,
                vec![b.property("float", "Speed", LanguageFlags::AUTO)],
            ),
            b.state(
                "Running",
                false,
                vec![b.function(None, "Tick", vec![], LanguageFlags::NONE, vec![])],
            ),
            b.property("int", "Stage", LanguageFlags::AUTO),
        ],
    );
    let (table, diagnostics) = bind(&b.finish());
    assert!(diagnostics.is_empty(), "{:?}", diagnostics);
    assert_eq!(
        member_names(&table, "quest:main"),
        vec!["count", "Settings", "Running", "Stage", "Speed", "Tick"]
    );
}

#[test]
fn test_default_extends_script_object() {
    let b = TreeBuilder::new();
    b.script("ScriptObject", None, LanguageFlags::NATIVE, vec![], vec![]);
    b.script("Form", None, LanguageFlags::NATIVE, vec![], vec![]);
    b.script("Actor", Some("Form"), LanguageFlags::NONE, vec![], vec![]);
    let (table, _) = bind(&b.finish());

    let extended = |name: &str| {
        table
            .script(name)
            .and_then(|id| table.get(id))
            .and_then(|s| s.extended_script.clone())
    };
    assert_eq!(extended("ScriptObject"), None);
    assert_eq!(extended("Form").as_deref(), Some("ScriptObject"));
    assert_eq!(extended("Actor").as_deref(), Some("Form"));

    let form = table.script("form").and_then(|id| table.get(id)).unwrap();
    assert!(form.is_native());
}

#[test]
fn test_imports_record_script_name() {
    let b = TreeBuilder::new();
    let script = b.script(
        "Main",
        None,
        LanguageFlags::NONE,
        vec![b.import("Utility")],
        vec![],
    );
    let tree = b.finish();
    let (table, _) = bind(&tree);
    let symbol = table.symbol_of(script).and_then(|id| table.get(id)).unwrap();
    assert_eq!(symbol.imports.len(), 1);
    let import = table.get(symbol.imports[0]).unwrap();
    assert_eq!(import.kind, SymbolKind::Import);
    assert_eq!(import.imported_script.as_deref(), Some("Utility"));
}

// ============================================================================
// Members
// ============================================================================

#[test]
fn test_property_flags() {
    let b = TreeBuilder::new();
    let getter = b.function(Some("int"), "Get", vec![], LanguageFlags::NONE, vec![]);
    let read_only = b.full_property("int", "Computed", LanguageFlags::NONE, vec![getter]);
    let auto = b.property("int", "Plain", LanguageFlags::AUTO);
    let auto_read_only = b.property("int", "Fixed", LanguageFlags::AUTO_READ_ONLY);
    b.script(
        "Main",
        None,
        LanguageFlags::NONE,
        vec![],
        vec![read_only, auto, auto_read_only],
    );
    let tree = b.finish();
    let (table, _) = bind(&tree);
    let symbol = |node: NodeId| table.symbol_of(node).and_then(|id| table.get(id)).unwrap();

    let computed = symbol(read_only);
    assert!(computed.is_auto() && computed.is_auto_read_only() && computed.is_const());
    assert!(computed.getter.is_some() && computed.setter.is_none());

    let plain = symbol(auto);
    assert!(plain.is_auto() && !plain.is_auto_read_only() && !plain.is_const());

    let fixed = symbol(auto_read_only);
    assert!(fixed.is_auto() && fixed.is_auto_read_only());
}

#[test]
fn test_function_parameters() {
    let b = TreeBuilder::new();
    let function = b.function(
        Some("int"),
        "Find",
        vec![
            b.parameter("Form", "akTarget"),
            b.optional_parameter("int", "aiStart", LiteralValue::Int(0)),
        ],
        LanguageFlags::GLOBAL | LanguageFlags::NATIVE,
        vec![],
    );
    b.script("Main", None, LanguageFlags::NONE, vec![], vec![function]);
    let tree = b.finish();
    let (table, _) = bind(&tree);

    let symbol = table.symbol_of(function).and_then(|id| table.get(id)).unwrap();
    assert!(symbol.is_global() && symbol.is_native());
    assert_eq!(symbol.value_type.as_ref().map(|t| t.name.as_str()), Some("int"));
    assert_eq!(symbol.fully_qualified_name, "Main:Find");

    let params: Vec<_> = symbol.parameters.iter().filter_map(|p| table.get(*p)).collect();
    assert_eq!(params.len(), 2);
    assert!(!params[0].is_optional());
    assert!(params[1].is_optional());
    assert_eq!(params[1].default_value, Some(LiteralValue::Int(0)));

    let locals = table.locals(function).unwrap();
    assert!(locals.contains_key("aktarget"));
    assert!(locals.contains_key("aistart"));
}

#[test]
fn test_declare_statements_are_bound_in_nested_blocks() {
    let b = TreeBuilder::new();
    let inner = b.declare("float", "inner", None);
    let body = b.if_statement(vec![(Some(b.bool(true)), vec![inner])]);
    let function = b.function(
        None,
        "Run",
        vec![],
        LanguageFlags::NONE,
        vec![b.declare("int", "outer", Some(b.int(1))), body],
    );
    b.script("Main", None, LanguageFlags::NONE, vec![], vec![function]);
    let tree = b.finish();
    let (table, _) = bind(&tree);

    assert!(table.locals(function).unwrap().contains_key("outer"));
    assert!(!table.locals(function).unwrap().contains_key("inner"));
    let inner_symbol = table.symbol_of(inner).and_then(|id| table.get(id)).unwrap();
    assert_eq!(inner_symbol.kind, SymbolKind::Variable);
    assert_eq!(inner_symbol.fully_qualified_name, "Main:Run:inner");
}

#[test]
fn test_events_are_not_registered() {
    let b = TreeBuilder::new();
    let event = b.event("OnInit", vec![], vec![]);
    let script = b.script("Main", None, LanguageFlags::NONE, vec![], vec![event]);
    let tree = b.finish();
    let (table, _) = bind(&tree);
    assert!(table.locals(script).is_none());
    assert_eq!(member_names(&table, "Main"), vec!["OnInit"]);
}

#[test]
fn test_states_and_custom_events_use_script_tables() {
    let b = TreeBuilder::new();
    let script = b.script(
        "Main",
        None,
        LanguageFlags::NONE,
        vec![],
        vec![b.state("Idle", true, vec![]), b.custom_event("OnAlarm")],
    );
    let tree = b.finish();
    let (table, _) = bind(&tree);
    assert!(table.states(script).unwrap().contains_key("idle"));
    assert!(table.custom_events(script).unwrap().contains_key("onalarm"));
}

// ============================================================================
// Diagnostics
// ============================================================================

#[test]
fn test_redeclare_in_same_container() {
    let b = TreeBuilder::new();
    let function = b.function(
        None,
        "Run",
        vec![b.parameter("int", "value")],
        LanguageFlags::NONE,
        vec![b.declare("int", "Value", None)],
    );
    b.script("Main", None, LanguageFlags::NONE, vec![], vec![function]);
    let (_, diagnostics) = bind(&b.finish());
    assert_eq!(diagnostics, vec!["Cannot redeclare Value."]);
}

#[test]
fn test_missing_identifier() {
    let b = TreeBuilder::new();
    let function = b.function(None, "", vec![], LanguageFlags::NONE, vec![]);
    b.script("Main", None, LanguageFlags::NONE, vec![], vec![function]);
    let tree = b.finish();
    let (table, diagnostics) = bind(&tree);
    assert_eq!(diagnostics, vec!["Identifier expected."]);
    let symbol = table.symbol_of(function).and_then(|id| table.get(id)).unwrap();
    assert_eq!(symbol.name, "<unknown>");
}
