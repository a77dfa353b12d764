//! Tests for tree construction through the builder.

use papyrus_ast::*;

fn sample() -> (SyntaxTree, NodeId) {
    let b = TreeBuilder::new();
    let script = b.script(
        "Quest:Main",
        Some("Quest"),
        LanguageFlags::NONE,
        vec![b.import("Utility")],
        vec![
            b.property("int", "Stage", LanguageFlags::AUTO),
            b.function(
                None,
                "Advance",
                vec![b.parameter("int", "aiBy")],
                LanguageFlags::NONE,
                vec![b.compound_assign(
                    b.ident("Stage"),
                    AssignmentOperator::Add,
                    b.ident("aiBy"),
                )],
            ),
        ],
    );
    (b.finish(), script)
}

// ============================================================================
// Structure
// ============================================================================

#[test]
fn test_script_is_registered_as_root() {
    let (tree, script) = sample();
    assert_eq!(tree.scripts(), &[script]);
    assert_eq!(tree.script_name(script), Some("Quest:Main"));
    assert!(tree.parent(script).is_none());
}

#[test]
fn test_every_node_reaches_its_script() {
    let (tree, script) = sample();
    let mut count = 0;
    visit_tree(&tree, script, |id| {
        count += 1;
        assert_eq!(tree.script_of(id), Some(script));
        VisitControl::Continue
    });
    assert_eq!(count, tree.len());
}

#[test]
fn test_composite_covers_children() {
    let (tree, script) = sample();
    visit_tree(&tree, script, |id| {
        let range = tree.range(id);
        for child in tree.kind(id).children() {
            assert!(range.contains_range(&tree.range(child)));
        }
        VisitControl::Continue
    });
}

#[test]
fn test_later_nodes_start_later() {
    let b = TreeBuilder::new();
    let first = b.ident("x");
    let second = b.declare("int", "x", None);
    let tree = b.finish();
    assert!(tree.range(second).pos >= tree.range(first).end);
}

// ============================================================================
// Annotations and shapes
// ============================================================================

#[test]
fn test_array_type_identifier() {
    let b = TreeBuilder::new();
    let ty = b.type_identifier("Actor[]");
    let tree = b.finish();
    match tree.kind(ty) {
        NodeKind::TypeIdentifier { is_array, .. } => assert!(*is_array),
        other => panic!("unexpected {}", other.name()),
    }
    assert_eq!(tree.identifier_name(ty), Some("Actor"));
    assert_eq!(tree.node(ty).scope_member_types, Some(MemberTypes::STRUCT));
}

#[test]
fn test_call_wraps_positional_arguments() {
    let b = TreeBuilder::new();
    let call = b.call("Add", vec![b.int(1), b.named_arg("aiCount", b.int(2))]);
    let tree = b.finish();
    let NodeKind::FunctionCallExpression {
        identifier,
        parameters,
    } = tree.kind(call)
    else {
        panic!("expected a call");
    };
    assert_eq!(parameters.len(), 2);
    for p in parameters {
        assert!(matches!(
            tree.kind(*p),
            NodeKind::FunctionCallExpressionParameter { .. }
        ));
    }
    assert_eq!(
        tree.node(*identifier).scope_member_types,
        Some(MemberTypes::FUNCTION | MemberTypes::EVENT)
    );
}

#[test]
fn test_assignment_left_is_annotated() {
    let b = TreeBuilder::new();
    let left = b.ident("Value");
    b.assign(left, b.int(3));
    let tree = b.finish();
    assert_eq!(
        tree.node(left).scope_member_types,
        Some(MemberTypes::VARIABLE | MemberTypes::PROPERTY)
    );
}

#[test]
fn test_containers() {
    let b = TreeBuilder::new();
    let f = b.function(None, "F", vec![], LanguageFlags::NONE, vec![]);
    let s = b.struct_definition("Point", vec![]);
    let stmt = b.return_statement(None);
    let tree = b.finish();
    assert!(tree.kind(f).is_container());
    assert!(tree.kind(s).is_container());
    assert!(!tree.kind(stmt).is_container());
}
