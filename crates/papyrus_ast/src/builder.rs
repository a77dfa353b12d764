//! Programmatic construction of syntax trees.
//!
//! [`TreeBuilder`] produces the same shapes a parser would: every node gets a
//! source range, children are linked to their parents, and the member-type
//! scope restrictions the grammar implies are attached to the nodes that
//! carry them. Leaves are placed at increasing offsets in construction
//! order, and composite nodes cover their children, so "declared before"
//! relations follow the order in which nodes are built.
//!
//! All methods take `&self` so calls can be nested:
//!
//! ```
//! use papyrus_ast::{LanguageFlags, TreeBuilder};
//!
//! let b = TreeBuilder::new();
//! b.script(
//!     "Counter",
//!     None,
//!     LanguageFlags::NONE,
//!     vec![],
//!     vec![b.function(
//!         Some("int"),
//!         "Next",
//!         vec![b.parameter("int", "aiValue")],
//!         LanguageFlags::NONE,
//!         vec![b.return_statement(Some(b.binary(
//!             b.ident("aiValue"),
//!             papyrus_ast::BinaryOperator::Add,
//!             b.int(1),
//!         )))],
//!     )],
//! );
//! let tree = b.finish();
//! assert_eq!(tree.scripts().len(), 1);
//! ```

use crate::node::{AssignmentOperator, BinaryOperator, LiteralValue, NodeKind, UnaryOperator};
use crate::tree::SyntaxTree;
use crate::types::{LanguageFlags, MemberTypes, NodeId};
use papyrus_core::text::TextRange;
use std::cell::{Cell, RefCell};

pub struct TreeBuilder {
    tree: RefCell<SyntaxTree>,
    cursor: Cell<u32>,
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self {
            tree: RefCell::new(SyntaxTree::new()),
            cursor: Cell::new(0),
        }
    }

    /// Consume the builder and return the tree.
    pub fn finish(self) -> SyntaxTree {
        self.tree.into_inner()
    }

    // ========================================================================
    // Node placement
    // ========================================================================

    fn leaf(&self, kind: NodeKind, width: u32) -> NodeId {
        let pos = self.cursor.get();
        let end = pos + width.max(1);
        self.cursor.set(end + 1);
        self.tree.borrow_mut().add(kind, TextRange::new(pos, end))
    }

    fn composite(&self, kind: NodeKind) -> NodeId {
        let children = kind.children();
        let range = {
            let tree = self.tree.borrow();
            children
                .iter()
                .map(|c| tree.range(*c))
                .reduce(|a, b| a.cover(&b))
        };
        match range {
            Some(range) => self.tree.borrow_mut().add(kind, range),
            None => self.leaf(kind, 1),
        }
    }

    fn annotate(&self, id: NodeId, member_types: MemberTypes) {
        self.tree
            .borrow_mut()
            .set_scope_member_types(id, member_types);
    }

    /// Wrap a value in a call argument unless it already is one.
    fn argument(&self, node: NodeId) -> NodeId {
        let is_argument = matches!(
            self.tree.borrow().kind(node),
            NodeKind::FunctionCallExpressionParameter { .. }
        );
        if is_argument {
            node
        } else {
            self.arg(node)
        }
    }

    // ========================================================================
    // Names and literals
    // ========================================================================

    pub fn identifier(&self, name: &str) -> NodeId {
        self.leaf(
            NodeKind::Identifier {
                name: name.to_string(),
            },
            name.len() as u32,
        )
    }

    /// A type reference. A trailing `[]` makes it an array reference.
    pub fn type_identifier(&self, name: &str) -> NodeId {
        let (name, is_array) = match name.strip_suffix("[]") {
            Some(element) => (element, true),
            None => (name, false),
        };
        let identifier = self.identifier(name);
        let id = self.composite(NodeKind::TypeIdentifier {
            identifier,
            is_array,
        });
        self.annotate(id, MemberTypes::STRUCT);
        id
    }

    pub fn literal(&self, value: LiteralValue) -> NodeId {
        let width = match &value {
            LiteralValue::String(s) => s.len() as u32 + 2,
            _ => 1,
        };
        self.leaf(NodeKind::Literal(value), width)
    }

    fn literal_expression(&self, value: LiteralValue) -> NodeId {
        let value = self.literal(value);
        self.composite(NodeKind::LiteralExpression { value })
    }

    pub fn int(&self, value: i64) -> NodeId {
        self.literal_expression(LiteralValue::Int(value))
    }

    pub fn hex(&self, value: i64) -> NodeId {
        self.literal_expression(LiteralValue::Hex(value))
    }

    pub fn float(&self, value: f64) -> NodeId {
        self.literal_expression(LiteralValue::Float(value))
    }

    pub fn bool(&self, value: bool) -> NodeId {
        self.literal_expression(LiteralValue::Bool(value))
    }

    pub fn string(&self, value: &str) -> NodeId {
        self.literal_expression(LiteralValue::String(value.to_string()))
    }

    pub fn none(&self) -> NodeId {
        self.literal_expression(LiteralValue::None)
    }

    // ========================================================================
    // Expressions
    // ========================================================================

    pub fn ident(&self, name: &str) -> NodeId {
        let identifier = self.identifier(name);
        self.annotate(identifier, MemberTypes::PROPERTY | MemberTypes::VARIABLE);
        self.composite(NodeKind::IdentifierExpression { identifier })
    }

    pub fn member(&self, base: NodeId, access: NodeId) -> NodeId {
        self.composite(NodeKind::MemberAccessExpression { base, access })
    }

    /// A call. Plain expressions in `args` are wrapped as positional
    /// arguments; nodes built with [`named_arg`](Self::named_arg) or
    /// [`arg`](Self::arg) are used as they are.
    pub fn call(&self, name: &str, args: Vec<NodeId>) -> NodeId {
        let identifier = self.identifier(name);
        self.annotate(identifier, MemberTypes::FUNCTION | MemberTypes::EVENT);
        let parameters = args.into_iter().map(|a| self.argument(a)).collect();
        self.composite(NodeKind::FunctionCallExpression {
            identifier,
            parameters,
        })
    }

    pub fn arg(&self, value: NodeId) -> NodeId {
        self.composite(NodeKind::FunctionCallExpressionParameter {
            identifier: None,
            value,
        })
    }

    /// A `name = value` call argument.
    pub fn named_arg(&self, name: &str, value: NodeId) -> NodeId {
        let identifier = self.identifier(name);
        self.composite(NodeKind::FunctionCallExpressionParameter {
            identifier: Some(identifier),
            value,
        })
    }

    pub fn binary(&self, left: NodeId, operator: BinaryOperator, right: NodeId) -> NodeId {
        self.composite(NodeKind::BinaryOperationExpression {
            left,
            operator,
            right,
        })
    }

    pub fn unary(&self, operator: UnaryOperator, inner: NodeId) -> NodeId {
        self.composite(NodeKind::UnaryOperationExpression { operator, inner })
    }

    pub fn cast(&self, inner: NodeId, type_name: &str) -> NodeId {
        let type_identifier = self.type_identifier(type_name);
        self.composite(NodeKind::CastExpression {
            inner,
            type_identifier,
        })
    }

    pub fn is(&self, inner: NodeId, type_name: &str) -> NodeId {
        let type_identifier = self.type_identifier(type_name);
        self.composite(NodeKind::IsExpression {
            inner,
            type_identifier,
        })
    }

    pub fn index(&self, base: NodeId, index: NodeId) -> NodeId {
        self.composite(NodeKind::ArrayIndexExpression { base, index })
    }

    pub fn new_struct(&self, type_name: &str) -> NodeId {
        let struct_type = self.type_identifier(type_name);
        self.composite(NodeKind::NewStructExpression { struct_type })
    }

    /// `new Element[length]`.
    pub fn new_array(&self, element_type: &str, length: NodeId) -> NodeId {
        let array_type = self.type_identifier(&format!("{}[]", element_type));
        self.composite(NodeKind::NewArrayExpression { array_type, length })
    }

    // ========================================================================
    // Statements
    // ========================================================================

    pub fn declare(&self, type_name: &str, name: &str, initial_value: Option<NodeId>) -> NodeId {
        let type_identifier = self.type_identifier(type_name);
        let identifier = self.identifier(name);
        self.composite(NodeKind::DeclareStatement {
            type_identifier,
            identifier,
            initial_value,
        })
    }

    pub fn assign(&self, left: NodeId, right: NodeId) -> NodeId {
        self.assign_with(Some(left), AssignmentOperator::Assign, Some(right))
    }

    pub fn compound_assign(
        &self,
        left: NodeId,
        operator: AssignmentOperator,
        right: NodeId,
    ) -> NodeId {
        self.assign_with(Some(left), operator, Some(right))
    }

    /// An assignment whose sides may be missing, as left by error recovery.
    pub fn assign_with(
        &self,
        left: Option<NodeId>,
        operator: AssignmentOperator,
        right: Option<NodeId>,
    ) -> NodeId {
        if let Some(left) = left {
            self.annotate(left, MemberTypes::VARIABLE | MemberTypes::PROPERTY);
        }
        self.composite(NodeKind::AssignmentStatement {
            left,
            operator,
            right,
        })
    }

    pub fn expression_statement(&self, expression: NodeId) -> NodeId {
        self.composite(NodeKind::ExpressionStatement { expression })
    }

    pub fn return_statement(&self, value: Option<NodeId>) -> NodeId {
        self.composite(NodeKind::ReturnStatement { value })
    }

    /// An `If`/`ElseIf`/`Else` chain. A `None` condition is the `Else` body.
    pub fn if_statement(&self, bodies: Vec<(Option<NodeId>, Vec<NodeId>)>) -> NodeId {
        let bodies = bodies
            .into_iter()
            .map(|(condition, statements)| {
                self.composite(NodeKind::IfStatementBody {
                    condition,
                    statements,
                })
            })
            .collect();
        self.composite(NodeKind::IfStatement { bodies })
    }

    pub fn while_statement(&self, condition: NodeId, statements: Vec<NodeId>) -> NodeId {
        self.composite(NodeKind::WhileStatement {
            condition,
            statements,
        })
    }

    // ========================================================================
    // Definitions
    // ========================================================================

    pub fn variable(
        &self,
        type_name: &str,
        name: &str,
        flags: LanguageFlags,
        initial_value: Option<NodeId>,
    ) -> NodeId {
        let type_identifier = self.type_identifier(type_name);
        let identifier = self.identifier(name);
        self.composite(NodeKind::VariableDefinition {
            type_identifier,
            identifier,
            initial_value,
            flags,
        })
    }

    /// A property without accessor functions (`Auto`, `AutoReadOnly`, `Const`).
    pub fn property(&self, type_name: &str, name: &str, flags: LanguageFlags) -> NodeId {
        self.full_property(type_name, name, flags, Vec::new())
    }

    /// A property with `Get`/`Set` functions.
    pub fn full_property(
        &self,
        type_name: &str,
        name: &str,
        flags: LanguageFlags,
        functions: Vec<NodeId>,
    ) -> NodeId {
        let type_identifier = self.type_identifier(type_name);
        let identifier = self.identifier(name);
        self.annotate(identifier, MemberTypes::PROPERTY);
        self.composite(NodeKind::PropertyDefinition {
            type_identifier,
            identifier,
            initial_value: None,
            functions,
            flags,
        })
    }

    pub fn parameter(&self, type_name: &str, name: &str) -> NodeId {
        let type_identifier = self.type_identifier(type_name);
        let identifier = self.identifier(name);
        self.composite(NodeKind::FunctionParameter {
            type_identifier,
            identifier,
            default_value: None,
            is_optional: false,
        })
    }

    pub fn optional_parameter(&self, type_name: &str, name: &str, default: LiteralValue) -> NodeId {
        let type_identifier = self.type_identifier(type_name);
        let identifier = self.identifier(name);
        let default_value = Some(self.literal(default));
        self.composite(NodeKind::FunctionParameter {
            type_identifier,
            identifier,
            default_value,
            is_optional: true,
        })
    }

    fn parameter_list(&self, parameters: Vec<NodeId>) -> NodeId {
        self.composite(NodeKind::FunctionParameters { parameters })
    }

    pub fn function(
        &self,
        return_type: Option<&str>,
        name: &str,
        parameters: Vec<NodeId>,
        flags: LanguageFlags,
        statements: Vec<NodeId>,
    ) -> NodeId {
        let return_type = return_type.map(|t| self.type_identifier(t));
        let identifier = self.identifier(name);
        self.annotate(identifier, MemberTypes::FUNCTION);
        let parameters = self.parameter_list(parameters);
        let header = self.composite(NodeKind::FunctionHeader {
            return_type,
            identifier,
            parameters,
            flags,
        });
        self.composite(NodeKind::FunctionDefinition { header, statements })
    }

    pub fn event(&self, name: &str, parameters: Vec<NodeId>, statements: Vec<NodeId>) -> NodeId {
        let identifier = self.identifier(name);
        let parameters = self.parameter_list(parameters);
        let header = self.composite(NodeKind::EventHeader {
            identifier,
            parameters,
        });
        self.composite(NodeKind::EventDefinition { header, statements })
    }

    pub fn custom_event(&self, name: &str) -> NodeId {
        let identifier = self.identifier(name);
        self.composite(NodeKind::CustomEventDefinition { identifier })
    }

    pub fn struct_definition(&self, name: &str, members: Vec<NodeId>) -> NodeId {
        let identifier = self.identifier(name);
        self.composite(NodeKind::StructDefinition {
            identifier,
            members,
        })
    }

    pub fn state(&self, name: &str, is_auto: bool, definitions: Vec<NodeId>) -> NodeId {
        let identifier = self.identifier(name);
        self.composite(NodeKind::StateDefinition {
            identifier,
            is_auto,
            definitions,
        })
    }

    pub fn group(&self, name: &str, flags: LanguageFlags, properties: Vec<NodeId>) -> NodeId {
        let identifier = self.identifier(name);
        self.composite(NodeKind::GroupDefinition {
            identifier,
            flags,
            properties,
        })
    }

    pub fn import(&self, name: &str) -> NodeId {
        let identifier = self.identifier(name);
        self.composite(NodeKind::Import { identifier })
    }

    pub fn script(
        &self,
        name: &str,
        extends: Option<&str>,
        flags: LanguageFlags,
        imports: Vec<NodeId>,
        definitions: Vec<NodeId>,
    ) -> NodeId {
        let identifier = self.identifier(name);
        let extended = extends.map(|e| self.identifier(e));
        let header = self.composite(NodeKind::ScriptHeader {
            identifier,
            extended,
            flags,
        });
        self.composite(NodeKind::Script {
            header,
            imports,
            definitions,
        })
    }
}
