//! Syntax node definitions.
//!
//! A [`Node`] pairs a [`NodeKind`] payload with its source range, its parent
//! link and the optional member-type restriction the parser attaches to
//! nodes whose names can only refer to certain kinds of members.

use crate::types::{LanguageFlags, MemberTypes, NodeId};
use papyrus_core::text::TextRange;

/// A node in the syntax tree arena.
#[derive(Debug, Clone)]
pub struct Node {
    pub id: NodeId,
    pub kind: NodeKind,
    pub range: TextRange,
    pub parent: Option<NodeId>,
    /// Restricts name lookup below this node to the given member kinds.
    pub scope_member_types: Option<MemberTypes>,
}

/// Literal values.
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    None,
    Bool(bool),
    Int(i64),
    Hex(i64),
    Float(f64),
    String(String),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    Add,
    BooleanAnd,
    BooleanOr,
    CompareEqual,
    CompareGreaterThan,
    CompareGreaterThanOrEqual,
    CompareLessThan,
    CompareLessThanOrEqual,
    CompareNotEqual,
    Divide,
    Modulus,
    Multiply,
    Subtract,
}

impl BinaryOperator {
    pub fn name(self) -> &'static str {
        match self {
            BinaryOperator::Add => "Add",
            BinaryOperator::BooleanAnd => "BooleanAnd",
            BinaryOperator::BooleanOr => "BooleanOr",
            BinaryOperator::CompareEqual => "CompareEqual",
            BinaryOperator::CompareGreaterThan => "CompareGreaterThan",
            BinaryOperator::CompareGreaterThanOrEqual => "CompareGreaterThanOrEqual",
            BinaryOperator::CompareLessThan => "CompareLessThan",
            BinaryOperator::CompareLessThanOrEqual => "CompareLessThanOrEqual",
            BinaryOperator::CompareNotEqual => "CompareNotEqual",
            BinaryOperator::Divide => "Divide",
            BinaryOperator::Modulus => "Modulus",
            BinaryOperator::Multiply => "Multiply",
            BinaryOperator::Subtract => "Subtract",
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum UnaryOperator {
    Negate,
    Not,
}

impl UnaryOperator {
    pub fn name(self) -> &'static str {
        match self {
            UnaryOperator::Negate => "Negate",
            UnaryOperator::Not => "Not",
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum AssignmentOperator {
    Assign,
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulus,
}

impl AssignmentOperator {
    pub fn name(self) -> &'static str {
        match self {
            AssignmentOperator::Assign => "Assign",
            AssignmentOperator::Add => "Add",
            AssignmentOperator::Subtract => "Subtract",
            AssignmentOperator::Multiply => "Multiply",
            AssignmentOperator::Divide => "Divide",
            AssignmentOperator::Modulus => "Modulus",
        }
    }
}

/// The closed set of syntax node kinds.
///
/// Child references are [`NodeId`]s into the same tree. Identifiers of
/// declarations are always present; a parser recovering from a missing name
/// produces an `Identifier` with an empty name.
#[derive(Debug, Clone)]
pub enum NodeKind {
    // Script structure
    Script {
        header: NodeId,
        imports: Vec<NodeId>,
        definitions: Vec<NodeId>,
    },
    ScriptHeader {
        identifier: NodeId,
        extended: Option<NodeId>,
        flags: LanguageFlags,
    },
    Import {
        identifier: NodeId,
    },
    Identifier {
        name: String,
    },
    TypeIdentifier {
        identifier: NodeId,
        is_array: bool,
    },

    // Definitions
    CustomEventDefinition {
        identifier: NodeId,
    },
    EventDefinition {
        header: NodeId,
        statements: Vec<NodeId>,
    },
    EventHeader {
        identifier: NodeId,
        parameters: NodeId,
    },
    FunctionDefinition {
        header: NodeId,
        statements: Vec<NodeId>,
    },
    FunctionHeader {
        return_type: Option<NodeId>,
        identifier: NodeId,
        parameters: NodeId,
        flags: LanguageFlags,
    },
    FunctionParameters {
        parameters: Vec<NodeId>,
    },
    FunctionParameter {
        type_identifier: NodeId,
        identifier: NodeId,
        default_value: Option<NodeId>,
        is_optional: bool,
    },
    GroupDefinition {
        identifier: NodeId,
        flags: LanguageFlags,
        properties: Vec<NodeId>,
    },
    PropertyDefinition {
        type_identifier: NodeId,
        identifier: NodeId,
        initial_value: Option<NodeId>,
        functions: Vec<NodeId>,
        flags: LanguageFlags,
    },
    StateDefinition {
        identifier: NodeId,
        is_auto: bool,
        definitions: Vec<NodeId>,
    },
    StructDefinition {
        identifier: NodeId,
        members: Vec<NodeId>,
    },
    VariableDefinition {
        type_identifier: NodeId,
        identifier: NodeId,
        initial_value: Option<NodeId>,
        flags: LanguageFlags,
    },

    // Statements
    AssignmentStatement {
        left: Option<NodeId>,
        operator: AssignmentOperator,
        right: Option<NodeId>,
    },
    DeclareStatement {
        type_identifier: NodeId,
        identifier: NodeId,
        initial_value: Option<NodeId>,
    },
    ExpressionStatement {
        expression: NodeId,
    },
    IfStatement {
        bodies: Vec<NodeId>,
    },
    IfStatementBody {
        condition: Option<NodeId>,
        statements: Vec<NodeId>,
    },
    ReturnStatement {
        value: Option<NodeId>,
    },
    WhileStatement {
        condition: NodeId,
        statements: Vec<NodeId>,
    },

    // Expressions
    ArrayIndexExpression {
        base: NodeId,
        index: NodeId,
    },
    BinaryOperationExpression {
        left: NodeId,
        operator: BinaryOperator,
        right: NodeId,
    },
    CastExpression {
        inner: NodeId,
        type_identifier: NodeId,
    },
    FunctionCallExpression {
        identifier: NodeId,
        parameters: Vec<NodeId>,
    },
    FunctionCallExpressionParameter {
        identifier: Option<NodeId>,
        value: NodeId,
    },
    IdentifierExpression {
        identifier: NodeId,
    },
    IsExpression {
        inner: NodeId,
        type_identifier: NodeId,
    },
    LiteralExpression {
        value: NodeId,
    },
    MemberAccessExpression {
        base: NodeId,
        access: NodeId,
    },
    NewArrayExpression {
        array_type: NodeId,
        length: NodeId,
    },
    NewStructExpression {
        struct_type: NodeId,
    },
    UnaryOperationExpression {
        operator: UnaryOperator,
        inner: NodeId,
    },

    Literal(LiteralValue),
}

impl NodeKind {
    /// Child nodes in source order.
    pub fn children(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        match self {
            NodeKind::Script {
                header,
                imports,
                definitions,
            } => {
                out.push(*header);
                out.extend(imports);
                out.extend(definitions);
            }
            NodeKind::ScriptHeader {
                identifier,
                extended,
                ..
            } => {
                out.push(*identifier);
                out.extend(extended);
            }
            NodeKind::Import { identifier }
            | NodeKind::TypeIdentifier { identifier, .. }
            | NodeKind::CustomEventDefinition { identifier }
            | NodeKind::IdentifierExpression { identifier } => out.push(*identifier),
            NodeKind::Identifier { .. } | NodeKind::Literal(_) => {}
            NodeKind::EventDefinition { header, statements }
            | NodeKind::FunctionDefinition { header, statements } => {
                out.push(*header);
                out.extend(statements);
            }
            NodeKind::EventHeader {
                identifier,
                parameters,
            } => {
                out.push(*identifier);
                out.push(*parameters);
            }
            NodeKind::FunctionHeader {
                return_type,
                identifier,
                parameters,
                ..
            } => {
                out.extend(return_type);
                out.push(*identifier);
                out.push(*parameters);
            }
            NodeKind::FunctionParameters { parameters } => out.extend(parameters),
            NodeKind::FunctionParameter {
                type_identifier,
                identifier,
                default_value,
                ..
            }
            | NodeKind::VariableDefinition {
                type_identifier,
                identifier,
                initial_value: default_value,
                ..
            }
            | NodeKind::DeclareStatement {
                type_identifier,
                identifier,
                initial_value: default_value,
            } => {
                out.push(*type_identifier);
                out.push(*identifier);
                out.extend(default_value);
            }
            NodeKind::GroupDefinition {
                identifier,
                properties,
                ..
            } => {
                out.push(*identifier);
                out.extend(properties);
            }
            NodeKind::PropertyDefinition {
                type_identifier,
                identifier,
                initial_value,
                functions,
                ..
            } => {
                out.push(*type_identifier);
                out.push(*identifier);
                out.extend(initial_value);
                out.extend(functions);
            }
            NodeKind::StateDefinition {
                identifier,
                definitions,
                ..
            } => {
                out.push(*identifier);
                out.extend(definitions);
            }
            NodeKind::StructDefinition {
                identifier,
                members,
            } => {
                out.push(*identifier);
                out.extend(members);
            }
            NodeKind::AssignmentStatement { left, right, .. } => {
                out.extend(left);
                out.extend(right);
            }
            NodeKind::ExpressionStatement { expression } => out.push(*expression),
            NodeKind::IfStatement { bodies } => out.extend(bodies),
            NodeKind::IfStatementBody {
                condition,
                statements,
            } => {
                out.extend(condition);
                out.extend(statements);
            }
            NodeKind::ReturnStatement { value } => out.extend(value),
            NodeKind::WhileStatement {
                condition,
                statements,
            } => {
                out.push(*condition);
                out.extend(statements);
            }
            NodeKind::ArrayIndexExpression { base, index } => {
                out.push(*base);
                out.push(*index);
            }
            NodeKind::BinaryOperationExpression { left, right, .. } => {
                out.push(*left);
                out.push(*right);
            }
            NodeKind::CastExpression {
                inner,
                type_identifier,
            }
            | NodeKind::IsExpression {
                inner,
                type_identifier,
            } => {
                out.push(*inner);
                out.push(*type_identifier);
            }
            NodeKind::FunctionCallExpression {
                identifier,
                parameters,
            } => {
                out.push(*identifier);
                out.extend(parameters);
            }
            NodeKind::FunctionCallExpressionParameter { identifier, value } => {
                out.extend(identifier);
                out.push(*value);
            }
            NodeKind::LiteralExpression { value } => out.push(*value),
            NodeKind::MemberAccessExpression { base, access } => {
                out.push(*base);
                out.push(*access);
            }
            NodeKind::NewArrayExpression { array_type, length } => {
                out.push(*array_type);
                out.push(*length);
            }
            NodeKind::NewStructExpression { struct_type } => out.push(*struct_type),
            NodeKind::UnaryOperationExpression { inner, .. } => out.push(*inner),
        }
        out
    }

    /// Whether this node owns a local symbol table.
    pub fn is_container(&self) -> bool {
        matches!(
            self,
            NodeKind::Script { .. }
                | NodeKind::PropertyDefinition { .. }
                | NodeKind::EventDefinition { .. }
                | NodeKind::FunctionDefinition { .. }
                | NodeKind::IfStatementBody { .. }
                | NodeKind::StateDefinition { .. }
                | NodeKind::StructDefinition { .. }
                | NodeKind::WhileStatement { .. }
        )
    }

    /// The variant name, used in debug output and internal errors.
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Script { .. } => "Script",
            NodeKind::ScriptHeader { .. } => "ScriptHeader",
            NodeKind::Import { .. } => "Import",
            NodeKind::Identifier { .. } => "Identifier",
            NodeKind::TypeIdentifier { .. } => "TypeIdentifier",
            NodeKind::CustomEventDefinition { .. } => "CustomEventDefinition",
            NodeKind::EventDefinition { .. } => "EventDefinition",
            NodeKind::EventHeader { .. } => "EventHeader",
            NodeKind::FunctionDefinition { .. } => "FunctionDefinition",
            NodeKind::FunctionHeader { .. } => "FunctionHeader",
            NodeKind::FunctionParameters { .. } => "FunctionParameters",
            NodeKind::FunctionParameter { .. } => "FunctionParameter",
            NodeKind::GroupDefinition { .. } => "GroupDefinition",
            NodeKind::PropertyDefinition { .. } => "PropertyDefinition",
            NodeKind::StateDefinition { .. } => "StateDefinition",
            NodeKind::StructDefinition { .. } => "StructDefinition",
            NodeKind::VariableDefinition { .. } => "VariableDefinition",
            NodeKind::AssignmentStatement { .. } => "AssignmentStatement",
            NodeKind::DeclareStatement { .. } => "DeclareStatement",
            NodeKind::ExpressionStatement { .. } => "ExpressionStatement",
            NodeKind::IfStatement { .. } => "IfStatement",
            NodeKind::IfStatementBody { .. } => "IfStatementBody",
            NodeKind::ReturnStatement { .. } => "ReturnStatement",
            NodeKind::WhileStatement { .. } => "WhileStatement",
            NodeKind::ArrayIndexExpression { .. } => "ArrayIndexExpression",
            NodeKind::BinaryOperationExpression { .. } => "BinaryOperationExpression",
            NodeKind::CastExpression { .. } => "CastExpression",
            NodeKind::FunctionCallExpression { .. } => "FunctionCallExpression",
            NodeKind::FunctionCallExpressionParameter { .. } => {
                "FunctionCallExpressionParameter"
            }
            NodeKind::IdentifierExpression { .. } => "IdentifierExpression",
            NodeKind::IsExpression { .. } => "IsExpression",
            NodeKind::LiteralExpression { .. } => "LiteralExpression",
            NodeKind::MemberAccessExpression { .. } => "MemberAccessExpression",
            NodeKind::NewArrayExpression { .. } => "NewArrayExpression",
            NodeKind::NewStructExpression { .. } => "NewStructExpression",
            NodeKind::UnaryOperationExpression { .. } => "UnaryOperationExpression",
            NodeKind::Literal(_) => "Literal",
        }
    }
}
