//! Expression and declaration types.
//!
//! Types are inferred bottom-up from the tree. Declarations evaluate to
//! their declared type, references to the declared type of the symbol they
//! resolve to, and operators follow the promotion rules below:
//! - comparisons, boolean operators, `!` and `is` give `bool`
//! - `+` with a `string` operand gives `string`
//! - other arithmetic gives `float` when either operand is `float`, else
//!   `int`
//!
//! Evaluation never fails; anything that does not resolve is `None`.

use crate::checker::TypeChecker;
use crate::lookup::LookupFlags;
use papyrus_ast::types::{NodeId, SymbolId, TypeId};
use papyrus_ast::{BinaryOperator, LiteralValue, NodeKind, UnaryOperator};
use papyrus_binder::SymbolKind;

impl<'a> TypeChecker<'a> {
    /// The type of an expression or declaration node.
    pub fn type_of_expression(&mut self, node: NodeId) -> Option<TypeId> {
        self.evaluate(node, None)
    }

    /// Evaluate `node`, resolving references relative to `base` when the
    /// node is the accessed part of a member access.
    fn evaluate(&mut self, node: NodeId, base: Option<NodeId>) -> Option<TypeId> {
        // A node met again while its own type is pending has no type.
        if !self.evaluating.insert(node) {
            return None;
        }
        let ty = self.evaluate_node(node, base);
        self.evaluating.remove(&node);
        ty
    }

    fn evaluate_node(&mut self, node: NodeId, base: Option<NodeId>) -> Option<TypeId> {
        let tree = self.tree;
        let types = self.types();
        let (bool_type, int_type, float_type, string_type) =
            (types.bool_type, types.int_type, types.float_type, types.string_type);

        match tree.kind(node) {
            NodeKind::Script { .. } => {
                let symbol = self.symbol_of(node)?;
                self.type_of_symbol(symbol)
            }

            NodeKind::FunctionDefinition { header, .. } => match tree.kind(*header) {
                NodeKind::FunctionHeader {
                    return_type: Some(return_type),
                    ..
                } => self.type_of_type_identifier(*return_type),
                _ => Some(self.types().void_type),
            },

            NodeKind::VariableDefinition {
                type_identifier, ..
            }
            | NodeKind::PropertyDefinition {
                type_identifier, ..
            }
            | NodeKind::FunctionParameter {
                type_identifier, ..
            }
            | NodeKind::CastExpression {
                type_identifier, ..
            } => self.type_of_type_identifier(*type_identifier),

            NodeKind::DeclareStatement {
                type_identifier,
                initial_value,
                ..
            } => {
                let is_var = match tree.kind(*type_identifier) {
                    NodeKind::TypeIdentifier { is_array, .. } => {
                        !is_array
                            && tree
                                .identifier_name(*type_identifier)
                                .is_some_and(|n| n.eq_ignore_ascii_case("var"))
                    }
                    _ => false,
                };
                if is_var {
                    initial_value.and_then(|value| self.evaluate(value, None))
                } else {
                    self.type_of_type_identifier(*type_identifier)
                }
            }

            NodeKind::IdentifierExpression { identifier } => {
                self.type_of_reference_at(*identifier, base)
            }
            NodeKind::FunctionCallExpression { identifier, .. } => {
                self.type_of_reference_at(*identifier, base)
            }

            NodeKind::MemberAccessExpression { base, access } => {
                self.evaluate(*access, Some(*base))
            }

            NodeKind::NewStructExpression { struct_type } => {
                self.type_of_type_identifier(*struct_type)
            }
            NodeKind::NewArrayExpression { array_type, .. } => {
                self.type_of_type_identifier(*array_type)
            }

            NodeKind::ArrayIndexExpression { base, .. } => {
                let array = self.type_of_expression(*base)?;
                self.element_type_of(array)
            }

            NodeKind::FunctionCallExpressionParameter { value, .. } => {
                self.type_of_expression(*value)
            }

            NodeKind::LiteralExpression { value } => self.type_of_expression(*value),
            NodeKind::Literal(value) => Some(match value {
                LiteralValue::None => self.types().any_type,
                LiteralValue::Bool(_) => bool_type,
                LiteralValue::Int(_) | LiteralValue::Hex(_) => int_type,
                LiteralValue::Float(_) => float_type,
                LiteralValue::String(_) => string_type,
            }),

            NodeKind::IsExpression { .. } => Some(bool_type),

            NodeKind::UnaryOperationExpression { operator, inner } => match operator {
                UnaryOperator::Not => Some(bool_type),
                UnaryOperator::Negate => self.type_of_expression(*inner),
            },

            NodeKind::BinaryOperationExpression {
                left,
                operator,
                right,
            } => {
                if is_boolean_result(*operator) {
                    return Some(bool_type);
                }
                let left = self.type_of_expression(*left);
                let right = self.type_of_expression(*right);
                if *operator == BinaryOperator::Add
                    && (left == Some(string_type) || right == Some(string_type))
                {
                    return Some(string_type);
                }
                if left == Some(float_type) || right == Some(float_type) {
                    Some(float_type)
                } else {
                    Some(int_type)
                }
            }

            NodeKind::ScriptHeader { .. }
            | NodeKind::Import { .. }
            | NodeKind::Identifier { .. }
            | NodeKind::TypeIdentifier { .. }
            | NodeKind::CustomEventDefinition { .. }
            | NodeKind::EventDefinition { .. }
            | NodeKind::EventHeader { .. }
            | NodeKind::FunctionHeader { .. }
            | NodeKind::FunctionParameters { .. }
            | NodeKind::GroupDefinition { .. }
            | NodeKind::StateDefinition { .. }
            | NodeKind::StructDefinition { .. }
            | NodeKind::AssignmentStatement { .. }
            | NodeKind::ExpressionStatement { .. }
            | NodeKind::IfStatement { .. }
            | NodeKind::IfStatementBody { .. }
            | NodeKind::ReturnStatement { .. }
            | NodeKind::WhileStatement { .. } => None,
        }
    }

    /// The type of the symbol `identifier` names, looked up relative to
    /// `base` when there is one.
    fn type_of_reference_at(&mut self, identifier: NodeId, base: Option<NodeId>) -> Option<TypeId> {
        let tree = self.tree;
        let name = tree.identifier_name(identifier)?;

        let symbols = match base {
            Some(base) => {
                let base_type = self.type_of_expression(base)?;
                if self.types().is_intrinsic(base_type) {
                    return None;
                }
                self.members_named(base_type, name)
            }
            None => self.matching_symbols_in_scope(identifier, name, LookupFlags::DEFAULT),
        };

        let symbol = symbols.into_iter().find(|s| {
            self.symbol(*s)
                .is_some_and(|s| s.kind != SymbolKind::Intrinsic)
        })?;
        self.declared_type_of(symbol)
    }

    /// The type a symbol was declared with. Symbols declared in the tree
    /// are evaluated through their declaration node; synthetic ones through
    /// their recorded value type.
    pub fn declared_type_of(&mut self, symbol: SymbolId) -> Option<TypeId> {
        let s = self.symbol(symbol)?;
        if let Some(declaration) = s.declaration {
            return self.evaluate(declaration, None);
        }

        match s.kind {
            SymbolKind::Script | SymbolKind::Struct | SymbolKind::Intrinsic => {
                self.type_of_symbol(symbol)
            }
            SymbolKind::Function => match s.value_type.clone() {
                Some(reference) => self.type_of_reference(&reference),
                None => Some(self.types().void_type),
            },
            _ => {
                let reference = s.value_type.clone()?;
                self.type_of_reference(&reference)
            }
        }
    }
}

fn is_boolean_result(operator: BinaryOperator) -> bool {
    matches!(
        operator,
        BinaryOperator::BooleanAnd
            | BinaryOperator::BooleanOr
            | BinaryOperator::CompareEqual
            | BinaryOperator::CompareNotEqual
            | BinaryOperator::CompareGreaterThan
            | BinaryOperator::CompareGreaterThanOrEqual
            | BinaryOperator::CompareLessThan
            | BinaryOperator::CompareLessThanOrEqual
    )
}
