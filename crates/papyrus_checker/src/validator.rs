//! Type and reference validation.
//!
//! Walks a subtree and reports:
//! - names that do not resolve, and locals used before their declaration
//! - type references that do not resolve
//! - initializers, assignments and arguments whose type does not fit
//! - operators applied to operand types they do not accept
//! - assignments to expressions that cannot be assigned or are read-only
//! - call argument lists that do not match the callee's parameters
//!
//! Nodes whose children have been fully validated by their own rule return
//! [`VisitControl::SkipChildren`].

use crate::checker::TypeChecker;
use crate::error::CheckError;
use papyrus_ast::types::{NodeId, SymbolId, TypeId};
use papyrus_ast::{AssignmentOperator, BinaryOperator, NodeKind, VisitControl};
use papyrus_binder::SymbolKind;
use papyrus_core::TextRange;
use papyrus_diagnostics::{messages, DiagnosticCollection};
use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::VecDeque;

type ValidateResult = Result<VisitControl, CheckError>;

impl<'a> TypeChecker<'a> {
    /// Validate every node under `root`, adding problems to `diagnostics`.
    pub fn check_types_and_references(
        &mut self,
        root: NodeId,
        diagnostics: &mut DiagnosticCollection,
    ) {
        let tree = self.tree;
        papyrus_ast::visit_tree(tree, root, |node| {
            match self.validate_node(node, diagnostics) {
                Ok(control) => control,
                Err(error) => {
                    tracing::warn!(node = tree.kind(node).name(), %error, "validation failed");
                    let message = error.to_string();
                    diagnostics.add_error(&messages::CHECK_FAILED_0, &[message.as_str()], tree.range(node));
                    VisitControl::Continue
                }
            }
        });
    }

    fn validate_node(&mut self, node: NodeId, diagnostics: &mut DiagnosticCollection) -> ValidateResult {
        let tree = self.tree;
        match tree.kind(node) {
            NodeKind::DeclareStatement {
                type_identifier,
                initial_value: Some(initial_value),
                ..
            } => {
                let declared = self.type_of_type_identifier(*type_identifier);
                let initial = self.type_of_expression(*initial_value);
                self.check_assignable(
                    declared,
                    initial,
                    tree.range(*initial_value),
                    diagnostics,
                );
                Ok(VisitControl::Continue)
            }
            NodeKind::TypeIdentifier { .. } => {
                if self.type_of_type_identifier(node).is_none() {
                    let name = tree.identifier_name(node).unwrap_or_default();
                    diagnostics.add_error(&messages::CANNOT_FIND_NAME_0, &[name], tree.range(node));
                }
                Ok(VisitControl::SkipChildren)
            }
            NodeKind::Identifier { name } => Ok(self.validate_identifier(node, name, diagnostics)),
            NodeKind::BinaryOperationExpression {
                left,
                operator,
                right,
            } => {
                let left = self.type_of_expression(*left);
                let right = self.type_of_expression(*right);
                if !self.operator_accepts(*operator, left, right) {
                    self.report_operator(operator.name(), left, right, tree.range(node), diagnostics);
                }
                Ok(VisitControl::Continue)
            }
            NodeKind::AssignmentStatement {
                left,
                operator,
                right,
            } => Ok(self.validate_assignment(node, *left, *operator, *right, diagnostics)),
            NodeKind::FunctionCallExpression {
                identifier,
                parameters,
            } => self.validate_call(node, *identifier, parameters, diagnostics),
            _ => Ok(VisitControl::Continue),
        }
    }

    // ========================================================================
    // Names
    // ========================================================================

    fn validate_identifier(
        &mut self,
        node: NodeId,
        name: &str,
        diagnostics: &mut DiagnosticCollection,
    ) -> VisitControl {
        let tree = self.tree;
        let parent = tree.parent(node);

        if let Some(parent) = parent {
            match tree.kind(parent) {
                NodeKind::GroupDefinition { .. } | NodeKind::StateDefinition { .. } => {
                    return VisitControl::Continue;
                }
                NodeKind::FunctionCallExpressionParameter {
                    identifier: Some(argument_name),
                    ..
                } if *argument_name == node => return VisitControl::Continue,
                _ => {}
            }
        }

        let search = self.symbols_for_identifier(node);
        let Some(&first) = search.symbols.first() else {
            let is_import = parent.is_some_and(|p| matches!(tree.kind(p), NodeKind::Import { .. }));
            if is_import && self.is_namespace(name) {
                return VisitControl::Continue;
            }
            diagnostics.add_error(&messages::CANNOT_FIND_NAME_0, &[name], tree.range(node));
            return VisitControl::Continue;
        };

        let is_variable = self.symbol(first).is_some_and(|s| s.kind == SymbolKind::Variable);
        if is_variable && self.variable_is_block_scoped(first) {
            let declared_at = self
                .symbol(first)
                .and_then(|s| s.declaration)
                .map(|d| tree.range(d).pos);
            if declared_at.is_some_and(|pos| pos >= tree.range(node).end) {
                diagnostics.add_error(
                    &messages::BLOCK_SCOPED_VARIABLE_0_USED_BEFORE_ITS_DECLARATION,
                    &[name],
                    tree.range(node),
                );
            }
        }

        VisitControl::Continue
    }

    /// Whether some script lives in the namespace `name`.
    fn is_namespace(&self, name: &str) -> bool {
        let prefix = format!("{}:", name.to_lowercase());
        self.resolver
            .script_names()
            .iter()
            .any(|script| script.to_lowercase().starts_with(&prefix))
    }

    // ========================================================================
    // Operators and assignments
    // ========================================================================

    /// Whether `operator` may be applied to the operand types. Unknown
    /// operand types are accepted.
    fn operator_accepts(
        &self,
        operator: BinaryOperator,
        left: Option<TypeId>,
        right: Option<TypeId>,
    ) -> bool {
        let (Some(left), Some(right)) = (left, right) else {
            return true;
        };
        let types = self.types();
        let numeric = types.is_numeric(left) && types.is_numeric(right);
        match operator {
            BinaryOperator::CompareGreaterThan
            | BinaryOperator::CompareGreaterThanOrEqual
            | BinaryOperator::CompareLessThan
            | BinaryOperator::CompareLessThanOrEqual => numeric,
            BinaryOperator::Add => {
                left == types.string_type || right == types.string_type || numeric
            }
            BinaryOperator::Divide
            | BinaryOperator::Multiply
            | BinaryOperator::Modulus
            | BinaryOperator::Subtract => numeric,
            BinaryOperator::BooleanAnd
            | BinaryOperator::BooleanOr
            | BinaryOperator::CompareEqual
            | BinaryOperator::CompareNotEqual => true,
        }
    }

    fn validate_assignment(
        &mut self,
        node: NodeId,
        left: Option<NodeId>,
        operator: AssignmentOperator,
        right: Option<NodeId>,
        diagnostics: &mut DiagnosticCollection,
    ) -> VisitControl {
        let tree = self.tree;
        let range = tree.range(node);

        let Some(left) = left else {
            diagnostics.add_error(&messages::EXPECTED_LEFT_HAND_SIDE, &[], range);
            return VisitControl::SkipChildren;
        };

        if !self.expression_is_assignable(left) {
            diagnostics.add_error(&messages::LEFT_HAND_SIDE_CANNOT_BE_ASSIGNED_TO, &[], range);
            return VisitControl::SkipChildren;
        }

        if let Some(identifier) = self.identifier_for_expression(left) {
            if !self.identifier_is_writable(identifier) {
                diagnostics.add_error(&messages::LEFT_HAND_SIDE_IS_CONST_OR_READ_ONLY, &[], range);
                return VisitControl::SkipChildren;
            }
        }

        let Some(right) = right else {
            diagnostics.add_error(&messages::EXPECTED_RIGHT_HAND_SIDE, &[], range);
            return VisitControl::SkipChildren;
        };

        let left_type = self.type_of_expression(left);
        let right_type = self.type_of_expression(right);

        match operator {
            AssignmentOperator::Assign => {
                self.check_assignable(left_type, right_type, tree.range(right), diagnostics);
            }
            AssignmentOperator::Add if left_type == Some(self.types().string_type) => {}
            AssignmentOperator::Add
            | AssignmentOperator::Subtract
            | AssignmentOperator::Multiply
            | AssignmentOperator::Divide
            | AssignmentOperator::Modulus => {
                if let (Some(l), Some(r)) = (left_type, right_type) {
                    let types = self.types();
                    if !(types.is_numeric(l) && types.is_numeric(r)) {
                        self.report_operator(operator.name(), left_type, right_type, range, diagnostics);
                    }
                }
            }
        }

        VisitControl::Continue
    }

    fn check_assignable(
        &mut self,
        to: Option<TypeId>,
        from: Option<TypeId>,
        range: TextRange,
        diagnostics: &mut DiagnosticCollection,
    ) {
        let (Some(to_type), Some(from_type)) = (to, from) else {
            return;
        };
        if !self.is_assignable(to, from) {
            diagnostics.add_error(
                &messages::TYPE_0_IS_NOT_ASSIGNABLE_TO_TYPE_1,
                &[self.type_name(from_type), self.type_name(to_type)],
                range,
            );
        }
    }

    fn report_operator(
        &self,
        operator: &str,
        left: Option<TypeId>,
        right: Option<TypeId>,
        range: TextRange,
        diagnostics: &mut DiagnosticCollection,
    ) {
        let (Some(left), Some(right)) = (left, right) else {
            return;
        };
        diagnostics.add_error(
            &messages::OPERATOR_0_CANNOT_BE_APPLIED_TO_TYPES_1_AND_2,
            &[operator, self.type_name(left), self.type_name(right)],
            range,
        );
    }

    // ========================================================================
    // Calls
    // ========================================================================

    /// Match a call's arguments against the first symbol its name resolves
    /// to. Required parameters take arguments in order; the remaining
    /// arguments fill optional parameters by name or, when unnamed, in
    /// order.
    fn validate_call(
        &mut self,
        node: NodeId,
        identifier: NodeId,
        arguments: &[NodeId],
        diagnostics: &mut DiagnosticCollection,
    ) -> ValidateResult {
        let tree = self.tree;
        let range = tree.range(node);

        let search = self.symbols_for_identifier(identifier);
        let Some(&callee) = search.symbols.first() else {
            return Ok(VisitControl::Continue);
        };

        let parameters = match self.symbol(callee) {
            Some(s) if matches!(s.kind, SymbolKind::Function | SymbolKind::Event) => {
                s.parameters.clone()
            }
            Some(s) => return Err(CheckError::NotCallable { name: s.name.clone() }),
            None => return Ok(VisitControl::Continue),
        };

        if arguments.len() > parameters.len() {
            diagnostics.add_error(&messages::EXPECTED_N_PARAMETERS_GOT_N, &[], range);
            return Ok(VisitControl::SkipChildren);
        }

        let (optional, required): (Vec<SymbolId>, Vec<SymbolId>) = parameters
            .iter()
            .copied()
            .partition(|p| self.symbol(*p).is_some_and(|s| s.is_optional()));
        let optional_by_name: FxHashMap<String, SymbolId> = optional
            .iter()
            .filter_map(|p| self.symbol(*p).map(|s| (s.name.to_lowercase(), *p)))
            .collect();
        let mut optional: VecDeque<SymbolId> = optional.into();

        let mut arguments: VecDeque<(NodeId, Option<&str>, NodeId)> = arguments
            .iter()
            .map(|a| match tree.kind(*a) {
                NodeKind::FunctionCallExpressionParameter { identifier, value } => Ok((
                    *a,
                    identifier.and_then(|i| tree.identifier_name(i)),
                    *value,
                )),
                other => Err(CheckError::UnexpectedNode {
                    expected: "FunctionCallExpressionParameter",
                    found: other.name(),
                }),
            })
            .collect::<Result<_, _>>()?;

        for parameter in required {
            let Some((argument, _, value)) = arguments.pop_front() else {
                diagnostics.add_error(&messages::EXPECTED_N_PARAMETERS_GOT_N, &[], range);
                continue;
            };
            self.check_argument(parameter, argument, value, diagnostics);
        }

        let mut used_names = FxHashSet::default();
        for (argument, name, value) in arguments {
            let parameter = match name {
                Some(name) => optional_by_name.get(&name.to_lowercase()).copied(),
                None => optional.pop_front(),
            };
            let Some(parameter) = parameter else {
                if let Some(name) = name {
                    diagnostics.add_error(
                        &messages::NO_OPTIONAL_PARAMETER_NAMED_X,
                        &[name],
                        tree.range(argument),
                    );
                }
                continue;
            };

            let parameter_name = self
                .symbol(parameter)
                .map(|s| s.name.to_lowercase())
                .unwrap_or_default();
            if name.is_some() && used_names.contains(&parameter_name) {
                diagnostics.add_error(&messages::OPTIONAL_NAME_ALREADY_USED, &[], tree.range(argument));
                continue;
            }
            used_names.insert(parameter_name);

            self.check_argument(parameter, argument, value, diagnostics);
        }

        Ok(VisitControl::SkipChildren)
    }

    /// Validate an argument's value and check it against its parameter.
    fn check_argument(
        &mut self,
        parameter: SymbolId,
        argument: NodeId,
        value: NodeId,
        diagnostics: &mut DiagnosticCollection,
    ) {
        self.check_types_and_references(value, diagnostics);

        let parameter_type = self.parameter_type(parameter);
        let argument_type = self.type_of_expression(value);
        let (Some(parameter_type), Some(argument_type)) = (parameter_type, argument_type) else {
            return;
        };
        if !self.is_assignable(Some(parameter_type), Some(argument_type)) {
            diagnostics.add_error(
                &messages::ARGUMENT_OF_TYPE_0_IS_NOT_ASSIGNABLE_TO_PARAMETER_OF_TYPE_1,
                &[self.type_name(argument_type), self.type_name(parameter_type)],
                self.tree.range(argument),
            );
        }
    }

    fn parameter_type(&mut self, parameter: SymbolId) -> Option<TypeId> {
        let tree = self.tree;
        let declaration = self.symbol(parameter)?.declaration;
        match declaration.map(|d| tree.kind(d)) {
            Some(NodeKind::FunctionParameter {
                type_identifier, ..
            }) => self.type_of_type_identifier(*type_identifier),
            _ => self.declared_type_of(parameter),
        }
    }
}
